use surrealdb::sql::Thing;
use uuid::Uuid;

/// Extracts the id part from either `table:id` or a bare `id`.
pub fn parse_id_part(id: &str) -> &str {
    match id.split_once(':') {
        Some((_, id_part)) => id_part,
        None => id,
    }
}

/// Plain id of a record, without the table prefix or escaping.
pub fn thing_id(thing: &Thing) -> String {
    thing.id.to_raw()
}

/// Fresh record id for `table`, generated on our side so that several
/// records can be created and cross-referenced in one transaction.
pub fn new_thing(table: &str) -> Thing {
    Thing::from((table.to_string(), Uuid::new_v4().simple().to_string()))
}

fn create_thing(table: &str, id: &str) -> Thing {
    let clean_id = parse_id_part(id);
    Thing::from((table.to_string(), clean_id.to_string()))
}

pub fn create_user_thing(user_id: &str) -> Thing {
    create_thing("user", user_id)
}

pub fn create_song_thing(song_id: &str) -> Thing {
    create_thing("song", song_id)
}

pub fn create_post_thing(post_id: &str) -> Thing {
    create_thing("post", post_id)
}

pub fn create_comment_thing(comment_id: &str) -> Thing {
    create_thing("comment", comment_id)
}

pub fn create_playlist_thing(playlist_id: &str) -> Thing {
    create_thing("playlist", playlist_id)
}
