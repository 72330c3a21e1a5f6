use surrealdb::{engine::any::Any, sql::Thing, Surreal};

use crate::{
    error::{Error, Result},
    helpers::thing_helpers::{create_user_thing, parse_id_part, thing_id},
    models::user::{UserProfile, UserRecord},
};

/// Full user document. Only for server-side use: it carries the password hash.
pub async fn get_user_record(db: &Surreal<Any>, user_id: &str) -> Result<UserRecord> {
    let user: Option<UserRecord> = db
        .query("SELECT * FROM $user")
        .bind(("user", create_user_thing(user_id)))
        .await?
        .take(0)?;

    user.ok_or_else(|| Error::UserNotFound {
        id: parse_id_part(user_id).to_string(),
    })
}

pub async fn get_user_profile(db: &Surreal<Any>, user_id: &str) -> Result<UserProfile> {
    let user: Option<UserProfile> = db
        .query("SELECT * OMIT password FROM $user")
        .bind(("user", create_user_thing(user_id)))
        .await?
        .take(0)?;

    user.ok_or_else(|| Error::UserNotFound {
        id: parse_id_part(user_id).to_string(),
    })
}

pub async fn user_exists(db: &Surreal<Any>, user_id: &str) -> Result<bool> {
    let found: Option<Thing> = db
        .query("SELECT VALUE id FROM $user")
        .bind(("user", create_user_thing(user_id)))
        .await?
        .take(0)?;
    Ok(found.is_some())
}

/// Fails with `Forbidden` unless `owner` is the user `user_id`.
pub fn ensure_owner(owner: &Thing, user_id: &str, what: &str) -> Result<()> {
    if thing_id(owner) == parse_id_part(user_id) {
        Ok(())
    } else {
        Err(Error::Forbidden {
            reason: format!("Only the owner can modify this {what}"),
        })
    }
}

/// Fails with `Forbidden` unless the caller is acting on their own account.
pub fn ensure_same_user(caller_id: &str, user_id: &str) -> Result<()> {
    if parse_id_part(caller_id) == parse_id_part(user_id) {
        Ok(())
    } else {
        Err(Error::Forbidden {
            reason: "You can only act on your own account".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_user, setup_db};

    #[tokio::test]
    async fn test_lookup_by_plain_and_prefixed_id() {
        let db = setup_db().await;
        let alice = create_user(&db, "alice").await;
        let id = thing_id(&alice);

        let record = get_user_record(&db, &id).await.unwrap();
        assert_eq!(record.username, "alice");

        let profile = get_user_profile(&db, &format!("user:{id}")).await.unwrap();
        assert_eq!(profile.id, alice);

        assert!(user_exists(&db, &id).await.unwrap());
        assert!(!user_exists(&db, "ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let db = setup_db().await;
        let result = get_user_profile(&db, "ghost").await;
        assert!(matches!(result, Err(Error::UserNotFound { .. })));
    }

    #[test]
    fn test_ownership_checks() {
        let owner = create_user_thing("alice");
        assert!(ensure_owner(&owner, "alice", "post").is_ok());
        assert!(ensure_owner(&owner, "user:alice", "post").is_ok());
        assert!(matches!(
            ensure_owner(&owner, "bob", "post"),
            Err(Error::Forbidden { .. })
        ));

        assert!(ensure_same_user("alice", "user:alice").is_ok());
        assert!(ensure_same_user("alice", "bob").is_err());
    }
}
