use surrealdb::{engine::any::Any, Surreal};

use crate::error::Result;

#[derive(serde::Deserialize)]
pub struct CountResult {
    pub total: u64,
}

/// Indexes the application relies on. Idempotent, run at startup.
pub async fn define_schema(db: &Surreal<Any>) -> Result<()> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS user_username ON TABLE user FIELDS username UNIQUE;
        DEFINE INDEX IF NOT EXISTS user_email ON TABLE user FIELDS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS post_user ON TABLE post FIELDS user;
        DEFINE INDEX IF NOT EXISTS song_user ON TABLE song FIELDS user;
    "#,
    )
    .await?
    .check()?;

    tracing::debug!("Database schema defined");
    Ok(())
}
