use crate::TestDb;
use mindtrack_db::migration;
use sea_orm::{Database, DatabaseConnection, DbErr};
use std::borrow::Cow;
use tempfile::TempDir;
use thiserror::Error;

/// A sqlite database file in a temporary directory, removed on drop.
pub struct SqliteDb {
    // Dropping the directory deletes the database
    #[allow(dead_code)]
    temp_dir: TempDir,
    uri: String,
}

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Db(#[from] DbErr),
}

impl SqliteDb {
    pub fn new() -> Result<Self, SqliteError> {
        let temp_dir = TempDir::with_prefix("mindtrack-sqlite-db")?;
        let path = temp_dir.path().join("db.sqlite");
        let path = path
            .to_str()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidData, "Invalid path"))?;
        let uri = format!("sqlite://{path}?mode=rwc");

        tracing::info!(uri = ?uri, "return sqlite db uri");
        Ok(Self { temp_dir, uri })
    }

    /// Connect and apply the schema.
    pub async fn connect(&self) -> Result<DatabaseConnection, SqliteError> {
        let conn = Database::connect(self.uri.as_str()).await?;
        migration::run(&conn).await?;
        Ok(conn)
    }
}

impl TestDb for SqliteDb {
    fn db_uri(&self) -> Cow<'_, str> {
        self.uri.as_str().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ConnectionTrait;
    use test_log::test;

    #[test(tokio::test)]
    async fn test_connect() {
        let db = SqliteDb::new().unwrap();
        assert!(db.db_uri().starts_with("sqlite://"));
        let conn = db.connect().await.unwrap();
        conn.execute_unprepared("SELECT id FROM journal_entry").await.unwrap();

        // a second connection sees the schema of the first one
        let conn = db.connect().await.unwrap();
        conn.execute_unprepared("SELECT id FROM users").await.unwrap();
    }
}
