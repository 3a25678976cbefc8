use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr};

const SQLITE_SCHEMA: &str = include_str!("../migrations/sqlite/schema.sql");
const POSTGRES_SCHEMA: &str = include_str!("../migrations/postgres/schema.sql");

/// Apply the schema for the connected backend. Safe to run on every start.
pub async fn run<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    let backend = conn.get_database_backend();
    let schema = match backend {
        DatabaseBackend::Sqlite => SQLITE_SCHEMA,
        DatabaseBackend::Postgres => POSTGRES_SCHEMA,
        DatabaseBackend::MySql => return Err(DbErr::Custom("mysql is not supported".to_owned())),
    };

    tracing::debug!(?backend, "running migrations");
    conn.execute_unprepared(schema)
        .await
        .inspect_err(|error| tracing::error!(error = error as &dyn std::error::Error, "failed to migrate db"))?;
    Ok(())
}
