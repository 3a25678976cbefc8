use mindtrack_model::status::ComponentStatus;
use sea_orm::ConnectionTrait;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::Query;
use std::error::Error;
use std::time::Duration;
use tokio::time::timeout;
use tracing::instrument;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Run a trivial query to check that the database answers in time.
#[instrument(skip_all)]
pub async fn get_sea_orm_db_status<C: ConnectionTrait>(conn: &C, duration: Option<Duration>) -> ComponentStatus {
    let mut query = Query::select();
    query.expr(Expr::current_timestamp());
    let statement = conn.get_database_backend().build(&query);

    match timeout(duration.unwrap_or(DEFAULT_TIMEOUT), conn.execute(statement)).await {
        Ok(Ok(_)) => ComponentStatus::ok(),
        Ok(Err(error)) => {
            tracing::error!(error = &error as &dyn Error, "db error during health check");
            ComponentStatus::from_error_text("database error")
        }
        Err(error) => {
            tracing::error!(error = &error as &dyn Error, "db health check timed out");
            ComponentStatus::from_error_text("timeout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Database;
    use test_log::test;

    #[test(tokio::test)]
    async fn test_healthy() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        assert!(get_sea_orm_db_status(&db, None).await.is_ok());
    }

    #[test(tokio::test)]
    async fn test_unhealthy() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.close_by_ref().await.unwrap();
        let status = get_sea_orm_db_status(&db, None).await;
        assert!(!status.is_ok());
        assert_eq!(status.into_message(), "database error");
    }
}
