use crate::routes::api::v0::journal::error::JournalError;
use crate::routes::api::v0::local_time::LocalTime;
use crate::user::ExtractUserId;
use axum::Extension;
use axum::body::Body;
use axum::extract::Query;
use axum::response::Response;
use axum::routing::{Router, get};
use http::{StatusCode, header};
use mindtrack_core::export::{csv_file_name, html_file_name, to_csv, to_html};
use mindtrack_core::journal::load_user_entries;
use mindtrack_db::sea_orm::DatabaseConnection;
use mindtrack_model::journal::JournalEntry;
use uuid::Uuid;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/csv", get(export_csv))
        .route("/html", get(export_html))
        .with_state(())
}

async fn load_for_export(conn: &DatabaseConnection, user: Uuid) -> Result<Vec<JournalEntry>, JournalError> {
    let entries = load_user_entries(conn, user).await?;
    if entries.is_empty() {
        tracing::debug!(%user, "nothing to export");
        return Err(JournalError::NotFound);
    }
    Ok(entries)
}

fn attachment(content_type: &str, file_name: &str, body: String) -> Result<Response, JournalError> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\""))
        .body(Body::from(body))?)
}

#[utoipa::path(
    get,
    path = "/api/v0/journal/export/csv",
    params(LocalTime),
    responses(
        (status = OK, description = "All entries as CSV, newest first", content_type = "text/csv", body = String),
        (status = NOT_FOUND, description = "The user has no entries"),
    ),
    tag = "v0/journal",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn export_csv(
    ExtractUserId(user): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
    Query(local_time): Query<LocalTime>,
) -> Result<Response, JournalError> {
    let entries = load_for_export(&conn, user).await?;
    attachment(
        "text/csv; charset=utf-8",
        &csv_file_name(local_time.now()),
        to_csv(&entries),
    )
}

#[utoipa::path(
    get,
    path = "/api/v0/journal/export/html",
    params(LocalTime),
    responses(
        (status = OK, description = "Printable summary with the overall numbers and the most recent entries", content_type = "text/html", body = String),
        (status = NOT_FOUND, description = "The user has no entries"),
    ),
    tag = "v0/journal",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn export_html(
    ExtractUserId(user): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
    Query(local_time): Query<LocalTime>,
) -> Result<Response, JournalError> {
    let entries = load_for_export(&conn, user).await?;
    let now = local_time.now();
    let entries = entries
        .into_iter()
        .map(|entry| JournalEntry {
            created_at: entry.created_at.with_timezone(&now.timezone()),
            ..entry
        })
        .collect::<Vec<_>>();
    attachment("text/html; charset=utf-8", &html_file_name(now), to_html(&entries, now))
}

#[cfg(test)]
mod tests {
    use crate::test_app::{TestApp, body_string};
    use chrono::Utc;
    use http::{StatusCode, header};
    use mindtrack_core::export::CSV_HEADER;
    use mindtrack_core::test_utils::StaticCompletion;
    use mindtrack_db::journal::journal_entry;
    use test_log::test;

    #[test(tokio::test)]
    async fn test_export_without_entries() {
        let app = TestApp::new(StaticCompletion::failing()).await;
        let response = app.request(app.get("/api/v0/journal/export/csv")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = app.request(app.get("/api/v0/journal/export/html")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test(tokio::test)]
    async fn test_export() {
        let app = TestApp::new(StaticCompletion::failing()).await;
        journal_entry::Mutation::create_journal_entry(
            &app.conn,
            app.user_id,
            "Said \"hi\" to <b>everyone</b>".to_owned(),
            Some(4),
            Utc::now().fixed_offset(),
        )
        .await
        .unwrap();

        let response = app.request(app.get("/api/v0/journal/export/csv")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_owned();
        assert!(disposition.starts_with("attachment; filename=\"mindtrack-entries-"));
        assert!(disposition.ends_with(".csv\""));
        let csv = body_string(response).await;
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert!(lines.next().unwrap().contains(r#",4,"Said ""hi"" to <b>everyone</b>","#));

        let response = app
            .request(app.get("/api/v0/journal/export/html?utc_offset_minutes=60"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_owned();
        assert!(disposition.contains("mindtrack-summary-"));
        let html = body_string(response).await;
        assert!(html.contains("&lt;b&gt;everyone&lt;/b&gt;"));
        assert!(!html.contains("<b>everyone</b>"));
    }
}
