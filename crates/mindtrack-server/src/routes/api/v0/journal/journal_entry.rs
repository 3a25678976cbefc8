use crate::routes::api::v0::journal::error::JournalError;
use crate::user::ExtractUserId;
use axum::Extension;
use axum::extract::Path;
use axum::response::{IntoResponse, Json};
use axum::routing::{Router, get};
use mindtrack_db::journal;
use mindtrack_db::sea_orm::DatabaseConnection;
use mindtrack_model::journal::JournalEntry;
use mindtrack_model_tools::convert::TryFromDbModel;
use uuid::Uuid;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(get_journal_entry)).with_state(())
}

#[utoipa::path(
    get,
    path = "/api/v0/journal/entries/{journal_entry}",
    params(
        ("journal_entry" = Uuid, Path, description = "Id of the journal entry"),
    ),
    responses(
        (status = OK, description = "Get a single journal entry", body = JournalEntry),
        (status = NOT_FOUND, description = "The entry does not exist or belongs to another user"),
    ),
    tag = "v0/journal",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn get_journal_entry(
    ExtractUserId(user): ExtractUserId,
    Path(journal_entry): Path<Uuid>,
    Extension(conn): Extension<DatabaseConnection>,
) -> Result<impl IntoResponse, JournalError> {
    let journal_entry = journal::journal_entry::Query::get_user_journal_entry(&conn, user, journal_entry)
        .await?
        .ok_or(JournalError::NotFound)?;

    Ok(Json(JournalEntry::try_from_db_model(journal_entry)?))
}

#[cfg(test)]
mod tests {
    use crate::test_app::{TestApp, body_json, sign_in};
    use axum::body::Body;
    use chrono::Utc;
    use http::{Request, StatusCode, header};
    use mindtrack_core::test_utils::StaticCompletion;
    use mindtrack_db::journal::journal_entry;
    use mindtrack_model::journal::JournalEntry;
    use test_log::test;
    use uuid::Uuid;

    #[test(tokio::test)]
    async fn test_get_owned_entry() {
        let app = TestApp::new(StaticCompletion::failing()).await;
        let entry = journal_entry::Mutation::create_journal_entry(
            &app.conn,
            app.user_id,
            "Quiet evening".to_owned(),
            Some(3),
            Utc::now().fixed_offset(),
        )
        .await
        .unwrap();

        let uri = format!("/api/v0/journal/entries/{}", entry.id);
        let response = app.request(app.get(&uri)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let loaded: JournalEntry = body_json(response).await;
        assert_eq!(loaded.id, entry.id);
        assert_eq!(loaded.text, "Quiet evening");

        let (_, other_token) = sign_in(&app.conn, "other-subject").await;
        let request = Request::get(&uri)
            .header(header::AUTHORIZATION, format!("Bearer {other_token}"))
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.request(request).await.status(), StatusCode::NOT_FOUND);

        let missing = format!("/api/v0/journal/entries/{}", Uuid::new_v4());
        assert_eq!(app.request(app.get(&missing)).await.status(), StatusCode::NOT_FOUND);
    }
}
