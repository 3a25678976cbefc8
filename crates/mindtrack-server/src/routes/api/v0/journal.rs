pub(crate) mod error;
pub(crate) mod export;
pub(crate) mod journal_entry;
pub(crate) mod reflection;
pub(crate) mod stats;

use crate::AppConfig;
use crate::routes::api::v0::journal::error::JournalError;
use crate::routes::error::{ErrorData, ValidationErrorType};
use crate::user::ExtractUserId;
use axum::Extension;
use axum::Json;
use axum::response::IntoResponse;
use axum::routing::{Router, get, post};
use chrono::Utc;
use http::StatusCode;
use mindtrack_core::journal::{create_entry, load_user_entries, validate_new_entry};
use mindtrack_core::reflection::spawn_reflection;
use mindtrack_db::sea_orm::DatabaseConnection;
use mindtrack_model::journal::JournalEntry;
use mindtrack_model::journal::partial::NewJournalEntry;
use std::sync::Arc;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .nest(
            "/entries",
            Router::new()
                .route("/", get(get_journal_entries).post(create_journal_entry))
                .nest("/{journal_entry}", journal_entry::create_router()),
        )
        .route("/reflection", post(reflection::reflect))
        .route("/stats", get(stats::get_stats))
        .nest("/export", export::create_router())
        .with_state(())
}

#[utoipa::path(
    get,
    path = "/api/v0/journal/entries",
    responses(
        (status = OK, description = "Journal entries of the user, newest first", body = [JournalEntry]),
    ),
    tag = "v0/journal",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn get_journal_entries(
    ExtractUserId(user): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
) -> Result<impl IntoResponse, JournalError> {
    let journal_entries = load_user_entries(&conn, user).await?;
    Ok(Json(journal_entries))
}

/// Saves the entry and returns it right away. The reflection is generated afterwards and
/// attached to the stored entry.
#[utoipa::path(
    post,
    path = "/api/v0/journal/entries",
    request_body = NewJournalEntry,
    responses(
        (status = CREATED, description = "Create journal entry", body = JournalEntry),
        (status = BAD_REQUEST, description = "Text is blank or the mood is out of range", body = ErrorData<ValidationErrorType>),
    ),
    tag = "v0/journal",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn create_journal_entry(
    ExtractUserId(user): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
    Extension(app_config): Extension<AppConfig>,
    Json(json): Json<NewJournalEntry>,
) -> Result<impl IntoResponse, JournalError> {
    let entry = validate_new_entry(&json)?;
    let entry = create_entry(&conn, user, entry, Utc::now().fixed_offset()).await?;

    spawn_reflection(
        conn,
        Arc::clone(app_config.completion()),
        app_config.llm_config().clone(),
        entry.id,
        entry.text.clone(),
    );

    Ok((StatusCode::CREATED, Json(entry)))
}
