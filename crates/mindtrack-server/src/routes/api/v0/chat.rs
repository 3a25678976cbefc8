use crate::AppConfig;
use crate::routes::api::v0::local_time::LocalTime;
use crate::routes::error::{ErrorData, ErrorDataProvider, GetStatusCode, ValidationErrorType, error_to_axum_response};
use crate::user::ExtractUserId;
use axum::extract::Query;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Extension, Json, Router};
use http::StatusCode;
use mindtrack_core::chat::{build_context_summary, supportive_reply};
use mindtrack_core::journal::{ValidationError, load_user_entries, require_text};
use mindtrack_db::sea_orm::DatabaseConnection;
use mindtrack_model::chat::{ChatReply, ChatRequest};
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum ChatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error loading journal context")]
    Journal(#[from] mindtrack_core::journal::JournalError),
}

impl ErrorDataProvider<ValidationErrorType> for ChatError {
    fn error_data(self) -> Option<ErrorData<ValidationErrorType>> {
        match self {
            Self::Validation(error) => Some(ErrorData::new(ValidationErrorType::InvalidInput, error.to_string())),
            Self::Journal(_) => None,
        }
    }
}

impl GetStatusCode for ChatError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Journal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        if let Self::Journal(error) = &self {
            tracing::error!(error = error as &dyn std::error::Error, "failed to build chat context");
        }
        error_to_axum_response(self)
    }
}

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", post(chat)).with_state(())
}

/// Reply of the supportive assistant. The journal of the user is summarized into the prompt.
#[utoipa::path(
    post,
    path = "/api/v0/chat",
    params(LocalTime),
    request_body = ChatRequest,
    responses(
        (status = OK, description = "Reply of the assistant, prefixed with crisis resources when the conversation calls for it", body = ChatReply),
        (status = BAD_REQUEST, description = "Message is blank", body = ErrorData<ValidationErrorType>),
    ),
    tag = "v0/chat",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn chat(
    ExtractUserId(user): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
    Extension(app_config): Extension<AppConfig>,
    Query(local_time): Query<LocalTime>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, ChatError> {
    let message = require_text(&request.message, "Message")?;
    let entries = load_user_entries(&conn, user).await?;
    let context = build_context_summary(&entries, local_time.now());

    let reply = supportive_reply(
        app_config.completion().as_ref(),
        app_config.llm_config(),
        message,
        &context,
        &request.chat_history,
    )
    .await;
    Ok(Json(ChatReply { reply }))
}
