use crate::AppConfig;
use crate::routes::api::v0::journal::error::JournalError;
use crate::routes::error::{ErrorData, ValidationErrorType};
use crate::user::ExtractUserId;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use mindtrack_core::journal::require_text;
use mindtrack_core::reflection::generate_reflection;
use mindtrack_model::journal::{ReflectionRequest, ReflectionResponse};

/// Reflection for a text that is not saved, e.g. a draft.
#[utoipa::path(
    post,
    path = "/api/v0/journal/reflection",
    request_body = ReflectionRequest,
    responses(
        (status = OK, description = "A short supportive reflection, or a fallback text if the model is unavailable", body = ReflectionResponse),
        (status = BAD_REQUEST, description = "Text is blank", body = ErrorData<ValidationErrorType>),
    ),
    tag = "v0/journal",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn reflect(
    ExtractUserId(user): ExtractUserId,
    Extension(app_config): Extension<AppConfig>,
    Json(request): Json<ReflectionRequest>,
) -> Result<impl IntoResponse, JournalError> {
    let text = require_text(&request.text, "Text")?;
    tracing::debug!(%user, "generating reflection");
    let ai_response = generate_reflection(app_config.completion().as_ref(), app_config.llm_config(), text).await;
    Ok(Json(ReflectionResponse { ai_response }))
}
