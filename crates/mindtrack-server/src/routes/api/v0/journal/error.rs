use crate::routes::error::{ErrorData, ErrorDataProvider, GetStatusCode, ValidationErrorType, error_to_axum_response};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use mindtrack_core::journal::ValidationError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum JournalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Database error.")]
    SeaOrmError(#[from] DbErr),

    #[error("Database error.")]
    Load(#[from] mindtrack_core::journal::JournalError),

    #[error("Invalid stored journal entry")]
    Conversion(#[from] mindtrack_model_tools::error::Error),

    #[error("Error building response")]
    Response(#[from] http::Error),

    #[error("Journal entry could not be found")]
    NotFound,
}

impl ErrorDataProvider<ValidationErrorType> for JournalError {
    fn error_data(self) -> Option<ErrorData<ValidationErrorType>> {
        match self {
            Self::Validation(error) => Some(ErrorData::new(ValidationErrorType::InvalidInput, error.to_string())),
            _ => None,
        }
    }
}

impl GetStatusCode for JournalError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::SeaOrmError(DbErr::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for JournalError {
    fn into_response(self) -> Response {
        if GetStatusCode::status_code(&self).is_server_error() {
            tracing::error!(error = &self as &dyn std::error::Error, "journal request failed");
        }
        error_to_axum_response(self)
    }
}
