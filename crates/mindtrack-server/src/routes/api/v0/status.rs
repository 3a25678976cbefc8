use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use http::StatusCode;
use mindtrack_core::status::get_sea_orm_db_status;
use mindtrack_model::status::ComponentStatus;
use sea_orm::DatabaseConnection;
use serde_json::json;
use tracing::instrument;
use utoipa::ToSchema;

pub fn create_router<S>() -> Router<S> {
    Router::new().route("/", get(get_status)).with_state(())
}

#[derive(Debug, Clone, ToSchema)]
struct Status {
    database: ComponentStatus,
}

impl Status {
    pub(crate) fn status_code(&self) -> StatusCode {
        if self.database.is_ok() {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<Status> for mindtrack_model::status::Status {
    fn from(val: Status) -> Self {
        mindtrack_model::status::Status {
            version: env!("CARGO_PKG_VERSION").to_owned(),
            database: val.database.into_message(),
        }
    }
}

impl IntoResponse for Status {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let status: mindtrack_model::status::Status = self.into();
        (status_code, Json(status)).into_response()
    }
}

#[utoipa::path(
    get,
    path = "/api/v0/status",
    responses(
        (status = OK, description = "Server is ok", body = mindtrack_model::status::Status, example = json!( mindtrack_model::status::Status { version: "0.3.0".to_owned(), database: json!("ok") } )),
        (status = INTERNAL_SERVER_ERROR, description = "The database is not reachable", body = mindtrack_model::status::Status),
    ),
    tag = "util"
)]
#[instrument(skip_all)]
pub(crate) async fn get_status(Extension(conn): Extension<DatabaseConnection>) -> impl IntoResponse {
    Status {
        database: get_sea_orm_db_status(&conn, None).await,
    }
}
