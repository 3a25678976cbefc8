use crate::user::ExtractUser;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use mindtrack_model::user::User;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(get_user_info)).with_state(())
}

#[utoipa::path(
    get,
    path = "/api/v0/user",
    responses(
        (status = OK, body = User, description = "returns information that is stored about the current user"),
        (status = UNAUTHORIZED, description = "missing or invalid token"),
    ),
    tag = "v0/user",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn get_user_info(ExtractUser(user): ExtractUser) -> impl IntoResponse {
    Json(user)
}
