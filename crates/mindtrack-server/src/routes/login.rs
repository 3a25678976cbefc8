use crate::app::AuthConfig;
use crate::auth::validate_jwt;
use crate::routes::error::{ErrorData, LoginError, LoginErrorType};
use crate::user::ExtractUserId;
use axum::body::Bytes;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Extension, Json, Router};
use http::StatusCode;
use mindtrack_db::{access_tokens, user};
use mindtrack_model::login::Token;
use sea_orm::DatabaseConnection;
use std::error::Error;
use std::str::from_utf8;

pub fn create_router<S: Clone + Send + Sync + 'static>() -> Router<S> {
    Router::new()
        .route("/logout", post(logout))
        .nest("/login", Router::new().route("/token", post(login_token)))
        .with_state(())
}

#[utoipa::path(
    post,
    path = "/login/token",
    request_body(content = String, description = "The plain jwt token received from auth-server", content_type = "text/plain"),
    responses(
        (status = OK, description = "Successful login, returns Bearer token", body = Token, example = json!( Token { access_token: "abcToken12345678".into() })),
        (status = UNAUTHORIZED, description = "Authentication failed. Possible reason may be that the token is expired.", body = ErrorData<LoginErrorType>),
        (status = NOT_FOUND, description = "No identity provider is configured"),
    ),
    tag = "util"
)]
pub(crate) async fn login_token(
    auth_config: Option<Extension<AuthConfig>>,
    Extension(conn): Extension<DatabaseConnection>,
    token: Bytes,
) -> Result<Json<Token>, LoginError> {
    let Some(Extension(auth_config)) = auth_config else {
        tracing::warn!("login attempt without configured identity provider");
        return Err(LoginError::NotConfigured);
    };
    let token =
        from_utf8(&token).inspect_err(|error| tracing::warn!(error = error as &dyn Error, "could not read token"))?;

    let claims = validate_jwt(token.trim(), &auth_config)?.ok_or_else(|| {
        tracing::warn!("authentication failed: invalid token");
        LoginError::Invalid
    })?;

    let name = claims.display_name().map(ToOwned::to_owned);
    let user = user::Mutation::create_or_update_user(&conn, &claims.sub, name).await?;
    let access_token = access_tokens::Mutation::create_access_token(&conn, user.id).await?;
    tracing::debug!(user = %user.id, "user logged in");

    Ok(Json(Token {
        access_token: access_token.access_token,
    }))
}

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = NO_CONTENT, description = "User Logged out successfully"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to delete access token")
    ),
    tag = "oidc",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn logout(
    ExtractUserId(user_id): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
) -> impl IntoResponse {
    if let Err(error) = access_tokens::Mutation::delete_access_token(&conn, user_id).await {
        tracing::error!(
            user = %user_id,
            error = &error as &dyn Error,
            "failed to delete access token"
        );
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    tracing::debug!(user = %user_id, "user logged out");
    StatusCode::NO_CONTENT
}
