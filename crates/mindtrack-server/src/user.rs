use crate::app::AuthConfig;
use crate::auth::{AuthError, validate_jwt};
use axum::extract::FromRequestParts;
use axum::{Extension, RequestPartsExt};
use axum_auth::AuthBearer;
use axum_extra::extract::Cached;
use http::StatusCode;
use http::request::Parts;
use mindtrack_db::user;
use mindtrack_model::user::User;
use mindtrack_model_tools::convert::IntoModel;
use sea_orm::DatabaseConnection;
use std::error::Error;
use url::form_urlencoded;
use uuid::Uuid;

pub fn extract_auth_token_from_params(parts: &Parts) -> Option<String> {
    if let Some(query) = parts.uri.query() {
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key == "access_token" {
                return Some(value.to_string());
            }
        }
    }
    None
}

type Rejection = (StatusCode, &'static str);

#[derive(Clone)]
struct Session {
    user: User,
}

#[derive(Clone)]
pub(crate) struct ExtractUser(pub User);

#[derive(Clone)]
pub(crate) struct ExtractUserId(pub Uuid);

fn set_sentry_user(user_id: Uuid) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.as_hyphenated().to_string()),
            ..Default::default()
        }));
    });
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Try to extract token from Authorization header first
        let token = if let Ok(AuthBearer(token)) = parts.extract::<AuthBearer>().await {
            token
        } else if let Some(token) = extract_auth_token_from_params(parts) {
            token
        } else {
            return Err((StatusCode::UNAUTHORIZED, "No authentication token provided"));
        };

        let Ok(auth_config) = parts.extract::<Option<Extension<AuthConfig>>>().await;

        let Extension::<DatabaseConnection>(conn) =
            parts
                .extract::<Extension<DatabaseConnection>>()
                .await
                .map_err(|error| {
                    tracing::error!(
                        error = &error as &dyn Error,
                        "database connection not found in app data"
                    );
                    (StatusCode::INTERNAL_SERVER_ERROR, "Database Connection not found")
                })?;

        if let Some(Extension(auth_config)) = auth_config {
            match validate_jwt(&token, &auth_config) {
                Ok(Some(claims)) => {
                    let name = claims.display_name().map(ToOwned::to_owned);
                    let user = user::Mutation::create_or_update_user(&conn, &claims.sub, name)
                        .await
                        .map_err(|error| {
                            tracing::error!(error = &error as &dyn Error, "failed to create user");
                            (StatusCode::INTERNAL_SERVER_ERROR, "Error creating user")
                        })?;
                    set_sentry_user(user.id);
                    return Ok(Self {
                        user: user.into_model(),
                    });
                }
                Err(AuthError::Unauthorized) => {
                    return Err((StatusCode::UNAUTHORIZED, "Invalid token claims"));
                }
                Ok(None) => {
                    tracing::debug!("JWT authentication failed, try from DB");
                }
            }
        }

        Self::from_db(&conn, &token).await.map(|user| Self { user })
    }
}

impl Session {
    async fn from_db(conn: &DatabaseConnection, token: &str) -> Result<User, Rejection> {
        let user = match user::Query::find_by_token(conn, token).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err((StatusCode::UNAUTHORIZED, "Authentication failed.")),
            Err(error) => {
                tracing::error!(error = &error as &dyn Error, "failed to look up access token");
                return Err((StatusCode::INTERNAL_SERVER_ERROR, "Error loading user"));
            }
        };

        set_sentry_user(user.id);
        Ok(user.into_model())
    }
}

impl<S> FromRequestParts<S> for ExtractUser
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session: Session = Cached::<Session>::from_request_parts(parts, state).await?.0;
        Ok(Self(session.user))
    }
}

impl<S> FromRequestParts<S> for ExtractUserId
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session: Session = Cached::<Session>::from_request_parts(parts, state).await?.0;
        Ok(Self(session.user.id))
    }
}
