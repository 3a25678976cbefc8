use crate::app::AuthConfig;
use jsonwebtoken::errors::ErrorKind;
use mindtrack_oidc::{Claims, JwkError};
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum AuthError {
    #[error("User in unauthorized")]
    Unauthorized,
}

/// Validate `token` as an id token of the configured issuer.
///
/// Returns `Ok(None)` when the token is not a usable JWT at all, so the caller can fall back to
/// issued access tokens.
pub(crate) fn validate_jwt(token: &str, auth_config: &AuthConfig) -> Result<Option<Claims>, AuthError> {
    let state = auth_config.as_ref();
    match state.jwk().decode::<Claims>(token, state.validation()) {
        Ok(token) => Ok(Some(token.claims)),
        Err(JwkError::Jwk(error))
            if !matches!(
                error.kind(),
                ErrorKind::InvalidToken | ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature
            ) =>
        {
            tracing::warn!(error = &error as &dyn std::error::Error, "rejected jwt");
            Err(AuthError::Unauthorized)
        }
        Err(error) => {
            tracing::debug!(error = &error as &dyn std::error::Error, "token is not a valid jwt");
            Ok(None)
        }
    }
}
