use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Access token handed out after a successful sign-in.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Token {
    pub access_token: String,
}
