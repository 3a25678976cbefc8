mod claims;
mod jwks;
mod oidc;

pub mod refresh;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use claims::Claims;
pub use jwks::{DefaultJwkClient, JwkClient, JwkError, JwkHttpClient, ValidationOptions};
pub use oidc::{DefaultOidcConfig, OidcConfig, OidcConfigBuilder};
