//! Signing keys and a canned http client for exercising token validation.
use crate::jwks::{JwkError, JwkHttpClient};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{EncodingKey, Header};
use reqwest::IntoUrl;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::TypeId;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::LazyLock;

pub const TEST_KEY_ID: &str = "mindtrack-test-key";
pub const TEST_SECRET: &[u8] = b"mindtrack-test-signing-secret-0123456789xy";

static ROOT_PATH: LazyLock<PathBuf> = LazyLock::new(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources/test"));

pub fn load_json<T>(name: &str) -> T
where
    T: DeserializeOwned,
{
    let path = ROOT_PATH.join(name);
    tracing::info!(?path, "loading test json file");
    let reader = BufReader::new(
        File::open(&path)
            .inspect_err(|error| tracing::error!(error = error as &dyn Error, ?path, "failed to open json file"))
            .unwrap(),
    );
    serde_json::from_reader(reader).unwrap()
}

/// The key set served for the test issuer.
#[must_use]
pub fn jwk_set() -> JwkSet {
    load_json("jwks.json")
}

/// Serves the json files under `resources/test` instead of doing http requests.
#[derive(Clone, Default)]
pub struct MockClient;

impl JwkHttpClient<JwkError> for MockClient {
    async fn get<T: DeserializeOwned + 'static, U: IntoUrl + Send + Sync>(&self, _: U) -> Result<T, JwkError> {
        let type_id = TypeId::of::<T>();
        if type_id == TypeId::of::<JwkSet>() {
            return Ok(load_json("jwks.json"));
        }
        Ok(load_json("oidc-configuration.json"))
    }
}

/// Sign `claims` with the shared test key. Pass [`TEST_KEY_ID`] as `kid` for a key of [`jwk_set`].
pub fn sign<T: Serialize>(claims: &T, kid: Option<&str>) -> String {
    let mut header = Header::new(jsonwebtoken::Algorithm::HS256);
    header.kid = kid.map(str::to_owned);
    jsonwebtoken::encode(&header, claims, &EncodingKey::from_secret(TEST_SECRET)).unwrap()
}
