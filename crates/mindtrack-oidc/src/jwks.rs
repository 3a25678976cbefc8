use crate::refresh::{Refresh, RefreshableValue, Refresher};
use jsonwebtoken::jwk::{JwkSet, PublicKeyUse};
use jsonwebtoken::{DecodingKey, TokenData, Validation};
use reqwest::{Client, IntoUrl};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use typed_builder::TypedBuilder;
use url::Url;

const KEY_REFRESH_WAIT: Duration = Duration::from_secs(5 * 60);

#[derive(Error, Debug)]
pub enum JwkError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Jwk(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error("Key with specified id does not exist")]
    KeyNotFound,
    #[error("Key is missing field {0}")]
    MissingField(&'static str),
}

pub struct Config {
    pub(crate) url: Url,
}

pub trait JwkHttpClient<Error> {
    fn get<T: DeserializeOwned + 'static, U: IntoUrl + Send + Sync>(
        &self,
        url: U,
    ) -> impl Future<Output = Result<T, Error>> + Send + Sync;
}

impl<Error> JwkHttpClient<Error> for Client
where
    Error: From<JwkError>,
{
    async fn get<T: DeserializeOwned, U: IntoUrl + Send + Sync>(&self, url: U) -> Result<T, Error> {
        let json = self
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(JwkError::Reqwest)?
            .json()
            .await
            .map_err(JwkError::Reqwest)?;
        Ok(json)
    }
}

struct JwkRefresher<C> {
    client: C,
    url: Url,
}

impl<C> Refresher for JwkRefresher<C>
where
    C: JwkHttpClient<JwkError> + Clone + Send + Sync + 'static,
{
    type Error = JwkError;
    type Output = HashMap<String, DecodingKey>;
    type Future = Pin<Box<dyn Future<Output = Result<Refresh<Self::Output>, Self::Error>> + Send + Sync>>;

    fn refresh(&self) -> Self::Future {
        let client = self.client.clone();
        let url = self.url.clone();
        Box::pin(async move {
            tracing::debug!(%url, "loading jwk set");
            let jwk_set: JwkSet = client.get(url).await?;

            let key_map: HashMap<String, DecodingKey> = jwk_set
                .keys
                .into_iter()
                .filter(|jwk| matches!(jwk.common.public_key_use, Some(PublicKeyUse::Signature)))
                .filter_map(|jwk| {
                    let decoding_key = DecodingKey::from_jwk(&jwk);
                    jwk.common.key_id.map(|id| decoding_key.map(|key| (id, key)))
                })
                .collect::<Result<_, _>>()
                .map_err(JwkError::Jwk)?;
            tracing::debug!(keys = key_map.len(), "loaded signing keys");
            Ok(Refresh::new(key_map, KEY_REFRESH_WAIT))
        })
    }
}

pub struct JwkClient<Client = reqwest::Client>
where
    Client: JwkHttpClient<JwkError> + Default + Clone + Send + Sync + 'static,
{
    keys: RefreshableValue<HashMap<String, DecodingKey>, JwkRefresher<Client>, JwkError>,
}

pub type DefaultJwkClient = JwkClient<Client>;

#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct ValidationOptions {
    /// Accepted audiences. The audience is not checked when empty.
    #[builder(default)]
    pub audience: HashSet<String>,
    #[builder(default, setter(strip_option, into))]
    pub issuer: Option<String>,
}

impl<HttpClient> JwkClient<HttpClient>
where
    HttpClient: JwkHttpClient<JwkError> + Default + Clone + Send + Sync + 'static,
{
    pub async fn new(config: Config) -> Result<Self, JwkError> {
        let refresher = JwkRefresher {
            client: HttpClient::default(),
            url: config.url,
        };
        Ok(Self {
            keys: RefreshableValue::new(refresher).await?,
        })
    }

    /// Start reloading the key set in the background. Returns `false` if no reload was started.
    pub fn refresh(&self) -> bool {
        self.keys.refresh()
    }

    pub fn decode<T: DeserializeOwned>(&self, token: &str, options: &ValidationOptions) -> Result<TokenData<T>, JwkError> {
        let header = jsonwebtoken::decode_header(token).map_err(JwkError::Jwk)?;
        let Some(kid) = header.kid else {
            return Err(JwkError::MissingField("kid"));
        };
        let keys = self.keys.get_unchecked();
        let Some(key) = keys.value.get(&kid) else {
            tracing::debug!(%kid, "unknown key id");
            self.refresh();
            return Err(JwkError::KeyNotFound);
        };

        let mut validation = Validation::new(header.alg);
        if options.audience.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.aud = Some(options.audience.clone());
        }
        if let Some(issuer) = &options.issuer {
            validation.set_issuer(&[issuer]);
        }
        jsonwebtoken::decode(token, key, &validation).map_err(JwkError::Jwk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::Claims;
    use crate::test_utils::{MockClient, TEST_KEY_ID, sign};
    use serde_json::json;
    use std::time::{SystemTime, UNIX_EPOCH};
    use test_log::test;

    async fn client() -> JwkClient<MockClient> {
        let config = Config {
            url: "https://auth.example.com/certs".parse().unwrap(),
        };
        JwkClient::new(config).await.unwrap()
    }

    fn expires_in(secs: i64) -> i64 {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
        i64::try_from(now).unwrap() + secs
    }

    fn audience() -> ValidationOptions {
        ValidationOptions::builder()
            .audience(HashSet::from(["mindtrack".to_owned()]))
            .build()
    }

    #[test(tokio::test)]
    async fn test_decode_valid_token() {
        let client = client().await;
        let token = sign(
            &json!({"sub": "user-1", "name": "Robin", "aud": "mindtrack", "exp": expires_in(600)}),
            Some(TEST_KEY_ID),
        );
        let data = client.decode::<Claims>(&token, &audience()).unwrap();
        assert_eq!(data.claims.sub, "user-1");
        assert_eq!(data.claims.display_name(), Some("Robin"));

        let data = client.decode::<Claims>(&token, &ValidationOptions::default()).unwrap();
        assert_eq!(data.claims.sub, "user-1");
    }

    #[test(tokio::test)]
    async fn test_reject_wrong_audience() {
        let client = client().await;
        let token = sign(
            &json!({"sub": "user-1", "aud": "someone-else", "exp": expires_in(600)}),
            Some(TEST_KEY_ID),
        );
        assert!(matches!(
            client.decode::<Claims>(&token, &audience()),
            Err(JwkError::Jwk(_))
        ));
    }

    #[test(tokio::test)]
    async fn test_reject_expired() {
        let client = client().await;
        let token = sign(
            &json!({"sub": "user-1", "aud": "mindtrack", "exp": expires_in(-3600)}),
            Some(TEST_KEY_ID),
        );
        assert!(client.decode::<Claims>(&token, &audience()).is_err());
    }

    #[test(tokio::test)]
    async fn test_reject_unknown_keys() {
        let client = client().await;
        let claims = json!({"sub": "user-1", "aud": "mindtrack", "exp": expires_in(600)});

        let token = sign(&claims, None);
        assert!(matches!(
            client.decode::<Claims>(&token, &audience()),
            Err(JwkError::MissingField("kid"))
        ));

        let token = sign(&claims, Some("unknown"));
        assert!(matches!(
            client.decode::<Claims>(&token, &audience()),
            Err(JwkError::KeyNotFound)
        ));

        // encryption keys are not loaded
        let token = sign(&claims, Some("mindtrack-encryption-key"));
        assert!(matches!(
            client.decode::<Claims>(&token, &audience()),
            Err(JwkError::KeyNotFound)
        ));
    }
}
