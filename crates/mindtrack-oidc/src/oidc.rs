use crate::jwks::{Config, JwkError, JwkHttpClient};
use reqwest::Client;
use serde::Deserialize;
use std::marker::PhantomData;
use typed_builder::TypedBuilder;
use url::Url;

#[derive(Deserialize, Debug)]
pub struct OidcWellKnown {
    jwks_uri: Url,
}

#[derive(Debug, TypedBuilder)]
pub struct OidcConfig<C = Client> {
    jwk_set_url: Url,
    #[builder(default)]
    _client: PhantomData<C>,
}

pub type DefaultOidcConfig = OidcConfig<Client>;

fn discovery_url(issuer_url: &Url) -> Result<Url, JwkError> {
    let mut base = issuer_url.clone();
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    Ok(base.join(".well-known/openid-configuration")?)
}

impl<C> OidcConfig<C>
where
    C: JwkHttpClient<JwkError> + Default,
{
    pub async fn builder_from_discovery_url(
        discovery_url: Url,
    ) -> Result<OidcConfigBuilder<C, ((Url,), ())>, JwkError> {
        let client = C::default();

        tracing::debug!(%discovery_url, "loading openid configuration");
        let oidc_config: OidcWellKnown = client.get(discovery_url).await?;
        Ok(Self::builder().jwk_set_url(oidc_config.jwks_uri))
    }

    pub async fn from_issuer_url(issuer_url: &Url) -> Result<OidcConfigBuilder<C, ((Url,), ())>, JwkError> {
        Self::builder_from_discovery_url(discovery_url(issuer_url)?).await
    }
}

impl<C> From<OidcConfig<C>> for Config {
    fn from(config: OidcConfig<C>) -> Self {
        Self {
            url: config.jwk_set_url,
        }
    }
}
