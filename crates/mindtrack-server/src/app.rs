use crate::{AppConfig, routes};
use axum::routing::get;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayerBuilder;
use http::{HeaderValue, Method, header};
use mindtrack_oidc::{DefaultJwkClient, DefaultOidcConfig, ValidationOptions};
use sea_orm::DatabaseConnection;
use sentry_tower::NewSentryLayer;
use std::sync::Arc;
use std::time::Duration;
use tokio::{task, time};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use url::Url;

pub(crate) struct InnerAuthConfig {
    jwk_client: Arc<DefaultJwkClient>,
    validation: ValidationOptions,
}

impl InnerAuthConfig {
    pub(crate) fn jwk(&self) -> &DefaultJwkClient {
        &self.jwk_client
    }

    pub(crate) fn validation(&self) -> &ValidationOptions {
        &self.validation
    }
}

#[derive(Clone)]
pub(crate) struct AuthConfig(Arc<InnerAuthConfig>);

impl AuthConfig {
    /// Load the key set of the issuer and keep it fresh in the background.
    pub(crate) async fn discover(issuer_url: &Url, audience: Vec<String>) -> anyhow::Result<Self> {
        let config = DefaultOidcConfig::from_issuer_url(issuer_url).await?.build();
        let jwk_client = Arc::new(DefaultJwkClient::new(config.into()).await?);

        let refresh_jwk_client = Arc::clone(&jwk_client);
        task::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                if refresh_jwk_client.refresh() {
                    tracing::debug!("refreshing jwk set");
                }
            }
        });

        tracing::info!(audiences = ?audience, %issuer_url, "allowing audiences");
        let validation = ValidationOptions::builder()
            .audience(audience.into_iter().collect())
            .issuer(issuer_url.as_str().trim_end_matches('/'))
            .build();

        Ok(Self(Arc::new(InnerAuthConfig { jwk_client, validation })))
    }
}

impl AsRef<InnerAuthConfig> for AuthConfig {
    fn as_ref(&self) -> &InnerAuthConfig {
        &self.0
    }
}

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| origin.parse())
        .collect::<Result<Vec<HeaderValue>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ORIGIN,
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .expose_headers([header::CONTENT_DISPOSITION])
        .max_age(Duration::from_secs(3600)))
}

/// All routes of the service. Without an [`AuthConfig`] only issued access tokens are accepted.
pub(crate) fn create_router(
    app_config: AppConfig,
    auth_config: Option<AuthConfig>,
    origins: &[String],
    seaorm_pool: DatabaseConnection,
) -> anyhow::Result<Router> {
    let mut service = Router::new()
        .merge(routes::swagger::create_router())
        .merge(routes::login::create_router())
        .nest(
            "/api/v0",
            Router::new()
                .nest("/status", routes::api::v0::status::create_router())
                .nest("/user", routes::api::v0::user::create_router())
                .nest("/journal", routes::api::v0::journal::create_router())
                .nest("/chat", routes::api::v0::chat::create_router()),
        )
        .layer(cors_layer(origins)?)
        .layer(Extension(app_config))
        .layer(Extension(seaorm_pool));

    if let Some(auth_config) = auth_config {
        service = service.layer(Extension(auth_config));
    }
    Ok(service)
}

pub(crate) fn create_app(
    app_config: AppConfig,
    auth_config: Option<AuthConfig>,
    origins: &[String],
    seaorm_pool: DatabaseConnection,
) -> anyhow::Result<Router> {
    let (prometheus_layer, metric_handle) = PrometheusMetricLayerBuilder::new()
        .with_prefix("api")
        .with_default_metrics()
        .build_pair();

    let app = create_router(app_config, auth_config, origins, seaorm_pool)?
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(
            // Router layers are called bottom to top
            // ServiceBuilder layers are called top to bottom
            ServiceBuilder::new()
                .layer(NewSentryLayer::new_from_top())
                .layer(sentry_tower::SentryHttpLayer::with_transaction())
                .layer(prometheus_layer),
        );
    Ok(app)
}
