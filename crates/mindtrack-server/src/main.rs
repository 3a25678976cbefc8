use crate::app::AuthConfig;
use crate::opt::{Commands, Db, Run};
use anyhow::Result;
use axum::serve;
use clap::Parser;
use mindtrack_core::llm::config::LlmConfig;
use mindtrack_core::llm::{CompletionService, OpenAiCompletion};
use mindtrack_db::migration;
use mindtrack_db::sea_orm::{ConnectOptions, Database};
use mindtrack_utils::net::create_listener;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

mod app;
mod auth;
mod opt;
mod routes;
mod user;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 3030;

pub(crate) struct InnerAppConfig {
    llm_config: LlmConfig,
    completion: Arc<dyn CompletionService>,
}

#[derive(Clone)]
pub(crate) struct AppConfig(Arc<InnerAppConfig>);

impl AppConfig {
    fn new(llm_config: LlmConfig, completion: Arc<dyn CompletionService>) -> Self {
        Self(Arc::new(InnerAppConfig { llm_config, completion }))
    }

    pub fn llm_config(&self) -> &LlmConfig {
        &self.0.llm_config
    }

    pub fn completion(&self) -> &Arc<dyn CompletionService> {
        &self.0.completion
    }
}

async fn run(opt: Run) -> Result<()> {
    let _guard = mindtrack_utils::tracing::setup(
        mindtrack_utils::tracing::TracingConfig::builder()
            .package(env!("CARGO_PKG_NAME"))
            .version(env!("CARGO_PKG_VERSION"))
            .sentry_dsn(opt.sentry_dsn)
            .env(opt.env.clone())
            .build(),
    )?;

    let seaorm_pool = Database::connect(build_connect_options(&opt.db)).await?;
    migration::run(&seaorm_pool)
        .await
        .inspect_err(|error| tracing::error!(error = error as &dyn std::error::Error, "failed to run migrations"))?;

    let llm_config: LlmConfig = opt.llm.into();
    let completion = OpenAiCompletion::new(&llm_config)?;
    let app_config = AppConfig::new(llm_config, Arc::new(completion));

    let auth_config = match &opt.auth.oidc_issuer_url {
        Some(issuer_url) => Some(AuthConfig::discover(issuer_url, opt.auth.audience.clone()).await?),
        None => {
            tracing::warn!("no oidc issuer configured, only issued access tokens are accepted");
            None
        }
    };

    let app = app::create_app(app_config, auth_config, &opt.auth.origins, seaorm_pool)?;

    let listener = create_listener(&opt.listen, SocketAddr::new(DEFAULT_HOST, DEFAULT_PORT)).await?;

    let service = app.into_make_service();
    tracing::info!(local_addr = %listener.local_addr()?, "starting app");
    serve::serve(listener, service).await?;
    Ok(())
}

fn build_connect_options(db_options: &Db) -> ConnectOptions {
    let mut seaorm_pool_options = ConnectOptions::new(db_options.database_url.clone());
    if let Some(min_connections) = db_options.db_min_connections {
        seaorm_pool_options.min_connections(min_connections);
    }
    if let Some(max_connections) = db_options.db_max_connections {
        seaorm_pool_options.max_connections(max_connections);
    }
    seaorm_pool_options.sqlx_logging_level(log::LevelFilter::Debug);
    seaorm_pool_options
}

fn main() -> Result<()> {
    unsafe { env::set_var("RUST_BACKTRACE", "1") };

    let main = async {
        let opt = opt::Cli::parse();

        match opt.command {
            Commands::Run(o) => run(o).await?,
        }
        Ok(())
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(main)
}

#[cfg(test)]
pub(crate) mod test_app {
    use crate::AppConfig;
    use crate::app::{AuthConfig, create_router};
    use axum::Router;
    use axum::body::Body;
    use http::{Request, Response, header};
    use mindtrack_core::llm::config::LlmConfig;
    use mindtrack_core::test_utils::StaticCompletion;
    use mindtrack_db::sea_orm::DatabaseConnection;
    use mindtrack_db::{access_tokens, user};
    use mindtrack_test_helpers::SqliteDb;
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    /// A router over a fresh sqlite database with a signed in user.
    pub(crate) struct TestApp {
        // Keeps the database file alive
        _db: SqliteDb,
        pub(crate) conn: DatabaseConnection,
        pub(crate) completion: StaticCompletion,
        pub(crate) router: Router,
        pub(crate) user_id: Uuid,
        pub(crate) token: String,
    }

    impl TestApp {
        pub(crate) async fn new(completion: StaticCompletion) -> Self {
            Self::with_auth(completion, None).await
        }

        pub(crate) async fn with_auth(completion: StaticCompletion, auth_config: Option<AuthConfig>) -> Self {
            let db = SqliteDb::new().unwrap();
            let conn = db.connect().await.unwrap();
            let app_config = AppConfig::new(LlmConfig::builder().build(), Arc::new(completion.clone()));
            let router = create_router(app_config, auth_config, &[], conn.clone()).unwrap();
            let (user_id, token) = sign_in(&conn, "test-subject").await;
            Self {
                _db: db,
                conn,
                completion,
                router,
                user_id,
                token,
            }
        }

        pub(crate) async fn request(&self, request: Request<Body>) -> Response<Body> {
            self.router.clone().oneshot(request).await.unwrap()
        }

        pub(crate) fn get(&self, uri: &str) -> Request<Body> {
            Request::get(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
                .body(Body::empty())
                .unwrap()
        }

        pub(crate) fn post_json(&self, uri: &str, body: serde_json::Value) -> Request<Body> {
            Request::post(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        }
    }

    pub(crate) async fn sign_in(conn: &DatabaseConnection, subject: &str) -> (Uuid, String) {
        let user = user::Mutation::create_or_update_user(conn, subject, Some("Robin".to_owned()))
            .await
            .unwrap();
        let token = access_tokens::Mutation::create_access_token(conn, user.id).await.unwrap();
        (user.id, token.access_token)
    }

    pub(crate) async fn body_string(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    pub(crate) async fn body_json<T: DeserializeOwned>(response: Response<Body>) -> T {
        serde_json::from_str(&body_string(response).await).unwrap()
    }
}
