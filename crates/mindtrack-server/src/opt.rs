use clap::{Args, Parser, Subcommand};
use mindtrack_utils::args::listen::ListenArgs;
use mindtrack_utils::args::llm::LlmArgs;
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "mindtrack", about = "Journaling backend with mood analytics and a supportive assistant")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    Run(Run),
}

#[derive(Debug, Clone, Args)]
pub(crate) struct Db {
    #[arg(long, env = "DATABASE_URL", help = "sqlite://... or postgres://...")]
    pub(crate) database_url: Url,

    #[arg(long, help = "Min connections")]
    pub(crate) db_min_connections: Option<u32>,

    #[arg(long, help = "Max connections")]
    pub(crate) db_max_connections: Option<u32>,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct Auth {
    #[arg(long, env = "OIDC_ISSUER_URL", help = "Without an issuer only issued access tokens are accepted")]
    pub(crate) oidc_issuer_url: Option<Url>,

    #[arg(long = "aud", env = "OIDC_AUDIENCE", value_delimiter = ',')]
    pub(crate) audience: Vec<String>,

    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub(crate) origins: Vec<String>,
}

#[derive(Debug, Clone, Parser)]
pub(crate) struct Run {
    #[command(flatten)]
    pub(crate) listen: ListenArgs,

    #[command(flatten)]
    pub(crate) auth: Auth,

    #[command(flatten)]
    pub(crate) llm: LlmArgs,

    #[command(flatten)]
    pub(crate) db: Db,

    #[arg(long = "sentry-dsn", env = "SENTRY_DSN", help = "Sentry url")]
    pub(crate) sentry_dsn: Option<String>,

    #[arg(
        long,
        default_value = "dev",
        help = "Set the environment used by sentry and prometheus"
    )]
    pub(crate) env: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "mindtrack",
            "run",
            "--database-url",
            "sqlite://mindtrack.db?mode=rwc",
            "--aud",
            "web,mobile",
            "--port",
            "8080",
        ])
        .unwrap();
        let Commands::Run(run) = cli.command;
        assert_eq!(run.auth.audience, vec!["web".to_owned(), "mobile".to_owned()]);
        assert_eq!(run.listen.port, Some(8080));
        assert!(run.auth.oidc_issuer_url.is_none());
        assert_eq!(run.env, "dev");
    }
}
