use clap::Args;
use std::net::IpAddr;

#[derive(Debug, Clone, Default, Args)]
pub struct ListenArgs {
    #[arg(long, env = "MINDTRACK_HOST")]
    pub host: Option<IpAddr>,

    #[arg(short, long, env = "MINDTRACK_PORT")]
    pub port: Option<u16>,
}
