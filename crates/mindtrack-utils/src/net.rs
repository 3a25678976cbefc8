use crate::args::listen::ListenArgs;
use listenfd::ListenFd;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Bind the configured address. Without an explicit host or port a socket passed in by
/// systemfd is used when present.
pub async fn create_listener(args: &ListenArgs, default: SocketAddr) -> io::Result<TcpListener> {
    if args.host.is_none() && args.port.is_none() {
        let mut listenfd = ListenFd::from_env();
        if let Some(listener) = listenfd.take_tcp_listener(0)? {
            listener.set_nonblocking(true)?;
            tracing::trace!("using listenfd listener");
            return TcpListener::from_std(listener);
        }
    }

    let address = SocketAddr::new(
        args.host.unwrap_or_else(|| default.ip()),
        args.port.unwrap_or_else(|| default.port()),
    );
    tracing::trace!(%address, "binding listener");
    TcpListener::bind(address).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[tokio::test]
    async fn test_bind_explicit_port() {
        let args = ListenArgs {
            host: Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            port: Some(0),
        };
        let listener = create_listener(&args, SocketAddr::from((Ipv4Addr::LOCALHOST, 3030)))
            .await
            .unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }
}
