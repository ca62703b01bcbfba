use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding the listener or serving on it failed.
    #[error("gRPC transport error on {addr}")]
    Transport {
        addr: SocketAddr,
        #[source]
        source: tonic::transport::Error,
    },
}

impl ServerError {
    pub fn transport(addr: SocketAddr, source: tonic::transport::Error) -> Self {
        Self::Transport { addr, source }
    }
}
