use std::net::SocketAddr;

use serde::Deserialize;

/// Configuration of the front door exposing the DA interface to rollup nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Address to listen on.
    #[serde(alias = "grpc_server_address")]
    pub bind_address: SocketAddr,
}
