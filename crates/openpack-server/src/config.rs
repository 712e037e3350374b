//! Server configuration.
//!
//! | Environment variable  | Description                                  |
//! |-----------------------|----------------------------------------------|
//! | `OPENPACK_BIND`       | Listen address (default `127.0.0.1:8080`)    |
//! | `OPENPACK_PUBLIC_URL` | Base URL advertised in tarball links         |
//! | `OPENPACK_TTL`        | Archive time-to-live in seconds              |
//! | `OPENPACK_TIMEOUT`    | Upstream description fetch timeout, seconds  |
//!
//! CLI flags override the environment.

use std::net::SocketAddr;

use clap::Parser;

/// npm-compatible registry that synthesizes packages from OpenAPI
/// descriptions.
#[derive(Debug, Clone, Parser)]
#[command(name = "openpack-server", version, about)]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "OPENPACK_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Externally reachable base URL advertised in manifest tarball links.
    #[arg(long, env = "OPENPACK_PUBLIC_URL", default_value = "http://127.0.0.1:8080")]
    pub public_url: String,

    /// Seconds a materialized archive stays retrievable after its manifest
    /// is served. Expiry is final; the archive is not regenerated.
    #[arg(long, env = "OPENPACK_TTL", default_value_t = 300)]
    pub ttl_secs: u64,

    /// Upstream description fetch timeout in seconds.
    #[arg(long, env = "OPENPACK_TIMEOUT", default_value_t = 10)]
    pub timeout_secs: u64,
}
