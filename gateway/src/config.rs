use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Serve the route planner client and relay routing calls to the routing service"
)]
pub struct GatewayConfig {
    /// Address to listen on
    #[arg(long, env = "GATEWAY_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Base URL of the routing service (serves /api/route and /download_gpx)
    #[arg(long, env = "ROUTING_UPSTREAM", default_value = "http://127.0.0.1:5000")]
    pub upstream: String,

    /// Directory holding the built client (index.html, pkg/, route_map.js)
    #[arg(long, env = "STATIC_DIR", default_value = "frontend/dist")]
    pub static_dir: PathBuf,

    /// Upper bound on one upstream call, in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
