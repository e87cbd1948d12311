use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use tracing::trace;

use crate::util;

/// Runtime configuration of the exporter.
///
/// Built from the environment first; an optional JSON file may override any
/// field except the API token.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the Cloudflare API (not validated upfront)
    pub api_token: Option<String>,

    /// Base URL of the Cloudflare REST API
    pub api_base: String,

    /// GraphQL endpoint (defaults to `{api_base}/graphql`)
    pub graphql_url: Option<String>,

    /// Address the metrics endpoint binds to
    pub addr: IpAddr,

    /// Port the metrics endpoint binds to
    pub port: u16,

    /// Seconds to sleep between two passes
    pub interval: u64,

    /// Timeout for every outbound HTTP request, in seconds
    pub http_timeout: u64,

    /// Number of zone fetches in flight during a pass (1 = sequential)
    pub fetch_concurrency: usize,
}

/// Overrides read from a JSON config file.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub api_base: Option<String>,
    pub graphql_url: Option<String>,
    pub addr: Option<IpAddr>,
    pub port: Option<u16>,
    pub interval: Option<u64>,
    pub http_timeout: Option<u64>,
    pub fetch_concurrency: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            api_base: util::get_default_api_base(),
            graphql_url: None,
            addr: IpAddr::V4(util::get_default_addr()),
            port: util::get_default_port(),
            interval: util::get_default_poll_interval(),
            http_timeout: util::get_default_http_timeout(),
            fetch_concurrency: util::get_default_fetch_concurrency(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_token: util::get_api_token(),
            api_base: util::get_api_base(),
            graphql_url: util::get_graphql_url(),
            addr: IpAddr::V4(util::get_addr()),
            port: util::get_port(),
            interval: util::get_poll_interval(),
            http_timeout: util::get_http_timeout(),
            fetch_concurrency: util::get_fetch_concurrency(),
        }
    }

    pub fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(api_base) = file.api_base {
            self.api_base = api_base;
        }
        if let Some(graphql_url) = file.graphql_url {
            self.graphql_url = Some(graphql_url);
        }
        if let Some(addr) = file.addr {
            self.addr = addr;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(interval) = file.interval {
            self.interval = interval.max(1);
        }
        if let Some(http_timeout) = file.http_timeout {
            self.http_timeout = http_timeout.max(1);
        }
        if let Some(fetch_concurrency) = file.fetch_concurrency {
            self.fetch_concurrency = fetch_concurrency.max(1);
        }
        self
    }

    pub fn graphql_url(&self) -> String {
        self.graphql_url
            .clone()
            .unwrap_or_else(|| format!("{}/graphql", self.api_base.trim_end_matches('/')))
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.addr, self.port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }
}

pub fn read_config_file(path: impl AsRef<Path>) -> anyhow::Result<ConfigFile> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|e| anyhow::anyhow!("Invalid configuration file provided: {e}"))
        .inspect(|config| trace!("loaded config file: {config:?}"))
}
