use std::net::Ipv4Addr;
use std::str::FromStr;

fn env_or<T: FromStr + Copy>(key: &str, default: T) -> T {
    let from_env = std::env::var(key);
    from_env.map_or(default, |res| res.parse().unwrap_or(default))
}

const EXPORTER_PORT: &str = "EXPORTER_PORT";

const DEFAULT_PORT: u16 = 28191;

pub fn get_default_port() -> u16 {
    DEFAULT_PORT
}

pub fn get_port() -> u16 {
    env_or(EXPORTER_PORT, DEFAULT_PORT)
}

const EXPORTER_ADDR: &str = "EXPORTER_ADDR";

const DEFAULT_ADDR: Ipv4Addr = Ipv4Addr::new(0, 0, 0, 0);

pub fn get_default_addr() -> Ipv4Addr {
    DEFAULT_ADDR
}

pub fn get_addr() -> Ipv4Addr {
    env_or(EXPORTER_ADDR, DEFAULT_ADDR)
}

const CLOUDFLARE_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";

/// The token is not validated here. A missing token only shows up as
/// authentication errors on the first remote call.
pub fn get_api_token() -> Option<String> {
    std::env::var(CLOUDFLARE_API_TOKEN)
        .ok()
        .filter(|token| !token.is_empty())
}

const CLOUDFLARE_API_BASE: &str = "CLOUDFLARE_API_BASE";

pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

pub fn get_default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

pub fn get_api_base() -> String {
    std::env::var(CLOUDFLARE_API_BASE).unwrap_or_else(|_| get_default_api_base())
}

const CLOUDFLARE_GRAPHQL_URL: &str = "CLOUDFLARE_GRAPHQL_URL";

pub fn get_graphql_url() -> Option<String> {
    std::env::var(CLOUDFLARE_GRAPHQL_URL).ok()
}

const POLL_INTERVAL_SECS: &str = "POLL_INTERVAL_SECS";

const DEFAULT_POLL_INTERVAL_SECS: u64 = 5 * 60;

pub fn get_default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

pub fn get_poll_interval() -> u64 {
    env_or(POLL_INTERVAL_SECS, DEFAULT_POLL_INTERVAL_SECS).max(1)
}

const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub fn get_default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

pub fn get_http_timeout() -> u64 {
    env_or(HTTP_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS).max(1)
}

const FETCH_CONCURRENCY: &str = "FETCH_CONCURRENCY";

const DEFAULT_FETCH_CONCURRENCY: usize = 1;

pub fn get_default_fetch_concurrency() -> usize {
    DEFAULT_FETCH_CONCURRENCY
}

pub fn get_fetch_concurrency() -> usize {
    env_or(FETCH_CONCURRENCY, DEFAULT_FETCH_CONCURRENCY).max(1)
}

const LOG_LEVEL: &str = "LOG_LEVEL";

pub fn get_log_level() -> tracing::Level {
    env_or(LOG_LEVEL, tracing::Level::INFO)
}
