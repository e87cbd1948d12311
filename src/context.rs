//! Application context shared by discovery, the poller and the metrics endpoint

use std::sync::Arc;

use anyhow::Context;

use crate::{
    Zone,
    cloudflare::{CloudflareClient, DiscoveryError, ZoneStatsSource},
    config::Config,
    metrics::ZoneMetrics,
    zones::{ZoneRegistry, discover_zones},
};

/// Everything the exporter needs at runtime, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,

    /// Remote API (the Cloudflare client in production)
    pub source: Arc<dyn ZoneStatsSource>,

    pub registry: ZoneRegistry,

    pub metrics: ZoneMetrics,
}

impl AppContext {
    pub fn new(config: Config, source: Arc<dyn ZoneStatsSource>) -> anyhow::Result<Self> {
        let metrics = ZoneMetrics::new().context("failed to register gauge families")?;

        Ok(Self {
            config,
            source,
            registry: ZoneRegistry::new(),
            metrics,
        })
    }

    /// Build a context talking to the real Cloudflare API.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let client = CloudflareClient::new(&config).context("failed to build HTTP client")?;
        Self::new(config, Arc::new(client))
    }

    pub async fn discover_zones(&self) -> Result<Vec<Zone>, DiscoveryError> {
        discover_zones(self.source.as_ref(), &self.registry).await
    }
}
