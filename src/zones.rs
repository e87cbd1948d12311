//! Zone registry and discovery
//!
//! The registry holds the zones the poll loop iterates over. It is populated
//! once at startup by [`discover_zones`] and read by every pass afterwards.
//! Readers take a shared lock for a whole pass, discovery takes the exclusive
//! lock to swap the contents.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info, instrument};

use crate::Zone;
use crate::cloudflare::{DiscoveryError, ZoneStatsSource};

/// Shared, ordered set of monitored zones
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: Arc<RwLock<Vec<Zone>>>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared access to the zones, held until the guard is dropped
    pub async fn read(&self) -> RwLockReadGuard<'_, Vec<Zone>> {
        self.zones.read().await
    }

    /// Replace the registry contents wholesale
    pub async fn replace(&self, zones: Vec<Zone>) {
        let mut guard = self.zones.write().await;
        *guard = zones;
    }

    pub async fn snapshot(&self) -> Vec<Zone> {
        self.zones.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.zones.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.zones.read().await.is_empty()
    }
}

/// List the account's zones, keep the active ones and install them in the
/// registry.
///
/// The registry is left untouched on any error.
#[instrument(skip_all)]
pub async fn discover_zones(
    source: &dyn ZoneStatsSource,
    registry: &ZoneRegistry,
) -> Result<Vec<Zone>, DiscoveryError> {
    let records = source.list_zones().await?;
    let total = records.len();

    let zones: Vec<Zone> = records
        .into_iter()
        .filter(|record| record.is_active())
        .map(|record| Zone::new(record.name, record.id))
        .collect();

    debug!("{} of {total} listed zones are active", zones.len());

    if zones.is_empty() {
        return Err(DiscoveryError::NoActiveZones);
    }

    info!("found {} active zones", zones.len());

    registry.replace(zones.clone()).await;

    Ok(zones)
}
