//! Gauge table exposed on the metrics endpoint
//!
//! Three gauge families are kept in a private Prometheus registry. Every
//! write overwrites the value of its label tuple; nothing is ever removed, so
//! series of past dates stay reported until the process restarts.

use std::sync::Arc;

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use tracing::trace;

use crate::{DailyStatGroup, Zone};

pub const ZONE_TAG_LABEL: &str = "zone_tag";
pub const DATE_LABEL: &str = "date";
pub const STATUS_CODE_LABEL: &str = "status_code";

/// The gauge families published by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeFamily {
    /// Total requests, labelled `zone_tag`, `date`
    Requests,
    /// Cached requests, labelled `zone_tag`, `date`
    CachedRequests,
    /// Requests per edge status, labelled `zone_tag`, `date`, `status_code`
    StatusCodeRequests,
}

impl GaugeFamily {
    pub fn name(&self) -> &'static str {
        match self {
            GaugeFamily::Requests => "cloudflare_zone_requests_total",
            GaugeFamily::CachedRequests => "cloudflare_zone_cached_requests_total",
            GaugeFamily::StatusCodeRequests => "cloudflare_zone_status_code_requests_total",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            GaugeFamily::Requests => "Total requests per zone (GraphQL 1dGroups API)",
            GaugeFamily::CachedRequests => "Cached requests per zone (GraphQL 1dGroups API)",
            GaugeFamily::StatusCodeRequests => "Requests per zone by HTTP status code",
        }
    }

    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            GaugeFamily::Requests | GaugeFamily::CachedRequests => &[ZONE_TAG_LABEL, DATE_LABEL],
            GaugeFamily::StatusCodeRequests => &[ZONE_TAG_LABEL, DATE_LABEL, STATUS_CODE_LABEL],
        }
    }
}

/// Per-zone traffic gauges
///
/// Cloning is cheap and every clone writes into the same registry.
#[derive(Clone)]
pub struct ZoneMetrics {
    registry: Arc<Registry>,
    requests: GaugeVec,
    cached_requests: GaugeVec,
    status_code_requests: GaugeVec,
}

impl ZoneMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = Self::gauge_vec(GaugeFamily::Requests)?;
        let cached_requests = Self::gauge_vec(GaugeFamily::CachedRequests)?;
        let status_code_requests = Self::gauge_vec(GaugeFamily::StatusCodeRequests)?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(cached_requests.clone()))?;
        registry.register(Box::new(status_code_requests.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests,
            cached_requests,
            status_code_requests,
        })
    }

    fn gauge_vec(family: GaugeFamily) -> Result<GaugeVec, prometheus::Error> {
        GaugeVec::new(Opts::new(family.name(), family.help()), family.labels())
    }

    fn family(&self, family: GaugeFamily) -> &GaugeVec {
        match family {
            GaugeFamily::Requests => &self.requests,
            GaugeFamily::CachedRequests => &self.cached_requests,
            GaugeFamily::StatusCodeRequests => &self.status_code_requests,
        }
    }

    /// Overwrite the gauge identified by `family` and `labels`.
    ///
    /// Fails if the number of label values does not match the family.
    pub fn set_gauge(
        &self,
        family: GaugeFamily,
        labels: &[&str],
        value: f64,
    ) -> Result<(), prometheus::Error> {
        self.family(family)
            .get_metric_with_label_values(labels)?
            .set(value);
        Ok(())
    }

    /// Fold the daily groups of one zone into the gauges.
    pub fn record(&self, zone: &Zone, groups: &[DailyStatGroup]) -> Result<(), prometheus::Error> {
        for group in groups {
            let date = group.date.as_str();
            let key = [zone.tag.as_str(), date];

            self.set_gauge(GaugeFamily::Requests, &key, group.total_requests)?;
            self.set_gauge(GaugeFamily::CachedRequests, &key, group.cached_requests)?;

            for status in &group.status_breakdown {
                if status.status_code.is_empty() {
                    continue;
                }
                self.set_gauge(
                    GaugeFamily::StatusCodeRequests,
                    &[zone.tag.as_str(), date, status.status_code.as_str()],
                    status.requests,
                )?;
            }
        }

        trace!("recorded {} daily groups for {}", groups.len(), zone.tag);
        Ok(())
    }

    /// Current value of a gauge, without creating the series if it is absent.
    pub fn gauge_value(&self, family: GaugeFamily, labels: &[&str]) -> Option<f64> {
        let names = family.labels();
        if names.len() != labels.len() {
            return None;
        }

        self.registry
            .gather()
            .into_iter()
            .find(|mf| mf.get_name() == family.name())?
            .get_metric()
            .iter()
            .find(|metric| {
                metric.get_label().iter().all(|pair| {
                    names
                        .iter()
                        .position(|name| *name == pair.get_name())
                        .is_some_and(|idx| labels[idx] == pair.get_value())
                })
            })
            .map(|metric| metric.get_gauge().get_value())
    }

    /// Number of series currently held by a family
    pub fn series_count(&self, family: GaugeFamily) -> usize {
        self.registry
            .gather()
            .iter()
            .find(|mf| mf.get_name() == family.name())
            .map_or(0, |mf| mf.get_metric().len())
    }

    /// Render every family in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
