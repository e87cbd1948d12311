//! ZonePollerActor - Polls Cloudflare for every registered zone
//!
//! ## Message Flow
//!
//! ```text
//! Pass → fetch zone 1 → record → fetch zone 2 → record → ... → sleep(interval) → Pass
//!                                                                  ↑
//!                                          Commands (PollNow, Shutdown)
//! ```
//!
//! The interval is a plain sleep started after a pass completes, so the
//! schedule drifts by the duration of each pass.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::{StreamExt, stream};
use tokio::sync::{mpsc, oneshot};
use tokio::time;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    cloudflare::ZoneStatsSource, context::AppContext, metrics::ZoneMetrics, zones::ZoneRegistry,
};

use super::messages::{PassReport, PollerCommand};

/// Actor that walks the zone registry on a fixed interval and folds the
/// fetched statistics into the gauges.
pub struct ZonePollerActor {
    source: Arc<dyn ZoneStatsSource>,

    registry: ZoneRegistry,

    metrics: ZoneMetrics,

    /// Command receiver for control messages
    command_rx: mpsc::Receiver<PollerCommand>,

    /// Sleep between two passes
    interval: Duration,

    /// Zone fetches in flight during a pass
    concurrency: usize,
}

impl ZonePollerActor {
    pub fn new(context: &AppContext, command_rx: mpsc::Receiver<PollerCommand>) -> Self {
        Self {
            source: context.source.clone(),
            registry: context.registry.clone(),
            metrics: context.metrics.clone(),
            command_rx,
            interval: context.config.poll_interval().max(Duration::from_secs(1)),
            concurrency: context.config.fetch_concurrency.max(1),
        }
    }

    /// Run the actor's main loop
    ///
    /// The first pass starts immediately. The loop runs until a Shutdown
    /// command is received or every handle has been dropped.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!(
            "starting poller with interval {:?} and concurrency {}",
            self.interval, self.concurrency
        );

        let mut done: Option<oneshot::Sender<()>> = None;

        'passes: loop {
            self.run_pass().await;

            let sleep = time::sleep(self.interval);
            tokio::pin!(sleep);

            loop {
                tokio::select! {
                    _ = &mut sleep => break,

                    cmd = self.command_rx.recv() => match cmd {
                        Some(PollerCommand::PollNow { respond_to }) => {
                            debug!("received PollNow command");
                            let report = self.run_pass().await;
                            let _ = respond_to.send(report);
                        }

                        Some(PollerCommand::Shutdown { respond_to }) => {
                            debug!("received shutdown command");
                            done = Some(respond_to);
                            break 'passes;
                        }

                        None => {
                            warn!("command channel closed, shutting down");
                            break 'passes;
                        }
                    },
                }
            }
        }

        debug!("poller stopped");
        drop(self);

        if let Some(done) = done {
            let _ = done.send(());
        }
    }

    /// Fetch and record every zone once.
    ///
    /// The registry stays read-locked for the whole pass. A failing zone is
    /// logged and skipped; it does not affect the other zones. Results are
    /// recorded in registry order even when fetches overlap.
    pub async fn run_pass(&self) -> PassReport {
        let zones = self.registry.read().await;
        let mut report = PassReport::new(zones.len());

        info!("starting pass over {} zones", zones.len());

        let mut fetches = stream::iter(zones.iter().cloned())
            .map(|zone| {
                let source = Arc::clone(&self.source);
                async move {
                    let result = source.fetch_zone_stats(&zone).await;
                    (zone, result)
                }
            })
            .buffered(self.concurrency);

        while let Some((zone, result)) = fetches.next().await {
            let outcome = match result {
                Ok(groups) => self
                    .metrics
                    .record(&zone, &groups)
                    .map(|_| groups.len())
                    .map_err(|e| format!("failed to record stats: {e}")),
                Err(e) => Err(format!("{:#}", anyhow::Error::new(e))),
            };

            match outcome {
                Ok(days) => {
                    debug!(zone = %zone.tag, "recorded {days} days");
                    report.succeeded += 1;
                }
                Err(e) => {
                    error!(zone = %zone.tag, "failed to update zone stats: {e}");
                    report.failed.push((zone.tag.clone(), e));
                }
            }
        }

        info!(
            "pass finished: {} zones, {} succeeded, {} failed",
            report.zones,
            report.succeeded,
            report.failed.len()
        );

        report
    }
}

/// Handle for controlling a ZonePollerActor
///
/// Cloneable; the actor stops once every handle is dropped.
#[derive(Clone)]
pub struct PollerHandle {
    sender: mpsc::Sender<PollerCommand>,
}

impl PollerHandle {
    /// Spawn the poller as a tokio task and return its handle.
    pub fn spawn(context: &AppContext) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = ZonePollerActor::new(context, cmd_rx);

        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Run a pass now and wait for its report
    pub async fn poll_now(&self) -> Result<PassReport> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(PollerCommand::PollNow { respond_to: tx })
            .await
            .context("failed to send PollNow command")?;

        rx.await.context("failed to receive pass report")
    }

    /// Stop the poller and wait until it has exited its loop
    pub async fn shutdown(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(PollerCommand::Shutdown { respond_to: tx })
            .await
            .context("failed to send Shutdown command")?;

        rx.await.context("poller exited without acknowledging shutdown")
    }
}
