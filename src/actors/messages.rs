//! Message types for the poller actor

use tokio::sync::oneshot;

/// Commands that can be sent to a ZonePollerActor
#[derive(Debug)]
pub enum PollerCommand {
    /// Run a pass immediately, without touching the sleep in progress
    ///
    /// Used for testing and manual refresh operations.
    PollNow {
        /// Channel to send the pass result back
        respond_to: oneshot::Sender<PassReport>,
    },

    /// Stop the poller
    ///
    /// A pass in flight is finished first. `respond_to` fires once the actor
    /// has left its loop.
    Shutdown { respond_to: oneshot::Sender<()> },
}

/// Outcome of one pass over the zone registry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    /// Zones in the registry when the pass started
    pub zones: usize,

    /// Zones fetched and recorded successfully
    pub succeeded: usize,

    /// Zones that failed, as (zone tag, error message)
    pub failed: Vec<(String, String)>,
}

impl PassReport {
    pub fn new(zones: usize) -> Self {
        Self {
            zones,
            ..Default::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
