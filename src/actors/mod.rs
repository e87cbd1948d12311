//! Actor-based polling
//!
//! The poller runs as an independent async task controlled through a command
//! channel, the same way every long-running loop in this crate is built.
//!
//! ```text
//!   PollerHandle ──(PollNow, Shutdown)──▶ ZonePollerActor
//!                                             │ per pass
//!                                             ▼
//!                        ZoneRegistry ──▶ ZoneStatsSource ──▶ ZoneMetrics
//! ```
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: the actor owns an mpsc command channel
//! 2. **Request/Response**: oneshot channels for pass reports and the
//!    shutdown acknowledgement

pub mod messages;
pub mod poller;

pub use messages::{PassReport, PollerCommand};
pub use poller::{PollerHandle, ZonePollerActor};
