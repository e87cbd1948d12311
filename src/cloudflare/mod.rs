//! Cloudflare API access
//!
//! Two call shapes are used:
//!
//! - `GET {base}/zones?per_page=500` to discover the zones of the account
//! - `POST {base}/graphql` to query daily request statistics of one zone
//!
//! Both authenticate with `Authorization: Bearer {token}`.

pub mod client;
pub mod error;
pub mod query;

pub use client::{CloudflareClient, ZoneStatsSource};
pub use error::{DiscoveryError, FetchError};
pub use query::ZoneRecord;
