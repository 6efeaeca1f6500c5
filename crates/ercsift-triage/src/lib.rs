//! # ercsift-triage
//!
//! Decides which classified contracts deserve a closer look and archives
//! their verified source.
//!
//! - [`qualifies`]: pure activity filter (count and recency thresholds)
//! - [`SourceStore`]: collision-free `.sol` storage
//! - [`fetch_and_store`]: one explorer lookup plus one store write
//! - [`TriagePipeline`]: all of the above over many addresses, with bounded
//!   concurrency, per-item failure isolation and cooperative shutdown

pub mod activity;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod store;

pub use activity::{qualifies, TriageConfig};
pub use error::{StoreError, TriageError};
pub use pipeline::{fetch_and_store, AddressState, FetchOutcome, TriagePipeline, NO_SOURCE};
pub use report::{AddressOutcome, AddressReport, Stage, Summary, TriageReport};
pub use store::SourceStore;
