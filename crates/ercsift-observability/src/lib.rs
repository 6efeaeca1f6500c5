//! # ercsift-observability
//!
//! `tracing` subscriber setup shared by the ercsift binaries.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
