//! # ercsift-core
//!
//! Signature registry and shared types for ercsift.
//!
//! A [`StandardDefinition`] derives function selectors and event topics from
//! canonical signature strings; a [`SignatureRegistry`] is the ordered,
//! read-only collection the classifier matches against. Registries come from
//! the bundled [`catalog`], from explicit registration, or from a JSON
//! [`config`] file.

pub mod catalog;
pub mod config;
pub mod error;
pub mod registry;
pub mod signature;
pub mod standard;
pub mod types;

pub use error::RegistryError;
pub use registry::SignatureRegistry;
pub use signature::{keccak256, selector, topic, Selector, Topic};
pub use standard::StandardDefinition;
pub use types::{ActivityRecord, ClassificationResult, SourceArtifact, DEFAULT_PREVIEW_LEN};
