//! # ercsift-classify
//!
//! Labels contract bytecode with the standards whose function selectors all
//! appear in it.
//!
//! ```text
//! bytecode ──normalize──► lowercase hex ──MatchStrategy──► [ERC20, ERC165, ...]
//! ```
//!
//! [`classify`] handles one contract; [`BatchEngine`] fans a list out over
//! Rayon and keeps the input order.

pub mod classifier;
pub mod engine;
pub mod error;
pub mod request;
pub mod strategy;

pub use classifier::{classify, normalize, Classifier, Matches};
pub use engine::{classify_all, BatchEngine};
pub use error::BatchError;
pub use request::{BatchRequest, ContractCode};
pub use strategy::{MatchStrategy, SubstringMatch};
