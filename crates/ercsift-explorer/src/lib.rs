//! # ercsift-explorer
//!
//! Network side of ercsift:
//!
//! - [`EtherscanClient`]: verified source and transaction history from an
//!   Etherscan-compatible explorer, behind the [`ExplorerApi`] trait
//! - [`CodeFetcher`]: deployed bytecode via JSON-RPC `eth_getCode`
//!
//! Every call is paced by a token bucket and retried with exponential
//! backoff when the failure is transient (see [`policy`]).

pub mod api;
pub mod client;
pub mod error;
pub mod jsonrpc;
pub mod policy;
pub mod rpc;
pub mod types;

pub use api::ExplorerApi;
pub use client::{
    EtherscanClient, ExplorerConfig, DEFAULT_CHAIN_ID, DEFAULT_EXPLORER_URL, TXLIST_PAGE_LIMIT,
};
pub use error::ExplorerError;
pub use policy::{RateLimiter, RateLimiterConfig, RetryConfig, RetryPolicy};
pub use rpc::{has_code, CodeFetcher, DEFAULT_RPC_URL};
pub use types::{SourceRecord, TxRecord};
