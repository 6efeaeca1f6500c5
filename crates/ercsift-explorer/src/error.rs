//! Explorer and RPC error types.

use thiserror::Error;

/// Errors returned by explorer and JSON-RPC lookups.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Connection refused, timeout, non-success HTTP status.
    #[error("network error: {0}")]
    Network(String),

    /// Body could not be parsed as the expected JSON shape.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// Explorer answered `status != "1"`.
    #[error("explorer rejected request: {message} ({result})")]
    UpstreamRejected { message: String, result: String },

    /// HTTP 429 or an explorer rate-limit message.
    #[error("rate limited by {provider}: {message}")]
    RateLimited { provider: String, message: String },

    /// Contract has no verified source.
    #[error("no verified source for {address}")]
    NoSourceAvailable { address: String },

    /// JSON-RPC error object returned by the node.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}

impl ExplorerError {
    /// Returns `true` if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::RateLimited { .. })
    }

    /// Transport failures and unparsable bodies both count as network errors.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::MalformedResponse { .. })
    }

    /// Short stable label for reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) | Self::MalformedResponse { .. } => "network",
            Self::UpstreamRejected { .. } => "upstream-rejected",
            Self::RateLimited { .. } => "rate-limited",
            Self::NoSourceAvailable { .. } => "no-source",
            Self::Rpc { .. } => "rpc",
        }
    }
}

impl From<reqwest::Error> for ExplorerError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}
