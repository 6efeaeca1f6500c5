//! `CodeFetcher`: deployed bytecode over `eth_getCode`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::ExplorerError;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::policy::{with_retry, RetryConfig, RetryPolicy};

pub const DEFAULT_RPC_URL: &str = "https://cloudflare-eth.com/";

/// `true` unless the node reported an account without code.
pub fn has_code(bytecode: &str) -> bool {
    !matches!(bytecode.trim(), "" | "0x" | "0x0")
}

/// JSON-RPC client for one node endpoint.
pub struct CodeFetcher {
    client: Client,
    url: String,
    next_id: AtomicU64,
    retry: RetryPolicy,
}

impl CodeFetcher {
    pub fn new(url: impl Into<String>) -> Result<Self, ExplorerError> {
        Self::with_retry(url, RetryConfig::default())
    }

    pub fn with_retry(url: impl Into<String>, retry: RetryConfig) -> Result<Self, ExplorerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("ercsift/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
            retry: RetryPolicy::new(retry),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Bytecode at `address` on the latest block, `"0x"` when there is none.
    pub async fn get_code(&self, address: &str) -> Result<String, ExplorerError> {
        with_retry(&self.retry, "eth_getCode", address, || self.get_code_once(address)).await
    }

    async fn get_code_once(&self, address: &str) -> Result<String, ExplorerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::new(
            id,
            "eth_getCode",
            vec![Value::String(address.to_string()), Value::String("latest".into())],
        );

        let resp = self.client.post(&self.url).json(&req).send().await?;
        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ExplorerError::RateLimited {
                provider: self.url.clone(),
                message: "HTTP 429".into(),
            });
        }
        if !status.is_success() {
            return Err(ExplorerError::Network(format!("HTTP {status}")));
        }

        let body = resp.text().await?;
        let parsed: JsonRpcResponse =
            serde_json::from_str(&body).map_err(|e| ExplorerError::MalformedResponse {
                endpoint: self.url.clone(),
                reason: e.to_string(),
            })?;
        let value = parsed.into_result().map_err(|e| ExplorerError::Rpc {
            code: e.code,
            message: e.message,
        })?;
        match value {
            Value::String(code) => Ok(code),
            Value::Null => Ok("0x".into()),
            other => Err(ExplorerError::MalformedResponse {
                endpoint: self.url.clone(),
                reason: format!("expected hex string, got {other}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_code_variants() {
        assert!(!has_code("0x"));
        assert!(!has_code("0x0"));
        assert!(!has_code(""));
        assert!(has_code("0x6080"));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn weth_has_code() {
        let fetcher = CodeFetcher::new(DEFAULT_RPC_URL).unwrap();
        let code = fetcher
            .get_code("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2")
            .await
            .unwrap();
        assert!(has_code(&code));
    }
}
