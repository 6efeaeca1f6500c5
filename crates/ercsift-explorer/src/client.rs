//! `EtherscanClient`: HTTP client for Etherscan-compatible explorer APIs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::api::ExplorerApi;
use crate::error::ExplorerError;
use crate::policy::{with_retry, RateLimiter, RateLimiterConfig, RetryConfig, RetryPolicy};
use crate::types::{parse_records, Envelope, SourceRecord, TxRecord, NO_TRANSACTIONS};

pub const DEFAULT_EXPLORER_URL: &str = "https://api.etherscan.io/v2/api";

/// Ethereum mainnet.
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Most records `txlist` returns for one query.
pub const TXLIST_PAGE_LIMIT: usize = 10_000;

/// Explorer client configuration.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Etherscan-compatible API base, e.g. `https://api.etherscan.io/v2/api`
    pub base_url: String,
    /// Sent as `chainid` on every query
    pub chain_id: u64,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
    pub retry: RetryConfig,
    pub rate_limit: RateLimiterConfig,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EXPLORER_URL.into(),
            chain_id: DEFAULT_CHAIN_ID,
            api_key: None,
            timeout: Duration::from_secs(15),
            user_agent: concat!("ercsift/", env!("CARGO_PKG_VERSION")).into(),
            retry: RetryConfig::default(),
            rate_limit: RateLimiterConfig::default(),
        }
    }
}

impl ExplorerConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimiterConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}

/// Explorer client with retry and token-bucket pacing on every call.
pub struct EtherscanClient {
    client: Client,
    config: ExplorerConfig,
    retry: RetryPolicy,
    limiter: RateLimiter,
}

impl EtherscanClient {
    pub fn new(config: ExplorerConfig) -> Result<Self, ExplorerError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            retry: RetryPolicy::new(config.retry.clone()),
            limiter: RateLimiter::new(config.rate_limit.clone()),
            config,
        })
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// One paced request, no retries.
    async fn request(&self, params: &[(&str, &str)]) -> Result<Value, ExplorerError> {
        self.limiter.acquire().await;

        let chain_id = self.config.chain_id.to_string();
        let mut req = self
            .client
            .get(&self.config.base_url)
            .query(&[("chainid", chain_id.as_str())])
            .query(params);
        if let Some(key) = &self.config.api_key {
            req = req.query(&[("apikey", key.as_str())]);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ExplorerError::RateLimited {
                provider: self.config.base_url.clone(),
                message: "HTTP 429".into(),
            });
        }
        if !status.is_success() {
            return Err(ExplorerError::Network(format!("HTTP {status}")));
        }

        let body = resp.text().await?;
        let envelope: Envelope =
            serde_json::from_str(&body).map_err(|e| ExplorerError::MalformedResponse {
                endpoint: self.config.base_url.clone(),
                reason: e.to_string(),
            })?;
        envelope.into_result(&self.config.base_url)
    }

    async fn call(
        &self,
        label: &str,
        address: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, ExplorerError> {
        with_retry(&self.retry, label, address, || self.request(params)).await
    }
}

#[async_trait]
impl ExplorerApi for EtherscanClient {
    async fn get_source_code(&self, address: &str) -> Result<SourceRecord, ExplorerError> {
        let value = self
            .call(
                "getsourcecode",
                address,
                &[
                    ("module", "contract"),
                    ("action", "getsourcecode"),
                    ("address", address),
                ],
            )
            .await?;
        let records: Vec<SourceRecord> = parse_records("getsourcecode", value)?;
        match records.into_iter().next() {
            Some(rec) if rec.has_source() => {
                debug!(address, contract = %rec.contract_name, "source found");
                Ok(rec)
            }
            _ => Err(ExplorerError::NoSourceAvailable {
                address: address.to_string(),
            }),
        }
    }

    async fn get_transaction_list(&self, address: &str) -> Result<Vec<TxRecord>, ExplorerError> {
        let offset = TXLIST_PAGE_LIMIT.to_string();
        let result = self
            .call(
                "txlist",
                address,
                &[
                    ("module", "account"),
                    ("action", "txlist"),
                    ("address", address),
                    ("startblock", "0"),
                    ("endblock", "99999999"),
                    ("page", "1"),
                    ("offset", offset.as_str()),
                    ("sort", "desc"),
                ],
            )
            .await;
        match result {
            Ok(value) => parse_records("txlist", value),
            Err(ExplorerError::UpstreamRejected { message, .. })
                if message.starts_with(NO_TRANSACTIONS) =>
            {
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
