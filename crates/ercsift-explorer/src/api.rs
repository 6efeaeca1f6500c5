//! `ExplorerApi`: the lookups the triage pipeline needs from a block explorer.

use async_trait::async_trait;
use ercsift_core::ActivityRecord;

use crate::error::ExplorerError;
use crate::types::{SourceRecord, TxRecord};

/// Source and transaction-history lookups keyed by contract address.
///
/// [`crate::EtherscanClient`] is the production implementation; tests plug in
/// in-memory fakes.
#[async_trait]
pub trait ExplorerApi: Send + Sync {
    /// Verified source of `address`.
    ///
    /// Returns [`ExplorerError::NoSourceAvailable`] when the explorer has
    /// nothing usable (no record or an empty source body).
    async fn get_source_code(&self, address: &str) -> Result<SourceRecord, ExplorerError>;

    /// Normal-transaction history of `address`, newest first.
    ///
    /// Explorers cap one query (10 000 records for Etherscan), so for very
    /// busy contracts this is the most recent page only. An address with no
    /// history yields an empty list.
    async fn get_transaction_list(&self, address: &str) -> Result<Vec<TxRecord>, ExplorerError>;

    /// Transaction history reduced to an [`ActivityRecord`].
    async fn get_activity(&self, address: &str) -> Result<ActivityRecord, ExplorerError> {
        let txs = self.get_transaction_list(address).await?;
        let timestamps = txs
            .iter()
            .map(|tx| {
                tx.timestamp().ok_or_else(|| ExplorerError::MalformedResponse {
                    endpoint: "txlist".into(),
                    reason: format!("invalid timeStamp {:?}", tx.time_stamp),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ActivityRecord::new(address, timestamps))
    }
}
