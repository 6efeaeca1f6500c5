//! Etherscan-compatible wire types.
//!
//! Every endpoint answers with the same envelope:
//!
//! ```json
//! { "status": "1", "message": "OK", "result": ... }
//! ```
//!
//! On failure `status` is `"0"` and `result` is usually a plain string, so
//! it is kept as a raw [`Value`] until the status has been checked.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ExplorerError;

/// Message Etherscan sends with `status "0"` for an address with no history.
pub const NO_TRANSACTIONS: &str = "No transactions found";

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Value,
}

impl Envelope {
    /// Unwrap `result` when `status == "1"`, classify the failure otherwise.
    pub fn into_result(self, provider: &str) -> Result<Value, ExplorerError> {
        if self.status == "1" {
            return Ok(self.result);
        }
        let result = match &self.result {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        if is_rate_limit_text(&self.message) || is_rate_limit_text(&result) {
            return Err(ExplorerError::RateLimited {
                provider: provider.to_string(),
                message: if result.is_empty() { self.message } else { result },
            });
        }
        Err(ExplorerError::UpstreamRejected {
            message: self.message,
            result,
        })
    }
}

fn is_rate_limit_text(text: &str) -> bool {
    text.to_ascii_lowercase().contains("rate limit")
}

/// One entry of `module=contract&action=getsourcecode`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    #[serde(rename = "SourceCode", default)]
    pub source_code: String,
    #[serde(rename = "ContractName", default)]
    pub contract_name: String,
    #[serde(rename = "CompilerVersion", default)]
    pub compiler_version: String,
    #[serde(rename = "ABI", default)]
    pub abi: String,
}

impl SourceRecord {
    /// Unverified contracts come back with an empty `SourceCode`.
    pub fn has_source(&self) -> bool {
        !self.source_code.trim().is_empty()
    }
}

/// One entry of `module=account&action=txlist`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRecord {
    #[serde(rename = "blockNumber", default)]
    pub block_number: String,
    /// Unix seconds as a decimal string
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

impl TxRecord {
    pub fn timestamp(&self) -> Option<i64> {
        self.time_stamp.trim().parse().ok()
    }
}

pub(crate) fn parse_records<T: serde::de::DeserializeOwned>(
    endpoint: &str,
    value: Value,
) -> Result<Vec<T>, ExplorerError> {
    serde_json::from_value(value).map_err(|e| ExplorerError::MalformedResponse {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> Envelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn ok_envelope_yields_result() {
        let v = envelope(r#"{"status":"1","message":"OK","result":[{"timeStamp":"1700000000"}]}"#)
            .into_result("etherscan")
            .unwrap();
        let txs: Vec<TxRecord> = parse_records("txlist", v).unwrap();
        assert_eq!(txs[0].timestamp(), Some(1_700_000_000));
    }

    #[test]
    fn rejection_keeps_message_and_result() {
        let err = envelope(r#"{"status":"0","message":"NOTOK","result":"Invalid API Key"}"#)
            .into_result("etherscan")
            .unwrap_err();
        match err {
            ExplorerError::UpstreamRejected { message, result } => {
                assert_eq!(message, "NOTOK");
                assert_eq!(result, "Invalid API Key");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rate_limit_message_is_transient() {
        let err = envelope(
            r#"{"status":"0","message":"NOTOK","result":"Max rate limit reached, please use API Key for higher rate limit"}"#,
        )
        .into_result("etherscan")
        .unwrap_err();
        assert!(matches!(err, ExplorerError::RateLimited { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn source_record_fields() {
        let v: Value = serde_json::from_str(
            r#"[{"SourceCode":"pragma solidity ^0.8.0;","ContractName":"Token","CompilerVersion":"v0.8.19","ABI":"[]","Proxy":"0"}]"#,
        )
        .unwrap();
        let recs: Vec<SourceRecord> = parse_records("getsourcecode", v).unwrap();
        assert!(recs[0].has_source());
        assert_eq!(recs[0].contract_name, "Token");
    }

    #[test]
    fn unverified_has_no_source() {
        let rec = SourceRecord {
            abi: "Contract source code not verified".into(),
            ..Default::default()
        };
        assert!(!rec.has_source());
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = parse_records::<TxRecord>("txlist", Value::String("oops".into())).unwrap_err();
        assert!(matches!(err, ExplorerError::MalformedResponse { .. }));
    }

    #[test]
    fn bad_timestamp_is_none() {
        let tx = TxRecord {
            time_stamp: "soon".into(),
            ..Default::default()
        };
        assert_eq!(tx.timestamp(), None);
    }
}
