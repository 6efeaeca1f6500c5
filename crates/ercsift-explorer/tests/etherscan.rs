//! `EtherscanClient` against a scripted local HTTP server.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ercsift_explorer::{
    EtherscanClient, ExplorerApi, ExplorerConfig, ExplorerError, RateLimiterConfig, RetryConfig,
    DEFAULT_CHAIN_ID, DEFAULT_EXPLORER_URL,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

struct Scripted {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

/// Serve `replies` in order, one per connection, recording each request line.
async fn serve(replies: Vec<(u16, &'static str)>) -> Scripted {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    let mut queue: VecDeque<(u16, &'static str)> = replies.into();

    tokio::spawn(async move {
        while let Some((status, body)) = queue.pop_front() {
            let Ok((mut sock, _)) = listener.accept().await else {
                return;
            };
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = sock.read(&mut chunk).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let text = String::from_utf8_lossy(&buf);
            if let Some(line) = text.lines().next() {
                seen.lock().unwrap().push(line.to_string());
            }
            let reason = if status == 200 { "OK" } else { "Error" };
            let resp = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = sock.write_all(resp.as_bytes()).await;
            let _ = sock.shutdown().await;
        }
    });

    Scripted {
        base_url: format!("http://{addr}/api"),
        requests,
    }
}

fn client(base_url: &str) -> EtherscanClient {
    let cfg = ExplorerConfig::default()
        .with_base_url(base_url)
        .with_api_key("TESTKEY")
        .with_timeout(Duration::from_secs(5))
        .with_retry(RetryConfig {
            max_retries: 2,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
            multiplier: 2.0,
            jitter_fraction: 0.0,
        })
        .with_rate_limit(RateLimiterConfig::per_second(1000.0));
    EtherscanClient::new(cfg).unwrap()
}

#[tokio::test]
async fn txlist_parses_timestamps() {
    let server = serve(vec![(
        200,
        r#"{"status":"1","message":"OK","result":[{"timeStamp":"1700000000","hash":"0x2"},{"timeStamp":"1699990000","hash":"0x1"}]}"#,
    )])
    .await;
    let activity = client(&server.base_url).get_activity("0xabc").await.unwrap();
    assert_eq!(activity.transaction_count, 2);
    assert_eq!(activity.timestamps, vec![1_700_000_000, 1_699_990_000]);

    let line = server.requests.lock().unwrap()[0].clone();
    assert!(line.contains("module=account"));
    assert!(line.contains("action=txlist"));
    assert!(line.contains("startblock=0"));
    assert!(line.contains("endblock=99999999"));
    assert!(line.contains("sort=desc"));
    assert!(line.contains("page=1"));
    assert!(line.contains("offset=10000"));
    assert!(line.contains("chainid=1"));
    assert!(line.contains("apikey=TESTKEY"));
}

#[tokio::test]
async fn chain_id_sent_on_every_call() {
    let server = serve(vec![(
        200,
        r#"{"status":"1","message":"OK","result":[{"SourceCode":"contract A {}","ContractName":"A"}]}"#,
    )])
    .await;
    let cfg = ExplorerConfig::default()
        .with_base_url(&server.base_url)
        .with_chain_id(8453)
        .with_rate_limit(RateLimiterConfig::per_second(1000.0));
    EtherscanClient::new(cfg)
        .unwrap()
        .get_source_code("0xabc")
        .await
        .unwrap();

    let line = server.requests.lock().unwrap()[0].clone();
    assert!(line.contains("chainid=8453"));
    assert!(line.contains("action=getsourcecode"));
    assert!(!line.contains("apikey="));
}

#[test]
fn default_endpoint_is_v2() {
    assert!(DEFAULT_EXPLORER_URL.ends_with("/v2/api"));
    assert_eq!(ExplorerConfig::default().chain_id, DEFAULT_CHAIN_ID);
}

#[tokio::test]
async fn no_transactions_is_empty_history() {
    let server = serve(vec![(
        200,
        r#"{"status":"0","message":"No transactions found","result":[]}"#,
    )])
    .await;
    let txs = client(&server.base_url).get_transaction_list("0xabc").await.unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn rate_limit_then_success() {
    let server = serve(vec![
        (429, r#"{"status":"0","message":"NOTOK","result":"slow down"}"#),
        (
            200,
            r#"{"status":"0","message":"NOTOK","result":"Max rate limit reached"}"#,
        ),
        (
            200,
            r#"{"status":"1","message":"OK","result":[{"SourceCode":"contract A {}","ContractName":"A"}]}"#,
        ),
    ])
    .await;
    let rec = client(&server.base_url).get_source_code("0xabc").await.unwrap();
    assert_eq!(rec.contract_name, "A");
    assert_eq!(server.requests.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn unverified_contract_has_no_source() {
    let server = serve(vec![(
        200,
        r#"{"status":"1","message":"OK","result":[{"SourceCode":"","ABI":"Contract source code not verified"}]}"#,
    )])
    .await;
    let err = client(&server.base_url).get_source_code("0xabc").await.unwrap_err();
    assert!(matches!(err, ExplorerError::NoSourceAvailable { .. }));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = serve(vec![(200, "<html>gateway</html>")]).await;
    let err = client(&server.base_url).get_transaction_list("0xabc").await.unwrap_err();
    assert!(err.is_network());
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn rejection_surfaces_message() {
    let server = serve(vec![(
        200,
        r#"{"status":"0","message":"NOTOK","result":"Invalid API Key"}"#,
    )])
    .await;
    let err = client(&server.base_url).get_source_code("0xabc").await.unwrap_err();
    assert!(matches!(
        err,
        ExplorerError::UpstreamRejected { ref result, .. } if result == "Invalid API Key"
    ));
}
