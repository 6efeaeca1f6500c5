//! `ercsift fetch-code`: turn an address list into an `address,bytecode`
//! CSV via `eth_getCode`.

use std::path::Path;

use anyhow::{Context, Result};
use ercsift_classify::ContractCode;
use ercsift_explorer::{has_code, CodeFetcher};
use tracing::{debug, info, warn};

use crate::tabular;

/// Per-address results of one fetch run, in input order.
#[derive(Debug, Default)]
pub struct Fetched {
    pub contracts: Vec<ContractCode>,
    /// Addresses the node reported without code
    pub empty: Vec<String>,
    /// Address and error text for every failed lookup
    pub failed: Vec<(String, String)>,
}

pub async fn fetch_all(fetcher: &CodeFetcher, addresses: Vec<String>) -> Fetched {
    let mut fetched = Fetched {
        contracts: Vec::with_capacity(addresses.len()),
        ..Fetched::default()
    };
    for address in addresses {
        match fetcher.get_code(&address).await {
            Ok(code) if has_code(&code) => fetched.contracts.push(ContractCode::new(address, code)),
            Ok(_) => {
                debug!(address = %address, "no code at address, skipping");
                fetched.empty.push(address);
            }
            Err(e) => {
                warn!(address = %address, error = %e, "eth_getCode failed");
                fetched.failed.push((address, e.to_string()));
            }
        }
    }
    fetched
}

pub async fn run(input: &Path, output: &Path, rpc: &str, limit: Option<usize>) -> Result<()> {
    let addresses = tabular::read_addresses(input, limit)?;
    let fetcher = CodeFetcher::new(rpc).context("build JSON-RPC client")?;
    info!(rpc = fetcher.url(), addresses = addresses.len(), "fetching bytecode");

    let fetched = fetch_all(&fetcher, addresses).await;
    tabular::write_contracts(output, &fetched.contracts)?;
    print_summary(&fetched, output);
    Ok(())
}

fn print_summary(fetched: &Fetched, output: &Path) {
    println!(
        "Fetched {} contracts ({} without code, {} failed) → {}",
        fetched.contracts.len(),
        fetched.empty.len(),
        fetched.failed.len(),
        output.display()
    );
    for address in &fetched.empty {
        println!("  no-code   {address}");
    }
    for (address, error) in &fetched.failed {
        println!("  failed    {address}: {error}");
    }
}
