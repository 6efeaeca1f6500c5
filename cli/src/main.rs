//! ercsift CLI: classify contract bytecode by ERC standard, triage active
//! contracts and archive their verified source.
//!
//! # Commands
//! ```text
//! ercsift classify   --input <csv> --output <csv> [--registry <json>] [--exclude NAME]...
//! ercsift triage     --input <csv> --out-dir <dir> [--only NAME]... [--report <json>]
//! ercsift fetch-code --input <csv> --output <csv> [--rpc URL]
//! ercsift diff       <first.csv> <second.csv>
//! ercsift registry   export|verify
//! ercsift selector   <signature>...
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ercsift_core::{selector, topic, DEFAULT_PREVIEW_LEN};
use ercsift_explorer::{
    ExplorerConfig, RateLimiterConfig, DEFAULT_CHAIN_ID, DEFAULT_EXPLORER_URL, DEFAULT_RPC_URL,
};
use ercsift_observability::{init_tracing, LogConfig};
use ercsift_triage::TriageConfig;

mod cmd_classify;
mod cmd_fetch_code;
mod cmd_registry;
mod cmd_triage;
mod tabular;

#[derive(Parser)]
#[command(
    name = "ercsift",
    about = "Classify EVM contracts by ERC standard and archive the active ones",
    long_about = "
ercsift: selector-footprint classification of EVM bytecode, activity triage
via an Etherscan-compatible explorer, and collision-free source archiving.

ENVIRONMENT VARIABLES:
  ERCSIFT_ETHERSCAN_KEY   Explorer API key (triage)
  ERCSIFT_EXPLORER_URL    Explorer API base URL (triage)
  ERCSIFT_CHAIN_ID        Explorer chain id (triage)
  ERCSIFT_RPC_URL         JSON-RPC endpoint (fetch-code)
",
    version
)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Extra log directives, e.g. "ercsift_explorer=trace"
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Label every contract in a CSV with the standards it implements
    Classify {
        /// CSV with `address` and `bytecode` columns
        #[arg(long)]
        input: PathBuf,
        /// Result CSV (address, bytecode, matched_erc, bytecode_short)
        #[arg(long)]
        output: PathBuf,
        /// Registry JSON (default: bundled catalog)
        #[arg(long)]
        registry: Option<PathBuf>,
        /// Standard to leave out (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
        /// Only classify the first N rows
        #[arg(long)]
        limit: Option<usize>,
        /// Rayon worker threads (0 = all CPUs)
        #[arg(long, default_value_t = 0)]
        threads: usize,
        /// Characters kept in `bytecode_short`
        #[arg(long, default_value_t = DEFAULT_PREVIEW_LEN)]
        preview_len: usize,
    },

    /// Keep busy, recently active contracts and download their verified source
    Triage {
        /// Classification result CSV (`address`, `matched_erc`)
        #[arg(long)]
        input: PathBuf,
        /// Directory receiving `<address>.sol` files
        #[arg(long)]
        out_dir: PathBuf,
        /// Only triage rows matching one of these standards (repeatable)
        #[arg(long)]
        only: Vec<String>,
        /// Transaction count an address must exceed
        #[arg(long, default_value_t = 100)]
        min_tx: u64,
        /// Recency window in seconds
        #[arg(long, default_value_t = 2_592_000)]
        window_secs: i64,
        /// Addresses processed concurrently
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
        /// Explorer requests per second
        #[arg(long, default_value_t = 5.0)]
        rate: f64,
        /// Explorer API key
        #[arg(long, env = "ERCSIFT_ETHERSCAN_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Explorer API base URL
        #[arg(long, env = "ERCSIFT_EXPLORER_URL", default_value = DEFAULT_EXPLORER_URL)]
        explorer_url: String,
        /// Chain id sent to the explorer (1 = Ethereum mainnet)
        #[arg(long, env = "ERCSIFT_CHAIN_ID", default_value_t = DEFAULT_CHAIN_ID)]
        chain_id: u64,
        /// Write the run report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Fetch deployed bytecode for an address list via eth_getCode
    #[command(name = "fetch-code")]
    FetchCode {
        /// CSV with an `address` column
        #[arg(long)]
        input: PathBuf,
        /// Output CSV (address, bytecode)
        #[arg(long)]
        output: PathBuf,
        /// JSON-RPC endpoint
        #[arg(long, env = "ERCSIFT_RPC_URL", default_value = DEFAULT_RPC_URL)]
        rpc: String,
        /// Only fetch the first N rows
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List addresses present in only one of two CSV files
    Diff {
        first: PathBuf,
        second: PathBuf,
    },

    /// Registry config management
    Registry {
        #[command(subcommand)]
        action: RegistryAction,
    },

    /// Print selector and topic hashes for signatures
    Selector {
        /// e.g. "transfer(address,uint256)"
        #[arg(required = true)]
        signatures: Vec<String>,
    },
}

#[derive(Subcommand)]
enum RegistryAction {
    /// Write the bundled catalog as registry JSON
    Export {
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Load a registry JSON and check it round-trips
    Verify { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log = LogConfig::default()
        .level(if cli.verbose { "debug" } else { "info" })
        .json(cli.json_logs);
    if let Some(directives) = cli.log {
        log = log.directives(directives);
    }
    init_tracing(&log);

    match cli.command {
        Commands::Classify { input, output, registry, exclude, limit, threads, preview_len } => {
            cmd_classify::run(cmd_classify::ClassifyArgs {
                input: &input,
                output: &output,
                registry: registry.as_deref(),
                exclude: &exclude,
                limit,
                threads,
                preview_len,
            })
        }

        Commands::Triage {
            input,
            out_dir,
            only,
            min_tx,
            window_secs,
            concurrency,
            rate,
            api_key,
            explorer_url,
            chain_id,
            report,
        } => {
            let mut explorer = ExplorerConfig::default()
                .with_base_url(explorer_url)
                .with_chain_id(chain_id)
                .with_timeout(Duration::from_secs(15))
                .with_rate_limit(RateLimiterConfig::per_second(rate));
            if let Some(key) = api_key {
                explorer = explorer.with_api_key(key);
            }
            let config = TriageConfig::default()
                .count_threshold(min_tx)
                .recency_window_secs(window_secs)
                .max_in_flight(concurrency);
            cmd_triage::run(cmd_triage::TriageArgs {
                input: &input,
                out_dir: &out_dir,
                only: &only,
                config,
                explorer,
                report: report.as_deref(),
            })
            .await
        }

        Commands::FetchCode { input, output, rpc, limit } => {
            cmd_fetch_code::run(&input, &output, &rpc, limit).await
        }

        Commands::Diff { first, second } => cmd_diff(&first, &second),

        Commands::Registry { action } => match action {
            RegistryAction::Export { output } => cmd_registry::export(output.as_deref()),
            RegistryAction::Verify { path } => cmd_registry::verify(&path),
        },

        Commands::Selector { signatures } => {
            cmd_selector(&signatures);
            Ok(())
        }
    }
}

// ─── Command implementations ─────────────────────────────────────────────────

/// Addresses unique to each side, sorted.
fn address_diff(first: &[String], second: &[String]) -> (Vec<String>, Vec<String>) {
    let a: BTreeSet<&String> = first.iter().collect();
    let b: BTreeSet<&String> = second.iter().collect();
    (
        a.difference(&b).map(|s| s.to_string()).collect(),
        b.difference(&a).map(|s| s.to_string()).collect(),
    )
}

fn cmd_diff(first: &Path, second: &Path) -> Result<()> {
    let a = tabular::read_addresses(first, None)?;
    let b = tabular::read_addresses(second, None)?;
    let (only_a, only_b) = address_diff(&a, &b);

    println!("Only in {} ({}):", first.display(), only_a.len());
    for addr in &only_a {
        println!("  {addr}");
    }
    println!("Only in {} ({}):", second.display(), only_b.len());
    for addr in &only_b {
        println!("  {addr}");
    }
    Ok(())
}

fn cmd_selector(signatures: &[String]) {
    for sig in signatures {
        println!("{sig}");
        println!("  selector: 0x{}", selector(sig));
        println!("  topic:    {}", topic(sig));
    }
}
