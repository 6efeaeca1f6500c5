//! CSV interchange: contract lists in, classification results out.
//!
//! Result files keep the column layout of earlier runs:
//! `address,bytecode,matched_erc,bytecode_short`, with `matched_erc` written
//! as a Python list literal (`['ERC20', 'ERC165']`).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ercsift_classify::ContractCode;
use ercsift_core::{ClassificationResult, RegistryError};

pub const RESULT_HEADERS: [&str; 4] = ["address", "bytecode", "matched_erc", "bytecode_short"];

/// Column name → index, for the columns a reader needs.
struct Columns(HashMap<&'static str, usize>);

impl Columns {
    fn resolve(path: &Path, headers: &csv::StringRecord, required: &[&'static str]) -> Result<Self> {
        let mut map = HashMap::new();
        for &name in required {
            let idx = headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| {
                    RegistryError::config(format!(
                        "{}: missing required column '{name}'",
                        path.display()
                    ))
                })?;
            map.insert(name, idx);
        }
        Ok(Self(map))
    }

    fn get<'r>(&self, row: &'r csv::StringRecord, name: &str) -> &'r str {
        self.0
            .get(name)
            .and_then(|&i| row.get(i))
            .map(str::trim)
            .unwrap_or("")
    }
}

fn open(path: &Path) -> Result<csv::Reader<fs::File>> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open CSV '{}'", path.display()))
}

/// Read up to `limit` rows, keeping only the `required` columns.
fn read_columns(
    path: &Path,
    required: &[&'static str],
    limit: Option<usize>,
) -> Result<Vec<Vec<String>>> {
    let mut reader = open(path)?;
    let headers = reader
        .headers()
        .with_context(|| format!("read CSV header of '{}'", path.display()))?
        .clone();
    let cols = Columns::resolve(path, &headers, required)?;

    let mut out = Vec::new();
    for (i, row) in reader.records().enumerate() {
        if limit.is_some_and(|n| out.len() >= n) {
            break;
        }
        let row = row.with_context(|| format!("{}: row {}", path.display(), i + 2))?;
        out.push(required.iter().map(|c| cols.get(&row, c).to_string()).collect());
    }
    Ok(out)
}

/// `address,bytecode` rows (extra columns ignored).
pub fn read_contracts(path: &Path, limit: Option<usize>) -> Result<Vec<ContractCode>> {
    Ok(read_columns(path, &["address", "bytecode"], limit)?
        .into_iter()
        .map(|mut r| {
            let bytecode = r.pop().unwrap_or_default();
            let address = r.pop().unwrap_or_default();
            ContractCode { address, bytecode }
        })
        .collect())
}

/// Non-empty values of the `address` column.
pub fn read_addresses(path: &Path, limit: Option<usize>) -> Result<Vec<String>> {
    Ok(read_columns(path, &["address"], limit)?
        .into_iter()
        .filter_map(|mut r| r.pop())
        .filter(|a| !a.is_empty())
        .collect())
}

/// `(address, matched standards)` from a classification result file.
pub fn read_classified(path: &Path) -> Result<Vec<(String, Vec<String>)>> {
    Ok(read_columns(path, &["address", "matched_erc"], None)?
        .into_iter()
        .map(|mut r| {
            let matched = parse_matched(&r.pop().unwrap_or_default());
            let address = r.pop().unwrap_or_default();
            (address, matched)
        })
        .filter(|(a, _)| !a.is_empty())
        .collect())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory '{}'", parent.display()))?;
    }
    Ok(())
}

pub fn write_results(path: &Path, results: &[ClassificationResult]) -> Result<()> {
    create_parent(path)?;
    let mut w = csv::Writer::from_path(path)
        .with_context(|| format!("create '{}'", path.display()))?;
    w.write_record(RESULT_HEADERS)?;
    for r in results {
        w.write_record([
            r.address.as_str(),
            r.bytecode.as_str(),
            render_matched(&r.matched_standards).as_str(),
            r.bytecode_preview.as_str(),
        ])?;
    }
    w.flush()
        .with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}

pub fn write_contracts(path: &Path, contracts: &[ContractCode]) -> Result<()> {
    create_parent(path)?;
    let mut w = csv::Writer::from_path(path)
        .with_context(|| format!("create '{}'", path.display()))?;
    w.write_record(["address", "bytecode"])?;
    for c in contracts {
        w.write_record([c.address.as_str(), c.bytecode.as_str()])?;
    }
    w.flush()
        .with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}

/// `['ERC20', 'ERC165']`, or `[]`.
pub fn render_matched(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
    format!("[{}]", quoted.join(", "))
}

/// Inverse of [`render_matched`]; also accepts double quotes.
pub fn parse_matched(text: &str) -> Vec<String> {
    let inner = text.trim().trim_start_matches('[').trim_end_matches(']');
    inner
        .split(',')
        .map(|s| s.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matched_rendering() {
        assert_eq!(render_matched(&[]), "[]");
        assert_eq!(
            render_matched(&["ERC20".to_string(), "ERC165".to_string()]),
            "['ERC20', 'ERC165']"
        );
        assert_eq!(parse_matched("['ERC20', 'ERC165']"), vec!["ERC20", "ERC165"]);
        assert_eq!(parse_matched("[\"ERC721\"]"), vec!["ERC721"]);
        assert!(parse_matched("[]").is_empty());
        assert!(parse_matched("").is_empty());
    }

    #[test]
    fn reads_required_columns_and_ignores_extra() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(
            &path,
            "block,bytecode,address\n1,0x6080,0xaaa\n2,0x,0xbbb\n3,0x60,0xccc\n",
        )
        .unwrap();
        let all = read_contracts(&path, None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], ContractCode::new("0xaaa", "0x6080"));
        assert_eq!(read_contracts(&path, Some(2)).unwrap().len(), 2);
    }

    #[test]
    fn missing_column_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(&path, "address,code\n0xaaa,0x60\n").unwrap();
        let err = read_contracts(&path, None).unwrap_err();
        let inner = err.downcast_ref::<RegistryError>().unwrap();
        assert!(matches!(inner, RegistryError::ConfigParse { reason } if reason.contains("bytecode")));
    }

    #[test]
    fn results_round_trip_through_classified_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("results.csv");
        let results = vec![
            ClassificationResult::new("0xaaa", "0x6080604052", vec!["ERC20".into(), "ERC165".into()], 10),
            ClassificationResult::new("0xbbb", "0x", vec![], 10),
        ];
        write_results(&path, &results).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("address,bytecode,matched_erc,bytecode_short\n"));
        assert!(text.contains("\"['ERC20', 'ERC165']\""));

        let back = read_classified(&path).unwrap();
        assert_eq!(back[0], ("0xaaa".to_string(), vec!["ERC20".to_string(), "ERC165".to_string()]));
        assert_eq!(back[1], ("0xbbb".to_string(), vec![]));
    }
}
