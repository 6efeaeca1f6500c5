//! Registry config file codec.
//!
//! The on-disk format is a JSON object keyed by standard name:
//!
//! ```json
//! {
//!   "ERC20": {
//!     "selectors": ["dd62ed3e", "095ea7b3", ...],
//!     "topics":    ["0x8c5be1e5...", "0xddf252ad..."],
//!     "functions": { "allowance(address,address)": "dd62ed3e", ... },
//!     "events":    { "0x8c5be1e5...": "event Approval(address,address,uint256)", ... }
//!   }
//! }
//! ```
//!
//! Loading is strict. `selectors`, `functions` and `events` are required on
//! every entry, and every stored selector is re-derived from its signature;
//! a file whose selectors disagree with their signatures is rejected rather
//! than silently classifying with stale data.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::registry::SignatureRegistry;
use crate::signature::{selector, Selector, Topic};
use crate::standard::StandardDefinition;

/// One entry of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardConfig {
    pub selectors: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub functions: IndexMap<String, String>,
    pub events: IndexMap<String, String>,
}

/// The whole config file: standard name → entry, in file order.
pub type RegistryConfig = IndexMap<String, StandardConfig>;

impl StandardConfig {
    fn from_definition(def: &StandardDefinition) -> Self {
        Self {
            selectors: def.selectors().map(|s| s.as_hex().to_string()).collect(),
            topics: def.topics().map(|t| t.as_hex().to_string()).collect(),
            functions: def
                .functions()
                .iter()
                .map(|(sig, sel)| (sig.clone(), sel.as_hex().to_string()))
                .collect(),
            events: def
                .events()
                .iter()
                .map(|(t, text)| (t.as_hex().to_string(), text.clone()))
                .collect(),
        }
    }

    fn into_definition(self, name: String) -> Result<StandardDefinition, RegistryError> {
        let mut functions = IndexMap::with_capacity(self.functions.len());
        for (sig, stored) in self.functions {
            let derived = selector(&sig);
            let parsed = Selector::parse(&stored).ok_or_else(|| {
                RegistryError::config(format!(
                    "{name}: functions[\"{sig}\"] = \"{stored}\" is not a 4-byte hex selector"
                ))
            })?;
            if parsed != derived {
                return Err(RegistryError::config(format!(
                    "{name}: functions[\"{sig}\"] = \"{stored}\" but the signature derives \"{derived}\""
                )));
            }
            functions.insert(sig, derived);
        }

        let derived: Vec<&str> = functions.values().map(Selector::as_hex).collect();
        let stored: Vec<String> = self
            .selectors
            .iter()
            .map(|s| s.strip_prefix("0x").unwrap_or(s).to_ascii_lowercase())
            .collect();
        if stored != derived {
            return Err(RegistryError::config(format!(
                "{name}: selectors {stored:?} do not match those derived from functions {derived:?}"
            )));
        }

        let events: IndexMap<Topic, String> = self
            .events
            .into_iter()
            .map(|(t, text)| (Topic::new(t), text))
            .collect();
        if let Some(orphan) = self
            .topics
            .iter()
            .find(|t| !events.contains_key(&Topic::new(t.as_str())))
        {
            return Err(RegistryError::config(format!(
                "{name}: topic \"{orphan}\" has no entry in events"
            )));
        }

        Ok(StandardDefinition::from_parts(name, functions, events))
    }
}

/// Parse and validate a registry config from JSON text.
pub fn from_json(json: &str) -> Result<SignatureRegistry, RegistryError> {
    let config: RegistryConfig = serde_json::from_str(json)?;
    let mut defs = Vec::with_capacity(config.len());
    for (name, entry) in config {
        defs.push(entry.into_definition(name)?);
    }
    SignatureRegistry::build(defs)
}

/// Load a registry config file.
pub fn load_file(path: &Path) -> Result<SignatureRegistry, RegistryError> {
    let content = std::fs::read_to_string(path)?;
    from_json(&content)
}

/// Render a registry in config form.
pub fn to_config(registry: &SignatureRegistry) -> RegistryConfig {
    registry
        .iter()
        .map(|def| (def.name().to_string(), StandardConfig::from_definition(def)))
        .collect()
}

/// Render a registry as pretty-printed config JSON.
pub fn to_json(registry: &SignatureRegistry) -> Result<String, RegistryError> {
    Ok(serde_json::to_string_pretty(&to_config(registry))?)
}

/// Write a registry config file, creating parent directories as needed.
pub fn write_file(registry: &SignatureRegistry, path: &Path) -> Result<(), RegistryError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, to_json(registry)?)?;
    Ok(())
}
