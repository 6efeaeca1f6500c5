//! Tracing / logging initialisation helpers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level per component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Global default level: "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_level")]
    pub level: String,
    /// Override per component: crate name → level
    #[serde(default)]
    pub components: BTreeMap<String, String>,
    /// Extra `RUST_LOG`-style directives appended last, so they win
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directives: Option<String>,
    /// Emit JSON structured logs (true) or human-readable text (false)
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: BTreeMap::new(),
            directives: None,
            json: false,
        }
    }
}

impl LogConfig {
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn component(mut self, name: impl Into<String>, level: impl Into<String>) -> Self {
        self.components.insert(name.into(), level.into());
        self
    }

    pub fn directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Filter string: `"info,ercsift_triage=debug,<extra>"`.
    pub fn filter_directives(&self) -> String {
        let mut directives = self.level.clone();
        for (component, level) in &self.components {
            directives.push_str(&format!(",{}={}", component.replace('-', "_"), level));
        }
        if let Some(extra) = self.directives.as_deref().filter(|d| !d.trim().is_empty()) {
            directives.push(',');
            directives.push_str(extra.trim());
        }
        directives
    }
}

/// Initialise tracing with the given log config.
///
/// Logs go to stderr so stdout stays clean for command output. Calling this
/// more than once is harmless; only the first call installs a subscriber.
pub fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_new(config.filter_directives())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_compose_in_order() {
        let cfg = LogConfig::default()
            .level("warn")
            .component("ercsift-triage", "debug")
            .component("ercsift-explorer", "trace")
            .directives("reqwest=off");
        assert_eq!(
            cfg.filter_directives(),
            "warn,ercsift_explorer=trace,ercsift_triage=debug,reqwest=off"
        );
    }

    #[test]
    fn defaults_from_empty_json() {
        let cfg: LogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, LogConfig::default());
        assert_eq!(cfg.filter_directives(), "info");
    }

    #[test]
    fn init_twice_is_harmless() {
        init_tracing(&LogConfig::default());
        init_tracing(&LogConfig::default().json(true));
    }
}
