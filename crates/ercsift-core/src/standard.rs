//! `StandardDefinition`: one interface standard and its derived selectors.

use indexmap::IndexMap;
use serde::Serialize;

use crate::signature::{selector, topic, Selector, Topic};

/// An immutable interface standard, e.g. ERC721.
///
/// Selectors and topics are derived from the signature strings at
/// construction and never change afterwards. Serialize-only: definitions
/// are read back through [`crate::config`], which re-derives every selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandardDefinition {
    name: String,
    /// Function signature → selector, in registration order
    functions: IndexMap<String, Selector>,
    /// Event signatures as registered (empty for definitions loaded from config)
    event_signatures: Vec<String>,
    /// Topic → human-readable event text, in registration order
    events: IndexMap<Topic, String>,
}

impl StandardDefinition {
    /// Register a standard from its function and event signatures.
    ///
    /// A signature listed twice is kept once, at its first position. Event
    /// text is `"event <signature>"`.
    pub fn register<F, E>(name: impl Into<String>, functions: F, events: E) -> Self
    where
        F: IntoIterator,
        F::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self::register_described(
            name,
            functions,
            events.into_iter().map(|sig| {
                let sig = sig.as_ref().to_string();
                let text = format!("event {sig}");
                (sig, text)
            }),
        )
    }

    /// Like [`StandardDefinition::register`], but each event carries its own
    /// display text, e.g. `event Transfer(address indexed from, ...)`.
    /// Topics still come from the canonical signature.
    pub fn register_described<F, E>(name: impl Into<String>, functions: F, events: E) -> Self
    where
        F: IntoIterator,
        F::Item: AsRef<str>,
        E: IntoIterator<Item = (String, String)>,
    {
        let functions = functions
            .into_iter()
            .map(|sig| {
                let sig = sig.as_ref();
                (sig.to_string(), selector(sig))
            })
            .collect();

        let mut event_signatures = Vec::new();
        let mut event_map = IndexMap::new();
        for (sig, text) in events {
            let t = topic(&sig);
            if !event_map.contains_key(&t) {
                event_map.insert(t, text);
                event_signatures.push(sig);
            }
        }

        Self {
            name: name.into(),
            functions,
            event_signatures,
            events: event_map,
        }
    }

    /// Rebuild a definition from already-validated config parts.
    pub(crate) fn from_parts(
        name: String,
        functions: IndexMap<String, Selector>,
        events: IndexMap<Topic, String>,
    ) -> Self {
        Self {
            name,
            functions,
            event_signatures: Vec::new(),
            events,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Function signatures in registration order.
    pub fn function_signatures(&self) -> impl Iterator<Item = &str> + '_ {
        self.functions.keys().map(String::as_str)
    }

    /// Selectors in registration order.
    pub fn selectors(&self) -> impl ExactSizeIterator<Item = &Selector> + '_ {
        self.functions.values()
    }

    /// Signature → selector map.
    pub fn functions(&self) -> &IndexMap<String, Selector> {
        &self.functions
    }

    pub fn selector_of(&self, signature: &str) -> Option<&Selector> {
        self.functions.get(signature)
    }

    pub fn event_signatures(&self) -> &[String] {
        &self.event_signatures
    }

    /// Topics in registration order.
    pub fn topics(&self) -> impl Iterator<Item = &Topic> + '_ {
        self.events.keys()
    }

    /// Topic → event text map.
    pub fn events(&self) -> &IndexMap<Topic, String> {
        &self.events
    }
}
