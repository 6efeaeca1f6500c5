//! Single-contract classification.

use std::collections::HashSet;

use ercsift_core::{registry, SignatureRegistry};

use crate::strategy::{MatchStrategy, SubstringMatch};

/// Lowercase the bytecode and drop a leading `0x`.
///
/// `"0x"` (what `eth_getCode` returns for an account without code) and `""`
/// both normalise to the empty string.
pub fn normalize(bytecode: &str) -> String {
    let trimmed = bytecode.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex.to_ascii_lowercase()
}

/// Classify `bytecode` with the default substring strategy.
///
/// `exclude` names standards to skip before matching; pass an empty set to
/// consider every standard in the registry.
pub fn classify(
    bytecode: &str,
    registry: &SignatureRegistry,
    exclude: &HashSet<String>,
) -> Vec<String> {
    Classifier::new().classify(bytecode, registry, exclude)
}

/// Classifier bound to a match strategy.
#[derive(Debug, Clone, Default)]
pub struct Classifier<S = SubstringMatch> {
    strategy: S,
}

impl Classifier<SubstringMatch> {
    pub fn new() -> Self {
        Self {
            strategy: SubstringMatch,
        }
    }
}

impl<S: MatchStrategy> Classifier<S> {
    pub fn with_strategy(strategy: S) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Lazily yield the names of matching standards, in registry order.
    ///
    /// The returned iterator is `Clone`; clone it before consuming to walk
    /// the sequence again.
    pub fn matches<'a>(
        &'a self,
        bytecode: &str,
        registry: &'a SignatureRegistry,
        exclude: &'a HashSet<String>,
    ) -> Matches<'a, S> {
        Matches {
            code: normalize(bytecode),
            standards: registry.iter(),
            exclude,
            strategy: &self.strategy,
        }
    }

    /// Eagerly collect [`Classifier::matches`].
    pub fn classify(
        &self,
        bytecode: &str,
        registry: &SignatureRegistry,
        exclude: &HashSet<String>,
    ) -> Vec<String> {
        self.matches(bytecode, registry, exclude)
            .map(str::to_string)
            .collect()
    }
}

/// Iterator over matched standard names. See [`Classifier::matches`].
pub struct Matches<'a, S> {
    code: String,
    standards: registry::Iter<'a>,
    exclude: &'a HashSet<String>,
    strategy: &'a S,
}

impl<'a, S> Clone for Matches<'a, S> {
    fn clone(&self) -> Self {
        Self {
            code: self.code.clone(),
            standards: self.standards.clone(),
            exclude: self.exclude,
            strategy: self.strategy,
        }
    }
}

impl<'a, S: MatchStrategy> Iterator for Matches<'a, S> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.code.is_empty() {
            return None;
        }
        for def in self.standards.by_ref() {
            if self.exclude.contains(def.name()) {
                continue;
            }
            if self.strategy.matches(&self.code, def) {
                return Some(def.name());
            }
        }
        None
    }
}
