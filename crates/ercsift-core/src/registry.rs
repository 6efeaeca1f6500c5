//! `SignatureRegistry`: the ordered, read-only set of known standards.
//!
//! Insertion order is part of the contract: classification reports matches
//! in this order, so output files stay diffable between runs.

use indexmap::IndexMap;

use crate::error::RegistryError;
use crate::standard::StandardDefinition;

/// Iterator over a registry's definitions, in insertion order.
pub type Iter<'a> = indexmap::map::Values<'a, String, StandardDefinition>;

/// Immutable ordered mapping from standard name to definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureRegistry {
    standards: IndexMap<String, StandardDefinition>,
}

impl SignatureRegistry {
    /// Fold an ordered list of definitions into a registry.
    ///
    /// Fails on the first repeated name.
    pub fn build<I>(definitions: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = StandardDefinition>,
    {
        let mut standards = IndexMap::new();
        for def in definitions {
            if standards.contains_key(def.name()) {
                return Err(RegistryError::DuplicateStandardName {
                    name: def.name().to_string(),
                });
            }
            standards.insert(def.name().to_string(), def);
        }
        Ok(Self { standards })
    }

    pub fn get(&self, name: &str) -> Option<&StandardDefinition> {
        self.standards.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.standards.contains_key(name)
    }

    /// Definitions in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        self.standards.values()
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.standards.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.standards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standards.is_empty()
    }
}

impl<'a> IntoIterator for &'a SignatureRegistry {
    type Item = &'a StandardDefinition;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.standards.values()
    }
}
