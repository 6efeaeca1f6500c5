//! Match strategies: the rule deciding whether bytecode implements a standard.

use ercsift_core::StandardDefinition;

/// Decides whether a contract implements a standard.
///
/// `code` is already normalised: lowercase hex, no `0x` prefix, non-empty.
/// Implementations must be pure; the batch engine calls them from many
/// threads at once.
pub trait MatchStrategy: Send + Sync {
    fn matches(&self, code: &str, standard: &StandardDefinition) -> bool;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;
}

/// Every selector of the standard must appear somewhere in the bytecode as a
/// contiguous hex substring.
///
/// This is a presence check, not dispatch-table verification:
/// - false positives when a selector's four bytes occur inside constant or
///   immutable data, or straddle two unrelated instructions;
/// - false negatives against dispatchers that never embed the literal
///   4-byte constant (some optimised jump-table layouts).
///
/// The substring search is over hex characters, so a match may also start
/// at an odd nibble offset. A standard with no selectors matches any
/// non-empty bytecode.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatch;

impl MatchStrategy for SubstringMatch {
    fn matches(&self, code: &str, standard: &StandardDefinition) -> bool {
        standard
            .selectors()
            .all(|sel| code.contains(sel.as_hex()))
    }

    fn name(&self) -> &'static str {
        "substring"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_selectors_required() {
        let def = StandardDefinition::register(
            "ERC173",
            ["owner()", "transferOwnership(address)"],
            Vec::<&str>::new(),
        );
        assert!(SubstringMatch.matches("008da5cb5b00f2fde38b", &def));
        assert!(!SubstringMatch.matches("008da5cb5b00", &def));
    }

    #[test]
    fn odd_nibble_offset_still_matches() {
        let def = StandardDefinition::register("ERC165", ["supportsInterface(bytes4)"], Vec::<&str>::new());
        assert!(SubstringMatch.matches("a01ffc9a7b", &def));
    }

    #[test]
    fn empty_standard_matches_vacuously() {
        let def = StandardDefinition::register("EMPTY", Vec::<&str>::new(), Vec::<&str>::new());
        assert!(SubstringMatch.matches("60806040", &def));
    }
}
