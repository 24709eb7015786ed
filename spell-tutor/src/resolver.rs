//! Mapping player-written candidates onto catalog spells.
//!
//! A candidate resolves only when its [`match_key`] equals the key of a
//! catalog spell. There is no fuzzy matching: "firebolt" finds Fire Bolt but
//! "fire bolts" finds nothing.

use crate::grammar::CandidateList;
use crate::normalize::match_key;
use crate::spells::{SpellCatalog, SpellClass, SpellData};

/// Longest run of list fragments tried as one spell name. Covers names that
/// contain a separator word, such as "Create or Destroy Water".
const MAX_JOINED_FRAGMENTS: usize = 4;

/// Resolves candidate names against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct SpellNameResolver<'a> {
    catalog: &'a SpellCatalog,
}

impl<'a> SpellNameResolver<'a> {
    pub fn new(catalog: &'a SpellCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a SpellCatalog {
        self.catalog
    }

    /// The catalog spell a candidate names, if any.
    pub fn resolve_spell_name(&self, candidate: &str) -> Option<&'a SpellData> {
        let key = match_key(candidate);
        if key.is_empty() {
            return None;
        }
        self.catalog.by_match_key(&key)
    }

    /// Resolve every candidate list, longest name first.
    ///
    /// Within a list, the longest run of adjacent fragments that names a
    /// spell wins, so "detect evil and good" is one spell and "light and
    /// mending" is two. Fragments that name nothing are dropped. Each spell
    /// appears once, at the position it was first mentioned.
    pub fn resolve_candidates(&self, lists: &[CandidateList]) -> Vec<&'a SpellData> {
        let mut resolved: Vec<&'a SpellData> = Vec::new();

        for list in lists {
            let mut first = 0;
            while first < list.len() {
                let longest = (first + MAX_JOINED_FRAGMENTS).min(list.len());
                let hit = (first..longest).rev().find_map(|last| {
                    self.resolve_spell_name(list.joined(first, last))
                        .map(|spell| (last, spell))
                });

                match hit {
                    Some((last, spell)) => {
                        if !resolved.iter().any(|s| s.name == spell.name) {
                            resolved.push(spell);
                        }
                        first = last + 1;
                    }
                    None => {
                        tracing::trace!(
                            candidate = list.joined(first, first),
                            marker = list.marker,
                            "Dropping unresolved candidate"
                        );
                        first += 1;
                    }
                }
            }
        }

        resolved
    }

    /// Canonical name of `raw` if it names a spell of exactly `level`.
    pub fn official_spell_name(&self, raw: &str, level: u8) -> Option<&'a str> {
        self.resolve_spell_name(raw)
            .filter(|spell| spell.level == level)
            .map(|spell| spell.name.as_str())
    }

    /// Whether `name` is a cantrip on `class`'s list.
    pub fn is_valid_cantrip(&self, name: &str, class: SpellClass) -> bool {
        self.resolve_spell_name(name)
            .is_some_and(|spell| spell.is_cantrip() && spell.is_available_to(class))
    }

    /// Whether `name` is a level 1 spell on `class`'s list.
    pub fn is_valid_level1_spell(&self, name: &str, class: SpellClass) -> bool {
        self.resolve_spell_name(name)
            .is_some_and(|spell| spell.level == 1 && spell.is_available_to(class))
    }

    /// Cantrips on `class`'s list, sorted by name.
    pub fn cantrips_for_class(&self, class: SpellClass) -> Vec<&'a SpellData> {
        self.catalog.for_class_at_level(class, 0)
    }

    /// Level 1 spells on `class`'s list, sorted by name.
    pub fn level1_spells_for_class(&self, class: SpellClass) -> Vec<&'a SpellData> {
        self.catalog.for_class_at_level(class, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse_selection;

    fn names(catalog: &SpellCatalog, text: &str) -> Vec<String> {
        let resolver = SpellNameResolver::new(catalog);
        let parsed = parse_selection(text).expect("text should contain a marker");
        resolver
            .resolve_candidates(&parsed.lists)
            .into_iter()
            .map(|s| s.name.clone())
            .collect()
    }

    fn srd() -> SpellCatalog {
        SpellCatalog::srd().expect("bundled SRD catalog should load")
    }

    #[test]
    fn test_resolve_ignores_case_and_spacing() {
        let catalog = srd();
        let resolver = SpellNameResolver::new(&catalog);
        for raw in ["Mage Hand", "mage hand", "MAGEHAND", "mage-hand", "\"mage hand\""] {
            assert_eq!(
                resolver.resolve_spell_name(raw).map(|s| s.name.as_str()),
                Some("Mage Hand"),
                "{raw:?}"
            );
        }
        assert!(resolver.resolve_spell_name("mage hands").is_none());
        assert!(resolver.resolve_spell_name("").is_none());
        assert!(resolver.resolve_spell_name("!!").is_none());
    }

    #[test]
    fn test_names_containing_separators() {
        let catalog = srd();
        assert_eq!(
            names(&catalog, "i choose detect evil and good and cure wounds"),
            vec!["Detect Evil and Good", "Cure Wounds"]
        );
        assert_eq!(
            names(&catalog, "i'll take create or destroy water"),
            vec!["Create or Destroy Water"]
        );
    }

    #[test]
    fn test_duplicates_collapse_to_first_mention() {
        let catalog = srd();
        assert_eq!(
            names(&catalog, "i choose mage hand, light, and magehand"),
            vec!["Mage Hand", "Light"]
        );
    }

    #[test]
    fn test_unknown_fragments_dropped() {
        let catalog = srd();
        assert_eq!(
            names(&catalog, "i pick light, super nova blast, and mending"),
            vec!["Light", "Mending"]
        );
    }

    #[test]
    fn test_class_validity() {
        let catalog = srd();
        let resolver = SpellNameResolver::new(&catalog);
        assert!(resolver.is_valid_cantrip("vicious mockery", SpellClass::Bard));
        assert!(!resolver.is_valid_cantrip("fire bolt", SpellClass::Bard));
        assert!(!resolver.is_valid_cantrip("healing word", SpellClass::Bard));
        assert!(resolver.is_valid_level1_spell("healing word", SpellClass::Bard));
        assert!(!resolver.is_valid_level1_spell("fireball", SpellClass::Wizard));
    }

    #[test]
    fn test_official_spell_name() {
        let catalog = srd();
        let resolver = SpellNameResolver::new(&catalog);
        assert_eq!(resolver.official_spell_name("fire bolt", 0), Some("Fire Bolt"));
        assert_eq!(resolver.official_spell_name("fire bolt", 1), None);
        assert_eq!(resolver.official_spell_name("magic missile", 1), Some("Magic Missile"));
    }

    #[test]
    fn test_class_lists_sorted() {
        let catalog = srd();
        let resolver = SpellNameResolver::new(&catalog);
        let cantrips = resolver.cantrips_for_class(SpellClass::Warlock);
        assert!(cantrips.iter().any(|s| s.name == "Eldritch Blast"));
        assert!(cantrips.iter().all(|s| s.level == 0));
        let spells = resolver.level1_spells_for_class(SpellClass::Cleric);
        assert!(spells.iter().any(|s| s.name == "Cure Wounds"));
        assert!(spells.windows(2).all(|w| w[0].name <= w[1].name));
    }
}
