//! Class and count rules for starting spell selections.
//!
//! Validation never fails with an error: every input, however malformed,
//! produces a [`ValidationResult`] whose message can be shown to the player.
//!
//! Rules are checked in order and the first failure wins:
//! 1. The class must cast spells at level 1.
//! 2. A class that prepares spells needs no selection and passes trivially.
//! 3. The number of names must equal the class's starting count exactly.
//! 4. Every name must be a spell of the right tier on the class's list.
//! 5. No spell may be named twice.

use crate::action::SelectionKind;
use crate::class_data::CharacterClass;
use crate::prompts::count_of;
use crate::resolver::SpellNameResolver;
use crate::spells::SpellCatalog;
use crate::tutorial::TutorialCharacter;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Outcome of validating a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
}

impl ValidationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Validates starting spell selections against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct SpellValidator<'a> {
    resolver: SpellNameResolver<'a>,
    starting_spell_level: u8,
}

impl<'a> SpellValidator<'a> {
    pub fn new(catalog: &'a SpellCatalog) -> Self {
        Self {
            resolver: SpellNameResolver::new(catalog),
            starting_spell_level: 1,
        }
    }

    /// Level that starting (non-cantrip) spells must have.
    pub fn with_starting_spell_level(mut self, level: u8) -> Self {
        self.starting_spell_level = level;
        self
    }

    /// Validate cantrips for a class given by name.
    pub fn validate_cantrip_selection<S: AsRef<str>>(
        &self,
        class_name: &str,
        spell_names: &[S],
    ) -> ValidationResult {
        match class_name.parse::<CharacterClass>() {
            Ok(class) => self.validate_cantrips(class, spell_names),
            Err(_) => not_a_caster(class_name.trim()),
        }
    }

    /// Validate starting spells for a class given by name.
    pub fn validate_spell_selection<S: AsRef<str>>(
        &self,
        class_name: &str,
        spell_names: &[S],
    ) -> ValidationResult {
        match class_name.parse::<CharacterClass>() {
            Ok(class) => self.validate_spells(class, spell_names),
            Err(_) => not_a_caster(class_name.trim()),
        }
    }

    pub fn validate_cantrips<S: AsRef<str>>(
        &self,
        class: CharacterClass,
        spell_names: &[S],
    ) -> ValidationResult {
        self.validate(class, SelectionKind::SelectCantrips, spell_names)
    }

    pub fn validate_spells<S: AsRef<str>>(
        &self,
        class: CharacterClass,
        spell_names: &[S],
    ) -> ValidationResult {
        self.validate(class, SelectionKind::SelectSpells, spell_names)
    }

    /// Validate a selection of either kind.
    pub fn validate<S: AsRef<str>>(
        &self,
        class: CharacterClass,
        kind: SelectionKind,
        spell_names: &[S],
    ) -> ValidationResult {
        let (Some(profile), Some(spell_class)) = (class.spell_profile(), class.spell_class()) else {
            return not_a_caster(class.name());
        };

        let (expected, level, tier) = match kind {
            SelectionKind::SelectCantrips => (profile.starting_cantrips, 0, "cantrip".to_string()),
            SelectionKind::SelectSpells => (
                profile.starting_spells,
                self.starting_spell_level,
                format!("Level {} spell", self.starting_spell_level),
            ),
        };

        if expected == 0 {
            return ValidationResult::ok(format!(
                "{class} prepares spells rather than learning them. No selection is needed."
            ));
        }

        if spell_names.len() != expected as usize {
            return ValidationResult::fail(format!(
                "You need to select exactly {}, but you selected {}.",
                count_of(expected as usize, kind.noun()),
                spell_names.len()
            ));
        }

        let mut seen = HashSet::new();
        for raw in spell_names {
            let raw = raw.as_ref();
            let spell = self
                .resolver
                .resolve_spell_name(raw)
                .filter(|s| s.level == level && s.is_available_to(spell_class));
            let Some(spell) = spell else {
                return ValidationResult::fail(format!(
                    "\"{}\" is not a valid {tier} for {class}.",
                    raw.trim()
                ));
            };
            if !seen.insert(spell.name.as_str()) {
                return ValidationResult::fail(format!(
                    "You selected {} more than once.",
                    spell.name
                ));
            }
        }

        ValidationResult::ok(format!("Valid {} selection!", kind.noun()))
    }
}

/// What a tutorial character still has to choose, as player-facing phrases.
/// Empty when nothing is missing or the class has nothing to choose.
pub fn missing_selections(character: &TutorialCharacter) -> Vec<String> {
    let Some(profile) = character
        .class
        .parse::<CharacterClass>()
        .ok()
        .and_then(|class| class.spell_profile())
    else {
        return Vec::new();
    };

    let mut missing = Vec::new();
    let cantrips =
        (profile.starting_cantrips as usize).saturating_sub(character.selected_cantrips.len());
    if cantrips > 0 {
        missing.push(count_of(cantrips, "more cantrip"));
    }
    let spells =
        (profile.starting_spells as usize).saturating_sub(character.selected_spells.len());
    if spells > 0 {
        missing.push(count_of(spells, "more level-1 spell"));
    }
    missing
}

fn not_a_caster(class_name: &str) -> ValidationResult {
    ValidationResult::fail(format!("{class_name} is not a spellcasting class."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_catalog;

    fn srd() -> SpellCatalog {
        SpellCatalog::srd().expect("bundled SRD catalog should load")
    }

    #[test]
    fn test_valid_wizard_cantrips() {
        let catalog = srd();
        let validator = SpellValidator::new(&catalog);
        let result = validator.validate_cantrip_selection(
            "Wizard",
            &["Fire Bolt", "Mage Hand", "Prestidigitation"],
        );
        assert!(result.valid, "{}", result.message);
        assert_eq!(result.message, "Valid cantrip selection!");
    }

    #[test]
    fn test_exact_count_required() {
        let catalog = srd();
        let validator = SpellValidator::new(&catalog);
        let under = validator.validate_spell_selection("Bard", &["Healing Word", "Charm Person"]);
        assert!(!under.valid);
        assert!(under.message.contains("exactly 4"), "{}", under.message);

        let over = validator.validate_cantrip_selection(
            "Warlock",
            &["Eldritch Blast", "Mage Hand", "Minor Illusion"],
        );
        assert!(!over.valid);
        assert_eq!(
            over.message,
            "You need to select exactly 2 cantrips, but you selected 3."
        );
    }

    #[test]
    fn test_count_rule_for_every_class() {
        let catalog = srd();
        let validator = SpellValidator::new(&catalog);
        for class in CharacterClass::all() {
            let Some(profile) = class.spell_profile() else {
                continue;
            };
            let names: Vec<&str> = vec!["Light"; profile.starting_cantrips as usize + 1];
            assert!(!validator.validate_cantrips(*class, &names).valid, "{class}");
            let none: &[&str] = &[];
            assert!(!validator.validate_cantrips(*class, none).valid, "{class}");
        }
    }

    #[test]
    fn test_class_eligibility() {
        let catalog = srd();
        let validator = SpellValidator::new(&catalog);
        let result = validator.validate_cantrip_selection("Bard", &["Fire Bolt", "Light"]);
        assert!(!result.valid);
        assert_eq!(result.message, "\"Fire Bolt\" is not a valid cantrip for Bard.");
    }

    #[test]
    fn test_tier_checked() {
        let catalog = srd();
        let validator = SpellValidator::new(&catalog);
        let result = validator.validate_spell_selection("Sorcerer", &["Shield", "Fire Bolt"]);
        assert!(!result.valid);
        assert_eq!(result.message, "\"Fire Bolt\" is not a valid Level 1 spell for Sorcerer.");

        let result = validator.validate_spell_selection("Sorcerer", &["Shield", "Fireball"]);
        assert!(!result.valid);
        assert!(result.message.contains("Fireball"));
    }

    #[test]
    fn test_unknown_names_fail() {
        let catalog = srd();
        let validator = SpellValidator::new(&catalog);
        let result =
            validator.validate_cantrip_selection("Druid", &["Druidcraft", "Moonbeam Lite"]);
        assert!(!result.valid);
        assert!(result.message.contains("Moonbeam Lite"));
    }

    #[test]
    fn test_duplicates_fail() {
        let catalog = srd();
        let validator = SpellValidator::new(&catalog);
        let result = validator.validate_cantrip_selection("Druid", &["Druidcraft", "druidcraft"]);
        assert!(!result.valid);
        assert_eq!(result.message, "You selected Druidcraft more than once.");
    }

    #[test]
    fn test_non_casters() {
        let catalog = srd();
        let validator = SpellValidator::new(&catalog);
        let fighter = validator.validate_cantrip_selection("Fighter", &["Light"]);
        assert!(!fighter.valid);
        assert_eq!(fighter.message, "Fighter is not a spellcasting class.");
        let paladin = validator.validate_spell_selection("paladin", &["Bless"]);
        assert_eq!(paladin.message, "Paladin is not a spellcasting class.");
        let unknown = validator.validate_spell_selection("Artificer", &["Light"]);
        assert_eq!(unknown.message, "Artificer is not a spellcasting class.");
    }

    #[test]
    fn test_preparing_classes_pass_trivially() {
        let catalog = srd();
        let validator = SpellValidator::new(&catalog);
        let none: &[&str] = &[];
        let result = validator.validate_spell_selection("Cleric", none);
        assert!(result.valid);
        assert!(result.message.contains("prepares spells"));
        assert!(validator.validate_spell_selection("Druid", &["Anything"]).valid);
    }

    #[test]
    fn test_revalidation_is_stable() {
        let catalog = srd();
        let validator = SpellValidator::new(&catalog);
        let names = ["Sacred Flame", "Guidance", "Thaumaturgy"];
        let first = validator.validate_cantrip_selection("Cleric", &names);
        assert!(first.valid);
        assert_eq!(first, validator.validate_cantrip_selection("Cleric", &names));
    }

    #[test]
    fn test_fixture_catalog_substitutes() {
        let catalog = fixture_catalog();
        let validator = SpellValidator::new(&catalog);
        // Fire Bolt is in the SRD but not in the fixture
        let result =
            validator.validate_cantrip_selection("Warlock", &["Eldritch Blast", "Fire Bolt"]);
        assert!(!result.valid);
    }

    #[test]
    fn test_missing_selections() {
        let mut character = TutorialCharacter::new("pc", "Lyra", "Bard");
        assert_eq!(
            missing_selections(&character),
            vec!["2 more cantrips", "4 more level-1 spells"]
        );
        character.selected_cantrips = vec!["Light".into(), "Mending".into()];
        character.selected_spells = vec!["Sleep".into(), "Bane".into(), "Heroism".into()];
        assert_eq!(missing_selections(&character), vec!["1 more level-1 spell"]);

        let cleric = TutorialCharacter::new("pc2", "Aldric", "Cleric");
        assert_eq!(missing_selections(&cleric), vec!["3 more cantrips"]);
        let fighter = TutorialCharacter::new("pc3", "Brom", "Fighter");
        assert!(missing_selections(&fighter).is_empty());
    }
}
