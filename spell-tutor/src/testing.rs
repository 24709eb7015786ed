//! Testing utilities for the spell tutorial.
//!
//! This module provides tools for integration testing:
//! - `fixture_catalog` for a small catalog that stands in for the SRD
//! - `TutorialHarness` for scripted multi-turn tutorial sessions
//! - Assertion helpers for verifying tutorial state

use crate::config::TutorConfig;
use crate::spells::{
    Components, DamageType, SpellAttackType, SpellCatalog, SpellClass, SpellData, SpellSchool,
};
use crate::tutorial::{apply_effects, Resolution, Tutorial, TutorialCharacter, TutorialState};

fn spell(
    name: &str,
    level: u8,
    school: SpellSchool,
    classes: &[SpellClass],
    description: &str,
) -> SpellData {
    SpellData {
        name: name.to_string(),
        level,
        school,
        casting_time: "1 action".to_string(),
        range: "60 feet".to_string(),
        components: Components::vs(),
        duration: "Instantaneous".to_string(),
        concentration: false,
        ritual: false,
        description: description.to_string(),
        damage_type: None,
        attack_type: None,
        classes: classes.to_vec(),
    }
}

/// A dozen spells, enough to drive every tutorial step for Bard, Cleric and
/// Warlock. "Hex" is here and not in the SRD table.
pub fn fixture_catalog() -> SpellCatalog {
    use SpellClass::*;

    let mut eldritch_blast = spell(
        "Eldritch Blast",
        0,
        SpellSchool::Evocation,
        &[Warlock],
        "A beam of crackling energy streaks toward a creature within range.",
    );
    eldritch_blast.damage_type = Some(DamageType::Force);
    eldritch_blast.attack_type = Some(SpellAttackType::Ranged);

    let spells = vec![
        spell(
            "Light",
            0,
            SpellSchool::Evocation,
            &[Bard, Cleric, Sorcerer, Wizard],
            "You touch one object and it sheds bright light.",
        ),
        spell(
            "Mage Hand",
            0,
            SpellSchool::Conjuration,
            &[Bard, Sorcerer, Warlock, Wizard],
            "A spectral, floating hand appears at a point you choose within range.",
        ),
        eldritch_blast,
        spell(
            "Vicious Mockery",
            0,
            SpellSchool::Enchantment,
            &[Bard],
            "You unleash a string of insults laced with subtle enchantments.",
        ),
        spell(
            "Sacred Flame",
            0,
            SpellSchool::Evocation,
            &[Cleric],
            "Flame-like radiance descends on a creature that you can see within range.",
        ),
        spell(
            "Guidance",
            0,
            SpellSchool::Divination,
            &[Cleric, Druid],
            "You touch one willing creature and it can add a d4 to one ability check.",
        ),
        spell(
            "Thaumaturgy",
            0,
            SpellSchool::Transmutation,
            &[Cleric],
            "You manifest a minor wonder, a sign of supernatural power.",
        ),
        spell(
            "Healing Word",
            1,
            SpellSchool::Evocation,
            &[Bard, Cleric, Druid],
            "A creature of your choice that you can see within range regains hit points.",
        ),
        spell(
            "Charm Person",
            1,
            SpellSchool::Enchantment,
            &[Bard, Druid, Sorcerer, Warlock, Wizard],
            "You attempt to charm a humanoid you can see within range.",
        ),
        spell(
            "Sleep",
            1,
            SpellSchool::Enchantment,
            &[Bard, Sorcerer, Wizard],
            "This spell sends creatures into a magical slumber.",
        ),
        spell(
            "Hex",
            1,
            SpellSchool::Enchantment,
            &[Warlock],
            "You place a curse on a creature that you can see within range.",
        ),
        spell(
            "Detect Evil and Good",
            1,
            SpellSchool::Divination,
            &[Cleric, Paladin],
            "For the duration, you know if there is an aberration, celestial or fiend nearby.",
        ),
        spell(
            "Wish",
            9,
            SpellSchool::Conjuration,
            &[Sorcerer, Wizard],
            "Wish is the mightiest spell a mortal creature can cast.",
        ),
    ];

    match SpellCatalog::new(spells) {
        Ok(catalog) => catalog,
        Err(e) => panic!("fixture spells must have unique names: {e}"),
    }
}

/// Test harness for running tutorial sessions.
///
/// Owns a catalog and one character. Every input goes through the real
/// detector and engine, and accepted effects are applied to the character.
pub struct TutorialHarness {
    /// The spell catalog.
    pub catalog: SpellCatalog,
    /// Tutorial configuration.
    pub config: TutorConfig,
    /// The character being tutored.
    pub character: TutorialCharacter,
    /// Every resolution so far, in order.
    pub history: Vec<Resolution>,
}

impl TutorialHarness {
    /// Create a harness over the fixture catalog.
    pub fn new(class: &str) -> Self {
        Self::with_catalog(fixture_catalog(), class)
    }

    /// Create a harness over the bundled SRD catalog.
    pub fn srd(class: &str) -> Self {
        match SpellCatalog::srd() {
            Ok(catalog) => Self::with_catalog(catalog, class),
            Err(e) => panic!("bundled SRD catalog must load: {e}"),
        }
    }

    /// Create a harness over a custom catalog.
    pub fn with_catalog(catalog: SpellCatalog, class: &str) -> Self {
        Self {
            catalog,
            config: TutorConfig::default(),
            character: TutorialCharacter::new("test-character", "Test Hero", class),
            history: Vec::new(),
        }
    }

    /// The engine over this harness's catalog.
    pub fn tutorial(&self) -> Tutorial<'_> {
        Tutorial::new(&self.catalog).with_config(self.config.clone())
    }

    /// Send player input. Returns `None` when the tutorial ignored it.
    pub fn input(&mut self, text: &str) -> Option<Resolution> {
        let resolution = self.tutorial().resolve_message(&self.character, text)?;
        if resolution.accepted {
            apply_effects(&mut self.character, &resolution.effects);
        }
        self.history.push(resolution.clone());
        Some(resolution)
    }

    /// The guidance prompt for the current step.
    pub fn context(&self) -> String {
        self.tutorial().tutorial_context(&self.character)
    }

    pub fn state(&self) -> Option<TutorialState> {
        self.character.tutorial_state
    }

    pub fn cantrips(&self) -> &[String] {
        &self.character.selected_cantrips
    }

    pub fn spells(&self) -> &[String] {
        &self.character.selected_spells
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the character is at the given tutorial step.
#[track_caller]
pub fn assert_state(harness: &TutorialHarness, expected: Option<TutorialState>) {
    assert_eq!(
        harness.state(),
        expected,
        "Expected tutorial state {expected:?}, got {:?}",
        harness.state()
    );
}

/// Assert an input was picked up and accepted.
#[track_caller]
pub fn assert_accepted(resolution: Option<&Resolution>) {
    match resolution {
        Some(r) => assert!(r.accepted, "Expected acceptance, got: {}", r.summary),
        None => panic!("Expected the input to be recognized"),
    }
}

/// Assert an input was picked up and rejected without effects.
#[track_caller]
pub fn assert_rejected(resolution: Option<&Resolution>) {
    match resolution {
        Some(r) => {
            assert!(!r.accepted, "Expected rejection, got: {}", r.summary);
            assert!(r.effects.is_empty(), "Rejected resolution carried effects");
        }
        None => panic!("Expected the input to be recognized"),
    }
}
