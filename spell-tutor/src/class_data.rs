//! D&D 5e class data for the spell tutorial.
//!
//! Holds the closed set of classes and, for the six classes that cast spells
//! at level 1, how many cantrips and spells a new character starts with.

use crate::spells::SpellClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing class names at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassError {
    #[error("Unknown class: {0}")]
    UnknownClass(String),
}

/// D&D character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

/// What a spellcasting class starts with at level 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSpellProfile {
    pub starting_cantrips: u8,
    /// 0 means the class prepares spells from its whole list each day.
    pub starting_spells: u8,
    pub level_1_slots: u8,
}

impl ClassSpellProfile {
    const fn new(starting_cantrips: u8, starting_spells: u8, level_1_slots: u8) -> Self {
        Self {
            starting_cantrips,
            starting_spells,
            level_1_slots,
        }
    }

    /// True for classes that prepare spells instead of learning a fixed list.
    pub fn prepares_spells(&self) -> bool {
        self.starting_spells == 0
    }
}

/// Starting spell counts as exposed to UI and validators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartingSpellInfo {
    pub cantrips: u8,
    pub spells: u8,
    pub prepare_spells: bool,
}

impl From<ClassSpellProfile> for StartingSpellInfo {
    fn from(profile: ClassSpellProfile) -> Self {
        Self {
            cantrips: profile.starting_cantrips,
            spells: profile.starting_spells,
            prepare_spells: profile.prepares_spells(),
        }
    }
}

/// Starting spell counts for a class name. Unknown and non-spellcasting
/// classes get all zeros.
pub fn starting_spell_info(class_name: &str) -> StartingSpellInfo {
    class_name
        .parse::<CharacterClass>()
        .ok()
        .and_then(|class| class.spell_profile())
        .map(StartingSpellInfo::from)
        .unwrap_or_default()
}

impl CharacterClass {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Barbarian => "Barbarian",
            CharacterClass::Bard => "Bard",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Druid => "Druid",
            CharacterClass::Fighter => "Fighter",
            CharacterClass::Monk => "Monk",
            CharacterClass::Paladin => "Paladin",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Sorcerer => "Sorcerer",
            CharacterClass::Warlock => "Warlock",
            CharacterClass::Wizard => "Wizard",
        }
    }

    /// Get a short description of the class.
    pub fn description(&self) -> &'static str {
        match self {
            CharacterClass::Barbarian => "A fierce warrior who can enter a battle rage",
            CharacterClass::Bard => "An inspiring magician whose music weaves magic",
            CharacterClass::Cleric => "A priestly champion who wields divine magic",
            CharacterClass::Druid => "A priest of the Old Faith, wielding nature's power",
            CharacterClass::Fighter => "A master of martial combat, skilled with weapons and armor",
            CharacterClass::Monk => "A master of martial arts, harnessing body and soul",
            CharacterClass::Paladin => "A holy warrior bound to a sacred oath",
            CharacterClass::Ranger => "A warrior who combats threats on the edges of civilization",
            CharacterClass::Rogue => "A scoundrel who uses stealth and trickery",
            CharacterClass::Sorcerer => "A spellcaster who draws on inherent magic",
            CharacterClass::Warlock => "A wielder of magic derived from a bargain with an extraplanar entity",
            CharacterClass::Wizard => "A scholarly magic-user who masters arcane secrets",
        }
    }

    /// Get all character classes.
    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Barbarian,
            CharacterClass::Bard,
            CharacterClass::Cleric,
            CharacterClass::Druid,
            CharacterClass::Fighter,
            CharacterClass::Monk,
            CharacterClass::Paladin,
            CharacterClass::Ranger,
            CharacterClass::Rogue,
            CharacterClass::Sorcerer,
            CharacterClass::Warlock,
            CharacterClass::Wizard,
        ]
    }

    /// The name this class goes by on spell class lists.
    pub fn spell_class(&self) -> Option<SpellClass> {
        match self {
            CharacterClass::Bard => Some(SpellClass::Bard),
            CharacterClass::Cleric => Some(SpellClass::Cleric),
            CharacterClass::Druid => Some(SpellClass::Druid),
            CharacterClass::Paladin => Some(SpellClass::Paladin),
            CharacterClass::Ranger => Some(SpellClass::Ranger),
            CharacterClass::Sorcerer => Some(SpellClass::Sorcerer),
            CharacterClass::Warlock => Some(SpellClass::Warlock),
            CharacterClass::Wizard => Some(SpellClass::Wizard),
            CharacterClass::Barbarian
            | CharacterClass::Fighter
            | CharacterClass::Monk
            | CharacterClass::Rogue => None,
        }
    }

    /// Starting spells at level 1, for classes that cast at level 1.
    pub fn spell_profile(&self) -> Option<ClassSpellProfile> {
        match self {
            CharacterClass::Bard => Some(ClassSpellProfile::new(2, 4, 2)),
            CharacterClass::Cleric => Some(ClassSpellProfile::new(3, 0, 2)),
            CharacterClass::Druid => Some(ClassSpellProfile::new(2, 0, 2)),
            CharacterClass::Sorcerer => Some(ClassSpellProfile::new(4, 2, 2)),
            // Pact magic: one slot that recharges on a short rest
            CharacterClass::Warlock => Some(ClassSpellProfile::new(2, 2, 1)),
            CharacterClass::Wizard => Some(ClassSpellProfile::new(3, 6, 2)),
            // Paladin and Ranger get spellcasting at level 2
            _ => None,
        }
    }

    /// Returns true if this class has spellcasting at level 1.
    pub fn is_spellcaster(&self) -> bool {
        self.spell_profile().is_some()
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = ClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CharacterClass::all()
            .iter()
            .copied()
            .find(|class| class.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ClassError::UnknownClass(wanted.to_string()))
    }
}
