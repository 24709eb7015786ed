//! Spell catalog and spell record types.
//!
//! The catalog is an immutable value built once and shared by reference with
//! everything that needs to look spells up. The bundled SRD table lives in
//! `data/srd_spells.json`; tests are free to build smaller catalogs.

use crate::normalize::match_key;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The bundled SRD spell table.
const SRD_SPELLS_JSON: &str = include_str!("../data/srd_spells.json");

/// Errors from building a spell catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spell name \"{name}\" collides with \"{existing}\"")]
    DuplicateName { name: String, existing: String },

    #[error("Spell with an empty name")]
    EmptyName,
}

/// Schools of magic in D&D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellSchool {
    Abjuration,
    Conjuration,
    Divination,
    Enchantment,
    Evocation,
    Illusion,
    Necromancy,
    Transmutation,
}

impl SpellSchool {
    pub fn name(&self) -> &'static str {
        match self {
            SpellSchool::Abjuration => "Abjuration",
            SpellSchool::Conjuration => "Conjuration",
            SpellSchool::Divination => "Divination",
            SpellSchool::Enchantment => "Enchantment",
            SpellSchool::Evocation => "Evocation",
            SpellSchool::Illusion => "Illusion",
            SpellSchool::Necromancy => "Necromancy",
            SpellSchool::Transmutation => "Transmutation",
        }
    }
}

/// Damage types a spell can deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageType {
    Acid,
    Bludgeoning,
    Cold,
    Fire,
    Force,
    Lightning,
    Necrotic,
    Piercing,
    Poison,
    Psychic,
    Radiant,
    Slashing,
    Thunder,
}

/// Type of spell attack (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellAttackType {
    Melee,
    Ranged,
}

/// Spell components required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Components {
    pub verbal: bool,
    pub somatic: bool,
    pub material: Option<String>,
}

impl Components {
    pub fn vs() -> Self {
        Self {
            verbal: true,
            somatic: true,
            material: None,
        }
    }
}

/// Classes that can appear on a spell's class list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellClass {
    Bard,
    Cleric,
    Druid,
    Paladin,
    Ranger,
    Sorcerer,
    Warlock,
    Wizard,
}

impl SpellClass {
    pub fn name(&self) -> &'static str {
        match self {
            SpellClass::Bard => "Bard",
            SpellClass::Cleric => "Cleric",
            SpellClass::Druid => "Druid",
            SpellClass::Paladin => "Paladin",
            SpellClass::Ranger => "Ranger",
            SpellClass::Sorcerer => "Sorcerer",
            SpellClass::Warlock => "Warlock",
            SpellClass::Wizard => "Wizard",
        }
    }
}

/// A spell record. Only `name`, `level` and `classes` matter to selection;
/// the rest is descriptive and feeds the tutorial prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellData {
    pub name: String,
    pub level: u8, // 0 for cantrips
    pub school: SpellSchool,
    pub casting_time: String,
    pub range: String,
    pub components: Components,
    pub duration: String,
    #[serde(default)]
    pub concentration: bool,
    #[serde(default)]
    pub ritual: bool,
    pub description: String,
    #[serde(default)]
    pub damage_type: Option<DamageType>,
    #[serde(default)]
    pub attack_type: Option<SpellAttackType>,
    pub classes: Vec<SpellClass>,
}

impl SpellData {
    /// Check if this is a cantrip.
    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }

    /// Check if the class list contains `class`.
    pub fn is_available_to(&self, class: SpellClass) -> bool {
        self.classes.contains(&class)
    }
}

/// Read-only spell lookup.
///
/// Names are unique under [`match_key`], so "Mage Hand", "magehand" and
/// "MAGE-HAND" all address the same record.
#[derive(Debug, Clone)]
pub struct SpellCatalog {
    spells: Vec<SpellData>,
    by_name: HashMap<String, usize>,
    by_key: HashMap<String, usize>,
}

impl SpellCatalog {
    /// Build a catalog from spell records.
    pub fn new(spells: Vec<SpellData>) -> Result<Self, CatalogError> {
        let mut by_name = HashMap::with_capacity(spells.len());
        let mut by_key = HashMap::with_capacity(spells.len());

        for (index, spell) in spells.iter().enumerate() {
            let key = match_key(&spell.name);
            if key.is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if let Some(&existing) = by_key.get(&key) {
                let existing: &SpellData = &spells[existing];
                return Err(CatalogError::DuplicateName {
                    name: spell.name.clone(),
                    existing: existing.name.clone(),
                });
            }
            by_key.insert(key, index);
            by_name.insert(spell.name.to_lowercase(), index);
        }

        Ok(Self {
            spells,
            by_name,
            by_key,
        })
    }

    /// Parse a JSON array of spell records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let spells: Vec<SpellData> = serde_json::from_str(json)?;
        Self::new(spells)
    }

    /// The bundled SRD catalog.
    pub fn srd() -> Result<Self, CatalogError> {
        Self::from_json(SRD_SPELLS_JSON)
    }

    /// Look up a spell by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&SpellData> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.spells[i])
    }

    /// Look up a spell by its punctuation- and space-free key.
    pub fn by_match_key(&self, key: &str) -> Option<&SpellData> {
        self.by_key.get(key).map(|&i| &self.spells[i])
    }

    /// All spells, in catalog order.
    pub fn all(&self) -> impl Iterator<Item = &SpellData> {
        self.spells.iter()
    }

    /// All spells of a specific level.
    pub fn by_level(&self, level: u8) -> impl Iterator<Item = &SpellData> {
        self.spells.iter().filter(move |s| s.level == level)
    }

    /// All spells available to a class.
    pub fn for_class(&self, class: SpellClass) -> impl Iterator<Item = &SpellData> {
        self.spells.iter().filter(move |s| s.is_available_to(class))
    }

    /// Spells of one level available to a class, sorted by name.
    pub fn for_class_at_level(&self, class: SpellClass, level: u8) -> Vec<&SpellData> {
        let mut spells: Vec<_> = self
            .for_class(class)
            .filter(|s| s.level == level)
            .collect();
        spells.sort_by(|a, b| a.name.cmp(&b.name));
        spells
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}
