//! The level 0 spell tutorial.
//!
//! A new spellcaster moves through `needs_cantrips`, then `needs_spells`
//! (skipped by classes that prepare spells), then `complete`. Declaring
//! readiness in `complete` makes the character level 1.
//!
//! The engine never mutates a character. [`Tutorial::resolve`] returns
//! [`Effect`]s and the caller applies them with [`apply_effects`] to the
//! record it owns.

use crate::action::{ActorId, SelectionAction, SelectionKind, TutorialIntent};
use crate::class_data::{self, CharacterClass, ClassSpellProfile, StartingSpellInfo};
use crate::config::TutorConfig;
use crate::detector::SpellSelectionDetector;
use crate::prompts::{self, count_of};
use crate::spells::SpellCatalog;
use crate::validator::{missing_selections, SpellValidator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Level a character reaches by finishing the tutorial.
const GRADUATION_LEVEL: u8 = 1;

/// Errors from the tutorial boundary.
///
/// Player text never produces one of these. They signal a malformed record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TutorialError {
    #[error("Unknown tutorial state: {0}")]
    UnknownState(String),
}

/// Where a character is in the tutorial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TutorialState {
    NeedsCantrips,
    NeedsSpells,
    Complete,
}

impl TutorialState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TutorialState::NeedsCantrips => "needs_cantrips",
            TutorialState::NeedsSpells => "needs_spells",
            TutorialState::Complete => "complete",
        }
    }
}

impl fmt::Display for TutorialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TutorialState {
    type Err = TutorialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "needs_cantrips" => Ok(TutorialState::NeedsCantrips),
            "needs_spells" => Ok(TutorialState::NeedsSpells),
            "complete" => Ok(TutorialState::Complete),
            other => Err(TutorialError::UnknownState(other.to_string())),
        }
    }
}

/// The parts of a character record the tutorial reads and changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialCharacter {
    pub id: ActorId,
    pub name: String,
    pub level: u8,
    pub class: String,
    #[serde(default)]
    pub tutorial_state: Option<TutorialState>,
    #[serde(default)]
    pub selected_cantrips: Vec<String>,
    #[serde(default)]
    pub selected_spells: Vec<String>,
    /// Spell level to number of slots.
    #[serde(default)]
    pub spell_slots: BTreeMap<u8, u8>,
}

impl TutorialCharacter {
    /// A fresh level 0 character. Spellcasters start at `needs_cantrips`,
    /// everyone else outside the tutorial.
    pub fn new(id: impl Into<ActorId>, name: impl Into<String>, class: impl Into<String>) -> Self {
        let class = class.into();
        let is_caster = class
            .parse::<CharacterClass>()
            .is_ok_and(|c| c.is_spellcaster());
        Self {
            id: id.into(),
            name: name.into(),
            level: 0,
            class,
            tutorial_state: is_caster.then_some(TutorialState::NeedsCantrips),
            selected_cantrips: Vec::new(),
            selected_spells: Vec::new(),
            spell_slots: BTreeMap::new(),
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_state(mut self, state: Option<TutorialState>) -> Self {
        self.tutorial_state = state;
        self
    }
}

/// A concrete change to a tutorial character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// The character's cantrips become exactly these
    LearnCantrips { spells: Vec<String> },

    /// The character's starting spells become exactly these
    LearnSpells { spells: Vec<String> },

    /// Move to another tutorial step
    SetTutorialState { state: TutorialState },

    SetLevel { level: u8 },

    /// Spell level to number of slots
    SetSpellSlots { slots: BTreeMap<u8, u8> },

    /// Leave the tutorial
    ClearTutorialState,
}

/// The result of resolving a tutorial intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub accepted: bool,
    /// What happened, for the player.
    pub summary: String,
    /// What the player should do next, if anything.
    pub next_step: Option<String>,
    pub effects: Vec<Effect>,
}

impl Resolution {
    pub fn accepted(summary: impl Into<String>) -> Self {
        Self {
            accepted: true,
            summary: summary.into(),
            next_step: None,
            effects: Vec::new(),
        }
    }

    pub fn rejected(summary: impl Into<String>) -> Self {
        Self {
            accepted: false,
            summary: summary.into(),
            next_step: None,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_next_step(mut self, step: impl Into<String>) -> Self {
        self.next_step = Some(step.into());
        self
    }
}

/// The tutorial engine.
#[derive(Debug, Clone)]
pub struct Tutorial<'a> {
    catalog: &'a SpellCatalog,
    config: TutorConfig,
}

impl<'a> Tutorial<'a> {
    pub fn new(catalog: &'a SpellCatalog) -> Self {
        Self {
            catalog,
            config: TutorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &TutorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &'a SpellCatalog {
        self.catalog
    }

    pub fn detector(&self) -> SpellSelectionDetector<'a> {
        SpellSelectionDetector::new(self.catalog)
    }

    pub fn validator(&self) -> SpellValidator<'a> {
        SpellValidator::new(self.catalog)
            .with_starting_spell_level(self.config.starting_spell_level)
    }

    /// The state the tutorial applies to, or `None` when the character is
    /// not at tutorial level or has no state.
    fn active_state(&self, character: &TutorialCharacter) -> Option<TutorialState> {
        if character.level != self.config.tutorial_level {
            return None;
        }
        character.tutorial_state
    }

    /// Guidance for the character's current step. Empty when no guidance
    /// applies: wrong level, no state, `complete`, or a class without spells.
    pub fn tutorial_context(&self, character: &TutorialCharacter) -> String {
        let Ok(class) = character.class.parse::<CharacterClass>() else {
            return String::new();
        };
        match self.active_state(character) {
            Some(TutorialState::NeedsCantrips) => {
                prompts::cantrip_selection_prompt(class, self.catalog, &self.config)
            }
            Some(TutorialState::NeedsSpells) => prompts::spell_selection_prompt(
                class,
                &character.selected_cantrips,
                self.catalog,
                &self.config,
            ),
            Some(TutorialState::Complete) | None => String::new(),
        }
    }

    pub fn starting_spell_info(&self, class_name: &str) -> StartingSpellInfo {
        class_data::starting_spell_info(class_name)
    }

    /// The step after a successful selection in `state`.
    pub fn next_state(state: TutorialState, profile: &ClassSpellProfile) -> TutorialState {
        match state {
            TutorialState::NeedsCantrips if profile.prepares_spells() => TutorialState::Complete,
            TutorialState::NeedsCantrips => TutorialState::NeedsSpells,
            TutorialState::NeedsSpells | TutorialState::Complete => TutorialState::Complete,
        }
    }

    /// Detect and resolve one player message. `None` when the message asks
    /// nothing of the tutorial.
    pub fn resolve_message(&self, character: &TutorialCharacter, text: &str) -> Option<Resolution> {
        let state = self.active_state(character)?;
        let intent = self
            .detector()
            .detect_intent(text, character.id.clone(), Some(state))?;
        Some(self.resolve(character, intent))
    }

    /// Check an intent against the character and produce effects.
    pub fn resolve(&self, character: &TutorialCharacter, intent: TutorialIntent) -> Resolution {
        if intent.actor_id() != &character.id {
            tracing::warn!(
                actor = %intent.actor_id(),
                character = %character.id,
                "Intent for another character"
            );
            return Resolution::rejected("That request was made for a different character.");
        }
        let Some(state) = self.active_state(character) else {
            return Resolution::rejected(format!(
                "{} is not in the spell tutorial.",
                character.name
            ));
        };
        let class = match character.class.parse::<CharacterClass>() {
            Ok(class) => class,
            Err(_) => {
                return Resolution::rejected(format!(
                    "{} is not a spellcasting class.",
                    character.class.trim()
                ))
            }
        };
        let Some(profile) = class.spell_profile() else {
            return Resolution::rejected(format!("{class} is not a spellcasting class."));
        };

        match intent {
            TutorialIntent::Select(action) => {
                self.resolve_selection(character, class, &profile, state, action)
            }
            TutorialIntent::CompleteTutorial { .. } => {
                self.resolve_completion(character, class, &profile, state)
            }
        }
    }

    fn resolve_selection(
        &self,
        character: &TutorialCharacter,
        class: CharacterClass,
        profile: &ClassSpellProfile,
        state: TutorialState,
        action: SelectionAction,
    ) -> Resolution {
        let expected = match state {
            TutorialState::NeedsCantrips => SelectionKind::SelectCantrips,
            TutorialState::NeedsSpells => SelectionKind::SelectSpells,
            TutorialState::Complete => {
                return Resolution::rejected("Your spells are already chosen.")
                    .with_next_step(self.step_hint(profile, state));
            }
        };
        if action.kind != expected {
            return Resolution::rejected(format!(
                "Right now you're choosing your {}, not {}s.",
                self.step_name(state),
                action.kind.noun()
            ))
            .with_next_step(self.step_hint(profile, state));
        }

        let result = self.validator().validate(class, action.kind, &action.spell_names);
        if !result.valid {
            tracing::debug!(
                actor = %character.id,
                class = %class,
                reason = %result.message,
                "Selection rejected"
            );
            return Resolution::rejected(result.message)
                .with_next_step(self.step_hint(profile, state));
        }

        let next = Self::next_state(state, profile);
        tracing::info!(
            actor = %character.id,
            class = %class,
            spells = ?action.spell_names,
            from = %state,
            to = %next,
            "Selection accepted"
        );

        let learned = match action.kind {
            SelectionKind::SelectCantrips => Some(Effect::LearnCantrips {
                spells: action.spell_names.clone(),
            }),
            SelectionKind::SelectSpells if !profile.prepares_spells() => Some(Effect::LearnSpells {
                spells: action.spell_names.clone(),
            }),
            SelectionKind::SelectSpells => None,
        };
        let summary = match learned {
            Some(_) => format!("You learned {}.", action.spell_names.join(", ")),
            None => result.message,
        };

        let mut resolution = Resolution::accepted(summary);
        if let Some(effect) = learned {
            resolution = resolution.with_effect(effect);
        }
        resolution
            .with_effect(Effect::SetTutorialState { state: next })
            .with_next_step(self.step_hint(profile, next))
    }

    fn resolve_completion(
        &self,
        character: &TutorialCharacter,
        class: CharacterClass,
        profile: &ClassSpellProfile,
        state: TutorialState,
    ) -> Resolution {
        let may_finish = match state {
            TutorialState::Complete => true,
            TutorialState::NeedsSpells => profile.prepares_spells(),
            TutorialState::NeedsCantrips => false,
        };
        let missing = missing_selections(character);
        if !may_finish || !missing.is_empty() {
            let needed = if missing.is_empty() {
                format!("your {}", self.step_name(state))
            } else {
                missing.join(" and ")
            };
            return Resolution::rejected(format!("Not yet! You still need to choose {needed}."))
                .with_next_step(self.step_hint(profile, state));
        }

        tracing::info!(actor = %character.id, class = %class, "Tutorial complete");
        let slots = BTreeMap::from([(1, profile.level_1_slots)]);
        Resolution::accepted(format!(
            "{} is now a level {GRADUATION_LEVEL} {class}!",
            character.name
        ))
        .with_effect(Effect::SetLevel {
            level: GRADUATION_LEVEL,
        })
        .with_effect(Effect::SetSpellSlots { slots })
        .with_effect(Effect::ClearTutorialState)
    }

    fn step_name(&self, state: TutorialState) -> String {
        match state {
            TutorialState::NeedsCantrips => "cantrips".to_string(),
            TutorialState::NeedsSpells => {
                format!("level {} spells", self.config.starting_spell_level)
            }
            TutorialState::Complete => "adventure".to_string(),
        }
    }

    fn step_hint(&self, profile: &ClassSpellProfile, state: TutorialState) -> String {
        match state {
            TutorialState::NeedsCantrips => format!(
                "Choose {}.",
                count_of(profile.starting_cantrips as usize, "cantrip")
            ),
            TutorialState::NeedsSpells if !profile.prepares_spells() => format!(
                "Choose {}.",
                count_of(
                    profile.starting_spells as usize,
                    &format!("level {} spell", self.config.starting_spell_level)
                )
            ),
            TutorialState::NeedsSpells | TutorialState::Complete => {
                "Say \"ready\" when you want to begin your adventure.".to_string()
            }
        }
    }
}

/// Apply effects to a character record.
pub fn apply_effects(character: &mut TutorialCharacter, effects: &[Effect]) {
    for effect in effects {
        apply_effect(character, effect);
    }
}

/// Apply a single effect to a character record.
pub fn apply_effect(character: &mut TutorialCharacter, effect: &Effect) {
    match effect {
        Effect::LearnCantrips { spells } => character.selected_cantrips = spells.clone(),
        Effect::LearnSpells { spells } => character.selected_spells = spells.clone(),
        Effect::SetTutorialState { state } => character.tutorial_state = Some(*state),
        Effect::SetLevel { level } => character.level = *level,
        Effect::SetSpellSlots { slots } => character.spell_slots = slots.clone(),
        Effect::ClearTutorialState => character.tutorial_state = None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn srd() -> SpellCatalog {
        SpellCatalog::srd().expect("bundled SRD catalog should load")
    }

    fn select(kind: SelectionKind, actor: &str, names: &[&str]) -> TutorialIntent {
        let names = names.iter().map(|s| s.to_string()).collect();
        TutorialIntent::Select(SelectionAction::new(kind, actor.into(), names).expect("non-empty"))
    }

    #[test]
    fn test_state_parsing() {
        assert_eq!("needs_spells".parse::<TutorialState>(), Ok(TutorialState::NeedsSpells));
        assert_eq!(TutorialState::Complete.to_string(), "complete");
        assert_eq!(
            "finished".parse::<TutorialState>(),
            Err(TutorialError::UnknownState("finished".to_string()))
        );
        let json = serde_json::to_string(&TutorialState::NeedsCantrips).expect("serializable");
        assert_eq!(json, "\"needs_cantrips\"");
    }

    #[test]
    fn test_next_state_table() {
        let bard = CharacterClass::Bard.spell_profile().expect("bard casts");
        let druid = CharacterClass::Druid.spell_profile().expect("druid casts");
        use TutorialState::*;
        assert_eq!(Tutorial::next_state(NeedsCantrips, &bard), NeedsSpells);
        assert_eq!(Tutorial::next_state(NeedsCantrips, &druid), Complete);
        assert_eq!(Tutorial::next_state(NeedsSpells, &bard), Complete);
        assert_eq!(Tutorial::next_state(Complete, &bard), Complete);
    }

    #[test]
    fn test_new_character_states() {
        assert_eq!(
            TutorialCharacter::new("a", "Vex", "Warlock").tutorial_state,
            Some(TutorialState::NeedsCantrips)
        );
        assert_eq!(TutorialCharacter::new("b", "Brom", "Fighter").tutorial_state, None);
    }

    #[test]
    fn test_context_empty_outside_tutorial() {
        let catalog = srd();
        let tutorial = Tutorial::new(&catalog);
        let wizard = TutorialCharacter::new("w", "Elara", "Wizard");
        assert!(!tutorial.tutorial_context(&wizard).is_empty());
        assert!(tutorial.tutorial_context(&wizard.clone().with_level(1)).is_empty());
        assert!(tutorial.tutorial_context(&wizard.clone().with_state(None)).is_empty());
        assert!(tutorial
            .tutorial_context(&wizard.with_state(Some(TutorialState::Complete)))
            .is_empty());
        assert!(tutorial
            .tutorial_context(&TutorialCharacter::new("f", "Brom", "Fighter"))
            .is_empty());
    }

    #[test]
    fn test_cleric_preparation_context() {
        let catalog = srd();
        let tutorial = Tutorial::new(&catalog);
        let cleric = TutorialCharacter::new("c", "Aldric", "Cleric")
            .with_state(Some(TutorialState::NeedsSpells));
        let context = tutorial.tutorial_context(&cleric);
        assert!(context.contains("prepare"));
        assert!(!context.contains("Cure Wounds"));
        assert!(!context.contains("You must choose exactly"));
    }

    #[test]
    fn test_cantrip_selection_advances() {
        let catalog = srd();
        let tutorial = Tutorial::new(&catalog);
        let sorcerer = TutorialCharacter::new("s", "Kael", "Sorcerer");
        let resolution = tutorial.resolve(
            &sorcerer,
            select(
                SelectionKind::SelectCantrips,
                "s",
                &["Fire Bolt", "Light", "Mage Hand", "Ray of Frost"],
            ),
        );
        assert!(resolution.accepted, "{}", resolution.summary);
        assert_eq!(
            resolution.effects,
            vec![
                Effect::LearnCantrips {
                    spells: vec![
                        "Fire Bolt".to_string(),
                        "Light".to_string(),
                        "Mage Hand".to_string(),
                        "Ray of Frost".to_string()
                    ]
                },
                Effect::SetTutorialState {
                    state: TutorialState::NeedsSpells
                },
            ]
        );
        assert_eq!(resolution.next_step.as_deref(), Some("Choose 2 level 1 spells."));
    }

    #[test]
    fn test_wrong_step_rejected() {
        let catalog = srd();
        let tutorial = Tutorial::new(&catalog);
        let bard = TutorialCharacter::new("b", "Lyra", "Bard");
        let resolution = tutorial.resolve(
            &bard,
            select(SelectionKind::SelectSpells, "b", &["Sleep", "Bane", "Heroism", "Identify"]),
        );
        assert!(!resolution.accepted);
        assert!(resolution.summary.contains("cantrips"), "{}", resolution.summary);
        assert!(resolution.effects.is_empty());
    }

    #[test]
    fn test_invalid_selection_has_no_effects() {
        let catalog = srd();
        let tutorial = Tutorial::new(&catalog);
        let bard = TutorialCharacter::new("b", "Lyra", "Bard");
        let intent = select(SelectionKind::SelectCantrips, "b", &["Vicious Mockery"]);
        let resolution = tutorial.resolve(&bard, intent);
        assert!(!resolution.accepted);
        assert!(resolution.summary.contains("exactly 2"));
        assert!(resolution.effects.is_empty());
        assert_eq!(resolution.next_step.as_deref(), Some("Choose 2 cantrips."));
    }

    #[test]
    fn test_other_actor_rejected() {
        let catalog = srd();
        let tutorial = Tutorial::new(&catalog);
        let bard = TutorialCharacter::new("b", "Lyra", "Bard");
        let resolution = tutorial.resolve(
            &bard,
            select(SelectionKind::SelectCantrips, "intruder", &["Light", "Mending"]),
        );
        assert!(!resolution.accepted);
        assert!(resolution.effects.is_empty());
    }

    #[test]
    fn test_completion() {
        let catalog = srd();
        let tutorial = Tutorial::new(&catalog);
        let mut warlock = TutorialCharacter::new("w", "Vex", "Warlock")
            .with_state(Some(TutorialState::Complete));
        warlock.selected_cantrips = vec!["Eldritch Blast".into(), "Mage Hand".into()];
        warlock.selected_spells = vec!["Hellish Rebuke".into(), "Charm Person".into()];

        let resolution = tutorial.resolve(
            &warlock,
            TutorialIntent::CompleteTutorial {
                actor_id: "w".into(),
            },
        );
        assert!(resolution.accepted, "{}", resolution.summary);
        apply_effects(&mut warlock, &resolution.effects);
        assert_eq!(warlock.level, 1);
        assert_eq!(warlock.tutorial_state, None);
        assert_eq!(warlock.spell_slots.get(&1), Some(&1));
    }

    #[test]
    fn test_completion_requires_selections() {
        let catalog = srd();
        let tutorial = Tutorial::new(&catalog);
        let wizard = TutorialCharacter::new("w", "Elara", "Wizard");
        let resolution = tutorial.resolve(
            &wizard,
            TutorialIntent::CompleteTutorial {
                actor_id: "w".into(),
            },
        );
        assert!(!resolution.accepted);
        assert!(resolution.summary.contains("3 more cantrips"), "{}", resolution.summary);
    }

    #[test]
    fn test_apply_effects() {
        let mut character = TutorialCharacter::new("d", "Moss", "Druid");
        apply_effects(
            &mut character,
            &[
                Effect::LearnCantrips {
                    spells: vec!["Druidcraft".into(), "Shillelagh".into()],
                },
                Effect::SetTutorialState {
                    state: TutorialState::Complete,
                },
            ],
        );
        assert_eq!(character.selected_cantrips, vec!["Druidcraft", "Shillelagh"]);
        assert_eq!(character.tutorial_state, Some(TutorialState::Complete));
        apply_effect(&mut character, &Effect::ClearTutorialState);
        assert_eq!(character.tutorial_state, None);
    }

    #[test]
    fn test_character_record_deserializes() {
        let json = r#"{"id": "char_1", "name": "Lyra", "level": 0, "class": "Bard",
                       "tutorial_state": "needs_spells"}"#;
        let character: TutorialCharacter = serde_json::from_str(json).expect("valid record");
        assert_eq!(character.tutorial_state, Some(TutorialState::NeedsSpells));
        assert!(character.selected_cantrips.is_empty());
        assert!(character.spell_slots.is_empty());
    }
}
