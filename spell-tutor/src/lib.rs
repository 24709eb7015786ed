//! Level 0 spell tutorial engine for D&D 5e.
//!
//! New spellcasters choose their starting cantrips and spells by talking
//! ("I'll take Healing Word and Charm Person") instead of ticking boxes.
//! This crate provides:
//! - Deterministic detection of spell selections in free-form text
//! - Class and count validation for starting selections
//! - The tutorial state machine and its guidance prompts
//!
//! Nothing here does I/O or holds global state. The spell catalog is built
//! once and passed by reference to everything that needs it.
//!
//! # Quick Start
//!
//! ```
//! use spell_tutor::{apply_effects, SpellCatalog, Tutorial, TutorialCharacter};
//!
//! let catalog = SpellCatalog::srd()?;
//! let tutorial = Tutorial::new(&catalog);
//! let mut character = TutorialCharacter::new("char_1", "Elara", "Wizard");
//!
//! // Guidance for the narrator
//! let prompt = tutorial.tutorial_context(&character);
//! assert!(prompt.contains("CANTRIP SELECTION"));
//!
//! let text = "I choose Fire Bolt, Mage Hand, and Prestidigitation";
//! if let Some(resolution) = tutorial.resolve_message(&character, text) {
//!     if resolution.accepted {
//!         apply_effects(&mut character, &resolution.effects);
//!     }
//! }
//! assert_eq!(character.selected_cantrips.len(), 3);
//! # Ok::<(), spell_tutor::CatalogError>(())
//! ```

pub mod action;
pub mod class_data;
pub mod config;
pub mod detector;
pub mod grammar;
pub mod normalize;
pub mod prompts;
pub mod resolver;
pub mod spells;
pub mod testing;
pub mod tutorial;
pub mod validator;

// Primary public API
pub use action::{ActorId, SelectionAction, SelectionKind, TutorialIntent};
pub use class_data::{
    starting_spell_info, CharacterClass, ClassError, ClassSpellProfile, StartingSpellInfo,
};
pub use config::{ConfigError, TutorConfig};
pub use detector::{classify_selection, SpellSelectionDetector};
pub use normalize::normalize;
pub use prompts::SpellCategory;
pub use resolver::SpellNameResolver;
pub use spells::{CatalogError, SpellCatalog, SpellClass, SpellData};
pub use testing::{fixture_catalog, TutorialHarness};
pub use tutorial::{
    apply_effects, Effect, Resolution, Tutorial, TutorialCharacter, TutorialError, TutorialState,
};
pub use validator::{missing_selections, SpellValidator, ValidationResult};
