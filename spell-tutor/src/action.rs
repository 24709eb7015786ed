//! Actions produced by the detector.
//!
//! An action lives only between detection and resolution: the detector
//! builds one per player message and the tutorial engine consumes it. Nothing
//! here is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of the character making a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// What a selection is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionKind {
    #[serde(rename = "SELECT_CANTRIPS")]
    SelectCantrips,
    #[serde(rename = "SELECT_SPELLS")]
    SelectSpells,
}

impl SelectionKind {
    /// "cantrip" or "spell", for messages.
    pub fn noun(&self) -> &'static str {
        match self {
            SelectionKind::SelectCantrips => "cantrip",
            SelectionKind::SelectSpells => "spell",
        }
    }
}

/// A detected spell selection.
///
/// `spell_names` holds canonical catalog names, each once, in the order the
/// player mentioned them. It is never empty: a message with nothing to select
/// produces no action at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionAction {
    pub kind: SelectionKind,
    pub actor_id: ActorId,
    pub spell_names: Vec<String>,
}

impl SelectionAction {
    /// Build an action, or `None` if there is nothing to select.
    pub fn new(kind: SelectionKind, actor_id: ActorId, spell_names: Vec<String>) -> Option<Self> {
        if spell_names.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            actor_id,
            spell_names,
        })
    }
}

/// Everything a player message can ask the tutorial to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TutorialIntent {
    /// Pick cantrips or starting spells.
    Select(SelectionAction),

    /// Finish the tutorial and become a level 1 character.
    CompleteTutorial { actor_id: ActorId },
}

impl TutorialIntent {
    pub fn actor_id(&self) -> &ActorId {
        match self {
            TutorialIntent::Select(action) => &action.actor_id,
            TutorialIntent::CompleteTutorial { actor_id } => actor_id,
        }
    }
}
