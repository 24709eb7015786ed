//! Natural-language spell selection detection.
//!
//! Turns a player message into a [`SelectionAction`] or nothing. Detection is
//! lenient about noise and strict about names: text that does not resolve to
//! a catalog spell is dropped, and a message that resolves to no
//! level-appropriate spell yields `None`.

use crate::action::{ActorId, SelectionAction, SelectionKind, TutorialIntent};
use crate::grammar::{self, SelectionCategory};
use crate::normalize::normalize;
use crate::resolver::SpellNameResolver;
use crate::spells::{SpellCatalog, SpellData};
use crate::tutorial::TutorialState;

/// Cantrip or leveled, from the levels actually present.
///
/// All level 0 is a cantrip selection and all level 1+ is a spell selection.
/// Mixed or empty input is ambiguous and yields `None`.
pub fn classify_selection(spells: &[&SpellData]) -> Option<SelectionKind> {
    if spells.is_empty() {
        None
    } else if spells.iter().all(|s| s.is_cantrip()) {
        Some(SelectionKind::SelectCantrips)
    } else if spells.iter().all(|s| !s.is_cantrip()) {
        Some(SelectionKind::SelectSpells)
    } else {
        None
    }
}

/// Detects spell selections in player messages.
#[derive(Debug, Clone, Copy)]
pub struct SpellSelectionDetector<'a> {
    resolver: SpellNameResolver<'a>,
}

impl<'a> SpellSelectionDetector<'a> {
    pub fn new(catalog: &'a SpellCatalog) -> Self {
        Self {
            resolver: SpellNameResolver::new(catalog),
        }
    }

    pub fn resolver(&self) -> SpellNameResolver<'a> {
        self.resolver
    }

    /// A selection of cantrips, ignoring any leveled spells named alongside.
    pub fn detect_cantrip_selection(
        &self,
        text: &str,
        actor_id: impl Into<ActorId>,
    ) -> Option<SelectionAction> {
        let (spells, _) = self.resolve(text)?;
        self.build(SelectionKind::SelectCantrips, actor_id.into(), &spells)
    }

    /// A selection of leveled spells, ignoring any cantrips named alongside.
    pub fn detect_leveled_spell_selection(
        &self,
        text: &str,
        actor_id: impl Into<ActorId>,
    ) -> Option<SelectionAction> {
        let (spells, _) = self.resolve(text)?;
        self.build(SelectionKind::SelectSpells, actor_id.into(), &spells)
    }

    /// A selection of either kind.
    ///
    /// An explicit category ("for my cantrips", "level 1 spells") decides the
    /// kind. Without one, the kind is inferred with [`classify_selection`].
    pub fn detect_spell_selection(
        &self,
        text: &str,
        actor_id: impl Into<ActorId>,
    ) -> Option<SelectionAction> {
        let (spells, category) = self.resolve(text)?;
        let kind = match category {
            Some(SelectionCategory::Cantrips) => SelectionKind::SelectCantrips,
            Some(SelectionCategory::Spells) => SelectionKind::SelectSpells,
            None => classify_selection(&spells)?,
        };
        self.build(kind, actor_id.into(), &spells)
    }

    /// "I'm ready", "let's begin", "level me up".
    pub fn detect_ready(
        &self,
        text: &str,
        actor_id: impl Into<ActorId>,
    ) -> Option<TutorialIntent> {
        let normalized = normalize(text);
        if normalized.is_empty() || !grammar::is_ready_declaration(&normalized) {
            return None;
        }
        let actor_id = actor_id.into();
        tracing::debug!(actor = %actor_id, "Detected tutorial completion request");
        Some(TutorialIntent::CompleteTutorial { actor_id })
    }

    /// Route a message by tutorial state.
    ///
    /// While choosing, messages are read as selections. A class that
    /// prepares its spells may also finish from the spell step, so readiness
    /// is checked there too. Once selection is complete only readiness counts.
    pub fn detect_intent(
        &self,
        text: &str,
        actor_id: impl Into<ActorId>,
        state: Option<TutorialState>,
    ) -> Option<TutorialIntent> {
        let actor_id = actor_id.into();
        match state? {
            TutorialState::NeedsCantrips => self
                .detect_spell_selection(text, actor_id)
                .map(TutorialIntent::Select),
            TutorialState::NeedsSpells => self
                .detect_spell_selection(text, actor_id.clone())
                .map(TutorialIntent::Select)
                .or_else(|| self.detect_ready(text, actor_id)),
            TutorialState::Complete => self.detect_ready(text, actor_id),
        }
    }

    fn resolve(&self, text: &str) -> Option<(Vec<&'a SpellData>, Option<SelectionCategory>)> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return None;
        }
        let parsed = grammar::parse_selection(&normalized)?;
        let spells = self.resolver.resolve_candidates(&parsed.lists);
        Some((spells, parsed.category))
    }

    fn build(
        &self,
        kind: SelectionKind,
        actor_id: ActorId,
        spells: &[&'a SpellData],
    ) -> Option<SelectionAction> {
        let names: Vec<String> = spells
            .iter()
            .filter(|s| match kind {
                SelectionKind::SelectCantrips => s.is_cantrip(),
                SelectionKind::SelectSpells => !s.is_cantrip(),
            })
            .map(|s| s.name.clone())
            .collect();

        if names.is_empty() {
            tracing::trace!(actor = %actor_id, ?kind, "No level-appropriate spells named");
            return None;
        }
        tracing::debug!(actor = %actor_id, ?kind, spells = ?names, "Detected spell selection");
        SelectionAction::new(kind, actor_id, names)
    }
}
