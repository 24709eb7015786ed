//! Tutorial configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the spell tutorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    /// Character level at which tutorial guidance applies.
    pub tutorial_level: u8,

    /// Level of the spells chosen at the spell step.
    pub starting_spell_level: u8,

    /// Longest spell gloss in a prompt before it is cut with "...".
    pub gloss_max_chars: usize,

    /// Include beginner tips in prompts.
    pub include_tips: bool,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            tutorial_level: 0,
            starting_spell_level: 1,
            gloss_max_chars: 120,
            include_tips: true,
        }
    }
}

impl TutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the level at which tutorial guidance applies.
    pub fn with_tutorial_level(mut self, level: u8) -> Self {
        self.tutorial_level = level;
        self
    }

    /// Set the level of starting spells.
    pub fn with_starting_spell_level(mut self, level: u8) -> Self {
        self.starting_spell_level = level;
        self
    }

    /// Set the longest spell gloss.
    pub fn with_gloss_max_chars(mut self, chars: usize) -> Self {
        self.gloss_max_chars = chars;
        self
    }

    /// Turn beginner tips on or off.
    pub fn with_tips(mut self, include: bool) -> Self {
        self.include_tips = include;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=9).contains(&self.starting_spell_level) {
            return Err(ConfigError::Invalid(format!(
                "starting_spell_level must be between 1 and 9, got {}",
                self.starting_spell_level
            )));
        }
        if self.gloss_max_chars == 0 {
            return Err(ConfigError::Invalid(
                "gloss_max_chars must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
