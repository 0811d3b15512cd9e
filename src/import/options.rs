use crate::error::OptionsError;
use crate::model::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How imported node ids that collide with the destination are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStrategy {
    /// Give every imported node and edge a fresh id.
    #[default]
    Regenerate,
    /// Drop colliding nodes and every edge that touches them.
    Skip,
    /// Keep ids; the caller replaces same-id nodes in the destination.
    Overwrite,
}

impl ConflictStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictStrategy::Regenerate => "regenerate",
            ConflictStrategy::Skip => "skip",
            ConflictStrategy::Overwrite => "overwrite",
        }
    }
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Import-side settings. Deserializable from a host settings payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportOptions {
    pub conflict_strategy: ConflictStrategy,
    /// Canvas point the imported graph is centered on, usually the drop cursor.
    pub target_position: Option<Position>,
    /// The result replaces the whole canvas, so nothing in it can collide.
    pub replace_canvas: bool,
}

impl ImportOptions {
    pub fn from_json(text: &str) -> Result<Self, OptionsError> {
        let options: ImportOptions = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        match self.target_position {
            Some(Position { x, y }) if !x.is_finite() || !y.is_finite() => {
                Err(OptionsError::NonFiniteTarget { x, y })
            }
            _ => Ok(()),
        }
    }
}
