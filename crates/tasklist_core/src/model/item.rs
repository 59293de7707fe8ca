//! Item domain model.
//!
//! # Responsibility
//! - Define the canonical task record rendered by the controller.
//! - Provide validation shared by every store write path.
//!
//! # Invariants
//! - `id` is unique within one owner's collection and never reused.
//! - `text` is non-empty after trimming.
//! - `created_at` is assigned once at creation and never mutated.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque stable identifier for one item.
///
/// Local items carry a timestamp-derived integer in decimal form; remote
/// items carry a store-generated key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validation failures for item state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyId,
    EmptyText,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "item id must not be empty"),
            Self::EmptyText => write!(f, "task text cannot be empty"),
        }
    }
}

impl Error for ItemValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub completed: bool,
    /// Unix epoch milliseconds; ordering key for sort.
    pub created_at: i64,
}

impl Item {
    /// Checks record invariants before persistence or after reads.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ItemValidationError::EmptyId);
        }
        validate_text(&self.text)?;
        Ok(())
    }
}

/// Fields supplied by the add gesture. `completed` always starts false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub text: String,
}

impl NewItem {
    /// Builds a draft from raw input, trimming surrounding whitespace.
    ///
    /// # Errors
    /// - `EmptyText` when the trimmed input is empty.
    pub fn parse(raw: &str) -> Result<Self, ItemValidationError> {
        let text = normalize_text(raw)?;
        Ok(Self { text })
    }
}

/// Partial update for mutable item fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl ItemPatch {
    pub fn completed(value: bool) -> Self {
        Self {
            completed: Some(value),
            ..Self::default()
        }
    }

    pub fn text(raw: &str) -> Result<Self, ItemValidationError> {
        Ok(Self {
            text: Some(normalize_text(raw)?),
            ..Self::default()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }

    /// Applies this patch in place. Identity and `created_at` are untouched.
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(text) = &self.text {
            item.text.clone_from(text);
        }
        if let Some(completed) = self.completed {
            item.completed = completed;
        }
    }
}

/// Returns trimmed text, rejecting whitespace-only input.
pub fn normalize_text(raw: &str) -> Result<String, ItemValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ItemValidationError::EmptyText);
    }
    Ok(trimmed.to_string())
}

fn validate_text(text: &str) -> Result<(), ItemValidationError> {
    if text.trim().is_empty() {
        return Err(ItemValidationError::EmptyText);
    }
    Ok(())
}
