//! Data models for caltrack
//!
//! Defines the calorie entry (`Item`), its identifier, and the validated
//! form submission used to create or update one.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of an item within a collection
///
/// Serialized as a bare integer so the persisted snapshot stays
/// `{"id": 0, ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// The id that follows this one, or `None` past `u64::MAX`
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(ItemId)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single calorie entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Unique identifier
    pub id: ItemId,
    /// What was eaten
    pub name: String,
    /// Calorie count
    pub calories: u32,
}

impl Item {
    /// Create an item with an already assigned id
    pub fn new(id: ItemId, name: impl Into<String>, calories: u32) -> Self {
        Self {
            id,
            name: name.into(),
            calories,
        }
    }
}

/// Reasons a form submission is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    EmptyName,

    #[error("Calories are required")]
    EmptyCalories,

    #[error("Calories must be a whole number of zero or more, got '{0}'")]
    InvalidCalories(String),
}

/// A validated name/calories pair, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInput {
    name: String,
    calories: u32,
}

impl ItemInput {
    /// Validate raw form text
    ///
    /// The name is trimmed and must not be empty. Calories must parse as a
    /// non-negative integer; anything else is rejected rather than stored.
    pub fn parse(name: &str, calories: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let calories = parse_calories(calories)?;

        Ok(Self {
            name: name.to_string(),
            calories,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn calories(&self) -> u32 {
        self.calories
    }
}

/// Parse a calorie count from user text
pub fn parse_calories(raw: &str) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::EmptyCalories);
    }

    raw.parse::<u32>()
        .map_err(|_| ValidationError::InvalidCalories(raw.to_string()))
}
