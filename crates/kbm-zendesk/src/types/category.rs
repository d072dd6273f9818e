//! Help Center category types.

use serde::{Deserialize, Serialize};

/// Help Center category, the root of the knowledge-base hierarchy.
///
/// Only includes fields that are mirrored.
/// Serde ignores unknown fields from the API response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    /// Category ID (instance-specific).
    pub id: u64,
    /// Category name.
    pub name: String,
    /// Category description.
    #[serde(default)]
    pub description: Option<String>,
    /// Locale of this translation.
    #[serde(default)]
    pub locale: String,
    /// Sort position among siblings.
    #[serde(default)]
    pub position: i64,
}

/// Payload for creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCategory {
    /// Category name.
    pub name: String,
    /// Category description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Locale to create the category in.
    pub locale: String,
    /// Sort position among siblings.
    pub position: i64,
}

impl From<&Category> for NewCategory {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
            locale: category.locale.clone(),
            position: category.position,
        }
    }
}
