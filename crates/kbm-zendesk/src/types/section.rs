//! Help Center section types.

use serde::{Deserialize, Serialize};

/// Help Center section. Belongs to one category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Section {
    /// Section ID (instance-specific).
    pub id: u64,
    /// Parent category ID.
    #[serde(default)]
    pub category_id: Option<u64>,
    /// Section name.
    pub name: String,
    /// Section description.
    #[serde(default)]
    pub description: Option<String>,
    /// Locale of this translation.
    #[serde(default)]
    pub locale: String,
    /// Sort position among siblings.
    #[serde(default)]
    pub position: i64,
}

/// Payload for creating a section. The parent category goes in the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSection {
    /// Section name.
    pub name: String,
    /// Section description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Locale to create the section in.
    pub locale: String,
    /// Sort position among siblings.
    pub position: i64,
}

impl From<&Section> for NewSection {
    fn from(section: &Section) -> Self {
        Self {
            name: section.name.clone(),
            description: section.description.clone(),
            locale: section.locale.clone(),
            position: section.position,
        }
    }
}
