//! Help Center article types.

use serde::{Deserialize, Serialize};

/// Help Center article. Belongs to one section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// Article ID (instance-specific).
    pub id: u64,
    /// Parent section ID.
    #[serde(default)]
    pub section_id: Option<u64>,
    /// Article title.
    pub title: String,
    /// HTML body. `null` for empty articles.
    #[serde(default)]
    pub body: Option<String>,
    /// Locale of this translation.
    #[serde(default)]
    pub locale: String,
    /// Whether the article is a draft.
    #[serde(default)]
    pub draft: bool,
    /// Sort position among siblings.
    #[serde(default)]
    pub position: i64,
    /// Permission group that may edit the article.
    #[serde(default)]
    pub permission_group_id: Option<u64>,
    /// User segment that may view the article (`None` means everyone).
    #[serde(default)]
    pub user_segment_id: Option<u64>,
}

impl Article {
    /// HTML body, empty when unset.
    #[must_use]
    pub fn body_html(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

/// Payload for creating an article. The parent section goes in the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewArticle {
    /// Article title.
    pub title: String,
    /// HTML body.
    pub body: String,
    /// Locale to create the article in.
    pub locale: String,
    /// Whether to create the article as a draft.
    pub draft: bool,
    /// Sort position among siblings.
    pub position: i64,
    /// Permission group (required by the API when creating).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_group_id: Option<u64>,
    /// User segment; serialized as `null` for "everyone".
    pub user_segment_id: Option<u64>,
}

/// Per-locale content update for an existing article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleTranslation {
    /// Article title.
    pub title: String,
    /// HTML body.
    pub body: String,
    /// Whether this translation is a draft.
    pub draft: bool,
}
