//! Article metadata sidecar files.

use kbm_zendesk::Article;
use serde::{Deserialize, Serialize};

/// Contents of `<article_id>.json`.
///
/// Every field except `title` may be absent in snapshots written by older
/// tools; `title` falls back to `Article <id>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleMetadata {
    /// Source article ID (also encoded in the file name).
    #[serde(default)]
    pub id: Option<u64>,
    /// Article title.
    #[serde(default)]
    pub title: Option<String>,
    /// Source section ID.
    #[serde(default)]
    pub section_id: Option<u64>,
    /// Article locale.
    #[serde(default)]
    pub locale: Option<String>,
    /// Whether the article was a draft.
    #[serde(default)]
    pub draft: bool,
    /// Sort position among siblings.
    #[serde(default)]
    pub position: i64,
    /// Source permission group ID.
    #[serde(default)]
    pub permission_group_id: Option<u64>,
    /// Source user segment ID.
    #[serde(default)]
    pub user_segment_id: Option<u64>,
}

impl From<&Article> for ArticleMetadata {
    fn from(article: &Article) -> Self {
        Self {
            id: Some(article.id),
            title: Some(article.title.clone()),
            section_id: article.section_id,
            locale: Some(article.locale.clone()),
            draft: article.draft,
            position: article.position,
            permission_group_id: article.permission_group_id,
            user_segment_id: article.user_segment_id,
        }
    }
}

impl ArticleMetadata {
    /// Rebuild the article record from metadata and body.
    ///
    /// `folder_locale` is used when the metadata carries no locale.
    #[must_use]
    pub fn into_article(self, id: u64, body: String, folder_locale: &str) -> Article {
        Article {
            id,
            section_id: self.section_id,
            title: self.title.unwrap_or_else(|| format!("Article {id}")),
            body: Some(body),
            locale: self
                .locale
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| folder_locale.to_owned()),
            draft: self.draft,
            position: self.position,
            permission_group_id: self.permission_group_id,
            user_segment_id: self.user_segment_id,
        }
    }
}
