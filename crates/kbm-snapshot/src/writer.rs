//! Snapshot writer.

use std::fs;
use std::path::{Path, PathBuf};

use kbm_zendesk::{Article, Category, Section};
use serde::Serialize;
use tracing::debug;

use crate::error::SnapshotError;
use crate::layout::SnapshotLayout;
use crate::metadata::ArticleMetadata;

/// Writes categories, sections and articles into a snapshot folder.
///
/// Existing files with the same name are overwritten.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    layout: SnapshotLayout,
}

impl SnapshotWriter {
    /// Create a writer for the snapshot rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: SnapshotLayout::new(root),
        }
    }

    /// Snapshot file layout.
    #[must_use]
    pub fn layout(&self) -> &SnapshotLayout {
        &self.layout
    }

    /// Write the category and section lists of one locale.
    pub fn write_structure(
        &self,
        locale: &str,
        categories: &[Category],
        sections: &[Section],
    ) -> Result<(), SnapshotError> {
        let dir = self.layout.structure_dir(locale);
        fs::create_dir_all(&dir).map_err(|e| SnapshotError::io(&dir, e))?;

        write_json(&self.layout.categories_file(locale), &categories)?;
        write_json(&self.layout.sections_file(locale), &sections)?;

        debug!(
            locale,
            categories = categories.len(),
            sections = sections.len(),
            "Wrote structure files"
        );
        Ok(())
    }

    /// Write an article's body and metadata files.
    pub fn write_article(&self, locale: &str, article: &Article) -> Result<(), SnapshotError> {
        let dir = self.layout.locale_dir(locale);
        fs::create_dir_all(&dir).map_err(|e| SnapshotError::io(&dir, e))?;

        let content_path = self.layout.article_content(locale, article.id);
        fs::write(&content_path, article.body_html())
            .map_err(|e| SnapshotError::io(&content_path, e))?;

        let metadata = ArticleMetadata::from(article);
        write_json(&self.layout.article_metadata(locale, article.id), &metadata)?;

        debug!(locale, article_id = article.id, "Wrote article");
        Ok(())
    }
}

/// Write `value` as pretty-printed JSON with a trailing newline.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SnapshotError> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    fs::write(path, content).map_err(|e| SnapshotError::io(path, e))
}
