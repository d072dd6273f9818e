//! File naming within a snapshot.

use std::path::{Path, PathBuf};

/// Directory holding the category and section lists.
const STRUCTURE_DIR: &str = "structure";
const CATEGORIES_FILE: &str = "categories.json";
const SECTIONS_FILE: &str = "sections.json";

/// Article body file extension.
pub(crate) const CONTENT_EXT: &str = "html";
/// Article metadata file extension.
pub(crate) const METADATA_EXT: &str = "json";

/// Paths of every file in a snapshot rooted at one directory.
#[derive(Debug, Clone)]
pub struct SnapshotLayout {
    root: PathBuf,
}

impl SnapshotLayout {
    /// Create a layout rooted at `root` (the backup folder).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Snapshot root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder holding one locale.
    #[must_use]
    pub fn locale_dir(&self, locale: &str) -> PathBuf {
        self.root.join(locale)
    }

    /// Folder holding the structure files of one locale.
    #[must_use]
    pub fn structure_dir(&self, locale: &str) -> PathBuf {
        self.locale_dir(locale).join(STRUCTURE_DIR)
    }

    /// Category list file.
    #[must_use]
    pub fn categories_file(&self, locale: &str) -> PathBuf {
        self.structure_dir(locale).join(CATEGORIES_FILE)
    }

    /// Section list file.
    #[must_use]
    pub fn sections_file(&self, locale: &str) -> PathBuf {
        self.structure_dir(locale).join(SECTIONS_FILE)
    }

    /// Article body file.
    #[must_use]
    pub fn article_content(&self, locale: &str, article_id: u64) -> PathBuf {
        self.locale_dir(locale)
            .join(format!("{article_id}.{CONTENT_EXT}"))
    }

    /// Article metadata file.
    #[must_use]
    pub fn article_metadata(&self, locale: &str, article_id: u64) -> PathBuf {
        self.locale_dir(locale)
            .join(format!("{article_id}.{METADATA_EXT}"))
    }
}
