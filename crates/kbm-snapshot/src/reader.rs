//! Snapshot reader.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use kbm_zendesk::{Article, Category, Section};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::SnapshotError;
use crate::layout::SnapshotLayout;
use crate::metadata::ArticleMetadata;
use crate::scanner::{ArticleFiles, scan_articles};

/// Everything a snapshot holds for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSnapshot {
    /// Locale folder name.
    pub locale: String,
    /// Categories in file order.
    pub categories: Vec<Category>,
    /// Sections in file order.
    pub sections: Vec<Section>,
    /// Articles with both files present, ordered by ID.
    pub articles: Vec<Article>,
    /// Articles that could not be loaded.
    pub warnings: Vec<SnapshotWarning>,
}

/// Non-fatal problem with one article's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotWarning {
    /// Metadata file without a body file.
    MissingContent {
        /// Article ID.
        article_id: u64,
    },
    /// Body file without a metadata file.
    MissingMetadata {
        /// Article ID.
        article_id: u64,
    },
    /// A file exists but could not be read or parsed.
    Unreadable {
        /// Article ID.
        article_id: u64,
        /// Offending file.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

impl SnapshotWarning {
    /// Affected article.
    #[must_use]
    pub fn article_id(&self) -> u64 {
        match self {
            Self::MissingContent { article_id }
            | Self::MissingMetadata { article_id }
            | Self::Unreadable { article_id, .. } => *article_id,
        }
    }
}

impl fmt::Display for SnapshotWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContent { article_id } => {
                write!(f, "article {article_id} has metadata but no content file")
            }
            Self::MissingMetadata { article_id } => {
                write!(f, "article {article_id} has content but no metadata file")
            }
            Self::Unreadable {
                article_id,
                path,
                message,
            } => write!(
                f,
                "article {article_id}: cannot read {}: {message}",
                path.display()
            ),
        }
    }
}

/// Loads snapshots written by [`SnapshotWriter`](crate::SnapshotWriter).
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    layout: SnapshotLayout,
}

impl SnapshotReader {
    /// Create a reader for the snapshot rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: SnapshotLayout::new(root),
        }
    }

    /// Load one locale.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Corrupt`] if the locale folder or either
    /// structure file is missing or unparsable. Problems with individual
    /// article files are reported as [`SnapshotWarning`]s instead.
    pub fn load(&self, locale: &str) -> Result<LocaleSnapshot, SnapshotError> {
        let locale_dir = self.layout.locale_dir(locale);
        if !locale_dir.is_dir() {
            return Err(SnapshotError::corrupt(
                &locale_dir,
                format!("no folder for locale '{locale}'"),
            ));
        }

        let categories: Vec<Category> = read_structure(&self.layout.categories_file(locale))?;
        let sections: Vec<Section> = read_structure(&self.layout.sections_file(locale))?;

        let mut articles = Vec::new();
        let mut warnings = Vec::new();
        for (id, files) in scan_articles(&locale_dir)? {
            match load_article(id, files, locale) {
                Ok(article) => articles.push(article),
                Err(warning) => {
                    warn!(locale, "Skipping {warning}");
                    warnings.push(warning);
                }
            }
        }

        Ok(LocaleSnapshot {
            locale: locale.to_owned(),
            categories,
            sections,
            articles,
            warnings,
        })
    }
}

fn read_structure<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SnapshotError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SnapshotError::corrupt(path, "structure file missing")
        } else {
            SnapshotError::io(path, e)
        }
    })?;
    serde_json::from_str(&content).map_err(|e| SnapshotError::corrupt(path, e.to_string()))
}

fn load_article(id: u64, files: ArticleFiles, locale: &str) -> Result<Article, SnapshotWarning> {
    let (content_path, meta_path) = match (files.content_path, files.meta_path) {
        (Some(content), Some(meta)) => (content, meta),
        (None, _) => return Err(SnapshotWarning::MissingContent { article_id: id }),
        (_, None) => return Err(SnapshotWarning::MissingMetadata { article_id: id }),
    };

    let unreadable = |path: &Path, message: String| SnapshotWarning::Unreadable {
        article_id: id,
        path: path.to_path_buf(),
        message,
    };

    let body =
        fs::read_to_string(&content_path).map_err(|e| unreadable(&content_path, e.to_string()))?;
    let raw = fs::read_to_string(&meta_path).map_err(|e| unreadable(&meta_path, e.to_string()))?;
    let metadata: ArticleMetadata =
        serde_json::from_str(&raw).map_err(|e| unreadable(&meta_path, e.to_string()))?;

    Ok(metadata.into_article(id, body, locale))
}
