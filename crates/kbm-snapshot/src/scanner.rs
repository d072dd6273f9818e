//! Article file discovery.
//!
//! Pairs `<id>.html` and `<id>.json` files in a locale folder without reading
//! them. Files whose stem is not a numeric article ID are ignored, as is the
//! `structure` folder.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SnapshotError;
use crate::layout::{CONTENT_EXT, METADATA_EXT};

/// Locations of one article's files.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ArticleFiles {
    /// Body file, if present.
    pub content_path: Option<PathBuf>,
    /// Metadata file, if present.
    pub meta_path: Option<PathBuf>,
}

/// Scan `locale_dir` and return article files keyed by article ID.
pub(crate) fn scan_articles(locale_dir: &Path) -> Result<BTreeMap<u64, ArticleFiles>, SnapshotError> {
    let entries = fs::read_dir(locale_dir).map_err(|e| SnapshotError::io(locale_dir, e))?;

    let mut files: BTreeMap<u64, ArticleFiles> = BTreeMap::new();
    for entry in entries {
        let path = entry.map_err(|e| SnapshotError::io(locale_dir, e))?.path();
        if !path.is_file() {
            continue;
        }

        let Some(id) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<u64>().ok())
        else {
            continue;
        };

        match path.extension().and_then(|e| e.to_str()) {
            Some(CONTENT_EXT) => files.entry(id).or_default().content_path = Some(path),
            Some(METADATA_EXT) => files.entry(id).or_default().meta_path = Some(path),
            _ => {}
        }
    }

    Ok(files)
}
