//! On-disk knowledge-base snapshots.
//!
//! A snapshot is partitioned by locale:
//!
//! ```text
//! <root>/<locale>/<article_id>.html          article body
//! <root>/<locale>/<article_id>.json          article metadata
//! <root>/<locale>/structure/categories.json  category records
//! <root>/<locale>/structure/sections.json    section records
//! ```
//!
//! [`SnapshotWriter`] produces this layout and [`SnapshotReader`] loads it
//! back into [`LocaleSnapshot`] values without any other state.
//!
//! # Example
//!
//! ```ignore
//! use kbm_snapshot::{SnapshotReader, SnapshotWriter};
//!
//! let writer = SnapshotWriter::new("backup");
//! writer.write_structure("en-us", &categories, &sections)?;
//! writer.write_article("en-us", &article)?;
//!
//! let snapshot = SnapshotReader::new("backup").load("en-us")?;
//! assert_eq!(snapshot.articles.len(), 1);
//! ```

mod error;
mod layout;
mod metadata;
mod reader;
mod scanner;
mod writer;

pub use error::SnapshotError;
pub use layout::SnapshotLayout;
pub use metadata::ArticleMetadata;
pub use reader::{LocaleSnapshot, SnapshotReader, SnapshotWarning};
pub use writer::SnapshotWriter;
