//! Entity identity across the knowledge-base hierarchy.

use std::fmt;

/// Level of the knowledge-base hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// Top level.
    Category,
    /// Belongs to a category.
    Section,
    /// Belongs to a section.
    Article,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Category => "category",
            Self::Section => "section",
            Self::Article => "article",
        })
    }
}

/// A source-instance entity: kind plus source-side ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef {
    /// Hierarchy level.
    pub kind: EntityKind,
    /// ID on the source instance.
    pub source_id: u64,
}

impl EntityRef {
    /// Source category.
    #[must_use]
    pub fn category(source_id: u64) -> Self {
        Self {
            kind: EntityKind::Category,
            source_id,
        }
    }

    /// Source section.
    #[must_use]
    pub fn section(source_id: u64) -> Self {
        Self {
            kind: EntityKind::Section,
            source_id,
        }
    }

    /// Source article.
    #[must_use]
    pub fn article(source_id: u64) -> Self {
        Self {
            kind: EntityKind::Article,
            source_id,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.source_id)
    }
}
