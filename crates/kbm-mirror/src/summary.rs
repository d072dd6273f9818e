//! Restore outcome accounting.

use crate::entity::{EntityKind, EntityRef};

/// How one entity was reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No counterpart existed; one was created.
    Created,
    /// An existing counterpart was reused as-is.
    Matched,
    /// An existing counterpart had its content overwritten.
    Updated,
}

/// Per-kind outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    /// Newly created on the target.
    pub created: usize,
    /// Matched to an existing target entity.
    pub matched: usize,
    /// Matched and content overwritten.
    pub updated: usize,
    /// Failed.
    pub failed: usize,
    /// Not attempted because an ancestor failed.
    pub skipped: usize,
}

impl Counts {
    /// Entities that ended up with a target counterpart.
    #[must_use]
    pub fn resolved(&self) -> usize {
        self.created + self.matched + self.updated
    }
}

/// One failed entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Failed entity.
    pub entity: EntityRef,
    /// Name or title, for reporting.
    pub label: String,
    /// Locale being processed.
    pub locale: String,
    /// Error message.
    pub message: String,
}

/// A locale whose snapshot could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFailure {
    /// Locale.
    pub locale: String,
    /// Error message.
    pub message: String,
}

/// Totals for a restore run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Category outcomes.
    pub categories: Counts,
    /// Section outcomes.
    pub sections: Counts,
    /// Article outcomes.
    pub articles: Counts,
    /// Every failed entity, in processing order.
    pub failures: Vec<Failure>,
    /// Every skipped entity, in processing order.
    pub skipped: Vec<EntityRef>,
    /// Locales whose snapshot was unreadable.
    pub snapshot_errors: Vec<SnapshotFailure>,
    /// Non-fatal snapshot problems (unpaired or unreadable article files).
    pub warnings: Vec<String>,
}

impl RestoreSummary {
    /// Counts for one kind.
    #[must_use]
    pub fn counts(&self, kind: EntityKind) -> &Counts {
        match kind {
            EntityKind::Category => &self.categories,
            EntityKind::Section => &self.sections,
            EntityKind::Article => &self.articles,
        }
    }

    fn counts_mut(&mut self, kind: EntityKind) -> &mut Counts {
        match kind {
            EntityKind::Category => &mut self.categories,
            EntityKind::Section => &mut self.sections,
            EntityKind::Article => &mut self.articles,
        }
    }

    /// Total creations across all kinds.
    #[must_use]
    pub fn total_created(&self) -> usize {
        self.categories.created + self.sections.created + self.articles.created
    }

    /// True if any entity or locale failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty() || !self.snapshot_errors.is_empty()
    }

    pub(crate) fn record(&mut self, kind: EntityKind, outcome: Outcome) {
        let counts = self.counts_mut(kind);
        match outcome {
            Outcome::Created => counts.created += 1,
            Outcome::Matched => counts.matched += 1,
            Outcome::Updated => counts.updated += 1,
        }
    }

    pub(crate) fn record_failure(&mut self, failure: Failure) {
        self.counts_mut(failure.entity.kind).failed += 1;
        self.failures.push(failure);
    }

    pub(crate) fn record_skip(&mut self, entity: EntityRef) {
        self.counts_mut(entity.kind).skipped += 1;
        self.skipped.push(entity);
    }
}
