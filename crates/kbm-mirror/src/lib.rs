//! Mirroring of Help Center knowledge bases between instances.
//!
//! The mirror runs as one sequential pass in up to two phases:
//!
//! 1. **Backup**: list categories, sections and articles on the source
//!    instance and write them to an on-disk snapshot ([`Backup`])
//! 2. **Restore**: load the snapshot and reconcile it onto the target
//!    instance, category → section → article, with find-or-create semantics
//!    so repeated runs never duplicate content ([`Reconciler`])
//!
//! [`run`] sequences the phases according to a [`Mode`]; the only state
//! shared between them is the snapshot on disk.
//!
//! Progress is reported through an [`EventSink`], so callers decide how to
//! present it.
//!
//! # Error policy
//!
//! Entity-level failures are handled according to [`ErrorPolicy`]:
//! [`ErrorPolicy::FailFast`] aborts the run at the first failure,
//! [`ErrorPolicy::Continue`] records it, skips the entity's descendants and
//! moves on. Authentication failures abort under either policy.

mod backup;
mod entity;
mod error;
mod events;
mod orchestrator;
mod restore;
mod summary;
#[cfg(test)]
mod testing;

pub use backup::{Backup, BackupReport};
pub use entity::{EntityKind, EntityRef};
pub use error::{EntityError, MirrorError, RunError};
pub use events::{Event, EventSink, Phase, TracingSink};
pub use orchestrator::{Mode, RunPlan, RunReport, run};
pub use restore::{AccessOverrides, Lookup, Reconciler, RestoreReport, TranslationMap};
pub use summary::{Counts, Failure, Outcome, RestoreSummary, SnapshotFailure};

/// What to do when one entity fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the whole run at the first failure.
    FailFast,
    /// Record the failure, skip descendants, continue with siblings.
    #[default]
    Continue,
}
