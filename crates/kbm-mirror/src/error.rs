//! Error types for backup and restore.

use kbm_snapshot::SnapshotError;
use kbm_zendesk::ZendeskError;

use crate::entity::EntityRef;
use crate::orchestrator::RunReport;

/// Failure of a single entity.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    /// API call failed.
    #[error(transparent)]
    Api(#[from] ZendeskError),

    /// Parent is neither mapped nor failed (absent from the snapshot).
    #[error("parent {parent} is not in the snapshot")]
    UnresolvedParent {
        /// Missing parent.
        parent: EntityRef,
    },

    /// Record carries no parent ID at all.
    #[error("record has no parent reference")]
    Orphan,
}

impl EntityError {
    /// True for authentication failures, which abort under any policy.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_auth())
    }
}

/// Error that ends a run.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// Credentials rejected by an instance.
    #[error("authentication failed: {0}")]
    Auth(#[source] ZendeskError),

    /// An entity failed under [`ErrorPolicy::FailFast`](crate::ErrorPolicy::FailFast).
    #[error("aborted at {entity}: {source}")]
    Aborted {
        /// Entity that failed.
        entity: EntityRef,
        /// Why it failed.
        #[source]
        source: EntityError,
    },

    /// Listing existing content failed, so matching cannot be trusted.
    #[error("cannot list {what} for locale '{locale}': {source}")]
    Listing {
        /// Listed resource (e.g. "categories").
        what: &'static str,
        /// Locale listed.
        locale: String,
        /// Underlying error.
        #[source]
        source: ZendeskError,
    },

    /// Snapshot could not be read or written.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The mode needs an instance that was not provided.
    #[error("{0} instance is required for this mode")]
    MissingInstance(&'static str),
}

impl MirrorError {
    /// Wrap a listing error, promoting auth failures.
    pub(crate) fn listing(what: &'static str, locale: &str, source: ZendeskError) -> Self {
        if source.is_auth() {
            return Self::Auth(source);
        }
        Self::Listing {
            what,
            locale: locale.to_owned(),
            source,
        }
    }
}

/// A run that stopped early, with the results of the work it finished.
#[derive(Debug, thiserror::Error)]
#[error("{cause}")]
pub struct RunError {
    /// Totals gathered before the run stopped.
    pub partial: Box<RunReport>,
    /// What stopped it.
    #[source]
    pub cause: MirrorError,
}

impl RunError {
    pub(crate) fn new(partial: RunReport, cause: MirrorError) -> Self {
        Self {
            partial: Box::new(partial),
            cause,
        }
    }
}
