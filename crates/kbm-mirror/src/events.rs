//! Progress reporting.
//!
//! The backup and restore phases describe what they do as [`Event`]s and
//! hand them to an [`EventSink`]. [`TracingSink`] turns them into log
//! records; the CLI supplies its own sink for terminal output.

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::entity::EntityRef;
use crate::summary::Outcome;

/// Run phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Source → snapshot.
    Backup,
    /// Snapshot → target.
    Restore,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Backup => "backup",
            Self::Restore => "restore",
        })
    }
}

/// Something that happened during a run.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// A phase began processing a locale.
    LocaleStarted {
        /// Phase.
        phase: Phase,
        /// Locale.
        locale: &'a str,
    },
    /// Categories and sections of a locale were written to the snapshot.
    StructureSaved {
        /// Locale.
        locale: &'a str,
        /// Categories written.
        categories: usize,
        /// Sections written.
        sections: usize,
    },
    /// An article was written to the snapshot.
    ArticleSaved {
        /// Locale.
        locale: &'a str,
        /// Source article ID.
        article_id: u64,
        /// Title.
        title: &'a str,
    },
    /// An entity got a target counterpart.
    Reconciled {
        /// Source entity.
        entity: EntityRef,
        /// Name or title.
        label: &'a str,
        /// How it was reconciled.
        outcome: Outcome,
        /// Target ID.
        target_id: u64,
    },
    /// An entity failed.
    Failed {
        /// Source entity.
        entity: EntityRef,
        /// Name or title.
        label: &'a str,
        /// Error message.
        error: &'a str,
    },
    /// An entity was not attempted because its parent failed.
    Skipped {
        /// Source entity.
        entity: EntityRef,
        /// Name or title.
        label: &'a str,
        /// Failed or skipped parent.
        parent: EntityRef,
    },
    /// Non-fatal problem.
    Warning {
        /// Locale.
        locale: &'a str,
        /// Description.
        message: &'a str,
    },
    /// A whole locale could not be processed.
    LocaleFailed {
        /// Phase.
        phase: Phase,
        /// Locale.
        locale: &'a str,
        /// Error message.
        error: &'a str,
    },
}

/// Receives run events.
pub trait EventSink {
    /// Handle one event.
    fn emit(&self, event: &Event<'_>);
}

/// Logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &Event<'_>) {
        match *event {
            Event::LocaleStarted { phase, locale } => {
                info!(%phase, locale, "Processing locale");
            }
            Event::StructureSaved {
                locale,
                categories,
                sections,
            } => info!(locale, categories, sections, "Saved structure"),
            Event::ArticleSaved {
                locale,
                article_id,
                title,
            } => debug!(locale, article_id, title, "Saved article"),
            Event::Reconciled {
                entity,
                label,
                outcome,
                target_id,
            } => info!(%entity, label, ?outcome, target_id, "Reconciled"),
            Event::Failed {
                entity,
                label,
                error,
            } => error!(%entity, label, error, "Failed"),
            Event::Skipped {
                entity,
                label,
                parent,
            } => warn!(%entity, label, %parent, "Skipped, parent failed"),
            Event::Warning { locale, message } => warn!(locale, "{message}"),
            Event::LocaleFailed {
                phase,
                locale,
                error,
            } => error!(%phase, locale, error, "Locale failed"),
        }
    }
}
