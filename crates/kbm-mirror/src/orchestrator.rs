//! Phase sequencing for a mirror run.

use std::fmt;
use std::path::PathBuf;

use kbm_snapshot::{SnapshotReader, SnapshotWriter};
use kbm_zendesk::HelpCenter;
use tracing::info;

use crate::ErrorPolicy;
use crate::backup::{Backup, BackupReport};
use crate::error::{MirrorError, RunError};
use crate::events::EventSink;
use crate::restore::{AccessOverrides, Reconciler, RestoreReport};

/// Which phases to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Source → snapshot.
    Backup,
    /// Snapshot → target.
    Restore,
    /// Backup, then restore from the fresh snapshot.
    Both,
}

impl Mode {
    /// True if the backup phase runs.
    #[must_use]
    pub fn backs_up(self) -> bool {
        matches!(self, Self::Backup | Self::Both)
    }

    /// True if the restore phase runs.
    #[must_use]
    pub fn restores(self) -> bool {
        matches!(self, Self::Restore | Self::Both)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Backup => "backup",
            Self::Restore => "restore",
            Self::Both => "both",
        })
    }
}

/// Everything a run needs besides the instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    /// Phases to run.
    pub mode: Mode,
    /// Failure handling.
    pub policy: ErrorPolicy,
    /// Snapshot root.
    pub backup_folder: PathBuf,
    /// Locales, processed in order.
    pub locales: Vec<String>,
    /// Back up draft articles too.
    pub include_drafts: bool,
    /// Visibility for created articles.
    pub access: AccessOverrides,
}

/// Results of the phases that ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Set if backup ran.
    pub backup: Option<BackupReport>,
    /// Set if restore ran.
    pub restore: Option<RestoreReport>,
}

impl RunReport {
    /// True if no entity or locale failed in any phase.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.backup.as_ref().is_some_and(BackupReport::has_failures)
            && !self
                .restore
                .as_ref()
                .is_some_and(|r| r.summary.has_failures())
    }
}

/// Run the phases `plan.mode` selects.
///
/// Backup reads from `source`, restore writes to `target`; each is only
/// required when its phase runs. The restore phase reads the snapshot back
/// from disk, so in [`Mode::Both`] it sees exactly what backup wrote.
///
/// # Errors
///
/// Returns a [`RunError`] carrying [`MirrorError::MissingInstance`] if a
/// required instance is absent, otherwise whatever ended the run early (see
/// [`Backup::run`] and [`Reconciler::restore_locale`]). The error keeps the
/// totals of every phase that ran up to that point.
pub fn run(
    plan: &RunPlan,
    source: Option<&dyn HelpCenter>,
    target: Option<&dyn HelpCenter>,
    events: &dyn EventSink,
) -> Result<RunReport, RunError> {
    let missing = |role: &'static str| {
        RunError::new(RunReport::default(), MirrorError::MissingInstance(role))
    };
    let source = match (plan.mode.backs_up(), source) {
        (true, None) => return Err(missing("source")),
        (_, source) => source,
    };
    let target = match (plan.mode.restores(), target) {
        (true, None) => return Err(missing("target")),
        (_, target) => target,
    };

    let mut report = RunReport::default();

    if let Some(source) = source.filter(|_| plan.mode.backs_up()) {
        info!(folder = %plan.backup_folder.display(), "Starting backup");
        let writer = SnapshotWriter::new(&plan.backup_folder);
        let mut backup = BackupReport::default();
        let outcome = Backup::new(source, &writer, events, plan.policy)
            .include_drafts(plan.include_drafts)
            .run_into(&plan.locales, &mut backup);
        info!(
            articles = backup.articles,
            failures = backup.failures.len(),
            "Backup finished"
        );
        report.backup = Some(backup);
        if let Err(cause) = outcome {
            return Err(RunError::new(report, cause));
        }
    }

    if let Some(target) = target.filter(|_| plan.mode.restores()) {
        info!(folder = %plan.backup_folder.display(), "Starting restore");
        let (restore, outcome) = restore(plan, target, events);
        info!(
            created = restore.summary.total_created(),
            failures = restore.summary.failures.len(),
            "Restore finished"
        );
        report.restore = Some(restore);
        if let Err(cause) = outcome {
            return Err(RunError::new(report, cause));
        }
    }

    Ok(report)
}

fn restore(
    plan: &RunPlan,
    target: &dyn HelpCenter,
    events: &dyn EventSink,
) -> (RestoreReport, Result<(), MirrorError>) {
    let reader = SnapshotReader::new(&plan.backup_folder);
    let mut reconciler = Reconciler::new(target, events, plan.policy, plan.access);
    let outcome = plan
        .locales
        .iter()
        .try_for_each(|locale| match reader.load(locale) {
            Ok(snapshot) => reconciler.restore_locale(&snapshot),
            Err(err) => reconciler.snapshot_failed(locale, err),
        });
    (reconciler.finish(), outcome)
}
