//! `kbm run` command implementation.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use kbm_config::{CliSettings, Config};
use kbm_mirror::{
    AccessOverrides, BackupReport, Counts, ErrorPolicy, EventSink, Mode, RestoreSummary, RunPlan,
    RunReport, TracingSink,
};
use kbm_zendesk::{HelpCenter, ZendeskClient};

use crate::error::CliError;
use crate::output::Output;
use crate::progress::ConsoleSink;

/// Phases to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ModeArg {
    /// Source instance → snapshot folder.
    Backup,
    /// Snapshot folder → target instance.
    Restore,
    /// Backup, then restore.
    Both,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Backup => Self::Backup,
            ModeArg::Restore => Self::Restore,
            ModeArg::Both => Self::Both,
        }
    }
}

/// Arguments for the run command.
#[derive(Args)]
pub(crate) struct RunArgs {
    /// Phases to run.
    #[arg(short, long, value_enum, default_value_t = ModeArg::Backup)]
    mode: ModeArg,

    /// Abort at the first failure instead of skipping the broken subtree.
    #[arg(long)]
    fail_fast: bool,

    /// Path to configuration file (default: ./config.json if present).
    #[arg(short, long, env = "KBM_CONFIG")]
    config: Option<PathBuf>,

    /// Snapshot folder (overrides config).
    #[arg(short, long)]
    backup_folder: Option<PathBuf>,

    /// Only print the final report.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RunArgs {
    /// Execute the run command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the run aborts, or any
    /// entity failed.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            backup_folder: self.backup_folder.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let plan = self.plan(&config);

        let source = if plan.mode.backs_up() {
            Some(ZendeskClient::from_config(
                config.require_source()?,
                &config.http,
            ))
        } else {
            None
        };
        let target = if plan.mode.restores() {
            Some(ZendeskClient::from_config(
                config.require_target()?,
                &config.http,
            ))
        } else {
            None
        };

        output.highlight(&format!(
            "kbm {} ({}) in {}",
            plan.mode,
            plan.locales.join(", "),
            plan.backup_folder.display()
        ));
        if let Some(source) = &source {
            output.info(&format!("Source: {}", source.base_url()));
        }
        if let Some(target) = &target {
            output.info(&format!("Target: {}", target.base_url()));
        }

        let console = ConsoleSink::new(output);
        let events: &dyn EventSink = if self.quiet { &TracingSink } else { &console };
        let report = match kbm_mirror::run(
            &plan,
            source.as_ref().map(|c| c as &dyn HelpCenter),
            target.as_ref().map(|c| c as &dyn HelpCenter),
            events,
        ) {
            Ok(report) => report,
            Err(err) => {
                print_report(output, &err.partial);
                return Err(err.into());
            }
        };

        print_report(output, &report);

        if report.is_success() {
            output.success("\nDone.");
            Ok(())
        } else {
            Err(CliError::Incomplete(
                "run finished with failures".to_owned(),
            ))
        }
    }

    fn plan(&self, config: &Config) -> RunPlan {
        RunPlan {
            mode: self.mode.into(),
            policy: if self.fail_fast {
                ErrorPolicy::FailFast
            } else {
                ErrorPolicy::Continue
            },
            backup_folder: config.backup_folder.clone(),
            locales: config.locales.clone(),
            include_drafts: config.include_drafts,
            access: AccessOverrides {
                permission_group_id: config.permission_group_id,
                user_segment_id: config.user_segment_id,
            },
        }
    }
}

fn print_report(output: &Output, report: &RunReport) {
    if report.backup.is_none() && report.restore.is_none() {
        return;
    }
    output.info("");
    output.rule();
    if let Some(backup) = &report.backup {
        print_backup(output, backup);
    }
    if let Some(restore) = &report.restore {
        print_restore(output, &restore.summary);
    }
    output.rule();
}

fn print_backup(output: &Output, backup: &BackupReport) {
    output.highlight("Backup");
    output.info(&format!(
        "  {} categories, {} sections, {} articles ({} drafts skipped)",
        backup.categories, backup.sections, backup.articles, backup.drafts_skipped
    ));
    for warning in &backup.warnings {
        output.warning(&format!("  warning: {warning}"));
    }
    for failure in &backup.failures {
        output.error(&format!(
            "  ! {} \"{}\" [{}]: {}",
            failure.entity, failure.label, failure.locale, failure.message
        ));
    }
}

fn print_restore(output: &Output, summary: &RestoreSummary) {
    output.highlight("Restore");
    output.info(&counts_header());
    output.info(&counts_row("categories", &summary.categories));
    output.info(&counts_row("sections", &summary.sections));
    output.info(&counts_row("articles", &summary.articles));

    for error in &summary.snapshot_errors {
        output.error(&format!("  locale {}: {}", error.locale, error.message));
    }
    for failure in &summary.failures {
        output.error(&format!(
            "  ! {} \"{}\" [{}]: {}",
            failure.entity, failure.label, failure.locale, failure.message
        ));
    }
    if !summary.skipped.is_empty() {
        let skipped: Vec<String> = summary.skipped.iter().map(ToString::to_string).collect();
        output.warning(&format!("  skipped: {}", skipped.join(", ")));
    }
    for warning in &summary.warnings {
        output.warning(&format!("  warning: {warning}"));
    }
}

fn counts_header() -> String {
    format!(
        "  {:<12}{:>9}{:>9}{:>9}{:>9}{:>9}",
        "", "created", "matched", "updated", "failed", "skipped"
    )
}

fn counts_row(label: &str, counts: &Counts) -> String {
    format!(
        "  {:<12}{:>9}{:>9}{:>9}{:>9}{:>9}",
        label, counts.created, counts.matched, counts.updated, counts.failed, counts.skipped
    )
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: RunArgs,
    }

    #[test]
    fn test_mode_defaults_to_backup() {
        let cli = TestCli::try_parse_from(["kbm"]).unwrap();
        assert_eq!(cli.args.mode, ModeArg::Backup);
        assert!(!cli.args.fail_fast);
    }

    #[test]
    fn test_parse_restore_fail_fast() {
        let cli = TestCli::try_parse_from(["kbm", "--mode", "both", "--fail-fast", "-b", "out"])
            .unwrap();
        assert_eq!(Mode::from(cli.args.mode), Mode::Both);
        assert!(cli.args.fail_fast);
        assert_eq!(cli.args.backup_folder, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(TestCli::try_parse_from(["kbm", "--mode", "sync"]).is_err());
    }

    #[test]
    fn test_counts_row_aligns_with_header() {
        let counts = Counts {
            created: 3,
            matched: 1,
            updated: 12,
            failed: 0,
            skipped: 2,
        };
        let row = counts_row("articles", &counts);
        assert_eq!(row.len(), counts_header().len());
        assert_eq!(row, "  articles            3        1       12        0        2");
    }
}
