//! `kbm init` command implementation.

use std::path::PathBuf;

use clap::Args;
use kbm_config::{CONFIG_FILENAME, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the init command.
#[derive(Args)]
pub(crate) struct InitArgs {
    /// Where to write the config (default: ./config.json).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

impl InitArgs {
    /// Execute the init command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let path = self
            .config
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
        Config::write_default(&path, self.force)?;

        output.success(&format!("Wrote {}", path.display()));
        output.info("\nFill in the source and target credentials, or set:");
        output.info("  ZENDESK_SOURCE_API_TOKEN, ZENDESK_SOURCE_USER_EMAIL, ZENDESK_SOURCE_SUBDOMAIN");
        output.info("  ZENDESK_TARGET_API_TOKEN, ZENDESK_TARGET_USER_EMAIL, ZENDESK_TARGET_SUBDOMAIN");
        Ok(())
    }
}
