//! CLI error types.

use kbm_config::ConfigError;
use kbm_mirror::RunError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// The run stopped early; its partial report has been printed.
    #[error("{0}")]
    Mirror(#[from] RunError),

    /// The run finished but some entities or locales failed.
    #[error("{0}")]
    Incomplete(String),
}
