//! CLI command implementations.

pub(crate) mod init;
pub(crate) mod run;

pub(crate) use init::InitArgs;
pub(crate) use run::RunArgs;
