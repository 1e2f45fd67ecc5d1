//! CLI error type.

use adfi_config::ConfigError;
use adfi_server::ServeError;

/// Error from a CLI command.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The server failed to start or crashed.
    #[error(transparent)]
    Serve(#[from] ServeError),
}
