//! Serve command.

use std::path::PathBuf;

use clap::Args;

use adfi_config::{CliSettings, Config};
use adfi_server::run_server;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Host address to bind to.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on.
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to the configuration file (default: discover adfi.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the key-value store.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ServeArgs {
    /// Load config and run the server until shutdown.
    pub(crate) async fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            data_dir: self.data_dir,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        // Fail fast on missing instance credentials before binding
        config.require_jira()?;
        config.require_confluence()?;

        output.success(&format!(
            "Starting adfi on http://{}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Storing links under {}",
            config.storage_resolved.data_dir.display()
        ));

        run_server(config).await?;
        Ok(())
    }
}
