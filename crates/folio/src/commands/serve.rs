//! `folio serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config, TraversalMode};
use folio_server::{run_server, server_config_from_folio_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serving root directory (overrides config).
    #[arg(short, long, env = "FOLIO_ROOT")]
    root: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (log every request).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let content = &config.content_resolved;

        output.highlight(&format!(
            "Serving on http://{}:{}/",
            config.server.host, config.server.port
        ));
        if let Some(path) = &config.config_path {
            output.field("Config", &path.display().to_string());
        }
        output.field("Root", &content.root_dir.display().to_string());
        output.field("Photos", &content.photos_root().display().to_string());
        output.field(
            "Traversal",
            match content.traversal {
                TraversalMode::Reject => "reject",
                TraversalMode::Rewrite => "rewrite",
            },
        );
        if let Some(template) = &content.template {
            output.field("Template", &template.display().to_string());
        }
        output.info("Press Ctrl-C to stop");

        let server_config = server_config_from_folio_config(&config);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Settings that override values from the config file.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            host: self.host.clone(),
            port: self.port,
            root_dir: self.root.clone(),
        }
    }
}
