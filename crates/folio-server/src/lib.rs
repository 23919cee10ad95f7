//! HTTP server for the Folio content server.
//!
//! Serves a folder of markdown documents with axum:
//! - `/` index of every document, grouped by folder, plus the photo galleries
//! - `/articles/...` documents rendered to HTML, other files streamed raw
//! - `/photos/...` gallery pages and raw images
//!
//! Every request reads the filesystem fresh. There is no cache and no
//! watcher, so edits show up on the next reload.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use folio_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         root_dir: PathBuf::from("notes"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (folio-server)
//!                        │
//!                        ├─► sanitize (folio-content) ──► SanitizedPath
//!                        │
//!                        ├─► Indexer / list_gallery (folio-content)
//!                        │
//!                        ├─► MarkdownRenderer + PageTemplate (folio-renderer)
//!                        │
//!                        └─► raw files (tower-http ServeFile)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use folio_config::TraversalMode;
use folio_content::{DEFAULT_EXCLUDED, DEFAULT_EXTENSION};
pub use folio_content::TraversalPolicy;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Serving root directory.
    pub root_dir: PathBuf,
    /// Gallery folder name under the root.
    pub photos_dir: String,
    /// Document extension without the dot.
    pub extension: String,
    /// Directory names skipped when indexing.
    pub exclude: Vec<String>,
    /// Handling of `..` in request paths.
    pub traversal: TraversalPolicy,
    /// Custom page template (`None` uses the built-in one).
    pub template: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            root_dir: PathBuf::from("."),
            photos_dir: "photos".to_owned(),
            extension: DEFAULT_EXTENSION.to_owned(),
            exclude: DEFAULT_EXCLUDED.iter().map(|&s| s.to_owned()).collect(),
            traversal: TraversalPolicy::default(),
            template: None,
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the root is not a directory, the template cannot be
/// loaded, or the address cannot be bound.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if !config.root_dir.is_dir() {
        return Err(format!(
            "Serving root `{}` is not a directory",
            config.root_dir.display()
        )
        .into());
    }

    let state = Arc::new(AppState::from_config(&config)?);
    let app = app::create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        root = %config.root_dir.display(),
        "Starting server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Folio config.
#[must_use]
pub fn server_config_from_folio_config(config: &folio_config::Config) -> ServerConfig {
    let content = &config.content_resolved;

    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        root_dir: content.root_dir.clone(),
        photos_dir: content.photos_dir.clone(),
        extension: content.extension.clone(),
        exclude: content.exclude.clone(),
        traversal: match content.traversal {
            TraversalMode::Reject => TraversalPolicy::Reject,
            TraversalMode::Rewrite => TraversalPolicy::Rewrite,
        },
        template: content.template.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use folio_config::{CliSettings, Config};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_server_config_from_folio_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("folio.toml");
        fs::write(
            &config_path,
            r#"
[server]
port = 9000

[content]
root_dir = "notes"
photos_dir = "pics"
traversal = "rewrite"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&config_path), None).unwrap();
        let server = server_config_from_folio_config(&config);

        assert_eq!(server.port, 9000);
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.root_dir, temp_dir.path().join("notes"));
        assert_eq!(server.photos_dir, "pics");
        assert_eq!(server.traversal, TraversalPolicy::Rewrite);
        assert_eq!(server.extension, "md");
        assert!(server.template.is_none());
    }

    #[test]
    fn test_cli_settings_reach_server_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("folio.toml");
        fs::write(&config_path, "").unwrap();

        let settings = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(3000),
            root_dir: None,
        };
        let config = Config::load(Some(&config_path), Some(&settings)).unwrap();
        let server = server_config_from_folio_config(&config);

        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 3000);
        assert_eq!(server.traversal, TraversalPolicy::Reject);
    }

    #[tokio::test]
    async fn test_run_server_rejects_missing_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            root_dir: temp_dir.path().join("missing"),
            ..ServerConfig::default()
        };

        let err = run_server(config).await.unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }
}
