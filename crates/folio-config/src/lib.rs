//! Configuration management for Folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `content.root_dir`

mod expand;

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the serving root directory.
    pub root_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// Default gallery folder name.
const DEFAULT_PHOTOS_DIR: &str = "photos";

/// Default document extension.
const DEFAULT_EXTENSION: &str = "md";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Content configuration (paths are relative strings from TOML).
    #[serde(default)]
    content: ContentConfigRaw,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// How `..` in request paths is handled.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TraversalMode {
    /// Refuse the request.
    #[default]
    Reject,
    /// Replace `..` with a harmless token and continue.
    Rewrite,
}

/// Raw content configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    root_dir: Option<String>,
    photos_dir: Option<String>,
    extension: Option<String>,
    exclude: Option<Vec<String>>,
    traversal: Option<TraversalMode>,
    template: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug)]
pub struct ContentConfig {
    /// Serving root directory.
    pub root_dir: PathBuf,
    /// Gallery folder name under the root.
    pub photos_dir: String,
    /// Document extension without the dot.
    pub extension: String,
    /// Directory names skipped when indexing.
    pub exclude: Vec<String>,
    /// Handling of `..` in request paths.
    pub traversal: TraversalMode,
    /// Custom page template file.
    pub template: Option<PathBuf>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            photos_dir: DEFAULT_PHOTOS_DIR.to_owned(),
            extension: DEFAULT_EXTENSION.to_owned(),
            exclude: default_exclude(),
            traversal: TraversalMode::default(),
            template: None,
        }
    }
}

impl ContentConfig {
    /// Gallery root directory (`<root_dir>/<photos_dir>`).
    #[must_use]
    pub fn photos_root(&self) -> PathBuf {
        self.root_dir.join(&self.photos_dir)
    }
}

fn default_exclude() -> Vec<String> {
    vec![".git".to_owned()]
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`FOLIO_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a field to be a single plain folder name.
fn require_folder_name(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !value.contains(['/', '\\']) => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "{field} must be a single folder name"
        ))),
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(root_dir) = &settings.root_dir {
            self.content_resolved.root_dir.clone_from(root_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            content: ContentConfigRaw::default(),
            content_resolved: ContentConfig {
                root_dir: base.to_path_buf(),
                ..ContentConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_content()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate content configuration.
    fn validate_content(&self) -> Result<(), ConfigError> {
        let content = &self.content_resolved;

        require_non_empty(&content.extension, "content.extension")?;
        if content.extension.contains(['.', '/', '\\']) {
            return Err(ConfigError::Validation(
                "content.extension must not contain dots or separators".to_owned(),
            ));
        }

        require_folder_name(&content.photos_dir, "content.photos_dir")?;

        for name in &content.exclude {
            require_folder_name(name, "content.exclude")?;
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref root_dir) = self.content.root_dir {
            self.content.root_dir = Some(expand::expand_env(root_dir, "content.root_dir")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let raw = &self.content;

        self.content_resolved = ContentConfig {
            root_dir: config_dir.join(raw.root_dir.as_deref().unwrap_or(".")),
            photos_dir: raw
                .photos_dir
                .clone()
                .unwrap_or_else(|| DEFAULT_PHOTOS_DIR.to_owned()),
            extension: raw
                .extension
                .clone()
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_owned()),
            exclude: raw.exclude.clone().unwrap_or_else(default_exclude),
            traversal: raw.traversal.unwrap_or_default(),
            template: raw.template.as_deref().map(|t| config_dir.join(t)),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.content_resolved.root_dir, PathBuf::from("/test"));
        assert_eq!(config.content_resolved.photos_dir, "photos");
        assert_eq!(
            config.content_resolved.photos_root(),
            PathBuf::from("/test/photos")
        );
        assert_eq!(config.content_resolved.extension, "md");
        assert_eq!(config.content_resolved.exclude, vec![".git".to_owned()]);
        assert_eq!(config.content_resolved.traversal, TraversalMode::Reject);
        assert!(config.content_resolved.template.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = "";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_parse_server_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_parse_traversal_mode() {
        let toml = r#"
[content]
traversal = "rewrite"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.content_resolved.traversal, TraversalMode::Rewrite);
    }

    #[test]
    fn test_parse_unknown_traversal_mode_fails() {
        let toml = r#"
[content]
traversal = "ignore"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[content]
root_dir = "notes"
photos_dir = "pictures"
extension = "markdown"
exclude = [".git", "drafts"]
template = "theme/page.html"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        let content = &config.content_resolved;
        assert_eq!(content.root_dir, PathBuf::from("/project/notes"));
        assert_eq!(content.photos_root(), PathBuf::from("/project/notes/pictures"));
        assert_eq!(content.extension, "markdown");
        assert_eq!(
            content.exclude,
            vec![".git".to_owned(), "drafts".to_owned()]
        );
        assert_eq!(
            content.template,
            Some(PathBuf::from("/project/theme/page.html"))
        );
    }

    #[test]
    fn test_resolve_paths_defaults() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.content_resolved.root_dir, PathBuf::from("/project/."));
        assert_eq!(config.content_resolved.photos_dir, "photos");
        assert_eq!(config.content_resolved.exclude, vec![".git".to_owned()]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 3000

[content]
root_dir = "site"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.content_resolved.root_dir, dir.path().join("site"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_applies_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "[server]\nport = 3000\n").unwrap();
        let settings = CliSettings {
            port: Some(4000),
            root_dir: Some(PathBuf::from("/elsewhere")),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.content_resolved.root_dir, PathBuf::from("/elsewhere"));
    }

    #[test]
    fn test_load_rejects_cli_port_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            port: Some(0),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_apply_cli_settings_host() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_root_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            root_dir: Some(PathBuf::from("/custom/notes")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.content_resolved.root_dir,
            PathBuf::from("/custom/notes")
        );
        assert_eq!(
            config.content_resolved.photos_root(),
            PathBuf::from("/custom/notes/photos")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.content_resolved.root_dir, PathBuf::from("/test"));
    }

    #[test]
    fn test_expand_env_vars_server_host() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("FOLIO_TEST_HOST", "0.0.0.0");
        }
        let toml = r#"
[server]
host = "${FOLIO_TEST_HOST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        unsafe {
            std::env::remove_var("FOLIO_TEST_HOST");
        }
    }

    #[test]
    fn test_expand_env_vars_root_dir_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FOLIO_TEST_UNSET_ROOT");
        }
        let toml = r#"
[content]
root_dir = "${FOLIO_TEST_UNSET_ROOT:-notes}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.content_resolved.root_dir,
            PathBuf::from("/project/notes")
        );
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FOLIO_TEST_MISSING_HOST");
        }
        let toml = r#"
[server]
host = "${FOLIO_TEST_MISSING_HOST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let result = config.expand_env_vars();

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("FOLIO_TEST_MISSING_HOST"));
        assert!(err.to_string().contains("server.host"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "cannot be empty"]);
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(&config, &["server.port", "cannot be 0"]);
    }

    #[test]
    fn test_validate_extension_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_resolved.extension = String::new();
        assert_validation_error(&config, &["content.extension", "cannot be empty"]);
    }

    #[test]
    fn test_validate_extension_with_dot() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_resolved.extension = ".md".to_owned();
        assert_validation_error(&config, &["content.extension"]);
    }

    #[test]
    fn test_validate_photos_dir_nested() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_resolved.photos_dir = "media/photos".to_owned();
        assert_validation_error(&config, &["content.photos_dir", "single folder name"]);
    }

    #[test]
    fn test_validate_photos_dir_parent() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_resolved.photos_dir = "..".to_owned();
        assert_validation_error(&config, &["content.photos_dir"]);
    }

    #[test]
    fn test_validate_exclude_entry_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_resolved.exclude = vec![String::new()];
        assert_validation_error(&config, &["content.exclude"]);
    }
}
