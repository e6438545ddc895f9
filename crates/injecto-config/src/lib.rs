//! Configuration management for Injecto.
//!
//! Parses `injecto.toml` configuration files with serde and provides
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
//! - `process.input_dir`, `process.output_dir`, `process.data_files`
//! - `source.repo_url`
//! - `source.branch`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use injecto_source::{GitSource, SourceKind};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override template input directory.
    pub input_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override data files (replaces the configured list).
    pub data_files: Option<Vec<PathBuf>>,
    /// Override source kind.
    pub source: Option<SourceKind>,
    /// Override git repository URL.
    pub repo_url: Option<String>,
    /// Override git branch.
    pub branch: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "injecto.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Template source configuration.
    pub source: SourceConfig,
    /// Processing configuration (paths are relative strings from TOML).
    process: ProcessConfigRaw,

    /// Resolved processing paths (set after loading).
    #[serde(skip)]
    pub process_resolved: ProcessPaths,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
    /// Directory relative paths in the file are resolved against.
    #[serde(skip)]
    config_dir: Option<PathBuf>,
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
            host: "0.0.0.0".to_owned(),
            port: 8000,
        }
    }
}

/// Template source configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Where templates come from.
    pub kind: SourceKind,
    /// Repository URL (git only).
    pub repo_url: Option<String>,
    /// Branch to clone (git only, default branch when unset).
    pub branch: Option<String>,
}

/// Raw processing configuration as parsed from TOML (paths as strings).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProcessConfigRaw {
    input_dir: Option<String>,
    output_dir: Option<String>,
    data_files: Vec<String>,
}

/// Processing paths after resolution against the config directory.
///
/// For git sources `input_dir` stays relative: it names a directory inside
/// the cloned repository.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProcessPaths {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub data_files: Vec<PathBuf>,
}

/// Validated settings for one processing run.
#[derive(Debug, PartialEq, Eq)]
pub struct ProcessConfig {
    /// Where templates come from.
    pub source: SourceKind,
    /// Repository to clone (git only).
    pub git: Option<GitSource>,
    /// Template directory (inside the clone for git sources).
    pub input_dir: PathBuf,
    /// Output directory. Equal to `input_dir` when editing in place.
    pub output_dir: PathBuf,
    /// Data files, merged in order.
    pub data_files: Vec<PathBuf>,
    /// No output directory was given; files are edited in place.
    pub in_place: bool,
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
        /// Config field path (e.g., "`source.repo_url`").
        field: String,
        /// Error message (e.g., "${`REPO_URL`} not set").
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

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !injecto_source::is_supported_url(url) {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `injecto.toml` in current directory and parents.
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
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
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
        if let Some(source) = settings.source {
            self.source.kind = source;
        }
        if let Some(input_dir) = &settings.input_dir {
            self.process_resolved.input_dir = Some(input_dir.clone());
        } else if settings.source.is_some() {
            self.resolve_input_dir();
        }
        if let Some(output_dir) = &settings.output_dir {
            self.process_resolved.output_dir = Some(output_dir.clone());
        }
        if let Some(data_files) = &settings.data_files {
            self.process_resolved.data_files.clone_from(data_files);
        }
        if let Some(repo_url) = &settings.repo_url {
            self.source.repo_url = Some(repo_url.clone());
        }
        if let Some(branch) = &settings.branch {
            self.source.branch = Some(branch.clone());
        }
    }

    /// Get validated settings for a processing run.
    ///
    /// Use this instead of reading `process_resolved` directly when the
    /// command is about to process files.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the input directory or data files
    /// are missing, or the git source settings are inconsistent.
    pub fn require_process(&self) -> Result<ProcessConfig, ConfigError> {
        let paths = &self.process_resolved;
        let input_dir = paths.input_dir.clone().ok_or_else(|| {
            ConfigError::Validation("process.input_dir is required (--input-dir)".to_owned())
        })?;
        if paths.data_files.is_empty() {
            return Err(ConfigError::Validation(
                "process.data_files requires at least one file (--data-files)".to_owned(),
            ));
        }

        let git = match self.source.kind {
            SourceKind::Local => None,
            SourceKind::Git => Some(self.require_git()?),
        };

        let (output_dir, in_place) = match &paths.output_dir {
            Some(output_dir) => (output_dir.clone(), *output_dir == input_dir),
            None => (input_dir.clone(), true),
        };
        if in_place && self.source.kind == SourceKind::Git {
            return Err(ConfigError::Validation(
                "In-place editing is not allowed when source is 'git'; set process.output_dir (--output-dir)"
                    .to_owned(),
            ));
        }

        Ok(ProcessConfig {
            source: self.source.kind,
            git,
            input_dir,
            output_dir,
            data_files: paths.data_files.clone(),
            in_place,
        })
    }

    /// Build the git source from `[source]`.
    fn require_git(&self) -> Result<GitSource, ConfigError> {
        let repo_url = self.source.repo_url.as_deref().ok_or_else(|| {
            ConfigError::Validation(
                "source.repo_url is required when source is 'git' (--repo-url)".to_owned(),
            )
        })?;
        require_http_url(repo_url, "source.repo_url")?;
        GitSource::new(repo_url, self.source.branch.clone())
            .map_err(|err| ConfigError::Validation(err.to_string()))
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
        self.validate_source()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate source configuration.
    fn validate_source(&self) -> Result<(), ConfigError> {
        if let Some(ref repo_url) = self.source.repo_url {
            require_non_empty(repo_url, "source.repo_url")?;
            require_http_url(repo_url, "source.repo_url")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        expand::expand_opt(&mut self.process.input_dir, "process.input_dir")?;
        expand::expand_opt(&mut self.process.output_dir, "process.output_dir")?;
        for file in &mut self.process.data_files {
            *file = expand::expand_env(file, "process.data_files")?;
        }

        expand::expand_opt(&mut self.source.repo_url, "source.repo_url")?;
        expand::expand_opt(&mut self.source.branch, "source.branch")?;

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// A git `input_dir` is kept as written since it is relative to the clone.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: &str| config_dir.join(path);

        self.process_resolved.output_dir = self.process.output_dir.as_deref().map(resolve);
        self.process_resolved.data_files =
            self.process.data_files.iter().map(|f| resolve(f)).collect();
        self.config_dir = Some(config_dir.to_path_buf());
        self.resolve_input_dir();
    }

    /// Resolve the file's `input_dir` for the current source kind.
    fn resolve_input_dir(&mut self) {
        let Some(dir) = self.process.input_dir.as_deref() else {
            return;
        };
        self.process_resolved.input_dir = Some(match (self.source.kind, &self.config_dir) {
            (SourceKind::Local, Some(config_dir)) => config_dir.join(dir),
            _ => PathBuf::from(dir),
        });
    }
}
