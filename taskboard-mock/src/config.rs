//! Configuration system for the `taskboard-mock` server.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskboard-mock/config.toml`)
//! 4. Compiled defaults

use std::path::PathBuf;

/// Errors that can occur when loading mock server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure for the mock server.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct MockConfigFile {
    server: ServerFileConfig,
}

/// `[server]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerFileConfig {
    bind_addr: Option<String>,
    auth_token: Option<String>,
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// CLI arguments for the mock server.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "In-memory stand-in for the Taskboard task API")]
pub struct MockCliArgs {
    /// Address to bind the server to.
    #[arg(short, long, env = "TASKBOARD_MOCK_ADDR")]
    pub bind: Option<String>,

    /// Token clients must send in the `AuthToken` header.
    #[arg(long, env = "TASKBOARD_MOCK_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Path to config file (default: `~/.config/taskboard-mock/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKBOARD_MOCK_LOG")]
    pub log_level: String,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved mock server configuration.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Address to bind the server to (e.g., `127.0.0.1:8080`).
    pub bind_addr: String,
    /// Accepted `AuthToken` value.
    pub auth_token: String,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            auth_token: "dev".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl MockConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed.
    pub fn load(cli: &MockCliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &MockCliArgs, file: &MockConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: cli
                .bind
                .clone()
                .or_else(|| file.server.bind_addr.clone())
                .unwrap_or(defaults.bind_addr),
            auth_token: cli
                .auth_token
                .clone()
                .or_else(|| file.server.auth_token.clone())
                .unwrap_or(defaults.auth_token),
            log_level: cli.log_level.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file for the mock server.
fn load_config_file(
    explicit_path: Option<&std::path::Path>,
) -> Result<MockConfigFile, ConfigError> {
    if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    }
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(MockConfigFile::default());
    };
    let path = config_dir.join("taskboard-mock").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(MockConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
