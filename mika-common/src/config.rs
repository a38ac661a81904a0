//! Configuration loading and credential resolution
//!
//! Credentials are resolved per field with the priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//!
//! The config file itself is located by:
//! 1. Explicit path (command-line)
//! 2. `MIKA_CONFIG` environment variable
//! 3. `<config_dir>/mika/config.toml`
//!
//! A missing config file is not an error; defaults are used instead.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "MIKA_CONFIG";

/// Environment variable holding the Discogs personal access token
pub const DISCOGS_TOKEN_ENV: &str = "DISCOGS_TOKEN";

/// Environment variable holding the Spotify client id
pub const SPOTIFY_CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";

/// Environment variable holding the Spotify client secret
pub const SPOTIFY_CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

/// Configuration loaded from TOML file
///
/// Every field is optional; an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Discogs personal access token
    #[serde(default)]
    pub discogs_token: Option<String>,

    /// Spotify application client id
    #[serde(default)]
    pub spotify_client_id: Option<String>,

    /// Spotify application client secret
    #[serde(default)]
    pub spotify_client_secret: Option<String>,

    /// User-Agent override for outgoing HTTP requests
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file path
    ///
    /// Missing files yield the default configuration with a warning.
    /// Unreadable or malformed files are errors.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file not found: {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Locate and load the configuration file
    ///
    /// See module docs for the lookup order. When no candidate path exists
    /// the default configuration is returned.
    pub fn resolve(cli_path: Option<&Path>) -> Result<Self> {
        match resolve_config_path(cli_path) {
            Some(path) => Self::load(&path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Determine which config file path to use, if any
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if is_valid_key(&path) {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    let default_path = dirs::config_dir().map(|d| d.join("mika").join("config.toml"))?;
    if default_path.exists() {
        Some(default_path)
    } else {
        None
    }
}

/// Validate credential value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Spotify client-credentials pair
#[derive(Clone, PartialEq, Eq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Credentials supplied to the album pipeline
///
/// The Discogs token is mandatory for a lookup; Spotify credentials are
/// optional and only enable enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub discogs_token: Option<String>,
    pub spotify: Option<SpotifyCredentials>,
}

/// Command-line overrides for credential resolution
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub discogs_token: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
}

impl Credentials {
    /// Resolve all credentials from CLI → ENV → TOML
    pub fn resolve(overrides: &CredentialOverrides, toml_config: &TomlConfig) -> Self {
        let discogs_token = resolve_field(
            "Discogs token",
            overrides.discogs_token.as_deref(),
            DISCOGS_TOKEN_ENV,
            toml_config.discogs_token.as_deref(),
        );
        let client_id = resolve_field(
            "Spotify client id",
            overrides.spotify_client_id.as_deref(),
            SPOTIFY_CLIENT_ID_ENV,
            toml_config.spotify_client_id.as_deref(),
        );
        let client_secret = resolve_field(
            "Spotify client secret",
            overrides.spotify_client_secret.as_deref(),
            SPOTIFY_CLIENT_SECRET_ENV,
            toml_config.spotify_client_secret.as_deref(),
        );

        let spotify = match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Some(SpotifyCredentials {
                client_id,
                client_secret,
            }),
            (None, None) => None,
            _ => {
                warn!("Only one of Spotify client id/secret configured, enrichment disabled");
                None
            }
        };

        Self {
            discogs_token,
            spotify,
        }
    }

    /// Discogs token, or a configuration error naming how to provide one
    pub fn require_discogs_token(&self) -> Result<&str> {
        self.discogs_token.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "Discogs token not configured. Provide one of:\n\
                 1. Command line: --discogs-token <token>\n\
                 2. Environment: {}=<token>\n\
                 3. TOML config: discogs_token = \"<token>\"",
                DISCOGS_TOKEN_ENV
            ))
        })
    }
}

/// Resolve a single credential field
fn resolve_field(
    label: &str,
    cli_value: Option<&str>,
    env_var: &str,
    toml_value: Option<&str>,
) -> Option<String> {
    if let Some(value) = cli_value.filter(|v| is_valid_key(v)) {
        debug!("{} taken from command line", label);
        return Some(value.trim().to_string());
    }

    if let Ok(value) = std::env::var(env_var) {
        if is_valid_key(&value) {
            debug!("{} taken from environment variable {}", label, env_var);
            return Some(value.trim().to_string());
        }
    }

    if let Some(value) = toml_value.filter(|v| is_valid_key(v)) {
        debug!("{} taken from TOML config", label);
        return Some(value.trim().to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   \t"));
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.discogs_token.is_none());
        assert!(config.user_agent.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_logging_section_parsed() {
        let config = TomlConfig::from_toml_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let result = TomlConfig::from_toml_str("discogs_token = ");
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_spotify_secret_is_redacted_in_debug() {
        let creds = SpotifyCredentials {
            client_id: "id".to_string(),
            client_secret: "hunter2".to_string(),
        };
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_require_discogs_token_missing() {
        let creds = Credentials::default();
        assert!(matches!(creds.require_discogs_token(), Err(Error::Config(_))));
    }
}
