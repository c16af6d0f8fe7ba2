//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/roomfinder/config.toml` by default.
//!
//! The Graph access token supports secret references:
//! - `pass::path/in/store` resolved via `pass show`
//! - `env::VAR_NAME` resolved from the environment
//! - plain text used as-is

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use roomfinder_core::CandidateSet;
use roomfinder_engine::{BookingTemplate, ResolverConfig};
use roomfinder_providers::graph::GraphConfig;
use roomfinder_providers::{AccessToken, DEFAULT_BODY, DEFAULT_SUBJECT};

use crate::secret;

/// Timezone used to read dates and times when none is configured.
pub const DEFAULT_TIMEZONE: &str = "America/Toronto";

/// Configuration for the roomfinder client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// IANA timezone for `--date` and `--start`.
    pub timezone: String,

    /// Debug mode.
    pub debug: bool,

    pub graph: GraphSettings,

    pub rooms: RoomSettings,

    pub resolver: ResolverSettings,

    pub booking: BookingSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            debug: false,
            graph: GraphSettings::default(),
            rooms: RoomSettings::default(),
            resolver: ResolverSettings::default(),
            booking: BookingSettings::default(),
        }
    }
}

/// Microsoft Graph settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Bearer token (supports `pass::` and `env::` prefixes).
    pub access_token: Option<String>,

    /// API endpoint including the version segment.
    pub endpoint: String,

    /// Per-request timeout in seconds.
    pub timeout: u64,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            access_token: None,
            endpoint: roomfinder_providers::graph::DEFAULT_ENDPOINT.to_string(),
            timeout: roomfinder_providers::graph::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Candidate rooms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomSettings {
    /// Display names of the rooms `find` may pick.
    pub candidates: Vec<String>,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            candidates: vec![
                "First Room".to_string(),
                "Second Room".to_string(),
                "Third Room".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Seconds one availability check may take.
    pub check_timeout: u64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            check_timeout: roomfinder_engine::DEFAULT_CHECK_TIMEOUT.as_secs(),
        }
    }
}

/// Text of booking events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingSettings {
    pub subject: String,
    pub body: String,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
            body: DEFAULT_BODY.to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if the file
    /// does not exist.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("roomfinder")
    }

    pub fn timezone(&self) -> Result<Tz, String> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| format!("unknown timezone '{}'", self.timezone))
    }

    pub fn candidates(&self) -> CandidateSet {
        CandidateSet::new(self.rooms.candidates.iter().map(String::as_str))
    }

    pub fn graph_config(&self) -> GraphConfig {
        GraphConfig::new(self.graph.endpoint.clone())
            .with_timeout(Duration::from_secs(self.graph.timeout))
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::new().with_check_timeout(Duration::from_secs(self.resolver.check_timeout))
    }

    pub fn booking_template(&self) -> BookingTemplate {
        BookingTemplate::new()
            .with_subject(self.booking.subject.clone())
            .with_body(self.booking.body.clone())
    }

    /// Resolves the access token, preferring `override_token` over the
    /// configured one.
    pub fn access_token(&self, override_token: Option<&str>) -> Result<AccessToken, String> {
        let raw = match override_token.filter(|t| !t.trim().is_empty()) {
            Some(token) => token.to_string(),
            None => {
                let configured = self.graph.access_token.as_deref().ok_or_else(|| {
                    "no access token: set graph.access_token or pass --token".to_string()
                })?;
                secret::resolve(configured)?
            }
        };

        let token = AccessToken::new(raw.trim());
        if token.is_empty() {
            return Err("access token is empty".to_string());
        }
        Ok(token)
    }

    /// Checks everything that can be checked without a network call.
    pub fn validate(&self) -> Result<(), String> {
        self.timezone()?;
        self.graph_config()
            .validate()
            .map_err(|e| format!("graph: {}", e))?;

        if self.rooms.candidates.is_empty() {
            return Err("rooms.candidates must not be empty".to_string());
        }
        if self.rooms.candidates.iter().any(|c| c.trim().is_empty()) {
            return Err("rooms.candidates must not contain empty names".to_string());
        }
        if self.resolver.check_timeout == 0 {
            return Err("resolver.check_timeout must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Returns a copy safe to print: a plain-text token is masked.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if let Some(token) = config.graph.access_token.as_mut() {
            if !secret::is_reference(token) {
                *token = "***".to_string();
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timezone().unwrap(), chrono_tz::America::Toronto);
        assert_eq!(config.graph.timeout, 10);
        assert_eq!(config.resolver.check_timeout, 8);
        assert_eq!(config.candidates().len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
timezone = "Europe/Paris"

[graph]
access_token = "plain-token"
endpoint = "http://localhost:8080/v1.0"
timeout = 3

[rooms]
candidates = ["Salle A", "Salle B"]

[booking]
subject = "Reserved"
"#
        )
        .unwrap();

        let config = ClientConfig::load_from(file.path()).unwrap();
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::Paris);
        assert_eq!(config.graph_config().timeout, Duration::from_secs(3));
        assert_eq!(config.graph_config().base_url(), "http://localhost:8080/v1.0");
        assert!(config.candidates().contains("Salle B"));
        assert_eq!(config.booking_template().subject, "Reserved");
        assert_eq!(config.booking_template().body, DEFAULT_BODY);
        assert_eq!(config.resolver_config().check_timeout, Duration::from_secs(8));
        assert_eq!(config.access_token(None).unwrap().secret(), "plain-token");
    }

    #[test]
    fn load_from_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.contains("failed to read config"));
    }

    #[test]
    fn invalid_toml_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[rooms]\ncandidates = \"not a list\"\n").unwrap();
        let err = ClientConfig::load_from(file.path()).unwrap_err();
        assert!(err.contains("failed to parse config"));
    }

    #[test]
    fn zero_check_timeout_is_caught() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[resolver]\ncheck_timeout = 0\n").unwrap();

        let config = ClientConfig::load_from(file.path()).unwrap();
        assert!(config.validate().unwrap_err().contains("check_timeout"));
        assert_eq!(
            config.resolver_config().check_timeout,
            roomfinder_engine::DEFAULT_CHECK_TIMEOUT
        );
    }

    #[test]
    fn token_override_wins() {
        let mut config = ClientConfig::default();
        config.graph.access_token = Some("configured".to_string());
        assert_eq!(
            config.access_token(Some("from-cli")).unwrap().secret(),
            "from-cli"
        );
        assert_eq!(config.access_token(Some("  ")).unwrap().secret(), "configured");
    }

    #[test]
    fn token_from_env_reference() {
        unsafe {
            std::env::set_var("_ROOMFINDER_CONFIG_TEST_TOKEN", "env-token");
        }
        let config: ClientConfig = toml::from_str(
            "[graph]\naccess_token = \"env::_ROOMFINDER_CONFIG_TEST_TOKEN\"\n",
        )
        .unwrap();
        assert_eq!(config.access_token(None).unwrap().secret(), "env-token");
        assert_eq!(
            config.redacted().graph.access_token.as_deref(),
            Some("env::_ROOMFINDER_CONFIG_TEST_TOKEN")
        );
        unsafe {
            std::env::remove_var("_ROOMFINDER_CONFIG_TEST_TOKEN");
        }
    }

    #[test]
    fn missing_token_errors() {
        let config = ClientConfig::default();
        assert!(config.access_token(None).unwrap_err().contains("no access token"));
    }

    #[test]
    fn plain_token_is_redacted() {
        let mut config = ClientConfig::default();
        config.graph.access_token = Some("eyJ0eXAi".to_string());
        assert_eq!(config.redacted().graph.access_token.as_deref(), Some("***"));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = ClientConfig::default();
        config.timezone = "Mars/Olympus".to_string();
        assert!(config.validate().unwrap_err().contains("unknown timezone"));

        let mut config = ClientConfig::default();
        config.rooms.candidates.clear();
        assert!(config.validate().unwrap_err().contains("candidates"));

        let mut config = ClientConfig::default();
        config.graph.endpoint = "graph.microsoft.com".to_string();
        assert!(config.validate().unwrap_err().starts_with("graph:"));

        let mut config = ClientConfig::default();
        config.graph.timeout = 0;
        assert!(config.validate().unwrap_err().contains("timeout"));

        let mut config = ClientConfig::default();
        config.resolver.check_timeout = 0;
        assert!(config.validate().unwrap_err().contains("check_timeout"));
    }
}
