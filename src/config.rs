//! # Configuration Management
//!
//! Settings for the responder: listening port, the status document shown
//! in server browsers, the kick message, and logging options.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()` (default `signpost.toml`)
//! - Direct instantiation with defaults
//!
//! Settings are loaded once at startup and frozen into a [`Snapshot`],
//! the only view the protocol core ever reads. The snapshot carries the
//! status and kick payloads pre-serialized, so no connection ever pays
//! for JSON encoding.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::Level;

use crate::error::{ProtocolError, Result};
use crate::protocol::chat::Chat;
use crate::protocol::status::StatusResponse;
use crate::utils::timeout;

/// Default listening port for the emulated protocol.
pub const DEFAULT_PORT: u16 = 25565;

/// Main configuration structure containing all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Server-specific configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Status document template shown in server browsers
    #[serde(default)]
    pub status: StatusResponse,

    /// Message shown to anyone attempting to log in
    #[serde(default = "default_kick")]
    pub kick: Chat,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_kick() -> Chat {
    Chat::from("The server is not online right now...")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            status: StatusResponse::default(),
            kick: default_kick(),
            logging: LoggingConfig::default(),
        }
    }
}

/// What happened while loading the configuration file.
///
/// Returned alongside the settings so the caller can report it once the
/// logging subscriber is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Configuration file read successfully.
    Loaded,
    /// File missing; defaults written to disk and used.
    CreatedDefault,
    /// File missing and the default could not be saved; defaults used.
    CreateFailed(String),
    /// File present but unusable; defaults used, file left untouched.
    Invalid(String),
}

impl Settings {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ProtocolError::ConfigError(format!("failed to read config file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("failed to parse TOML: {e}")))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("failed to write config file: {e}")))?;
        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# failed to generate example config"))
    }

    /// Loads from `path`, falling back to defaults when the file is
    /// missing or unusable.
    ///
    /// A missing file is replaced with a freshly written default one; a
    /// broken file is left in place for the operator to inspect.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, LoadStatus) {
        if !path.as_ref().exists() {
            let settings = Self::default();
            let status = match settings.save_to_file(&path) {
                Ok(()) => LoadStatus::CreatedDefault,
                Err(e) => LoadStatus::CreateFailed(e.to_string()),
            };
            return (settings, status);
        }
        match Self::from_file(&path) {
            Ok(settings) => (settings, LoadStatus::Loaded),
            Err(e) => (Self::default(), LoadStatus::Invalid(e.to_string())),
        }
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.server.validate());

        if self.status.players.max < 0 {
            errors.push(format!(
                "maximum player count cannot be negative: {}",
                self.status.players.max
            ));
        }
        if self.status.players.online < 0 {
            errors.push(format!(
                "online player count cannot be negative: {}",
                self.status.players.online
            ));
        }
        if self.kick.text.is_empty() && self.kick.extra.is_empty() {
            errors.push("kick message is empty".to_string());
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }

    /// Serializes the status document to the JSON payload sent on the wire.
    pub fn status_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.status)?)
    }

    /// Serializes the kick message to the JSON payload sent on the wire.
    pub fn kick_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.kick)?)
    }

    /// Freezes these settings into the read-only view the core consumes.
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            port: self.server.port,
            shutdown_timeout: self.server.shutdown_timeout,
            status_payload: self.status_payload()?,
            kick_payload: self.kick_payload()?,
        })
    }
}

/// Server-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// TCP port to listen on
    pub port: u16,

    /// Timeout for graceful server shutdown
    #[serde(with = "duration_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            shutdown_timeout: timeout::SHUTDOWN_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Validate server configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("server port cannot be 0".to_string());
        }

        if self.shutdown_timeout.as_secs() < 1 {
            errors.push("shutdown timeout too short (minimum: 1s)".to_string());
        } else if self.shutdown_timeout.as_secs() > 60 {
            errors.push("shutdown timeout too long (maximum: 60s)".to_string());
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

/// Read-only settings view shared by every connection handler.
///
/// Payloads are serialized once here; the dispatcher only measures their
/// byte length for framing. Live reload, if ever wanted, means atomically
/// replacing the whole snapshot, never mutating it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    port: u16,
    shutdown_timeout: Duration,
    status_payload: String,
    kick_payload: String,
}

impl Snapshot {
    /// Builds a snapshot from pre-serialized payloads.
    pub fn new(port: u16, status_payload: String, kick_payload: String) -> Self {
        Self {
            port,
            shutdown_timeout: timeout::SHUTDOWN_TIMEOUT,
            status_payload,
            kick_payload,
        }
    }

    /// Overrides how long shutdown waits for in-flight connections.
    pub fn with_shutdown_timeout(mut self, limit: Duration) -> Self {
        self.shutdown_timeout = limit;
        self
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    pub fn status_payload(&self) -> &str {
        &self.status_payload
    }

    pub fn kick_payload(&self) -> &str {
        &self.kick_payload
    }
}

/// Helper module for Duration serialization/deserialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("invalid log level: {level_str}")))
    }
}
