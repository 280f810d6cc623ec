//! Tracker configuration.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The values parse but are unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Deployment settings: where to listen, where the documents live and who
/// may log runs.
///
/// # Example Configuration File
///
/// ```toml
/// bind = "0.0.0.0:5002"
/// data_dir = "/var/lib/family-run"
/// runs_file = "data.json"
/// feedback_file = "feedback.json"
/// members = ["Gabor", "Petia", "David"]
/// ```
///
/// Every key is optional; missing keys take the defaults shown above
/// (`data_dir` defaults to the working directory).
///
/// # Examples
///
/// ```
/// use family_run::TrackerConfig;
///
/// let config = TrackerConfig::from_toml(r#"members = ["Anna", "Ben"]"#).unwrap();
/// assert_eq!(config.members, ["Anna", "Ben"]);
/// assert_eq!(config.bind.port(), 5002);
/// assert!(config.runs_path().ends_with("data.json"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Address the HTTP server listens on.
    pub bind: SocketAddr,

    /// Directory holding both documents.
    pub data_dir: PathBuf,

    /// Run document file name, relative to `data_dir`.
    pub runs_file: PathBuf,

    /// Feedback document file name, relative to `data_dir`.
    pub feedback_file: PathBuf,

    /// Family members allowed to log runs, in display order.
    pub members: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5002)),
            data_dir: PathBuf::from("."),
            runs_file: PathBuf::from("data.json"),
            feedback_file: PathBuf::from("feedback.json"),
            members: vec!["Gabor".to_string(), "Petia".to_string(), "David".to_string()],
        }
    }
}

impl TrackerConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks that the member list is non-empty, without blanks or
    /// duplicates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.members.is_empty() {
            return Err(ConfigError::Invalid("at least one member is required".to_string()));
        }

        let mut seen = HashSet::new();
        for member in &self.members {
            if member.trim().is_empty() {
                return Err(ConfigError::Invalid("member names must not be blank".to_string()));
            }
            if !seen.insert(member.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate member '{member}'")));
            }
        }

        Ok(())
    }

    /// Full path of the run document.
    pub fn runs_path(&self) -> PathBuf {
        self.data_dir.join(&self.runs_file)
    }

    /// Full path of the feedback document.
    pub fn feedback_path(&self) -> PathBuf {
        self.data_dir.join(&self.feedback_file)
    }
}
