//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file, then a few environment
//! variables override deployment-specific values:
//!
//! | Variable | Field |
//! |---|---|
//! | `INVOICE_BIND` | `server.bind` |
//! | `INVOICE_DATABASE_URL` | `database.url` |
//! | `INVOICE_WKHTMLTOPDF` | `pdf.wkhtmltopdf_path` |

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_BIND: &str = "INVOICE_BIND";
pub const ENV_DATABASE_URL: &str = "INVOICE_DATABASE_URL";
pub const ENV_WKHTMLTOPDF: &str = "INVOICE_WKHTMLTOPDF";

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, `host:port`
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Invoice database settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL; the file is created if missing
    pub url: String,

    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://invoices.db".to_string(),
            max_connections: 5,
        }
    }
}

/// PDF converter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Path to the `wkhtmltopdf` executable (looked up in `PATH` if bare)
    pub wkhtmltopdf_path: String,

    /// Conversions allowed to run at the same time
    pub max_concurrent: usize,

    /// Seconds before a conversion is abandoned
    pub timeout_secs: u64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            wkhtmltopdf_path: "wkhtmltopdf".to_string(),
            max_concurrent: 4,
            timeout_secs: 30,
        }
    }
}

impl PdfConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Template settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Directory overriding the built-in templates
    pub dir: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pdf: PdfConfig,
    pub templates: TemplatesConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError {
                file: Some(path.to_string()),
                message,
            },
            other => other,
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document means "all defaults"
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// File (if any), then environment overrides, then validation
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override fields from a variable lookup (normally the process environment)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup(ENV_BIND) {
            self.server.bind = bind;
        }
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database.url = url;
        }
        if let Some(path) = lookup(ENV_WKHTMLTOPDF) {
            self.pdf.wkhtmltopdf_path = path;
        }
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, value: String, message: &str| ConfigError::InvalidValue {
            field: field.to_string(),
            value,
            message: message.to_string(),
        };

        if self.server.bind.trim().is_empty() {
            return Err(invalid("server.bind", self.server.bind.clone(), "must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(invalid("database.max_connections", "0".to_string(), "must be at least 1"));
        }
        if self.pdf.wkhtmltopdf_path.trim().is_empty() {
            return Err(invalid(
                "pdf.wkhtmltopdf_path",
                self.pdf.wkhtmltopdf_path.clone(),
                "must not be empty",
            ));
        }
        if self.pdf.max_concurrent == 0 {
            return Err(invalid("pdf.max_concurrent", "0".to_string(), "must be at least 1"));
        }
        if self.pdf.timeout_secs == 0 {
            return Err(invalid("pdf.timeout_secs", "0".to_string(), "must be at least 1"));
        }
        Ok(())
    }
}
