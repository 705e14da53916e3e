//! NER Stand Configuration Management
//!
//! Handles configuration from environment variables and TOML files
//! with defaults suitable for a locally running NER service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{Framework, DEFAULT_MODEL_NAME};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Prediction service connection
    pub service: ServiceConfig,

    /// Form defaults and presentation
    pub ui: UiConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_override()
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables. Every variable that is set wins,
    /// even when it repeats the built-in default.
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        // Service
        if let Ok(url) = std::env::var("NER_SERVICE_URL") {
            self.service.base_url = url;
        }
        if let Ok(path) = std::env::var("NER_PREDICT_PATH") {
            self.service.predict_path = path;
        }
        if let Ok(schema) = std::env::var("NER_PAYLOAD_SCHEMA") {
            self.service.payload_schema = schema.parse()?;
        }

        // Form defaults
        if let Ok(locale) = std::env::var("NER_LOCALE") {
            self.ui.locale = locale.parse()?;
        }
        if let Ok(framework) = std::env::var("NER_DEFAULT_FRAMEWORK") {
            self.ui.default_framework =
                framework.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "NER_DEFAULT_FRAMEWORK".to_string(),
                    value: framework,
                })?;
        }
        if let Ok(model) = std::env::var("NER_DEFAULT_MODEL") {
            self.ui.default_model = model;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(json) = std::env::var("LOG_JSON") {
            self.logging.json_format = parse_bool("LOG_JSON", &json)?;
        }

        Ok(self)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Prediction service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the NER service
    pub base_url: String,

    /// Path of the prediction endpoint, appended to the base URL
    pub predict_path: String,

    /// Shape of the request body
    pub payload_schema: PayloadSchema,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            predict_path: "/predict".to_string(),
            payload_schema: PayloadSchema::WithFramework,
        }
    }
}

impl ServiceConfig {
    /// Create a config pointing at the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set payload schema
    pub fn with_payload_schema(mut self, schema: PayloadSchema) -> Self {
        self.payload_schema = schema;
        self
    }

    /// Check that the base URL is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingRequired("service.base_url".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "service.base_url".to_string(),
                value: self.base_url.clone(),
            });
        }
        Ok(())
    }

    /// Base URL without trailing slash
    pub fn base(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Full URL of the prediction endpoint
    pub fn predict_url(&self) -> String {
        let path = self.predict_path.trim();
        if path.starts_with('/') {
            format!("{}{}", self.base(), path)
        } else {
            format!("{}/{}", self.base(), path)
        }
    }
}

/// Request body shapes accepted by deployed services
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadSchema {
    /// `{ "text", "framework", "model_name" }`
    #[default]
    WithFramework,
    /// `{ "text", "model_name" }`
    ModelOnly,
}

impl PayloadSchema {
    /// Whether the framework field is sent
    pub fn includes_framework(&self) -> bool {
        matches!(self, Self::WithFramework)
    }
}

impl std::str::FromStr for PayloadSchema {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "with_framework" => Ok(Self::WithFramework),
            "model_only" => Ok(Self::ModelOnly),
            _ => Err(ConfigError::InvalidValue {
                key: "NER_PAYLOAD_SCHEMA".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Language of user-facing labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl std::str::FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            _ => Err(ConfigError::InvalidValue {
                key: "NER_LOCALE".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Form defaults and presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Label language
    pub locale: Locale,

    /// Framework preselected in a fresh session
    pub default_framework: Framework,

    /// Model name preselected in a fresh session
    pub default_model: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            default_framework: Framework::default(),
            default_model: DEFAULT_MODEL_NAME.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
