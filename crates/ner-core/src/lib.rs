//! NER Core - Domain models, traits, and shared types
//!
//! This crate defines the abstractions shared by the NER Stand client:
//! - Form input and request payload models
//! - Entities returned by the prediction service
//! - Request lifecycle status
//! - Error taxonomy for the prediction client
//! - The `PredictionClient` trait implemented by network backends
//! - Configuration management and the advisory model catalog

pub mod catalog;
pub mod config;

pub use catalog::{is_suggested, suggested_models};
pub use config::{
    AppConfig, ConfigError, Locale, LoggingConfig, PayloadSchema, ServiceConfig, UiConfig,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Failure of a single prediction request.
///
/// The variants carry diagnostic detail for logging. None of it is meant
/// to reach the user: every variant collapses to one fixed message at the
/// presentation boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Connection or transport failure before a response was received
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-2xx status
    #[error("Server error: status {status}: {body}")]
    Server { status: u16, body: String },

    /// 2xx response whose body is missing or has an invalid `entities` field
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    /// Kind of this error, without the diagnostic payload
    pub fn kind(&self) -> ClientErrorKind {
        match self {
            Self::Network(_) => ClientErrorKind::Network,
            Self::Server { .. } => ClientErrorKind::Server,
            Self::MalformedResponse(_) => ClientErrorKind::MalformedResponse,
        }
    }
}

/// Discriminant of [`ClientError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientErrorKind {
    Network,
    Server,
    MalformedResponse,
}

impl std::fmt::Display for ClientErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Server => write!(f, "server"),
            Self::MalformedResponse => write!(f, "malformed_response"),
        }
    }
}

/// Core error type for NER Stand operations
#[derive(Error, Debug)]
pub enum NerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Prediction request failed: {0}")]
    Client(#[from] ClientError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, NerError>;

/// Result of a prediction client call
pub type ClientResult<T> = std::result::Result<T, ClientError>;

// ============================================================================
// Form Models
// ============================================================================

/// NER backend family selected by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    #[default]
    Spacy,
    Hf,
    Flair,
}

impl Framework {
    /// All known frameworks, in selector order
    pub const ALL: [Framework; 3] = [Framework::Spacy, Framework::Hf, Framework::Flair];

    /// Wire representation sent to the service
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spacy => "spacy",
            Self::Hf => "hf",
            Self::Flair => "flair",
        }
    }

    /// Human-readable name for selectors
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Spacy => "spaCy",
            Self::Hf => "HuggingFace",
            Self::Flair => "Flair",
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Framework {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spacy" => Ok(Self::Spacy),
            "hf" => Ok(Self::Hf),
            "flair" => Ok(Self::Flair),
            _ => Err(ConfigError::InvalidValue {
                key: "framework".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Default model name preselected in the form
pub const DEFAULT_MODEL_NAME: &str = "ru_core_news_sm";

/// Current values of the input form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    /// Free text to analyze
    pub text: String,

    /// Selected framework
    pub framework: Framework,

    /// Model name; free text, conventionally one of the catalog suggestions
    pub model_name: String,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            text: String::new(),
            framework: Framework::default(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
        }
    }
}

impl FormInput {
    /// Create a form with the given text and default selections
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set framework
    pub fn with_framework(mut self, framework: Framework) -> Self {
        self.framework = framework;
        self
    }

    /// Set model name
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Apply a single field edit
    pub fn apply(&mut self, field: FormField) {
        match field {
            FormField::Text(text) => self.text = text,
            FormField::Framework(framework) => self.framework = framework,
            FormField::ModelName(model_name) => self.model_name = model_name,
        }
    }
}

/// A single edit of one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Text(String),
    Framework(Framework),
    ModelName(String),
}

/// Snapshot of the form taken at submit time.
///
/// Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPayload {
    pub text: String,
    pub framework: String,
    pub model_name: String,
}

// ============================================================================
// Prediction Results
// ============================================================================

/// A labeled text span returned by the NER service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity label (e.g. `LOC`, `PER`)
    #[serde(rename = "entity")]
    pub entity_type: String,

    /// Surface form as it appears in the text
    pub text: String,

    /// Start character offset
    pub start_offset: usize,

    /// End character offset
    pub end_offset: usize,
}

impl Entity {
    pub fn new(
        entity_type: impl Into<String>,
        text: impl Into<String>,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            text: text.into(),
            start_offset,
            end_offset,
        }
    }
}

/// Lifecycle of the current prediction request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// A request is in flight
    Pending,
    /// The last request returned entities
    Succeeded,
    /// The last request failed
    Failed,
}

impl RequestStatus {
    /// Whether a request is currently in flight
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pending => write!(f, "pending"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Trait for prediction backends
#[async_trait::async_trait]
pub trait PredictionClient: Send + Sync {
    /// Send one prediction request and decode the returned entities
    async fn submit(&self, payload: &RequestPayload) -> ClientResult<Vec<Entity>>;

    /// Endpoint description for logging
    fn endpoint(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================
