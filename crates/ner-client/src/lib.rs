//! NER Client - Prediction service access
//!
//! Sends form snapshots to the remote NER service over HTTP and decodes
//! the returned entity list. Transport failures, non-2xx answers and
//! malformed bodies are reported as distinct [`ner_core::ClientError`]
//! variants; callers decide how much of that reaches the user.

pub mod http;
pub mod wire;

pub use http::HttpPredictionClient;
pub use wire::{decode_entities, decode_health, PredictRequest};
