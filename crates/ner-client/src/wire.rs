//! Wire formats of the prediction service

use ner_core::{ClientError, ClientResult, Entity, PayloadSchema, RequestPayload};
use serde::{Deserialize, Serialize};

/// JSON body of `POST /predict`
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PredictRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<&'a str>,
    pub model_name: &'a str,
}

impl<'a> PredictRequest<'a> {
    /// Shape a payload according to the configured schema
    pub fn from_payload(payload: &'a RequestPayload, schema: PayloadSchema) -> Self {
        Self {
            text: &payload.text,
            framework: schema
                .includes_framework()
                .then_some(payload.framework.as_str()),
            model_name: &payload.model_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    entities: Vec<Entity>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    message: String,
}

/// Decode a successful prediction body into entities, preserving order
pub fn decode_entities(body: &str) -> ClientResult<Vec<Entity>> {
    serde_json::from_str::<PredictResponse>(body)
        .map(|response| response.entities)
        .map_err(|e| ClientError::MalformedResponse(e.to_string()))
}

/// Decode the liveness message returned by `GET /`
pub fn decode_health(body: &str) -> ClientResult<String> {
    serde_json::from_str::<HealthResponse>(body)
        .map(|response| response.message)
        .map_err(|e| ClientError::MalformedResponse(e.to_string()))
}
