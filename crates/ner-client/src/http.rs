//! reqwest-backed prediction client
//!
//! No retries and no request timeout: a call runs until the service
//! answers or the transport fails.

use async_trait::async_trait;
use ner_core::{
    ClientError, ClientResult, Entity, PayloadSchema, PredictionClient, RequestPayload, Result,
    ServiceConfig,
};
use reqwest::Client;

use crate::wire::{decode_entities, decode_health, PredictRequest};

/// HTTP client for the NER service
pub struct HttpPredictionClient {
    client: Client,
    base_url: String,
    predict_url: String,
    schema: PayloadSchema,
}

impl HttpPredictionClient {
    /// Create a client for `base_url` using the default endpoint path
    pub fn new(base_url: impl Into<String>, schema: PayloadSchema) -> Result<Self> {
        let config = ServiceConfig::new(base_url).with_payload_schema(schema);
        Self::from_config(&config)
    }

    /// Create from config
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            client: Client::new(),
            base_url: config.base().to_string(),
            predict_url: config.predict_url(),
            schema: config.payload_schema,
        })
    }

    /// Configured request body shape
    pub fn schema(&self) -> PayloadSchema {
        self.schema
    }

    /// Liveness probe against `GET /`
    pub async fn health(&self) -> ClientResult<String> {
        let url = format!("{}/", self.base_url);
        tracing::debug!(%url, "checking service liveness");

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!(%url, error = %e, "health request failed");
            ClientError::Network(e.to_string())
        })?;

        let body = read_success_body(response).await?;
        decode_health(&body).inspect_err(|e| {
            tracing::error!(%url, error = %e, "unexpected health response");
        })
    }

    async fn post_payload(&self, payload: &RequestPayload) -> ClientResult<Vec<Entity>> {
        let request = PredictRequest::from_payload(payload, self.schema);

        let response = self
            .client
            .post(&self.predict_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let body = read_success_body(response).await?;
        decode_entities(&body)
    }
}

/// Read the body of a 2xx response, mapping other statuses to `Server`
async fn read_success_body(response: reqwest::Response) -> ClientResult<String> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Server {
            status: status.as_u16(),
            body,
        });
    }

    response
        .text()
        .await
        .map_err(|e| ClientError::Network(format!("Failed to read response body: {e}")))
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn submit(&self, payload: &RequestPayload) -> ClientResult<Vec<Entity>> {
        tracing::debug!(
            url = %self.predict_url,
            framework = %payload.framework,
            model = %payload.model_name,
            text_chars = payload.text.chars().count(),
            "sending prediction request"
        );

        match self.post_payload(payload).await {
            Ok(entities) => {
                tracing::debug!(count = entities.len(), "prediction response decoded");
                Ok(entities)
            }
            Err(e) => {
                tracing::error!(
                    url = %self.predict_url,
                    kind = %e.kind(),
                    error = %e,
                    "prediction request failed"
                );
                Err(e)
            }
        }
    }

    fn endpoint(&self) -> &str {
        &self.predict_url
    }
}
