//! Backend seam for the two remote calls.
//!
//! `TriageBackend` is the trait the session drives; `HttpBackend` is the
//! reqwest implementation that talks to a gateway (or directly to the
//! backend services) and translates transport and status failures into the
//! crate's error taxonomy.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::error::{Result, TriageError};
use crate::models::{ExtractRequest, ExtractResponse, PredictRequest, PredictResponse};

#[async_trait]
pub trait TriageBackend: Send + Sync {
    async fn extract(&self, request: &ExtractRequest) -> Result<ExtractResponse>;
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse>;
}

/// Error envelope the backend uses on non-success responses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    detail: Option<String>,
}

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// `base_url` is the prefix the endpoint paths are appended to, e.g.
    /// `http://localhost:3000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("request to {} never completed: {}", url, e);
                TriageError::Connectivity(e)
            })?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(TriageError::Connectivity)?;

        if !status.is_success() {
            error!("backend error [{}]: {} {}", endpoint, status, raw);
            let detail = serde_json::from_str::<ErrorEnvelope>(&raw)
                .ok()
                .and_then(|envelope| envelope.detail);
            return Err(TriageError::application(status.as_u16(), detail));
        }

        serde_json::from_str(&raw).map_err(|e| TriageError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl TriageBackend for HttpBackend {
    async fn extract(&self, request: &ExtractRequest) -> Result<ExtractResponse> {
        self.post_json("/extract", request).await
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse> {
        self.post_json("/predict", request).await
    }
}
