use serde::{Deserialize, Serialize};

use crate::config::CorrectorConfig;
use crate::error::{CorrectorError, Result};

#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Decoded reply of the generate endpoint. Extra fields are ignored.
#[derive(Debug, Deserialize)]
pub struct ModelResponse {
    pub response: Option<String>,
}

impl OllamaClient {
    pub fn new(config: &CorrectorConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    // generate - one non-streaming completion; None when the reply has no text
    pub async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CorrectorError::Status { status, body });
        }

        let body = response.text().await?;
        let decoded: ModelResponse = serde_json::from_str(&body)?;
        Ok(decoded.response)
    }
}
