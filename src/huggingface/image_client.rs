use crate::{
    error::{ProxyError, Result},
    huggingface::ModelConfig,
    models::{InferenceRequest, UpstreamErrorBody},
};
use async_trait::async_trait;
use reqwest::{header, Client};

pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Runs one text-to-image job and returns the raw image bytes.
    async fn generate(&self, model: &ModelConfig, prompt: &str, api_key: &str) -> Result<Vec<u8>>;
}

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    base_url: String,
}

impl ImageClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate(&self, model: &ModelConfig, prompt: &str, api_key: &str) -> Result<Vec<u8>> {
        let url = model.endpoint(&self.base_url);
        let payload = InferenceRequest {
            inputs: prompt,
            parameters: &model.preset,
        };

        log::info!("Generating image with model: {} ({})", model.id, model.upstream_model);
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProxyError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let err = ProxyError::upstream(status.as_u16(), UpstreamErrorBody::from_body(&body).message());
            log::error!("Hugging Face API error for {}: {}", model.id, err);
            return Err(err);
        }

        let image = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Response(e.to_string()))?;

        log::debug!("Received {} image bytes from {}", image.len(), model.upstream_model);

        Ok(image.to_vec())
    }
}
