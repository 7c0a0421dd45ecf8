use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::huggingface::ModelPreset;

/// Declared MIME type of every returned image. Upstream's own content type
/// is not consulted.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageGenerationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, rename = "modelId")]
    pub model_id: Option<String>,
}

impl ImageGenerationRequest {
    /// Parses an inbound body. Anything that is not a JSON object with
    /// string fields yields an empty request so validation reports the
    /// missing fields.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.is_empty())
    }

    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref().filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct ImageGenerationResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String, // data: URI
}

impl ImageGenerationResponse {
    pub fn from_image_bytes(bytes: &[u8]) -> Self {
        Self {
            image_url: to_data_url(bytes, IMAGE_MIME_TYPE),
        }
    }
}

/// Payload sent to the inference endpoint.
#[derive(Debug, Serialize)]
pub struct InferenceRequest<'a> {
    pub inputs: &'a str,
    pub parameters: &'a ModelPreset,
}

/// Error envelope returned by the inference API on failure. `error` is
/// usually a string but is kept loose.
#[derive(Debug, Default, Deserialize)]
pub struct UpstreamErrorBody {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl UpstreamErrorBody {
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub fn message(&self) -> Option<String> {
        match self.error.as_ref()? {
            serde_json::Value::Null | serde_json::Value::Bool(false) => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

pub fn to_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
