//! HTTP proxy that forwards image-generation prompts to the Hugging Face
//! Inference API and returns the generated image as a `data:` URL.

pub mod config;
pub mod error;
pub mod huggingface;
pub mod logger;
pub mod models;
pub mod server;

pub use config::{Config, HuggingFaceConfig};
pub use error::{ProxyError, Result};
pub use huggingface::{ImageClient, ImageGenerator, ModelCatalog, ModelConfig, ModelPreset};
pub use models::{ImageGenerationRequest, ImageGenerationResponse};
pub use server::AppState;
