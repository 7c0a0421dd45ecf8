pub mod catalog;
pub mod image_client;

pub use catalog::{ModelCatalog, ModelConfig, ModelPreset};
pub use image_client::{ImageClient, ImageGenerator, DEFAULT_INFERENCE_URL};
