use serde::Serialize;

/// Inference parameters sent with every request for a model. These are
/// fixed per model and never taken from the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelPreset {
    pub num_inference_steps: u32,
    pub guidance_scale: f64,
    pub negative_prompt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub id: String,
    pub name: String,
    pub upstream_model: String,
    pub preset: ModelPreset,
}

impl ModelConfig {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        upstream_model: impl Into<String>,
        preset: ModelPreset,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            upstream_model: upstream_model.into(),
            preset,
        }
    }

    pub fn endpoint(&self, base_url: &str) -> String {
        format!(
            "{}/models/{}",
            base_url.trim_end_matches('/'),
            self.upstream_model
        )
    }
}

/// Ordered, read-only table of the models this proxy will call.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelConfig>,
}

impl ModelCatalog {
    pub fn new(models: Vec<ModelConfig>) -> Self {
        Self { models }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            // Turbo is distilled for few steps and no CFG.
            ModelConfig::new(
                "hf-z-image-turbo",
                "Z-Image Turbo",
                "Tongyi-MAI/Z-Image-Turbo",
                ModelPreset {
                    num_inference_steps: 9,
                    guidance_scale: 0.0,
                    negative_prompt: "blurry, low quality, distorted, bad text, watermark"
                        .to_string(),
                },
            ),
            ModelConfig::new(
                "hf-sdxl-base",
                "Stable Diffusion XL Base 1.0",
                "stabilityai/stable-diffusion-xl-base-1.0",
                ModelPreset {
                    num_inference_steps: 30,
                    guidance_scale: 7.5,
                    negative_prompt: "blurry, low quality, distorted, bad anatomy".to_string(),
                },
            ),
        ])
    }

    pub fn resolve(&self, model_id: &str) -> Option<&ModelConfig> {
        self.models.iter().find(|m| m.id == model_id)
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.resolve(model_id).is_some()
    }

    /// (id, display name, upstream model) for every entry, in table order.
    pub fn supported_models(&self) -> Vec<(&str, &str, &str)> {
        self.models
            .iter()
            .map(|m| (m.id.as_str(), m.name.as_str(), m.upstream_model.as_str()))
            .collect()
    }
}
