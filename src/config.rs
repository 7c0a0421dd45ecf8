use std::env;

use crate::huggingface::DEFAULT_INFERENCE_URL;
use crate::logger::{LogLevel, LoggerConfig};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;

#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub api_key: Option<String>,
    pub inference_url: String,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        HuggingFaceConfig {
            api_key: None,
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
        }
    }
}

impl HuggingFaceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("HUGGINGFACE_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());
        let inference_url = env::var("HF_INFERENCE_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string());

        HuggingFaceConfig {
            api_key,
            inference_url,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_inference_url(mut self, url: impl Into<String>) -> Self {
        self.inference_url = url.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().map_or(false, |key| !key.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub huggingface: HuggingFaceConfig,
    /// When set, requests without a `modelId` use this model.
    pub default_model: Option<String>,
    /// Largest inbound body that is buffered before answering 413.
    pub max_body_bytes: usize,
    pub log_level: LogLevel,
    pub log_json: bool,
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            huggingface: HuggingFaceConfig::default(),
            default_model: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_level: LogLevel::Info,
            log_json: false,
            log_file: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let default_model = env::var("DEFAULT_IMAGE_MODEL")
            .ok()
            .filter(|model| !model.is_empty());
        let log_level = env::var("LOG_LEVEL")
            .ok()
            .and_then(|level| LogLevel::parse(&level))
            .unwrap_or(LogLevel::Info);
        let max_body_bytes = env::var("MAX_BODY_BYTES")
            .ok()
            .and_then(|bytes| bytes.parse().ok())
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);
        let log_json = env::var("LOG_JSON").ok().map_or(false, |val| val == "true");
        let log_file = env::var("LOG_FILE").ok().filter(|path| !path.is_empty());

        Config {
            host,
            port,
            huggingface: HuggingFaceConfig::from_env(),
            default_model,
            max_body_bytes,
            log_level,
            log_json,
            log_file,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_huggingface(mut self, config: HuggingFaceConfig) -> Self {
        self.huggingface = config;
        self
    }

    pub fn with_default_model(mut self, model_id: impl Into<String>) -> Self {
        self.default_model = Some(model_id.into());
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.huggingface.api_key.as_deref().filter(|key| !key.is_empty())
    }

    pub fn logger_config(&self) -> LoggerConfig {
        let base = if self.log_json {
            LoggerConfig::production()
        } else {
            LoggerConfig::development()
        };
        let base = base.with_level(self.log_level);
        match &self.log_file {
            Some(path) => base.with_file_output(path),
            None => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new();
        assert_eq!(config.port, 8080);
        assert_eq!(config.huggingface.inference_url, DEFAULT_INFERENCE_URL);
        assert!(config.api_key().is_none());
        assert!(config.default_model.is_none());
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert!(!config.logger_config().log_to_file);
    }

    #[test]
    fn builders() {
        let config = Config::new()
            .with_port(3000)
            .with_host("127.0.0.1")
            .with_default_model("hf-sdxl-base")
            .with_huggingface(
                HuggingFaceConfig::new()
                    .with_api_key("hf_test")
                    .with_inference_url("http://localhost:9999"),
            );
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.api_key(), Some("hf_test"));
        assert_eq!(config.default_model.as_deref(), Some("hf-sdxl-base"));
        assert_eq!(config.huggingface.inference_url, "http://localhost:9999");
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let config = Config::new().with_huggingface(HuggingFaceConfig::new().with_api_key(""));
        assert!(config.api_key().is_none());
        assert!(!config.huggingface.has_api_key());
    }

    #[test]
    fn json_logging_uses_production_preset() {
        let mut config = Config::new();
        config.log_json = true;
        config.log_level = LogLevel::Warn;
        let logger = config.logger_config();
        assert!(logger.output_json);
        assert_eq!(logger.min_level, LogLevel::Warn);
    }

    #[test]
    fn log_file_enables_file_output() {
        let mut config = Config::new().with_max_body_bytes(4096);
        config.log_file = Some("/tmp/rgen-image-proxy-test.log".to_string());
        let logger = config.logger_config();
        assert!(logger.log_to_file);
        assert_eq!(logger.log_file_path, "/tmp/rgen-image-proxy-test.log");
        assert_eq!(config.max_body_bytes, 4096);
    }
}
