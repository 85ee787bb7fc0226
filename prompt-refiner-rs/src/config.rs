// prompt-refiner-rs/src/config.rs
//
// Runtime configuration for the prompt refiner
//
// Configuration (.env file):
// - OPENAI_API_KEY: API key for the completion service (required)
// - REFINER_COMPLETION_URL: Completion endpoint (defaults to OpenAI legacy completions)
// - REFINER_MODEL: Model to use (default: "gpt-3.5-turbo-instruct")
// - REFINER_TEMPERATURE / REFINER_TOP_P: Sampling parameters (defaults: 0.7 / 1.0)
// - REFINER_MAX_TOKENS: Response length cap (default: 150)
// - REFINER_FREQUENCY_PENALTY / REFINER_PRESENCE_PENALTY: (defaults: 0.0)
// - REFINER_REQUEST_TIMEOUT_SECS: Optional client timeout (unset = no timeout)

use std::fmt;
use std::time::Duration;

use config_rs::{get_env_or, get_optional_env, require_env, ConfigError};

pub const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-instruct";

/// Sampling parameters sent with every completion request
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 150,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

impl SamplingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            temperature: get_env_or("REFINER_TEMPERATURE", defaults.temperature),
            max_tokens: get_env_or("REFINER_MAX_TOKENS", defaults.max_tokens),
            top_p: get_env_or("REFINER_TOP_P", defaults.top_p),
            frequency_penalty: get_env_or("REFINER_FREQUENCY_PENALTY", defaults.frequency_penalty),
            presence_penalty: get_env_or("REFINER_PRESENCE_PENALTY", defaults.presence_penalty),
        }
    }
}

/// Everything the completion client needs, resolved once at startup and
/// handed to the client by value
#[derive(Clone)]
pub struct RefinerConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub sampling: SamplingConfig,
    pub request_timeout: Option<Duration>,
}

// Keep the credential out of logs
impl fmt::Debug for RefinerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefinerConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("sampling", &self.sampling)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl RefinerConfig {
    /// Build a config with default endpoint, model and sampling for `api_key`
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_COMPLETION_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            sampling: SamplingConfig::default(),
            request_timeout: None,
        }
    }

    /// Resolve the configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = require_env("OPENAI_API_KEY")?;
        let request_timeout =
            get_optional_env::<u64>("REFINER_REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs);

        Ok(Self {
            api_url: std::env::var("REFINER_COMPLETION_URL")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_URL.to_string()),
            api_key,
            model: std::env::var("REFINER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            sampling: SamplingConfig::from_env(),
            request_timeout,
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_defaults() {
        let sampling = SamplingConfig::default();
        assert_eq!(sampling.temperature, 0.7);
        assert_eq!(sampling.max_tokens, 150);
        assert_eq!(sampling.top_p, 1.0);
        assert_eq!(sampling.frequency_penalty, 0.0);
        assert_eq!(sampling.presence_penalty, 0.0);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = RefinerConfig::new("sk-very-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    // Single test so the process-wide variables are not raced by another test
    #[test]
    fn test_from_env() {
        std::env::remove_var("OPENAI_API_KEY");
        assert!(matches!(
            RefinerConfig::from_env(),
            Err(ConfigError::MissingVar(ref var)) if var == "OPENAI_API_KEY"
        ));

        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("REFINER_MODEL", "custom-model");
        std::env::set_var("REFINER_MAX_TOKENS", "64");
        std::env::set_var("REFINER_TEMPERATURE", "warm");
        std::env::set_var("REFINER_REQUEST_TIMEOUT_SECS", "12");

        let config = RefinerConfig::from_env().unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.api_url, DEFAULT_COMPLETION_URL);
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.sampling.max_tokens, 64);
        assert_eq!(config.sampling.temperature, 0.7);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(12)));

        std::env::set_var("REFINER_REQUEST_TIMEOUT_SECS", "soon");
        assert!(matches!(
            RefinerConfig::from_env(),
            Err(ConfigError::InvalidValue { .. })
        ));

        for var in [
            "OPENAI_API_KEY",
            "REFINER_MODEL",
            "REFINER_MAX_TOKENS",
            "REFINER_TEMPERATURE",
            "REFINER_REQUEST_TIMEOUT_SECS",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_builders() {
        let config = RefinerConfig::new("key")
            .with_api_url("http://localhost:1234/v1/completions")
            .with_model("test-model")
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.api_url, "http://localhost:1234/v1/completions");
        assert_eq!(config.model, "test-model");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }
}
