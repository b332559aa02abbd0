use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:1234/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "mistral-nemo-instruct-2407";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Configuration for the chat-completion endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// Full URL of the chat-completions endpoint
    pub api_url: String,

    /// Model identifier as known to the local server
    pub model: String,

    /// Sampling temperature (0.0-1.0)
    pub temperature: f64,

    /// Maximum tokens for the reply
    pub max_tokens: u32,

    /// Log full prompts at debug level
    pub debug: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            debug: false,
        }
    }
}

/// Values supplied on the command line, applied on top of the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub debug: bool,
}

impl LlmConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_env_internal(true)
    }

    #[cfg(test)]
    fn from_env_no_dotenv() -> Self {
        Self::from_env_internal(false)
    }

    fn from_env_internal(load_dotenv: bool) -> Self {
        if load_dotenv {
            let _ = dotenv::dotenv();
        }

        let mut config = Self::default();

        if let Ok(api_url) = env::var("LLM_API_URL") {
            if !api_url.trim().is_empty() {
                config.api_url = api_url.trim().to_string();
            }
        }

        if let Ok(model) = env::var("LLM_MODEL") {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }

        if let Ok(temperature) = env::var("LLM_TEMPERATURE") {
            if let Ok(temp) = temperature.parse::<f64>() {
                if (0.0..=1.0).contains(&temp) {
                    config.temperature = temp;
                }
            }
        }

        if let Ok(max_tokens) = env::var("LLM_MAX_TOKENS") {
            if let Ok(tokens) = max_tokens.parse::<u32>() {
                if tokens > 0 {
                    config.max_tokens = tokens;
                }
            }
        }

        if let Ok(debug) = env::var("LLM_DEBUG") {
            config.debug = debug.to_lowercase() == "true" || debug == "1";
        }

        config
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(api_url) = overrides.api_url {
            self.api_url = api_url;
        }
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(temperature) = overrides.temperature {
            self.temperature = temperature;
        }
        if let Some(max_tokens) = overrides.max_tokens {
            self.max_tokens = max_tokens;
        }
        self.debug |= overrides.debug;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model identifier is empty".to_string());
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(format!(
                "Temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            ));
        }

        if self.max_tokens == 0 {
            return Err("Max tokens must be greater than 0".to_string());
        }

        let url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| format!("Invalid endpoint URL '{}': {}", self.api_url, e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!(
                "Endpoint URL must use http or https, got '{}'",
                url.scheme()
            ));
        }

        Ok(())
    }
}
