use std::time::Duration;

/// Default provider endpoint (OpenAI-compatible chat completions).
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1";

/// Default image-capable chat model.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-image-preview";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Image provider configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ImageGenConfig {
    /// Base URL; `/chat/completions` is appended.
    pub api_url: String,
    /// Bearer token. Empty when unset, in which case every request fails.
    pub api_key: String,
    pub model: String,
    /// Upper bound on a single upstream request.
    pub timeout: Duration,
}

impl ImageGenConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                                  |
    /// |----------------------|------------------------------------------|
    /// | `IMAGE_API_URL`      | `https://openrouter.ai/api/v1`           |
    /// | `IMAGE_API_KEY`      | (none)                                   |
    /// | `IMAGE_MODEL`        | `google/gemini-2.5-flash-image-preview`  |
    /// | `IMAGE_TIMEOUT_SECS` | `120`                                    |
    pub fn from_env() -> Self {
        let api_url = std::env::var("IMAGE_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.into())
            .trim_end_matches('/')
            .to_string();

        let api_key = std::env::var("IMAGE_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("IMAGE_API_KEY is not set; image generation requests will fail");
        }

        let model = std::env::var("IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let timeout_secs: u64 = std::env::var("IMAGE_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("IMAGE_TIMEOUT_SECS must be a valid u64");

        Self {
            api_url,
            api_key,
            model,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Configuration pointing at `api_url` with the default model and timeout.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
