use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{FoodLensError, Result};

pub const DEFAULT_IMGBB_API_URL: &str = "https://api.imgbb.com/1/upload";
pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_VISION_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Endpoints and model settings for the image host and the vision service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub imgbb_api_url: Url,
    pub groq_api_url: Url,
    pub model: String,
    pub max_tokens: u32,
    /// Unset means requests may hang until the server gives up.
    pub http_timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            imgbb_api_url: Url::parse(DEFAULT_IMGBB_API_URL).expect("valid default URL"),
            groq_api_url: Url::parse(DEFAULT_GROQ_API_URL).expect("valid default URL"),
            model: DEFAULT_VISION_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            http_timeout: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let imgbb_api_url = match env::var("IMGBB_API_URL") {
            Ok(raw) => parse_url("IMGBB_API_URL", &raw)?,
            Err(_) => defaults.imgbb_api_url,
        };

        let groq_api_url = match env::var("GROQ_API_URL") {
            Ok(raw) => parse_url("GROQ_API_URL", &raw)?,
            Err(_) => defaults.groq_api_url,
        };

        let model = env::var("GROQ_VISION_MODEL").unwrap_or(defaults.model);

        let max_tokens = env::var("GROQ_MAX_TOKENS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(defaults.max_tokens);

        let http_timeout = env::var("FOOD_LENS_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            imgbb_api_url,
            groq_api_url,
            model,
            max_tokens,
            http_timeout,
        })
    }

    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.http_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| FoodLensError::Config(format!("Failed to build HTTP client: {}", e)))
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url> {
    Url::parse(raw.trim())
        .map_err(|e| FoodLensError::Config(format!("{} is not a valid URL: {}", var, e)))
}
