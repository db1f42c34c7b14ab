use crate::error::{FoodLensError, Result};

/// Credentials for the two remote services.
#[derive(Debug, Clone)]
pub struct FoodConfig {
    pub imgbb_api_key: String,
    pub groq_api_key: String,
}

impl FoodConfig {
    /// Values given on the command line win over `IMGBB_API_KEY` and `GROQ_API_KEY`.
    pub fn with_overrides(
        imgbb_api_key: Option<String>,
        groq_api_key: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            imgbb_api_key: match imgbb_api_key {
                Some(key) => key,
                None => required_var("IMGBB_API_KEY")?,
            },
            groq_api_key: match groq_api_key {
                Some(key) => key,
                None => required_var("GROQ_API_KEY")?,
            },
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| FoodLensError::Config(format!("{} environment variable not set", name)))
}
