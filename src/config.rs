//! Runtime configuration from environment variables
//!
//! Call `dotenv::dotenv()` before `AdvisorConfig::from_env` to pick up a
//! local `.env` file.

use crate::error::AdvisorError;
use crate::Result;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// `None` means no provider credentials; binaries use the mock provider.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub request_timeout_secs: u64,
    pub api_port: u16,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_port: DEFAULT_PORT,
        }
    }
}

impl AdvisorConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let gemini_api_key = get("GEMINI_API_KEY").or_else(|| get("API_KEY"));

        let request_timeout_secs = match get("GEMINI_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| {
                AdvisorError::Config(format!("GEMINI_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            None => defaults.request_timeout_secs,
        };

        let api_port = match get("PORT").or_else(|| get("API_PORT")) {
            Some(raw) => raw
                .parse()
                .map_err(|_| AdvisorError::Config(format!("invalid port: {}", raw)))?,
            None => defaults.api_port,
        };

        Ok(Self {
            gemini_api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: get("GEMINI_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.gemini_base_url),
            request_timeout_secs,
            api_port,
        })
    }
}
