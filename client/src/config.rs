//! Client configuration.
//!
//! The API base URL is resolved in order from the runtime environment
//! (`PROTEIN_API_URL`, native only), the build environment (same variable via
//! `option_env!`, used by WASM builds), then [`DEFAULT_API_BASE_URL`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const API_BASE_URL_ENV: &str = "PROTEIN_API_URL";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API base URL `{0}`: expected http:// or https://, or empty for same-origin")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash. Empty means same-origin.
    pub api_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { api_base_url: DEFAULT_API_BASE_URL.to_owned() }
    }
}

impl ClientConfig {
    /// Build a config for `base_url`, validating and normalizing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is neither empty nor `http(s)://`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self { api_base_url: normalize_base_url(base_url)? })
    }

    /// Resolve the config from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = runtime_base_url()
            .or_else(|| option_env!("PROTEIN_API_URL").map(str::to_owned))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        Self::new(&raw)
    }

    /// Join `path` (which should start with `/`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.api_base_url)
        } else {
            format!("{}/{path}", self.api_base_url)
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_base_url() -> Option<String> {
    std::env::var(API_BASE_URL_ENV).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(target_arch = "wasm32")]
fn runtime_base_url() -> Option<String> {
    None
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| ConfigError::InvalidBaseUrl(raw.to_owned()))?;
    if rest.is_empty() || rest.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}
