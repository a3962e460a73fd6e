//! Client configuration parsed from environment variables.
//!
//! A `.env` file in the working directory is loaded first when present.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_TOKEN_PATH: &str = ".kirada/token";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Origin of the backend, without trailing slash
    pub backend_url: String,
    /// Versioned API root beneath the origin
    pub api_prefix: String,
    /// Where the bearer token is persisted between runs
    pub token_path: PathBuf,
    pub timeout: Duration,
    /// Per-file ceiling enforced before uploading
    pub max_image_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl Config {
    /// Build config from the environment.
    ///
    /// Optional:
    /// - `KIRADA_BACKEND_URL`: default `http://localhost:8001`
    /// - `KIRADA_API_PREFIX`: default `/api`
    /// - `KIRADA_TOKEN_PATH`: default `.kirada/token`
    /// - `KIRADA_TIMEOUT_SECS`: default 30
    /// - `KIRADA_MAX_IMAGE_BYTES`: default 5 MB
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        Self {
            backend_url: std::env::var("KIRADA_BACKEND_URL")
                .map(|url| normalize_origin(&url))
                .unwrap_or(defaults.backend_url),
            api_prefix: std::env::var("KIRADA_API_PREFIX")
                .map(|prefix| normalize_prefix(&prefix))
                .unwrap_or(defaults.api_prefix),
            token_path: std::env::var("KIRADA_TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_path),
            timeout: Duration::from_secs(env_parse_u64("KIRADA_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)),
            max_image_bytes: env_parse_u64("KIRADA_MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES),
        }
    }

    pub fn with_backend_url(mut self, url: &str) -> Self {
        self.backend_url = normalize_origin(url);
        self
    }

    /// Full URL of an API path such as `/properties`
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}/{}", self.backend_url, self.api_prefix, path.trim_start_matches('/'))
    }

    /// Image references from the backend are relative paths under the
    /// origin. Absolute URLs are returned unchanged.
    pub fn resolve_image(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_string()
        } else {
            format!("{}/{}", self.backend_url, reference.trim_start_matches('/'))
        }
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn normalize_origin(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
