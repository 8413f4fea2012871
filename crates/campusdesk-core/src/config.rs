//! Configuration module
//!
//! Client settings read from `CAMPUSDESK_*` environment variables (and an
//! optional `.env` file): API location, page size, upload limit, request
//! timeout and where the session is persisted.

use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;

const API_URL: &str = "http://localhost:5000/api";
const PAGE_SIZE: usize = 10;
const MAX_UPLOAD_MB: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const DATA_DIR: &str = ".campusdesk";
const SESSION_FILE: &str = "session.json";

fn default_api_url() -> String {
    API_URL.to_string()
}

fn default_page_size() -> usize {
    PAGE_SIZE
}

fn default_max_upload_mb() -> u64 {
    MAX_UPLOAD_MB
}

fn default_request_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DATA_DIR)
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            page_size: default_page_size(),
            max_upload_mb: default_max_upload_mb(),
            request_timeout_secs: default_request_timeout_secs(),
            data_dir: default_data_dir(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let config: ClientConfig = envy::prefixed("CAMPUSDESK_")
            .from_env()
            .context("Failed to read CAMPUSDESK_* environment variables")?;
        config.validate()?;
        Ok(config)
    }

    /// Build from explicit key/value pairs (keys without the prefix, upper-case).
    pub fn from_pairs<I>(pairs: I) -> Result<Self, anyhow::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: ClientConfig =
            envy::from_iter(pairs).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "CAMPUSDESK_API_URL must start with http:// or https:// (got '{}')",
                self.api_url
            ));
        }
        if self.page_size == 0 {
            return Err(anyhow::anyhow!("CAMPUSDESK_PAGE_SIZE must be at least 1"));
        }
        if self.max_upload_mb == 0 {
            return Err(anyhow::anyhow!("CAMPUSDESK_MAX_UPLOAD_MB must be at least 1"));
        }
        Ok(())
    }

    pub fn api_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}
