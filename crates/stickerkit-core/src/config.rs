//! Configuration module
//!
//! Process configuration is read from the environment (optionally seeded from a
//! `.env` file). Every setting has a default, so an empty environment yields a
//! working local setup with storage offload disabled.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_ENCODER_TIMEOUT_SECS, DEFAULT_OFFLOAD_TTL_MINUTES, DEFAULT_TRIGGER_CAPTION,
    LOCAL_TEMP_DIR,
};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" | "" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Remote storage offload configuration
#[derive(Clone, Debug, Default)]
pub struct StorageConfig {
    /// Full upload endpoint, e.g. `https://files.example.com/api/u/bot`.
    pub upload_url: Option<String>,
    pub default_ttl_minutes: u32,
}

impl StorageConfig {
    /// Offload is enabled only for an http(s) endpoint; anything else disables it.
    pub fn is_configured(&self) -> bool {
        self.upload_url
            .as_deref()
            .is_some_and(|url| url.starts_with("http"))
    }

    /// Build `{base}/api/u/{slug}`.
    pub fn endpoint_for(base_url: &str, slug: &str) -> String {
        format!(
            "{}/api/u/{}",
            base_url.trim_end_matches('/'),
            slug.trim_matches('/')
        )
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub ffmpeg_path: String,
    pub encoder_timeout: Duration,
    pub temp_dir: PathBuf,
    pub trigger_caption: String,
    pub log_format: LogFormat,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let upload_url = var("STORAGE_UPLOAD_URL")
            .or_else(|| var("BASE_URL_API_STORAGE"))
            .or_else(|| match (var("STORAGE_BASE_URL"), var("STORAGE_SLUG")) {
                (Some(base), Some(slug)) => Some(StorageConfig::endpoint_for(&base, &slug)),
                _ => None,
            })
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let storage = StorageConfig {
            upload_url,
            default_ttl_minutes: var("STORAGE_TEMP_TTL_MINUTES")
                .and_then(|s| s.trim().parse::<u32>().ok())
                .filter(|minutes| *minutes > 0)
                .unwrap_or(DEFAULT_OFFLOAD_TTL_MINUTES),
        };

        // Scratch files stay next to the process unless a remote store is configured.
        let temp_dir = match var("TEMP_DIR").filter(|s| !s.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None if storage.is_configured() => env::temp_dir(),
            None => PathBuf::from(LOCAL_TEMP_DIR),
        };

        let encoder_timeout_secs = match var("ENCODER_TIMEOUT_SECS") {
            Some(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("ENCODER_TIMEOUT_SECS must be a valid number"))?,
            None => DEFAULT_ENCODER_TIMEOUT_SECS,
        };

        let log_format = match var("LOG_FORMAT") {
            Some(s) => s.parse()?,
            None => LogFormat::default(),
        };

        let config = Config {
            environment,
            ffmpeg_path: var("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            encoder_timeout: Duration::from_secs(encoder_timeout_secs),
            temp_dir,
            trigger_caption: var("STICKER_TRIGGER")
                .unwrap_or_else(|| DEFAULT_TRIGGER_CAPTION.to_string()),
            log_format,
            storage,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.encoder_timeout.is_zero() {
            return Err(anyhow::anyhow!(
                "ENCODER_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if self.trigger_caption.trim().is_empty() {
            return Err(anyhow::anyhow!("STICKER_TRIGGER cannot be empty"));
        }

        let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
        if self.ffmpeg_path.trim().is_empty()
            || self.ffmpeg_path.chars().any(|c| dangerous_chars.contains(&c))
        {
            return Err(anyhow::anyhow!(
                "FFMPEG_PATH is empty or contains dangerous characters"
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            environment: "development".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            encoder_timeout: Duration::from_secs(DEFAULT_ENCODER_TIMEOUT_SECS),
            temp_dir: PathBuf::from(LOCAL_TEMP_DIR),
            trigger_caption: DEFAULT_TRIGGER_CAPTION.to_string(),
            log_format: LogFormat::default(),
            storage: StorageConfig {
                upload_url: None,
                default_ttl_minutes: DEFAULT_OFFLOAD_TTL_MINUTES,
            },
        }
    }
}
