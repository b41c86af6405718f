use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub llm_temperature: f32,
    pub llm_max_retries: u32,
    pub oracle_timeout: Duration,
    pub scoring_concurrency: usize,
    pub max_upload_bytes: usize,
    /// Where uploaded CVs are staged during extraction. System temp dir if unset.
    pub scratch_dir: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let scoring_concurrency: usize = optional_env("SCORING_CONCURRENCY", 4)?;
        anyhow::ensure!(
            scoring_concurrency >= 1,
            "SCORING_CONCURRENCY must be at least 1"
        );

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            llm_temperature: optional_env("LLM_TEMPERATURE", 0.0)?,
            llm_max_retries: optional_env("LLM_MAX_RETRIES", 0)?,
            oracle_timeout: Duration::from_secs(optional_env("ORACLE_TIMEOUT_SECS", 60)?),
            scoring_concurrency,
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES", 25 * 1024 * 1024)?,
            scratch_dir: std::env::var_os("SCRATCH_DIR").map(PathBuf::from),
            port: optional_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    anyhow::ensure!(
        !value.trim().is_empty(),
        "Required environment variable '{key}' is empty"
    );
    Ok(value)
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} has an invalid value '{raw}'"))
}
