use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::SecretString;
use std::env;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::str::FromStr;

use openai_client::GROQ_BASE_URL;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub llm_api_key: SecretString,
    pub llm_base_url: String,
    pub llm_model: String,
    pub data_dir: PathBuf,
    pub update_interval_hours: u64,
    pub judge_delay_secs: u64,
    pub judge_requests_per_minute: NonZeroU32,
    pub pipeline_workers: usize,
    pub keywords_file: Option<PathBuf>,
    pub references_file: Option<PathBuf>,
    pub run_on_startup: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("LLM_API_KEY")
            .or_else(|| lookup("GROQ_API_KEY"))
            .context("LLM_API_KEY (or GROQ_API_KEY) must be set")?;

        Ok(Self {
            port: parse_or(&lookup, "PORT", 8080)?,
            llm_api_key: SecretString::from(api_key),
            llm_base_url: lookup("LLM_BASE_URL").unwrap_or_else(|| GROQ_BASE_URL.to_string()),
            llm_model: lookup("LLM_MODEL")
                .unwrap_or_else(|| funding_pipeline::judges::DEFAULT_MODEL.to_string()),
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            update_interval_hours: parse_or(&lookup, "UPDATE_INTERVAL_HOURS", 24)?,
            judge_delay_secs: parse_or(&lookup, "JUDGE_DELAY_SECS", 10)?,
            judge_requests_per_minute: parse_or(
                &lookup,
                "JUDGE_REQUESTS_PER_MINUTE",
                NonZeroU32::new(6).context("default rate must be positive")?,
            )?,
            pipeline_workers: parse_or(&lookup, "PIPELINE_WORKERS", 1)?,
            keywords_file: lookup("KEYWORDS_FILE").map(PathBuf::from),
            references_file: lookup("REFERENCES_FILE").map(PathBuf::from),
            run_on_startup: parse_or(&lookup, "RUN_ON_STARTUP", true)?,
        })
    }

    /// Where checkpoint files are written.
    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.join("output")
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        None => Ok(default),
    }
}
