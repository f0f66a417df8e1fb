use anyhow::Context;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:9000/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "text" | "pretty" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("LOG_FORMAT must be 'text' or 'json', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub capture_success_refresh: Duration,
    pub capture_failure_refresh: Duration,
    pub log_request_body: bool,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_base_url =
            lookup("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        validate_base_url(&api_base_url)?;

        Ok(Config {
            api_base_url,
            capture_success_refresh: parse_millis(&lookup, "CAPTURE_SUCCESS_REFRESH_MS", 2000)?,
            capture_failure_refresh: parse_millis(&lookup, "CAPTURE_FAILURE_REFRESH_MS", 3000)?,
            log_request_body: lookup("LOG_REQUEST_BODY")
                .map(|v| v.parse::<bool>())
                .transpose()
                .context("LOG_REQUEST_BODY must be 'true' or 'false'")?
                .unwrap_or(false),
            log_format: lookup("LOG_FORMAT")
                .map(|v| v.parse::<LogFormat>())
                .transpose()?
                .unwrap_or(LogFormat::Text),
        })
    }
}

fn parse_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default_ms: u64,
) -> anyhow::Result<Duration> {
    let millis = match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{} must be a whole number of milliseconds", key))?,
        None => default_ms,
    };
    Ok(Duration::from_millis(millis))
}

fn validate_base_url(raw: &str) -> anyhow::Result<()> {
    let url = Url::parse(raw).with_context(|| format!("API_BASE_URL is not a valid URL: {}", raw))?;

    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("API_BASE_URL must use http or https, got '{}'", url.scheme());
    }

    Ok(())
}
