use std::time::Duration;

use boardbrief_client::llm::DEFAULT_BASE_URL;
use boardbrief_core::compare::{DEFAULT_CALL_TIMEOUT, DEFAULT_RETRY_BASE_DELAY};
use boardbrief_core::summarize::DEFAULT_MIN_TEXT_CHARS;
use boardbrief_core::{AppError, FanOut};

const DEFAULT_MODELS: &str = "gpt-4o-mini";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Runtime configuration for the summarize server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Models to compare, in report order.
    pub models: Vec<String>,
    pub base_url: String,
    pub api_key: String,
    pub port: u16,
    pub call_timeout: Duration,
    pub fan_out: FanOut,
    pub max_attempts: u32,
    /// Wait before the first retry; doubles per attempt.
    pub retry_base_delay: Duration,
    pub min_text_chars: usize,
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Read configuration from environment variables.
    ///
    /// - `BOARDBRIEF_API_KEY` (required)
    /// - `BOARDBRIEF_MODELS` (comma-separated, defaults to `gpt-4o-mini`)
    /// - `BOARDBRIEF_BASE_URL` (defaults to the OpenAI API)
    /// - `BOARDBRIEF_PORT` (defaults to 3000)
    /// - `BOARDBRIEF_CALL_TIMEOUT_SECS` (defaults to 120)
    /// - `BOARDBRIEF_SEQUENTIAL` (`true` to call models one at a time)
    /// - `BOARDBRIEF_MAX_ATTEMPTS` (defaults to 1)
    /// - `BOARDBRIEF_RETRY_DELAY_MS` (defaults to 1000)
    /// - `BOARDBRIEF_MIN_TEXT_CHARS` (defaults to 100)
    /// - `BOARDBRIEF_MAX_BODY_BYTES` (defaults to 10 MiB)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("BOARDBRIEF_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigError(
                    "BOARDBRIEF_API_KEY not set. Required for model calls.".into(),
                )
            })?;

        let models = parse_models(
            &lookup("BOARDBRIEF_MODELS").unwrap_or_else(|| DEFAULT_MODELS.to_string()),
        )?;

        let base_url =
            lookup("BOARDBRIEF_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let port = parse_or(&lookup, "BOARDBRIEF_PORT", DEFAULT_PORT)?;
        let call_timeout = Duration::from_secs(parse_or(
            &lookup,
            "BOARDBRIEF_CALL_TIMEOUT_SECS",
            DEFAULT_CALL_TIMEOUT.as_secs(),
        )?);
        if call_timeout.is_zero() {
            return Err(AppError::ConfigError(
                "BOARDBRIEF_CALL_TIMEOUT_SECS must be at least 1".into(),
            ));
        }

        let fan_out = if parse_or(&lookup, "BOARDBRIEF_SEQUENTIAL", false)? {
            FanOut::Sequential
        } else {
            FanOut::Concurrent
        };

        let max_attempts: u32 = parse_or(&lookup, "BOARDBRIEF_MAX_ATTEMPTS", 1)?;
        if max_attempts == 0 {
            return Err(AppError::ConfigError(
                "BOARDBRIEF_MAX_ATTEMPTS must be at least 1".into(),
            ));
        }

        let retry_base_delay = Duration::from_millis(parse_or(
            &lookup,
            "BOARDBRIEF_RETRY_DELAY_MS",
            DEFAULT_RETRY_BASE_DELAY.as_millis() as u64,
        )?);

        Ok(Self {
            models,
            base_url,
            api_key,
            port,
            call_timeout,
            fan_out,
            max_attempts,
            retry_base_delay,
            min_text_chars: parse_or(&lookup, "BOARDBRIEF_MIN_TEXT_CHARS", DEFAULT_MIN_TEXT_CHARS)?,
            max_body_bytes: parse_or(&lookup, "BOARDBRIEF_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
        })
    }
}

/// Split a comma-separated model list, trimming entries and dropping blanks.
fn parse_models(raw: &str) -> Result<Vec<String>, AppError> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();

    if models.is_empty() {
        return Err(AppError::ConfigError(
            "BOARDBRIEF_MODELS must name at least one model".into(),
        ));
    }
    Ok(models)
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            AppError::ConfigError(format!("Invalid {key} '{raw}'"))
        }),
    }
}
