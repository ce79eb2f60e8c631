//! Server configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// PostgreSQL URL. Sessions are kept in memory when unset.
    pub database_url: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    /// Upper bound on every model call.
    pub llm_timeout: Duration,
    /// Fixed seed for reproducible dice. Seeded from the OS when unset.
    pub rng_seed: Option<u64>,
    /// OTLP collector; spans are only exported when set.
    pub otlp_endpoint: Option<String>,
}

fn parse<T>(key: &str, value: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{key} is invalid: {e}")))
}

impl AppConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, treating blank values as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let timeout_secs: u64 = match var("LLM_TIMEOUT_SECS") {
            Some(value) => parse("LLM_TIMEOUT_SECS", &value)?,
            None => 30,
        };
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "LLM_TIMEOUT_SECS must be at least 1".into(),
            ));
        }

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: match var("PORT") {
                Some(value) => parse("PORT", &value)?,
                None => 3000,
            },
            database_url: var("DATABASE_URL"),
            llm_base_url: var("LLM_BASE_URL")
                .unwrap_or_else(|| "http://localhost:11434".to_string()),
            llm_model: var("LLM_MODEL").unwrap_or_else(|| "llama3.1".to_string()),
            llm_timeout: Duration::from_secs(timeout_secs),
            rng_seed: var("RNG_SEED")
                .map(|value| parse("RNG_SEED", &value))
                .transpose()?,
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
