//! Process configuration.
//!
//! Everything is read from the environment exactly once at startup and
//! carried in explicit structs; no module reaches for `env::var` later.

use crate::error::{CoreError, CoreResult};
use std::env;
use std::time::Duration;

const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection parameters for the policy database.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl DbConfig {
    /// Read DB_NAME, DB_USER, DB_PASSWORD, DB_HOST, DB_PORT.
    pub fn from_env() -> CoreResult<Self> {
        let port_raw = require("DB_PORT")?;
        let port = port_raw
            .parse::<u16>()
            .map_err(|_| CoreError::Config { name: "DB_PORT" })?;
        Ok(Self {
            name: require("DB_NAME")?,
            user: require("DB_USER")?,
            password: require("DB_PASSWORD")?,
            host: require("DB_HOST")?,
            port,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

/// Settings for the generative translation service.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    /// Hard deadline for one request. Expiry counts as a translation
    /// failure, never a hang.
    pub timeout: Duration,
}

impl TranslatorConfig {
    /// Read OPENAI_API_KEY plus the optional TRANSLATOR_MODEL,
    /// TRANSLATOR_ENDPOINT, and TRANSLATOR_TIMEOUT_SECS overrides.
    pub fn from_env() -> CoreResult<Self> {
        let timeout_secs = match env::var("TRANSLATOR_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| CoreError::Config { name: "TRANSLATOR_TIMEOUT_SECS" })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            api_key: require("OPENAI_API_KEY")?,
            model: env::var("TRANSLATOR_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            endpoint: env::var("TRANSLATOR_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.into()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn require(name: &'static str) -> CoreResult<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(CoreError::Config { name }),
    }
}
