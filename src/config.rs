//! Runtime configuration from environment variables (and `.env`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::lesson_plan::persistence::DEFAULT_DEBOUNCE_MS;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub typst_bin: String,
    pub persist_debounce: Duration,
    pub ai: AiSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", 8080)?,
            data_dir: PathBuf::from(var_or("DATA_DIR", "./data")),
            typst_bin: var_or("TYPST_BIN", "typst"),
            persist_debounce: Duration::from_millis(parse_var(
                "PERSIST_DEBOUNCE_MS",
                DEFAULT_DEBOUNCE_MS,
            )?),
            ai: AiSettings {
                api_key,
                model: var_or("GEMINI_MODEL", DEFAULT_MODEL),
                base_url: var_or("GEMINI_BASE_URL", DEFAULT_BASE_URL),
                timeout_secs: parse_var("AI_TIMEOUT_SECS", 60)?,
            },
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|_| ConfigError::Invalid { name, value })
        }
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_falls_back_and_rejects_garbage() {
        env::remove_var("RPP_TEST_UNSET_PORT");
        assert_eq!(parse_var("RPP_TEST_UNSET_PORT", 8080u16).unwrap(), 8080);

        env::set_var("RPP_TEST_BAD_PORT", "eighty");
        assert!(matches!(
            parse_var::<u16>("RPP_TEST_BAD_PORT", 8080),
            Err(ConfigError::Invalid { .. })
        ));

        env::set_var("RPP_TEST_GOOD_PORT", " 9000 ");
        assert_eq!(parse_var("RPP_TEST_GOOD_PORT", 8080u16).unwrap(), 9000);
    }
}
