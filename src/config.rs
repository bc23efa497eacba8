use dotenvy::dotenv;
use eyre::{Result, WrapErr};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::auth::users::{UserRecord, parse_users};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    pub auth: AuthConfig,
    pub narrative: NarrativeConfig,
    pub crm_sync_token: Option<String>,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: Option<String>,
    pub users: Vec<UserRecord>,
    pub cookie_secure: bool,
}

#[derive(Clone)]
pub struct NarrativeConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").wrap_err("Missing DATABASE_URL")?;

        let users = match env::var("AUTH_USERS") {
            Ok(raw) => parse_users(&raw),
            Err(_) => Vec::new(),
        };
        if users.is_empty() {
            warn!("AUTH_USERS is empty or invalid; nobody will be able to log in");
        }

        let narrative = NarrativeConfig {
            enabled: env_or("NARRATIVE_ENABLED", true)?,
            api_key: non_empty_var("OPENAI_API_KEY"),
            base_url: env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            timeout: Duration::from_secs(env_or("NARRATIVE_TIMEOUT_SECS", 30)?),
            max_retries: env_or("NARRATIVE_MAX_RETRIES", 2)?,
        };

        Ok(Config {
            database_url,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 5)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env_or("SERVER_PORT", 8080)?,
            auth: AuthConfig {
                secret: non_empty_var("AUTH_SECRET"),
                users,
                cookie_secure: env_or("AUTH_COOKIE_SECURE", true)?,
            },
            narrative,
            crm_sync_token: non_empty_var("CRM_SYNC_TOKEN"),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Trimmed value of `key`, treating unset and blank the same.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_var(key) {
        Some(raw) => raw.parse().wrap_err_with(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrative_defaults() {
        let cfg = NarrativeConfig::default();
        assert!(cfg.enabled);
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.model, "gpt-4.1-mini");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn unset_variable_uses_default() {
        let port: u16 = env_or("AI_FINANCE_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }
}
