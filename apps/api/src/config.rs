use anyhow::{Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/protocolo-selva.db";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Seconds the quiz result screen stays open before the client closes it.
const DEFAULT_QUIZ_AUTO_CLOSE_SECS: u64 = 5;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// The recipe generator falls back to static recipes when this is unset.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    /// Accounts registered with this email are created as admins.
    pub admin_email: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub quiz_auto_close_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret: require_env("JWT_SECRET")?,
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            admin_email: optional_env("ADMIN_EMAIL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            quiz_auto_close_secs: std::env::var("QUIZ_AUTO_CLOSE_SECS")
                .unwrap_or_else(|_| DEFAULT_QUIZ_AUTO_CLOSE_SECS.to_string())
                .parse::<u64>()
                .context("QUIZ_AUTO_CLOSE_SECS must be a whole number of seconds")?,
        })
    }

    pub fn ai_configured(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
impl Config {
    /// Configuration used by router tests: in-memory database, no AI key.
    pub fn for_tests() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            admin_email: Some("admin@selva.test".to_string()),
            port: 0,
            rust_log: "debug".to_string(),
            quiz_auto_close_secs: DEFAULT_QUIZ_AUTO_CLOSE_SECS,
        }
    }
}
