use std::env;
use std::str::FromStr;

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

const DEFAULT_JWT_SECRET: &str = "dev_secret_key_change_in_production";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Firebase,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firebase" => Ok(StoreBackend::Firebase),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::ValidationError(format!(
                "Unknown store backend '{}'",
                other
            ))),
        }
    }
}

/// Which single score represents a quiz that was attempted more than once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizScorePolicy {
    Best,
    Latest,
}

impl FromStr for QuizScorePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best" => Ok(QuizScorePolicy::Best),
            "latest" => Ok(QuizScorePolicy::Latest),
            other => Err(AppError::ValidationError(format!(
                "Unknown quiz score policy '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RiskThresholds {
    pub min_progress_percent: f64,
    pub min_score_percent: f64,
    pub critical_score_percent: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            min_progress_percent: 50.0,
            min_score_percent: 60.0,
            critical_score_percent: 40.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub store_backend: StoreBackend,
    pub firebase_db_url: String,
    pub firebase_auth_secret: Option<SecretString>,
    pub store_seed_file: Option<String>,
    pub store_timeout_secs: u64,
    pub jwt_secret: SecretString,
    pub cors_allowed_origin: String,
    pub lesson_slot_count: u32,
    pub quiz_score_policy: QuizScorePolicy,
    pub risk_thresholds: RiskThresholds,
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = RiskThresholds::default();

        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env_parse("WEB_SERVER_PORT", 8080),
            store_backend: env_parse("STORE_BACKEND", StoreBackend::Firebase),
            firebase_db_url: env::var("FIREBASE_DB_URL")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
            firebase_auth_secret: env::var("FIREBASE_AUTH_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .map(SecretString::from),
            store_seed_file: env::var("STORE_SEED_FILE").ok().filter(|s| !s.is_empty()),
            store_timeout_secs: env_parse("STORE_TIMEOUT_SECS", 10),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            ),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            lesson_slot_count: env_parse("LESSON_SLOT_COUNT", 6),
            quiz_score_policy: env_parse("QUIZ_SCORE_POLICY", QuizScorePolicy::Best),
            risk_thresholds: RiskThresholds {
                min_progress_percent: env_parse(
                    "RISK_MIN_PROGRESS_PERCENT",
                    defaults.min_progress_percent,
                ),
                min_score_percent: env_parse("RISK_MIN_SCORE_PERCENT", defaults.min_score_percent),
                critical_score_percent: env_parse(
                    "RISK_CRITICAL_SCORE_PERCENT",
                    defaults.critical_score_percent,
                ),
            },
        }
    }

    /// Rejects configuration that must never reach a deployed instance.
    pub fn validate_for_production(&self) -> AppResult<()> {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();
        if jwt_secret == DEFAULT_JWT_SECRET {
            return Err(AppError::ValidationError(
                "JWT_SECRET is using the default value".to_string(),
            ));
        }
        if jwt_secret.len() < 32 {
            return Err(AppError::ValidationError(format!(
                "JWT_SECRET is too short ({}), must be at least 32 characters",
                jwt_secret.len()
            )));
        }
        if self.store_backend == StoreBackend::Firebase && self.firebase_auth_secret.is_none() {
            return Err(AppError::ValidationError(
                "FIREBASE_AUTH_SECRET must be set for the firebase backend".to_string(),
            ));
        }
        if self.lesson_slot_count == 0 {
            return Err(AppError::ValidationError(
                "LESSON_SLOT_COUNT must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            store_backend: StoreBackend::Memory,
            firebase_db_url: "http://localhost:9000".to_string(),
            firebase_auth_secret: None,
            store_seed_file: None,
            store_timeout_secs: 1,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            cors_allowed_origin: "http://localhost:5173".to_string(),
            lesson_slot_count: 6,
            quiz_score_policy: QuizScorePolicy::Best,
            risk_thresholds: RiskThresholds::default(),
        }
    }
}
