use std::env;

use crate::error::AppError;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_MAIL_FROM: &str = "UpTask <admin@uptask.com>";

/// SMTP settings. Absent when `SMTP_HOST` is not set, in which case
/// outgoing mail is kept in memory and logged instead.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub secure: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub frontend_url: String,
    pub mail_from: String,
    pub mail: Option<MailConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| AppError::InternalServerError(format!("{} must be set", key)))
        };

        let mail = match lookup("SMTP_HOST").filter(|host| !host.is_empty()) {
            Some(host) => Some(MailConfig {
                host,
                port: parse_or(&lookup, "SMTP_PORT", 587)?,
                user: lookup("SMTP_USER").unwrap_or_default(),
                pass: lookup("SMTP_PASS").unwrap_or_default(),
                secure: parse_or(&lookup, "SMTP_SECURE", false)?,
            }),
            None => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret: required("JWT_SECRET")?,
            frontend_url: lookup("FRONTEND_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
            mail_from: lookup("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            mail,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::InternalServerError(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}
