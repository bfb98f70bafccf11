use std::env;

use crate::error::{AppError, Result};

/// Default public site URL used when SITE_URL is not configured.
const DEFAULT_SITE_URL: &str = "https://clubereceitas.com.br";

/// Default generic-provider statuses that authorize provisioning.
const DEFAULT_ACCEPTED_STATUSES: &[&str] = &["paid", "approved", "purchase_approved"];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    /// Public site base URL, used for the password-setup and login links.
    pub site_url: String,
    /// Mercado Pago access token for payment detail lookups.
    pub mp_access_token: String,
    /// Resend API key for transactional email.
    pub resend_api_key: String,
    /// Verified sender address.
    pub email_from: String,
    /// Generic-provider status/event values accepted as "approved".
    pub accepted_statuses: Vec<String>,
    pub dev_mode: bool,
}

impl Config {
    /// Load configuration from the environment, validating required
    /// credentials up front so a misconfigured deployment fails at startup
    /// instead of on the first webhook.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("APP_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let site_url = env::var("SITE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_SITE_URL.to_string());

        let mp_access_token = require_env("MP_ACCESS_TOKEN")?;
        let resend_api_key = require_env("RESEND_API_KEY")?;
        let email_from = require_env("EMAIL_FROM")?;

        let accepted_statuses = env::var("ACCEPTED_STATUSES")
            .ok()
            .map(|raw| parse_accepted_statuses(&raw))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_accepted_statuses);

        Ok(Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "clube_receitas.db".to_string()),
            site_url,
            mp_access_token,
            resend_api_key,
            email_from,
            accepted_statuses,
            dev_mode,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn default_accepted_statuses() -> Vec<String> {
    DEFAULT_ACCEPTED_STATUSES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Parse a comma-separated status list, trimming entries and dropping blanks.
fn parse_accepted_statuses(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn require_env(name: &'static str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("{} is not set", name)))
}
