// src/config.rs

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use url::Url;

use crate::error::AppError;

pub const DEFAULT_DRAFT_STORE_URL: &str = "sqlite://coursework.db";
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL. Always ends with `/` so endpoint paths join under it.
    pub api_base_url: Url,
    /// Bearer credential forwarded with every request.
    pub api_token: Option<String>,
    pub draft_store_url: String,
    pub page_size: usize,
    pub request_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let api_base_url = env::var("API_BASE_URL")
            .map_err(|_| AppError::Config("API_BASE_URL must be set".to_string()))?;

        let api_token = env::var("API_TOKEN").ok().filter(|t| !t.trim().is_empty());

        let draft_store_url =
            env::var("DRAFT_STORE_URL").unwrap_or_else(|_| DEFAULT_DRAFT_STORE_URL.to_string());

        let page_size = parse_var("REVIEW_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(AppError::Config(
                "REVIEW_PAGE_SIZE must be at least 1".to_string(),
            ));
        }

        let request_timeout_secs =
            parse_var("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_base_url: base_url(&api_base_url)?,
            api_token,
            draft_store_url,
            page_size,
            request_timeout_secs,
            rust_log,
        })
    }
}

/// Parses a backend base URL, appending the trailing slash `Url::join` needs
/// to keep any path prefix.
pub fn base_url(raw: &str) -> Result<Url, AppError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{}/", trimmed))?)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(default),
    }
}
