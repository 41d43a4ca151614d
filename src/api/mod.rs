// src/api/mod.rs

//! Typed client for the coursework backend.
//!
//! One file per resource, mirroring the backend's route groups. Shared request
//! plumbing lives here.

pub mod assignments;
pub mod enrollments;
pub mod submissions;

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use crate::config::Config;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.api_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| AppError::Config(format!("API_TOKEN is not a valid header: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a path such as `api/assignments` against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        Ok(self.base_url.join(path)?)
    }

    fn get(&self, path: &str) -> Result<RequestBuilder, AppError> {
        Ok(self.http.get(self.endpoint(path)?))
    }

    fn post(&self, path: &str) -> Result<RequestBuilder, AppError> {
        Ok(self.http.post(self.endpoint(path)?))
    }

    fn put(&self, path: &str) -> Result<RequestBuilder, AppError> {
        Ok(self.http.put(self.endpoint(path)?))
    }
}

/// Sends `request` and returns the decoded JSON body of a 2xx response.
///
/// `context` names the operation for the generic failure message used when
/// the backend does not supply a `message` of its own.
async fn send(request: RequestBuilder, context: &str) -> Result<Value, AppError> {
    let response = request.send().await.map_err(|e| {
        tracing::warn!("{}: request failed: {}", context, e);
        AppError::from(e)
    })?;

    read_body(response, context).await
}

async fn read_body(response: Response, context: &str) -> Result<Value, AppError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    let body = parse_body(&bytes);

    if !status.is_success() {
        let message = error_message(&body)
            .unwrap_or_else(|| format!("{} (status {})", context, status.as_u16()));
        tracing::warn!("{}: backend returned {}: {}", context, status, message);
        return Err(AppError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

/// An empty or malformed body reads as an empty object.
fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(Map::new()))
}

fn error_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}

/// Strips the `{ "data": ... }` envelope if present.
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    Ok(serde_json::from_value(unwrap_envelope(body))?)
}
