//! HTTP access to the reqres.in demo API.
//!
//! [`HttpClient::request`] is the single transport entry point: it applies the
//! API key header and timeout, tolerates empty or non-JSON bodies, and turns
//! every failure into a [`NetworkError`] carrying a user-facing message.
//! The `auth` and `users` services build on it.
//!
pub mod auth;
pub mod users;

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::NetworkError;

pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";
pub const DEFAULT_API_KEY: &str = "reqres-free-v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
pub const API_KEY_HEADER: &str = "x-api-key";

/// Connection settings for [`HttpClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// JSON-over-HTTP client. Cheap to clone.
#[derive(Clone, Debug)]
pub struct HttpClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl HttpClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Send `body` (if any) as JSON to `path` and decode the response as `T`.
    ///
    /// `fallback` is the message used when neither the server nor the
    /// transport supplies one.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        fallback: &str,
    ) -> Result<T, NetworkError> {
        let url = self.url(path);
        tracing::debug!(%method, %url, "api request");

        let mut req = self
            .http
            .request(method.clone(), &url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .timeout(self.config.timeout);
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| transport_error(e, fallback))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| transport_error(e, fallback))?;
        let data = parse_body(&text);

        if !status.is_success() {
            let message = data
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| status_line(status));
            let message = if message.trim().is_empty() { fallback.to_string() } else { message };
            tracing::warn!(%method, %url, status = status.as_u16(), %message, "api request failed");
            return Err(NetworkError::Status { status: status.as_u16(), message });
        }

        serde_json::from_value(data).map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "unexpected response shape");
            NetworkError::Transport(fallback.to_string())
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T, NetworkError> {
        self.request(Method::GET, path, None, fallback).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Value>,
        fallback: &str,
    ) -> Result<T, NetworkError> {
        self.request(Method::POST, path, body, fallback).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
        fallback: &str,
    ) -> Result<T, NetworkError> {
        self.request(Method::PATCH, path, Some(body), fallback).await
    }

    pub async fn delete(&self, path: &str, fallback: &str) -> Result<(), NetworkError> {
        self.request::<Value>(Method::DELETE, path, None, fallback).await.map(|_| ())
    }
}

/// Empty or unparsable bodies read as an empty object.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::Object(Default::default()))
}

fn status_line(status: StatusCode) -> String {
    format!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or(""))
        .trim()
        .to_string()
}

fn transport_error(e: reqwest::Error, fallback: &str) -> NetworkError {
    if e.is_timeout() {
        return NetworkError::Timeout;
    }
    let msg = e.to_string();
    NetworkError::Transport(if msg.is_empty() { fallback.to_string() } else { msg })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let c = HttpClient::new(ApiConfig {
            base_url: "http://localhost:1/api/".into(),
            ..ApiConfig::default()
        });
        assert_eq!(c.url("/users?page=2"), "http://localhost:1/api/users?page=2");
        assert_eq!(c.url("login"), "http://localhost:1/api/login");
    }

    #[test]
    fn body_parsing_tolerates_garbage() {
        assert_eq!(parse_body(""), Value::Object(Default::default()));
        assert_eq!(parse_body("<html>"), Value::Object(Default::default()));
        assert_eq!(parse_body(r#"{"id":"7"}"#)["id"], "7");
    }

    #[test]
    fn status_line_uses_reason_phrase() {
        assert_eq!(status_line(StatusCode::BAD_REQUEST), "400 Bad Request");
        assert_eq!(status_line(StatusCode::from_u16(599).unwrap()), "599");
    }

    #[test]
    fn defaults_match_demo_api() {
        let cfg = ApiConfig::default();
        assert_eq!(cfg.base_url, "https://reqres.in/api");
        assert_eq!(cfg.api_key, "reqres-free-v1");
        assert_eq!(cfg.timeout, Duration::from_secs(8));
    }
}
