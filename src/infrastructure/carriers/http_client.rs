//! # HTTP Client Utilities
//!
//! Shared HTTP client for carrier rate clients.
//!
//! This module provides a reqwest wrapper with:
//! - Configurable timeouts
//! - JSON serialization/deserialization
//! - HTTP status to [`CarrierFault`] mapping
//!
//! No retries are performed; a failed request surfaces immediately.
//!
//! # Examples
//!
//! ```ignore
//! use shipping_rates::infrastructure::carriers::http_client::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let response: MyResponse = client.post("https://api.example.com/rates", &body).await?;
//! ```

use crate::infrastructure::carriers::error::{CarrierFault, CarrierResult};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Longest error body kept in a fault message.
const MAX_ERROR_BODY_LEN: usize = 512;

/// HTTP client wrapper for carrier rate clients.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `CarrierFault::InternalError` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> CarrierResult<Self> {
        Self::with_headers(timeout_ms, HeaderMap::new())
    }

    /// Creates a new HTTP client with default headers.
    ///
    /// # Errors
    ///
    /// Returns `CarrierFault::InternalError` if the client cannot be created.
    pub fn with_headers(timeout_ms: u64, default_headers: HeaderMap) -> CarrierResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                CarrierFault::internal_error(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a POST request with a JSON body and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns a transport fault if the request fails, a status fault for
    /// non-2xx responses and `CarrierFault::MalformedResponse` if the body
    /// cannot be parsed.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> CarrierResult<T> {
        self.post_with_headers(url, body, HeaderMap::new()).await
    }

    /// Makes a POST request with a JSON body and additional headers.
    ///
    /// # Errors
    ///
    /// Same as [`post`](Self::post).
    pub async fn post_with_headers<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
    ) -> CarrierResult<T> {
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Makes a GET request with query parameters and additional headers.
    ///
    /// # Errors
    ///
    /// Same as [`post`](Self::post).
    pub async fn get_with_params_and_headers<T: DeserializeOwned, P: Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
        headers: HeaderMap,
    ) -> CarrierResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Handles the HTTP response, checking status and deserializing JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> CarrierResult<T> {
        let status = response.status();
        let retry_after_ms = retry_after_ms(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| CarrierFault::connection(format!("Failed to read response: {}", e)))?;

        if status.is_success() {
            serde_json::from_str::<T>(&body)
                .map_err(|e| CarrierFault::malformed(format!("Failed to parse response: {}", e)))
        } else {
            Err(map_status_error(status, &body, retry_after_ms))
        }
    }

    /// Maps a reqwest error to a CarrierFault.
    fn map_reqwest_error(&self, error: reqwest::Error) -> CarrierFault {
        if error.is_timeout() {
            CarrierFault::timeout_with_duration("Request timed out", self.timeout_ms)
        } else if error.is_connect() {
            CarrierFault::connection(format!("Connection failed: {}", error))
        } else {
            CarrierFault::connection(format!("HTTP request failed: {}", error))
        }
    }
}

/// Maps an HTTP status code to a CarrierFault.
///
/// Client errors other than authentication keep the raw body as the
/// message so carrier adapters can extract their own error codes.
fn map_status_error(status: StatusCode, body: &str, retry_after_ms: Option<u64>) -> CarrierFault {
    let body = truncate(body);
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => CarrierFault::rejected(body),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CarrierFault::authentication(format!("Authentication failed: {}", body))
        }
        StatusCode::NOT_FOUND => CarrierFault::malformed(format!("Resource not found: {}", body)),
        StatusCode::TOO_MANY_REQUESTS => match retry_after_ms {
            Some(ms) => CarrierFault::rate_limited_with_retry("Rate limit exceeded", ms),
            None => CarrierFault::rate_limited("Rate limit exceeded"),
        },
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            CarrierFault::connection(format!("Server error ({}): {}", status, body))
        }
        _ => CarrierFault::malformed(format!("HTTP error ({}): {}", status, body)),
    }
}

fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_LEN) {
        Some((idx, _)) => format!("{}...", body.get(..idx).unwrap_or(body)),
        None => body.to_string(),
    }
}
