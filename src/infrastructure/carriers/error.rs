//! # Carrier Faults
//!
//! Error types reported by carrier rate clients.
//!
//! A [`CarrierFault`] describes *what* went wrong inside one carrier
//! lookup. The application layer pairs it with the carrier identity to
//! form a [`CarrierError`](crate::application::error::CarrierError).
//!
//! # Examples
//!
//! ```
//! use shipping_rates::infrastructure::carriers::error::CarrierFault;
//!
//! let fault = CarrierFault::timeout("Request timed out after 5000ms");
//! assert!(fault.is_retryable());
//!
//! let fault = CarrierFault::authentication("Invalid access token");
//! assert!(!fault.is_retryable());
//! ```

use thiserror::Error;

/// Error type for carrier rate lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarrierFault {
    /// Request timed out.
    #[error("carrier timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("carrier connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Authentication or authorization failure.
    #[error("carrier authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("carrier rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
        /// Retry after duration in milliseconds.
        retry_after_ms: Option<u64>,
    },

    /// The shipment cannot be expressed in the carrier's request format.
    #[error("carrier invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// The carrier processed the request and refused it.
    #[error("carrier rejected request: {message}")]
    Rejected {
        /// Error message.
        message: String,
        /// Carrier-specific error code.
        error_code: Option<String>,
    },

    /// The response could not be parsed or normalized.
    #[error("carrier malformed response: {message}")]
    MalformedResponse {
        /// Error message.
        message: String,
    },

    /// No client is registered under the requested carrier id.
    #[error("carrier not registered")]
    NotRegistered,

    /// Internal client error.
    #[error("carrier internal error: {message}")]
    InternalError {
        /// Error message.
        message: String,
    },
}

impl CarrierFault {
    /// Creates a timeout fault.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout fault with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection fault.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates an authentication fault.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a rate limited fault.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms: None,
        }
    }

    /// Creates a rate limited fault with retry duration.
    #[must_use]
    pub fn rate_limited_with_retry(message: impl Into<String>, retry_after_ms: u64) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms: Some(retry_after_ms),
        }
    }

    /// Creates an invalid request fault.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a rejection fault.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            error_code: None,
        }
    }

    /// Creates a rejection fault with the carrier's error code.
    #[must_use]
    pub fn rejected_with_code(message: impl Into<String>, error_code: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            error_code: Some(error_code.into()),
        }
    }

    /// Creates a malformed response fault.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Creates an internal fault.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Returns true if this fault is transient.
    ///
    /// Informational only: retries belong to the carrier client.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connection { .. } | Self::RateLimited { .. }
        )
    }

    /// Returns true if the request itself was at fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. } | Self::Authentication { .. } | Self::NotRegistered
        )
    }

    /// Returns the retry delay in milliseconds, if applicable.
    #[must_use]
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }

    /// Returns the carrier's error code, if any.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Rejected { error_code, .. } => error_code.as_deref(),
            _ => None,
        }
    }
}

/// Result type for carrier operations.
pub type CarrierResult<T> = Result<T, CarrierFault>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_retryable() {
        let fault = CarrierFault::timeout_with_duration("test", 5000);
        assert!(fault.is_retryable());
        assert!(!fault.is_client_error());
    }

    #[test]
    fn rate_limited_is_retryable() {
        let fault = CarrierFault::rate_limited_with_retry("test", 1000);
        assert!(fault.is_retryable());
        assert_eq!(fault.retry_after_ms(), Some(1000));
    }

    #[test]
    fn authentication_is_client_error() {
        let fault = CarrierFault::authentication("test");
        assert!(!fault.is_retryable());
        assert!(fault.is_client_error());
    }

    #[test]
    fn rejected_with_code() {
        let fault = CarrierFault::rejected_with_code("Invalid postal code", "111285");
        assert_eq!(fault.error_code(), Some("111285"));
        assert!(!fault.is_retryable());
    }

    #[test]
    fn malformed_is_neither() {
        let fault = CarrierFault::malformed("missing RatedShipment");
        assert!(!fault.is_retryable());
        assert!(!fault.is_client_error());
    }

    #[test]
    fn display_format() {
        let fault = CarrierFault::connection("refused");
        assert_eq!(fault.to_string(), "carrier connection error: refused");
        assert_eq!(CarrierFault::NotRegistered.to_string(), "carrier not registered");
    }
}
