//! # Billing Error Types
//!
//! Typed error handling for the subscribe-rs checkout engine.
//! All billing operations return `Result<T, BillingError>`.

use thiserror::Error;

/// Core error type for all billing operations
#[derive(Debug, Error)]
pub enum BillingError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid caller input, rejected before any provider call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Currency code not supported
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// Amount below the provider minimum for the currency
    #[error("Amount {amount} below minimum {minimum} for {currency}")]
    AmountBelowMinimum {
        amount: i64,
        minimum: i64,
        currency: String,
    },

    /// Internal invariant violated before a provider call (e.g. id-less customer)
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Billing provider API error, message preserved for diagnostics
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Network/HTTP error communicating with the provider
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BillingError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BillingError::Network(_) | BillingError::Provider { .. }
        )
    }

    /// Returns true if the caller, not the provider or this service, caused it
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            BillingError::Configuration(_) => 500,
            BillingError::Validation(_) => 400,
            BillingError::UnsupportedCurrency { .. } => 400,
            BillingError::AmountBelowMinimum { .. } => 400,
            BillingError::Precondition(_) => 500,
            BillingError::Provider { .. } => 502,
            BillingError::Network(_) => 503,
            BillingError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for billing operations
pub type BillingResult<T> = Result<T, BillingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(BillingError::Network("timeout".into()).is_retryable());
        assert!(BillingError::Provider {
            provider: "stripe".into(),
            message: "rate limited".into()
        }
        .is_retryable());
        assert!(!BillingError::Validation("bad data".into()).is_retryable());
        assert!(!BillingError::Precondition("no id".into()).is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(BillingError::Validation("test".into()).status_code(), 400);
        assert_eq!(
            BillingError::UnsupportedCurrency {
                currency: "xyz".into()
            }
            .status_code(),
            400
        );
        assert_eq!(
            BillingError::Provider {
                provider: "stripe".into(),
                message: "boom".into()
            }
            .status_code(),
            502
        );
        assert_eq!(BillingError::Precondition("no id".into()).status_code(), 500);
        assert_eq!(BillingError::Network("refused".into()).status_code(), 503);
    }

    #[test]
    fn test_client_error_classification() {
        assert!(BillingError::Validation("missing email".into()).is_client_error());
        assert!(!BillingError::Provider {
            provider: "stripe".into(),
            message: "boom".into()
        }
        .is_client_error());
    }

    #[test]
    fn test_provider_message_preserved() {
        let err = BillingError::Provider {
            provider: "stripe".into(),
            message: "No such customer: cus_404".into(),
        };
        assert!(err.to_string().contains("No such customer: cus_404"));
    }
}
