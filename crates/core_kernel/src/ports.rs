//! Ports and Adapters Infrastructure
//!
//! This module provides the foundational types for the hexagonal
//! architecture used by the quote engine. The engine reads reference data
//! (price books, campaigns, promo codes, tax rules) and stores quotes through
//! narrow port traits; adapters decide where the data actually lives.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    QuoteService (app_quote)                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Port Traits                           │
//! │  PriceBookLookup, CampaignLookup, PromoCodeLookup,           │
//! │  TaxRuleLookup, QuoteEventPublisher, QuoteCache              │
//! └─────────────────────────────────────────────────────────────┘
//!                    ▲                         ▲
//!         ┌─────────┴─────────┐     ┌────────┴────────┐
//!         │ In-memory adapter │     │ Remote adapter   │
//!         │ (tests, CLI)      │     │ (catalog / KV)   │
//!         └───────────────────┘     └──────────────────┘
//! ```

use thiserror::Error;

/// Error type for port operations
///
/// Absence is not an error here: lookups return `Option`. Callers decide on
/// retries from `is_transient` without knowing the backing technology.
#[derive(Debug, Error)]
pub enum PortError {
    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// The backing system is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so they can be shared across
/// concurrently running requests.
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_messages() {
        let error = PortError::connection("catalog refused connection");
        assert_eq!(error.to_string(), "Connection error: catalog refused connection");
        assert!(error.is_transient());
    }

    #[test]
    fn test_port_error_transient() {
        let timeout = PortError::Timeout {
            operation: "find_campaigns".to_string(),
            duration_ms: 250,
        };
        assert!(timeout.is_transient());

        let unavailable = PortError::ServiceUnavailable {
            service: "catalog".to_string(),
        };
        assert!(unavailable.is_transient());

        assert!(!PortError::internal("bad row").is_transient());
    }
}
