use std::time::Duration;

use thiserror::Error;

use crate::domain::DomainError;

/// Failures a hotel provider adapter can report
///
/// The gateway recovers from every variant by switching to synthetic results.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Not implemented: {0}")]
    Unimplemented(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl ProviderError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn unimplemented(message: impl Into<String>) -> Self {
        Self::Unimplemented(message.into())
    }

    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Authentication(_) => "authentication",
            Self::Upstream { .. } => "upstream",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Unimplemented(_) => "unimplemented",
            Self::Timeout(_) => "timeout",
        }
    }

    /// Lifts the error into the domain, tagged with the adapter that raised it
    pub fn into_domain(self, provider: &str) -> DomainError {
        DomainError::provider(provider, self.to_string())
    }
}
