use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Invalid query: {message}")]
    InvalidQuery {
        message: String,
        param: Option<String>,
    },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Fallback exhausted: {message}")]
    ExhaustedFallback { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
            param: None,
        }
    }

    /// Invalid query pointing at the offending parameter
    pub fn invalid_param(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
            param: Some(param.into()),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn exhausted_fallback(message: impl Into<String>) -> Self {
        Self::ExhaustedFallback {
            message: message.into(),
        }
    }

    /// Returns true if the error was caused by caller input
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, Self::InvalidQuery { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Cache entry 'abc' not found");
        assert_eq!(error.to_string(), "Not found: Cache entry 'abc' not found");
    }

    #[test]
    fn test_invalid_query_error() {
        let error = DomainError::invalid_query("checkout must be after checkin");
        assert_eq!(
            error.to_string(),
            "Invalid query: checkout must be after checkin"
        );
        assert!(error.is_invalid_query());
    }

    #[test]
    fn test_invalid_param_keeps_param_name() {
        let error = DomainError::invalid_param("radius", "radius must be positive");

        match error {
            DomainError::InvalidQuery { param, .. } => {
                assert_eq!(param.as_deref(), Some("radius"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_provider_error() {
        let error = DomainError::provider("booking", "HTTP 503");
        assert_eq!(error.to_string(), "Provider error: booking - HTTP 503");
        assert!(!error.is_invalid_query());
    }
}
