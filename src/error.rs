//! Error types for the finance advisor

use thiserror::Error;

/// Result type alias for advisor operations
pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Message shown to end users whenever an analysis cannot be produced.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Analysis failed. Please check your data or API connection.";

#[derive(Error, Debug)]
pub enum AdvisorError {

    // =============================
    // Input
    // =============================

    #[error("Validation error: {0}")]
    Validation(String),

    // =============================
    // Provider boundary
    // =============================

    /// Provider reply could not be read as the advice shape.
    #[error("Malformed advice: {0}")]
    MalformedAdvice(String),

    /// Transport, authentication or quota failure talking to the provider.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AdvisorError {
    /// True for failures that surface to the user as "analysis failed".
    pub fn is_analysis_failure(&self) -> bool {
        matches!(
            self,
            AdvisorError::MalformedAdvice(_)
                | AdvisorError::Provider(_)
                | AdvisorError::HttpError(_)
        )
    }

    /// Short machine-readable name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AdvisorError::Validation(_) => "validation",
            AdvisorError::MalformedAdvice(_) => "malformed_advice",
            AdvisorError::Provider(_) => "provider",
            AdvisorError::Config(_) => "config",
            AdvisorError::SerializationError(_) => "serialization",
            AdvisorError::HttpError(_) => "http",
            AdvisorError::IoError(_) => "io",
        }
    }

    /// End-user text. Analysis failures collapse to one generic message.
    pub fn user_message(&self) -> String {
        if self.is_analysis_failure() {
            ANALYSIS_FAILED_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_and_malformed_collapse_to_same_message() {
        let provider = AdvisorError::Provider("429 quota exceeded".into());
        let malformed = AdvisorError::MalformedAdvice("missing riskLevel".into());

        assert!(provider.is_analysis_failure());
        assert!(malformed.is_analysis_failure());
        assert_eq!(provider.user_message(), malformed.user_message());
        assert_eq!(provider.user_message(), ANALYSIS_FAILED_MESSAGE);

        // kind survives for diagnostics
        assert_eq!(provider.kind(), "provider");
        assert_eq!(malformed.kind(), "malformed_advice");
    }

    #[test]
    fn test_validation_keeps_its_detail() {
        let err = AdvisorError::Validation("monthlyIncome is negative".into());
        assert!(!err.is_analysis_failure());
        assert!(err.user_message().contains("monthlyIncome"));
    }
}
