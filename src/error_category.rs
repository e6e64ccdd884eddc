//! Mapping of failures to user-facing message categories
//!
//! Structured errors are classified by variant and status code. Only opaque upstream text
//! (an error body we could not interpret) goes through substring matching.

use crate::error::AppError;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    RateLimit,
    SessionExpired,
    InsufficientCredits,
    Network,
    GenerationUnavailable,
    Upload,
    Payment,
    Generic,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::RateLimit => "rate_limit",
            ErrorCategory::SessionExpired => "session_expired",
            ErrorCategory::InsufficientCredits => "insufficient_credits",
            ErrorCategory::Network => "network",
            ErrorCategory::GenerationUnavailable => "generation_unavailable",
            ErrorCategory::Upload => "upload",
            ErrorCategory::Payment => "payment",
            ErrorCategory::Generic => "generic",
        }
    }

    pub fn from_error(error: &AppError) -> Self {
        match error {
            AppError::RateLimited(_) => ErrorCategory::RateLimit,
            AppError::Unauthorized(_) => ErrorCategory::SessionExpired,
            AppError::InsufficientCredits => ErrorCategory::InsufficientCredits,
            AppError::QuotaExhausted(_) => ErrorCategory::GenerationUnavailable,
            AppError::GenerationFailed(_) => ErrorCategory::GenerationUnavailable,
            AppError::InvalidImage(_) => ErrorCategory::Upload,
            AppError::PaymentError(_) | AppError::InvalidSignature(_) => ErrorCategory::Payment,
            AppError::HttpRequest(e) if e.is_connect() || e.is_timeout() => ErrorCategory::Network,
            AppError::UpstreamError { status, message } => {
                Self::from_status(*status).unwrap_or_else(|| Self::from_message(message))
            }
            AppError::HttpRequest(_)
            | AppError::ConfigError(_)
            | AppError::BadRequest(_)
            | AppError::NotFound(_)
            | AppError::ProviderDisabled(_)
            | AppError::InternalError(_) => ErrorCategory::Generic,
        }
    }

    fn from_status(status: StatusCode) -> Option<Self> {
        match status.as_u16() {
            429 => Some(ErrorCategory::RateLimit),
            401 | 403 => Some(ErrorCategory::SessionExpired),
            402 => Some(ErrorCategory::InsufficientCredits),
            _ => None,
        }
    }

    /// Classify free-form error text by keyword
    ///
    /// Depends on upstream wording, so it is the last resort after structured checks.
    pub fn from_message(message: &str) -> Self {
        let text = message.to_lowercase();
        let contains_any = |needles: &[&str]| needles.iter().any(|n| text.contains(n));

        if contains_any(&["rate limit", "too many requests", "429"]) {
            ErrorCategory::RateLimit
        } else if contains_any(&["jwt", "session", "unauthorized", "not authenticated", "token expired"]) {
            ErrorCategory::SessionExpired
        } else if contains_any(&["credit"]) {
            ErrorCategory::InsufficientCredits
        } else if contains_any(&["network", "failed to fetch", "connection", "timed out", "timeout"]) {
            ErrorCategory::Network
        } else if contains_any(&["upload", "storage", "bucket", "image"]) {
            ErrorCategory::Upload
        } else if contains_any(&["payment", "stripe", "checkout", "card"]) {
            ErrorCategory::Payment
        } else if contains_any(&["generation", "gateway", "unavailable", "503", "502"]) {
            ErrorCategory::GenerationUnavailable
        } else {
            ErrorCategory::Generic
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_classification() {
        assert_eq!(
            ErrorCategory::from_error(&AppError::RateLimited("slow down".to_string())),
            ErrorCategory::RateLimit
        );
        assert_eq!(
            ErrorCategory::from_error(&AppError::InsufficientCredits),
            ErrorCategory::InsufficientCredits
        );
        assert_eq!(
            ErrorCategory::from_error(&AppError::QuotaExhausted("add funds".to_string())),
            ErrorCategory::GenerationUnavailable
        );
        assert_eq!(
            ErrorCategory::from_error(&AppError::InvalidImage("not a png".to_string())),
            ErrorCategory::Upload
        );
    }

    #[test]
    fn test_upstream_status_wins_over_text() {
        let error = AppError::UpstreamError {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "payment required".to_string(),
        };
        assert_eq!(ErrorCategory::from_error(&error), ErrorCategory::RateLimit);
    }

    #[test]
    fn test_upstream_text_fallback() {
        let error = AppError::UpstreamError {
            status: StatusCode::BAD_REQUEST,
            message: "Your card was declined".to_string(),
        };
        assert_eq!(ErrorCategory::from_error(&error), ErrorCategory::Payment);
    }

    #[test]
    fn test_message_classification() {
        assert_eq!(ErrorCategory::from_message("Rate limit exceeded"), ErrorCategory::RateLimit);
        assert_eq!(ErrorCategory::from_message("JWT expired"), ErrorCategory::SessionExpired);
        assert_eq!(ErrorCategory::from_message("Insufficient credits"), ErrorCategory::InsufficientCredits);
        assert_eq!(ErrorCategory::from_message("Failed to fetch"), ErrorCategory::Network);
        assert_eq!(ErrorCategory::from_message("Storage bucket not found"), ErrorCategory::Upload);
        assert_eq!(ErrorCategory::from_message("AI gateway unavailable"), ErrorCategory::GenerationUnavailable);
        assert_eq!(ErrorCategory::from_message("boom"), ErrorCategory::Generic);
    }
}
