use crate::error_category::ErrorCategory;
use crate::i18n::{Language, MessageKey, MessageLookup, Translator};
use axum::{
    extract::Request,
    http::{header::ACCEPT_LANGUAGE, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Malformed or out-of-range request
    #[error("Bad request: {0}")]
    BadRequest(String),
    /// Missing, invalid or expired identity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// Credit balance is zero
    #[error("Insufficient credits")]
    InsufficientCredits,
    /// Upstream rate limit (HTTP 429)
    #[error("Rate limited: {0}")]
    RateLimited(String),
    /// Upstream account quota exhausted (HTTP 402)
    #[error("Quota exhausted: {0}")]
    QuotaExhausted(String),
    /// Generation returned no usable image
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
    /// Uploaded image rejected
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    /// Payment provider rejected the operation
    #[error("Payment error: {0}")]
    PaymentError(String),
    /// Webhook signature verification failed
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    /// Remote service not configured
    #[error("Provider disabled: {0}")]
    ProviderDisabled(String),
    /// Upstream API error
    #[error("Upstream error ({status}): {message}")]
    UpstreamError { status: StatusCode, message: String },
    #[error("Internal error: {0}")]
    InternalError(String),
    /// HTTP request error (preserves reqwest::Error for connectivity detection)
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientCredits => StatusCode::PAYMENT_REQUIRED,
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::QuotaExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidImage(_) => StatusCode::BAD_REQUEST,
            Self::PaymentError(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidSignature(_) => StatusCode::BAD_REQUEST,
            Self::ProviderDisabled(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::UpstreamError { status, .. } => *status,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::HttpRequest(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_error(self)
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::ConfigError(_) => "config_error",
        AppError::BadRequest(_) => "bad_request",
        AppError::Unauthorized(_) => "unauthorized",
        AppError::NotFound(_) => "not_found",
        AppError::InsufficientCredits => "insufficient_credits",
        AppError::RateLimited(_) => "rate_limited",
        AppError::QuotaExhausted(_) => "quota_exhausted",
        AppError::GenerationFailed(_) => "generation_failed",
        AppError::InvalidImage(_) => "invalid_image",
        AppError::PaymentError(_) => "payment_error",
        AppError::InvalidSignature(_) => "invalid_signature",
        AppError::ProviderDisabled(_) => "provider_disabled",
        AppError::UpstreamError { .. } => "upstream_error",
        AppError::InternalError(_) => "internal_error",
        AppError::HttpRequest(_) => "http_request_error",
    }
}

/// Everything needed to render an error body in any language
///
/// Attached to error responses as an extension so [`localize_errors`] can re-render it.
#[derive(Debug, Clone)]
pub struct ErrorPayload {
    pub message: String,
    pub error_type: &'static str,
    pub category: ErrorCategory,
}

impl ErrorPayload {
    pub fn render(&self, labels: &impl MessageLookup) -> serde_json::Value {
        json!({
            "error": {
                "message": self.message,
                "type": self.error_type,
                "category": self.category.as_str(),
                "user_message": labels.text(MessageKey::UserError(self.category)),
            }
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let payload = ErrorPayload {
            message: self.to_string(),
            error_type: error_type_name(&self),
            category: self.category(),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, category = payload.category.as_str(), "Request failed");
        } else {
            tracing::warn!(error = %self, category = payload.category.as_str(), "Request rejected");
        }

        let mut response = (status, Json(payload.render(&Translator::default()))).into_response();
        response.extensions_mut().insert(payload);
        response
    }
}

/// Re-render error bodies in the language requested by the client
pub async fn localize_errors(req: Request, next: Next) -> Response {
    let language = req
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default();

    let mut response = next.run(req).await;
    if language == Language::English {
        return response;
    }

    match response.extensions_mut().remove::<ErrorPayload>() {
        Some(payload) => {
            let status = response.status();
            let body = payload.render(&Translator::for_language(language));
            (status, Json(body)).into_response()
        }
        None => response,
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AppError::NotFound("share abc123".to_string());
        assert_eq!(error.to_string(), "Not found: share abc123");
        assert_eq!(AppError::InsufficientCredits.to_string(), "Insufficient credits");
    }

    #[test]
    fn test_error_type_name() {
        assert_eq!(error_type_name(&AppError::Unauthorized("test".to_string())), "unauthorized");
        assert_eq!(error_type_name(&AppError::InsufficientCredits), "insufficient_credits");
    }

    #[tokio::test]
    async fn test_error_response_status() {
        let response = AppError::Unauthorized("Missing identity".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AppError::InsufficientCredits.into_response();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

        let response = AppError::RateLimited("slow down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_error_response_carries_payload() {
        let response = AppError::InvalidImage("empty".to_string()).into_response();
        let payload = response.extensions().get::<ErrorPayload>().unwrap();
        assert_eq!(payload.category, ErrorCategory::Upload);
        assert_eq!(payload.error_type, "invalid_image");
    }

    #[test]
    fn test_payload_render_localized() {
        let payload = ErrorPayload {
            message: "Insufficient credits".to_string(),
            error_type: "insufficient_credits",
            category: ErrorCategory::InsufficientCredits,
        };
        let body = payload.render(&Translator::for_language(Language::German));
        assert_eq!(body["error"]["category"], "insufficient_credits");
        assert!(body["error"]["user_message"].as_str().unwrap().contains("Credits"));
    }
}
