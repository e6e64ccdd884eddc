pub mod checkout;
pub mod credits;
pub mod estimate;
pub mod generate;
pub mod health;
pub mod metrics_handler;
pub mod share;
pub mod webhook;

use crate::{error::AppError, i18n::Language};
use axum::http::{header::ACCEPT_LANGUAGE, HeaderMap};
use serde::de::DeserializeOwned;

/// Decode a JSON body so malformed input renders as an [`AppError`] body
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    if body.is_empty() {
        return Err(AppError::BadRequest("Request body is empty".to_string()));
    }
    Ok(serde_json::from_slice(body)?)
}

pub(crate) fn request_language(headers: &HeaderMap) -> Language {
    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default()
}
