//! Resolve bearer tokens to user ids against a Supabase-style auth server

use crate::{config::AuthConfig, error::AppError, logging::sanitize_log_value};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// `GET {base_url}/auth/v1/user` with the caller's access token
pub async fn verify_session(
    client: &Client,
    config: &AuthConfig,
    token: &str,
) -> Result<SessionUser, AppError> {
    if !config.enabled {
        return Err(AppError::ProviderDisabled(
            "Account sign-in is not configured".to_string(),
        ));
    }

    let url = format!("{}/auth/v1/user", config.base_url.trim_end_matches('/'));
    let response = client
        .get(&url)
        .header("apikey", &config.anon_key)
        .bearer_auth(token)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .send()
        .await?;

    let status = response.status();
    match status {
        s if s.is_success() => {
            let user: SessionUser = response.json().await?;
            if user.id.is_empty() {
                return Err(AppError::Unauthorized("Session has no user id".to_string()));
            }
            Ok(user)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            tracing::debug!(status = %status, "Session token rejected");
            Err(AppError::Unauthorized("Session expired".to_string()))
        }
        _ => {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                error = %sanitize_log_value(&error_text),
                "Auth server returned an error"
            );
            Err(AppError::UpstreamError {
                status,
                message: error_text,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config(base_url: String) -> AuthConfig {
        AuthConfig {
            enabled: true,
            base_url,
            anon_key: "anon-key".to_string(),
            timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn test_valid_session() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/auth/v1/user")
                    .header("apikey", "anon-key")
                    .header("authorization", "Bearer token-1");
                then.status(200)
                    .json_body(json!({"id": "user-42", "email": "a@example.com"}));
            })
            .await;

        let user = verify_session(&Client::new(), &config(server.base_url()), "token-1")
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(user.id, "user-42");
        assert_eq!(user.email.as_deref(), Some("a@example.com"));
    }

    #[tokio::test]
    async fn test_expired_session_is_unauthorized() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/auth/v1/user");
                then.status(401).json_body(json!({"msg": "JWT expired"}));
            })
            .await;

        let result = verify_session(&Client::new(), &config(server.base_url()), "old").await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_server_error_is_upstream() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/auth/v1/user");
                then.status(500).body("boom");
            })
            .await;

        let result = verify_session(&Client::new(), &config(server.base_url()), "t").await;
        assert!(matches!(result, Err(AppError::UpstreamError { .. })));
    }
}
