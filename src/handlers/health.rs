use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

/// Liveness probe
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "interior-studio",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// Readiness probe, reporting which remote integrations are configured
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config.load();
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "service": "interior-studio",
            "integrations": {
                "generation": config.generation.enabled,
                "payments": config.stripe.enabled,
                "accounts": config.auth.enabled,
            },
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[tokio::test]
    async fn test_health_check_returns_ok() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_reports_integrations() {
        let state = AppState::new(test_config());
        let response = readiness_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["integrations"]["generation"], true);
        assert_eq!(json["integrations"]["accounts"], false);
    }
}
