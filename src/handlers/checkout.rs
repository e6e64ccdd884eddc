use crate::{auth::Requester, error::AppError, providers::stripe, state::AppState};
use axum::{extract::State, Extension, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}

/// `POST /api/checkout`
pub async fn create_checkout(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let stripe_config = state.config.load().stripe.clone();
    let session =
        stripe::create_checkout_session(&state.http_client, &stripe_config, &requester.owner)
            .await?;

    tracing::info!(owner = %requester.owner, session_id = %session.id, "Checkout session created");

    let url = session
        .url
        .ok_or_else(|| AppError::PaymentError("Checkout session has no redirect URL".to_string()))?;
    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url,
    }))
}
