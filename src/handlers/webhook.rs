use crate::{
    error::AppError,
    models::stripe::{CompletedSession, StripeEvent},
    providers::stripe::{self, SIGNATURE_HEADER},
    state::AppState,
};
use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::Serialize;

const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    /// Whether this delivery changed a balance
    pub applied: bool,
}

/// `POST /api/stripe/webhook`
///
/// The signature covers the raw body, so the body is read as bytes before parsing.
/// An event id is applied at most once; a failed credit write releases the id so
/// Stripe's redelivery can retry it.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, AppError> {
    let stripe_config = state.config.load().stripe.clone();
    if !stripe_config.enabled {
        return Err(AppError::ProviderDisabled(
            "Payments are not configured".to_string(),
        ));
    }

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::InvalidSignature("Missing Stripe-Signature header".to_string()))?;

    stripe::verify_webhook_signature(
        &body,
        signature,
        &stripe_config.webhook_secret,
        stripe_config.webhook_tolerance_seconds,
        chrono::Utc::now().timestamp(),
    )?;

    let event: StripeEvent = serde_json::from_slice(&body)?;
    if event.event_type != CHECKOUT_COMPLETED {
        tracing::debug!(event_id = %event.id, event_type = %event.event_type, "Ignoring Stripe event");
        return Ok(Json(WebhookAck {
            received: true,
            applied: false,
        }));
    }

    let session: CompletedSession = serde_json::from_value(event.data.object)?;
    if !stripe::is_paid(&session) {
        tracing::info!(
            event_id = %event.id,
            session_id = %session.id,
            payment_status = ?session.payment_status,
            "Checkout completed without payment"
        );
        return Ok(Json(WebhookAck {
            received: true,
            applied: false,
        }));
    }

    let purchase = stripe::purchase_from_session(&session, stripe_config.credits_per_purchase)?;

    if !state.mark_event_processed(&event.id) {
        tracing::info!(event_id = %event.id, "Duplicate Stripe event ignored");
        return Ok(Json(WebhookAck {
            received: true,
            applied: false,
        }));
    }

    if let Err(e) = state.credits.add(&purchase.owner, purchase.credits).await {
        state.unmark_event(&event.id);
        return Err(e);
    }

    tracing::info!(
        event_id = %event.id,
        owner = %purchase.owner,
        credits = purchase.credits,
        "Purchase credited"
    );

    Ok(Json(WebhookAck {
        received: true,
        applied: true,
    }))
}
