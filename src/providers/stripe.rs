//! Stripe Checkout sessions and webhook signature verification

use crate::{
    config::StripeConfig,
    credits::CreditOwner,
    error::AppError,
    logging::sanitize_log_value,
    models::stripe::{CheckoutSession, CompletedSession, StripeErrorBody},
};
use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;
use std::time::Duration;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

const DEVICE_ID_KEY: &str = "device_id";
const USER_ID_KEY: &str = "user_id";
const CREDITS_KEY: &str = "credits";

/// Create a hosted checkout session for one credit pack
pub async fn create_checkout_session(
    client: &Client,
    config: &StripeConfig,
    owner: &CreditOwner,
) -> Result<CheckoutSession, AppError> {
    if !config.enabled {
        return Err(AppError::ProviderDisabled(
            "Payments are not configured".to_string(),
        ));
    }

    let url = format!("{}/checkout/sessions", config.base_url.trim_end_matches('/'));
    let form = checkout_form(config, owner);

    tracing::debug!(owner = %owner, price_cents = config.price_cents, "Creating checkout session");

    let response = client
        .post(&url)
        .bearer_auth(&config.secret_key)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .form(&form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<StripeErrorBody>(&error_text)
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or(error_text);
        tracing::warn!(
            status = %status,
            error = %sanitize_log_value(&message),
            "Stripe rejected checkout session"
        );
        return Err(AppError::PaymentError(message));
    }

    let session: CheckoutSession = response.json().await?;
    if session.url.is_none() {
        return Err(AppError::PaymentError(
            "Checkout session has no redirect URL".to_string(),
        ));
    }
    Ok(session)
}

fn checkout_form(config: &StripeConfig, owner: &CreditOwner) -> Vec<(String, String)> {
    let owner_key = match owner {
        CreditOwner::Device(_) => DEVICE_ID_KEY,
        CreditOwner::User(_) => USER_ID_KEY,
    };

    vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), config.success_url.clone()),
        ("cancel_url".to_string(), config.cancel_url.clone()),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        (
            "line_items[0][price_data][currency]".to_string(),
            config.currency.to_lowercase(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            config.price_cents.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            config.product_name.clone(),
        ),
        (format!("metadata[{owner_key}]"), owner.id().to_string()),
        (
            format!("metadata[{CREDITS_KEY}]"),
            config.credits_per_purchase.to_string(),
        ),
    ]
}

/// Check a `Stripe-Signature` header against the raw request body
///
/// Header format: `t=<unix>,v1=<hex>[,v1=<hex>...]`. Any matching `v1` is accepted.
pub fn verify_webhook_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_seconds: i64,
    now: i64,
) -> Result<(), AppError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = value.parse().ok();
            }
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| AppError::InvalidSignature("Missing timestamp".to_string()))?;
    if signatures.is_empty() {
        return Err(AppError::InvalidSignature("Missing v1 signature".to_string()));
    }

    let expected = compute_signature(payload, timestamp, secret)?;
    let matched = signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| bool::from(bytes.ct_eq(&expected)))
            .unwrap_or(false)
    });
    if !matched {
        return Err(AppError::InvalidSignature(
            "No signature matches the payload".to_string(),
        ));
    }

    if (now - timestamp).abs() > tolerance_seconds {
        return Err(AppError::InvalidSignature(
            "Timestamp outside the tolerance window".to_string(),
        ));
    }

    Ok(())
}

fn compute_signature(payload: &[u8], timestamp: i64, secret: &str) -> Result<Vec<u8>, AppError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::InternalError(format!("Invalid webhook secret: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Build a header value the way Stripe signs events
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> Result<String, AppError> {
    let signature = compute_signature(payload, timestamp, secret)?;
    Ok(format!("t={},v1={}", timestamp, hex::encode(signature)))
}

/// Who paid and how many credits they bought
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub owner: CreditOwner,
    pub credits: u32,
}

/// Read the purchase from a completed session's metadata
///
/// A user id wins over a device id. `fallback_credits` is used when the
/// metadata carries no usable amount.
pub fn purchase_from_session(
    session: &CompletedSession,
    fallback_credits: u32,
) -> Result<Purchase, AppError> {
    let owner = session
        .metadata
        .get(USER_ID_KEY)
        .filter(|id| !id.is_empty())
        .map(|id| CreditOwner::User(id.clone()))
        .or_else(|| {
            session
                .metadata
                .get(DEVICE_ID_KEY)
                .filter(|id| !id.is_empty())
                .map(|id| CreditOwner::Device(id.clone()))
        })
        .ok_or_else(|| {
            AppError::BadRequest(format!("Session {} has no owner metadata", session.id))
        })?;

    let credits = session
        .metadata
        .get(CREDITS_KEY)
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|&credits| credits > 0)
        .unwrap_or(fallback_credits);

    Ok(Purchase { owner, credits })
}

pub fn is_paid(session: &CompletedSession) -> bool {
    session.payment_status.as_deref() == Some("paid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::collections::HashMap;

    const SECRET: &str = "whsec_test";
    const NOW: i64 = 1_700_000_000;

    fn config(base_url: String) -> StripeConfig {
        let mut cfg = crate::config::test_config().stripe;
        cfg.base_url = base_url;
        cfg
    }

    #[test]
    fn test_valid_signature() {
        let payload = br#"{"id":"evt_1"}"#;
        let header = sign_payload(payload, SECRET, NOW).unwrap();
        assert!(verify_webhook_signature(payload, &header, SECRET, 300, NOW + 10).is_ok());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let header = sign_payload(br#"{"id":"evt_1"}"#, SECRET, NOW).unwrap();
        let result = verify_webhook_signature(br#"{"id":"evt_2"}"#, &header, SECRET, 300, NOW);
        assert!(matches!(result, Err(AppError::InvalidSignature(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = b"{}";
        let header = sign_payload(payload, "whsec_other", NOW).unwrap();
        assert!(verify_webhook_signature(payload, &header, SECRET, 300, NOW).is_err());
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = b"{}";
        let header = sign_payload(payload, SECRET, NOW).unwrap();
        assert!(verify_webhook_signature(payload, &header, SECRET, 300, NOW + 301).is_err());
    }

    #[test]
    fn test_any_v1_signature_may_match() {
        let payload = b"{}";
        let valid = sign_payload(payload, SECRET, NOW).unwrap();
        let v1 = valid.split_once(",v1=").unwrap().1;
        let header = format!("t={},v1=deadbeef,v0=ignored,v1={}", NOW, v1);
        assert!(verify_webhook_signature(payload, &header, SECRET, 300, NOW).is_ok());
    }

    #[test]
    fn test_malformed_header() {
        assert!(verify_webhook_signature(b"{}", "garbage", SECRET, 300, NOW).is_err());
        assert!(verify_webhook_signature(b"{}", "t=abc,v1=00", SECRET, 300, NOW).is_err());
        assert!(verify_webhook_signature(b"{}", "t=1700000000", SECRET, 300, NOW).is_err());
    }

    #[test]
    fn test_checkout_form_metadata() {
        let cfg = config("http://unused".to_string());
        let form = checkout_form(&cfg, &CreditOwner::Device("device-abc".to_string()));
        let form: HashMap<_, _> = form.into_iter().collect();
        assert_eq!(form["mode"], "payment");
        assert_eq!(form["metadata[device_id]"], "device-abc");
        assert_eq!(form["metadata[credits]"], "10");
        assert_eq!(form["line_items[0][price_data][unit_amount]"], "499");
        assert!(!form.contains_key("metadata[user_id]"));
    }

    #[test]
    fn test_purchase_from_session_prefers_user() {
        let session = CompletedSession {
            id: "cs_1".to_string(),
            payment_status: Some("paid".to_string()),
            metadata: HashMap::from([
                ("device_id".to_string(), "device-abc".to_string()),
                ("user_id".to_string(), "user-42".to_string()),
                ("credits".to_string(), "25".to_string()),
            ]),
        };
        let purchase = purchase_from_session(&session, 10).unwrap();
        assert_eq!(purchase.owner, CreditOwner::User("user-42".to_string()));
        assert_eq!(purchase.credits, 25);
        assert!(is_paid(&session));
    }

    #[test]
    fn test_purchase_from_session_without_owner() {
        let session = CompletedSession {
            id: "cs_2".to_string(),
            payment_status: Some("unpaid".to_string()),
            metadata: HashMap::from([("credits".to_string(), "abc".to_string())]),
        };
        assert!(purchase_from_session(&session, 10).is_err());
        assert!(!is_paid(&session));
    }

    #[tokio::test]
    async fn test_create_checkout_session() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/checkout/sessions")
                    .header("authorization", "Bearer sk_test_123456789")
                    .body_includes("metadata%5Bdevice_id%5D=device-abc");
                then.status(200).json_body(json!({
                    "id": "cs_test_1",
                    "url": "https://checkout.stripe.com/c/pay/cs_test_1"
                }));
            })
            .await;

        let session = create_checkout_session(
            &Client::new(),
            &config(server.url("/v1")),
            &CreditOwner::Device("device-abc".to_string()),
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(session.id, "cs_test_1");
    }

    #[tokio::test]
    async fn test_checkout_error_message_surfaces() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/checkout/sessions");
                then.status(400).json_body(json!({
                    "error": {"type": "invalid_request_error", "message": "Invalid currency: xyz"}
                }));
            })
            .await;

        let result = create_checkout_session(
            &Client::new(),
            &config(server.url("/v1")),
            &CreditOwner::User("user-1".to_string()),
        )
        .await;

        match result {
            Err(AppError::PaymentError(message)) => assert_eq!(message, "Invalid currency: xyz"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
