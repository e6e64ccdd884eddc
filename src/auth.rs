use crate::{credits::CreditOwner, error::AppError, providers::supabase, state::AppState};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

pub const DEVICE_ID_HEADER: &str = "x-device-id";

const MAX_DEVICE_ID_LEN: usize = 128;

/// Identity attached to each request on credit-bearing routes
#[derive(Debug, Clone)]
pub struct Requester {
    pub owner: CreditOwner,
}

/// Resolve the caller to a [`CreditOwner`]
///
/// A bearer token wins when account sign-in is enabled; otherwise the `X-Device-Id`
/// header identifies an anonymous visitor.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_config = state.config.load().auth.clone();

    // the Authorization header is ignored entirely while account sign-in is off
    let token = if auth_config.enabled {
        bearer_token(req.headers())?.map(str::to_owned)
    } else {
        None
    };

    let owner = match token {
        Some(token) => {
            let user = supabase::verify_session(&state.http_client, &auth_config, &token).await?;
            CreditOwner::User(user.id)
        }
        None => CreditOwner::Device(device_id(req.headers())?),
    };

    tracing::debug!(owner = %owner, "Request identity resolved");
    req.extensions_mut().insert(Requester { owner });

    Ok(next.run(req).await)
}

/// Bearer token from the Authorization header, if one is present
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("Authorization header is not valid text".to_string()))?;

    let token = value.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Authorization header must use Bearer scheme".to_string())
    })?;
    if token.is_empty() {
        return Err(AppError::Unauthorized("Bearer token is empty".to_string()));
    }
    Ok(Some(token))
}

fn device_id(headers: &HeaderMap) -> Result<String, AppError> {
    let id = headers
        .get(DEVICE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing X-Device-Id header".to_string()))?;

    if is_valid_device_id(id) {
        Ok(id.to_string())
    } else {
        Err(AppError::BadRequest(
            "X-Device-Id must be 1-128 characters of letters, digits, '-' or '_'".to_string(),
        ))
    }
}

pub fn is_valid_device_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_DEVICE_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
