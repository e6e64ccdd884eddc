use super::parse_json;
use crate::{
    auth::Requester,
    design::{ArchitecturalStyle, MaterialPalette, RoomType},
    error::AppError,
    image_utils::normalize_upload,
    metrics,
    providers::gateway::{generate_visualization, GenerationRequest},
    state::AppState,
};
use axum::{body::Bytes, extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Room photo as a data URL or bare base64
    pub image: String,
    pub room_type: RoomType,
    pub palette: MaterialPalette,
    pub style: ArchitecturalStyle,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub image: String,
    pub description: String,
    pub credits_remaining: u32,
}

/// `POST /api/generate`
///
/// One credit is reserved before the gateway is called and refunded if no image comes back,
/// so concurrent requests can never spend more than the balance.
pub async fn handle_generate(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, AppError> {
    let request: GenerateRequest = parse_json(&body)?;
    let request_id = uuid::Uuid::new_v4();
    let image = normalize_upload(&request.image)?;

    let credits_remaining = state.credits.reserve(&requester.owner).await?;

    let generation_config = state.config.load().generation.clone();
    let generation_request = GenerationRequest {
        image,
        room_type: request.room_type,
        palette: request.palette,
        style: request.style,
    };

    tracing::debug!(request_id = %request_id, owner = %requester.owner, "Starting visualization");
    let started = Instant::now();
    let result =
        generate_visualization(&state.http_client, &generation_config, &generation_request).await;
    let elapsed = started.elapsed();

    let result = match result {
        Ok(result) => {
            metrics::record_generation("success", elapsed);
            result
        }
        Err(e) => {
            metrics::record_generation(e.category().as_str(), elapsed);
            tracing::warn!(
                request_id = %request_id,
                owner = %requester.owner,
                error = %e,
                duration_ms = elapsed.as_millis() as u64,
                "Visualization failed"
            );
            if let Err(refund_error) = state.credits.refund(&requester.owner).await {
                tracing::error!(
                    request_id = %request_id,
                    owner = %requester.owner,
                    error = %refund_error,
                    "Failed to refund reserved credit"
                );
            }
            return Err(e);
        }
    };

    metrics::record_credit_consumed(requester.owner.kind());
    tracing::info!(
        request_id = %request_id,
        owner = %requester.owner,
        duration_ms = elapsed.as_millis() as u64,
        credits_remaining,
        "Visualization generated"
    );

    Ok(Json(GenerateResponse {
        image: result.image,
        description: result.description,
        credits_remaining,
    }))
}
