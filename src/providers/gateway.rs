//! AI image generation through an OpenAI-compatible chat completions gateway

use crate::{
    config::GenerationConfig,
    design::{ArchitecturalStyle, MaterialPalette, RoomType},
    error::AppError,
    image_utils::UploadedImage,
    logging::sanitize_log_value,
    models::gateway::{ChatMessage, ChatRequest, ChatResponse, ContentPart, ImageUrl},
};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// What to visualize
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub image: UploadedImage,
    pub room_type: RoomType,
    pub palette: MaterialPalette,
    pub style: ArchitecturalStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    /// Generated image as a data URL
    pub image: String,
    pub description: String,
}

pub fn build_prompt(room_type: RoomType, palette: MaterialPalette, style: ArchitecturalStyle) -> String {
    format!(
        "Redesign this {room} as a photorealistic interior visualization. \
         Keep the existing architecture, windows, doors and camera perspective unchanged. \
         Materials: {materials}. Style: {style}. \
         Then describe the main design choices in two or three sentences.",
        room = room_type.description(),
        materials = palette.description(),
        style = style.description(),
    )
}

fn build_chat_request(config: &GenerationConfig, request: &GenerationRequest) -> ChatRequest {
    ChatRequest {
        model: config.model.clone(),
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: vec![
                ContentPart::Text {
                    text: build_prompt(request.room_type, request.palette, request.style),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: request.image.data_url(),
                    },
                },
            ],
        }],
        modalities: vec!["image".to_string(), "text".to_string()],
    }
}

/// Call the gateway and extract the generated image
///
/// 429 maps to [`AppError::RateLimited`], 402 to [`AppError::QuotaExhausted`].
pub async fn generate_visualization(
    client: &Client,
    config: &GenerationConfig,
    request: &GenerationRequest,
) -> Result<GenerationResult, AppError> {
    if !config.enabled {
        return Err(AppError::ProviderDisabled(
            "Image generation is not configured".to_string(),
        ));
    }

    let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
    let body = build_chat_request(config, request);

    tracing::debug!(
        model = %config.model,
        room_type = ?request.room_type,
        palette = ?request.palette,
        style = ?request.style,
        "Sending generation request"
    );

    let response = client
        .post(&url)
        .bearer_auth(&config.api_key)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::warn!(
            status = %status,
            error = %sanitize_log_value(&error_text),
            "Generation gateway returned an error"
        );

        return Err(match status {
            StatusCode::TOO_MANY_REQUESTS => AppError::RateLimited(error_text),
            StatusCode::PAYMENT_REQUIRED => AppError::QuotaExhausted(error_text),
            // the server's own gateway key was refused; not the caller's session
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::GenerationFailed(
                format!("Generation gateway rejected credentials ({})", status),
            ),
            _ => AppError::UpstreamError {
                status,
                message: error_text,
            },
        });
    }

    let body: ChatResponse = response.json().await?;
    let message = body
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| AppError::GenerationFailed("Gateway returned no choices".to_string()))?;

    let image = message
        .images
        .into_iter()
        .next()
        .map(|image| image.image_url.url)
        .ok_or_else(|| AppError::GenerationFailed("Gateway returned no image".to_string()))?;

    Ok(GenerationResult {
        image,
        description: message.content.unwrap_or_default(),
    })
}
