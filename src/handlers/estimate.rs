use super::{parse_json, request_language};
use crate::{
    error::AppError,
    estimate::{calculate_costs, CostCalculation, EstimateInput},
    i18n::Translator,
    metrics,
};
use axum::{body::Bytes, http::HeaderMap, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    /// Language the labels were rendered in
    pub language: &'static str,
    #[serde(flatten)]
    pub calculation: CostCalculation,
}

/// `POST /api/estimate`
pub async fn handle_estimate(
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<EstimateResponse>, AppError> {
    let input: EstimateInput = parse_json(&body)?;
    let translator = Translator::for_language(request_language(&headers));

    let calculation = calculate_costs(&input, &translator);
    metrics::record_estimate(input.tier.as_str(), input.is_urgent);

    tracing::debug!(
        tier = input.tier.as_str(),
        area = input.area,
        urgent = input.is_urgent,
        total = calculation.total,
        "Estimate computed"
    );

    Ok(Json(EstimateResponse {
        language: translator.language().code(),
        calculation,
    }))
}
