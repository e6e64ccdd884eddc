use super::parse_json;
use crate::{
    design::DesignSelections,
    error::AppError,
    share::SharedDesign,
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// `POST /api/share`
pub async fn create_share(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SharedDesign>), AppError> {
    let selections: DesignSelections = parse_json(&body)?;
    selections.validate().map_err(AppError::BadRequest)?;

    let shared = state.shares.create(selections)?;

    Ok((StatusCode::CREATED, Json(shared)))
}

/// `GET /api/share/:id`
pub async fn get_share(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SharedDesign>, AppError> {
    Ok(Json(state.shares.get(&id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::design::sample_selections;

    #[tokio::test]
    async fn test_share_roundtrip_through_handlers() {
        let state = AppState::new(test_config());
        let body = Bytes::from(serde_json::to_vec(&sample_selections()).unwrap());

        let (status, Json(created)) = create_share(State(state.clone()), body).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.id.len(), 8);

        let Json(fetched) = get_share(State(state), Path(created.id.clone())).await.unwrap();
        assert_eq!(fetched.selections, sample_selections());
    }

    #[test]
    fn test_share_handler_counts_once() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let state = AppState::new(test_config());
        let body = Bytes::from(serde_json::to_vec(&sample_selections()).unwrap());

        ::metrics::with_local_recorder(&recorder, || {
            runtime.block_on(create_share(State(state), body)).unwrap();
        });

        let rendered = handle.render();
        assert!(rendered.contains("studio_shares_created_total 1"), "{}", rendered);
    }

    #[tokio::test]
    async fn test_share_rejects_invalid_selections() {
        let state = AppState::new(test_config());
        let mut selections = sample_selections();
        selections.area = -4.0;
        let body = Bytes::from(serde_json::to_vec(&selections).unwrap());

        let result = create_share(State(state), body).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_unknown_share_is_not_found() {
        let state = AppState::new(test_config());
        let result = get_share(State(state), Path("missing1".to_string())).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
