use crate::{auth::Requester, credits::CreditOwner, error::AppError, state::AppState};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct BalanceQuery {
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
pub struct CreditsResponse {
    pub owner: CreditOwner,
    pub credits: u32,
}

/// `GET /api/credits`
pub async fn get_credits(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<CreditsResponse>, AppError> {
    let credits = state.credits.balance(&requester.owner, query.refresh).await?;
    Ok(Json(CreditsResponse {
        owner: requester.owner,
        credits,
    }))
}

/// `POST /api/credits/use`
pub async fn use_credit(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
) -> Result<Json<CreditsResponse>, AppError> {
    let credits = state.credits.consume(&requester.owner).await?;
    Ok(Json(CreditsResponse {
        owner: requester.owner,
        credits,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn requester() -> Extension<Requester> {
        Extension(Requester {
            owner: CreditOwner::Device("device-1".to_string()),
        })
    }

    #[tokio::test]
    async fn test_balance_then_consume_until_empty() {
        let state = AppState::new(test_config());

        let Json(balance) = get_credits(State(state.clone()), requester(), Query(BalanceQuery::default()))
            .await
            .unwrap();
        assert_eq!(balance.credits, 3);

        for expected in [2, 1, 0] {
            let Json(after) = use_credit(State(state.clone()), requester()).await.unwrap();
            assert_eq!(after.credits, expected);
        }

        let result = use_credit(State(state.clone()), requester()).await;
        assert!(matches!(result, Err(AppError::InsufficientCredits)));

        let Json(refreshed) =
            get_credits(State(state), requester(), Query(BalanceQuery { refresh: true }))
                .await
                .unwrap();
        assert_eq!(refreshed.credits, 0);
    }
}
