use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    domain::{RedeemOutcome, RedeemRequest},
    errors::{AppError, Result},
    extractors::ValidatedJson,
    repository::{RedisLedgerStore, RedisPromocodeRegistry, RedisUserDirectory},
    services::RedemptionService,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    /// Credited amount in minor units on success, absent otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    pub reason: String,
}

pub async fn redeem(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RedeemRequest>,
) -> Result<Json<RedeemResponse>> {
    let code = req.code.trim();
    if code.is_empty() {
        return Err(AppError::InvalidInput("Promocode must not be empty".to_string()));
    }

    let span = tracing::info_span!("redeem", user_id = req.user_id, code = %code);
    let _enter = span.enter();

    let svc = RedemptionService::new(
        RedisPromocodeRegistry::new(state.redis.clone()),
        RedisLedgerStore::new(state.redis.clone()),
        RedisUserDirectory::new(state.redis.clone()),
    );

    let outcome = svc.redeem(req.user_id, code).await?;
    if matches!(outcome, RedeemOutcome::Redeemed { .. }) {
        metrics::counter!("promocodes_redeemed_total").increment(1);
    }

    let reason = outcome.reason().to_string();
    let amount = match outcome {
        RedeemOutcome::Redeemed { amount_minor } => Some(amount_minor),
        _ => None,
    };

    Ok(Json(RedeemResponse { amount, reason }))
}
