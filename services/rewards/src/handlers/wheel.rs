use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{SpinOutcome, SpinRequest},
    errors::Result,
    extractors::ValidatedJson,
    repository::{RedisLedgerStore, RedisSpinLog, RedisUserDirectory, UserDirectory},
    services::{cooldown, CooldownTracker, PrizeSelector, WheelService},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub can_spin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_spin: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PrizeView {
    pub name: String,
    pub emoji: String,
}

#[derive(Debug, Serialize)]
pub struct SpinResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize: Option<PrizeView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize_index: Option<usize>,
    pub is_respin: bool,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_spin: Option<String>,
}

fn wheel_service(
    state: &AppState,
) -> WheelService<RedisSpinLog, RedisLedgerStore, RedisUserDirectory> {
    WheelService::new(
        RedisSpinLog::new(state.redis.clone()),
        RedisLedgerStore::new(state.redis.clone()),
        RedisUserDirectory::new(state.redis.clone()),
        PrizeSelector::new(state.prizes.clone()),
        CooldownTracker::new(state.config.wheel.cooldown_hours),
    )
}

pub async fn check_cooldown(
    State(state): State<AppState>,
    Query(query): Query<CheckQuery>,
) -> Result<Json<CheckResponse>> {
    // An unidentified caller gets the optimistic answer; the spin itself is
    // what enforces the window.
    let user_id = match query.user_id.as_deref().and_then(|v| v.parse::<i64>().ok()) {
        Some(id) => id,
        None => {
            return Ok(Json(CheckResponse {
                can_spin: true,
                next_spin: None,
            }))
        }
    };

    let span = tracing::info_span!("check_cooldown", user_id);
    let _enter = span.enter();

    let status = wheel_service(&state).check(user_id).await?;

    Ok(Json(CheckResponse {
        can_spin: status.allowed,
        next_spin: if status.allowed {
            None
        } else {
            Some(cooldown::format_remaining(status.remaining))
        },
    }))
}

pub async fn spin(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SpinRequest>,
) -> Result<Json<SpinResponse>> {
    let span = tracing::info_span!("spin", user_id = req.user_id);
    let _enter = span.enter();

    let svc = wheel_service(&state);
    RedisUserDirectory::new(state.redis.clone())
        .ensure_user(req.user_id, None)
        .await?;

    let outcome = svc.spin(req.user_id).await?;
    metrics::counter!("wheel_spins_total").increment(1);

    let response = match outcome {
        SpinOutcome::Banned => SpinResponse {
            success: false,
            prize: None,
            prize_index: None,
            is_respin: false,
            amount: 0,
            message: Some("Доступ запрещён".to_string()),
            next_spin: None,
        },
        SpinOutcome::CooldownActive { remaining_ms } => {
            let remaining = chrono::Duration::milliseconds(remaining_ms);
            let time_left = cooldown::format_remaining(remaining);
            SpinResponse {
                success: false,
                prize: None,
                prize_index: None,
                is_respin: false,
                amount: 0,
                message: Some(format!("Подождите {}", time_left)),
                next_spin: Some(time_left),
            }
        }
        SpinOutcome::Landed {
            prize,
            prize_index,
            credited_minor,
        } => {
            if credited_minor > 0 {
                metrics::counter!("wheel_credits_minor_total")
                    .increment(credited_minor as u64);
            }
            SpinResponse {
                success: true,
                prize: Some(PrizeView {
                    name: prize.name.clone(),
                    emoji: "🎁".to_string(),
                }),
                prize_index: Some(prize_index),
                is_respin: prize.is_respin,
                amount: credited_minor,
                message: None,
                next_spin: None,
            }
        }
    };

    Ok(Json(response))
}
