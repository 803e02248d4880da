use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use shared::UsageCap;

use crate::{
    domain::{CreatePromocodeRequest, Promocode},
    errors::{AppError, Result},
    extractors::ValidatedJson,
    repository::{PromocodeRegistry, RedisPromocodeRegistry, RedisUserDirectory, UserDirectory},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct CreatePromocodeResponse {
    pub created: bool,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct DeletePromocodeResponse {
    pub deleted: bool,
}

pub async fn create_promocode(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreatePromocodeRequest>,
) -> Result<Json<CreatePromocodeResponse>> {
    let code = req.code.trim().to_uppercase();
    if code.is_empty() {
        return Err(AppError::InvalidInput("Promocode must not be empty".to_string()));
    }

    let max_uses = match req.max_uses {
        Some(cap) => UsageCap::new(cap).map_err(|e| AppError::InvalidInput(e.to_string()))?,
        None => UsageCap::default(),
    };

    let span = tracing::info_span!("create_promocode", code = %code, max_uses = max_uses.as_i64());
    let _enter = span.enter();

    let registry = RedisPromocodeRegistry::new(state.redis.clone());
    let created = registry
        .create(&code, req.amount.as_minor(), max_uses.as_i64())
        .await?;

    if created {
        tracing::info!(code = %code, amount_minor = req.amount.as_minor(), "Promocode created");
        metrics::counter!("promocodes_created_total").increment(1);
    } else {
        tracing::debug!(code = %code, "Promocode already exists");
    }

    Ok(Json(CreatePromocodeResponse { created, code }))
}

pub async fn delete_promocode(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<DeletePromocodeResponse>> {
    let registry = RedisPromocodeRegistry::new(state.redis.clone());
    let deleted = registry.delete(&code).await?;

    if !deleted {
        return Err(AppError::NotFound(format!(
            "Promocode {} not found",
            code.to_uppercase()
        )));
    }

    tracing::info!(code = %code.to_uppercase(), "Promocode deleted");
    Ok(Json(DeletePromocodeResponse { deleted }))
}

pub async fn list_promocodes(
    State(state): State<AppState>,
) -> Result<Json<Vec<Promocode>>> {
    let registry = RedisPromocodeRegistry::new(state.redis.clone());
    let promos = registry.list_all().await?;

    tracing::debug!(count = promos.len(), "Listed promocodes");
    Ok(Json(promos))
}

#[derive(Debug, serde::Deserialize)]
pub struct SetBannedRequest {
    pub banned: bool,
}

#[derive(Debug, Serialize)]
pub struct SetBannedResponse {
    pub user_id: i64,
    pub banned: bool,
}

pub async fn set_banned(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<SetBannedRequest>,
) -> Result<Json<SetBannedResponse>> {
    let directory = RedisUserDirectory::new(state.redis.clone());
    directory.ensure_user(user_id, None).await?;
    directory.set_banned(user_id, req.banned).await?;

    tracing::info!(user_id, banned = req.banned, "User ban state updated");
    Ok(Json(SetBannedResponse {
        user_id,
        banned: req.banned,
    }))
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub user_count: i64,
    pub promocode_count: usize,
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let user_count = RedisUserDirectory::new(state.redis.clone()).count().await?;
    let promocode_count = RedisPromocodeRegistry::new(state.redis.clone())
        .list_all()
        .await?
        .len();

    Ok(Json(StatsResponse {
        user_count,
        promocode_count,
    }))
}
