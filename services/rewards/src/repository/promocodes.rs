use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};
use std::collections::HashMap;

use crate::domain::{Promocode, RedeemOutcome};
use crate::errors::{AppError, Result};
use super::keys::{promo_index_key, promo_key, promo_redeemers_key};
use super::lua_scripts::{CREATE_PROMOCODE_SCRIPT, REDEEM_PROMOCODE_SCRIPT};

/// Durable promocode records plus the per-(user, code) redemption log
#[async_trait]
pub trait PromocodeRegistry: Send + Sync {
    /// Case-insensitive snapshot of a promocode, or None.
    async fn lookup(&self, code: &str) -> Result<Option<Promocode>>;

    /// Atomically evaluate and apply a redemption attempt: existence, cap,
    /// per-user uniqueness, redemption record and use-count increment are one
    /// unit. The ledger credit is NOT part of this call.
    async fn redeem(&self, user_id: i64, code: &str) -> Result<RedeemOutcome>;

    /// Create a promocode; returns false when the code already exists.
    async fn create(&self, code: &str, amount_minor: i64, max_uses: i64) -> Result<bool>;

    /// Delete a promocode and its redemption log; returns false when absent.
    async fn delete(&self, code: &str) -> Result<bool>;

    /// All known promocodes, for admin listing.
    async fn list_all(&self) -> Result<Vec<Promocode>>;
}

/// Redis-based implementation of PromocodeRegistry
pub struct RedisPromocodeRegistry {
    redis: ConnectionManager,
}

impl RedisPromocodeRegistry {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl PromocodeRegistry for RedisPromocodeRegistry {
    async fn lookup(&self, code: &str) -> Result<Option<Promocode>> {
        let mut redis_conn = self.redis.clone();
        let map: HashMap<String, String> = redis_conn.hgetall(promo_key(code)).await?;
        parse_promocode(map)
    }

    async fn redeem(&self, user_id: i64, code: &str) -> Result<RedeemOutcome> {
        let mut redis_conn = self.redis.clone();
        let script = Script::new(REDEEM_PROMOCODE_SCRIPT);

        let reply: Vec<String> = script
            .key(promo_key(code))
            .key(promo_redeemers_key(code))
            .arg(user_id)
            .invoke_async(&mut redis_conn)
            .await?;

        let outcome = reply.first().map(|s| s.as_str()).unwrap_or("");
        match outcome {
            "not_found" => Ok(RedeemOutcome::NotFound),
            "exhausted" => Ok(RedeemOutcome::Exhausted),
            "already_used" => Ok(RedeemOutcome::AlreadyUsed),
            "ok" => {
                let amount_minor = reply
                    .get(1)
                    .and_then(|v| v.parse::<i64>().ok())
                    .ok_or_else(|| {
                        AppError::Internal(anyhow::anyhow!(
                            "Invalid amount in redeem reply for code {}",
                            code
                        ))
                    })?;
                Ok(RedeemOutcome::Redeemed { amount_minor })
            }
            other => Err(AppError::Internal(anyhow::anyhow!(
                "Unexpected redeem outcome '{}' for code {}",
                other,
                code
            ))),
        }
    }

    async fn create(&self, code: &str, amount_minor: i64, max_uses: i64) -> Result<bool> {
        let mut redis_conn = self.redis.clone();
        let script = Script::new(CREATE_PROMOCODE_SCRIPT);
        let stored_code = code.to_uppercase();

        let created: i64 = script
            .key(promo_key(code))
            .key(promo_index_key())
            .arg(&stored_code)
            .arg(amount_minor)
            .arg(max_uses)
            .arg(Utc::now().timestamp_millis())
            .invoke_async(&mut redis_conn)
            .await?;

        Ok(created == 1)
    }

    async fn delete(&self, code: &str) -> Result<bool> {
        let mut redis_conn = self.redis.clone();
        let stored_code = code.to_uppercase();

        let mut pipe = redis::pipe();
        pipe.atomic();
        let (deleted, _, _): (i64, i64, i64) = pipe
            .del(promo_key(code))
            .del(promo_redeemers_key(code))
            .srem(promo_index_key(), &stored_code)
            .query_async(&mut redis_conn)
            .await?;

        Ok(deleted > 0)
    }

    async fn list_all(&self) -> Result<Vec<Promocode>> {
        let mut redis_conn = self.redis.clone();
        let codes: Vec<String> = redis_conn.smembers(promo_index_key()).await?;

        let mut promos = Vec::new();
        for code in codes {
            let map: HashMap<String, String> = redis_conn.hgetall(promo_key(&code)).await?;
            if let Some(promo) = parse_promocode(map)? {
                promos.push(promo);
            }
        }
        promos.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(promos)
    }
}

/// Parse a promocode from its Redis hash representation
fn parse_promocode(map: HashMap<String, String>) -> Result<Option<Promocode>> {
    if map.is_empty() {
        return Ok(None);
    }

    let code = map.get("code").cloned().unwrap_or_default();

    let created_at_ms: i64 = map
        .get("created_at_ms")
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0);
    let created_at = Utc
        .timestamp_millis_opt(created_at_ms)
        .single()
        .ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Invalid created_at_ms for promocode {}", code))
        })?;

    Ok(Some(Promocode {
        code,
        amount_minor: map
            .get("amount")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0),
        max_uses: map
            .get("max_uses")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(1),
        uses: map
            .get("uses")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0),
        created_at,
    }))
}
