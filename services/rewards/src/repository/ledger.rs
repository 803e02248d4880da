use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::errors::Result;
use super::keys::user_key;

/// Durable per-user balance record
///
/// Balances live in the user hash and are only ever adjusted through
/// `HINCRBY`, so a credit is applied in full or not at all and no reader
/// can observe a partial update.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Atomically add `amount_minor` (may be negative) to the user's balance,
    /// creating the record at zero first if absent. Returns the new balance.
    async fn credit(&self, user_id: i64, amount_minor: i64) -> Result<i64>;

    /// Current balance in minor units, or 0 when the user has no record.
    async fn balance(&self, user_id: i64) -> Result<i64>;
}

/// Redis-based implementation of LedgerStore
pub struct RedisLedgerStore {
    redis: ConnectionManager,
}

impl RedisLedgerStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl LedgerStore for RedisLedgerStore {
    async fn credit(&self, user_id: i64, amount_minor: i64) -> Result<i64> {
        let mut redis_conn = self.redis.clone();
        // HINCRBY starts the field at 0 when missing, which doubles as
        // implicit user creation.
        let new_balance: i64 = redis_conn
            .hincr(user_key(user_id), "balance", amount_minor)
            .await?;
        Ok(new_balance)
    }

    async fn balance(&self, user_id: i64) -> Result<i64> {
        let mut redis_conn = self.redis.clone();
        let balance: Option<i64> = redis_conn.hget(user_key(user_id), "balance").await?;
        Ok(balance.unwrap_or(0))
    }
}
