use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::errors::Result;
use super::keys::{user_index_key, user_key};

/// User registration and ban state
///
/// Registration itself belongs to the bot layer; the core only needs
/// idempotent creation and the ban check it is required to enforce before
/// touching the ledger.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Create the user record if absent. Safe to call on every request.
    async fn ensure_user(&self, user_id: i64, username: Option<&str>) -> Result<()>;

    async fn is_banned(&self, user_id: i64) -> Result<bool>;

    async fn set_banned(&self, user_id: i64, banned: bool) -> Result<()>;

    /// Number of known users.
    async fn count(&self) -> Result<i64>;
}

/// Redis-based implementation of UserDirectory
pub struct RedisUserDirectory {
    redis: ConnectionManager,
}

impl RedisUserDirectory {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl UserDirectory for RedisUserDirectory {
    async fn ensure_user(&self, user_id: i64, username: Option<&str>) -> Result<()> {
        let mut redis_conn = self.redis.clone();
        let key = user_key(user_id);
        let now_ms = Utc::now().timestamp_millis();

        let mut pipe = redis::pipe();
        pipe.atomic();
        pipe.hset_nx(&key, "created_at_ms", now_ms.to_string())
            .ignore()
            .sadd(user_index_key(), user_id)
            .ignore();
        if let Some(username) = username {
            pipe.hset_nx(&key, "username", username).ignore();
        }
        let _: () = pipe.query_async(&mut redis_conn).await?;

        Ok(())
    }

    async fn is_banned(&self, user_id: i64) -> Result<bool> {
        let mut redis_conn = self.redis.clone();
        let banned: Option<i64> = redis_conn.hget(user_key(user_id), "banned").await?;
        Ok(banned.unwrap_or(0) != 0)
    }

    async fn set_banned(&self, user_id: i64, banned: bool) -> Result<()> {
        let mut redis_conn = self.redis.clone();
        let _: () = redis_conn
            .hset(user_key(user_id), "banned", if banned { 1 } else { 0 })
            .await?;
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let mut redis_conn = self.redis.clone();
        let count: i64 = redis_conn.scard(user_index_key()).await?;
        Ok(count)
    }
}
