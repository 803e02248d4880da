use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

use crate::domain::SpinRecord;
use crate::errors::Result;
use super::keys::{spin_key, spin_user_index_key, wheel_last_key};
use super::lua_scripts::COMMIT_SPIN_SCRIPT;

/// Result of attempting to commit a spin against the cooldown anchor
#[derive(Debug, Clone, PartialEq)]
pub enum SpinCommit {
    Committed,
    Blocked { remaining_ms: i64 },
}

/// Append-only spin audit log plus the per-user cooldown anchor
#[async_trait]
pub trait SpinLog: Send + Sync {
    /// Timestamp (ms) of the most recent qualifying (non-respin) spin.
    async fn last_qualifying_spin_ms(&self, user_id: i64) -> Result<Option<i64>>;

    /// Atomically re-check the cooldown and, if clear, write the spin record
    /// and advance the anchor for qualifying spins. Blocked attempts leave no
    /// trace.
    async fn commit(&self, record: &SpinRecord, window_ms: i64) -> Result<SpinCommit>;
}

/// Redis-based implementation of SpinLog
pub struct RedisSpinLog {
    redis: ConnectionManager,
}

impl RedisSpinLog {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl SpinLog for RedisSpinLog {
    async fn last_qualifying_spin_ms(&self, user_id: i64) -> Result<Option<i64>> {
        let mut redis_conn = self.redis.clone();
        let last: Option<i64> = redis_conn.get(wheel_last_key(user_id)).await?;
        Ok(last)
    }

    async fn commit(&self, record: &SpinRecord, window_ms: i64) -> Result<SpinCommit> {
        let mut redis_conn = self.redis.clone();
        let script = Script::new(COMMIT_SPIN_SCRIPT);

        let (committed, remaining_ms): (i64, i64) = script
            .key(wheel_last_key(record.user_id))
            .key(spin_key(record.spin_id))
            .key(spin_user_index_key(record.user_id))
            .arg(record.spun_at.timestamp_millis())
            .arg(window_ms)
            .arg(record.spin_id.to_string())
            .arg(record.user_id)
            .arg(&record.prize)
            .arg(record.amount_minor)
            .arg(if record.is_respin { "1" } else { "0" })
            .invoke_async(&mut redis_conn)
            .await?;

        if committed == 1 {
            Ok(SpinCommit::Committed)
        } else {
            Ok(SpinCommit::Blocked { remaining_ms })
        }
    }
}
