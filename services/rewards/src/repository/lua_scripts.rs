//! Redis Lua scripts for atomic operations
//!
//! Contains Lua script constants used wherever a check and a write on the
//! same key must not be observably separated.

/// Lua script to atomically redeem a promocode
///
/// Keys: [promo_key, redeemers_key]
/// Args: [user_id]
///
/// Returns: [outcome, amount_minor] where outcome is one of
/// "not_found" | "exhausted" | "already_used" | "ok"
///
/// The cap check, the per-user uniqueness check, the redemption record and
/// the use-count increment all happen inside one script invocation. Two
/// racing redemptions of the last remaining use cannot both pass the cap
/// check, and a user cannot double-claim between a read and an insert.
pub const REDEEM_PROMOCODE_SCRIPT: &str = r#"
local promo = KEYS[1]
local redeemers = KEYS[2]
local user_id = ARGV[1]

if redis.call('EXISTS', promo) == 0 then
  return { 'not_found', '0' }
end

local uses = tonumber(redis.call('HGET', promo, 'uses') or '0')
local max_uses = tonumber(redis.call('HGET', promo, 'max_uses') or '1')

if uses >= max_uses then
  return { 'exhausted', '0' }
end

if redis.call('SISMEMBER', redeemers, user_id) == 1 then
  return { 'already_used', '0' }
end

redis.call('SADD', redeemers, user_id)
redis.call('HINCRBY', promo, 'uses', 1)

local amount = redis.call('HGET', promo, 'amount') or '0'
return { 'ok', amount }
"#;

/// Lua script to atomically create a promocode
///
/// Keys: [promo_key, promo_index]
/// Args: [code, amount_minor, max_uses, created_at_ms]
///
/// Returns: 1 when created, 0 when the code already exists.
///
/// The existence check, every hash field and the index entry land in one
/// invocation, so a concurrent redeem can never observe a promo hash that
/// exists but has no amount or cap yet.
pub const CREATE_PROMOCODE_SCRIPT: &str = r#"
local promo = KEYS[1]
local index = KEYS[2]
local code = ARGV[1]

if redis.call('EXISTS', promo) == 1 then
  return 0
end

redis.call('HSET', promo,
  'code', code,
  'amount', ARGV[2],
  'max_uses', ARGV[3],
  'uses', '0',
  'created_at_ms', ARGV[4]
)
redis.call('SADD', index, code)

return 1
"#;

/// Lua script to atomically commit a wheel spin
///
/// Keys: [last_spin_key, spin_key, user_spin_index]
/// Args: [now_ms, window_ms, spin_id, user_id, prize, amount_minor, is_respin]
///
/// Returns: [committed, remaining_ms] — {1, 0} on commit, {0, remaining} when
/// the cooldown blocks the spin.
///
/// The cooldown is re-checked inside the script, so two near-simultaneous
/// spins from one user cannot both pass. The anchor is only advanced for
/// non-respin prizes; a respin record is written for the audit trail but
/// leaves the cooldown untouched.
pub const COMMIT_SPIN_SCRIPT: &str = r#"
local last_key = KEYS[1]
local spin_key = KEYS[2]
local user_index = KEYS[3]
local now_ms = tonumber(ARGV[1])
local window_ms = tonumber(ARGV[2])
local spin_id = ARGV[3]
local user_id = ARGV[4]
local prize = ARGV[5]
local amount = ARGV[6]
local is_respin = ARGV[7]

local last = tonumber(redis.call('GET', last_key) or '-1')

if last >= 0 and now_ms < last + window_ms then
  return { 0, last + window_ms - now_ms }
end

redis.call('HSET', spin_key,
  'spin_id', spin_id,
  'user_id', user_id,
  'prize', prize,
  'amount', amount,
  'is_respin', is_respin,
  'spun_at_ms', tostring(now_ms)
)
redis.call('ZADD', user_index, now_ms, spin_id)

if is_respin == '0' then
  redis.call('SET', last_key, tostring(now_ms))
end

return { 1, 0 }
"#;
