//! In-memory stores for unit-testing the orchestration services
//!
//! Each fake applies the same check-then-write discipline as the Redis
//! implementations, serialized behind a mutex, so the concurrency properties
//! hold in tests without a running Redis.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::domain::{Promocode, RedeemOutcome, SpinRecord};
use crate::errors::Result;
use crate::repository::{
    LedgerStore, PromocodeRegistry, SpinCommit, SpinLog, UserDirectory,
};

#[derive(Clone, Default)]
pub struct MemoryLedger {
    balances: Arc<Mutex<HashMap<i64, i64>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn credit(&self, user_id: i64, amount_minor: i64) -> Result<i64> {
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry(user_id).or_insert(0);
        *balance += amount_minor;
        Ok(*balance)
    }

    async fn balance(&self, user_id: i64) -> Result<i64> {
        Ok(*self.balances.lock().unwrap().get(&user_id).unwrap_or(&0))
    }
}

struct PromoEntry {
    amount_minor: i64,
    max_uses: i64,
    uses: i64,
    redeemers: HashSet<i64>,
    created_at_ms: i64,
}

#[derive(Clone, Default)]
pub struct MemoryPromocodes {
    promos: Arc<Mutex<HashMap<String, PromoEntry>>>,
}

impl MemoryPromocodes {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromocodeRegistry for MemoryPromocodes {
    async fn lookup(&self, code: &str) -> Result<Option<Promocode>> {
        let promos = self.promos.lock().unwrap();
        Ok(promos.get(&code.to_uppercase()).map(|entry| Promocode {
            code: code.to_uppercase(),
            amount_minor: entry.amount_minor,
            max_uses: entry.max_uses,
            uses: entry.uses,
            created_at: chrono::TimeZone::timestamp_millis_opt(&Utc, entry.created_at_ms)
                .single()
                .unwrap(),
        }))
    }

    async fn redeem(&self, user_id: i64, code: &str) -> Result<RedeemOutcome> {
        let mut promos = self.promos.lock().unwrap();
        let entry = match promos.get_mut(&code.to_uppercase()) {
            None => return Ok(RedeemOutcome::NotFound),
            Some(entry) => entry,
        };

        if entry.uses >= entry.max_uses {
            return Ok(RedeemOutcome::Exhausted);
        }
        if entry.redeemers.contains(&user_id) {
            return Ok(RedeemOutcome::AlreadyUsed);
        }

        entry.redeemers.insert(user_id);
        entry.uses += 1;
        Ok(RedeemOutcome::Redeemed {
            amount_minor: entry.amount_minor,
        })
    }

    async fn create(&self, code: &str, amount_minor: i64, max_uses: i64) -> Result<bool> {
        let mut promos = self.promos.lock().unwrap();
        let key = code.to_uppercase();
        if promos.contains_key(&key) {
            return Ok(false);
        }
        promos.insert(
            key,
            PromoEntry {
                amount_minor,
                max_uses,
                uses: 0,
                redeemers: HashSet::new(),
                created_at_ms: Utc::now().timestamp_millis(),
            },
        );
        Ok(true)
    }

    async fn delete(&self, code: &str) -> Result<bool> {
        Ok(self
            .promos
            .lock()
            .unwrap()
            .remove(&code.to_uppercase())
            .is_some())
    }

    async fn list_all(&self) -> Result<Vec<Promocode>> {
        let promos = self.promos.lock().unwrap();
        Ok(promos
            .iter()
            .map(|(code, entry)| Promocode {
                code: code.clone(),
                amount_minor: entry.amount_minor,
                max_uses: entry.max_uses,
                uses: entry.uses,
                created_at: chrono::TimeZone::timestamp_millis_opt(&Utc, entry.created_at_ms)
                    .single()
                    .unwrap(),
            })
            .collect())
    }
}

#[derive(Default)]
struct SpinState {
    last_qualifying: HashMap<i64, i64>,
    records: Vec<SpinRecord>,
}

#[derive(Clone, Default)]
pub struct MemorySpinLog {
    state: Arc<Mutex<SpinState>>,
}

impl MemorySpinLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records_for(&self, user_id: i64) -> Vec<SpinRecord> {
        self.state
            .lock()
            .unwrap()
            .records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SpinLog for MemorySpinLog {
    async fn last_qualifying_spin_ms(&self, user_id: i64) -> Result<Option<i64>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .last_qualifying
            .get(&user_id)
            .copied())
    }

    async fn commit(&self, record: &SpinRecord, window_ms: i64) -> Result<SpinCommit> {
        let mut state = self.state.lock().unwrap();
        let now_ms = record.spun_at.timestamp_millis();

        if let Some(&last) = state.last_qualifying.get(&record.user_id) {
            if now_ms < last + window_ms {
                return Ok(SpinCommit::Blocked {
                    remaining_ms: last + window_ms - now_ms,
                });
            }
        }

        state.records.push(record.clone());
        if !record.is_respin {
            state.last_qualifying.insert(record.user_id, now_ms);
        }
        Ok(SpinCommit::Committed)
    }
}

#[derive(Clone, Default)]
pub struct MemoryUsers {
    banned: Arc<Mutex<HashSet<i64>>>,
    known: Arc<Mutex<HashSet<i64>>>,
}

impl MemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryUsers {
    async fn ensure_user(&self, user_id: i64, _username: Option<&str>) -> Result<()> {
        self.known.lock().unwrap().insert(user_id);
        Ok(())
    }

    async fn is_banned(&self, user_id: i64) -> Result<bool> {
        Ok(self.banned.lock().unwrap().contains(&user_id))
    }

    async fn set_banned(&self, user_id: i64, banned: bool) -> Result<()> {
        let mut set = self.banned.lock().unwrap();
        if banned {
            set.insert(user_id);
        } else {
            set.remove(&user_id);
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.known.lock().unwrap().len() as i64)
    }
}
