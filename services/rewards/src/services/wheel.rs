use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Prize, SpinOutcome, SpinRecord};
use crate::errors::Result;
use crate::repository::{LedgerStore, SpinCommit, SpinLog, UserDirectory};
use super::cooldown::{CooldownStatus, CooldownTracker};
use super::selector::PrizeSelector;

/// Orchestrates a wheel spin: cooldown check, draw, spin-log commit, credit
///
/// The commit script re-checks the cooldown against the anchor, so two
/// near-simultaneous spins from one user cannot both land. The draw itself is
/// side-effect free; a blocked attempt writes nothing.
#[derive(Clone)]
pub struct WheelService<S, L, U> {
    spins: S,
    ledger: L,
    users: U,
    selector: PrizeSelector,
    tracker: CooldownTracker,
}

impl<S, L, U> WheelService<S, L, U>
where
    S: SpinLog,
    L: LedgerStore,
    U: UserDirectory,
{
    pub fn new(
        spins: S,
        ledger: L,
        users: U,
        selector: PrizeSelector,
        tracker: CooldownTracker,
    ) -> Self {
        Self {
            spins,
            ledger,
            users,
            selector,
            tracker,
        }
    }

    /// Cooldown state for the inbound check endpoint.
    pub async fn check(&self, user_id: i64) -> Result<CooldownStatus> {
        let last = self.spins.last_qualifying_spin_ms(user_id).await?;
        Ok(self.tracker.check(last, Utc::now()))
    }

    pub async fn spin(&self, user_id: i64) -> Result<SpinOutcome> {
        if self.users.is_banned(user_id).await? {
            tracing::warn!(user_id, "Spin refused for banned user");
            return Ok(SpinOutcome::Banned);
        }

        let status = self.check(user_id).await?;
        if !status.allowed {
            return Ok(SpinOutcome::CooldownActive {
                remaining_ms: status.remaining.num_milliseconds(),
            });
        }

        // ThreadRng must not be held across an await point.
        let (prize, prize_index) = {
            let mut rng = rand::thread_rng();
            let prize = self.selector.draw(&mut rng).clone();
            let prize_index = self.selector.pick_sector(&mut rng, &prize.name);
            (prize, prize_index)
        };

        self.settle(user_id, prize, prize_index).await
    }

    /// Commit a drawn prize: spin record always (respins and zero prizes
    /// included), ledger credit only for a positive amount, and only after
    /// the record is durable.
    pub(crate) async fn settle(
        &self,
        user_id: i64,
        prize: Prize,
        prize_index: usize,
    ) -> Result<SpinOutcome> {
        let record = SpinRecord {
            spin_id: Uuid::new_v4(),
            user_id,
            prize: prize.name.clone(),
            amount_minor: prize.amount_minor,
            is_respin: prize.is_respin,
            spun_at: Utc::now(),
        };

        match self.spins.commit(&record, self.tracker.window_ms()).await? {
            SpinCommit::Blocked { remaining_ms } => {
                tracing::debug!(user_id, remaining_ms, "Spin blocked by concurrent commit");
                Ok(SpinOutcome::CooldownActive { remaining_ms })
            }
            SpinCommit::Committed => {
                let credited_minor = if prize.amount_minor > 0 {
                    self.ledger.credit(user_id, prize.amount_minor).await?;
                    prize.amount_minor
                } else {
                    0
                };

                tracing::info!(
                    user_id,
                    prize = %prize.name,
                    credited_minor,
                    is_respin = prize.is_respin,
                    "Spin committed"
                );

                Ok(SpinOutcome::Landed {
                    prize,
                    prize_index,
                    credited_minor,
                })
            }
        }
    }
}
