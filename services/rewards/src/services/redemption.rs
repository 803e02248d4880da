use crate::domain::RedeemOutcome;
use crate::errors::Result;
use crate::repository::{LedgerStore, PromocodeRegistry, UserDirectory};

/// Orchestrates a promocode redemption attempt
///
/// The registry's atomic redeem is the serialization point; the ledger credit
/// is issued strictly after it commits. A crash between the two leaves the
/// redemption recorded but unpaid, and the record itself blocks a retry from
/// double-paying.
#[derive(Clone)]
pub struct RedemptionService<P, L, U> {
    promos: P,
    ledger: L,
    users: U,
}

impl<P, L, U> RedemptionService<P, L, U>
where
    P: PromocodeRegistry,
    L: LedgerStore,
    U: UserDirectory,
{
    pub fn new(promos: P, ledger: L, users: U) -> Self {
        Self {
            promos,
            ledger,
            users,
        }
    }

    pub async fn redeem(&self, user_id: i64, code: &str) -> Result<RedeemOutcome> {
        if self.users.is_banned(user_id).await? {
            tracing::warn!(user_id, "Redemption refused for banned user");
            return Ok(RedeemOutcome::Banned);
        }

        let outcome = self.promos.redeem(user_id, code).await?;

        if let RedeemOutcome::Redeemed { amount_minor } = outcome {
            let new_balance = self.ledger.credit(user_id, amount_minor).await?;
            tracing::info!(
                user_id,
                code = %code.to_uppercase(),
                amount_minor,
                new_balance,
                "Promocode redeemed"
            );
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{MemoryLedger, MemoryPromocodes, MemoryUsers};

    fn service() -> RedemptionService<MemoryPromocodes, MemoryLedger, MemoryUsers> {
        RedemptionService::new(
            MemoryPromocodes::new(),
            MemoryLedger::new(),
            MemoryUsers::new(),
        )
    }

    #[tokio::test]
    async fn test_unknown_code_fails_without_side_effect() {
        let svc = service();
        let outcome = svc.redeem(1, "NOPE").await.unwrap();
        assert_eq!(outcome, RedeemOutcome::NotFound);
        assert_eq!(svc.ledger.balance(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_redeem_credits_exactly_once() {
        let svc = service();
        // Uses left after the first claim, so the repeat attempt hits the
        // per-user uniqueness check rather than the cap.
        svc.promos.create("SAVE10", 1_000, 2).await.unwrap();

        let first = svc.redeem(1, "save10").await.unwrap();
        assert_eq!(first, RedeemOutcome::Redeemed { amount_minor: 1_000 });
        assert_eq!(svc.ledger.balance(1).await.unwrap(), 1_000);

        let second = svc.redeem(1, "SAVE10").await.unwrap();
        assert_eq!(second, RedeemOutcome::AlreadyUsed);
        assert_eq!(svc.ledger.balance(1).await.unwrap(), 1_000);
        assert_eq!(svc.promos.lookup("SAVE10").await.unwrap().unwrap().uses, 1);
    }

    #[tokio::test]
    async fn test_exhausted_for_second_user() {
        let svc = service();
        svc.promos.create("SAVE10", 1_000, 1).await.unwrap();

        assert_eq!(
            svc.redeem(1, "SAVE10").await.unwrap(),
            RedeemOutcome::Redeemed { amount_minor: 1_000 }
        );
        let u2 = svc.redeem(2, "SAVE10").await.unwrap();
        assert_eq!(u2, RedeemOutcome::Exhausted);
        assert_eq!(u2.reason(), "Промокод исчерпан");
        assert_eq!(svc.ledger.balance(2).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_banned_user_is_refused() {
        let svc = service();
        svc.promos.create("SAVE10", 1_000, 5).await.unwrap();
        svc.users.set_banned(7, true).await.unwrap();

        assert_eq!(svc.redeem(7, "SAVE10").await.unwrap(), RedeemOutcome::Banned);
        assert_eq!(svc.ledger.balance(7).await.unwrap(), 0);
        assert_eq!(svc.promos.lookup("SAVE10").await.unwrap().unwrap().uses, 0);
    }

    #[tokio::test]
    async fn test_concurrent_redemptions_respect_cap() {
        let svc = service();
        svc.promos.create("RACE", 500, 3).await.unwrap();

        let mut handles = Vec::new();
        for user_id in 0..10 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                svc.redeem(user_id, "RACE").await.unwrap()
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), RedeemOutcome::Redeemed { .. }) {
                successes += 1;
            }
        }

        assert_eq!(successes, 3, "exactly max_uses attempts may succeed");
        let promo = svc.promos.lookup("RACE").await.unwrap().unwrap();
        assert_eq!(promo.uses, 3);
        assert!(promo.uses <= promo.max_uses);
    }
}
