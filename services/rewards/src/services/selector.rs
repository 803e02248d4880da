use rand::Rng;
use std::sync::Arc;

use crate::domain::{wheel_sectors, Prize, PrizeTable};

/// Stateless weighted-random draw over the prize table
///
/// The table is a set of weighted intervals over `[0, total_weight)`; a
/// uniform draw walks the rows accumulating weight and the first row whose
/// cumulative weight meets the draw wins. Weights are relative and need not
/// sum to 100.
#[derive(Clone)]
pub struct PrizeSelector {
    table: Arc<PrizeTable>,
}

impl PrizeSelector {
    pub fn new(table: Arc<PrizeTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PrizeTable {
        &self.table
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &Prize {
        let total = self.table.total_weight();
        let roll = rng.gen_range(0.0..total);

        let mut cumulative = 0.0;
        for prize in self.table.prizes() {
            cumulative += prize.weight;
            if roll <= cumulative {
                return prize;
            }
        }

        // Rounding at the last boundary can leave the roll above the
        // accumulated total; fall back to the zero-value prize.
        self.table.fallback()
    }

    /// Pick a wheel sector for the drawn prize so the front end can animate
    /// landing on it.
    pub fn pick_sector<R: Rng + ?Sized>(&self, rng: &mut R, prize_name: &str) -> usize {
        let sectors = wheel_sectors(prize_name);
        sectors[rng.gen_range(0..sectors.len())]
    }
}
