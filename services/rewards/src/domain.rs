use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::CreditAmount;
use uuid::Uuid;

/// One row of the wheel's prize table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prize {
    pub name: String,
    /// Reward in minor units (kopecks); 0 for the empty and respin outcomes
    pub amount_minor: i64,
    /// Relative weight; the table is normalized by its actual total
    pub weight: f64,
    #[serde(default)]
    pub is_respin: bool,
}

/// Immutable process-wide prize configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct PrizeTable {
    prizes: Vec<Prize>,
}

impl PrizeTable {
    /// Panics when the table is empty or its weights do not sum to a
    /// positive value; the draw needs a non-degenerate interval and a row to
    /// fall back on.
    pub fn new(prizes: Vec<Prize>) -> Self {
        assert!(!prizes.is_empty(), "prize table must not be empty");
        let total: f64 = prizes.iter().map(|p| p.weight).sum();
        assert!(total > 0.0, "prize weights must sum to a positive value");
        Self { prizes }
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn total_weight(&self) -> f64 {
        self.prizes.iter().map(|p| p.weight).sum()
    }

    /// Deterministic default when cumulative-weight accumulation rounds past
    /// every row: the first (zero-value) prize.
    pub fn fallback(&self) -> &Prize {
        &self.prizes[0]
    }
}

impl Default for PrizeTable {
    fn default() -> Self {
        let row = |name: &str, rubles: i64, weight: f64, is_respin: bool| Prize {
            name: name.to_string(),
            amount_minor: rubles * shared::MINOR_UNITS_PER_RUBLE,
            weight,
            is_respin,
        };

        Self::new(vec![
            row("НИЧЕГО", 0, 75.0, false),
            row("ПЕРЕКРУТ", 0, 5.0, true),
            row("3₽", 3, 8.0, false),
            row("5₽", 5, 7.0, false),
            row("10₽", 10, 3.0, false),
            row("15₽", 15, 1.5, false),
            row("25₽", 25, 0.4, false),
            row("50₽", 50, 0.1, false),
        ])
    }
}

/// Wheel sectors a prize may land on, matching the front-end layout.
/// Rare prizes are displayed on the nearest lower-value sector.
pub fn wheel_sectors(prize_name: &str) -> &'static [usize] {
    match prize_name {
        "НИЧЕГО" => &[0, 2, 4, 6],
        "ПЕРЕКРУТ" => &[3],
        "3₽" => &[7],
        "5₽" => &[1],
        "10₽" => &[5],
        "15₽" => &[1],
        "25₽" => &[5],
        "50₽" => &[5],
        _ => &[0],
    }
}

/// Snapshot of a promocode's configuration and consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promocode {
    pub code: String,
    pub amount_minor: i64,
    pub max_uses: i64,
    pub uses: i64,
    pub created_at: DateTime<Utc>,
}

/// Immutable audit record of a single wheel draw (respins included)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinRecord {
    pub spin_id: Uuid,
    pub user_id: i64,
    pub prize: String,
    pub amount_minor: i64,
    pub is_respin: bool,
    pub spun_at: DateTime<Utc>,
}

/// Terminal outcome of a redemption attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RedeemOutcome {
    NotFound,
    Exhausted,
    AlreadyUsed,
    Banned,
    Redeemed { amount_minor: i64 },
}

impl RedeemOutcome {
    /// Human-readable reason string surfaced to the user
    pub fn reason(&self) -> &'static str {
        match self {
            RedeemOutcome::NotFound => "Промокод не найден",
            RedeemOutcome::Exhausted => "Промокод исчерпан",
            RedeemOutcome::AlreadyUsed => "Вы уже использовали этот промокод",
            RedeemOutcome::Banned => "Доступ запрещён",
            RedeemOutcome::Redeemed { .. } => "OK",
        }
    }
}

/// Terminal outcome of a spin attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SpinOutcome {
    Banned,
    CooldownActive { remaining_ms: i64 },
    Landed {
        prize: Prize,
        prize_index: usize,
        credited_minor: i64,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpinRequest {
    pub user_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedeemRequest {
    pub user_id: i64,
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePromocodeRequest {
    pub code: String,
    #[serde(deserialize_with = "deserialize_credit_amount")]
    pub amount: CreditAmount,
    pub max_uses: Option<i64>,
}

// Custom deserializer for CreditAmount from i64 minor units
fn deserialize_credit_amount<'de, D>(deserializer: D) -> Result<CreditAmount, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let minor = i64::deserialize(deserializer)?;
    CreditAmount::try_from(minor)
        .map_err(|e| serde::de::Error::custom(format!("Invalid credit amount: {}", e)))
}
