use chrono::{DateTime, Duration, Utc};

/// Whether a user may spin, and how long until they can if not
#[derive(Debug, Clone, PartialEq)]
pub struct CooldownStatus {
    pub allowed: bool,
    pub remaining: Duration,
}

/// Fixed-window cooldown over the last qualifying spin
///
/// Respins never feed the anchor this tracker reads, so a respin outcome
/// neither resets nor extends the window.
#[derive(Debug, Clone, Copy)]
pub struct CooldownTracker {
    window: Duration,
}

impl CooldownTracker {
    pub fn new(window_hours: i64) -> Self {
        Self {
            window: Duration::hours(window_hours),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.num_milliseconds()
    }

    /// Evaluate the window against the last qualifying spin.
    /// The boundary is inclusive: at exactly `last + window` the spin is allowed.
    pub fn check(&self, last_qualifying_ms: Option<i64>, now: DateTime<Utc>) -> CooldownStatus {
        let last_ms = match last_qualifying_ms {
            None => {
                return CooldownStatus {
                    allowed: true,
                    remaining: Duration::zero(),
                }
            }
            Some(ms) => ms,
        };

        let next_ms = last_ms + self.window.num_milliseconds();
        let now_ms = now.timestamp_millis();

        if now_ms >= next_ms {
            CooldownStatus {
                allowed: true,
                remaining: Duration::zero(),
            }
        } else {
            CooldownStatus {
                allowed: false,
                remaining: Duration::milliseconds(next_ms - now_ms),
            }
        }
    }
}

/// Format remaining wait time for user display ("5ч 12мин" / "42мин")
pub fn format_remaining(remaining: Duration) -> String {
    let total_minutes = remaining.num_minutes();
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{}ч {}мин", hours, minutes)
    } else {
        format!("{}мин", minutes)
    }
}
