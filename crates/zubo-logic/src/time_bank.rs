//! Time bank: unused answer time banked as currency.
//!
//! Every answer banks whatever is left of the stage's time limit. The bank
//! only grows through [`TimeBank::deposit`] and only shrinks through
//! [`trade_time_for_lives`], which is rejected as a whole when the balance
//! cannot cover the trade.
//!
//! ```
//! use zubo_logic::time_bank::{trade_time_for_lives, TimeBank, TradeRejected};
//!
//! let bank = TimeBank::new().deposit(999);
//! assert!(matches!(
//!     trade_time_for_lives(&bank, 1),
//!     Err(TradeRejected::InsufficientTime { .. })
//! ));
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{LEADERBOARD_BONUS_DIVISOR, SECONDS_PER_LIFE};
use crate::stage::Stage;

/// Banked seconds plus bookkeeping for the last deposit and past trades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBank {
    pub total_seconds: u32,
    /// Seconds banked by the most recent answer (0 after a trade).
    pub earned_last_question: u32,
    /// Lives bought with banked time over the whole session.
    pub lives_traded: u32,
}

impl TimeBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank `seconds`, recording them as the last question's earnings.
    pub fn deposit(self, seconds: u32) -> Self {
        Self {
            total_seconds: self.total_seconds.saturating_add(seconds),
            earned_last_question: seconds,
            ..self
        }
    }
}

/// Why a time-for-lives trade was refused. The bank is untouched in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeRejected {
    /// Asked for zero lives.
    NoLivesRequested,
    /// Balance below the cost of the requested lives.
    InsufficientTime { required: u64, available: u32 },
}

impl std::fmt::Display for TradeRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeRejected::NoLivesRequested => write!(f, "no lives requested"),
            TradeRejected::InsufficientTime {
                required,
                available,
            } => write!(
                f,
                "insufficient banked time: need {}s, have {}s",
                required, available
            ),
        }
    }
}

impl std::error::Error for TradeRejected {}

/// Seconds left on the clock: `max(0, time_limit - elapsed)`.
pub fn time_earned(time_limit_seconds: u32, elapsed_seconds: u32) -> u32 {
    time_limit_seconds.saturating_sub(elapsed_seconds)
}

/// Trade banked time for `lives` at the standard rate of
/// [`SECONDS_PER_LIFE`] seconds each.
pub fn trade_time_for_lives(bank: &TimeBank, lives: u32) -> Result<TimeBank, TradeRejected> {
    trade_time_for_lives_at(bank, lives, SECONDS_PER_LIFE)
}

/// Trade banked time for `lives` at `seconds_per_life` each.
///
/// On success the cost is withdrawn, `lives_traded` grows by `lives` and the
/// last-question earnings are cleared. The caller adds the lives to the
/// session.
pub fn trade_time_for_lives_at(
    bank: &TimeBank,
    lives: u32,
    seconds_per_life: u32,
) -> Result<TimeBank, TradeRejected> {
    if lives == 0 {
        return Err(TradeRejected::NoLivesRequested);
    }

    let required = lives as u64 * seconds_per_life as u64;
    if (bank.total_seconds as u64) < required {
        return Err(TradeRejected::InsufficientTime {
            required,
            available: bank.total_seconds,
        });
    }

    Ok(TimeBank {
        // required <= total_seconds, so it fits in u32
        total_seconds: bank.total_seconds - required as u32,
        earned_last_question: 0,
        lives_traded: bank.lives_traded.saturating_add(lives),
    })
}

/// Most lives the current balance can buy.
pub fn max_lives_available(bank: &TimeBank, seconds_per_life: u32) -> u32 {
    if seconds_per_life == 0 {
        return 0;
    }
    bank.total_seconds / seconds_per_life
}

/// Leaderboard display bonus at the standard divisor. Not tied to trading.
pub fn leaderboard_bonus(bank: &TimeBank) -> u32 {
    leaderboard_bonus_with(bank, LEADERBOARD_BONUS_DIVISOR)
}

pub fn leaderboard_bonus_with(bank: &TimeBank, divisor: u32) -> u32 {
    if divisor == 0 {
        return 0;
    }
    bank.total_seconds / divisor
}

/// Format seconds as `M:SS`.
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Percent (0–100) of the way through `stage` when showing `question_number`.
pub fn stage_progress(question_number: u32, stage: Stage) -> f32 {
    let (start, end) = stage.question_range();
    let span = (end - start + 1) as f32;
    let done = question_number as f32 - start as f32;
    (done / span * 100.0).clamp(0.0, 100.0)
}
