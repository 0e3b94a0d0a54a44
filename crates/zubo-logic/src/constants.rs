//! Game constants: run length, pass mark, lives and time-bank exchange rates.
//!
//! These are the default policy values. [`GameRules`](crate::config::GameRules)
//! starts from them and may override any of them from a rules file.

/// Questions in a full run.
pub const TOTAL_QUESTIONS: u32 = 100;

/// Minimum score at the end of a full run to succeed.
pub const PASS_THRESHOLD: u32 = 75;

/// Lives at the start of a fresh session.
pub const STARTING_LIVES: u32 = 3;

/// Probability that a correct answer awards a bonus life.
pub const LIFE_GAIN_CHANCE: f64 = 0.2;

/// Time-bank seconds exchanged for one life.
pub const SECONDS_PER_LIFE: u32 = 1000;

/// Leaderboard display bonus is `floor(total_seconds / LEADERBOARD_BONUS_DIVISOR)`.
pub const LEADERBOARD_BONUS_DIVISOR: u32 = 4;

/// Questions that must be answered before a score may be submitted.
pub const LEADERBOARD_THRESHOLD: u32 = 25;

/// Life purchases are locked once this many questions have been answered.
pub const STORE_CUTOFF: u32 = 75;

/// Riddles swapped into each freshly built deck (capped by the riddle pool).
pub const RIDDLES_PER_DECK: usize = 10;

/// Raw answer index meaning "no answer before the deadline".
pub const TIMEOUT_SENTINEL: i64 = -1;

/// Persona labels, in the order they are listed to players.
pub mod persona_labels {
    pub const ACHIEVER: &str = "Achiever";
    pub const ANALYST: &str = "Analyst";
    pub const CREATIVE: &str = "Creative";
    pub const EMPATHETIC: &str = "Empathetic";
    pub const EXPLORER: &str = "Explorer";
    pub const LEADER: &str = "Leader";
}
