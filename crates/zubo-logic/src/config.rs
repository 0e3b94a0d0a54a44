//! Tunable game rules.
//!
//! Every policy value the engine consults lives in [`GameRules`]. The
//! defaults reproduce the standard game; a rules file may override any
//! subset of fields (missing fields fall back to the defaults).
//!
//! ```
//! use zubo_logic::config::{validate_rules, GameRules};
//!
//! let mut rules = GameRules::default();
//! rules.starting_lives = 5;
//! assert!(validate_rules(&rules).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{
    LEADERBOARD_BONUS_DIVISOR, LEADERBOARD_THRESHOLD, LIFE_GAIN_CHANCE, PASS_THRESHOLD,
    RIDDLES_PER_DECK, SECONDS_PER_LIFE, STARTING_LIVES, STORE_CUTOFF, TOTAL_QUESTIONS,
};

/// Policy values consulted by the reducer, the store and the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Questions in a full run (at most [`TOTAL_QUESTIONS`]).
    pub total_questions: u32,
    /// Score needed at the end of the run to succeed.
    pub pass_threshold: u32,
    /// Lives at the start of a fresh session.
    pub starting_lives: u32,
    /// Chance (0.0–1.0) that a correct answer awards a bonus life.
    pub life_gain_chance: f64,
    /// Time-bank seconds per traded life.
    pub seconds_per_life: u32,
    /// Divisor for the leaderboard time-bank bonus.
    pub leaderboard_bonus_divisor: u32,
    /// Answered questions required before leaderboard submission.
    pub leaderboard_threshold: u32,
    /// Answered questions after which life purchases are locked.
    pub store_cutoff: u32,
    /// Riddles injected into each new deck.
    pub riddles_per_deck: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            total_questions: TOTAL_QUESTIONS,
            pass_threshold: PASS_THRESHOLD,
            starting_lives: STARTING_LIVES,
            life_gain_chance: LIFE_GAIN_CHANCE,
            seconds_per_life: SECONDS_PER_LIFE,
            leaderboard_bonus_divisor: LEADERBOARD_BONUS_DIVISOR,
            leaderboard_threshold: LEADERBOARD_THRESHOLD,
            store_cutoff: STORE_CUTOFF,
            riddles_per_deck: RIDDLES_PER_DECK,
        }
    }
}

/// Rules validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum RulesError {
    /// Run length is zero or longer than the stage table covers.
    InvalidTotalQuestions(u32),
    /// Pass mark exceeds the run length.
    PassThresholdTooHigh { threshold: u32, total: u32 },
    /// A session must start with at least one life.
    NoStartingLives,
    /// Bonus chance outside 0.0–1.0 (or NaN).
    InvalidLifeGainChance(f64),
    /// Exchange rate of zero would make lives free.
    ZeroSecondsPerLife,
    /// Bonus divisor of zero.
    ZeroBonusDivisor,
    /// Threshold longer than the run itself.
    LeaderboardThresholdTooHigh { threshold: u32, total: u32 },
}

/// Validate a rules set, returning all errors found.
pub fn validate_rules(rules: &GameRules) -> Vec<RulesError> {
    let mut errors = Vec::new();

    if rules.total_questions == 0 || rules.total_questions > TOTAL_QUESTIONS {
        errors.push(RulesError::InvalidTotalQuestions(rules.total_questions));
    }
    if rules.pass_threshold > rules.total_questions {
        errors.push(RulesError::PassThresholdTooHigh {
            threshold: rules.pass_threshold,
            total: rules.total_questions,
        });
    }
    if rules.starting_lives == 0 {
        errors.push(RulesError::NoStartingLives);
    }
    if !(0.0..=1.0).contains(&rules.life_gain_chance) {
        errors.push(RulesError::InvalidLifeGainChance(rules.life_gain_chance));
    }
    if rules.seconds_per_life == 0 {
        errors.push(RulesError::ZeroSecondsPerLife);
    }
    if rules.leaderboard_bonus_divisor == 0 {
        errors.push(RulesError::ZeroBonusDivisor);
    }
    if rules.leaderboard_threshold > rules.total_questions {
        errors.push(RulesError::LeaderboardThresholdTooHigh {
            threshold: rules.leaderboard_threshold,
            total: rules.total_questions,
        });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_valid() {
        assert!(validate_rules(&GameRules::default()).is_empty());
    }

    #[test]
    fn test_default_rules_match_constants() {
        let rules = GameRules::default();
        assert_eq!(rules.total_questions, 100);
        assert_eq!(rules.pass_threshold, 75);
        assert_eq!(rules.starting_lives, 3);
        assert_eq!(rules.seconds_per_life, 1000);
        assert_eq!(rules.leaderboard_bonus_divisor, 4);
    }

    #[test]
    fn test_collects_every_error() {
        let rules = GameRules {
            total_questions: 0,
            pass_threshold: 10,
            starting_lives: 0,
            life_gain_chance: 1.5,
            seconds_per_life: 0,
            leaderboard_bonus_divisor: 0,
            leaderboard_threshold: 5,
            ..GameRules::default()
        };
        let errors = validate_rules(&rules);
        assert_eq!(errors.len(), 7);
        assert!(errors.contains(&RulesError::NoStartingLives));
        assert!(errors.contains(&RulesError::InvalidLifeGainChance(1.5)));
    }

    #[test]
    fn test_nan_chance_rejected() {
        let rules = GameRules {
            life_gain_chance: f64::NAN,
            ..GameRules::default()
        };
        assert_eq!(validate_rules(&rules).len(), 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let rules: GameRules = serde_json::from_str(r#"{ "starting_lives": 5 }"#).unwrap();
        assert_eq!(rules.starting_lives, 5);
        assert_eq!(rules.total_questions, 100);
        assert_eq!(rules.life_gain_chance, 0.2);
    }
}
