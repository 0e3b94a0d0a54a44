//! The four difficulty stages of a run.
//!
//! Stages partition question numbers 1..=100 with no gaps or overlaps.
//! Each carries the per-question time limit used both by the countdown and
//! by the time-bank earning rule.

use serde::{Deserialize, Serialize};

use crate::constants::TOTAL_QUESTIONS;

/// A difficulty band of the run, ordered from first to last.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Stage {
    #[default]
    Foundation,
    Ascension,
    Mastery,
    Transcendence,
}

/// Display difficulty of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageDifficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Stage {
    /// All stages in run order.
    pub const ALL: [Stage; 4] = [
        Stage::Foundation,
        Stage::Ascension,
        Stage::Mastery,
        Stage::Transcendence,
    ];

    /// 1-based stage number.
    pub fn id(self) -> u8 {
        match self {
            Stage::Foundation => 1,
            Stage::Ascension => 2,
            Stage::Mastery => 3,
            Stage::Transcendence => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Foundation => "Foundation",
            Stage::Ascension => "Ascension",
            Stage::Mastery => "Mastery",
            Stage::Transcendence => "Transcendence",
        }
    }

    /// Inclusive `(start, end)` question numbers covered by this stage.
    pub fn question_range(self) -> (u32, u32) {
        match self {
            Stage::Foundation => (1, 25),
            Stage::Ascension => (26, 50),
            Stage::Mastery => (51, 75),
            Stage::Transcendence => (76, 100),
        }
    }

    /// Seconds allowed per question in this stage.
    pub fn time_limit_seconds(self) -> u32 {
        match self {
            Stage::Foundation => 60,
            Stage::Ascension => 45,
            Stage::Mastery => 30,
            Stage::Transcendence => 20,
        }
    }

    pub fn difficulty(self) -> StageDifficulty {
        match self {
            Stage::Foundation => StageDifficulty::Easy,
            Stage::Ascension => StageDifficulty::Medium,
            Stage::Mastery => StageDifficulty::Hard,
            Stage::Transcendence => StageDifficulty::Expert,
        }
    }

    pub fn contains(self, question_number: u32) -> bool {
        let (start, end) = self.question_range();
        (start..=end).contains(&question_number)
    }

    /// The stage covering a 1-based question number, if any.
    pub fn for_question(question_number: u32) -> Option<Stage> {
        Self::ALL.into_iter().find(|s| s.contains(question_number))
    }

    /// Like [`Stage::for_question`], clamping numbers outside 1..=100 to the
    /// first or last stage.
    pub fn at_question(question_number: u32) -> Stage {
        Self::for_question(question_number.clamp(1, TOTAL_QUESTIONS)).unwrap_or(Stage::Foundation)
    }

    /// The stage that follows this one.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Foundation => Some(Stage::Ascension),
            Stage::Ascension => Some(Stage::Mastery),
            Stage::Mastery => Some(Stage::Transcendence),
            Stage::Transcendence => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stage {}: {}", self.id(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_first_stage() {
        assert_eq!(Stage::default(), Stage::Foundation);
        assert_eq!(Stage::default(), Stage::ALL[0]);
    }

    #[test]
    fn test_stages_partition_the_run() {
        for q in 1..=TOTAL_QUESTIONS {
            let covering = Stage::ALL.iter().filter(|s| s.contains(q)).count();
            assert_eq!(covering, 1, "question {} covered by {} stages", q, covering);
        }
    }

    #[test]
    fn test_ranges_are_contiguous() {
        let mut expected_start = 1;
        for stage in Stage::ALL {
            let (start, end) = stage.question_range();
            assert_eq!(start, expected_start);
            assert!(end >= start);
            expected_start = end + 1;
        }
        assert_eq!(expected_start, TOTAL_QUESTIONS + 1);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(Stage::for_question(25), Some(Stage::Foundation));
        assert_eq!(Stage::for_question(26), Some(Stage::Ascension));
        assert_eq!(Stage::for_question(75), Some(Stage::Mastery));
        assert_eq!(Stage::for_question(76), Some(Stage::Transcendence));
        assert_eq!(Stage::for_question(0), None);
        assert_eq!(Stage::for_question(101), None);
    }

    #[test]
    fn test_at_question_clamps() {
        assert_eq!(Stage::at_question(0), Stage::Foundation);
        assert_eq!(Stage::at_question(101), Stage::Transcendence);
        assert_eq!(Stage::at_question(u32::MAX), Stage::Transcendence);
    }

    #[test]
    fn test_time_limits_shrink() {
        let limits: Vec<u32> = Stage::ALL.iter().map(|s| s.time_limit_seconds()).collect();
        assert_eq!(limits, vec![60, 45, 30, 20]);
    }

    #[test]
    fn test_next_walks_in_order() {
        let mut stage = Stage::Foundation;
        let mut seen = vec![stage];
        while let Some(n) = stage.next() {
            assert!(n > stage);
            seen.push(n);
            stage = n;
        }
        assert_eq!(seen, Stage::ALL.to_vec());
    }

    #[test]
    fn test_display() {
        assert_eq!(Stage::Mastery.to_string(), "Stage 3: Mastery");
    }
}
