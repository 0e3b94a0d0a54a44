//! The answer reducer.
//!
//! [`apply_answer`] turns `(session, answer)` into the next session plus
//! any UI signals the presentation layer should animate. It performs no I/O
//! and keeps no state of its own; the only nondeterminism is the bonus-life
//! roll, drawn from the caller's RNG so seeded runs replay exactly.
//!
//! # Order of effects
//!
//! 1. Grade the answer (timeout, personality, or graded).
//! 2. Roll for a bonus life on correct answers.
//! 3. Bank unused time for the stage of the question just answered, derived
//!    from the answered count.
//! 4. Recompute the stage of the next question.
//! 5. Check for running out of lives, then for a completed run.
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use zubo_logic::config::GameRules;
//! use zubo_logic::progression::{apply_answer, Answer};
//! use zubo_logic::question::Question;
//! use zubo_logic::session::GameSession;
//!
//! let rules = GameRules::default();
//! let mut session = GameSession::new(&rules);
//! session.start(&rules);
//!
//! let q = Question::graded(1, "2 + 2?", &["3", "4"], 1);
//! let mut rng = StdRng::seed_from_u64(7);
//! let outcome = apply_answer(&session, &q, Answer::Choice(1), 12_000, &rules, &mut rng);
//! assert_eq!(outcome.session.score, 1);
//! assert_eq!(outcome.earned_seconds, 48);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameRules;
use crate::constants::TIMEOUT_SENTINEL;
use crate::persona::{add_weight, Persona};
use crate::question::{Question, QuestionKind};
use crate::session::{AnswerRecord, GameSession, GameStatus};
use crate::stage::Stage;
use crate::time_bank::time_earned;

/// The player's response to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Answer {
    /// 0-based option index.
    Choice(usize),
    /// The countdown ran out before an answer was given.
    Timeout,
}

impl Answer {
    /// Map a raw index from the UI, where [`TIMEOUT_SENTINEL`] means timeout.
    /// Other negative values are not answers.
    pub fn from_index(index: i64) -> Option<Answer> {
        match index {
            TIMEOUT_SENTINEL => Some(Answer::Timeout),
            i if i >= 0 => usize::try_from(i).ok().map(Answer::Choice),
            _ => None,
        }
    }

    /// Raw index form, the inverse of [`Answer::from_index`].
    pub fn to_index(self) -> i64 {
        match self {
            Answer::Choice(i) => i as i64,
            Answer::Timeout => TIMEOUT_SENTINEL,
        }
    }
}

/// How an answer was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Correct,
    Incorrect,
    TimedOut,
    /// Personality questions have no wrong answer.
    Personality { persona: Persona, weight: u32 },
}

impl Grade {
    pub fn is_correct(self) -> bool {
        matches!(self, Grade::Correct | Grade::Personality { .. })
    }

    pub fn costs_life(self) -> bool {
        matches!(self, Grade::Incorrect | Grade::TimedOut)
    }
}

/// UI-only effects of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiSignal {
    LifeGained,
    StageTransition(Stage),
}

/// Result of applying one answer.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub session: GameSession,
    pub grade: Grade,
    pub earned_seconds: u32,
    pub signals: Vec<UiSignal>,
}

/// Judge `answer` against `question` without touching any state.
///
/// # Panics
///
/// If `answer` is a choice outside the question's options.
pub fn grade_answer(question: &Question, answer: Answer) -> Grade {
    let index = match answer {
        Answer::Timeout => return Grade::TimedOut,
        Answer::Choice(i) => i,
    };
    assert!(
        index < question.option_count(),
        "answer {} out of range for question {} with {} options",
        index,
        question.id,
        question.option_count()
    );

    match &question.kind {
        QuestionKind::Graded { correct_index, .. } => {
            if index == *correct_index {
                Grade::Correct
            } else {
                Grade::Incorrect
            }
        }
        QuestionKind::Personality { options } => {
            let option = &options[index];
            Grade::Personality {
                persona: option.persona,
                weight: option.weight,
            }
        }
    }
}

/// Apply one answer to `session`, returning the next session.
///
/// `elapsed_ms` is the time from showing the question to the answer. On
/// timeout the full stage limit is treated as used, so nothing is banked.
///
/// # Panics
///
/// If the session is not `Playing`, or if `answer` names an option the
/// question does not have. Both are caller contract violations.
pub fn apply_answer<R: Rng + ?Sized>(
    session: &GameSession,
    question: &Question,
    answer: Answer,
    elapsed_ms: u64,
    rules: &GameRules,
    rng: &mut R,
) -> AnswerOutcome {
    assert_eq!(
        session.status,
        GameStatus::Playing,
        "answers can only be applied while playing"
    );

    let grade = grade_answer(question, answer);
    let mut next = session.clone();
    let mut signals = Vec::new();

    match grade {
        Grade::Correct => next.score += 1,
        Grade::Incorrect | Grade::TimedOut => next.lives = next.lives.saturating_sub(1),
        Grade::Personality { persona, weight } => {
            add_weight(&mut next.persona_tally, persona, weight)
        }
    }

    if grade.is_correct() && rng.gen::<f64>() < rules.life_gain_chance {
        next.lives = next.lives.saturating_add(1);
        next.lives_bonus_gained += 1;
        signals.push(UiSignal::LifeGained);
    }

    let current = Stage::at_question(session.answered_count + 1);
    let limit = current.time_limit_seconds();
    let elapsed_seconds = match answer {
        Answer::Timeout => limit,
        Answer::Choice(_) => u32::try_from(elapsed_ms / 1000).unwrap_or(u32::MAX),
    };
    let earned = time_earned(limit, elapsed_seconds);
    next.time_bank = next.time_bank.deposit(earned);

    next.answered_count += 1;
    next.history.push(AnswerRecord {
        question_id: question.id,
        answer,
        elapsed_ms,
        correct: grade.is_correct(),
        seconds_earned: earned,
    });

    let upcoming = (next.answered_count + 1).min(rules.total_questions);
    let stage = Stage::at_question(upcoming);
    next.stage = stage;
    if stage != current {
        signals.push(UiSignal::StageTransition(stage));
    }

    if next.lives == 0 {
        next.status = GameStatus::Failure;
    } else if next.answered_count >= rules.total_questions {
        next.status = if next.score >= rules.pass_threshold {
            GameStatus::Success
        } else {
            GameStatus::Failure
        };
    } else {
        next.status = GameStatus::Playing;
        next.question_index += 1;
    }

    AnswerOutcome {
        session: next,
        grade,
        earned_seconds: earned,
        signals,
    }
}
