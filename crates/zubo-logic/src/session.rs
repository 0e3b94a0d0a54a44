//! Game session state.
//!
//! [`GameSession`] is the single value threaded through a run. Answers are
//! applied by [`crate::progression::apply_answer`]; this module covers the
//! remaining transitions: starting, restarting, the store screen, purchased
//! lives and time-for-lives trades.

use serde::{Deserialize, Serialize};

use crate::config::GameRules;
use crate::persona::{resolve_persona, Persona, PersonaTally};
use crate::progression::Answer;
use crate::stage::Stage;
use crate::time_bank::{trade_time_for_lives_at, TimeBank, TradeRejected};

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Menu,
    Playing,
    Store,
    Success,
    Failure,
}

impl GameStatus {
    /// True once the run has ended, either way.
    pub fn is_finished(self) -> bool {
        matches!(self, GameStatus::Success | GameStatus::Failure)
    }
}

/// What happened on one answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: u32,
    pub answer: Answer,
    pub elapsed_ms: u64,
    pub correct: bool,
    pub seconds_earned: u32,
}

/// All mutable state of one player's run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    /// Index of the question being shown.
    pub question_index: u32,
    /// Correct answers to graded questions.
    pub score: u32,
    pub lives: u32,
    /// Questions answered so far, timeouts included.
    pub answered_count: u32,
    pub persona_tally: PersonaTally,
    pub status: GameStatus,
    pub time_bank: TimeBank,
    /// Stage of the next question to show. Display only; answers derive the
    /// stage from `answered_count`.
    pub stage: Stage,
    pub lives_purchased: u32,
    pub lives_bonus_gained: u32,
    pub history: Vec<AnswerRecord>,
    /// Screen to return to when the store closes.
    pub store_return: Option<GameStatus>,
}

impl GameSession {
    /// A fresh session on the menu screen.
    pub fn new(rules: &GameRules) -> Self {
        Self {
            question_index: 0,
            score: 0,
            lives: rules.starting_lives,
            answered_count: 0,
            persona_tally: PersonaTally::new(),
            status: GameStatus::Menu,
            time_bank: TimeBank::new(),
            stage: Stage::Foundation,
            lives_purchased: 0,
            lives_bonus_gained: 0,
            history: Vec::new(),
            store_return: None,
        }
    }

    /// Begin a run. Progress is cleared; lives bought on the menu carry over.
    pub fn start(&mut self, rules: &GameRules) {
        let lives = if self.lives > 0 {
            self.lives
        } else {
            rules.starting_lives
        };
        let lives_purchased = self.lives_purchased;

        *self = Self::new(rules);
        self.lives = lives;
        self.lives_purchased = lives_purchased;
        self.status = GameStatus::Playing;
    }

    /// Throw the session away and return to menu defaults.
    pub fn restart(&mut self, rules: &GameRules) {
        *self = Self::new(rules);
    }

    /// 1-based number of the question being shown.
    pub fn question_number(&self) -> u32 {
        self.answered_count + 1
    }

    /// The run ended because lives hit zero (as opposed to the score check).
    pub fn ran_out_of_lives(&self) -> bool {
        self.status == GameStatus::Failure && self.lives == 0
    }

    /// Persona the tally currently points at.
    pub fn persona(&self) -> Persona {
        resolve_persona(&self.persona_tally)
    }

    /// Lives granted by the payment gateway.
    pub fn apply_purchase(&mut self, lives: u32) {
        self.lives = self.lives.saturating_add(lives);
        self.lives_purchased = self.lives_purchased.saturating_add(lives);
    }

    /// Exchange banked time for lives. A rejected trade leaves the session as it was.
    pub fn trade_time_for_lives(
        &mut self,
        lives: u32,
        rules: &GameRules,
    ) -> Result<(), TradeRejected> {
        let bank = trade_time_for_lives_at(&self.time_bank, lives, rules.seconds_per_life)?;
        self.time_bank = bank;
        self.lives = self.lives.saturating_add(lives);
        Ok(())
    }

    /// Switch to the store screen, remembering where we came from.
    ///
    /// Returns false if the store is already open.
    pub fn open_store(&mut self) -> bool {
        if self.status == GameStatus::Store {
            return false;
        }
        self.store_return = Some(self.status);
        self.status = GameStatus::Store;
        true
    }

    /// Leave the store.
    ///
    /// A run that failed only because lives ran out resumes on the next
    /// question if lives were bought; everything else returns to the screen
    /// the store was opened from.
    pub fn close_store(&mut self, rules: &GameRules) {
        if self.status != GameStatus::Store {
            return;
        }
        self.status = match self.store_return.take() {
            Some(GameStatus::Failure)
                if self.lives > 0 && self.answered_count < rules.total_questions =>
            {
                self.question_index = self.answered_count;
                GameStatus::Playing
            }
            Some(status) => status,
            None => GameStatus::Menu,
        };
    }
}
