//! Game engine - main entry point for playing a run

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use zubo_logic::config::GameRules;
use zubo_logic::deck::{deal_deck, graded_count, QuestionBank};
use zubo_logic::leaderboard::{build_entry, EntryRejected, LeaderboardEntry, PlayerForm};
use zubo_logic::persona::Persona;
use zubo_logic::progression::{apply_answer, Answer, Grade, UiSignal};
use zubo_logic::question::Question;
use zubo_logic::session::{GameSession, GameStatus};
use zubo_logic::store::{package, purchases_allowed};
use zubo_logic::time_bank::TradeRejected;

use crate::persistence::{SaveError, SessionStore, Snapshot};

/// Reasons an engine operation was refused. The session is unchanged.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot {action} while {status:?}")]
    InvalidState {
        action: &'static str,
        status: GameStatus,
    },
    #[error("option {index} does not exist (question has {options})")]
    InvalidChoice { index: usize, options: usize },
    #[error("question bank has no questions")]
    EmptyBank,
    #[error("no question at deck position {0}")]
    MissingQuestion(u32),
    #[error("trade rejected: {0}")]
    Trade(#[from] TradeRejected),
    #[error("purchases are locked after {cutoff} answered questions")]
    PurchasesLocked { cutoff: u32 },
    #[error("unknown life package {0}")]
    UnknownPackage(u8),
    #[error("leaderboard entry rejected: {0:?}")]
    Entry(EntryRejected),
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// What the presentation layer needs after an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerReport {
    pub grade: Grade,
    pub earned_seconds: u32,
    pub signals: Vec<UiSignal>,
    /// Status after the answer.
    pub status: GameStatus,
}

/// Owns one player's session and everything needed to advance it.
pub struct GameEngine {
    rules: GameRules,
    bank: QuestionBank,
    session: GameSession,
    /// Questions of the current run, indexed by `session.question_index`.
    deck: Vec<Question>,
    rng: StdRng,
    store: Option<Box<dyn SessionStore>>,
}

impl GameEngine {
    /// Create an engine on the menu screen. `seed` drives deck shuffling and
    /// bonus-life rolls.
    pub fn new(rules: GameRules, bank: QuestionBank, seed: u64) -> Self {
        let session = GameSession::new(&rules);
        Self {
            rules,
            bank,
            session,
            deck: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            store: None,
        }
    }

    /// Attach a store; every later mutation is saved to it.
    pub fn with_store(mut self, store: impl SessionStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Restore the run saved in the attached store.
    ///
    /// Returns `Ok(false)` if there is no store or nothing saved.
    pub fn resume(&mut self) -> Result<bool, EngineError> {
        let Some(store) = self.store.as_ref() else {
            return Ok(false);
        };
        let Some(snapshot) = store.load()? else {
            return Ok(false);
        };

        let deck = snapshot
            .deck
            .iter()
            .map(|&id| {
                self.bank
                    .find(id)
                    .cloned()
                    .ok_or(SaveError::UnknownQuestion(id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.session = snapshot.session;
        self.deck = deck;
        log::info!(
            "resumed session at question {} ({:?}, {} lives)",
            self.session.question_number(),
            self.session.status,
            self.session.lives
        );
        Ok(true)
    }

    /// Begin a run with a freshly shuffled deck.
    ///
    /// Allowed from the menu and from a finished run, which is reset first.
    pub fn start(&mut self) -> Result<(), EngineError> {
        let status = self.session.status;
        if status != GameStatus::Menu && !status.is_finished() {
            return Err(EngineError::InvalidState {
                action: "start",
                status,
            });
        }
        if self.bank.is_empty() {
            return Err(EngineError::EmptyBank);
        }
        if status.is_finished() {
            self.session.restart(&self.rules);
        }

        self.deck = deal_deck(&self.bank, &self.rules, &mut self.rng);
        self.session.start(&self.rules);

        log::info!(
            "game started: {} questions ({} graded), {} lives",
            self.deck.len(),
            graded_count(&self.deck),
            self.session.lives
        );
        self.autosave();
        Ok(())
    }

    /// The question being shown, if a run is in progress.
    pub fn current_question(&self) -> Option<&Question> {
        if self.session.status != GameStatus::Playing {
            return None;
        }
        self.deck.get(self.session.question_index as usize)
    }

    /// Answer the current question. `elapsed_ms` is the time since it was shown.
    pub fn answer(&mut self, answer: Answer, elapsed_ms: u64) -> Result<AnswerReport, EngineError> {
        let status = self.session.status;
        if status != GameStatus::Playing {
            log::warn!("answer ignored: session is {:?}", status);
            return Err(EngineError::InvalidState {
                action: "answer",
                status,
            });
        }

        let index = self.session.question_index;
        let question = self
            .deck
            .get(index as usize)
            .ok_or(EngineError::MissingQuestion(index))?;
        if let Answer::Choice(choice) = answer {
            if choice >= question.option_count() {
                return Err(EngineError::InvalidChoice {
                    index: choice,
                    options: question.option_count(),
                });
            }
        }

        let outcome = apply_answer(
            &self.session,
            question,
            answer,
            elapsed_ms,
            &self.rules,
            &mut self.rng,
        );
        log::debug!(
            "q{} (id {}): {:?}, +{}s",
            outcome.session.answered_count,
            question.id,
            outcome.grade,
            outcome.earned_seconds
        );

        for signal in &outcome.signals {
            match signal {
                UiSignal::StageTransition(stage) => log::info!("entering {}", stage),
                UiSignal::LifeGained => {
                    log::debug!("bonus life, now {}", outcome.session.lives)
                }
            }
        }

        self.session = outcome.session;
        if self.session.status.is_finished() {
            log::info!(
                "game over: {:?}, score {}/{}, {} answered, persona {}",
                self.session.status,
                self.session.score,
                self.rules.total_questions,
                self.session.answered_count,
                self.session.persona()
            );
        }
        self.autosave();

        Ok(AnswerReport {
            grade: outcome.grade,
            earned_seconds: outcome.earned_seconds,
            signals: outcome.signals,
            status: self.session.status,
        })
    }

    /// Exchange banked time for lives.
    pub fn trade_time_for_lives(&mut self, lives: u32) -> Result<(), EngineError> {
        if let Err(rejected) = self.session.trade_time_for_lives(lives, &self.rules) {
            log::warn!("trade for {} lives rejected: {}", lives, rejected);
            return Err(rejected.into());
        }
        log::info!(
            "traded time for {} lives, {}s left in bank",
            lives,
            self.session.time_bank.total_seconds
        );
        self.autosave();
        Ok(())
    }

    /// Credit lives confirmed by the payment provider.
    pub fn purchase_lives(&mut self, lives: u32) -> Result<(), EngineError> {
        if !purchases_allowed(&self.session, &self.rules) {
            log::warn!(
                "purchase of {} lives refused at question {}",
                lives,
                self.session.question_number()
            );
            return Err(EngineError::PurchasesLocked {
                cutoff: self.rules.store_cutoff,
            });
        }
        self.session.apply_purchase(lives);
        log::info!("purchased {} lives, now {}", lives, self.session.lives);
        self.autosave();
        Ok(())
    }

    /// Credit one of the store's life packages. Returns the lives added.
    pub fn purchase_package(&mut self, id: u8) -> Result<u32, EngineError> {
        let lives = package(id).ok_or(EngineError::UnknownPackage(id))?.lives;
        self.purchase_lives(lives)?;
        Ok(lives)
    }

    /// Returns false if the store was already open.
    pub fn open_store(&mut self) -> bool {
        let opened = self.session.open_store();
        if opened {
            self.autosave();
        }
        opened
    }

    pub fn close_store(&mut self) {
        let was_failed = self.session.store_return == Some(GameStatus::Failure);
        self.session.close_store(&self.rules);
        if was_failed && self.session.status == GameStatus::Playing {
            log::info!(
                "run resumed at question {} with {} lives",
                self.session.question_number(),
                self.session.lives
            );
        }
        self.autosave();
    }

    /// Abandon the run and return to the menu. The saved snapshot is removed.
    pub fn restart(&mut self) {
        self.session.restart(&self.rules);
        self.deck.clear();
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.clear() {
                log::warn!("failed to clear saved session: {}", e);
            }
        }
    }

    pub fn persona(&self) -> Persona {
        self.session.persona()
    }

    /// Build the leaderboard row for the finished run.
    pub fn leaderboard_entry(&self, form: &PlayerForm) -> Result<LeaderboardEntry, EngineError> {
        build_entry(&self.session, form, &self.rules).map_err(EngineError::Entry)
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn status(&self) -> GameStatus {
        self.session.status
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn deck(&self) -> &[Question] {
        &self.deck
    }

    /// Snapshot of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.session.clone(),
            self.deck.iter().map(|q| q.id).collect(),
        )
    }

    /// Save to the attached store. A failed save is logged and play continues.
    fn autosave(&mut self) {
        if self.store.is_none() {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.save(&snapshot) {
                log::warn!("autosave failed: {}", e);
            }
        }
    }
}
