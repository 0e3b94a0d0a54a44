//! Zubo Core - Game Engine
//!
//! Owns one player's [`GameSession`](zubo_logic::session::GameSession)
//! together with the question deck, a seedable random source and an
//! optional persistence port. All game rules live in `zubo-logic`; this
//! crate wires them to data files, snapshots and logging.
//!
//! # Example
//!
//! ```rust,no_run
//! use zubo_core::prelude::*;
//!
//! let mut engine = GameEngine::new(GameRules::default(), builtin_bank()?, 42);
//! engine.start()?;
//!
//! while engine.status() == GameStatus::Playing {
//!     let report = engine.answer(Answer::Choice(0), 5_000)?;
//!     for signal in report.signals {
//!         println!("{:?}", signal);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bank;
pub mod config;
pub mod engine;
pub mod persistence;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::bank::builtin_bank;
    pub use crate::engine::{AnswerReport, EngineError, GameEngine};
    pub use crate::persistence::{FileStore, MemoryStore, SessionStore, Snapshot};
    pub use zubo_logic::config::GameRules;
    pub use zubo_logic::progression::{Answer, UiSignal};
    pub use zubo_logic::session::{GameSession, GameStatus};
}
