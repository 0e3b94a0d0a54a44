//! Pure game logic for Zubo.
//!
//! This crate contains all game logic that is independent of any storage,
//! UI, or payment provider. Functions take plain data and return results,
//! making them unit-testable and portable across the native engine, the
//! headless simtest harness, and any future front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Tunable game rules with defaults and validation |
//! | [`constants`] | Named policy values (question count, pass mark, exchange rate) |
//! | [`deck`] | Question bank validation, deck shuffling, riddle injection |
//! | [`leaderboard`] | Submission eligibility, entry building, ranking, stats |
//! | [`persona`] | Persona catalogue, tally accumulation, final persona resolution |
//! | [`progression`] | The answer reducer: grading, bonus lives, time earning, termination |
//! | [`question`] | Graded and personality question records |
//! | [`session`] | `GameSession` state and its non-answer transitions |
//! | [`stage`] | The four difficulty stages partitioning the 100-question run |
//! | [`store`] | Life packages and purchase lock-out |
//! | [`time_bank`] | Time earning, time-for-lives trading, display helpers |

pub mod config;
pub mod constants;
pub mod deck;
pub mod leaderboard;
pub mod persona;
pub mod progression;
pub mod question;
pub mod session;
pub mod stage;
pub mod store;
pub mod time_bank;
