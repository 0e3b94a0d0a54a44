//! Leaderboard rules: who may submit, what an entry holds and how entries rank.
//!
//! Storage of entries belongs to the hosted database; this module builds the
//! row from a finished session and a submission form, and provides the
//! ranking and summary statistics the leaderboard page shows.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::GameRules;
use crate::persona::Persona;
use crate::session::{GameSession, GameStatus};
use crate::time_bank::leaderboard_bonus_with;

/// Details the player types in when submitting a score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Bucket such as "20-29".
    pub age_range: String,
    pub feedback: Option<String>,
    /// 1–5 stars.
    pub rating: Option<u8>,
}

/// Submission form problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    EmptyFirstName,
    EmptyLastName,
    InvalidEmail(String),
    EmptyAgeRange,
    RatingOutOfRange(u8),
}

/// Final outcome recorded on an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalStatus {
    Success,
    Failure,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age_range: String,
    pub score: u32,
    pub lives_remaining: u32,
    pub questions_answered: u32,
    pub status: FinalStatus,
    pub persona: Persona,
    pub lives_bought: u32,
    pub lives_gained: u32,
    pub time_bank_seconds: u32,
    pub time_bank_bonus: u32,
    pub reached_threshold: bool,
    /// Raw answer indices, -1 for timeouts.
    pub answer_history: Vec<i64>,
    pub feedback: Option<String>,
    pub rating: Option<u8>,
}

/// Why a session could not be turned into an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRejected {
    /// The run is still going.
    NotFinished(GameStatus),
    BelowThreshold { answered: u32, required: u32 },
    InvalidForm(Vec<FormError>),
}

/// Aggregate numbers for the leaderboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeaderboardStats {
    /// Distinct emails.
    pub total_players: usize,
    pub total_games: usize,
    /// Mean score rounded to the nearest integer.
    pub average_score: u32,
    pub highest_score: u32,
}

/// Loose `local@domain.tld` check: no whitespace, exactly one `@`, and a dot
/// inside the domain with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Validate a submission form, returning all errors found.
pub fn validate_form(form: &PlayerForm) -> Vec<FormError> {
    let mut errors = Vec::new();

    if form.first_name.trim().is_empty() {
        errors.push(FormError::EmptyFirstName);
    }
    if form.last_name.trim().is_empty() {
        errors.push(FormError::EmptyLastName);
    }
    if !is_valid_email(form.email.trim()) {
        errors.push(FormError::InvalidEmail(form.email.clone()));
    }
    if form.age_range.trim().is_empty() {
        errors.push(FormError::EmptyAgeRange);
    }
    if let Some(rating) = form.rating {
        if !(1..=5).contains(&rating) {
            errors.push(FormError::RatingOutOfRange(rating));
        }
    }

    errors
}

/// Whether enough questions were answered to submit a score.
pub fn reached_threshold(session: &GameSession, rules: &GameRules) -> bool {
    session.answered_count >= rules.leaderboard_threshold
}

/// Build the leaderboard row for a finished session.
pub fn build_entry(
    session: &GameSession,
    form: &PlayerForm,
    rules: &GameRules,
) -> Result<LeaderboardEntry, EntryRejected> {
    let status = match session.status {
        GameStatus::Success => FinalStatus::Success,
        GameStatus::Failure => FinalStatus::Failure,
        other => return Err(EntryRejected::NotFinished(other)),
    };
    if !reached_threshold(session, rules) {
        return Err(EntryRejected::BelowThreshold {
            answered: session.answered_count,
            required: rules.leaderboard_threshold,
        });
    }
    let errors = validate_form(form);
    if !errors.is_empty() {
        return Err(EntryRejected::InvalidForm(errors));
    }

    Ok(LeaderboardEntry {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email: form.email.trim().to_lowercase(),
        age_range: form.age_range.trim().to_string(),
        score: session.score,
        lives_remaining: session.lives,
        questions_answered: session.answered_count,
        status,
        persona: session.persona(),
        lives_bought: session.lives_purchased,
        lives_gained: session.lives_bonus_gained,
        time_bank_seconds: session.time_bank.total_seconds,
        time_bank_bonus: leaderboard_bonus_with(
            &session.time_bank,
            rules.leaderboard_bonus_divisor,
        ),
        reached_threshold: true,
        answer_history: session.history.iter().map(|r| r.answer.to_index()).collect(),
        feedback: form.feedback.clone().filter(|f| !f.trim().is_empty()),
        rating: form.rating,
    })
}

/// Sort entries best-first: score, then questions answered, both descending.
pub fn rank_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.questions_answered.cmp(&a.questions_answered))
    });
}

/// The best `limit` entries, best first.
pub fn top_entries(entries: &[LeaderboardEntry], limit: usize) -> Vec<LeaderboardEntry> {
    let mut ranked = entries.to_vec();
    rank_entries(&mut ranked);
    ranked.truncate(limit);
    ranked
}

/// 1-based rank of the entry with `email`'s best score.
pub fn rank_of(entries: &[LeaderboardEntry], email: &str) -> Option<usize> {
    let email = email.trim().to_lowercase();
    let mut ranked = entries.to_vec();
    rank_entries(&mut ranked);
    ranked.iter().position(|e| e.email == email).map(|i| i + 1)
}

impl LeaderboardStats {
    pub fn from_entries(entries: &[LeaderboardEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }
        let players: HashSet<&str> = entries.iter().map(|e| e.email.as_str()).collect();
        let total: u64 = entries.iter().map(|e| e.score as u64).sum();
        let count = entries.len() as u64;
        Self {
            total_players: players.len(),
            total_games: entries.len(),
            average_score: ((total + count / 2) / count) as u32,
            highest_score: entries.iter().map(|e| e.score).max().unwrap_or(0),
        }
    }
}
