//! Question bank loading.
//!
//! The game ships with `data/questions.json`; alternative banks can be read
//! from disk. Either way the bank is validated before use.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zubo_logic::deck::{BankError, QuestionBank};

/// Question bank bundled with the game.
pub const BUILTIN_QUESTIONS_JSON: &str = include_str!("../../../data/questions.json");

#[derive(Debug, Error)]
pub enum BankLoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid question bank: {0:?}")]
    Invalid(Vec<BankError>),
}

/// Parse and validate a bank from JSON.
pub fn bank_from_json(json: &str) -> Result<QuestionBank, BankLoadError> {
    let bank: QuestionBank = serde_json::from_str(json)?;
    let errors = bank.validate();
    if !errors.is_empty() {
        return Err(BankLoadError::Invalid(errors));
    }
    log::debug!(
        "question bank: {} questions, {} riddles",
        bank.questions.len(),
        bank.riddles.len()
    );
    Ok(bank)
}

pub fn bank_from_path(path: impl AsRef<Path>) -> Result<QuestionBank, BankLoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| BankLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    bank_from_json(&json)
}

/// The bundled question bank.
pub fn builtin_bank() -> Result<QuestionBank, BankLoadError> {
    bank_from_json(BUILTIN_QUESTIONS_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zubo_logic::question::{Category, Difficulty};

    #[test]
    fn test_builtin_bank_is_valid() {
        let bank = builtin_bank().unwrap();
        assert_eq!(bank.questions.len(), 80);
        assert_eq!(bank.riddles.len(), 3);
        assert!(bank.riddles.iter().all(|q| q.category == Category::Riddle));
        assert!(bank
            .questions
            .iter()
            .any(|q| q.difficulty == Difficulty::Tough));
        assert!(bank.questions.iter().any(|q| q.is_personality()));
    }

    #[test]
    fn test_invalid_bank_reports_problems() {
        let json = r#"{
            "questions": [
                { "id": 1, "text": "a?", "category": "logical",
                  "kind": "graded", "options": ["x", "y"], "correct_index": 4 },
                { "id": 1, "text": "b?", "category": "logical",
                  "kind": "graded", "options": ["x", "y"], "correct_index": 0 }
            ]
        }"#;
        match bank_from_json(json) {
            Err(BankLoadError::Invalid(errors)) => {
                assert!(errors.contains(&BankError::DuplicateId(1)));
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected invalid bank, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_bank_rejected() {
        assert!(matches!(
            bank_from_json(r#"{ "questions": [] }"#),
            Err(BankLoadError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            bank_from_path("/nonexistent/zubo/questions.json"),
            Err(BankLoadError::Io { .. })
        ));
    }
}
