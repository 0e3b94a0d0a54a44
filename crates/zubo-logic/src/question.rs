//! Question records.
//!
//! A question is either *graded* (one correct option) or *personality*
//! (no wrong answer; each option names the persona it feeds and the weight
//! it adds). Personality options carry their persona explicitly, so option
//! order alone decides which persona a click credits.

use serde::{Deserialize, Serialize};

use crate::persona::Persona;

/// Broad topic of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Logical,
    Analytical,
    GeneralKnowledge,
    Personality,
    Riddle,
}

/// Deck-balancing difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Tough,
    #[default]
    Regular,
}

/// One option of a personality question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaOption {
    pub text: String,
    pub persona: Persona,
    pub weight: u32,
}

/// How a question's answer is scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    Graded {
        options: Vec<String>,
        correct_index: usize,
    },
    Personality {
        options: Vec<PersonaOption>,
    },
}

/// An immutable question record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub category: Category,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Whether the countdown is shown for this question.
    #[serde(default)]
    pub timed: bool,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Structural problem with a question record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionError {
    EmptyText,
    /// Fewer than two options.
    TooFewOptions(usize),
    /// Correct index does not name an option.
    CorrectIndexOutOfRange { index: usize, options: usize },
    /// An option's text is blank.
    EmptyOption(usize),
}

impl Question {
    pub fn graded(id: u32, text: &str, options: &[&str], correct_index: usize) -> Self {
        Self {
            id,
            text: text.to_string(),
            category: Category::GeneralKnowledge,
            difficulty: Difficulty::Regular,
            timed: false,
            kind: QuestionKind::Graded {
                options: options.iter().map(|o| o.to_string()).collect(),
                correct_index,
            },
        }
    }

    pub fn personality(id: u32, text: &str, options: &[(&str, Persona, u32)]) -> Self {
        Self {
            id,
            text: text.to_string(),
            category: Category::Personality,
            difficulty: Difficulty::Regular,
            timed: false,
            kind: QuestionKind::Personality {
                options: options
                    .iter()
                    .map(|(text, persona, weight)| PersonaOption {
                        text: text.to_string(),
                        persona: *persona,
                        weight: *weight,
                    })
                    .collect(),
            },
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn as_timed(mut self) -> Self {
        self.timed = true;
        self
    }

    pub fn option_count(&self) -> usize {
        match &self.kind {
            QuestionKind::Graded { options, .. } => options.len(),
            QuestionKind::Personality { options } => options.len(),
        }
    }

    /// Option texts in display order.
    pub fn option_texts(&self) -> Vec<&str> {
        match &self.kind {
            QuestionKind::Graded { options, .. } => options.iter().map(String::as_str).collect(),
            QuestionKind::Personality { options } => {
                options.iter().map(|o| o.text.as_str()).collect()
            }
        }
    }

    pub fn is_personality(&self) -> bool {
        matches!(self.kind, QuestionKind::Personality { .. })
    }

    /// Correct option for graded questions.
    pub fn correct_index(&self) -> Option<usize> {
        match self.kind {
            QuestionKind::Graded { correct_index, .. } => Some(correct_index),
            QuestionKind::Personality { .. } => None,
        }
    }

    /// Persona binding of option `index` for personality questions.
    pub fn persona_option(&self, index: usize) -> Option<&PersonaOption> {
        match &self.kind {
            QuestionKind::Personality { options } => options.get(index),
            QuestionKind::Graded { .. } => None,
        }
    }

    /// Check the record's shape, returning all problems found.
    pub fn validate(&self) -> Vec<QuestionError> {
        let mut errors = Vec::new();

        if self.text.trim().is_empty() {
            errors.push(QuestionError::EmptyText);
        }

        let count = self.option_count();
        if count < 2 {
            errors.push(QuestionError::TooFewOptions(count));
        }

        for (i, text) in self.option_texts().iter().enumerate() {
            if text.trim().is_empty() {
                errors.push(QuestionError::EmptyOption(i));
            }
        }

        if let QuestionKind::Graded { correct_index, .. } = self.kind {
            if correct_index >= count {
                errors.push(QuestionError::CorrectIndexOutOfRange {
                    index: correct_index,
                    options: count,
                });
            }
        }

        errors
    }
}
