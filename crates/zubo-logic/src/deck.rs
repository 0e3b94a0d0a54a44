//! Question bank validation and deck building.
//!
//! A deck is the ordered sequence of questions for one run. It is built by
//! shuffling the bank, balancing tough against regular questions, and
//! swapping a handful of riddles into random positions. When the bank holds
//! fewer questions than the run needs, further shuffled passes are appended.
//!
//! Personality questions never score, so [`deal_deck`] caps them at
//! `total_questions - pass_threshold`. A player who answers every graded
//! question correctly always reaches the pass mark.

use std::collections::HashSet;

use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameRules;
use crate::question::{Difficulty, Question, QuestionError};

/// Every question the game can draw from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub questions: Vec<Question>,
    /// Riddles injected into decks; never drawn as regular questions.
    #[serde(default)]
    pub riddles: Vec<Question>,
}

/// Problem with a question bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    /// No regular questions to build a deck from.
    Empty,
    /// Two records share an id (riddles included).
    DuplicateId(u32),
    InvalidQuestion { id: u32, error: QuestionError },
}

impl QuestionBank {
    /// Check every record, returning all problems found.
    pub fn validate(&self) -> Vec<BankError> {
        let mut errors = Vec::new();

        if self.questions.is_empty() {
            errors.push(BankError::Empty);
        }

        let mut seen = HashSet::new();
        for q in self.questions.iter().chain(&self.riddles) {
            if !seen.insert(q.id) {
                errors.push(BankError::DuplicateId(q.id));
            }
            for error in q.validate() {
                errors.push(BankError::InvalidQuestion { id: q.id, error });
            }
        }

        errors
    }

    /// Look up a question or riddle by id.
    pub fn find(&self, id: u32) -> Option<&Question> {
        self.questions
            .iter()
            .chain(&self.riddles)
            .find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Build a deck of `count` questions from the bank.
///
/// Each pass over the bank pairs an equal number of tough and regular
/// questions, shuffles them together, then appends whatever is left over.
/// Returns an empty deck if the bank is empty.
pub fn build_deck<R: Rng + ?Sized>(
    bank: &QuestionBank,
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut deck = Vec::with_capacity(count);
    if bank.questions.is_empty() {
        return deck;
    }

    while deck.len() < count {
        let pass = balanced_pass(&bank.questions, rng);
        let needed = count - deck.len();
        deck.extend(pass.into_iter().take(needed));
    }

    deck
}

fn balanced_pass<R: Rng + ?Sized>(questions: &[Question], rng: &mut R) -> Vec<Question> {
    let mut shuffled = questions.to_vec();
    shuffled.shuffle(rng);

    let (mut tough, mut regular): (Vec<Question>, Vec<Question>) = shuffled
        .into_iter()
        .partition(|q| q.difficulty == Difficulty::Tough);

    let paired = tough.len().min(regular.len());
    let mut pass: Vec<Question> = tough.drain(..paired).chain(regular.drain(..paired)).collect();
    pass.shuffle(rng);
    pass.extend(tough);
    pass.extend(regular);
    pass
}

/// Replace up to `count` distinct deck positions with distinct riddles.
///
/// Returns how many riddles were injected.
pub fn inject_riddles<R: Rng + ?Sized>(
    deck: &mut [Question],
    riddles: &[Question],
    count: usize,
    rng: &mut R,
) -> usize {
    let n = count.min(riddles.len()).min(deck.len());
    if n == 0 {
        return 0;
    }

    let positions = index::sample(rng, deck.len(), n);
    let picks = index::sample(rng, riddles.len(), n);
    for (pos, pick) in positions.iter().zip(picks.iter()) {
        deck[pos] = riddles[pick].clone();
    }
    n
}

/// Swap personality questions beyond `max` for graded questions from the bank.
///
/// Replacements prefer graded questions not already in the deck. Returns how
/// many positions were swapped; fewer than needed only if the bank has no
/// graded questions at all.
pub fn limit_personality<R: Rng + ?Sized>(
    deck: &mut [Question],
    bank: &QuestionBank,
    max: usize,
    rng: &mut R,
) -> usize {
    let positions: Vec<usize> = deck
        .iter()
        .enumerate()
        .filter(|(_, q)| q.is_personality())
        .map(|(i, _)| i)
        .collect();
    if positions.len() <= max {
        return 0;
    }

    let mut graded: Vec<&Question> = bank
        .questions
        .iter()
        .filter(|q| !q.is_personality())
        .collect();
    if graded.is_empty() {
        return 0;
    }
    graded.shuffle(rng);
    let in_deck: HashSet<u32> = deck.iter().map(|q| q.id).collect();
    // unused questions first, then repeats
    graded.sort_by_key(|q| in_deck.contains(&q.id));

    let excess = positions.len() - max;
    let picks = index::sample(rng, positions.len(), excess);
    for (n, pick) in picks.iter().enumerate() {
        deck[positions[pick]] = graded[n % graded.len()].clone();
    }
    excess
}

/// Deal the deck for one run under `rules`: balanced build, personality cap,
/// then riddles. Riddles are graded, so swapping them in never lowers the
/// graded count.
pub fn deal_deck<R: Rng + ?Sized>(
    bank: &QuestionBank,
    rules: &GameRules,
    rng: &mut R,
) -> Vec<Question> {
    let total = rules.total_questions as usize;
    let max_personality = rules.total_questions.saturating_sub(rules.pass_threshold) as usize;

    let mut deck = build_deck(bank, total, rng);
    limit_personality(&mut deck, bank, max_personality, rng);
    inject_riddles(&mut deck, &bank.riddles, rules.riddles_per_deck, rng);
    deck
}

/// Graded questions in a deck, the most a perfect player can score.
pub fn graded_count(deck: &[Question]) -> usize {
    deck.iter().filter(|q| !q.is_personality()).count()
}
