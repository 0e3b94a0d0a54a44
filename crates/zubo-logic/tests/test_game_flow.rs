//! Integration tests for a full run through the pure logic.
//!
//! Exercises: QuestionBank → build_deck → apply_answer (x100) → persona
//! → store / trade → leaderboard entry.
//!
//! All tests are pure logic: no storage, no UI.

use rand::rngs::StdRng;
use rand::SeedableRng;
use zubo_logic::config::GameRules;
use zubo_logic::deck::{build_deck, deal_deck, graded_count, QuestionBank};
use zubo_logic::leaderboard::{build_entry, FinalStatus, PlayerForm};
use zubo_logic::persona::Persona;
use zubo_logic::progression::{apply_answer, Answer, UiSignal};
use zubo_logic::question::{Difficulty, Question};
use zubo_logic::session::{GameSession, GameStatus};
use zubo_logic::stage::Stage;
use zubo_logic::store::purchases_allowed;

// ── Helpers ────────────────────────────────────────────────────────────

fn sample_bank() -> QuestionBank {
    let mut questions = Vec::new();
    for id in 1..=30 {
        let q = Question::graded(id, "Which is first?", &["first", "second", "third"], 0);
        questions.push(if id % 2 == 0 {
            q.with_difficulty(Difficulty::Tough).as_timed()
        } else {
            q
        });
    }
    for id in 31..=35 {
        questions.push(Question::personality(
            id,
            "Pick a weekend",
            &[
                ("Build a plan", Persona::Analyst, 3),
                ("Paint", Persona::Creative, 2),
                ("Host friends", Persona::Leader, 1),
            ],
        ));
    }
    let riddles = vec![Question::graded(
        1001,
        "What has keys but can't open locks?",
        &["Piano", "Map"],
        0,
    )];
    QuestionBank { questions, riddles }
}

/// The answer a perfect player would give.
fn best_answer(q: &Question) -> Answer {
    Answer::Choice(q.correct_index().unwrap_or(1))
}

fn play_to_end<F>(rules: &GameRules, seed: u64, mut choose: F) -> (GameSession, Vec<UiSignal>)
where
    F: FnMut(usize, &Question) -> Answer,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let bank = sample_bank();
    let deck = deal_deck(&bank, rules, &mut rng);

    let mut session = GameSession::new(rules);
    session.start(rules);
    let mut signals = Vec::new();
    while session.status == GameStatus::Playing {
        let i = session.question_index as usize;
        let q = &deck[i];
        let out = apply_answer(&session, q, choose(i, q), 4_000, rules, &mut rng);
        signals.extend(out.signals);
        session = out.session;
    }
    (session, signals)
}

// ── Full runs ──────────────────────────────────────────────────────────

#[test]
fn perfect_run_succeeds() {
    let rules = GameRules::default();
    let (session, signals) = play_to_end(&rules, 42, |_, q| best_answer(q));

    assert_eq!(session.status, GameStatus::Success);
    assert_eq!(session.answered_count, 100);
    assert!(session.score >= 75);
    assert!(session.lives >= 3);
    assert_eq!(session.lives - 3, session.lives_bonus_gained);
    assert_eq!(session.history.len(), 100);

    let transitions: Vec<Stage> = signals
        .iter()
        .filter_map(|s| match s {
            UiSignal::StageTransition(stage) => Some(*stage),
            UiSignal::LifeGained => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![Stage::Ascension, Stage::Mastery, Stage::Transcendence]
    );
}

#[test]
fn perfect_run_banks_stage_time() {
    let rules = GameRules::default();
    let (session, _) = play_to_end(&rules, 7, |_, q| best_answer(q));
    // 4s per answer: 25 questions at each of 56, 41, 26, 16 seconds banked
    assert_eq!(session.time_bank.total_seconds, 25 * (56 + 41 + 26 + 16));
}

#[test]
fn hopeless_run_fails_on_lives() {
    let rules = GameRules {
        life_gain_chance: 0.0,
        ..GameRules::default()
    };
    let (session, _) = play_to_end(&rules, 1, |_, _| Answer::Timeout);
    assert_eq!(session.status, GameStatus::Failure);
    assert_eq!(session.lives, 0);
    assert_eq!(session.answered_count, 3);
    assert_eq!(session.time_bank.total_seconds, 0);
}

#[test]
fn persona_follows_choices() {
    let rules = GameRules::default();
    let (session, _) = play_to_end(&rules, 3, |_, q| {
        if q.is_personality() {
            Answer::Choice(1)
        } else {
            best_answer(q)
        }
    });
    assert_eq!(session.persona(), Persona::Creative);
}

#[test]
fn same_seed_same_outcome() {
    let rules = GameRules::default();
    let choose = |i: usize, q: &Question| {
        if i % 4 == 0 {
            Answer::Choice(2)
        } else {
            best_answer(q)
        }
    };
    let (a, sa) = play_to_end(&rules, 2024, choose);
    let (b, sb) = play_to_end(&rules, 2024, choose);
    assert_eq!(a, b);
    assert_eq!(sa, sb);
}

#[test]
fn bundled_decks_are_passable() {
    let rules = GameRules::default();
    let bank: QuestionBank =
        serde_json::from_str(include_str!("../../../data/questions.json")).unwrap();
    for seed in 0..200 {
        let deck = deal_deck(&bank, &rules, &mut StdRng::seed_from_u64(seed));
        assert!(
            graded_count(&deck) >= rules.pass_threshold as usize,
            "seed {}: {} graded questions",
            seed,
            graded_count(&deck)
        );
    }
}

// ── Store, trade, leaderboard ──────────────────────────────────────────

#[test]
fn trading_banked_time_extends_a_run() {
    let rules = GameRules {
        life_gain_chance: 0.0,
        ..GameRules::default()
    };
    let bank = sample_bank();
    let mut rng = StdRng::seed_from_u64(8);
    let deck = build_deck(&bank, 100, &mut rng);

    let mut session = GameSession::new(&rules);
    session.start(&rules);
    // 20 instant graded answers in stage 1 bank 60s each
    for q in deck.iter().filter(|q| !q.is_personality()).take(20) {
        session = apply_answer(&session, q, best_answer(q), 0, &rules, &mut rng).session;
    }
    assert_eq!(session.time_bank.total_seconds, 1200);

    session.trade_time_for_lives(1, &rules).unwrap();
    assert_eq!(session.lives, 4);
    assert_eq!(session.time_bank.total_seconds, 200);
    assert!(session.trade_time_for_lives(1, &rules).is_err());
    assert_eq!(session.lives, 4);
}

#[test]
fn purchase_then_submit() {
    let rules = GameRules::default();
    let (mut session, _) = play_to_end(&rules, 11, |_, q| best_answer(q));
    assert!(!purchases_allowed(&session, &rules));

    let form = PlayerForm {
        first_name: "Grace".into(),
        last_name: "Hopper".into(),
        email: "grace@navy.mil".into(),
        age_range: "40-49".into(),
        feedback: None,
        rating: Some(4),
    };
    let entry = build_entry(&session, &form, &rules).unwrap();
    assert_eq!(entry.status, FinalStatus::Success);
    assert_eq!(entry.questions_answered, 100);
    assert_eq!(entry.answer_history.len(), 100);
    assert_eq!(entry.time_bank_bonus, session.time_bank.total_seconds / 4);

    session.restart(&rules);
    assert!(purchases_allowed(&session, &rules));
    session.apply_purchase(10);
    assert_eq!(session.lives, 13);
}
