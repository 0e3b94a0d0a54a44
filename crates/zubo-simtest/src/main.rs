//! Zubo Headless Playthrough Harness
//!
//! Validates the bundled data, the rules tables and full seeded playthroughs.
//! Runs entirely in-process: no UI, no payment provider, no database.
//!
//! Usage:
//!   cargo run -p zubo-simtest
//!   cargo run -p zubo-simtest -- --verbose --seed 7 --runs 50

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use zubo_core::bank::builtin_bank;
use zubo_core::config::default_rules;
use zubo_core::engine::GameEngine;
use zubo_core::persistence::MemoryStore;
use zubo_logic::config::{validate_rules, GameRules};
use zubo_logic::deck::{graded_count, QuestionBank};
use zubo_logic::leaderboard::{FinalStatus, PlayerForm};
use zubo_logic::persona::{add_weight, resolve_persona, Persona, PersonaTally};
use zubo_logic::progression::Answer;
use zubo_logic::question::{Difficulty, Question};
use zubo_logic::session::{GameSession, GameStatus};
use zubo_logic::stage::Stage;
use zubo_logic::time_bank::{self, TimeBank};

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    seed: u64,
    runs: u32,
}

fn parse_args() -> Result<Options, String> {
    let mut opts = Options {
        verbose: false,
        seed: 42,
        runs: 20,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => opts.verbose = true,
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                opts.seed = value
                    .parse()
                    .map_err(|_| format!("invalid seed: {}", value))?;
            }
            "--runs" => {
                let value = args.next().ok_or("--runs needs a value")?;
                opts.runs = value
                    .parse()
                    .map_err(|_| format!("invalid run count: {}", value))?;
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(opts)
}

fn main() {
    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: zubo-simtest [--verbose] [--seed N] [--runs N]");
            std::process::exit(2);
        }
    };
    println!("=== Zubo Playthrough Harness ===\n");

    let mut results = Vec::new();

    // 1. Bundled data
    let bank = match builtin_bank() {
        Ok(bank) => Some(bank),
        Err(e) => {
            results.push(TestResult {
                name: "bank_load".into(),
                passed: false,
                detail: e.to_string(),
            });
            None
        }
    };
    let rules = match default_rules() {
        Ok(rules) => rules,
        Err(e) => {
            results.push(TestResult {
                name: "rules_load".into(),
                passed: false,
                detail: e.to_string(),
            });
            GameRules::default()
        }
    };
    if let Some(bank) = &bank {
        results.extend(validate_bank(bank, opts.verbose));
    }
    results.extend(validate_rules_file(&rules));

    // 2. Stage table
    results.extend(validate_stages(opts.verbose));

    // 3. Time bank
    results.extend(validate_time_bank());

    // 4. Persona resolution
    results.extend(validate_persona());

    if let Some(bank) = &bank {
        // 5. Seeded playthroughs
        results.extend(validate_playthroughs(bank, &rules, &opts));

        // 6. Snapshot resume
        results.extend(validate_resume(bank, &rules, opts.seed));

        // 7. Store and leaderboard
        results.extend(validate_store_and_leaderboard(bank, &rules, opts.seed));
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

/// The answer a perfect player gives. Personality questions take the first option.
fn best_answer(q: &Question) -> Answer {
    Answer::Choice(q.correct_index().unwrap_or(0))
}

// ── 1. Bundled Data ─────────────────────────────────────────────────────

fn validate_bank(bank: &QuestionBank, verbose: bool) -> Vec<TestResult> {
    println!("--- Question Bank ---");
    let mut results = Vec::new();

    let graded = bank.questions.iter().filter(|q| !q.is_personality()).count();
    let personality = bank.questions.len() - graded;
    results.push(TestResult {
        name: "bank_not_empty".into(),
        passed: graded > 0 && personality > 0,
        detail: format!("{} graded, {} personality", graded, personality),
    });

    let tough = bank
        .questions
        .iter()
        .filter(|q| q.difficulty == Difficulty::Tough)
        .count();
    results.push(TestResult {
        name: "bank_has_tough_questions".into(),
        passed: tough > 0 && tough < bank.questions.len(),
        detail: format!("{} tough of {}", tough, bank.questions.len()),
    });

    results.push(TestResult {
        name: "bank_has_riddles".into(),
        passed: !bank.riddles.is_empty(),
        detail: format!("{} riddles", bank.riddles.len()),
    });

    // Every persona should be reachable from some option
    let reachable: Vec<Persona> = Persona::ALL
        .iter()
        .copied()
        .filter(|p| {
            bank.questions.iter().any(|q| {
                (0..q.option_count()).any(|i| q.persona_option(i).map(|o| o.persona) == Some(*p))
            })
        })
        .collect();
    results.push(TestResult {
        name: "bank_personas_reachable".into(),
        passed: reachable.len() == Persona::ALL.len(),
        detail: format!("{}/{} personas reachable", reachable.len(), Persona::ALL.len()),
    });

    if verbose {
        println!("  Personality options per persona:");
        for p in Persona::ALL {
            let count: usize = bank
                .questions
                .iter()
                .map(|q| {
                    (0..q.option_count())
                        .filter(|&i| q.persona_option(i).map(|o| o.persona) == Some(p))
                        .count()
                })
                .sum();
            println!("    {:10}: {}", p.label(), count);
        }
    }

    results
}

fn validate_rules_file(rules: &GameRules) -> Vec<TestResult> {
    println!("--- Rules ---");
    let errors = validate_rules(rules);
    vec![
        TestResult {
            name: "rules_valid".into(),
            passed: errors.is_empty(),
            detail: if errors.is_empty() {
                "bundled rules pass validation".into()
            } else {
                format!("{:?}", errors)
            },
        },
        TestResult {
            name: "rules_match_defaults".into(),
            passed: *rules == GameRules::default(),
            detail: format!(
                "{} questions, pass at {}, {} lives",
                rules.total_questions, rules.pass_threshold, rules.starting_lives
            ),
        },
    ]
}

// ── 2. Stage Table ──────────────────────────────────────────────────────

fn validate_stages(verbose: bool) -> Vec<TestResult> {
    println!("--- Stages ---");
    let mut results = Vec::new();

    let uncovered: Vec<u32> = (1..=100)
        .filter(|&n| Stage::ALL.iter().filter(|s| s.contains(n)).count() != 1)
        .collect();
    results.push(TestResult {
        name: "stages_partition_run".into(),
        passed: uncovered.is_empty(),
        detail: if uncovered.is_empty() {
            "questions 1-100 each in exactly one stage".into()
        } else {
            format!("questions not covered exactly once: {:?}", uncovered)
        },
    });

    let limits: Vec<u32> = Stage::ALL.iter().map(|s| s.time_limit_seconds()).collect();
    results.push(TestResult {
        name: "stages_time_limits_shrink".into(),
        passed: limits.windows(2).all(|w| w[0] > w[1]),
        detail: format!("{:?}", limits),
    });

    if verbose {
        for s in Stage::ALL {
            let (first, last) = s.question_range();
            println!(
                "  {} questions {}-{}, {}s",
                s,
                first,
                last,
                s.time_limit_seconds()
            );
        }
    }

    results
}

// ── 3. Time Bank ────────────────────────────────────────────────────────

fn validate_time_bank() -> Vec<TestResult> {
    println!("--- Time Bank ---");
    let mut results = Vec::new();

    let short = TimeBank::new().deposit(999);
    results.push(TestResult {
        name: "trade_999_rejected".into(),
        passed: time_bank::trade_time_for_lives(&short, 1).is_err(),
        detail: "999s cannot buy a life".into(),
    });

    let exact = TimeBank::new().deposit(1000);
    let traded = time_bank::trade_time_for_lives(&exact, 1);
    results.push(TestResult {
        name: "trade_1000_accepted".into(),
        passed: matches!(traded, Ok(b) if b.total_seconds == 0 && b.lives_traded == 1),
        detail: format!("{:?}", traded),
    });

    results.push(TestResult {
        name: "time_earned_floor".into(),
        passed: time_bank::time_earned(20, 25) == 0 && time_bank::time_earned(60, 12) == 48,
        detail: "overtime banks nothing".into(),
    });

    results.push(TestResult {
        name: "leaderboard_bonus".into(),
        passed: time_bank::leaderboard_bonus(&TimeBank::new().deposit(1001)) == 250,
        detail: format!("1001s -> {}", time_bank::format_time(1001)),
    });

    results
}

// ── 4. Persona ──────────────────────────────────────────────────────────

fn validate_persona() -> Vec<TestResult> {
    println!("--- Persona ---");
    let mut tally = PersonaTally::new();
    let empty = resolve_persona(&tally);

    add_weight(&mut tally, Persona::Leader, 3);
    add_weight(&mut tally, Persona::Creative, 3);
    let tie = resolve_persona(&tally);

    vec![
        TestResult {
            name: "persona_default".into(),
            passed: empty == Persona::Analyst,
            detail: format!("empty tally -> {}", empty),
        },
        TestResult {
            name: "persona_tie_break".into(),
            passed: tie == Persona::Creative,
            detail: format!("Creative/Leader tie -> {}", tie),
        },
    ]
}

// ── 5. Seeded Playthroughs ──────────────────────────────────────────────

/// Play one run to the end with `choose` picking the answer and time taken.
fn play<F>(engine: &mut GameEngine, mut choose: F) -> Result<(), String>
where
    F: FnMut(&Question) -> (Answer, u64),
{
    engine.start().map_err(|e| e.to_string())?;
    while engine.status() == GameStatus::Playing {
        let (answer, elapsed_ms) = match engine.current_question() {
            Some(q) => choose(q),
            None => return Err("playing without a current question".into()),
        };
        engine
            .answer(answer, elapsed_ms)
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Lives at the end must equal lives at the start plus bonuses minus misses.
fn lives_balance(session: &GameSession, rules: &GameRules) -> bool {
    let misses = session.history.iter().filter(|r| !r.correct).count() as u32;
    session.lives + misses == rules.starting_lives + session.lives_bonus_gained
}

fn validate_playthroughs(
    bank: &QuestionBank,
    rules: &GameRules,
    opts: &Options,
) -> Vec<TestResult> {
    println!("--- Playthroughs ({} runs from seed {}) ---", opts.runs, opts.seed);
    let mut results = Vec::new();

    let mut perfect_failures = Vec::new();
    let mut random_failures = Vec::new();
    let mut successes = 0;

    for run in 0..opts.runs {
        let seed = opts.seed.wrapping_add(run as u64);

        // Perfect player
        let mut engine = GameEngine::new(rules.clone(), bank.clone(), seed);
        match play(&mut engine, |q| (best_answer(q), 5_000)) {
            Ok(()) => {
                let s = engine.session();
                if s.answered_count != rules.total_questions
                    || s.status != GameStatus::Success
                    || (graded_count(engine.deck()) as u32) != s.score
                    || s.lives < rules.starting_lives
                    || !lives_balance(s, rules)
                {
                    perfect_failures.push(format!(
                        "seed {}: {:?} score {} lives {}",
                        seed, s.status, s.score, s.lives
                    ));
                }
                if s.status == GameStatus::Success {
                    successes += 1;
                }
                if opts.verbose {
                    println!(
                        "  seed {:>4}: perfect {:?}, score {}, lives {}, bank {}",
                        seed,
                        s.status,
                        s.score,
                        s.lives,
                        time_bank::format_time(s.time_bank.total_seconds)
                    );
                }
            }
            Err(e) => perfect_failures.push(format!("seed {}: {}", seed, e)),
        }

        // Random player: random options, random thinking time, some timeouts
        let mut player = StdRng::seed_from_u64(seed ^ 0x5eed);
        let mut engine = GameEngine::new(rules.clone(), bank.clone(), seed);
        let outcome = play(&mut engine, |q| {
            if player.gen_bool(0.1) {
                (Answer::Timeout, 60_000)
            } else {
                let choice = player.gen_range(0..q.option_count());
                (Answer::Choice(choice), player.gen_range(0..40_000))
            }
        });
        match outcome {
            Ok(()) => {
                let s = engine.session();
                let banked: u32 = s.history.iter().map(|r| r.seconds_earned).sum();
                if !s.status.is_finished()
                    || !lives_balance(s, rules)
                    || banked != s.time_bank.total_seconds
                    || s.history.len() as u32 != s.answered_count
                {
                    random_failures.push(format!(
                        "seed {}: {:?} after {} answers",
                        seed, s.status, s.answered_count
                    ));
                }
            }
            Err(e) => random_failures.push(format!("seed {}: {}", seed, e)),
        }
    }

    results.push(TestResult {
        name: "perfect_play_always_passes".into(),
        passed: perfect_failures.is_empty(),
        detail: if perfect_failures.is_empty() {
            format!("{}/{} perfect runs succeeded", successes, opts.runs)
        } else {
            perfect_failures.join("; ")
        },
    });
    results.push(TestResult {
        name: "random_play_consistent".into(),
        passed: random_failures.is_empty(),
        detail: if random_failures.is_empty() {
            "lives and time bank balance on every run".into()
        } else {
            random_failures.join("; ")
        },
    });

    // Same seed, same run
    let replay = |seed: u64| {
        let mut engine = GameEngine::new(rules.clone(), bank.clone(), seed);
        let mut n = 0u64;
        let played = play(&mut engine, |q| {
            n += 1;
            if n % 3 == 0 {
                (Answer::Choice(q.option_count() - 1), n * 700)
            } else {
                (best_answer(q), n * 300)
            }
        });
        played.map(|()| engine.session().clone())
    };
    let a = replay(opts.seed);
    let b = replay(opts.seed);
    results.push(TestResult {
        name: "seeded_replay_identical".into(),
        passed: a.is_ok() && a == b,
        detail: "two runs from one seed produce identical sessions".into(),
    });

    results
}

// ── 6. Snapshot Resume ──────────────────────────────────────────────────

fn validate_resume(bank: &QuestionBank, rules: &GameRules, seed: u64) -> Vec<TestResult> {
    println!("--- Snapshot Resume ---");
    let store = MemoryStore::new();
    let mut engine = GameEngine::new(rules.clone(), bank.clone(), seed).with_store(store.clone());

    let played = engine.start().map_err(|e| e.to_string()).and_then(|()| {
        for _ in 0..30 {
            let answer = match engine.current_question() {
                Some(q) => best_answer(q),
                None => break,
            };
            engine.answer(answer, 8_000).map_err(|e| e.to_string())?;
        }
        Ok(())
    });

    let mut resumed =
        GameEngine::new(rules.clone(), bank.clone(), seed + 1).with_store(store.clone());
    let restored = resumed.resume();
    let same = matches!(restored, Ok(true))
        && resumed.session() == engine.session()
        && resumed.current_question().map(|q| q.id) == engine.current_question().map(|q| q.id);

    vec![TestResult {
        name: "snapshot_resume".into(),
        passed: played.is_ok() && same,
        detail: format!(
            "{} byte snapshot at question {}",
            store.saved_len().unwrap_or(0),
            engine.session().question_number()
        ),
    }]
}

// ── 7. Store & Leaderboard ──────────────────────────────────────────────

fn validate_store_and_leaderboard(
    bank: &QuestionBank,
    rules: &GameRules,
    seed: u64,
) -> Vec<TestResult> {
    println!("--- Store & Leaderboard ---");
    let mut results = Vec::new();

    // Run out of lives, buy back in, finish the run
    let mut engine = GameEngine::new(rules.clone(), bank.clone(), seed);
    let mut resumed = false;
    if engine.start().is_ok() {
        while engine.status() == GameStatus::Playing {
            if engine.answer(Answer::Timeout, 60_000).is_err() {
                break;
            }
        }
        let out_of_lives = engine.session().ran_out_of_lives();
        engine.open_store();
        let bought = engine.purchase_package(2).is_ok();
        engine.close_store();
        resumed = out_of_lives && bought && engine.status() == GameStatus::Playing;
    }
    results.push(TestResult {
        name: "store_resumes_run".into(),
        passed: resumed,
        detail: format!(
            "{} lives at question {}",
            engine.session().lives,
            engine.session().question_number()
        ),
    });

    // Short run cannot submit
    let form = PlayerForm {
        first_name: "Sim".into(),
        last_name: "Player".into(),
        email: "sim@zubo.test".into(),
        age_range: "20-29".into(),
        feedback: None,
        rating: Some(3),
    };
    while engine.status() == GameStatus::Playing {
        if engine.answer(Answer::Timeout, 60_000).is_err() {
            break;
        }
    }
    results.push(TestResult {
        name: "leaderboard_threshold".into(),
        passed: engine.leaderboard_entry(&form).is_err(),
        detail: format!("{} answered", engine.session().answered_count),
    });

    // A full perfect run can submit
    let mut engine = GameEngine::new(rules.clone(), bank.clone(), seed);
    let entry = play(&mut engine, |q| (best_answer(q), 10_000))
        .and_then(|()| engine.leaderboard_entry(&form).map_err(|e| e.to_string()));
    results.push(TestResult {
        name: "leaderboard_entry".into(),
        passed: matches!(&entry, Ok(e) if e.questions_answered == rules.total_questions
            && e.status == FinalStatus::Success),
        detail: match &entry {
            Ok(e) => format!(
                "score {}, persona {}, bonus {}",
                e.score, e.persona, e.time_bank_bonus
            ),
            Err(e) => e.clone(),
        },
    });

    results
}
