//! StationRank Headless Ranking Harness
//!
//! Validates the ranking engine's tables and behavior without a host game.
//! Runs entirely in-process: no clock, no storage, no rendering.
//!
//! Usage:
//!   cargo run -p stationrank-simtest
//!   cargo run -p stationrank-simtest -- --verbose
//!   RUST_LOG=stationrank_logic=debug cargo run -p stationrank-simtest

use chrono::Duration;
use serde::Deserialize;
use stationrank_logic::ceremony::{self, CEREMONIES};
use stationrank_logic::challenge::Grade;
use stationrank_logic::cohort::{self, CohortStanding};
use stationrank_logic::config::{self, EngineConfig};
use stationrank_logic::dashboard::compute_dashboard;
use stationrank_logic::flavor::SeededFlavor;
use stationrank_logic::resonance::{self, ResonanceInput, Subsystem};
use stationrank_logic::snapshot::ScoreSnapshot;
use stationrank_logic::stars::{self, StarDimension};
use stationrank_logic::tiers::{self, TierCategory};

// ── Personas (sample snapshots with expected outcomes) ──────────────────
const PERSONAS_JSON: &str = include_str!("../../../data/personas.json");

#[derive(Debug, Deserialize)]
struct Persona {
    name: String,
    snapshot: ScoreSnapshot,
    expect: Expectation,
}

#[derive(Debug, Deserialize)]
struct Expectation {
    pattern_tier: String,
    standing_tier: String,
    grade: Grade,
    cohort: CohortStanding,
    pending_ceremony: Option<String>,
    min_overall: f64,
    max_overall: f64,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== StationRank Ranking Harness ===\n");

    let mut results = Vec::new();

    // 1. Registry and table well-formedness
    results.extend(validate_registry(verbose));

    // 2. Engine config defaults and JSON loading
    results.extend(validate_config());

    // 3. Monotonicity sweeps
    results.extend(validate_monotonicity(verbose));

    // 4. Resonance stacking
    results.extend(validate_resonance());

    // 5. Persona scenarios
    let personas = match serde_json::from_str::<Vec<Persona>>(PERSONAS_JSON) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult {
                name: "personas_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            Vec::new()
        }
    };
    results.extend(validate_personas(&personas, verbose));

    // 6. Ceremony lifecycle over a simulated fortnight
    results.extend(validate_ceremony_lifecycle(&personas, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!("\n=== RESULT: {}/{} passed, {} failed ===", passed, total, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Registry ─────────────────────────────────────────────────────────

fn validate_registry(verbose: bool) -> Vec<TestResult> {
    println!("--- Tier Registry ---");
    let mut results = Vec::new();

    let errors = tiers::validate_registry();
    results.push(TestResult {
        name: "registry_well_formed".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            "all categories strictly increasing, unique ids".into()
        } else {
            errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
        },
    });

    for category in TierCategory::ALL {
        let table = tiers::tiers(category);
        if verbose {
            let names: Vec<&str> = table.iter().map(|t| t.name).collect();
            println!("  {:<10} {}", category.as_str(), names.join(" → "));
        }
        results.push(TestResult {
            name: format!("registry_{}_starts_at_zero", category.as_str()),
            passed: tiers::lowest_tier(category).threshold == 0.0,
            detail: format!("{} tiers, max level {}", table.len(), tiers::max_level(category)),
        });
    }

    let mut ceremony_ids: Vec<&str> = CEREMONIES.iter().map(|c| c.id).collect();
    ceremony_ids.sort();
    ceremony_ids.dedup();
    results.push(TestResult {
        name: "ceremony_ids_unique".into(),
        passed: ceremony_ids.len() == CEREMONIES.len(),
        detail: format!("{} ceremonies", CEREMONIES.len()),
    });

    results.push(TestResult {
        name: "constellations_cover_all_totals".into(),
        passed: stars::CONSTELLATIONS.len() == stars::MAX_TOTAL_STARS as usize + 1,
        detail: format!("{} names", stars::CONSTELLATIONS.len()),
    });

    results
}

// ── 2. Config ───────────────────────────────────────────────────────────

fn validate_config() -> Vec<TestResult> {
    println!("--- Engine Config ---");
    let mut results = Vec::new();

    let issues = config::validate_engine_config(&EngineConfig::default());
    results.push(TestResult {
        name: "config_defaults_valid".into(),
        passed: issues.is_empty(),
        detail: format!("{} issues {:?}", issues.len(), issues),
    });

    match EngineConfig::from_json(r#"{ "progression": { "merit_ceiling": 800.0 } }"#) {
        Ok(cfg) => results.push(TestResult {
            name: "config_partial_json".into(),
            passed: cfg.progression.merit_ceiling == 800.0 && cfg.progression.patterns == 0.2,
            detail: format!("merit_ceiling={}", cfg.progression.merit_ceiling),
        }),
        Err(e) => results.push(TestResult {
            name: "config_partial_json".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}

// ── 3. Monotonicity ─────────────────────────────────────────────────────

fn validate_monotonicity(verbose: bool) -> Vec<TestResult> {
    println!("--- Monotonicity Sweeps ---");
    let mut results = Vec::new();

    for category in TierCategory::ALL {
        let mut last = 0u8;
        let mut ok = true;
        for step in 0..=1000 {
            let level = tiers::tier_for_points(category, step as f64 * 0.5).level;
            ok &= level >= last;
            last = level;
        }
        results.push(TestResult {
            name: format!("sweep_{}_non_decreasing", category.as_str()),
            passed: ok && last == tiers::max_level(category),
            detail: format!("0..500 reaches level {}", last),
        });
    }

    for dimension in StarDimension::ALL {
        let thresholds = dimension.thresholds();
        let mut last = 0u8;
        let mut ok = true;
        for v in 0..=200 {
            let s = stars::star_level(v as f64, &thresholds);
            ok &= s >= last;
            last = s;
        }
        results.push(TestResult {
            name: format!("sweep_stars_{:?}", dimension),
            passed: ok && last == stars::MAX_STARS_PER_DIMENSION,
            detail: format!("{} reaches {} stars", dimension.label(), last),
        });
    }

    let cfg = EngineConfig::default();
    let mut last = -1.0;
    let mut ok = true;
    for i in 0..=300 {
        let p = cohort::percentile_from_ratio(i as f64 / 100.0, cfg.cohort.steepness);
        ok &= p > last && (0.0..=100.0).contains(&p);
        last = p;
    }
    let parity = cohort::percentile_from_ratio(1.0, cfg.cohort.steepness);
    results.push(TestResult {
        name: "sweep_cohort_percentile".into(),
        passed: ok && (parity - 50.0).abs() < 1e-9,
        detail: format!("ratio 1.0 → {:.1}, ratio 3.0 → {:.1}", parity, last),
    });

    // Overall progression never decreases as a snapshot grows
    let mut snapshot = ScoreSnapshot::default();
    let mut last_overall = 0.0;
    let mut ok = true;
    for step in 0..40 {
        snapshot.patterns.exploring += 3;
        snapshot.patterns.helping += 2;
        snapshot.characters_met += 1;
        snapshot.scenes_visited += 2;
        snapshot.discoveries += 1;
        let overall = compute_dashboard(&snapshot, None, &cfg).overall_progression;
        if verbose && step % 10 == 0 {
            println!("  step {:>2}: overall {:.1}", step, overall);
        }
        ok &= overall >= last_overall;
        last_overall = overall;
    }
    results.push(TestResult {
        name: "sweep_overall_non_decreasing".into(),
        passed: ok,
        detail: format!("final overall {:.1}", last_overall),
    });

    results
}

// ── 4. Resonance ────────────────────────────────────────────────────────

fn validate_resonance() -> Vec<TestResult> {
    println!("--- Resonance ---");
    let mut results = Vec::new();

    let input = ResonanceInput {
        pattern_level: 2,
        assessment_complete: true,
        ..Default::default()
    };
    let m = resonance::multiplier_for(Subsystem::Expertise, &input);
    results.push(TestResult {
        name: "resonance_multiplicative_stacking".into(),
        passed: (m - 1.38).abs() < 1e-9,
        detail: format!("1.15 × 1.20 = {:.4}", m),
    });

    let idle = resonance::evaluate_resonance(&ResonanceInput::default(), &Default::default());
    results.push(TestResult {
        name: "resonance_idle_on_zero".into(),
        passed: idle.active.is_empty() && idle.pending_events.is_empty(),
        detail: format!("{} active", idle.active.len()),
    });

    results
}

// ── 5. Personas ─────────────────────────────────────────────────────────

fn validate_personas(personas: &[Persona], verbose: bool) -> Vec<TestResult> {
    println!("--- Personas ---");
    let mut results = Vec::new();
    let cfg = EngineConfig::default();

    for persona in personas {
        let d = compute_dashboard(&persona.snapshot, None, &cfg);
        let again = compute_dashboard(&persona.snapshot, None, &cfg);
        let e = &persona.expect;

        if verbose {
            let flavor = d.flavor(&mut SeededFlavor::new(7));
            println!(
                "  {:<10} pattern={} standing={} grade={} stars={} ({}) cohort={:?} overall={:.1}",
                persona.name,
                d.patterns.tier.name,
                d.standing.tier.name,
                d.challenge.grade.label(),
                d.stars.total,
                d.stars.constellation,
                d.cohort.standing,
                d.overall_progression,
            );
            println!("             \"{}\" {}", flavor.tagline, flavor.narration);
        }

        results.push(TestResult {
            name: format!("persona_{}_deterministic", persona.name),
            passed: d == again,
            detail: "two computations are identical".into(),
        });

        let checks = [
            ("pattern_tier", d.patterns.tier.name == e.pattern_tier, d.patterns.tier.name.to_string()),
            ("standing_tier", d.standing.tier.name == e.standing_tier, d.standing.tier.name.to_string()),
            ("grade", d.challenge.grade == e.grade, d.challenge.grade.label().to_string()),
            ("cohort", d.cohort.standing == e.cohort, format!("{:?}", d.cohort.standing)),
            (
                "pending_ceremony",
                d.pending_ceremony.map(|c| c.id) == e.pending_ceremony.as_deref(),
                format!("{:?}", d.pending_ceremony.map(|c| c.id)),
            ),
            (
                "overall",
                (e.min_overall..=e.max_overall).contains(&d.overall_progression),
                format!("{:.2}", d.overall_progression),
            ),
        ];
        for (what, passed, actual) in checks {
            results.push(TestResult {
                name: format!("persona_{}_{}", persona.name, what),
                passed,
                detail: format!("got {}", actual),
            });
        }
    }

    results
}

// ── 6. Ceremony lifecycle ───────────────────────────────────────────────

fn validate_ceremony_lifecycle(personas: &[Persona], verbose: bool) -> Vec<TestResult> {
    println!("--- Ceremony Lifecycle ---");
    let mut results = Vec::new();
    let cfg = EngineConfig::default();

    let Some(veteran) = personas.iter().find(|p| p.name == "veteran") else {
        results.push(TestResult {
            name: "ceremony_lifecycle_persona".into(),
            passed: false,
            detail: "veteran persona missing".into(),
        });
        return results;
    };

    // Recompute every six hours for two weeks, completing whatever is pending.
    let mut snapshot = veteran.snapshot.clone();
    let start = snapshot.observed_at;
    let mut shown = Vec::new();
    for tick in 0..56 {
        snapshot.observed_at = start + Duration::hours(6 * tick);
        let d = compute_dashboard(&snapshot, None, &cfg);
        snapshot.ceremonies = match d.pending_ceremony {
            Some(c) => {
                shown.push(c.id);
                let response = c.responses.first().copied();
                ceremony::complete_ceremony(&d.ceremonies, c.id, snapshot.observed_at, response)
            }
            None => d.ceremonies,
        };
    }
    if verbose {
        println!("  shown: {}", shown.join(", "));
    }

    let history = &snapshot.ceremonies.history;
    let one_time_repeats: Vec<&str> = CEREMONIES
        .iter()
        .filter(|c| c.one_time && history.iter().filter(|r| r.ceremony_id == c.id).count() > 1)
        .map(|c| c.id)
        .collect();
    results.push(TestResult {
        name: "ceremony_one_time_not_repeated".into(),
        passed: one_time_repeats.is_empty(),
        detail: format!("{} completions, repeats: {:?}", history.len(), one_time_repeats),
    });

    let gaps_ok = history
        .windows(2)
        .all(|w| w[1].completed_at - w[0].completed_at >= Duration::hours(cfg.ceremony.cooldown_hours as i64));
    results.push(TestResult {
        name: "ceremony_cooldown_respected".into(),
        passed: gaps_ok,
        detail: format!("cooldown {}h", cfg.ceremony.cooldown_hours),
    });

    results.push(TestResult {
        name: "ceremony_priority_order".into(),
        passed: shown.first() == Some(&"elite_paragon") && shown.get(1) == Some(&"perfect_constellation"),
        detail: format!("first two: {:?}", shown.iter().take(2).collect::<Vec<_>>()),
    });

    results
}
