use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stationrank_logic::config::EngineConfig;
use stationrank_logic::dashboard::compute_dashboard;
use stationrank_logic::patterns::PatternPoints;
use stationrank_logic::snapshot::ScoreSnapshot;

const CHARACTERS: [&str; 12] = [
    "samuel", "maya", "devon", "marcus", "grace", "tess", "lira", "rohan", "jordan", "elena", "alex", "station",
];

const SKILLS: [&str; 8] = [
    "debug_relay",
    "triage_basics",
    "sketch_mural",
    "pitch_idea",
    "mediate_dispute",
    "data_sorting",
    "community_garden",
    "compose_song",
];

fn snapshot(scale: u32) -> ScoreSnapshot {
    let observed_at = Utc.with_ymd_and_hms(2025, 5, 1, 18, 0, 0).unwrap();
    let mut s = ScoreSnapshot::at(observed_at);
    s.account_created_at = Some(observed_at - Duration::weeks(6));
    s.patterns = PatternPoints {
        analytical: 3 * scale as i32,
        patience: 2 * scale as i32,
        exploring: 4 * scale as i32,
        helping: 3 * scale as i32,
        building: scale as i32,
    };
    for (i, c) in CHARACTERS.iter().enumerate() {
        s.trust.insert(c.to_string(), ((i as u32 + scale) % 11) as i32);
    }
    for (i, k) in SKILLS.iter().take(scale as usize).enumerate() {
        s.skills.insert(format!("{}_{}", k, i), 1 + i as u32 % 3);
    }
    s.completed_arcs = (0..scale).map(|i| format!("{}_arc_{}", CHARACTERS[i as usize % 12], i)).collect();
    s.characters_met = 2 * scale;
    s.scenes_visited = 6 * scale;
    s.achievements = scale;
    s.discoveries = 2 * scale;
    s.skill_combos = scale / 2;
    s.challenges_overcome = scale / 3;
    s
}

fn bench_dashboard(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashboard");
    let config = EngineConfig::default();

    for scale in [1u32, 4, 8, 16] {
        let previous = snapshot(scale.saturating_sub(1));
        let current = snapshot(scale);
        group.bench_with_input(BenchmarkId::new("compute", scale), &scale, |b, _| {
            b.iter(|| compute_dashboard(black_box(&current), Some(black_box(&previous)), &config))
        });
    }

    group.finish();
}

criterion_group!(dashboard_benches, bench_dashboard);
criterion_main!(dashboard_benches);
