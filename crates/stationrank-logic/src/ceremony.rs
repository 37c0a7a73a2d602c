//! Ceremonies: narrative recognition moments gated by triggers and a cooldown.
//!
//! Trigger ids are re-derived from current levels on every call (never from
//! promotion events), so a missed computation cannot lose a ceremony:
//!
//! | Trigger | Active when |
//! |---------|-------------|
//! | `pattern_tier_<n>` | pattern tier level ≥ n |
//! | `expertise_champion` | any domain at Champion |
//! | `standing_tier_<n>` | standing tier level ≥ n |
//! | `grade_s` | challenge grade S |
//! | `stars_<n>` | star total ≥ n, for n in [`STAR_MILESTONES`] |
//! | `elite_first` / `elite_paragon` | ≥ 1 / all 5 designations |
//! | `balanced_patterns` | balanced patterns with at least one point |
//! | `cohort_leading` | cohort standing Leading |
//!
//! The ledger is the only cross-call state. It is threaded in and a new
//! ledger is returned; nothing is mutated in place.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Star totals that raise a `stars_<n>` trigger.
pub const STAR_MILESTONES: [u8; 2] = [9, 18];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ceremony {
    pub id: &'static str,
    pub trigger_id: &'static str,
    pub title: &'static str,
    /// Narrative scene the host should play.
    pub scene_id: &'static str,
    /// Higher wins when several are eligible.
    pub priority: u32,
    pub one_time: bool,
    /// Response ids the scene offers the player.
    pub responses: &'static [&'static str],
}

const fn ceremony(
    id: &'static str,
    trigger_id: &'static str,
    title: &'static str,
    scene_id: &'static str,
    priority: u32,
    one_time: bool,
    responses: &'static [&'static str],
) -> Ceremony {
    Ceremony {
        id,
        trigger_id,
        title,
        scene_id,
        priority,
        one_time,
        responses,
    }
}

#[rustfmt::skip]
pub static CEREMONIES: [Ceremony; 13] = [
    ceremony("first_steps", "pattern_tier_1", "First Steps", "ceremony_first_steps", 10, true, &["humble", "eager"]),
    ceremony("pattern_awakening", "pattern_tier_3", "Pattern Awakening", "ceremony_pattern_awakening", 40, true, &["reflect", "share"]),
    ceremony("pattern_mastery", "pattern_tier_4", "Pattern Mastery", "ceremony_pattern_mastery", 80, true, &["reflect", "teach"]),
    ceremony("expertise_champion", "expertise_champion", "Champion of the Craft", "ceremony_champion", 70, true, &["accept", "deflect"]),
    ceremony("station_regular", "standing_tier_1", "Station Regular", "ceremony_station_regular", 20, true, &[]),
    ceremony("station_luminary", "standing_tier_3", "Station Luminary", "ceremony_station_luminary", 85, true, &["speech", "wave"]),
    ceremony("grade_s_recognition", "grade_s", "S-Grade Recognition", "ceremony_grade_s", 75, true, &["accept", "deflect"]),
    ceremony("constellation_halfway", "stars_9", "Halfway Across the Sky", "ceremony_constellation_halfway", 50, true, &[]),
    ceremony("perfect_constellation", "stars_18", "Perfect Constellation", "ceremony_perfect_constellation", 90, true, &["reflect"]),
    ceremony("elite_first_designation", "elite_first", "First Designation", "ceremony_elite_first", 60, true, &["accept"]),
    ceremony("elite_paragon", "elite_paragon", "Paragon", "ceremony_elite_paragon", 100, true, &["speech", "reflect"]),
    ceremony("balanced_reflection", "balanced_patterns", "A Balanced Mind", "ceremony_balanced", 30, false, &[]),
    ceremony("cohort_leader", "cohort_leading", "Leading the Cohort", "ceremony_cohort_leader", 35, false, &["celebrate", "encourage"]),
];

pub fn find_ceremony(id: &str) -> Option<&'static Ceremony> {
    CEREMONIES.iter().find(|c| c.id == id)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CeremonyConfig {
    /// Shared cooldown after any completed ceremony.
    pub cooldown_hours: u32,
}

impl Default for CeremonyConfig {
    fn default() -> Self {
        Self { cooldown_hours: 12 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeremonyRecord {
    pub ceremony_id: String,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub response_id: Option<String>,
}

/// Persisted ceremony state, supplied in the snapshot and returned anew.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CeremonyLedger {
    pub pending: Option<String>,
    pub history: Vec<CeremonyRecord>,
    pub last_completed_at: Option<DateTime<Utc>>,
}

impl CeremonyLedger {
    pub fn has_completed(&self, ceremony_id: &str) -> bool {
        self.history.iter().any(|r| r.ceremony_id == ceremony_id)
    }

    pub fn pending_ceremony(&self) -> Option<&'static Ceremony> {
        self.pending.as_deref().and_then(find_ceremony)
    }

    /// End of the cooldown window, if one has started. A window reaching
    /// past the last representable instant never ends.
    pub fn cooldown_until(&self, config: &CeremonyConfig) -> Option<DateTime<Utc>> {
        self.last_completed_at.map(|t| {
            t.checked_add_signed(Duration::hours(i64::from(config.cooldown_hours)))
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        })
    }

    pub fn in_cooldown(&self, now: DateTime<Utc>, config: &CeremonyConfig) -> bool {
        self.cooldown_until(config).is_some_and(|until| now < until)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CeremonyStatus {
    Idle,
    Pending { ceremony_id: String },
    Cooldown { until: DateTime<Utc> },
}

pub fn ceremony_status(ledger: &CeremonyLedger, now: DateTime<Utc>, config: &CeremonyConfig) -> CeremonyStatus {
    if let Some(id) = &ledger.pending {
        return CeremonyStatus::Pending {
            ceremony_id: id.clone(),
        };
    }
    match ledger.cooldown_until(config) {
        Some(until) if now < until => CeremonyStatus::Cooldown { until },
        _ => CeremonyStatus::Idle,
    }
}

/// Levels and milestones the trigger ids are derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TriggerState {
    pub pattern_level: u8,
    pub expertise_champion: bool,
    pub standing_level: u8,
    pub grade_s: bool,
    pub total_stars: u8,
    pub unlocked_designations: u8,
    pub all_designations: bool,
    /// Balanced and non-empty.
    pub balanced_patterns: bool,
    pub cohort_leading: bool,
}

pub fn derive_triggers(state: &TriggerState) -> BTreeSet<String> {
    let mut triggers = BTreeSet::new();
    for n in 1..=state.pattern_level {
        triggers.insert(format!("pattern_tier_{}", n));
    }
    for n in 1..=state.standing_level {
        triggers.insert(format!("standing_tier_{}", n));
    }
    for n in STAR_MILESTONES {
        if state.total_stars >= n {
            triggers.insert(format!("stars_{}", n));
        }
    }
    let flags = [
        (state.expertise_champion, "expertise_champion"),
        (state.grade_s, "grade_s"),
        (state.unlocked_designations >= 1, "elite_first"),
        (state.all_designations, "elite_paragon"),
        (state.balanced_patterns, "balanced_patterns"),
        (state.cohort_leading, "cohort_leading"),
    ];
    for (on, id) in flags {
        if on {
            triggers.insert(id.to_string());
        }
    }
    triggers
}

/// Ceremonies eligible right now, highest priority first. Ties keep table
/// order.
pub fn eligible_ceremonies(ledger: &CeremonyLedger, triggers: &BTreeSet<String>) -> Vec<&'static Ceremony> {
    let mut eligible: Vec<&'static Ceremony> = CEREMONIES
        .iter()
        .filter(|c| triggers.contains(c.trigger_id))
        .filter(|c| !(c.one_time && ledger.has_completed(c.id)))
        .collect();
    eligible.sort_by(|a, b| b.priority.cmp(&a.priority));
    eligible
}

/// Advance the ledger: keep an existing pending ceremony, hold off during
/// the cooldown, otherwise promote the top eligible ceremony to pending.
pub fn evaluate_ceremonies(
    ledger: &CeremonyLedger,
    triggers: &BTreeSet<String>,
    now: DateTime<Utc>,
    config: &CeremonyConfig,
) -> CeremonyLedger {
    let mut next = ledger.clone();
    if let Some(id) = &ledger.pending {
        if find_ceremony(id).is_some() {
            return next;
        }
        log::warn!("dropping unknown pending ceremony {}", id);
        next.pending = None;
    }
    if next.in_cooldown(now, config) {
        log::debug!("ceremony cooldown active until {:?}", next.cooldown_until(config));
        return next;
    }
    if let Some(top) = eligible_ceremonies(&next, triggers).first() {
        log::debug!("ceremony {} now pending (priority {})", top.id, top.priority);
        next.pending = Some(top.id.to_string());
    }
    next
}

/// Record completion of `ceremony_id`. Unknown ids and repeat completions
/// of one-time ceremonies return the ledger unchanged.
pub fn complete_ceremony(
    ledger: &CeremonyLedger,
    ceremony_id: &str,
    now: DateTime<Utc>,
    response_id: Option<&str>,
) -> CeremonyLedger {
    let Some(ceremony) = find_ceremony(ceremony_id) else {
        log::warn!("ignoring completion of unknown ceremony {}", ceremony_id);
        return ledger.clone();
    };
    if ceremony.one_time && ledger.has_completed(ceremony.id) {
        log::debug!("ceremony {} already completed", ceremony.id);
        return ledger.clone();
    }
    if let Some(r) = response_id {
        if !ceremony.responses.contains(&r) {
            log::warn!("ceremony {} has no response {}", ceremony.id, r);
        }
    }

    let mut next = ledger.clone();
    next.history.push(CeremonyRecord {
        ceremony_id: ceremony.id.to_string(),
        completed_at: now,
        response_id: response_id.map(str::to_string),
    });
    next.last_completed_at = Some(now);
    if next.pending.as_deref() == Some(ceremony.id) {
        next.pending = None;
    }
    log::debug!("ceremony {} completed", ceremony.id);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn triggers(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_triggers_on_zero_state() {
        assert!(derive_triggers(&TriggerState::default()).is_empty());
    }

    #[test]
    fn triggers_cover_every_level_reached() {
        let t = derive_triggers(&TriggerState {
            pattern_level: 3,
            standing_level: 1,
            total_stars: 10,
            unlocked_designations: 1,
            ..Default::default()
        });
        for id in ["pattern_tier_1", "pattern_tier_2", "pattern_tier_3", "standing_tier_1", "stars_9", "elite_first"] {
            assert!(t.contains(id), "missing {}", id);
        }
        assert!(!t.contains("pattern_tier_4"));
        assert!(!t.contains("stars_18"));
    }

    #[test]
    fn highest_priority_becomes_pending() {
        let ledger = evaluate_ceremonies(
            &CeremonyLedger::default(),
            &triggers(&["pattern_tier_1", "pattern_tier_3", "standing_tier_1"]),
            t0(),
            &CeremonyConfig::default(),
        );
        assert_eq!(ledger.pending.as_deref(), Some("pattern_awakening"));
    }

    #[test]
    fn pending_is_kept_unchanged() {
        let ledger = CeremonyLedger {
            pending: Some("first_steps".into()),
            ..Default::default()
        };
        let next = evaluate_ceremonies(&ledger, &triggers(&["elite_paragon"]), t0(), &CeremonyConfig::default());
        assert_eq!(next, ledger);
    }

    #[test]
    fn cooldown_blocks_new_pending() {
        let cfg = CeremonyConfig::default();
        let done = complete_ceremony(&CeremonyLedger::default(), "first_steps", t0(), None);
        let active = triggers(&["pattern_tier_1", "standing_tier_1"]);

        let soon = evaluate_ceremonies(&done, &active, t0() + Duration::hours(11), &cfg);
        assert!(soon.pending.is_none());
        assert!(matches!(
            ceremony_status(&soon, t0() + Duration::hours(11), &cfg),
            CeremonyStatus::Cooldown { .. }
        ));

        let later = evaluate_ceremonies(&done, &active, t0() + Duration::hours(12), &cfg);
        assert_eq!(later.pending.as_deref(), Some("station_regular"));
    }

    #[test]
    fn oversized_cooldown_never_ends() {
        let cfg = CeremonyConfig {
            cooldown_hours: u32::MAX,
        };
        let done = complete_ceremony(&CeremonyLedger::default(), "first_steps", t0(), None);
        assert_eq!(done.cooldown_until(&cfg), Some(DateTime::<Utc>::MAX_UTC));

        let now = t0() + Duration::days(365 * 50);
        let next = evaluate_ceremonies(&done, &triggers(&["standing_tier_1"]), now, &cfg);
        assert!(next.pending.is_none());
        assert!(matches!(ceremony_status(&next, now, &cfg), CeremonyStatus::Cooldown { .. }));
    }

    #[test]
    fn one_time_completion_is_idempotent() {
        let once = complete_ceremony(&CeremonyLedger::default(), "first_steps", t0(), Some("eager"));
        let twice = complete_ceremony(&once, "first_steps", t0() + Duration::days(3), None);
        assert_eq!(once, twice);
        assert_eq!(twice.history.len(), 1);
        assert_eq!(twice.history[0].response_id.as_deref(), Some("eager"));

        let next = evaluate_ceremonies(&twice, &triggers(&["pattern_tier_1"]), t0() + Duration::days(3), &CeremonyConfig::default());
        assert!(next.pending.is_none());
    }

    #[test]
    fn repeatable_ceremonies_return() {
        let cfg = CeremonyConfig::default();
        let active = triggers(&["balanced_patterns"]);
        let first = evaluate_ceremonies(&CeremonyLedger::default(), &active, t0(), &cfg);
        assert_eq!(first.pending.as_deref(), Some("balanced_reflection"));
        let done = complete_ceremony(&first, "balanced_reflection", t0(), None);
        assert!(done.pending.is_none());
        let again = evaluate_ceremonies(&done, &active, t0() + Duration::days(1), &cfg);
        assert_eq!(again.pending.as_deref(), Some("balanced_reflection"));
        let done_again = complete_ceremony(&again, "balanced_reflection", t0() + Duration::days(1), None);
        assert_eq!(done_again.history.len(), 2);
    }

    #[test]
    fn unknown_ids_leave_ledger_alone() {
        let ledger = CeremonyLedger::default();
        assert_eq!(complete_ceremony(&ledger, "no_such", t0(), None), ledger);

        let stale = CeremonyLedger {
            pending: Some("retired_ceremony".into()),
            ..Default::default()
        };
        let next = evaluate_ceremonies(&stale, &triggers(&["grade_s"]), t0(), &CeremonyConfig::default());
        assert_eq!(next.pending.as_deref(), Some("grade_s_recognition"));
    }

    #[test]
    fn table_ids_unique() {
        let mut ids: Vec<_> = CEREMONIES.iter().map(|c| c.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), CEREMONIES.len());
    }
}
