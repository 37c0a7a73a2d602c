//! Unified dashboard: one call, every subsystem, one immutable result.
//!
//! Order of evaluation:
//!
//! 1. patterns (and promotions against the previous snapshot)
//! 2. expertise
//! 3. challenge (reads pattern and expertise levels)
//! 4. standing
//! 5. stars
//! 6. elite (reads expertise, patterns, standing)
//! 7. cohort (reads pattern, expertise, merit)
//! 8. resonance (reads everything above)
//! 9. ceremonies (trigger ids derived from the levels above)
//!
//! The snapshot is borrowed immutably throughout. The returned
//! [`UnifiedDashboard::ceremonies`] ledger is what the host persists and
//! feeds back on the next call.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ceremony::{derive_triggers, evaluate_ceremonies, Ceremony, CeremonyLedger, TriggerState};
use crate::challenge::{rate_challenge, ChallengeDimensions, ChallengeRating, Grade};
use crate::cohort::{compare_cohort, CohortComparison, CohortMetrics, CohortStanding};
use crate::config::EngineConfig;
use crate::elite::{evaluate_elite, Designation, EliteInputs, EliteStatus, SPECIALIST_LEVEL};
use crate::expertise::{score_expertise, CareerExpertise};
use crate::flavor::{constellation_narration, tagline, FlavorSource, FlavorText};
use crate::patterns::{detect_promotions, score_patterns, PatternMastery, PatternPromotion};
use crate::resonance::{evaluate_resonance, ResonanceInput, ResonanceState};
use crate::snapshot::ScoreSnapshot;
use crate::standing::{score_standing, StandingCounters, StationStanding};
use crate::stars::{score_stars, SkillStars, StarInputs, MAX_TOTAL_STARS};
use crate::tiers::{clamp_finite, max_level, TierCategory};

/// Weights of the five sub-scores in the overall progression scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionWeights {
    pub patterns: f64,
    pub expertise: f64,
    pub merit: f64,
    pub stars: f64,
    pub elite: f64,
    /// Merit at which the merit sub-score saturates.
    pub merit_ceiling: f64,
}

impl Default for ProgressionWeights {
    fn default() -> Self {
        Self {
            patterns: 0.2,
            expertise: 0.2,
            merit: 0.2,
            stars: 0.2,
            elite: 0.2,
            merit_ceiling: 500.0,
        }
    }
}

impl ProgressionWeights {
    pub fn sum(&self) -> f64 {
        self.patterns + self.expertise + self.merit + self.stars + self.elite
    }
}

fn ratio(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    clamp_finite(value / max, 0.0, 1.0)
}

/// Weighted 0–100 blend of pattern level, best expertise level, merit,
/// star total and unlocked designations, each normalized to 0–1.
pub fn overall_progression(
    pattern_level: u8,
    expertise_level: u8,
    merit: f64,
    total_stars: u8,
    unlocked_designations: u8,
    weights: &ProgressionWeights,
) -> f64 {
    let blended = ratio(pattern_level as f64, max_level(TierCategory::Pattern) as f64) * weights.patterns
        + ratio(expertise_level as f64, max_level(TierCategory::Expertise) as f64) * weights.expertise
        + ratio(merit, weights.merit_ceiling) * weights.merit
        + ratio(total_stars as f64, MAX_TOTAL_STARS as f64) * weights.stars
        + ratio(unlocked_designations as f64, Designation::ALL.len() as f64) * weights.elite;
    clamp_finite(blended * 100.0, 0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedDashboard {
    pub observed_at: DateTime<Utc>,
    pub patterns: PatternMastery,
    /// Empty without a previous snapshot.
    pub pattern_promotions: Vec<PatternPromotion>,
    pub expertise: CareerExpertise,
    pub challenge: ChallengeRating,
    pub standing: StationStanding,
    pub stars: SkillStars,
    pub elite: EliteStatus,
    pub cohort: CohortComparison,
    pub resonance: ResonanceState,
    pub triggers: BTreeSet<String>,
    pub pending_ceremony: Option<&'static Ceremony>,
    /// Ledger to persist and thread into the next snapshot.
    pub ceremonies: CeremonyLedger,
    pub overall_progression: f64,
}

impl UnifiedDashboard {
    /// Cosmetic text for this dashboard. Never affects the numbers.
    pub fn flavor(&self, source: &mut impl FlavorSource) -> FlavorText {
        FlavorText {
            tagline: tagline(source, self.overall_progression),
            narration: constellation_narration(source, self.stars.constellation),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Compute every subsystem for `current`. `previous` only feeds promotion
/// detection and highlight trends.
pub fn compute_dashboard(
    current: &ScoreSnapshot,
    previous: Option<&ScoreSnapshot>,
    config: &EngineConfig,
) -> UnifiedDashboard {
    let at = current.observed_at;

    let patterns = score_patterns(&current.patterns, current.pattern_total, at);
    let pattern_promotions = previous
        .map(|p| detect_promotions(&score_patterns(&p.patterns, p.pattern_total, p.observed_at), &patterns))
        .unwrap_or_default();

    let expertise = score_expertise(current, &config.expertise);

    let dimensions = ChallengeDimensions::from_levels(
        patterns.level(),
        expertise.max_level,
        current.average_trust(),
        current.skill_count(),
        &config.challenge,
    );
    let challenge = rate_challenge(&dimensions, &config.challenge, at);

    let counters = StandingCounters::from_snapshot(current);
    let previous_counters = previous.map(StandingCounters::from_snapshot);
    let standing = score_standing(&counters, previous_counters.as_ref(), &config.merit);

    let stars = score_stars(&StarInputs::from_snapshot(current));

    let elite = evaluate_elite(&EliteInputs {
        discoveries: current.discoveries,
        specialist_domains: expertise.domains_at_level(SPECIALIST_LEVEL),
        max_trust_characters: current.max_trust_characters(),
        flourishing_traits: patterns.flourishing_count(),
        standing_level: standing.level(),
    });

    let cohort = compare_cohort(
        current.account_created_at,
        at,
        &CohortMetrics {
            pattern_level: patterns.level() as f64,
            expertise_level: expertise.max_level as f64,
            merit_points: standing.merit.total,
            characters_met: current.characters_met as f64,
        },
        current.cohort_group_size,
        &config.cohort,
    );

    let resonance_input = ResonanceInput {
        pattern_level: patterns.level(),
        expertise_level: expertise.max_level,
        standing_level: standing.level(),
        grade_index: challenge.grade.index(),
        challenge_overcome: current.challenges_overcome > 0,
        total_stars: stars.total,
        unlocked_designations: elite.unlocked_count(),
        assessment_complete: current.assessment_complete(),
        cohort_level: cohort.standing.level(),
    };
    let resonance = evaluate_resonance(&resonance_input, &current.completed_resonance_events);

    let triggers = derive_triggers(&TriggerState {
        pattern_level: patterns.level(),
        expertise_champion: !expertise.champion_domains.is_empty(),
        standing_level: standing.level(),
        grade_s: challenge.grade == Grade::S,
        total_stars: stars.total,
        unlocked_designations: elite.unlocked_count(),
        all_designations: elite.unlocked.len() == Designation::ALL.len(),
        balanced_patterns: patterns.balanced && patterns.total > 0,
        cohort_leading: cohort.standing == CohortStanding::Leading,
    });
    let ceremonies = evaluate_ceremonies(&current.ceremonies, &triggers, at, &config.ceremony);
    let pending_ceremony = ceremonies.pending_ceremony();

    let overall_progression = overall_progression(
        patterns.level(),
        expertise.max_level,
        standing.merit.total,
        stars.total,
        elite.unlocked_count(),
        &config.progression,
    );

    log::debug!(
        "dashboard at {}: pattern {} expertise {} grade {:?} standing {} stars {} elite {} cohort {:?} overall {:.1}",
        at,
        patterns.tier.name,
        expertise.max_level,
        challenge.grade,
        standing.tier.name,
        stars.total,
        elite.unlocked_count(),
        cohort.standing,
        overall_progression,
    );

    UnifiedDashboard {
        observed_at: at,
        patterns,
        pattern_promotions,
        expertise,
        challenge,
        standing,
        stars,
        elite,
        cohort,
        resonance,
        triggers,
        pending_ceremony,
        ceremonies,
        overall_progression,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flavor::FixedFlavor;

    #[test]
    fn progression_formula() {
        let w = ProgressionWeights::default();
        assert_eq!(overall_progression(0, 0, 0.0, 0, 0, &w), 0.0);
        assert!((overall_progression(4, 5, 500.0, 18, 5, &w) - 100.0).abs() < 1e-9);
        // 0.2 * (2/4 + 0 + 250/500 + 0 + 0) = 0.2
        assert!((overall_progression(2, 0, 250.0, 0, 0, &w) - 20.0).abs() < 1e-9);
        assert!((overall_progression(4, 5, 9000.0, 18, 5, &w) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_snapshot_is_all_zero() {
        let d = compute_dashboard(&ScoreSnapshot::default(), None, &EngineConfig::default());
        assert_eq!(d.overall_progression, 0.0);
        assert_eq!(d.patterns.level(), 0);
        assert_eq!(d.expertise.max_level, 0);
        assert_eq!(d.challenge.grade, Grade::D);
        assert_eq!(d.standing.level(), 0);
        assert_eq!(d.stars.total, 0);
        assert_eq!(d.elite.unlocked_count(), 0);
        assert!(d.resonance.active.is_empty());
        assert!(d.triggers.is_empty());
        assert!(d.pending_ceremony.is_none());
        assert_eq!(d.cohort.standing, CohortStanding::New);
    }

    #[test]
    fn flavor_does_not_touch_numbers() {
        let d = compute_dashboard(&ScoreSnapshot::default(), None, &EngineConfig::default());
        let before = d.clone();
        let text = d.flavor(&mut FixedFlavor(1));
        assert!(text.narration.contains("Empty Sky"));
        assert_eq!(d, before);
    }

    #[test]
    fn dashboard_serializes() {
        let d = compute_dashboard(&ScoreSnapshot::default(), None, &EngineConfig::default());
        let json = d.to_json().unwrap();
        assert!(json.contains("\"overall_progression\""));
        assert!(json.contains("\"pending_ceremony\": null"));
    }
}
