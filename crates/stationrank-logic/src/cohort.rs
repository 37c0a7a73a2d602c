//! Cohort comparison: "compared to players like you" without a server.
//!
//! Players are bucketed by the calendar month their account was created.
//! With no live aggregate available, the percentile is estimated locally:
//! an expected-progression table keyed by elapsed weeks gives a baseline
//! for four metrics, and each actual/expected ratio is passed through a
//! logistic curve centred on ratio 1.0 → 50th percentile.
//!
//! ```
//! use stationrank_logic::cohort::percentile_from_ratio;
//!
//! assert!((percentile_from_ratio(1.0, 4.0) - 50.0).abs() < 1e-9);
//! assert!(percentile_from_ratio(2.0, 4.0) > 95.0);
//! ```
//!
//! # Milestones
//!
//! | Weeks | Pattern lvl | Expertise lvl | Merit | Characters |
//! |-------|-------------|---------------|-------|------------|
//! | 1 | 0.5 | 0.5 | 30 | 3 |
//! | 2 | 1.0 | 1.0 | 70 | 5 |
//! | 4 | 1.5 | 2.0 | 140 | 7 |
//! | 8 | 2.5 | 3.0 | 250 | 9 |
//! | 12 | 3.0 | 3.5 | 350 | 11 |

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::tiers::clamp_finite;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CohortConfig {
    /// Logistic steepness around ratio 1.0.
    pub steepness: f64,
    /// Reported group sizes below this force the `New` standing.
    pub min_group_size: u32,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            steepness: 4.0,
            min_group_size: 10,
        }
    }
}

/// Expected values for a player `weeks` into their account.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedProgression {
    pub weeks: u32,
    pub pattern_level: f64,
    pub expertise_level: f64,
    pub merit_points: f64,
    pub characters_met: f64,
}

const fn expected(weeks: u32, pattern_level: f64, expertise_level: f64, merit_points: f64, characters_met: f64) -> ExpectedProgression {
    ExpectedProgression {
        weeks,
        pattern_level,
        expertise_level,
        merit_points,
        characters_met,
    }
}

pub static EXPECTED_PROGRESSION: [ExpectedProgression; 5] = [
    expected(1, 0.5, 0.5, 30.0, 3.0),
    expected(2, 1.0, 1.0, 70.0, 5.0),
    expected(4, 1.5, 2.0, 140.0, 7.0),
    expected(8, 2.5, 3.0, 250.0, 9.0),
    expected(12, 3.0, 3.5, 350.0, 11.0),
];

/// Early cohorts with hand-picked names.
const SPECIAL_COHORTS: &[(i32, u32, &str)] = &[
    (2024, 9, "Founders"),
    (2024, 10, "Pioneers"),
    (2024, 11, "Trailblazers"),
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Cohort id (`YYYY-MM`) and display name for an account creation time.
pub fn cohort_for(created: DateTime<Utc>) -> (String, String) {
    let (year, month) = (created.year(), created.month());
    let id = format!("{:04}-{:02}", year, month);
    let name = SPECIAL_COHORTS
        .iter()
        .find(|(y, m, _)| *y == year && *m == month)
        .map(|(_, _, name)| format!("{} Cohort", name))
        .unwrap_or_else(|| format!("{} {} Cohort", MONTH_NAMES[(month as usize - 1) % 12], year));
    (id, name)
}

/// Baseline for the largest milestone ≤ `weeks`, capped at the last one.
/// Under one week there is no baseline.
pub fn expected_for_weeks(weeks: i64) -> Option<&'static ExpectedProgression> {
    EXPECTED_PROGRESSION
        .iter()
        .rev()
        .find(|e| weeks >= e.weeks as i64)
}

/// Logistic percentile for an actual/expected ratio.
pub fn percentile_from_ratio(ratio: f64, steepness: f64) -> f64 {
    if !ratio.is_finite() {
        return if ratio > 0.0 { 100.0 } else { 0.0 };
    }
    clamp_finite(100.0 / (1.0 + (-steepness * (ratio - 1.0)).exp()), 0.0, 100.0)
}

fn metric_percentile(actual: f64, expected: f64, steepness: f64) -> f64 {
    if expected <= 0.0 {
        return 50.0;
    }
    percentile_from_ratio(actual.max(0.0) / expected, steepness)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CohortStanding {
    Leading,
    Ahead,
    WithPeers,
    Developing,
    New,
}

impl CohortStanding {
    pub fn from_percentile(percentile: f64) -> Self {
        if percentile >= 80.0 {
            CohortStanding::Leading
        } else if percentile >= 60.0 {
            CohortStanding::Ahead
        } else if percentile >= 40.0 {
            CohortStanding::WithPeers
        } else {
            CohortStanding::Developing
        }
    }

    /// Ordinal used by resonance rules: New 0 … Leading 4.
    pub fn level(self) -> u8 {
        match self {
            CohortStanding::New => 0,
            CohortStanding::Developing => 1,
            CohortStanding::WithPeers => 2,
            CohortStanding::Ahead => 3,
            CohortStanding::Leading => 4,
        }
    }
}

/// The player's actual values for the compared metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CohortMetrics {
    pub pattern_level: f64,
    pub expertise_level: f64,
    pub merit_points: f64,
    pub characters_met: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPercentiles {
    pub pattern_level: f64,
    pub expertise_level: f64,
    pub merit_points: f64,
    pub characters_met: f64,
}

impl MetricPercentiles {
    pub fn mean(&self) -> f64 {
        (self.pattern_level + self.expertise_level + self.merit_points + self.characters_met) / 4.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortComparison {
    pub cohort_id: String,
    pub cohort_name: String,
    pub weeks_elapsed: i64,
    pub baseline: Option<&'static ExpectedProgression>,
    pub percentiles: Option<MetricPercentiles>,
    pub overall_percentile: f64,
    pub standing: CohortStanding,
}

/// Compare a player against the expected progression for their cohort.
///
/// A missing creation time is treated as "created now". A reported
/// `group_size` below the configured minimum forces `New`; `None` means
/// local estimation, which always counts as large enough.
pub fn compare_cohort(
    created: Option<DateTime<Utc>>,
    observed_at: DateTime<Utc>,
    metrics: &CohortMetrics,
    group_size: Option<u32>,
    config: &CohortConfig,
) -> CohortComparison {
    let created = created.unwrap_or(observed_at);
    let (cohort_id, cohort_name) = cohort_for(created);
    let weeks_elapsed = (observed_at - created).num_weeks().max(0);
    let baseline = expected_for_weeks(weeks_elapsed);

    let percentiles = baseline.map(|b| MetricPercentiles {
        pattern_level: metric_percentile(metrics.pattern_level, b.pattern_level, config.steepness),
        expertise_level: metric_percentile(metrics.expertise_level, b.expertise_level, config.steepness),
        merit_points: metric_percentile(metrics.merit_points, b.merit_points, config.steepness),
        characters_met: metric_percentile(metrics.characters_met, b.characters_met, config.steepness),
    });
    let overall_percentile = percentiles.map(|p| p.mean()).unwrap_or(0.0);

    let group_too_small = group_size.is_some_and(|n| n < config.min_group_size);
    let standing = if percentiles.is_none() || group_too_small {
        CohortStanding::New
    } else {
        CohortStanding::from_percentile(overall_percentile)
    };

    CohortComparison {
        cohort_id,
        cohort_name,
        weeks_elapsed,
        baseline,
        percentiles,
        overall_percentile,
        standing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn cohort_ids_and_special_names() {
        assert_eq!(cohort_for(date(2024, 10, 3)), ("2024-10".to_string(), "Pioneers Cohort".to_string()));
        assert_eq!(
            cohort_for(date(2025, 3, 14)),
            ("2025-03".to_string(), "March 2025 Cohort".to_string())
        );
    }

    #[test]
    fn milestone_buckets() {
        assert!(expected_for_weeks(0).is_none());
        assert_eq!(expected_for_weeks(1).unwrap().weeks, 1);
        assert_eq!(expected_for_weeks(3).unwrap().weeks, 2);
        assert_eq!(expected_for_weeks(11).unwrap().weeks, 8);
        assert_eq!(expected_for_weeks(52).unwrap().weeks, 12);
    }

    #[test]
    fn parity_scores_fiftieth_percentile() {
        let created = date(2025, 1, 1);
        let observed = created + Duration::weeks(4);
        let metrics = CohortMetrics {
            pattern_level: 1.5,
            expertise_level: 2.0,
            merit_points: 140.0,
            characters_met: 7.0,
        };
        let c = compare_cohort(Some(created), observed, &metrics, None, &CohortConfig::default());
        let p = c.percentiles.unwrap();
        assert!((p.pattern_level - 50.0).abs() < 1e-9);
        assert!((p.merit_points - 50.0).abs() < 1e-9);
        assert!((c.overall_percentile - 50.0).abs() < 1e-9);
        assert_eq!(c.standing, CohortStanding::WithPeers);
    }

    #[test]
    fn percentile_curve_is_monotonic() {
        let mut last = -1.0;
        for i in 0..=40 {
            let p = percentile_from_ratio(i as f64 * 0.1, 4.0);
            assert!(p > last);
            last = p;
        }
        assert_eq!(percentile_from_ratio(f64::NAN, 4.0), 0.0);
    }

    #[test]
    fn brand_new_player_is_new() {
        let now = date(2025, 6, 1);
        let c = compare_cohort(None, now, &CohortMetrics::default(), None, &CohortConfig::default());
        assert_eq!(c.weeks_elapsed, 0);
        assert_eq!(c.standing, CohortStanding::New);
        assert_eq!(c.cohort_id, "2025-06");
    }

    #[test]
    fn small_reported_group_forces_new() {
        let created = date(2025, 1, 1);
        let observed = created + Duration::weeks(8);
        let metrics = CohortMetrics {
            pattern_level: 4.0,
            expertise_level: 5.0,
            merit_points: 600.0,
            characters_met: 12.0,
        };
        let cfg = CohortConfig::default();
        let big = compare_cohort(Some(created), observed, &metrics, Some(500), &cfg);
        assert_eq!(big.standing, CohortStanding::Leading);
        let small = compare_cohort(Some(created), observed, &metrics, Some(3), &cfg);
        assert_eq!(small.standing, CohortStanding::New);
    }

    #[test]
    fn zero_progress_after_a_month_is_developing() {
        let created = date(2025, 1, 1);
        let c = compare_cohort(
            Some(created),
            created + Duration::weeks(5),
            &CohortMetrics::default(),
            None,
            &CohortConfig::default(),
        );
        assert!(c.overall_percentile < 5.0);
        assert_eq!(c.standing, CohortStanding::Developing);
    }
}
