//! Tier registry: canonical ordered tier tables for every scoring category.
//!
//! Each category owns a fixed table of [`Tier`]s ordered by ascending
//! threshold. Scorers never hard-code tier names; they hand a point total
//! to [`tier_for_points`] and read back the highest tier whose threshold
//! has been reached.
//!
//! # Categories
//!
//! | Category | Input | Tiers |
//! |----------|-------|-------|
//! | `Pattern` | overall trait total | Unaware → Mastered (5) |
//! | `Expertise` | domain points | Curious → Champion (6) |
//! | `Challenge` | 0–100 readiness score | D → S (5) |
//! | `Standing` | merit points | Newcomer → Luminary (4) |
//! | `Elite` | unlocked designations | Aspirant → Paragon (4) |
//!
//! ```
//! use stationrank_logic::tiers::{tier_for_points, tier_progress, TierCategory};
//!
//! let tier = tier_for_points(TierCategory::Expertise, 8.0);
//! assert_eq!(tier.name, "Apprentice");
//!
//! let progress = tier_progress(TierCategory::Expertise, 8.0);
//! assert_eq!(progress.to_next, 7.0);
//! ```
//!
//! Table well-formedness is checked by [`validate_registry`], which runs
//! under test rather than on the scoring path.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scoring category that owns a tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierCategory {
    Pattern,
    Expertise,
    Challenge,
    Standing,
    Elite,
}

impl TierCategory {
    /// All categories in registry order.
    pub const ALL: [TierCategory; 5] = [
        TierCategory::Pattern,
        TierCategory::Expertise,
        TierCategory::Challenge,
        TierCategory::Standing,
        TierCategory::Elite,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TierCategory::Pattern => "pattern",
            TierCategory::Expertise => "expertise",
            TierCategory::Challenge => "challenge",
            TierCategory::Standing => "standing",
            TierCategory::Elite => "elite",
        }
    }
}

/// One named threshold band within a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tier {
    /// Globally unique id, `<category>_<name>`.
    pub id: &'static str,
    pub category: TierCategory,
    /// Zero-based, sequential within the category.
    pub level: u8,
    pub name: &'static str,
    /// Minimum points (inclusive) to hold this tier.
    pub threshold: f64,
    pub description: &'static str,
    /// Display hint: accent color token.
    pub color: &'static str,
    /// Display hint: icon token.
    pub icon: &'static str,
}

#[allow(clippy::too_many_arguments)]
const fn tier(
    id: &'static str,
    category: TierCategory,
    level: u8,
    name: &'static str,
    threshold: f64,
    description: &'static str,
    color: &'static str,
    icon: &'static str,
) -> Tier {
    Tier {
        id,
        category,
        level,
        name,
        threshold,
        description,
        color,
        icon,
    }
}

// ============================================================================
// TIER TABLES
// ============================================================================

#[rustfmt::skip]
pub static PATTERN_TIERS: [Tier; 5] = [
    tier("pattern_unaware", TierCategory::Pattern, 0, "Unaware", 0.0,
        "No pattern has taken shape yet.", "slate", "circle-dashed"),
    tier("pattern_emerging", TierCategory::Pattern, 1, "Emerging", 10.0,
        "Choices are starting to show a shape.", "sky", "sparkle"),
    tier("pattern_developing", TierCategory::Pattern, 2, "Developing", 25.0,
        "A recognizable way of thinking is forming.", "teal", "waves"),
    tier("pattern_refined", TierCategory::Pattern, 3, "Refined", 50.0,
        "Patterns are deliberate and consistent.", "violet", "prism"),
    tier("pattern_mastered", TierCategory::Pattern, 4, "Mastered", 100.0,
        "Patterns are second nature.", "gold", "crown"),
];

#[rustfmt::skip]
pub static EXPERTISE_TIERS: [Tier; 6] = [
    tier("expertise_curious", TierCategory::Expertise, 0, "Curious", 0.0,
        "Interested, not yet involved.", "slate", "question"),
    tier("expertise_exploring", TierCategory::Expertise, 1, "Exploring", 3.0,
        "Asking the people who do this work.", "sky", "compass"),
    tier("expertise_apprentice", TierCategory::Expertise, 2, "Apprentice", 8.0,
        "Learning the craft alongside a mentor.", "teal", "seedling"),
    tier("expertise_practitioner", TierCategory::Expertise, 3, "Practitioner", 15.0,
        "Doing the work with growing confidence.", "green", "hammer"),
    tier("expertise_expert", TierCategory::Expertise, 4, "Expert", 25.0,
        "Others come to you with questions.", "violet", "star"),
    tier("expertise_champion", TierCategory::Expertise, 5, "Champion", 40.0,
        "A recognized voice for this field.", "gold", "trophy"),
];

#[rustfmt::skip]
pub static CHALLENGE_TIERS: [Tier; 5] = [
    tier("challenge_d", TierCategory::Challenge, 0, "D", 0.0,
        "Finding your footing.", "slate", "grade-d"),
    tier("challenge_c", TierCategory::Challenge, 1, "C", 25.0,
        "Ready for everyday challenges.", "sky", "grade-c"),
    tier("challenge_b", TierCategory::Challenge, 2, "B", 50.0,
        "Ready for demanding challenges.", "teal", "grade-b"),
    tier("challenge_a", TierCategory::Challenge, 3, "A", 75.0,
        "Ready for the station's hardest work.", "violet", "grade-a"),
    tier("challenge_s", TierCategory::Challenge, 4, "S", 90.0,
        "Ready for anything the station can ask.", "gold", "grade-s"),
];

#[rustfmt::skip]
pub static STANDING_TIERS: [Tier; 4] = [
    tier("standing_newcomer", TierCategory::Standing, 0, "Newcomer", 0.0,
        "A new face on the platform.", "slate", "footsteps"),
    tier("standing_regular", TierCategory::Standing, 1, "Regular", 75.0,
        "People recognize you on the concourse.", "sky", "badge"),
    tier("standing_notable", TierCategory::Standing, 2, "Notable", 200.0,
        "Your name comes up on the billboard.", "violet", "megaphone"),
    tier("standing_luminary", TierCategory::Standing, 3, "Luminary", 400.0,
        "The station knows your story.", "gold", "lighthouse"),
];

#[rustfmt::skip]
pub static ELITE_TIERS: [Tier; 4] = [
    tier("elite_aspirant", TierCategory::Elite, 0, "Aspirant", 0.0,
        "No designation earned yet.", "slate", "ribbon"),
    tier("elite_distinguished", TierCategory::Elite, 1, "Distinguished", 1.0,
        "One designation earned.", "sky", "medal"),
    tier("elite_exemplar", TierCategory::Elite, 2, "Exemplar", 3.0,
        "Most designations earned.", "violet", "laurel"),
    tier("elite_paragon", TierCategory::Elite, 3, "Paragon", 5.0,
        "Every designation earned.", "gold", "diamond"),
];

/// The ordered tier table for a category.
pub fn tiers(category: TierCategory) -> &'static [Tier] {
    match category {
        TierCategory::Pattern => &PATTERN_TIERS,
        TierCategory::Expertise => &EXPERTISE_TIERS,
        TierCategory::Challenge => &CHALLENGE_TIERS,
        TierCategory::Standing => &STANDING_TIERS,
        TierCategory::Elite => &ELITE_TIERS,
    }
}

/// Lowest tier of a category (level 0).
pub fn lowest_tier(category: TierCategory) -> &'static Tier {
    &tiers(category)[0]
}

/// Highest level reachable in a category.
pub fn max_level(category: TierCategory) -> u8 {
    tiers(category).last().map(|t| t.level).unwrap_or(0)
}

/// Highest tier whose threshold is ≤ `points`.
///
/// Never fails: negative values, `-∞` and NaN resolve to the lowest tier
/// of the category; `+∞` clamps to the highest.
pub fn tier_for_points(category: TierCategory, points: f64) -> &'static Tier {
    let table = tiers(category);
    if points.is_nan() {
        return &table[0];
    }
    table
        .iter()
        .rev()
        .find(|t| points >= t.threshold)
        .unwrap_or(&table[0])
}

fn tier_index() -> &'static HashMap<&'static str, &'static Tier> {
    static INDEX: OnceLock<HashMap<&'static str, &'static Tier>> = OnceLock::new();
    INDEX.get_or_init(|| {
        TierCategory::ALL
            .iter()
            .flat_map(|c| tiers(*c).iter())
            .map(|t| (t.id, t))
            .collect()
    })
}

/// Look up a tier by id in any category.
pub fn find_tier(id: &str) -> Option<&'static Tier> {
    tier_index().get(id).copied()
}

/// Look up a tier by id, falling back to the category's lowest tier when
/// the id is unknown or belongs to another category.
pub fn tier_by_id(category: TierCategory, id: &str) -> &'static Tier {
    match find_tier(id) {
        Some(t) if t.category == category => t,
        _ => lowest_tier(category),
    }
}

/// Progress from the current tier toward the next one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierProgress {
    pub level: u8,
    /// `None` at the top tier.
    pub next_level: Option<u8>,
    /// Points still needed for the next tier (0 at the top).
    pub to_next: f64,
    /// Linear position between current and next threshold, 0–100.
    pub percent: f64,
}

/// Linearly interpolate `points` between the current and next thresholds.
pub fn tier_progress(category: TierCategory, points: f64) -> TierProgress {
    let table = tiers(category);
    let current = tier_for_points(category, points);
    let points = if points.is_finite() {
        points.max(current.threshold)
    } else {
        current.threshold
    };

    match table.get(current.level as usize + 1) {
        Some(next) => {
            let span = next.threshold - current.threshold;
            let percent = if span > 0.0 {
                clamp_finite((points - current.threshold) / span * 100.0, 0.0, 100.0)
            } else {
                0.0
            };
            TierProgress {
                level: current.level,
                next_level: Some(next.level),
                to_next: (next.threshold - points).max(0.0),
                percent,
            }
        }
        None => TierProgress {
            level: current.level,
            next_level: None,
            to_next: 0.0,
            percent: 100.0,
        },
    }
}

/// Clamp into `[lo, hi]`, mapping NaN/±inf to `lo`.
pub(crate) fn clamp_finite(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        lo
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Registry well-formedness violation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("{category:?} has {count} tiers, at least 2 are required")]
    TooFewTiers { category: TierCategory, count: usize },
    #[error("{category:?} tier `{id}` threshold {threshold} does not exceed previous {previous}")]
    NonIncreasingThreshold {
        category: TierCategory,
        id: String,
        threshold: f64,
        previous: f64,
    },
    #[error("{category:?} tier `{id}` has level {found}, expected {expected}")]
    LevelOutOfSequence {
        category: TierCategory,
        id: String,
        expected: u8,
        found: u8,
    },
    #[error("tier `{id}` is tagged {found:?} but listed under {listed:?}")]
    CategoryMismatch {
        id: String,
        listed: TierCategory,
        found: TierCategory,
    },
    #[error("duplicate tier id `{0}`")]
    DuplicateId(String),
}

/// Validate the built-in registry, returning every violation found.
pub fn validate_registry() -> Vec<RegistryError> {
    validate_tables(TierCategory::ALL.iter().map(|c| (*c, tiers(*c))))
}

/// Validate arbitrary tier tables with the registry rules: at least two
/// tiers, strictly increasing thresholds, levels sequential from 0, and
/// ids unique across all tables.
pub fn validate_tables<'a>(
    tables: impl IntoIterator<Item = (TierCategory, &'a [Tier])>,
) -> Vec<RegistryError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (category, table) in tables {
        if table.len() < 2 {
            errors.push(RegistryError::TooFewTiers {
                category,
                count: table.len(),
            });
        }

        let mut previous: Option<f64> = None;
        for (index, t) in table.iter().enumerate() {
            if t.category != category {
                errors.push(RegistryError::CategoryMismatch {
                    id: t.id.to_string(),
                    listed: category,
                    found: t.category,
                });
            }
            if t.level as usize != index {
                errors.push(RegistryError::LevelOutOfSequence {
                    category,
                    id: t.id.to_string(),
                    expected: index as u8,
                    found: t.level,
                });
            }
            if let Some(prev) = previous {
                if t.threshold <= prev {
                    errors.push(RegistryError::NonIncreasingThreshold {
                        category,
                        id: t.id.to_string(),
                        threshold: t.threshold,
                        previous: prev,
                    });
                }
            }
            previous = Some(t.threshold);

            if !seen.insert(t.id) {
                errors.push(RegistryError::DuplicateId(t.id.to_string()));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_is_well_formed() {
        let errors = validate_registry();
        assert!(errors.is_empty(), "registry errors: {:?}", errors);
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        assert_eq!(tier_for_points(TierCategory::Expertise, 8.0).name, "Apprentice");
        assert_eq!(tier_for_points(TierCategory::Expertise, 7.0).name, "Exploring");
        assert_eq!(tier_for_points(TierCategory::Expertise, 7.999).name, "Exploring");
    }

    #[test]
    fn out_of_range_points_clamp_to_the_ends() {
        for category in TierCategory::ALL {
            assert_eq!(tier_for_points(category, -5.0).level, 0);
            assert_eq!(tier_for_points(category, f64::NAN).level, 0);
            assert_eq!(tier_for_points(category, f64::NEG_INFINITY).level, 0);
            assert_eq!(tier_for_points(category, f64::INFINITY).level, max_level(category));
            let top = tier_progress(category, f64::INFINITY);
            assert_eq!(top.next_level, None);
            assert_eq!(top.percent, 100.0);
        }
    }

    #[test]
    fn tier_lookup_is_monotonic() {
        for category in TierCategory::ALL {
            let mut last = 0;
            for p in 0..=600 {
                let level = tier_for_points(category, p as f64 * 0.5).level;
                assert!(level >= last, "{:?} regressed at {}", category, p);
                last = level;
            }
            assert_eq!(last, max_level(category));
        }
    }

    #[test]
    fn progress_interpolates_within_band() {
        // Apprentice (8) → Practitioner (15)
        let p = tier_progress(TierCategory::Expertise, 11.5);
        assert_eq!(p.level, 2);
        assert_eq!(p.next_level, Some(3));
        assert!((p.percent - 50.0).abs() < 1e-9);
        assert!((p.to_next - 3.5).abs() < 1e-9);
    }

    #[test]
    fn progress_at_max_tier_is_complete() {
        let p = tier_progress(TierCategory::Standing, 10_000.0);
        assert_eq!(p.level, 3);
        assert_eq!(p.next_level, None);
        assert_eq!(p.to_next, 0.0);
        assert_eq!(p.percent, 100.0);
    }

    #[test]
    fn progress_for_negative_points_starts_at_zero() {
        let p = tier_progress(TierCategory::Pattern, -20.0);
        assert_eq!(p.level, 0);
        assert_eq!(p.percent, 0.0);
        assert_eq!(p.to_next, 10.0);
    }

    #[test]
    fn lookup_by_id_with_fallback() {
        assert_eq!(tier_by_id(TierCategory::Elite, "elite_paragon").level, 3);
        assert_eq!(tier_by_id(TierCategory::Elite, "no_such_tier").level, 0);
        // Known id, wrong category.
        assert_eq!(tier_by_id(TierCategory::Elite, "pattern_mastered").id, "elite_aspirant");
        assert!(find_tier("challenge_s").is_some());
    }

    #[test]
    fn validation_catches_malformed_tables() {
        let bad = [
            tier("x_low", TierCategory::Pattern, 0, "Low", 5.0, "", "", ""),
            tier("x_same", TierCategory::Pattern, 2, "Same", 5.0, "", "", ""),
            tier("x_low", TierCategory::Elite, 2, "Dup", 9.0, "", "", ""),
        ];
        let errors = validate_tables([(TierCategory::Pattern, &bad[..])]);
        assert!(errors
            .iter()
            .any(|e| matches!(e, RegistryError::NonIncreasingThreshold { .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, RegistryError::LevelOutOfSequence { found: 2, .. })));
        assert!(errors.contains(&RegistryError::DuplicateId("x_low".into())));
        assert!(errors
            .iter()
            .any(|e| matches!(e, RegistryError::CategoryMismatch { .. })));
    }

    #[test]
    fn validation_requires_two_tiers() {
        let lonely = [tier("solo", TierCategory::Elite, 0, "Solo", 0.0, "", "", "")];
        let errors = validate_tables([(TierCategory::Elite, &lonely[..])]);
        assert_eq!(
            errors,
            vec![RegistryError::TooFewTiers {
                category: TierCategory::Elite,
                count: 1
            }]
        );
    }
}
