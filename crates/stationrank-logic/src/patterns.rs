//! Pattern mastery: turns accumulated trait points into tiers.
//!
//! Every choice the player makes feeds one of five pattern traits
//! (analytical, patience, exploring, helping, building). This module maps
//! those totals to:
//!
//! - an overall [`TierCategory::Pattern`] tier from the combined total,
//! - a per-trait [`ThresholdBand`] from trait-specific cutoffs,
//! - an "unlocks earned" count (0–3) from 10% / 50% / 85% of a nominal
//!   maximum of 100 points,
//! - the dominant trait (only with a clear lead) and a balanced flag.
//!
//! ```
//! use stationrank_logic::patterns::{score_patterns, PatternPoints, PatternTrait};
//!
//! let points = PatternPoints { analytical: 10, patience: 10, exploring: 20, helping: 10, building: 10 };
//! let mastery = score_patterns(&points, None, Default::default());
//! assert_eq!(mastery.dominant, Some(PatternTrait::Exploring));
//! assert!(!mastery.balanced);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::evidence::{Evidence, EvidenceKind};
use crate::tiers::{tier_for_points, tier_progress, Tier, TierCategory, TierProgress};

/// Nominal ceiling for a single trait, used for unlock fractions.
pub const NOMINAL_TRAIT_MAX: f64 = 100.0;

/// Fractions of [`NOMINAL_TRAIT_MAX`] that each grant one unlock.
pub const UNLOCK_FRACTIONS: [f64; 3] = [0.10, 0.50, 0.85];

/// Lead over the runner-up a trait needs to count as dominant.
pub const MIN_DOMINANT_LEAD: i32 = 3;

/// Widest max−min spread that still counts as balanced.
pub const BALANCE_SPREAD: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternTrait {
    Analytical,
    Patience,
    Exploring,
    Helping,
    Building,
}

impl PatternTrait {
    pub const ALL: [PatternTrait; 5] = [
        PatternTrait::Analytical,
        PatternTrait::Patience,
        PatternTrait::Exploring,
        PatternTrait::Helping,
        PatternTrait::Building,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PatternTrait::Analytical => "analytical",
            PatternTrait::Patience => "patience",
            PatternTrait::Exploring => "exploring",
            PatternTrait::Helping => "helping",
            PatternTrait::Building => "building",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PatternTrait::Analytical => "Analytical",
            PatternTrait::Patience => "Patience",
            PatternTrait::Exploring => "Exploring",
            PatternTrait::Helping => "Helping",
            PatternTrait::Building => "Building",
        }
    }

    /// Band cutoffs for this trait. Patience and helping accrue more
    /// slowly in the story, so their bands sit higher.
    pub fn cutoffs(self) -> BandCutoffs {
        match self {
            PatternTrait::Analytical => BandCutoffs::new(3, 8, 15),
            PatternTrait::Patience => BandCutoffs::new(4, 10, 18),
            PatternTrait::Exploring => BandCutoffs::new(3, 8, 15),
            PatternTrait::Helping => BandCutoffs::new(3, 9, 16),
            PatternTrait::Building => BandCutoffs::new(3, 8, 15),
        }
    }
}

/// Accumulated points per trait, as supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternPoints {
    pub analytical: i32,
    pub patience: i32,
    pub exploring: i32,
    pub helping: i32,
    pub building: i32,
}

impl PatternPoints {
    pub fn get(&self, pattern: PatternTrait) -> i32 {
        match pattern {
            PatternTrait::Analytical => self.analytical,
            PatternTrait::Patience => self.patience,
            PatternTrait::Exploring => self.exploring,
            PatternTrait::Helping => self.helping,
            PatternTrait::Building => self.building,
        }
    }

    /// Per-trait points clamped at zero, in [`PatternTrait::ALL`] order.
    fn clamped(&self) -> [(PatternTrait, i32); 5] {
        PatternTrait::ALL.map(|t| (t, self.get(t).max(0)))
    }

    pub fn sum(&self) -> i64 {
        self.clamped().iter().map(|(_, p)| *p as i64).sum()
    }

    /// Highest single-trait total.
    pub fn max_value(&self) -> i32 {
        self.clamped().iter().map(|(_, p)| *p).max().unwrap_or(0)
    }
}

/// Coarse per-trait band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdBand {
    Nascent,
    Emerging,
    Developing,
    Flourishing,
}

impl ThresholdBand {
    pub fn level(self) -> u8 {
        match self {
            ThresholdBand::Nascent => 0,
            ThresholdBand::Emerging => 1,
            ThresholdBand::Developing => 2,
            ThresholdBand::Flourishing => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThresholdBand::Nascent => "Nascent",
            ThresholdBand::Emerging => "Emerging",
            ThresholdBand::Developing => "Developing",
            ThresholdBand::Flourishing => "Flourishing",
        }
    }
}

/// Minimum points for each band above `Nascent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCutoffs {
    pub emerging: i32,
    pub developing: i32,
    pub flourishing: i32,
}

impl BandCutoffs {
    const fn new(emerging: i32, developing: i32, flourishing: i32) -> Self {
        Self {
            emerging,
            developing,
            flourishing,
        }
    }

    pub fn band(&self, points: i32) -> ThresholdBand {
        if points >= self.flourishing {
            ThresholdBand::Flourishing
        } else if points >= self.developing {
            ThresholdBand::Developing
        } else if points >= self.emerging {
            ThresholdBand::Emerging
        } else {
            ThresholdBand::Nascent
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitMastery {
    pub pattern: PatternTrait,
    pub points: i32,
    pub band: ThresholdBand,
    /// 0–3, one per crossed fraction of the nominal maximum.
    pub unlocks_earned: u8,
    pub percent_of_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternMastery {
    pub total: i64,
    pub tier: &'static Tier,
    pub progress: TierProgress,
    pub traits: Vec<TraitMastery>,
    pub dominant: Option<PatternTrait>,
    pub balanced: bool,
    pub evidence: Vec<Evidence>,
}

impl PatternMastery {
    pub fn level(&self) -> u8 {
        self.tier.level
    }

    pub fn trait_mastery(&self, pattern: PatternTrait) -> Option<&TraitMastery> {
        self.traits.iter().find(|t| t.pattern == pattern)
    }

    /// Traits currently in the `Flourishing` band.
    pub fn flourishing_count(&self) -> u32 {
        self.traits
            .iter()
            .filter(|t| t.band == ThresholdBand::Flourishing)
            .count() as u32
    }
}

/// Number of unlock fractions `points` has crossed.
pub fn unlocks_earned(points: i32) -> u8 {
    UNLOCK_FRACTIONS
        .iter()
        .filter(|f| points as f64 >= *f * NOMINAL_TRAIT_MAX)
        .count() as u8
}

/// The single highest trait, if it leads the runner-up by at least
/// [`MIN_DOMINANT_LEAD`]. Ties and near-ties yield `None`.
pub fn dominant_trait(points: &PatternPoints) -> Option<PatternTrait> {
    let mut ranked = points.clamped();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    match ranked {
        [(top, first), (_, second), ..] if first - second >= MIN_DOMINANT_LEAD => Some(top),
        _ => None,
    }
}

/// True when every trait is within [`BALANCE_SPREAD`] of every other.
pub fn is_balanced(points: &PatternPoints) -> bool {
    let values = points.clamped().map(|(_, p)| p);
    let max = values.iter().copied().max().unwrap_or(0);
    let min = values.iter().copied().min().unwrap_or(0);
    max - min <= BALANCE_SPREAD
}

/// Score pattern mastery.
///
/// `total_override` replaces the trait sum when the host tracks its own
/// aggregate (negative overrides read as zero).
pub fn score_patterns(
    points: &PatternPoints,
    total_override: Option<i64>,
    observed_at: DateTime<Utc>,
) -> PatternMastery {
    let total = total_override.map(|t| t.max(0)).unwrap_or_else(|| points.sum());
    let tier = tier_for_points(TierCategory::Pattern, total as f64);
    let progress = tier_progress(TierCategory::Pattern, total as f64);

    let mut evidence = Vec::new();
    let traits: Vec<TraitMastery> = points
        .clamped()
        .iter()
        .map(|&(pattern, p)| {
            let band = pattern.cutoffs().band(p);
            if p > 0 {
                evidence.push(Evidence::new(
                    EvidenceKind::TraitPoints,
                    format!("{}: {} points ({})", pattern.label(), p, band.label()),
                    observed_at,
                ));
            }
            TraitMastery {
                pattern,
                points: p,
                band,
                unlocks_earned: unlocks_earned(p),
                percent_of_max: (p as f64 / NOMINAL_TRAIT_MAX * 100.0).min(100.0),
            }
        })
        .collect();

    PatternMastery {
        total,
        tier,
        progress,
        traits,
        dominant: dominant_trait(points),
        balanced: is_balanced(points),
        evidence,
    }
}

/// A tier or band increase between two mastery results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternPromotion {
    Overall {
        from: &'static Tier,
        to: &'static Tier,
    },
    Trait {
        pattern: PatternTrait,
        from: ThresholdBand,
        to: ThresholdBand,
    },
}

/// Promotions from `previous` to `current`.
///
/// Only strict level increases are reported; equal levels under a
/// different name and demotions are ignored.
pub fn detect_promotions(previous: &PatternMastery, current: &PatternMastery) -> Vec<PatternPromotion> {
    let mut promotions = Vec::new();

    if current.tier.level > previous.tier.level {
        promotions.push(PatternPromotion::Overall {
            from: previous.tier,
            to: current.tier,
        });
    }

    for now in &current.traits {
        if let Some(before) = previous.trait_mastery(now.pattern) {
            if now.band.level() > before.band.level() {
                promotions.push(PatternPromotion::Trait {
                    pattern: now.pattern,
                    from: before.band,
                    to: now.band,
                });
            }
        }
    }

    promotions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(a: i32, p: i32, e: i32, h: i32, b: i32) -> PatternPoints {
        PatternPoints {
            analytical: a,
            patience: p,
            exploring: e,
            helping: h,
            building: b,
        }
    }

    fn score(points: &PatternPoints) -> PatternMastery {
        score_patterns(points, None, DateTime::<Utc>::default())
    }

    #[test]
    fn near_even_traits_are_balanced() {
        let m = score(&pts(10, 10, 11, 9, 10));
        assert!(m.balanced);
        assert_eq!(m.dominant, None);
    }

    #[test]
    fn clear_leader_is_dominant() {
        let m = score(&pts(10, 10, 20, 10, 10));
        assert!(!m.balanced);
        assert_eq!(m.dominant, Some(PatternTrait::Exploring));
    }

    #[test]
    fn near_tie_has_no_dominant() {
        assert_eq!(dominant_trait(&pts(12, 10, 0, 0, 0)), None);
        assert_eq!(dominant_trait(&pts(13, 10, 0, 0, 0)), Some(PatternTrait::Analytical));
        assert_eq!(dominant_trait(&pts(15, 15, 0, 0, 0)), None);
    }

    #[test]
    fn overall_tier_follows_total() {
        assert_eq!(score(&pts(0, 0, 0, 0, 0)).level(), 0);
        assert_eq!(score(&pts(2, 2, 2, 2, 2)).level(), 1);
        assert_eq!(score(&pts(5, 5, 5, 5, 5)).level(), 2);
        assert_eq!(score(&pts(20, 20, 20, 20, 20)).level(), 4);
    }

    #[test]
    fn override_replaces_sum() {
        let m = score_patterns(&pts(1, 0, 0, 0, 0), Some(55), DateTime::<Utc>::default());
        assert_eq!(m.total, 55);
        assert_eq!(m.tier.name, "Refined");
    }

    #[test]
    fn bands_use_trait_specific_cutoffs() {
        let m = score(&pts(8, 8, 15, 9, 0));
        let band = |t| m.trait_mastery(t).unwrap().band;
        assert_eq!(band(PatternTrait::Analytical), ThresholdBand::Developing);
        // Patience needs 10 for Developing.
        assert_eq!(band(PatternTrait::Patience), ThresholdBand::Emerging);
        assert_eq!(band(PatternTrait::Exploring), ThresholdBand::Flourishing);
        assert_eq!(band(PatternTrait::Helping), ThresholdBand::Developing);
        assert_eq!(band(PatternTrait::Building), ThresholdBand::Nascent);
        assert_eq!(m.flourishing_count(), 1);
    }

    #[test]
    fn unlocks_at_ten_fifty_eighty_five() {
        assert_eq!(unlocks_earned(9), 0);
        assert_eq!(unlocks_earned(10), 1);
        assert_eq!(unlocks_earned(49), 1);
        assert_eq!(unlocks_earned(50), 2);
        assert_eq!(unlocks_earned(85), 3);
        assert_eq!(unlocks_earned(400), 3);
    }

    #[test]
    fn evidence_only_for_nonzero_traits() {
        let m = score(&pts(4, 0, 0, 0, 2));
        assert_eq!(m.evidence.len(), 2);
        assert!(m.evidence[0].description.starts_with("Analytical"));
    }

    #[test]
    fn promotions_only_on_strict_increase() {
        let before = score(&pts(2, 2, 2, 2, 2));
        let after = score(&pts(2, 2, 17, 2, 2));
        let promos = detect_promotions(&before, &after);
        assert!(promos.contains(&PatternPromotion::Trait {
            pattern: PatternTrait::Exploring,
            from: ThresholdBand::Nascent,
            to: ThresholdBand::Flourishing,
        }));
        assert!(promos
            .iter()
            .any(|p| matches!(p, PatternPromotion::Overall { to, .. } if to.level == 2)));

        assert!(detect_promotions(&after, &after).is_empty());
        assert!(detect_promotions(&after, &before).is_empty());
    }
}
