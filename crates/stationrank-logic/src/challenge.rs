//! Challenge rating: a 5-grade readiness score and content matching.
//!
//! Four 0–100 dimensions are blended with fixed weights:
//!
//! | Dimension | Source | Weight |
//! |-----------|--------|--------|
//! | Pattern mastery | pattern level / 4 | 30% |
//! | Career expertise | max domain level / 5 | 25% |
//! | Relationship depth | average trust / 10 | 25% |
//! | Skill breadth | skill count / target | 20% |
//!
//! The blended score is clamped to 0–100, rounded, and graded
//! D (<25), C (<50), B (<75), A (<90), S (≥90).
//!
//! ```
//! use stationrank_logic::challenge::{readiness_match, Grade, ReadinessMatch};
//!
//! assert_eq!(readiness_match(Grade::A, Grade::B), ReadinessMatch::Challenging);
//! assert_eq!(readiness_match(Grade::D, Grade::A), ReadinessMatch::Trivial);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::evidence::{Evidence, EvidenceKind};
use crate::snapshot::MAX_TRUST;
use crate::tiers::{clamp_finite, max_level, tier_for_points, tier_progress, Tier, TierCategory, TierProgress};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    D,
    C,
    B,
    A,
    S,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::D, Grade::C, Grade::B, Grade::A, Grade::S];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Grade at `index`, clamped to S.
    pub fn from_index(index: u8) -> Self {
        Grade::ALL[(index as usize).min(Grade::ALL.len() - 1)]
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::D => "D",
            Grade::C => "C",
            Grade::B => "B",
            Grade::A => "A",
            Grade::S => "S",
        }
    }
}

/// Blend weights and normalization targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeWeights {
    pub pattern_mastery: f64,
    pub career_expertise: f64,
    pub relationship_depth: f64,
    pub skill_breadth: f64,
    /// Skill count that maps to a full skill-breadth score.
    pub skill_breadth_target: u32,
}

impl Default for ChallengeWeights {
    fn default() -> Self {
        Self {
            pattern_mastery: 0.30,
            career_expertise: 0.25,
            relationship_depth: 0.25,
            skill_breadth: 0.20,
            skill_breadth_target: 12,
        }
    }
}

impl ChallengeWeights {
    pub fn sum(&self) -> f64 {
        self.pattern_mastery + self.career_expertise + self.relationship_depth + self.skill_breadth
    }
}

/// The four normalized inputs, each 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChallengeDimensions {
    pub pattern_mastery: f64,
    pub career_expertise: f64,
    pub relationship_depth: f64,
    pub skill_breadth: f64,
}

impl ChallengeDimensions {
    /// Normalize raw subsystem readings into 0–100 dimensions.
    pub fn from_levels(
        pattern_level: u8,
        expertise_level: u8,
        average_trust: f64,
        skill_count: usize,
        weights: &ChallengeWeights,
    ) -> Self {
        let pattern_max = max_level(TierCategory::Pattern).max(1) as f64;
        let expertise_max = max_level(TierCategory::Expertise).max(1) as f64;
        let breadth = if weights.skill_breadth_target == 0 {
            0.0
        } else {
            skill_count as f64 / weights.skill_breadth_target as f64
        };
        Self {
            pattern_mastery: clamp_finite(pattern_level as f64 / pattern_max * 100.0, 0.0, 100.0),
            career_expertise: clamp_finite(expertise_level as f64 / expertise_max * 100.0, 0.0, 100.0),
            relationship_depth: clamp_finite(average_trust / MAX_TRUST as f64 * 100.0, 0.0, 100.0),
            skill_breadth: clamp_finite(breadth * 100.0, 0.0, 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeRating {
    pub dimensions: ChallengeDimensions,
    /// Rounded blended score, 0–100.
    pub score: u8,
    pub grade: Grade,
    pub tier: &'static Tier,
    pub progress: TierProgress,
    pub evidence: Vec<Evidence>,
}

/// Blend the dimensions and grade the result.
pub fn rate_challenge(
    dimensions: &ChallengeDimensions,
    weights: &ChallengeWeights,
    observed_at: DateTime<Utc>,
) -> ChallengeRating {
    let raw = dimensions.pattern_mastery * weights.pattern_mastery
        + dimensions.career_expertise * weights.career_expertise
        + dimensions.relationship_depth * weights.relationship_depth
        + dimensions.skill_breadth * weights.skill_breadth;
    let score = clamp_finite(raw, 0.0, 100.0).round() as u8;

    let tier = tier_for_points(TierCategory::Challenge, score as f64);
    let evidence = [
        ("Pattern mastery", dimensions.pattern_mastery),
        ("Career expertise", dimensions.career_expertise),
        ("Relationship depth", dimensions.relationship_depth),
        ("Skill breadth", dimensions.skill_breadth),
    ]
    .iter()
    .filter(|(_, v)| *v > 0.0)
    .map(|(name, v)| Evidence::new(EvidenceKind::Dimension, format!("{}: {:.0}/100", name, v), observed_at))
    .collect();

    ChallengeRating {
        dimensions: *dimensions,
        score,
        grade: Grade::from_index(tier.level),
        tier,
        progress: tier_progress(TierCategory::Challenge, score as f64),
        evidence,
    }
}

/// How a content item's grade sits against the player's grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessMatch {
    Perfect,
    Comfortable,
    Challenging,
    Overreach,
    Trivial,
}

pub fn readiness_match(content: Grade, player: Grade) -> ReadinessMatch {
    match content.index() as i8 - player.index() as i8 {
        0 => ReadinessMatch::Perfect,
        -1 => ReadinessMatch::Comfortable,
        1 => ReadinessMatch::Challenging,
        d if d >= 2 => ReadinessMatch::Overreach,
        _ => ReadinessMatch::Trivial,
    }
}

/// A piece of gradable content (scene, mission, puzzle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub grade: Grade,
}

/// Content within one grade of the player. With `include_overreach`,
/// items two or more grades above are kept as well; trivial items never
/// are.
pub fn filter_content(items: &[ContentItem], player: Grade, include_overreach: bool) -> Vec<&ContentItem> {
    items
        .iter()
        .filter(|item| match readiness_match(item.grade, player) {
            ReadinessMatch::Perfect | ReadinessMatch::Comfortable | ReadinessMatch::Challenging => true,
            ReadinessMatch::Overreach => include_overreach,
            ReadinessMatch::Trivial => false,
        })
        .collect()
}
