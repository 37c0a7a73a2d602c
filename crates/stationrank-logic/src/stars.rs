//! Skill stars: six independent 0–3 star dimensions and a constellation.
//!
//! Each dimension reads its own metric and compares it against a
//! bronze/silver/gold threshold triple. The star total (0–18) names a
//! constellation, from "Empty Sky" to "Perfect Constellation".
//!
//! ```
//! use stationrank_logic::stars::constellation_for;
//!
//! assert_eq!(constellation_for(0), "Empty Sky");
//! assert_eq!(constellation_for(18), "Perfect Constellation");
//! assert_eq!(constellation_for(40), "Perfect Constellation");
//! ```

use serde::{Deserialize, Serialize};

use crate::snapshot::ScoreSnapshot;

pub const MAX_STARS_PER_DIMENSION: u8 = 3;
pub const MAX_TOTAL_STARS: u8 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarDimension {
    /// Highest single pattern trait.
    PatternDepth,
    /// Skill combinations used together.
    Synthesis,
    /// Hidden information uncovered.
    Discovery,
    /// Highest trust with any character.
    Bonds,
    /// Total pattern points.
    Dedication,
    /// Challenges overcome.
    Resilience,
}

impl StarDimension {
    pub const ALL: [StarDimension; 6] = [
        StarDimension::PatternDepth,
        StarDimension::Synthesis,
        StarDimension::Discovery,
        StarDimension::Bonds,
        StarDimension::Dedication,
        StarDimension::Resilience,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StarDimension::PatternDepth => "Pattern Depth",
            StarDimension::Synthesis => "Synthesis",
            StarDimension::Discovery => "Discovery",
            StarDimension::Bonds => "Bonds",
            StarDimension::Dedication => "Dedication",
            StarDimension::Resilience => "Resilience",
        }
    }

    /// Bronze, silver, gold.
    pub fn thresholds(self) -> [f64; 3] {
        match self {
            StarDimension::PatternDepth => [5.0, 12.0, 20.0],
            StarDimension::Synthesis => [1.0, 3.0, 6.0],
            StarDimension::Discovery => [3.0, 8.0, 15.0],
            StarDimension::Bonds => [4.0, 7.0, 10.0],
            StarDimension::Dedication => [20.0, 50.0, 100.0],
            StarDimension::Resilience => [1.0, 3.0, 6.0],
        }
    }
}

/// Constellation names indexed by star total.
pub const CONSTELLATIONS: [&str; 19] = [
    "Empty Sky",
    "First Light",
    "Twin Sparks",
    "Faint Triangle",
    "Kite",
    "Lantern",
    "Little Dipper",
    "Wayfinder",
    "Compass Rose",
    "Lyre",
    "Heron",
    "Twin Rivers",
    "Crown",
    "Great Bear",
    "Phoenix",
    "Navigator",
    "Grand Voyager",
    "Celestial Arc",
    "Perfect Constellation",
];

/// Constellation for a star total, clamped to 0–18.
pub fn constellation_for(total: i32) -> &'static str {
    CONSTELLATIONS[total.clamp(0, MAX_TOTAL_STARS as i32) as usize]
}

/// The metrics each dimension reads.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StarInputs {
    pub max_trait: i32,
    pub skill_combos: u32,
    pub discoveries: u32,
    pub max_trust: i32,
    pub total_points: i64,
    pub challenges_overcome: u32,
}

impl StarInputs {
    pub fn from_snapshot(snapshot: &ScoreSnapshot) -> Self {
        let max_trait = crate::patterns::PatternTrait::ALL
            .iter()
            .map(|t| snapshot.trait_points(*t))
            .max()
            .unwrap_or(0);
        Self {
            max_trait,
            skill_combos: snapshot.skill_combos,
            discoveries: snapshot.discoveries,
            max_trust: snapshot.max_trust(),
            total_points: snapshot.pattern_total(),
            challenges_overcome: snapshot.challenges_overcome,
        }
    }

    pub fn value(&self, dimension: StarDimension) -> f64 {
        match dimension {
            StarDimension::PatternDepth => self.max_trait as f64,
            StarDimension::Synthesis => self.skill_combos as f64,
            StarDimension::Discovery => self.discoveries as f64,
            StarDimension::Bonds => self.max_trust as f64,
            StarDimension::Dedication => self.total_points as f64,
            StarDimension::Resilience => self.challenges_overcome as f64,
        }
    }
}

/// Stars earned against a threshold triple.
pub fn star_level(value: f64, thresholds: &[f64; 3]) -> u8 {
    thresholds.iter().filter(|t| value >= **t).count() as u8
}

/// Percent progress through the current band toward the next star.
/// 100 once gold is reached.
pub fn band_progress(value: f64, thresholds: &[f64; 3]) -> f64 {
    let level = star_level(value, thresholds) as usize;
    if level >= thresholds.len() {
        return 100.0;
    }
    let lo = if level == 0 { 0.0 } else { thresholds[level - 1] };
    let hi = thresholds[level];
    if hi <= lo || !value.is_finite() {
        return 0.0;
    }
    ((value - lo) / (hi - lo) * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionStars {
    pub dimension: StarDimension,
    pub value: f64,
    pub stars: u8,
    pub progress_to_next: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillStars {
    pub dimensions: Vec<DimensionStars>,
    pub total: u8,
    pub constellation: &'static str,
}

impl SkillStars {
    pub fn dimension(&self, dimension: StarDimension) -> Option<&DimensionStars> {
        self.dimensions.iter().find(|d| d.dimension == dimension)
    }
}

pub fn score_stars(inputs: &StarInputs) -> SkillStars {
    let dimensions: Vec<DimensionStars> = StarDimension::ALL
        .iter()
        .map(|&dimension| {
            let value = inputs.value(dimension);
            let thresholds = dimension.thresholds();
            DimensionStars {
                dimension,
                value,
                stars: star_level(value, &thresholds),
                progress_to_next: band_progress(value, &thresholds),
            }
        })
        .collect();
    let total: u8 = dimensions.iter().map(|d| d.stars).sum();
    SkillStars {
        constellation: constellation_for(total as i32),
        total,
        dimensions,
    }
}
