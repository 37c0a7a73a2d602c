//! Score input snapshot: the read-only view of play telemetry.
//!
//! The host game owns all raw state. On every relevant change it builds a
//! fresh [`ScoreSnapshot`] and hands it to the engine. Every field has a
//! zero/empty default, so partial JSON deserializes cleanly:
//!
//! ```
//! use stationrank_logic::snapshot::ScoreSnapshot;
//!
//! let snapshot: ScoreSnapshot = serde_json::from_str(r#"{ "characters_met": 4 }"#).unwrap();
//! assert_eq!(snapshot.characters_met, 4);
//! assert!(snapshot.trust.is_empty());
//! ```
//!
//! Accessors on the snapshot sanitize values (negative counters, trust
//! outside 0–10) so scorers can trust what they read.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ceremony::CeremonyLedger;
use crate::patterns::{PatternPoints, PatternTrait};

/// Highest trust a character relationship can reach.
pub const MAX_TRUST: i32 = 10;

/// Flag set by the narrative once the career assessment scene finishes.
pub const FLAG_ASSESSMENT_COMPLETE: &str = "career_assessment_complete";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreSnapshot {
    /// Host clock at the moment the snapshot was taken. The engine never
    /// reads the wall clock itself.
    pub observed_at: DateTime<Utc>,
    pub account_created_at: Option<DateTime<Utc>>,
    /// Accumulated points per pattern trait.
    pub patterns: PatternPoints,
    /// Externally supplied overall pattern total; `None` sums the traits.
    pub pattern_total: Option<i64>,
    /// Character id → trust (0–10).
    pub trust: BTreeMap<String, i32>,
    /// Demonstrated skill id → demonstration level.
    pub skills: BTreeMap<String, u32>,
    /// Distinct skill combinations used together.
    pub skill_combos: u32,
    /// Ids of completed story arcs.
    pub completed_arcs: Vec<String>,
    pub characters_met: u32,
    pub scenes_visited: u32,
    pub sessions_played: u32,
    pub achievements: u32,
    /// Pieces of hidden information the player has uncovered.
    pub discoveries: u32,
    pub challenges_overcome: u32,
    /// Global narrative flags currently set.
    pub flags: BTreeSet<String>,
    /// Resonance events already granted.
    pub completed_resonance_events: BTreeSet<String>,
    /// Ceremony state threaded back from the previous computation.
    pub ceremonies: CeremonyLedger,
    /// Size of the comparison group when an aggregate is available.
    /// `None` means local estimation.
    pub cohort_group_size: Option<u32>,
}

impl ScoreSnapshot {
    /// Empty snapshot observed at `observed_at`.
    pub fn at(observed_at: DateTime<Utc>) -> Self {
        Self {
            observed_at,
            ..Self::default()
        }
    }

    /// Points for one trait, clamped at zero.
    pub fn trait_points(&self, pattern: PatternTrait) -> i32 {
        let raw = self.patterns.get(pattern);
        if raw < 0 {
            log::warn!("negative {} points ({}) clamped to 0", pattern.as_str(), raw);
            return 0;
        }
        raw
    }

    /// Overall pattern total: the supplied aggregate, else the trait sum.
    pub fn pattern_total(&self) -> i64 {
        match self.pattern_total {
            Some(total) if total < 0 => {
                log::warn!("negative pattern total ({}) clamped to 0", total);
                0
            }
            Some(total) => total,
            None => PatternTrait::ALL
                .iter()
                .map(|t| self.trait_points(*t) as i64)
                .sum(),
        }
    }

    /// Trust for one character (case-insensitive id), clamped to 0–10.
    pub fn trust_of(&self, character: &str) -> i32 {
        self.trust
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(character))
            .map(|(_, t)| clamp_trust(*t))
            .unwrap_or(0)
    }

    /// Clamped trust values in character-id order.
    pub fn trust_values(&self) -> impl Iterator<Item = (&str, i32)> {
        self.trust.iter().map(|(id, t)| (id.as_str(), clamp_trust(*t)))
    }

    /// Mean trust over characters with a trust entry; 0 when none.
    pub fn average_trust(&self) -> f64 {
        if self.trust.is_empty() {
            return 0.0;
        }
        self.total_trust() as f64 / self.trust.len() as f64
    }

    pub fn total_trust(&self) -> i64 {
        self.trust_values().map(|(_, t)| t as i64).sum()
    }

    pub fn max_trust(&self) -> i32 {
        self.trust_values().map(|(_, t)| t).max().unwrap_or(0)
    }

    /// Characters whose trust has reached [`MAX_TRUST`].
    pub fn max_trust_characters(&self) -> u32 {
        self.trust_values().filter(|(_, t)| *t >= MAX_TRUST).count() as u32
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn arcs_completed(&self) -> u32 {
        self.completed_arcs.len() as u32
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn assessment_complete(&self) -> bool {
        self.has_flag(FLAG_ASSESSMENT_COMPLETE)
    }
}

fn clamp_trust(raw: i32) -> i32 {
    if !(0..=MAX_TRUST).contains(&raw) {
        log::warn!("trust {} outside 0..={} clamped", raw, MAX_TRUST);
    }
    raw.clamp(0, MAX_TRUST)
}
