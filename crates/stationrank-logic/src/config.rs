//! Engine configuration: every tunable in one serde tree.
//!
//! Each nested struct is `#[serde(default)]`, so a host can override a
//! single weight in JSON and inherit the rest:
//!
//! ```
//! use stationrank_logic::config::EngineConfig;
//!
//! let cfg = EngineConfig::from_json(r#"{ "ceremony": { "cooldown_hours": 2 } }"#).unwrap();
//! assert_eq!(cfg.ceremony.cooldown_hours, 2);
//! assert_eq!(cfg.expertise.trusted_threshold, 6);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ceremony::CeremonyConfig;
use crate::challenge::ChallengeWeights;
use crate::cohort::CohortConfig;
use crate::dashboard::ProgressionWeights;
use crate::expertise::ExpertiseConfig;
use crate::standing::MeritWeights;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub expertise: ExpertiseConfig,
    pub challenge: ChallengeWeights,
    pub merit: MeritWeights,
    pub cohort: CohortConfig,
    pub ceremony: CeremonyConfig,
    pub progression: ProgressionWeights,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A semantic problem with an otherwise well-formed config.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigIssue {
    /// Challenge weights should sum to 1.0.
    ChallengeWeightSum(f64),
    /// Progression weights should sum to 1.0.
    ProgressionWeightSum(f64),
    /// A weight is negative or not finite.
    InvalidWeight(&'static str, f64),
    /// Merit ceiling must be positive.
    MeritCeiling(f64),
    /// Logistic steepness must be positive.
    CohortSteepness(f64),
    /// Skill breadth target of zero disables the dimension.
    SkillBreadthTarget,
    /// Cooldown longer than a week.
    CooldownTooLong(u32),
    /// Trust threshold outside 0–10.
    TrustedThreshold(i32),
}

const WEIGHT_TOLERANCE: f64 = 1e-6;

fn check_weight(issues: &mut Vec<ConfigIssue>, name: &'static str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        issues.push(ConfigIssue::InvalidWeight(name, value));
    }
}

/// Validate an engine config, returning all issues found.
pub fn validate_engine_config(config: &EngineConfig) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    let c = &config.challenge;
    for (name, w) in [
        ("challenge.pattern_mastery", c.pattern_mastery),
        ("challenge.career_expertise", c.career_expertise),
        ("challenge.relationship_depth", c.relationship_depth),
        ("challenge.skill_breadth", c.skill_breadth),
    ] {
        check_weight(&mut issues, name, w);
    }
    if (c.sum() - 1.0).abs() > WEIGHT_TOLERANCE {
        issues.push(ConfigIssue::ChallengeWeightSum(c.sum()));
    }
    if c.skill_breadth_target == 0 {
        issues.push(ConfigIssue::SkillBreadthTarget);
    }

    let p = &config.progression;
    for (name, w) in [
        ("progression.patterns", p.patterns),
        ("progression.expertise", p.expertise),
        ("progression.merit", p.merit),
        ("progression.stars", p.stars),
        ("progression.elite", p.elite),
    ] {
        check_weight(&mut issues, name, w);
    }
    if (p.sum() - 1.0).abs() > WEIGHT_TOLERANCE {
        issues.push(ConfigIssue::ProgressionWeightSum(p.sum()));
    }
    if !(p.merit_ceiling > 0.0) {
        issues.push(ConfigIssue::MeritCeiling(p.merit_ceiling));
    }

    let m = &config.merit;
    for (name, w) in [
        ("merit.per_pattern_point", m.per_pattern_point),
        ("merit.per_character_met", m.per_character_met),
        ("merit.per_trust_point", m.per_trust_point),
        ("merit.per_scene", m.per_scene),
        ("merit.per_arc", m.per_arc),
        ("merit.per_skill", m.per_skill),
        ("merit.per_achievement", m.per_achievement),
    ] {
        check_weight(&mut issues, name, w);
    }

    if !(config.cohort.steepness > 0.0) {
        issues.push(ConfigIssue::CohortSteepness(config.cohort.steepness));
    }
    if config.ceremony.cooldown_hours > 24 * 7 {
        issues.push(ConfigIssue::CooldownTooLong(config.ceremony.cooldown_hours));
    }
    if !(0..=10).contains(&config.expertise.trusted_threshold) {
        issues.push(ConfigIssue::TrustedThreshold(config.expertise.trusted_threshold));
    }

    issues
}
