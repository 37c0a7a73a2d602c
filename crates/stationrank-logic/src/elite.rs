//! Elite status: five compound designations across subsystems.
//!
//! Each designation is a predicate over one distinguishing metric with a
//! fixed target. Unlocked designations are listed; locked ones show up as
//! pending once they are at least a third of the way there. The count of
//! unlocked designations is graded through [`TierCategory::Elite`].

use serde::{Deserialize, Serialize};

use crate::tiers::{tier_for_points, tier_progress, Tier, TierCategory, TierProgress};

/// Progress at which a locked designation is shown as pending.
pub const PENDING_PROGRESS: f64 = 33.0;

/// Expertise level a domain needs to count as a specialty (Practitioner).
pub const SPECIALIST_LEVEL: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Designation {
    /// Uncovered much of the station's hidden history.
    Archivist,
    /// Practitioner or better in several domains.
    Polymath,
    /// Full trust with several characters.
    Confidant,
    /// Most pattern traits flourishing.
    Harmonist,
    /// Top public standing.
    Luminary,
}

impl Designation {
    pub const ALL: [Designation; 5] = [
        Designation::Archivist,
        Designation::Polymath,
        Designation::Confidant,
        Designation::Harmonist,
        Designation::Luminary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Designation::Archivist => "Archivist",
            Designation::Polymath => "Polymath",
            Designation::Confidant => "Confidant",
            Designation::Harmonist => "Harmonist",
            Designation::Luminary => "Luminary",
        }
    }

    pub fn target(self) -> u32 {
        match self {
            Designation::Archivist => 12,
            Designation::Polymath => 3,
            Designation::Confidant => 3,
            Designation::Harmonist => 4,
            Designation::Luminary => 3,
        }
    }
}

/// Metrics read by the designation predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EliteInputs {
    pub discoveries: u32,
    pub specialist_domains: u32,
    pub max_trust_characters: u32,
    pub flourishing_traits: u32,
    pub standing_level: u8,
}

impl EliteInputs {
    pub fn metric(&self, designation: Designation) -> u32 {
        match designation {
            Designation::Archivist => self.discoveries,
            Designation::Polymath => self.specialist_domains,
            Designation::Confidant => self.max_trust_characters,
            Designation::Harmonist => self.flourishing_traits,
            Designation::Luminary => self.standing_level as u32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignationStatus {
    pub designation: Designation,
    pub metric: u32,
    pub target: u32,
    pub unlocked: bool,
    /// 0–100.
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EliteStatus {
    pub designations: Vec<DesignationStatus>,
    pub unlocked: Vec<Designation>,
    pub pending: Vec<Designation>,
    pub tier: &'static Tier,
    pub progress: TierProgress,
}

impl EliteStatus {
    pub fn unlocked_count(&self) -> u8 {
        self.unlocked.len() as u8
    }
}

pub fn evaluate_designation(designation: Designation, inputs: &EliteInputs) -> DesignationStatus {
    let metric = inputs.metric(designation);
    let target = designation.target();
    let progress = if target == 0 {
        100.0
    } else {
        (metric as f64 / target as f64 * 100.0).min(100.0)
    };
    DesignationStatus {
        designation,
        metric,
        target,
        unlocked: metric >= target,
        progress,
    }
}

pub fn evaluate_elite(inputs: &EliteInputs) -> EliteStatus {
    let designations: Vec<DesignationStatus> = Designation::ALL
        .iter()
        .map(|d| evaluate_designation(*d, inputs))
        .collect();
    let unlocked: Vec<Designation> = designations
        .iter()
        .filter(|s| s.unlocked)
        .map(|s| s.designation)
        .collect();
    let pending = designations
        .iter()
        .filter(|s| !s.unlocked && s.progress >= PENDING_PROGRESS)
        .map(|s| s.designation)
        .collect();
    let count = unlocked.len() as f64;
    EliteStatus {
        tier: tier_for_points(TierCategory::Elite, count),
        progress: tier_progress(TierCategory::Elite, count),
        designations,
        unlocked,
        pending,
    }
}
