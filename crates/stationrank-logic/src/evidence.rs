//! Justification records attached to computed scores.
//!
//! Evidence is purely explanatory: the UI shows it next to a score so the
//! player can see *why* they hold a tier. It never feeds back into any
//! number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of telemetry an evidence line points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    TraitPoints,
    TrustedCharacter,
    CompletedArc,
    DemonstratedSkill,
    Dimension,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub kind: EvidenceKind,
    pub description: String,
    pub recorded_at: DateTime<Utc>,
}

impl Evidence {
    pub fn new(kind: EvidenceKind, description: impl Into<String>, recorded_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            description: description.into(),
            recorded_at,
        }
    }
}
