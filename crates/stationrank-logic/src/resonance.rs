//! Resonance: cross-subsystem multiplicative bonuses and one-shot events.
//!
//! Each [`ResonanceRule`] names a source subsystem, the level it must
//! reach, a target subsystem, and a multiplier. Rules are checked by a
//! per-kind predicate ([`is_active`]); each kind reads a different input.
//!
//! Active multipliers for the same target stack multiplicatively:
//!
//! ```
//! use stationrank_logic::resonance::{multiplier_for, ResonanceInput, Subsystem};
//!
//! let input = ResonanceInput {
//!     pattern_level: 2,          // pattern_focus: expertise × 1.15
//!     assessment_complete: true, // assessment_insight: expertise × 1.20
//!     ..Default::default()
//! };
//! assert!((multiplier_for(Subsystem::Expertise, &input) - 1.38).abs() < 1e-9);
//! ```
//!
//! Multipliers are advisory: the host applies them to point awards via
//! [`apply_resonance`]. They never feed back into tier computation.
//!
//! Resonance events fire when a set of rule kinds is active at once and
//! the event has not been granted yet. The caller records grants with
//! [`record_event_completed`] and threads the set back in.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    Patterns,
    Expertise,
    Challenge,
    Standing,
    Stars,
    Elite,
    Assessment,
    Cohort,
}

impl Subsystem {
    pub const ALL: [Subsystem; 8] = [
        Subsystem::Patterns,
        Subsystem::Expertise,
        Subsystem::Challenge,
        Subsystem::Standing,
        Subsystem::Stars,
        Subsystem::Elite,
        Subsystem::Assessment,
        Subsystem::Cohort,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResonanceRuleKind {
    PatternFocus,
    ExpertiseDepth,
    StandingPresence,
    ChallengeTriumph,
    StarAlignment,
    EliteRecognition,
    AssessmentInsight,
    CohortMomentum,
}

/// Subsystem readings the rule predicates look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResonanceInput {
    pub pattern_level: u8,
    pub expertise_level: u8,
    pub standing_level: u8,
    pub grade_index: u8,
    pub challenge_overcome: bool,
    pub total_stars: u8,
    pub unlocked_designations: u8,
    pub assessment_complete: bool,
    /// [`crate::cohort::CohortStanding::level`].
    pub cohort_level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResonanceRule {
    pub id: &'static str,
    pub kind: ResonanceRuleKind,
    pub source: Subsystem,
    pub min_level: u8,
    pub target: Subsystem,
    pub multiplier: f64,
    pub description: &'static str,
}

pub static RESONANCE_RULES: [ResonanceRule; 8] = [
    ResonanceRule {
        id: "pattern_focus",
        kind: ResonanceRuleKind::PatternFocus,
        source: Subsystem::Patterns,
        min_level: 2,
        target: Subsystem::Expertise,
        multiplier: 1.15,
        description: "Developed patterns sharpen career learning.",
    },
    ResonanceRule {
        id: "expertise_depth",
        kind: ResonanceRuleKind::ExpertiseDepth,
        source: Subsystem::Expertise,
        min_level: 3,
        target: Subsystem::Standing,
        multiplier: 1.10,
        description: "Practitioners earn more public merit.",
    },
    ResonanceRule {
        id: "standing_presence",
        kind: ResonanceRuleKind::StandingPresence,
        source: Subsystem::Standing,
        min_level: 2,
        target: Subsystem::Patterns,
        multiplier: 1.10,
        description: "A notable presence reinforces your patterns.",
    },
    ResonanceRule {
        id: "challenge_triumph",
        kind: ResonanceRuleKind::ChallengeTriumph,
        source: Subsystem::Challenge,
        min_level: 2,
        target: Subsystem::Stars,
        multiplier: 1.20,
        description: "Grade B or better with a challenge overcome.",
    },
    ResonanceRule {
        id: "star_alignment",
        kind: ResonanceRuleKind::StarAlignment,
        source: Subsystem::Stars,
        min_level: 9,
        target: Subsystem::Elite,
        multiplier: 1.15,
        description: "Half the constellation lit.",
    },
    ResonanceRule {
        id: "elite_recognition",
        kind: ResonanceRuleKind::EliteRecognition,
        source: Subsystem::Elite,
        min_level: 1,
        target: Subsystem::Standing,
        multiplier: 1.20,
        description: "A designation draws attention on the billboard.",
    },
    ResonanceRule {
        id: "assessment_insight",
        kind: ResonanceRuleKind::AssessmentInsight,
        source: Subsystem::Assessment,
        min_level: 1,
        target: Subsystem::Expertise,
        multiplier: 1.20,
        description: "Knowing your strengths focuses your learning.",
    },
    ResonanceRule {
        id: "cohort_momentum",
        kind: ResonanceRuleKind::CohortMomentum,
        source: Subsystem::Cohort,
        min_level: 3,
        target: Subsystem::Patterns,
        multiplier: 1.15,
        description: "Running ahead of your cohort.",
    },
];

pub fn rule(kind: ResonanceRuleKind) -> Option<&'static ResonanceRule> {
    RESONANCE_RULES.iter().find(|r| r.kind == kind)
}

/// Whether `rule` currently holds.
pub fn is_active(rule: &ResonanceRule, input: &ResonanceInput) -> bool {
    match rule.kind {
        ResonanceRuleKind::PatternFocus => input.pattern_level >= rule.min_level,
        ResonanceRuleKind::ExpertiseDepth => input.expertise_level >= rule.min_level,
        ResonanceRuleKind::StandingPresence => input.standing_level >= rule.min_level,
        ResonanceRuleKind::ChallengeTriumph => {
            input.grade_index >= rule.min_level && input.challenge_overcome
        }
        ResonanceRuleKind::StarAlignment => input.total_stars >= rule.min_level,
        ResonanceRuleKind::EliteRecognition => input.unlocked_designations >= rule.min_level,
        ResonanceRuleKind::AssessmentInsight => input.assessment_complete,
        ResonanceRuleKind::CohortMomentum => input.cohort_level >= rule.min_level,
    }
}

pub fn active_rules(input: &ResonanceInput) -> Vec<&'static ResonanceRule> {
    RESONANCE_RULES
        .iter()
        .filter(|r| {
            let active = is_active(r, input);
            log::trace!("resonance rule {} active={}", r.id, active);
            active
        })
        .collect()
}

/// Product of every active multiplier aimed at `target` (1.0 if none).
pub fn multiplier_for(target: Subsystem, input: &ResonanceInput) -> f64 {
    RESONANCE_RULES
        .iter()
        .filter(|r| r.target == target && is_active(r, input))
        .map(|r| r.multiplier)
        .product()
}

/// Scale a point award headed for `target` by its resonance multiplier.
pub fn apply_resonance(base: f64, target: Subsystem, input: &ResonanceInput) -> f64 {
    base * multiplier_for(target, input)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResonanceReward {
    TraitPoints(u32),
    ExpertisePoints(u32),
    MeritPoints(u32),
    SetFlag(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResonanceEvent {
    pub id: &'static str,
    pub name: &'static str,
    /// Rule kinds that must all be active at once.
    pub requires: &'static [ResonanceRuleKind],
    pub reward: ResonanceReward,
    pub description: &'static str,
}

pub static RESONANCE_EVENTS: [ResonanceEvent; 5] = [
    ResonanceEvent {
        id: "harmonic_convergence",
        name: "Harmonic Convergence",
        requires: &[ResonanceRuleKind::PatternFocus, ResonanceRuleKind::ExpertiseDepth],
        reward: ResonanceReward::TraitPoints(5),
        description: "How you think and what you do line up.",
    },
    ResonanceEvent {
        id: "public_virtuoso",
        name: "Public Virtuoso",
        requires: &[ResonanceRuleKind::StandingPresence, ResonanceRuleKind::ChallengeTriumph],
        reward: ResonanceReward::MeritPoints(50),
        description: "The concourse saw you rise to the challenge.",
    },
    ResonanceEvent {
        id: "guiding_star",
        name: "Guiding Star",
        requires: &[ResonanceRuleKind::StarAlignment, ResonanceRuleKind::EliteRecognition],
        reward: ResonanceReward::SetFlag("guiding_star_revealed"),
        description: "A new star appears over the platform.",
    },
    ResonanceEvent {
        id: "self_knowledge",
        name: "Self Knowledge",
        requires: &[ResonanceRuleKind::AssessmentInsight, ResonanceRuleKind::PatternFocus],
        reward: ResonanceReward::ExpertisePoints(5),
        description: "Your assessment and your patterns agree.",
    },
    ResonanceEvent {
        id: "rising_tide",
        name: "Rising Tide",
        requires: &[ResonanceRuleKind::CohortMomentum, ResonanceRuleKind::StandingPresence],
        reward: ResonanceReward::MeritPoints(25),
        description: "Ahead of your cohort and known for it.",
    },
];

/// Events whose required rules are all active and that have not been
/// granted yet, in table order.
pub fn pending_events(input: &ResonanceInput, completed: &BTreeSet<String>) -> Vec<&'static ResonanceEvent> {
    let active: BTreeSet<ResonanceRuleKind> = active_rules(input).iter().map(|r| r.kind).collect();
    RESONANCE_EVENTS
        .iter()
        .filter(|e| !completed.contains(e.id))
        .filter(|e| e.requires.iter().all(|k| active.contains(k)))
        .collect()
}

/// `completed` plus `event_id`, as a new set.
pub fn record_event_completed(completed: &BTreeSet<String>, event_id: &str) -> BTreeSet<String> {
    let mut next = completed.clone();
    next.insert(event_id.to_string());
    next
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubsystemMultiplier {
    pub target: Subsystem,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResonanceState {
    pub input: ResonanceInput,
    pub active: Vec<&'static ResonanceRule>,
    /// One entry per subsystem, in [`Subsystem::ALL`] order.
    pub multipliers: Vec<SubsystemMultiplier>,
    pub pending_events: Vec<&'static ResonanceEvent>,
}

impl ResonanceState {
    pub fn multiplier(&self, target: Subsystem) -> f64 {
        self.multipliers
            .iter()
            .find(|m| m.target == target)
            .map(|m| m.multiplier)
            .unwrap_or(1.0)
    }
}

pub fn evaluate_resonance(input: &ResonanceInput, completed: &BTreeSet<String>) -> ResonanceState {
    ResonanceState {
        input: *input,
        active: active_rules(input),
        multipliers: Subsystem::ALL
            .iter()
            .map(|&target| SubsystemMultiplier {
                target,
                multiplier: multiplier_for(target, input),
            })
            .collect(),
        pending_events: pending_events(input, completed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_active_on_zero_input() {
        let state = evaluate_resonance(&ResonanceInput::default(), &BTreeSet::new());
        assert!(state.active.is_empty());
        assert!(state.pending_events.is_empty());
        assert!(state.multipliers.iter().all(|m| m.multiplier == 1.0));
    }

    #[test]
    fn multipliers_stack_multiplicatively() {
        let input = ResonanceInput {
            pattern_level: 2,
            assessment_complete: true,
            ..Default::default()
        };
        let m = multiplier_for(Subsystem::Expertise, &input);
        assert!((m - 1.15 * 1.20).abs() < 1e-12);
        assert!((m - 1.38).abs() < 1e-9);
        assert!((m - 1.35).abs() > 0.01);
        assert!((apply_resonance(10.0, Subsystem::Expertise, &input) - 13.8).abs() < 1e-9);
    }

    #[test]
    fn challenge_triumph_needs_grade_and_flag() {
        let r = rule(ResonanceRuleKind::ChallengeTriumph).unwrap();
        let mut input = ResonanceInput {
            grade_index: 3,
            ..Default::default()
        };
        assert!(!is_active(r, &input));
        input.challenge_overcome = true;
        assert!(is_active(r, &input));
        input.grade_index = 1;
        assert!(!is_active(r, &input));
    }

    #[test]
    fn events_need_every_required_rule() {
        let mut input = ResonanceInput {
            pattern_level: 3,
            ..Default::default()
        };
        assert!(pending_events(&input, &BTreeSet::new()).is_empty());
        input.expertise_level = 3;
        let pending = pending_events(&input, &BTreeSet::new());
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "harmonic_convergence");
        assert_eq!(pending[0].reward, ResonanceReward::TraitPoints(5));
    }

    #[test]
    fn completed_events_do_not_retrigger() {
        let input = ResonanceInput {
            pattern_level: 3,
            expertise_level: 3,
            ..Default::default()
        };
        let none = BTreeSet::new();
        let done = record_event_completed(&none, "harmonic_convergence");
        assert!(none.is_empty());
        assert!(pending_events(&input, &done).is_empty());
        assert_eq!(record_event_completed(&done, "harmonic_convergence"), done);
    }

    #[test]
    fn rule_ids_unique_and_multipliers_above_one() {
        let mut ids: Vec<_> = RESONANCE_RULES.iter().map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), RESONANCE_RULES.len());
        assert!(RESONANCE_RULES.iter().all(|r| r.multiplier > 1.0));
        for event in &RESONANCE_EVENTS {
            assert!(event.requires.iter().all(|k| rule(*k).is_some()));
        }
    }
}
