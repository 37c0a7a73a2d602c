//! Career expertise: per-domain tiers from trust, arcs, and skills.
//!
//! Five fixed career domains each draw points from three sources:
//!
//! 1. a fixed bonus per domain character whose trust has reached the
//!    "trusted" threshold,
//! 2. a fixed bonus per completed arc whose id names a domain character
//!    (each arc counts at most once per domain),
//! 3. a per-level bonus for each demonstrated skill whose id contains one
//!    of the domain's keywords.
//!
//! Keyword matching is case-insensitive substring matching. A skill that
//! matches several domains scores only in the first one in
//! [`CareerDomain::ALL`] order, so no skill is ever counted twice.
//!
//! ```
//! use stationrank_logic::expertise::{domain_for_skill, CareerDomain};
//!
//! assert_eq!(domain_for_skill("systems_debugging"), Some(CareerDomain::Technology));
//! assert_eq!(domain_for_skill("juggling"), None);
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::evidence::{Evidence, EvidenceKind};
use crate::snapshot::ScoreSnapshot;
use crate::tiers::{tier_for_points, tier_progress, Tier, TierCategory, TierProgress};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerDomain {
    Technology,
    Medicine,
    Arts,
    Enterprise,
    Civic,
}

impl CareerDomain {
    /// Canonical enumeration order. Also the tie-break order.
    pub const ALL: [CareerDomain; 5] = [
        CareerDomain::Technology,
        CareerDomain::Medicine,
        CareerDomain::Arts,
        CareerDomain::Enterprise,
        CareerDomain::Civic,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CareerDomain::Technology => "Technology",
            CareerDomain::Medicine => "Medicine",
            CareerDomain::Arts => "Arts",
            CareerDomain::Enterprise => "Enterprise",
            CareerDomain::Civic => "Civic",
        }
    }

    /// Lowercase keyword fragments matched against skill ids.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            CareerDomain::Technology => &["code", "system", "debug", "engineer", "data"],
            CareerDomain::Medicine => &["triage", "care", "diagnos", "heal", "medic"],
            CareerDomain::Arts => &["design", "compose", "sketch", "story", "craft"],
            CareerDomain::Enterprise => &["negotiat", "budget", "market", "pitch", "lead"],
            CareerDomain::Civic => &["mediat", "organiz", "advoca", "community", "teach"],
        }
    }
}

/// Character → domain. `None` marks hub characters that belong to no
/// domain.
pub const CHARACTER_DOMAINS: &[(&str, Option<CareerDomain>)] = &[
    ("samuel", None),
    ("station", None),
    ("maya", Some(CareerDomain::Technology)),
    ("devon", Some(CareerDomain::Technology)),
    ("marcus", Some(CareerDomain::Medicine)),
    ("grace", Some(CareerDomain::Medicine)),
    ("tess", Some(CareerDomain::Arts)),
    ("lira", Some(CareerDomain::Arts)),
    ("rohan", Some(CareerDomain::Enterprise)),
    ("jordan", Some(CareerDomain::Enterprise)),
    ("elena", Some(CareerDomain::Civic)),
    ("alex", Some(CareerDomain::Civic)),
];

fn character_index() -> &'static HashMap<&'static str, Option<CareerDomain>> {
    static INDEX: OnceLock<HashMap<&'static str, Option<CareerDomain>>> = OnceLock::new();
    INDEX.get_or_init(|| CHARACTER_DOMAINS.iter().copied().collect())
}

/// Domain of a character id (case-insensitive). Hubs and unknown
/// characters return `None`.
pub fn domain_for_character(character: &str) -> Option<CareerDomain> {
    character_index()
        .get(character.to_ascii_lowercase().as_str())
        .copied()
        .flatten()
}

/// Characters assigned to `domain`, in table order.
pub fn characters_in(domain: CareerDomain) -> impl Iterator<Item = &'static str> {
    CHARACTER_DOMAINS
        .iter()
        .filter(move |(_, d)| *d == Some(domain))
        .map(|(id, _)| *id)
}

/// First domain (in [`CareerDomain::ALL`] order) whose keywords appear in
/// the skill id.
pub fn domain_for_skill(skill_id: &str) -> Option<CareerDomain> {
    let lower = skill_id.to_ascii_lowercase();
    CareerDomain::ALL
        .into_iter()
        .find(|d| d.keywords().iter().any(|k| lower.contains(k)))
}

/// Whether an arc id textually names any character of `domain`.
pub fn arc_references(arc_id: &str, domain: CareerDomain) -> bool {
    let lower = arc_id.to_ascii_lowercase();
    characters_in(domain).any(|c| lower.contains(c))
}

/// Weights for expertise scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpertiseConfig {
    /// Minimum trust for a character to count as trusted.
    pub trusted_threshold: i32,
    /// Points per trusted domain character.
    pub character_weight: u32,
    /// Points per completed arc referencing the domain.
    pub arc_weight: u32,
    /// Points per level of a matching demonstrated skill.
    pub skill_level_weight: u32,
}

impl Default for ExpertiseConfig {
    fn default() -> Self {
        Self {
            trusted_threshold: 6,
            character_weight: 3,
            arc_weight: 4,
            skill_level_weight: 1,
        }
    }
}

/// How many domains the player has touched at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breadth {
    Narrow,
    Moderate,
    Broad,
}

impl Breadth {
    pub fn from_active_domains(count: usize) -> Self {
        match count {
            0..=1 => Breadth::Narrow,
            2..=3 => Breadth::Moderate,
            _ => Breadth::Broad,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainExpertise {
    pub domain: CareerDomain,
    pub points: u32,
    pub tier: &'static Tier,
    pub progress: TierProgress,
    pub trusted_characters: Vec<String>,
    pub arcs: u32,
    pub skill_levels: u32,
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerExpertise {
    /// One entry per domain, in [`CareerDomain::ALL`] order.
    pub domains: Vec<DomainExpertise>,
    /// Highest-scoring domain; `None` while every domain is at zero.
    pub primary: Option<CareerDomain>,
    pub champion_domains: Vec<CareerDomain>,
    pub breadth: Breadth,
    pub max_level: u8,
}

impl CareerExpertise {
    pub fn domain(&self, domain: CareerDomain) -> Option<&DomainExpertise> {
        self.domains.iter().find(|d| d.domain == domain)
    }

    /// Domains at or above `level`.
    pub fn domains_at_level(&self, level: u8) -> u32 {
        self.domains.iter().filter(|d| d.tier.level >= level).count() as u32
    }
}

#[derive(Default)]
struct DomainTally {
    trusted: Vec<String>,
    arcs: u32,
    skill_levels: u32,
    evidence: Vec<Evidence>,
}

/// Score every domain from the snapshot.
pub fn score_expertise(snapshot: &ScoreSnapshot, config: &ExpertiseConfig) -> CareerExpertise {
    let at = snapshot.observed_at;
    let mut tallies: Vec<DomainTally> = CareerDomain::ALL.iter().map(|_| DomainTally::default()).collect();
    let slot = |d: CareerDomain| CareerDomain::ALL.iter().position(|x| *x == d).unwrap_or(0);

    for (character, trust) in snapshot.trust_values() {
        if trust < config.trusted_threshold {
            continue;
        }
        if let Some(domain) = domain_for_character(character) {
            let tally = &mut tallies[slot(domain)];
            tally.trusted.push(character.to_string());
            tally.evidence.push(Evidence::new(
                EvidenceKind::TrustedCharacter,
                format!("{} trusts you ({}/10)", character, trust),
                at,
            ));
        }
    }

    for arc in &snapshot.completed_arcs {
        for domain in CareerDomain::ALL {
            if arc_references(arc, domain) {
                let tally = &mut tallies[slot(domain)];
                tally.arcs += 1;
                tally
                    .evidence
                    .push(Evidence::new(EvidenceKind::CompletedArc, format!("Completed {}", arc), at));
            }
        }
    }

    for (skill, level) in &snapshot.skills {
        match domain_for_skill(skill) {
            Some(domain) => {
                let tally = &mut tallies[slot(domain)];
                tally.skill_levels = tally.skill_levels.saturating_add(*level);
                tally.evidence.push(Evidence::new(
                    EvidenceKind::DemonstratedSkill,
                    format!("Demonstrated {} (level {})", skill, level),
                    at,
                ));
            }
            None => log::trace!("skill {} matches no domain", skill),
        }
    }

    let domains: Vec<DomainExpertise> = CareerDomain::ALL
        .iter()
        .zip(tallies)
        .map(|(&domain, tally)| {
            let characters = u32::try_from(tally.trusted.len()).unwrap_or(u32::MAX);
            let points = characters
                .saturating_mul(config.character_weight)
                .saturating_add(tally.arcs.saturating_mul(config.arc_weight))
                .saturating_add(tally.skill_levels.saturating_mul(config.skill_level_weight));
            DomainExpertise {
                domain,
                points,
                tier: tier_for_points(TierCategory::Expertise, points as f64),
                progress: tier_progress(TierCategory::Expertise, points as f64),
                trusted_characters: tally.trusted,
                arcs: tally.arcs,
                skill_levels: tally.skill_levels,
                evidence: tally.evidence,
            }
        })
        .collect();

    // Strict `>` keeps the earlier domain on ties.
    let mut primary: Option<&DomainExpertise> = None;
    for d in domains.iter().filter(|d| d.points > 0) {
        if primary.map_or(true, |p| d.points > p.points) {
            primary = Some(d);
        }
    }

    let champion_level = crate::tiers::max_level(TierCategory::Expertise);
    CareerExpertise {
        primary: primary.map(|d| d.domain),
        champion_domains: domains
            .iter()
            .filter(|d| d.tier.level >= champion_level)
            .map(|d| d.domain)
            .collect(),
        breadth: Breadth::from_active_domains(domains.iter().filter(|d| d.points > 0).count()),
        max_level: domains.iter().map(|d| d.tier.level).max().unwrap_or(0),
        domains,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ScoreSnapshot {
        ScoreSnapshot::default()
    }

    #[test]
    fn trusted_characters_and_arcs_sum_by_weight() {
        let mut s = snapshot();
        s.trust.insert("maya".into(), 7);
        s.trust.insert("devon".into(), 9);
        s.completed_arcs = vec!["maya_robotics_arc".into(), "devon_systems_arc".into()];

        let config = ExpertiseConfig::default();
        let e = score_expertise(&s, &config);
        let tech = e.domain(CareerDomain::Technology).unwrap();
        assert_eq!(tech.points, 2 * config.character_weight + 2 * config.arc_weight);
        assert_eq!(tech.points, 14);
        assert_eq!(tech.tier.name, "Apprentice");
        assert_eq!(e.primary, Some(CareerDomain::Technology));
    }

    #[test]
    fn below_trusted_threshold_scores_nothing() {
        let mut s = snapshot();
        s.trust.insert("marcus".into(), 5);
        let e = score_expertise(&s, &ExpertiseConfig::default());
        assert_eq!(e.domain(CareerDomain::Medicine).unwrap().points, 0);
        assert_eq!(e.primary, None);
    }

    #[test]
    fn hub_characters_are_excluded() {
        let mut s = snapshot();
        s.trust.insert("samuel".into(), 10);
        let e = score_expertise(&s, &ExpertiseConfig::default());
        assert!(e.domains.iter().all(|d| d.points == 0));
        assert_eq!(domain_for_character("Samuel"), None);
        assert_eq!(domain_for_character("GRACE"), Some(CareerDomain::Medicine));
    }

    #[test]
    fn huge_skill_levels_saturate_at_champion() {
        let mut s = snapshot();
        s.skills.insert("debug_a".into(), 3_000_000_000);
        s.skills.insert("debug_b".into(), 3_000_000_000);
        let e = score_expertise(&s, &ExpertiseConfig::default());
        let tech = e.domain(CareerDomain::Technology).unwrap();
        assert_eq!(tech.skill_levels, u32::MAX);
        assert_eq!(tech.points, u32::MAX);
        assert_eq!(tech.tier.name, "Champion");
        assert_eq!(e.champion_domains, vec![CareerDomain::Technology]);
    }

    #[test]
    fn huge_weights_saturate() {
        let mut s = snapshot();
        s.trust.insert("maya".into(), 10);
        s.trust.insert("devon".into(), 10);
        let config = ExpertiseConfig {
            character_weight: u32::MAX,
            ..ExpertiseConfig::default()
        };
        let e = score_expertise(&s, &config);
        let tech = e.domain(CareerDomain::Technology).unwrap();
        assert_eq!(tech.points, u32::MAX);
        assert_eq!(tech.tier.name, "Champion");
    }

    #[test]
    fn arc_counts_once_per_domain() {
        let mut s = snapshot();
        // Names both arts characters and one civic character.
        s.completed_arcs = vec!["tess_and_lira_meet_elena".into()];
        let e = score_expertise(&s, &ExpertiseConfig::default());
        assert_eq!(e.domain(CareerDomain::Arts).unwrap().arcs, 1);
        assert_eq!(e.domain(CareerDomain::Civic).unwrap().arcs, 1);
        assert_eq!(e.domain(CareerDomain::Arts).unwrap().points, 4);
    }

    #[test]
    fn skill_matching_is_first_domain_wins() {
        // "data" (technology) and "care" (medicine): technology is first.
        assert_eq!(domain_for_skill("Patient_Data_Care"), Some(CareerDomain::Technology));
        assert_eq!(domain_for_skill("field_triage"), Some(CareerDomain::Medicine));
        assert_eq!(domain_for_skill("community_teaching"), Some(CareerDomain::Civic));

        let mut s = snapshot();
        s.skills.insert("patient_data_care".into(), 3);
        let e = score_expertise(&s, &ExpertiseConfig::default());
        assert_eq!(e.domain(CareerDomain::Technology).unwrap().points, 3);
        assert_eq!(e.domain(CareerDomain::Medicine).unwrap().points, 0);
    }

    #[test]
    fn unmatched_skills_are_ignored() {
        let mut s = snapshot();
        s.skills.insert("whistling".into(), 9);
        let e = score_expertise(&s, &ExpertiseConfig::default());
        assert!(e.domains.iter().all(|d| d.points == 0));
        assert_eq!(e.breadth, Breadth::Narrow);
    }

    #[test]
    fn primary_ties_go_to_enumeration_order() {
        let mut s = snapshot();
        s.skills.insert("debugging".into(), 4);
        s.skills.insert("sketching".into(), 4);
        let e = score_expertise(&s, &ExpertiseConfig::default());
        assert_eq!(e.primary, Some(CareerDomain::Technology));
        assert_eq!(e.breadth, Breadth::Moderate);
    }

    #[test]
    fn breadth_counts_nonzero_domains() {
        assert_eq!(Breadth::from_active_domains(0), Breadth::Narrow);
        assert_eq!(Breadth::from_active_domains(1), Breadth::Narrow);
        assert_eq!(Breadth::from_active_domains(3), Breadth::Moderate);
        assert_eq!(Breadth::from_active_domains(4), Breadth::Broad);
    }

    #[test]
    fn champion_domains_reported() {
        let mut s = snapshot();
        s.skills.insert("market_research".into(), 40);
        let e = score_expertise(&s, &ExpertiseConfig::default());
        assert_eq!(e.champion_domains, vec![CareerDomain::Enterprise]);
        assert_eq!(e.max_level, 5);
        assert_eq!(e.domains_at_level(3), 1);
    }
}
