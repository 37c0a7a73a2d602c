//! Station standing: the public "billboard" view of a player.
//!
//! Raw activity counters are weighted into four merit sub-totals:
//!
//! - **patterns**: total pattern points
//! - **relationships**: characters met plus a trust-weighted bonus
//! - **discoveries**: scenes visited plus a bonus per completed arc
//! - **contributions**: skills demonstrated plus achievements
//!
//! The merit total is graded through [`TierCategory::Standing`]. A
//! highlights list surfaces the non-trivial metrics with a trend against
//! the previous snapshot, when one is supplied. Sessions played appear
//! only as a highlight and earn no merit.

use serde::{Deserialize, Serialize};

use crate::snapshot::ScoreSnapshot;
use crate::tiers::{tier_for_points, tier_progress, Tier, TierCategory, TierProgress};

/// Per-unit merit weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeritWeights {
    pub per_pattern_point: f64,
    pub per_character_met: f64,
    pub per_trust_point: f64,
    pub per_scene: f64,
    pub per_arc: f64,
    pub per_skill: f64,
    pub per_achievement: f64,
    /// Average trust below which the trust highlight is hidden.
    pub min_trust_highlight: f64,
}

impl Default for MeritWeights {
    fn default() -> Self {
        Self {
            per_pattern_point: 1.0,
            per_character_met: 5.0,
            per_trust_point: 1.5,
            per_scene: 2.0,
            per_arc: 15.0,
            per_skill: 4.0,
            per_achievement: 10.0,
            min_trust_highlight: 3.0,
        }
    }
}

/// The raw counters standing is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StandingCounters {
    pub pattern_points: i64,
    pub characters_met: u32,
    pub total_trust: i64,
    pub average_trust: f64,
    pub scenes_visited: u32,
    pub arcs_completed: u32,
    pub skills_demonstrated: u32,
    pub achievements: u32,
    pub sessions_played: u32,
}

impl StandingCounters {
    pub fn from_snapshot(snapshot: &ScoreSnapshot) -> Self {
        Self {
            pattern_points: snapshot.pattern_total(),
            characters_met: snapshot.characters_met,
            total_trust: snapshot.total_trust(),
            average_trust: snapshot.average_trust(),
            scenes_visited: snapshot.scenes_visited,
            arcs_completed: snapshot.arcs_completed(),
            skills_demonstrated: snapshot.skill_count() as u32,
            achievements: snapshot.achievements,
            sessions_played: snapshot.sessions_played,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeritBreakdown {
    pub patterns: f64,
    pub relationships: f64,
    pub discoveries: f64,
    pub contributions: f64,
    pub total: f64,
}

pub fn merit_breakdown(counters: &StandingCounters, weights: &MeritWeights) -> MeritBreakdown {
    let patterns = counters.pattern_points.max(0) as f64 * weights.per_pattern_point;
    let relationships = counters.characters_met as f64 * weights.per_character_met
        + counters.total_trust.max(0) as f64 * weights.per_trust_point;
    let discoveries =
        counters.scenes_visited as f64 * weights.per_scene + counters.arcs_completed as f64 * weights.per_arc;
    let contributions = counters.skills_demonstrated as f64 * weights.per_skill
        + counters.achievements as f64 * weights.per_achievement;
    MeritBreakdown {
        patterns,
        relationships,
        discoveries,
        contributions,
        total: patterns + relationships + discoveries + contributions,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    fn between(previous: Option<f64>, current: f64) -> Self {
        match previous {
            Some(p) if current > p => Trend::Up,
            Some(p) if current < p => Trend::Down,
            _ => Trend::Stable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightMetric {
    PatternPoints,
    CharactersMet,
    AverageTrust,
    ScenesVisited,
    ArcsCompleted,
    SkillsDemonstrated,
    SessionsPlayed,
}

impl HighlightMetric {
    pub const ALL: [HighlightMetric; 7] = [
        HighlightMetric::PatternPoints,
        HighlightMetric::CharactersMet,
        HighlightMetric::AverageTrust,
        HighlightMetric::ScenesVisited,
        HighlightMetric::ArcsCompleted,
        HighlightMetric::SkillsDemonstrated,
        HighlightMetric::SessionsPlayed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HighlightMetric::PatternPoints => "Pattern Points",
            HighlightMetric::CharactersMet => "Characters Met",
            HighlightMetric::AverageTrust => "Average Trust",
            HighlightMetric::ScenesVisited => "Scenes Visited",
            HighlightMetric::ArcsCompleted => "Arcs Completed",
            HighlightMetric::SkillsDemonstrated => "Skills Demonstrated",
            HighlightMetric::SessionsPlayed => "Sessions Played",
        }
    }

    fn read(self, c: &StandingCounters) -> f64 {
        match self {
            HighlightMetric::PatternPoints => c.pattern_points as f64,
            HighlightMetric::CharactersMet => c.characters_met as f64,
            HighlightMetric::AverageTrust => c.average_trust,
            HighlightMetric::ScenesVisited => c.scenes_visited as f64,
            HighlightMetric::ArcsCompleted => c.arcs_completed as f64,
            HighlightMetric::SkillsDemonstrated => c.skills_demonstrated as f64,
            HighlightMetric::SessionsPlayed => c.sessions_played as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub metric: HighlightMetric,
    pub label: &'static str,
    pub value: f64,
    pub trend: Trend,
    pub display: String,
}

/// Labeled metrics worth showing right now, with trends.
pub fn highlights(
    current: &StandingCounters,
    previous: Option<&StandingCounters>,
    weights: &MeritWeights,
) -> Vec<Highlight> {
    HighlightMetric::ALL
        .iter()
        .filter_map(|&metric| {
            let value = metric.read(current);
            let shown = match metric {
                HighlightMetric::AverageTrust => value >= weights.min_trust_highlight,
                _ => value > 0.0,
            };
            if !shown {
                return None;
            }
            let display = match metric {
                HighlightMetric::AverageTrust => format!("{:.1}/10", value),
                _ => format!("{}", value as i64),
            };
            Some(Highlight {
                metric,
                label: metric.label(),
                value,
                trend: Trend::between(previous.map(|p| metric.read(p)), value),
                display,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStanding {
    pub merit: MeritBreakdown,
    pub tier: &'static Tier,
    pub progress: TierProgress,
    pub highlights: Vec<Highlight>,
}

impl StationStanding {
    pub fn level(&self) -> u8 {
        self.tier.level
    }
}

pub fn score_standing(
    current: &StandingCounters,
    previous: Option<&StandingCounters>,
    weights: &MeritWeights,
) -> StationStanding {
    let merit = merit_breakdown(current, weights);
    StationStanding {
        tier: tier_for_points(TierCategory::Standing, merit.total),
        progress: tier_progress(TierCategory::Standing, merit.total),
        highlights: highlights(current, previous, weights),
        merit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters() -> StandingCounters {
        StandingCounters {
            pattern_points: 30,
            characters_met: 4,
            total_trust: 20,
            average_trust: 5.0,
            scenes_visited: 10,
            arcs_completed: 1,
            skills_demonstrated: 3,
            achievements: 2,
            sessions_played: 5,
        }
    }

    #[test]
    fn merit_sub_totals() {
        let m = merit_breakdown(&counters(), &MeritWeights::default());
        assert_eq!(m.patterns, 30.0);
        assert_eq!(m.relationships, 4.0 * 5.0 + 20.0 * 1.5);
        assert_eq!(m.discoveries, 10.0 * 2.0 + 15.0);
        assert_eq!(m.contributions, 3.0 * 4.0 + 2.0 * 10.0);
        assert_eq!(m.total, 30.0 + 50.0 + 35.0 + 32.0);
    }

    #[test]
    fn standing_tier_from_merit() {
        let s = score_standing(&counters(), None, &MeritWeights::default());
        // 147 merit
        assert_eq!(s.tier.name, "Regular");
        assert_eq!(s.level(), 1);

        let zero = score_standing(&StandingCounters::default(), None, &MeritWeights::default());
        assert_eq!(zero.level(), 0);
        assert!(zero.highlights.is_empty());
    }

    #[test]
    fn highlights_skip_zero_metrics_and_low_trust() {
        let mut c = counters();
        c.scenes_visited = 0;
        c.average_trust = 2.5;
        let h = highlights(&c, None, &MeritWeights::default());
        assert!(h.iter().all(|x| x.metric != HighlightMetric::ScenesVisited));
        assert!(h.iter().all(|x| x.metric != HighlightMetric::AverageTrust));
        assert!(h.iter().all(|x| x.trend == Trend::Stable));
    }

    #[test]
    fn sessions_highlight_without_merit() {
        let mut c = counters();
        let base = merit_breakdown(&c, &MeritWeights::default()).total;
        c.sessions_played = 500;
        assert_eq!(merit_breakdown(&c, &MeritWeights::default()).total, base);

        let before = counters();
        let h = highlights(&c, Some(&before), &MeritWeights::default());
        let sessions = h.iter().find(|x| x.metric == HighlightMetric::SessionsPlayed).unwrap();
        assert_eq!(sessions.display, "500");
        assert_eq!(sessions.trend, Trend::Up);

        c.sessions_played = 0;
        let h = highlights(&c, None, &MeritWeights::default());
        assert!(h.iter().all(|x| x.metric != HighlightMetric::SessionsPlayed));
    }

    #[test]
    fn highlight_trends_against_previous() {
        let before = counters();
        let mut after = counters();
        after.characters_met = 6;
        after.average_trust = 4.0;
        let h = highlights(&after, Some(&before), &MeritWeights::default());
        let trend = |m| h.iter().find(|x| x.metric == m).map(|x| x.trend);
        assert_eq!(trend(HighlightMetric::CharactersMet), Some(Trend::Up));
        assert_eq!(trend(HighlightMetric::AverageTrust), Some(Trend::Down));
        assert_eq!(trend(HighlightMetric::PatternPoints), Some(Trend::Stable));
        assert_eq!(
            h.iter().find(|x| x.metric == HighlightMetric::AverageTrust).unwrap().display,
            "4.0/10"
        );
    }
}
