//! Pure progression-ranking logic for StationRank.
//!
//! This crate turns a snapshot of a player's play telemetry into a ranked
//! view of their progress. It owns no state and performs no I/O: functions
//! take plain data and return new values, so every result is unit-testable
//! and recomputing on each UI update is safe.
//!
//! The entry point is [`dashboard::compute_dashboard`]:
//!
//! ```
//! use stationrank_logic::config::EngineConfig;
//! use stationrank_logic::dashboard::compute_dashboard;
//! use stationrank_logic::snapshot::ScoreSnapshot;
//!
//! let d = compute_dashboard(&ScoreSnapshot::default(), None, &EngineConfig::default());
//! assert_eq!(d.overall_progression, 0.0);
//! assert!(d.pending_ceremony.is_none());
//! ```
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`ceremony`] | Narrative recognition moments, triggers, cooldown ledger |
//! | [`challenge`] | Blended D–S challenge grade and content readiness |
//! | [`cohort`] | Month-of-signup cohorts and locally estimated percentiles |
//! | [`config`] | Engine tunables, JSON loading and validation |
//! | [`dashboard`] | Orchestrator and overall progression scalar |
//! | [`elite`] | Five compound designations and the elite tier |
//! | [`evidence`] | Human-readable records backing a score |
//! | [`expertise`] | Career-domain points from trust, arcs, and skills |
//! | [`flavor`] | Cosmetic taglines behind an isolated random source |
//! | [`patterns`] | Pattern-trait mastery, bands, dominance, promotions |
//! | [`resonance`] | Cross-subsystem multipliers and one-shot events |
//! | [`snapshot`] | The read-only telemetry input |
//! | [`standing`] | Public merit, billboard tier, highlights |
//! | [`stars`] | Six star dimensions and the constellation |
//! | [`tiers`] | Immutable tier registry and threshold lookups |

pub mod ceremony;
pub mod challenge;
pub mod cohort;
pub mod config;
pub mod dashboard;
pub mod elite;
pub mod evidence;
pub mod expertise;
pub mod flavor;
pub mod patterns;
pub mod resonance;
pub mod snapshot;
pub mod standing;
pub mod stars;
pub mod tiers;
