//! Strategy registry: string keys to pairing algorithms and ranking functions.
//!
//! Keys come from tournament configuration and may be stale. Lookups never fail: an
//! unknown key resolves to the default of its category.

use crate::logic::pairing::PairingStrategy;
use crate::logic::standings::Aggregate;
use crate::models::TournamentConfig;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_PAIRING: &str = "by_points_random_within_group";
pub const BY_STANDINGS_NEIGHBORS: &str = "by_standings_neighbors";
pub const DEFAULT_PRIMARY: &str = "points";
pub const DEFAULT_TIEBREAK: &str = "score_sum";
pub const SECONDARY_SCORE_SUM: &str = "secondary_score_sum";
pub const STRENGTH_OF_SCHEDULE: &str = "sos";
pub const NO_TIEBREAK: &str = "none";

/// A metric used to order standings, either as primary or as tie-break.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingFunction {
    Points,
    ScoreSum,
    SecondaryScoreSum,
    Sos,
    None,
}

impl RankingFunction {
    /// Value of this metric for one participant's aggregates.
    pub fn evaluate(self, aggregate: &Aggregate) -> f64 {
        match self {
            RankingFunction::Points => aggregate.points,
            RankingFunction::ScoreSum => aggregate.score_sum,
            RankingFunction::SecondaryScoreSum => aggregate.secondary_score_sum,
            RankingFunction::Sos => aggregate.sos,
            RankingFunction::None => 0.0,
        }
    }
}

/// Registry entry: human-readable label plus the strategy itself.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StrategyEntry<T> {
    pub label: &'static str,
    pub strategy: T,
}

fn entry<T>(label: &'static str, strategy: T) -> StrategyEntry<T> {
    StrategyEntry { label, strategy }
}

/// All pairing algorithms by key.
pub fn pairing_strategies() -> BTreeMap<&'static str, StrategyEntry<PairingStrategy>> {
    BTreeMap::from([
        (
            DEFAULT_PAIRING,
            entry(
                "By points, random within point group",
                PairingStrategy::ByPointsRandomWithinGroup,
            ),
        ),
        (
            BY_STANDINGS_NEIGHBORS,
            entry(
                "By standings, neighbours paired",
                PairingStrategy::ByStandingsNeighbors,
            ),
        ),
    ])
}

/// All tie-break functions by key.
pub fn tiebreak_strategies() -> BTreeMap<&'static str, StrategyEntry<RankingFunction>> {
    BTreeMap::from([
        (DEFAULT_TIEBREAK, entry("Score sum", RankingFunction::ScoreSum)),
        (
            SECONDARY_SCORE_SUM,
            entry("Secondary score sum", RankingFunction::SecondaryScoreSum),
        ),
        (
            STRENGTH_OF_SCHEDULE,
            entry("Strength of schedule", RankingFunction::Sos),
        ),
        (NO_TIEBREAK, entry("None", RankingFunction::None)),
    ])
}

/// Tie-break functions plus raw points.
pub fn primary_strategies() -> BTreeMap<&'static str, StrategyEntry<RankingFunction>> {
    let mut strategies = tiebreak_strategies();
    strategies.insert(DEFAULT_PRIMARY, entry("Points", RankingFunction::Points));
    strategies
}

fn resolve<T: Copy + std::fmt::Debug>(
    category: &str,
    strategies: &BTreeMap<&'static str, StrategyEntry<T>>,
    key: &str,
    default: T,
) -> T {
    match strategies.get(key) {
        Some(found) => found.strategy,
        None => {
            log::warn!(
                "Unknown {} strategy {:?}, falling back to {:?}",
                category,
                key,
                default
            );
            default
        }
    }
}

/// Pairing algorithm for `key`, or the default pairing.
pub fn resolve_pairing(key: &str) -> PairingStrategy {
    resolve(
        "pairing",
        &pairing_strategies(),
        key,
        PairingStrategy::ByPointsRandomWithinGroup,
    )
}

/// Primary ranking function for `key`, or points.
pub fn resolve_primary(key: &str) -> RankingFunction {
    resolve("primary", &primary_strategies(), key, RankingFunction::Points)
}

/// Tie-break function for `key`, or `default`.
pub fn resolve_tiebreak(key: &str, default: RankingFunction) -> RankingFunction {
    resolve("tiebreak", &tiebreak_strategies(), key, default)
}

/// The resolved ranking of a tournament: primary metric then two tie-breaks.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Ranking {
    pub primary: RankingFunction,
    pub tiebreak1: RankingFunction,
    pub tiebreak2: RankingFunction,
}

impl Default for Ranking {
    fn default() -> Self {
        Self {
            primary: RankingFunction::Points,
            tiebreak1: RankingFunction::ScoreSum,
            tiebreak2: RankingFunction::None,
        }
    }
}

impl Ranking {
    /// Resolve the configured keys; unknown keys fall back per slot
    /// (tiebreak1 to score sum, tiebreak2 to none).
    pub fn from_config(config: &TournamentConfig) -> Self {
        Self {
            primary: resolve_primary(&config.primary_strategy),
            tiebreak1: resolve_tiebreak(&config.tiebreak1, RankingFunction::ScoreSum),
            tiebreak2: resolve_tiebreak(&config.tiebreak2, RankingFunction::None),
        }
    }

    /// (primary, tiebreak1, tiebreak2) for one participant.
    pub fn values(&self, aggregate: &Aggregate) -> [f64; 3] {
        [
            self.primary.evaluate(aggregate),
            self.tiebreak1.evaluate(aggregate),
            self.tiebreak2.evaluate(aggregate),
        ]
    }
}
