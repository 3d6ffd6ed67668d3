//! Standings: per-participant aggregates from match history and the ranked table.

use crate::logic::registry::Ranking;
use crate::models::{Match, ParticipantId, Side, Tournament};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Points for a win or a bye.
pub const WIN_POINTS: f64 = 1.0;
/// Points for each side of a draw.
pub const DRAW_POINTS: f64 = 0.5;

/// Running totals for one participant.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Aggregate {
    pub points: f64,
    pub score_sum: f64,
    pub secondary_score_sum: f64,
    /// Sum of the current points of every opponent faced (repeats count twice).
    pub sos: f64,
    /// Opponents of finalized two-sided matches, in match order.
    pub opponents: Vec<ParticipantId>,
    pub games_played: u32,
    pub byes: u32,
}

/// Aggregates for every registered participant. Ids that are not registered are
/// never inserted, so a lookup miss means "not in this tournament", not "zero".
#[derive(Clone, Debug, Default)]
pub struct Aggregates {
    by_participant: BTreeMap<ParticipantId, Aggregate>,
}

impl Aggregates {
    fn seeded(ids: impl IntoIterator<Item = ParticipantId>) -> Self {
        Self {
            by_participant: ids
                .into_iter()
                .map(|id| (id, Aggregate::default()))
                .collect(),
        }
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Aggregate> {
        self.by_participant.get(&id)
    }

    pub fn points(&self, id: ParticipantId) -> f64 {
        self.get(id).map_or(0.0, |a| a.points)
    }

    pub fn has_had_bye(&self, id: ParticipantId) -> bool {
        self.get(id).is_some_and(|a| a.byes > 0)
    }

    pub fn len(&self) -> usize {
        self.by_participant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_participant.is_empty()
    }

    fn contains_all(&self, m: &Match) -> bool {
        [m.a, m.b]
            .into_iter()
            .flatten()
            .all(|id| self.by_participant.contains_key(&id))
    }

    fn entry(&mut self, id: ParticipantId) -> Option<&mut Aggregate> {
        self.by_participant.get_mut(&id)
    }
}

/// One row of the standings table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StandingsRow {
    /// 1-based position.
    pub rank: usize,
    pub participant_id: ParticipantId,
    pub name: String,
    pub points: f64,
    pub score_sum: f64,
    pub secondary_score_sum: f64,
    pub sos: f64,
    pub primary: f64,
    pub tiebreak1: f64,
    pub tiebreak2: f64,
    pub games_played: u32,
    pub byes: u32,
}

/// Walk every match of the tournament and total points, scores, opponents and byes,
/// then derive strength of schedule from the finished points map.
pub fn aggregate(tournament: &Tournament) -> Aggregates {
    let mut aggregates = Aggregates::seeded(
        tournament
            .registrations
            .iter()
            .map(|r| r.participant_id),
    );
    let bye_score = tournament.config.bye_score;

    for m in &tournament.matches {
        if !aggregates.contains_all(m) {
            log::warn!(
                "Match {} references a participant not registered in tournament {}; skipped",
                m.id,
                tournament.id
            );
            continue;
        }

        if let Some(recipient) = m.bye_recipient() {
            if let Some(agg) = aggregates.entry(recipient) {
                agg.points += WIN_POINTS;
                agg.score_sum += bye_score;
                agg.byes += 1;
            }
            continue;
        }

        let (Some(a), Some(b)) = (m.a, m.b) else {
            continue;
        };
        if !m.result.is_final() {
            continue;
        }

        let (points_a, points_b) = match m.result.winner() {
            Some(Side::A) => (WIN_POINTS, 0.0),
            Some(Side::B) => (0.0, WIN_POINTS),
            None => (DRAW_POINTS, DRAW_POINTS),
        };
        let score_a = m.game.as_ref().and_then(|g| g.a).unwrap_or_default();
        let score_b = m.game.as_ref().and_then(|g| g.b).unwrap_or_default();

        for (me, opponent, points, score) in [(a, b, points_a, score_a), (b, a, points_b, score_b)]
        {
            if let Some(agg) = aggregates.entry(me) {
                agg.points += points;
                agg.score_sum += score.primary;
                agg.secondary_score_sum += score.secondary;
                agg.opponents.push(opponent);
                agg.games_played += 1;
            }
        }
    }

    // Opponents' current totals, not their totals at the time of the match.
    let points: BTreeMap<ParticipantId, f64> = aggregates
        .by_participant
        .iter()
        .map(|(id, agg)| (*id, agg.points))
        .collect();
    for agg in aggregates.by_participant.values_mut() {
        agg.sos = agg
            .opponents
            .iter()
            .map(|o| points.get(o).copied().unwrap_or(0.0))
            .sum();
    }

    aggregates
}

/// Descending by ranking values, then ascending by name, then by id.
fn compare(
    ranking: &Ranking,
    aggregates: &Aggregates,
    names: &BTreeMap<ParticipantId, &str>,
    x: ParticipantId,
    y: ParticipantId,
) -> Ordering {
    let values = |id: ParticipantId| {
        aggregates
            .get(id)
            .map(|agg| ranking.values(agg))
            .unwrap_or([0.0; 3])
    };
    let (vx, vy) = (values(x), values(y));
    vy.iter()
        .zip(vx.iter())
        .map(|(b, a)| b.total_cmp(a))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
        .then_with(|| names.get(&x).cmp(&names.get(&y)))
        .then_with(|| x.cmp(&y))
}

/// Order `ids` the way the standings table orders them.
pub fn rank_participants(
    tournament: &Tournament,
    aggregates: &Aggregates,
    ranking: &Ranking,
    ids: &[ParticipantId],
) -> Vec<ParticipantId> {
    let names: BTreeMap<ParticipantId, &str> = tournament
        .registrations
        .iter()
        .map(|r| (r.participant_id, r.name.as_str()))
        .collect();
    let mut ordered = ids.to_vec();
    ordered.sort_by(|x, y| compare(ranking, aggregates, &names, *x, *y));
    ordered
}

/// Full standings table, one row per registration, best first.
/// Strategy keys that are not registered fall back to defaults.
pub fn compute(tournament: &Tournament) -> Vec<StandingsRow> {
    if tournament.registrations.is_empty() {
        return Vec::new();
    }
    let ranking = Ranking::from_config(&tournament.config);
    let aggregates = aggregate(tournament);
    let ids: Vec<ParticipantId> = tournament
        .registrations
        .iter()
        .map(|r| r.participant_id)
        .collect();

    rank_participants(tournament, &aggregates, &ranking, &ids)
        .into_iter()
        .enumerate()
        .filter_map(|(idx, id)| {
            let registration = tournament.registration(id)?;
            let agg = aggregates.get(id)?;
            let [primary, tiebreak1, tiebreak2] = ranking.values(agg);
            Some(StandingsRow {
                rank: idx + 1,
                participant_id: id,
                name: registration.name.clone(),
                points: agg.points,
                score_sum: agg.score_sum,
                secondary_score_sum: agg.secondary_score_sum,
                sos: agg.sos,
                primary,
                tiebreak1,
                tiebreak2,
                games_played: agg.games_played,
                byes: agg.byes,
            })
        })
        .collect()
}
