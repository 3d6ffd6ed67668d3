//! Pairing algorithms: assign opponents for the next Swiss/open round.
//!
//! Both strategies share eligibility, bye selection and the duplicate-resolution pass;
//! they differ in how the initial pairs are formed.
//!
//! 1. Eligible = checked-in registrants, or all registrants if nobody checked in.
//! 2. Odd count: one bye recipient is removed before pairing.
//! 3. Strategy-specific pairing of the rest.
//! 4. Bounded swap pass to turn repeat matchups into novel ones where possible.

use crate::logic::registry::Ranking;
use crate::logic::standings::{self, Aggregates};
use crate::models::{ParticipantId, Tournament};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashSet;

/// Upper bound on swap attempts in the duplicate-resolution pass.
pub const MAX_DUPLICATE_RESOLUTION_ITERATIONS: usize = 50;

/// Pairing algorithm selectable per tournament.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStrategy {
    /// Group by points, shuffle within each group, float odd players down.
    ByPointsRandomWithinGroup,
    /// Order by standings and pair neighbours (1-2, 3-4, ...).
    ByStandingsNeighbors,
}

/// Pairs for one round plus the optional bye.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Pairing {
    pub pairs: Vec<(ParticipantId, ParticipantId)>,
    pub bye: Option<ParticipantId>,
}

impl Pairing {
    /// Every participant placed by this pairing, bye included.
    pub fn participants(&self) -> Vec<ParticipantId> {
        self.pairs
            .iter()
            .flat_map(|&(a, b)| [a, b])
            .chain(self.bye)
            .collect()
    }
}

impl PairingStrategy {
    /// Compute the next round's pairing for `tournament`.
    pub fn pair(self, tournament: &Tournament) -> Pairing {
        let eligible = tournament.eligible_participants();
        if eligible.len() < 2 {
            return Pairing::default();
        }

        let aggregates = standings::aggregate(tournament);
        let history = History::from_tournament(tournament);
        let mut rng = StdRng::seed_from_u64(pairing_seed(tournament));

        let (mut pairs, bye) = match self {
            PairingStrategy::ByPointsRandomWithinGroup => {
                by_points_random_within_group(eligible, &aggregates, &history, &mut rng)
            }
            PairingStrategy::ByStandingsNeighbors => {
                let ranking = Ranking::from_config(&tournament.config);
                let ordered =
                    standings::rank_participants(tournament, &aggregates, &ranking, &eligible);
                by_standings_neighbors(ordered, &aggregates)
            }
        };

        resolve_duplicates(&mut pairs, &history);

        log::debug!(
            "Paired {} matches for tournament {} ({:?}), bye: {:?}",
            pairs.len(),
            tournament.id,
            self,
            bye
        );
        Pairing { pairs, bye }
    }
}

/// Seed for the round's shuffles, derived from the highest round number and the
/// tournament id. Same tournament and round count always gives the same seed.
pub fn pairing_seed(tournament: &Tournament) -> u64 {
    let id = tournament.id.as_u128();
    let id_bits = (id as u64) ^ ((id >> 64) as u64);
    id_bits.wrapping_add(u64::from(tournament.max_round_number()))
}

/// Unordered pairs of participants that already met in a two-sided match
/// (any result, pending included). Byes are not recorded.
#[derive(Clone, Debug, Default)]
pub struct History {
    played: HashSet<(ParticipantId, ParticipantId)>,
}

impl History {
    pub fn from_tournament(tournament: &Tournament) -> Self {
        let played = tournament
            .matches
            .iter()
            .filter_map(|m| match (m.a, m.b) {
                (Some(a), Some(b)) if a != b => Some(Self::key(a, b)),
                _ => None,
            })
            .collect();
        Self { played }
    }

    fn key(a: ParticipantId, b: ParticipantId) -> (ParticipantId, ParticipantId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub fn has_played(&self, a: ParticipantId, b: ParticipantId) -> bool {
        self.played.contains(&Self::key(a, b))
    }

    fn is_repeat(&self, pair: (ParticipantId, ParticipantId)) -> bool {
        self.has_played(pair.0, pair.1)
    }
}

/// Group eligible participants by points (descending). Members keep their input order.
fn point_groups(eligible: &[ParticipantId], aggregates: &Aggregates) -> Vec<Vec<ParticipantId>> {
    let mut by_points: Vec<(f64, ParticipantId)> = eligible
        .iter()
        .map(|&id| (aggregates.points(id), id))
        .collect();
    // Stable: equal points keep input order.
    by_points.sort_by(|x, y| y.0.total_cmp(&x.0));

    let mut groups: Vec<(f64, Vec<ParticipantId>)> = Vec::new();
    for (points, id) in by_points {
        match groups.last_mut() {
            Some((group_points, members)) if *group_points == points => members.push(id),
            _ => groups.push((points, vec![id])),
        }
    }
    groups.into_iter().map(|(_, members)| members).collect()
}

/// Bye from the lowest point group: a random member who never had a bye, else any
/// random member of that group. The chosen participant is removed from `groups`.
fn take_bye_from_lowest_group(
    groups: &mut Vec<Vec<ParticipantId>>,
    aggregates: &Aggregates,
    rng: &mut StdRng,
) -> Option<ParticipantId> {
    let lowest = groups.last_mut()?;
    let mut candidates = lowest.clone();
    candidates.shuffle(rng);
    let chosen = candidates
        .iter()
        .copied()
        .find(|&id| !aggregates.has_had_bye(id))
        .or_else(|| candidates.first().copied())?;
    lowest.retain(|&id| id != chosen);
    if lowest.is_empty() {
        groups.pop();
    }
    Some(chosen)
}

/// Remove and return the first member of `pool` that `head` has not played,
/// or the first member if every one is a repeat.
fn take_opponent(
    head: ParticipantId,
    pool: &mut Vec<ParticipantId>,
    history: &History,
) -> Option<ParticipantId> {
    if pool.is_empty() {
        return None;
    }
    let idx = pool
        .iter()
        .position(|&other| !history.has_played(head, other))
        .unwrap_or(0);
    Some(pool.remove(idx))
}

fn by_points_random_within_group(
    eligible: Vec<ParticipantId>,
    aggregates: &Aggregates,
    history: &History,
    rng: &mut StdRng,
) -> (Vec<(ParticipantId, ParticipantId)>, Option<ParticipantId>) {
    let mut groups = point_groups(&eligible, aggregates);

    let bye = if eligible.len() % 2 == 1 {
        take_bye_from_lowest_group(&mut groups, aggregates, rng)
    } else {
        None
    };

    for group in groups.iter_mut() {
        group.shuffle(rng);
    }

    let mut pairs = Vec::with_capacity(eligible.len() / 2);
    for gi in 0..groups.len() {
        let mut pool = std::mem::take(&mut groups[gi]);
        let mut floater = None;
        while !pool.is_empty() {
            let head = pool.remove(0);
            match take_opponent(head, &mut pool, history) {
                Some(opponent) => pairs.push((head, opponent)),
                None => floater = Some(head),
            }
        }

        let Some(floater) = floater else { continue };
        // Float down: first unplayed opponent in the next lower group, then lower still;
        // otherwise the first member of the nearest non-empty lower group.
        let lower = gi + 1..groups.len();
        let unplayed = lower.clone().find_map(|li| {
            groups[li]
                .iter()
                .position(|&other| !history.has_played(floater, other))
                .map(|pos| (li, pos))
        });
        let slot = unplayed.or_else(|| {
            lower
                .clone()
                .find(|&li| !groups[li].is_empty())
                .map(|li| (li, 0))
        });
        match slot {
            Some((li, pos)) => {
                let opponent = groups[li].remove(pos);
                log::debug!("Floating {} down to pair with {}", floater, opponent);
                pairs.push((floater, opponent));
            }
            None => log::warn!("No opponent left for floater {}", floater),
        }
    }

    (pairs, bye)
}

fn by_standings_neighbors(
    mut ordered: Vec<ParticipantId>,
    aggregates: &Aggregates,
) -> (Vec<(ParticipantId, ParticipantId)>, Option<ParticipantId>) {
    let bye = if ordered.len() % 2 == 1 {
        let idx = ordered
            .iter()
            .rposition(|&id| !aggregates.has_had_bye(id))
            .unwrap_or(ordered.len() - 1);
        Some(ordered.remove(idx))
    } else {
        None
    };

    let pairs = ordered
        .chunks_exact(2)
        .map(|chunk| (chunk[0], chunk[1]))
        .collect();
    (pairs, bye)
}

/// Pair indices ordered by distance from `idx` (nearest first, later index first on ties).
fn candidates_by_proximity(idx: usize, len: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(len.saturating_sub(1));
    for distance in 1..len {
        if idx + distance < len {
            order.push(idx + distance);
        }
        if distance <= idx {
            order.push(idx - distance);
        }
    }
    order
}

/// The four single-member exchanges between pairs (a, b) and (c, d).
fn exchanges(
    (a, b): (ParticipantId, ParticipantId),
    (c, d): (ParticipantId, ParticipantId),
) -> [((ParticipantId, ParticipantId), (ParticipantId, ParticipantId)); 4] {
    [
        ((c, b), (a, d)),
        ((d, b), (c, a)),
        ((a, c), (b, d)),
        ((a, d), (c, b)),
    ]
}

/// Swap members between pairs so that repeat matchups become novel ones. A repeat that
/// no exchange can fix is accepted and logged, and later repeats are still attempted.
/// The pass stops after a fixed number of attempts.
pub fn resolve_duplicates(pairs: &mut [(ParticipantId, ParticipantId)], history: &History) {
    let mut accepted: HashSet<usize> = HashSet::new();

    for _ in 0..MAX_DUPLICATE_RESOLUTION_ITERATIONS {
        let next =
            (0..pairs.len()).find(|i| !accepted.contains(i) && history.is_repeat(pairs[*i]));
        let Some(idx) = next else {
            return;
        };

        let swap = candidates_by_proximity(idx, pairs.len())
            .into_iter()
            .find_map(|j| {
                exchanges(pairs[idx], pairs[j])
                    .into_iter()
                    .find(|&(first, second)| {
                        !history.is_repeat(first) && !history.is_repeat(second)
                    })
                    .map(|found| (j, found))
            });

        match swap {
            Some((j, (first, second))) => {
                log::debug!(
                    "Resolved repeat {:?} by exchanging with pair {:?}",
                    pairs[idx],
                    pairs[j]
                );
                pairs[idx] = first;
                pairs[j] = second;
            }
            None => {
                log::warn!(
                    "Accepting repeat pairing {} vs {}: no exchange avoids it",
                    pairs[idx].0,
                    pairs[idx].1
                );
                accepted.insert(idx);
            }
        }
    }

    let remaining =
        (0..pairs.len()).find(|i| !accepted.contains(i) && history.is_repeat(pairs[*i]));
    if let Some(idx) = remaining {
        log::warn!(
            "Duplicate resolution stopped after {} attempts; {} vs {} remains a repeat",
            MAX_DUPLICATE_RESOLUTION_ITERATIONS,
            pairs[idx].0,
            pairs[idx].1
        );
    }
}
