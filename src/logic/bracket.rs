//! Single-elimination bracket: tree build, depth grouping, and winner propagation.
//!
//! The tree is stored flat in `Tournament::matches`; each non-root match points at its
//! parent and names the parent slot its winner fills. Depth counts parent hops to the
//! root (root = 0) and stands in for the round number.

use crate::logic::registry::Ranking;
use crate::logic::standings;
use crate::models::{
    Match, MatchId, MatchResult, ParticipantId, Side, Tournament, TournamentError,
    TournamentFormat,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Lookup of bracket matches by id for upward walks.
pub struct BracketIndex<'a> {
    by_id: HashMap<MatchId, &'a Match>,
}

impl<'a> BracketIndex<'a> {
    pub fn new(matches: &'a [Match]) -> Self {
        Self {
            by_id: matches.iter().map(|m| (m.id, m)).collect(),
        }
    }

    /// Parent hops from `id` to its root. `None` if the match is unknown, a parent
    /// link dangles, or the walk exceeds the number of matches (a cycle).
    pub fn depth(&self, id: MatchId) -> Option<usize> {
        let mut current = self.by_id.get(&id)?;
        let mut depth = 0;
        while let Some(parent_id) = current.parent_id {
            if depth >= self.by_id.len() {
                log::warn!("Cycle in bracket parent links at match {}", id);
                return None;
            }
            current = self.by_id.get(&parent_id)?;
            depth += 1;
        }
        Some(depth)
    }
}

/// Depth of one match within the tournament's bracket.
pub fn depth(tournament: &Tournament, match_id: MatchId) -> Option<usize> {
    BracketIndex::new(&tournament.matches).depth(match_id)
}

/// Matches of one synthetic elimination round.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BracketRound {
    /// 1 for the first round played (deepest level).
    pub number: usize,
    pub depth: usize,
    pub matches: Vec<Match>,
}

/// Bracket matches grouped by depth, first round first and the final last.
pub fn bracket_rounds(tournament: &Tournament) -> Vec<BracketRound> {
    let index = BracketIndex::new(&tournament.matches);
    let mut by_depth: BTreeMap<usize, Vec<Match>> = BTreeMap::new();
    for m in &tournament.matches {
        if let Some(d) = index.depth(m.id) {
            by_depth.entry(d).or_default().push(m.clone());
        }
    }
    by_depth
        .into_iter()
        .rev()
        .enumerate()
        .map(|(i, (depth, matches))| BracketRound {
            number: i + 1,
            depth,
            matches,
        })
        .collect()
}

/// Standard seed order for a bracket of `size` slots (a power of two):
/// 1 meets `size`, and the top two seeds can only meet in the final.
fn seed_order(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    while order.len() < size {
        let next_len = order.len() * 2;
        order = order
            .iter()
            .flat_map(|&seed| [seed, next_len + 1 - seed])
            .collect();
    }
    order
}

/// Build the elimination tree from the eligible participants in standings order.
///
/// The bracket is padded to the next power of two; padded slots become byes whose
/// forced wins are propagated immediately.
pub fn build_bracket(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.config.format != TournamentFormat::Elimination {
        return Err(TournamentError::UnsupportedFormat);
    }
    if !tournament.matches.is_empty() {
        return Err(TournamentError::BracketAlreadyBuilt);
    }
    let eligible = tournament.eligible_participants();
    if eligible.len() < 2 {
        return Err(TournamentError::NotEnoughParticipants { required: 2 });
    }

    let ranking = Ranking::from_config(&tournament.config);
    let aggregates = standings::aggregate(tournament);
    let seeded = standings::rank_participants(tournament, &aggregates, &ranking, &eligible);
    let size = seeded.len().next_power_of_two();
    let levels = size.trailing_zeros() as usize;

    let root = Match::bracket_node(None);
    let mut level = vec![root.id];
    let mut matches = vec![root];
    for _ in 1..levels {
        let mut next = Vec::with_capacity(level.len() * 2);
        for &parent in &level {
            for side in [Side::A, Side::B] {
                let child = Match::bracket_node(Some((parent, side)));
                next.push(child.id);
                matches.push(child);
            }
        }
        level = next;
    }

    let participant = |seed: usize| -> Option<ParticipantId> { seeded.get(seed - 1).copied() };
    let order = seed_order(size);
    let mut byes = Vec::new();
    for (leaf_id, seeds) in level.iter().zip(order.chunks_exact(2)) {
        if let Some(leaf) = matches.iter_mut().find(|m| m.id == *leaf_id) {
            leaf.a = participant(seeds[0]);
            leaf.b = participant(seeds[1]);
            if leaf.b.is_none() {
                leaf.result = MatchResult::AWin;
                byes.push(leaf.id);
            }
        }
    }

    log::info!(
        "Built bracket for tournament {}: {} participants, {} slots, {} byes",
        tournament.id,
        seeded.len(),
        size,
        byes.len()
    );
    tournament.matches = matches;
    for bye in byes {
        propagate_winner(tournament, bye)?;
    }
    Ok(())
}

/// Move the winner of `match_id` into its parent's slot.
///
/// Returns `Ok(true)` if a winner was written. Nothing is written when the match has no
/// parent, when the result names no winner (pending or draw), or when the parent has
/// already been played; edits to a leaf never overwrite a completed downstream match.
pub fn propagate_winner(
    tournament: &mut Tournament,
    match_id: MatchId,
) -> Result<bool, TournamentError> {
    let m = tournament
        .get_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let (Some(parent_id), Some(slot)) = (m.parent_id, m.child_slot) else {
        return Ok(false);
    };
    let Some(winner) = m.winner() else {
        return Ok(false);
    };

    let parent = tournament
        .get_match_mut(parent_id)
        .ok_or(TournamentError::MatchNotFound(parent_id))?;
    if parent.game.is_some() || parent.result.is_final() {
        log::debug!(
            "Parent {} of match {} already played; winner not propagated",
            parent_id,
            match_id
        );
        return Ok(false);
    }
    *parent.slot_mut(slot) = Some(winner);
    log::debug!("Advanced {} into match {} slot {:?}", winner, parent_id, slot);
    Ok(true)
}
