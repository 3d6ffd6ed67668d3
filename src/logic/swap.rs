//! Manual reassignment: exchange two participants between pending matches of one
//! round (Swiss) or one bracket depth (elimination).

use crate::logic::bracket::BracketIndex;
use crate::models::{
    Match, MatchId, ParticipantId, RoundId, Side, Tournament, TournamentFormat, TournamentState,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a swap was refused. Nothing is modified when one of these is returned.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapError {
    /// Tournament is not running.
    NotRunning,
    /// Format has no round or depth grouping.
    UnsupportedFormat,
    MatchNotFound,
    /// Target match already has a result or score record.
    MatchAlreadyPlayed,
    /// Slot is neither `a` nor `b`.
    InvalidSlot,
    ParticipantNotFound,
    /// Participant is not seated in another pending match of the same group.
    NotInSiblingMatch,
    /// The exchange would seat one participant in both slots of a match.
    WouldDuplicate,
}

impl SwapError {
    /// Stable machine-readable kind.
    pub fn kind(self) -> &'static str {
        match self {
            SwapError::NotRunning => "not_running",
            SwapError::UnsupportedFormat => "unsupported_format",
            SwapError::MatchNotFound => "match_not_found",
            SwapError::MatchAlreadyPlayed => "match_already_played",
            SwapError::InvalidSlot => "invalid_slot",
            SwapError::ParticipantNotFound => "participant_not_found",
            SwapError::NotInSiblingMatch => "not_in_sibling_match",
            SwapError::WouldDuplicate => "would_duplicate",
        }
    }
}

impl fmt::Display for SwapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapError::NotRunning => write!(f, "Tournament is not running"),
            SwapError::UnsupportedFormat => {
                write!(f, "Tournament format has no rounds to swap within")
            }
            SwapError::MatchNotFound => write!(f, "Match not found"),
            SwapError::MatchAlreadyPlayed => write!(f, "Match has already been played"),
            SwapError::InvalidSlot => write!(f, "Slot must be \"a\" or \"b\""),
            SwapError::ParticipantNotFound => write!(f, "Participant not found"),
            SwapError::NotInSiblingMatch => {
                write!(f, "Participant is not in another pending match of the same round")
            }
            SwapError::WouldDuplicate => write!(f, "Swap would put a participant on both sides"),
        }
    }
}

impl std::error::Error for SwapError {}

/// What a successful swap did.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapOutcome {
    /// Participants exchanged between the two matches.
    Swapped { other_match: MatchId },
    /// Participant already sat in the requested slot.
    Unchanged,
}

/// Swap request as received from a caller; the slot is free text until validated.
#[derive(Clone, Debug, Deserialize)]
pub struct SwapRequest {
    pub match_id: MatchId,
    pub slot: String,
    pub participant_id: ParticipantId,
}

impl SwapRequest {
    pub fn apply(&self, tournament: &mut Tournament) -> Result<SwapOutcome, SwapError> {
        let slot: Side = self.slot.parse().map_err(|_| SwapError::InvalidSlot)?;
        swap_pairing(tournament, self.match_id, slot, self.participant_id)
    }
}

/// Grouping key: round id for Swiss, tree depth for elimination.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Group {
    Round(RoundId),
    Depth(usize),
}

fn group_of(format: TournamentFormat, index: &BracketIndex<'_>, m: &Match) -> Option<Group> {
    match format {
        TournamentFormat::Elimination => index.depth(m.id).map(Group::Depth),
        _ => m.round_id.map(Group::Round),
    }
}

/// Seat `participant` in `slot` of `match_id`, moving the current occupant into the
/// participant's former slot in the other match.
pub fn swap_pairing(
    tournament: &mut Tournament,
    match_id: MatchId,
    slot: Side,
    participant: ParticipantId,
) -> Result<SwapOutcome, SwapError> {
    if tournament.state != TournamentState::Running {
        return Err(SwapError::NotRunning);
    }
    let format = tournament.config.format;
    if format == TournamentFormat::Open {
        return Err(SwapError::UnsupportedFormat);
    }

    let target = tournament
        .get_match(match_id)
        .ok_or(SwapError::MatchNotFound)?;
    if !target.is_pending() {
        return Err(SwapError::MatchAlreadyPlayed);
    }
    if tournament.registration(participant).is_none() {
        return Err(SwapError::ParticipantNotFound);
    }
    if target.slot(slot) == Some(participant) {
        return Ok(SwapOutcome::Unchanged);
    }

    let index = BracketIndex::new(&tournament.matches);
    let group = group_of(format, &index, target).ok_or(SwapError::NotInSiblingMatch)?;
    let (other_id, other_side) = tournament
        .matches
        .iter()
        .filter(|m| m.id != match_id && m.is_pending())
        .filter(|m| group_of(format, &index, m) == Some(group))
        .find_map(|m| m.side_of(participant).map(|side| (m.id, side)))
        .ok_or(SwapError::NotInSiblingMatch)?;

    let occupant = target.slot(slot);
    let target_keeps = target.slot(slot.other());
    let other_keeps = tournament
        .get_match(other_id)
        .and_then(|m| m.slot(other_side.other()));
    if target_keeps == Some(participant) || (occupant.is_some() && other_keeps == occupant) {
        return Err(SwapError::WouldDuplicate);
    }

    // Validation is complete; both writes below always happen together.
    if let Some(m) = tournament.get_match_mut(match_id) {
        *m.slot_mut(slot) = Some(participant);
    }
    if let Some(m) = tournament.get_match_mut(other_id) {
        *m.slot_mut(other_side) = occupant;
    }
    log::info!(
        "Tournament {}: swapped {} into match {} slot {:?}; {:?} moved to match {}",
        tournament.id,
        participant,
        match_id,
        slot,
        occupant,
        other_id
    );
    Ok(SwapOutcome::Swapped {
        other_match: other_id,
    })
}
