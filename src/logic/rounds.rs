//! Round advance (Swiss/open) and result reporting.

use crate::logic::bracket;
use crate::logic::registry;
use crate::models::{
    GameRecord, Match, MatchId, MatchResult, Round, RoundId, RoundState, Tournament,
    TournamentError, TournamentFormat, TournamentState,
};
use chrono::Utc;

/// Create the next round: close the latest one, pair with the configured strategy, and
/// add one pending match per pair plus a bye match if the pairing has one.
///
/// The latest round must be fully reported and at least two participants must be
/// eligible; otherwise nothing changes. Returns the id of the new round.
pub fn advance_round(tournament: &mut Tournament) -> Result<RoundId, TournamentError> {
    if tournament.state != TournamentState::Running {
        return Err(TournamentError::InvalidState);
    }
    if !tournament.config.format.is_round_based() {
        return Err(TournamentError::UnsupportedFormat);
    }
    let latest_id = tournament.latest_round().map(|r| r.id);
    if let Some(latest_id) = latest_id {
        if tournament
            .round_matches(latest_id)
            .any(|m| !m.result.is_final())
        {
            return Err(TournamentError::IncompleteResults);
        }
    }

    let strategy = registry::resolve_pairing(&tournament.config.pairing_strategy);
    let pairing = strategy.pair(tournament);
    if pairing.pairs.is_empty() && pairing.bye.is_none() {
        // Fewer than two eligible: no round, so the round count (and seed) stays put.
        return Err(TournamentError::NotEnoughParticipants { required: 2 });
    }

    if let Some(round) = tournament
        .rounds
        .iter_mut()
        .find(|r| Some(r.id) == latest_id)
    {
        round.state = RoundState::Closed;
    }

    let round = Round::new(tournament.max_round_number() + 1);
    let round_id = round.id;
    let mut matches: Vec<Match> = pairing
        .pairs
        .iter()
        .map(|&(a, b)| Match::new(Some(round_id), a, b))
        .collect();
    if let Some(bye) = pairing.bye {
        matches.push(Match::bye(Some(round_id), bye));
    }

    log::info!(
        "Tournament {}: round {} created with {} matches (bye: {:?})",
        tournament.id,
        round.number,
        pairing.pairs.len(),
        pairing.bye
    );
    tournament.rounds.push(round);
    tournament.matches.extend(matches);
    Ok(round_id)
}

/// Record a match result and optionally link its score record.
///
/// Results can move between terminal states (organizer edits) but never back to
/// pending. In elimination tournaments the winner is propagated to the parent match.
pub fn report_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    result: MatchResult,
    game: Option<GameRecord>,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Running {
        return Err(TournamentError::InvalidState);
    }
    if result == MatchResult::Pending {
        return Err(TournamentError::PendingResult);
    }
    let format = tournament.config.format;
    let m = tournament
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if !m.is_two_sided() && m.bye_recipient().is_none() {
        return Err(TournamentError::MatchNotReady(match_id));
    }
    if m.bye_recipient().is_some() && result != m.result {
        // A bye's forced win is not editable.
        return Err(TournamentError::InvalidState);
    }

    let previous = m.result;
    m.result = result;
    if game.is_some() {
        m.game = game;
    }
    m.reported_at = Some(Utc::now());
    log::info!(
        "Tournament {}: match {} result {:?} -> {:?}",
        tournament.id,
        match_id,
        previous,
        result
    );

    if format == TournamentFormat::Elimination {
        bracket::propagate_winner(tournament, match_id)?;
    }
    Ok(())
}
