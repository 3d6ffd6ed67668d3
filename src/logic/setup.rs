//! Setup phase: start the tournament (Setup -> Running) and finish it.

use crate::logic::bracket;
use crate::models::{Tournament, TournamentError, TournamentFormat, TournamentState};

/// Minimum registrations needed to start.
pub const MIN_PARTICIPANTS: usize = 2;

/// Start the tournament: require at least 2 registrations and set state to Running.
/// Elimination tournaments get their bracket built here.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Setup {
        return Err(TournamentError::InvalidState);
    }
    if tournament.registrations.len() < MIN_PARTICIPANTS {
        return Err(TournamentError::NotEnoughParticipants {
            required: MIN_PARTICIPANTS,
        });
    }
    if tournament.config.format == TournamentFormat::Elimination {
        bracket::build_bracket(tournament)?;
    }
    tournament.state = TournamentState::Running;
    log::info!(
        "Tournament {} started ({:?}, {} registrations)",
        tournament.id,
        tournament.config.format,
        tournament.registrations.len()
    );
    Ok(())
}

/// Close the tournament; no further rounds, results or swaps.
pub fn finish_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Running {
        return Err(TournamentError::InvalidState);
    }
    tournament.state = TournamentState::Finished;
    Ok(())
}
