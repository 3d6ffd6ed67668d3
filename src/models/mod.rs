//! Data structures for the tournament engine: registrations, matches, rounds, tournament state.

mod game;
mod participant;
mod tournament;

pub use game::{
    GameRecord, GameRecordId, Match, MatchId, MatchResult, ParseSideError, Round, RoundId,
    RoundState, Side, SideScore,
};
pub use participant::{CheckInStatus, ParticipantId, Registration};
pub use tournament::{
    Tournament, TournamentConfig, TournamentError, TournamentFormat, TournamentId,
    TournamentState,
};
