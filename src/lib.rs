//! Tournament engine: pairing, standings, and single-elimination brackets for
//! head-to-head games, plus an in-memory state store.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    advance_round, bracket_rounds, build_bracket, finish_tournament, import_registrations,
    propagate_winner, report_result, start_tournament, swap_pairing, BracketRound, Pairing,
    PairingStrategy, Ranking, RankingFunction, StandingsRow, SwapError, SwapOutcome, SwapRequest,
};
pub use models::{
    CheckInStatus, GameRecord, Match, MatchId, MatchResult, ParticipantId, Registration, Round,
    RoundId, RoundState, Side, SideScore, Tournament, TournamentConfig, TournamentError,
    TournamentFormat, TournamentId, TournamentState,
};
pub use store::TournamentStore;
