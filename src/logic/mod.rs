//! Tournament engine logic: registry, standings, pairing, rounds, bracket, swaps, setup.

pub mod bracket;
mod import;
pub mod pairing;
pub mod registry;
mod rounds;
mod setup;
pub mod standings;
mod swap;

pub use bracket::{bracket_rounds, build_bracket, propagate_winner, BracketRound};
pub use import::import_registrations;
pub use pairing::{Pairing, PairingStrategy};
pub use registry::{Ranking, RankingFunction};
pub use rounds::{advance_round, report_result};
pub use setup::{finish_tournament, start_tournament};
pub use standings::StandingsRow;
pub use swap::{swap_pairing, SwapError, SwapOutcome, SwapRequest};
