//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use tournament_engine::{
    GameRecord, Match, MatchId, MatchResult, ParticipantId, Registration, SideScore,
    Tournament, TournamentConfig, TournamentFormat, TournamentState,
};

/// Checked-in registrations with the given names.
pub fn registrations(names: &[&str]) -> Vec<Registration> {
    names
        .iter()
        .map(|n| {
            let mut r = Registration::new(*n);
            r.check_in();
            r
        })
        .collect()
}

/// A running tournament of the given format with checked-in participants.
pub fn running(names: &[&str], config: TournamentConfig) -> Tournament {
    let mut t = Tournament::with_registrations("Test", config, registrations(names));
    t.state = TournamentState::Running;
    t
}

pub fn running_swiss(names: &[&str]) -> Tournament {
    running(names, TournamentConfig::with_format(TournamentFormat::Swiss))
}

/// Participant id by registration name.
pub fn id(t: &Tournament, name: &str) -> ParticipantId {
    t.registrations
        .iter()
        .find(|r| r.name == name)
        .map(|r| r.participant_id)
        .unwrap_or_else(|| panic!("no registration named {name}"))
}

/// Append a finished two-sided match outside any round.
pub fn record(t: &mut Tournament, a: &str, b: &str, result: MatchResult) -> MatchId {
    let mut m = Match::new(None, id(t, a), id(t, b));
    m.result = result;
    let match_id = m.id;
    t.matches.push(m);
    match_id
}

/// Append a finished match with a linked score record.
pub fn record_scored(
    t: &mut Tournament,
    a: &str,
    b: &str,
    result: MatchResult,
    score_a: f64,
    score_b: f64,
) -> MatchId {
    let match_id = record(t, a, b, result);
    let game = GameRecord::new(
        Some(SideScore {
            primary: score_a,
            secondary: 0.0,
        }),
        Some(SideScore {
            primary: score_b,
            secondary: 0.0,
        }),
    );
    if let Some(m) = t.get_match_mut(match_id) {
        m.game = Some(game);
    }
    match_id
}

/// Append a bye for `name`.
pub fn record_bye(t: &mut Tournament, name: &str) -> MatchId {
    let m = Match::bye(None, id(t, name));
    let match_id = m.id;
    t.matches.push(m);
    match_id
}

/// Unordered pair key for comparisons.
pub fn unordered(a: ParticipantId, b: ParticipantId) -> (ParticipantId, ParticipantId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
