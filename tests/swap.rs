//! Manual pairing swaps.

mod common;

use common::{id, registrations, running, running_swiss};
use std::collections::HashSet;
use tournament_engine::logic::bracket::depth;
use tournament_engine::{
    advance_round, report_result, start_tournament, swap_pairing, Match, MatchId, MatchResult,
    ParticipantId, Side, SwapError, SwapOutcome, SwapRequest, Tournament, TournamentConfig,
    TournamentFormat,
};

fn participants_of(matches: &[&Match]) -> HashSet<Option<ParticipantId>> {
    matches.iter().flat_map(|m| [m.a, m.b]).collect()
}

/// Running Swiss tournament with one generated round; returns its two matches.
fn swiss_round() -> (Tournament, MatchId, MatchId) {
    let mut t = running_swiss(&["A", "B", "C", "D"]);
    let round_id = advance_round(&mut t).unwrap();
    let ids: Vec<MatchId> = t.round_matches(round_id).map(|m| m.id).collect();
    (t, ids[0], ids[1])
}

#[test]
fn swap_moves_occupant_into_target_former_slot() {
    let (mut t, first, second) = swiss_round();
    let before = participants_of(&[t.get_match(first).unwrap(), t.get_match(second).unwrap()]);
    let occupant = t.get_match(first).unwrap().a.unwrap();
    let target = t.get_match(second).unwrap().b.unwrap();

    let outcome = swap_pairing(&mut t, first, Side::A, target).unwrap();
    assert_eq!(outcome, SwapOutcome::Swapped { other_match: second });

    let (m1, m2) = (t.get_match(first).unwrap(), t.get_match(second).unwrap());
    assert_eq!(m1.a, Some(target));
    assert_eq!(m2.b, Some(occupant));
    assert_ne!(m1.a, m1.b);
    assert_ne!(m2.a, m2.b);
    assert_eq!(participants_of(&[m1, m2]), before);
}

#[test]
fn participant_already_in_slot_is_a_no_op() {
    let (mut t, first, _) = swiss_round();
    let before = t.get_match(first).unwrap().clone();
    let current = before.b.unwrap();
    assert_eq!(
        swap_pairing(&mut t, first, Side::B, current),
        Ok(SwapOutcome::Unchanged)
    );
    assert_eq!(t.get_match(first).unwrap(), &before);
}

#[test]
fn played_match_cannot_be_swapped() {
    let (mut t, first, second) = swiss_round();
    report_result(&mut t, first, MatchResult::AWin, None).unwrap();
    let target = t.get_match(second).unwrap().a.unwrap();
    assert_eq!(
        swap_pairing(&mut t, first, Side::A, target),
        Err(SwapError::MatchAlreadyPlayed)
    );
}

#[test]
fn target_in_played_match_is_not_a_sibling() {
    let (mut t, first, second) = swiss_round();
    report_result(&mut t, second, MatchResult::AWin, None).unwrap();
    let target = t.get_match(second).unwrap().a.unwrap();
    let before = t.matches.clone();
    assert_eq!(
        swap_pairing(&mut t, first, Side::A, target),
        Err(SwapError::NotInSiblingMatch)
    );
    assert_eq!(t.matches, before);
}

#[test]
fn bye_recipient_cannot_be_swapped_in() {
    let mut t = running_swiss(&["A", "B", "C"]);
    let round_id = advance_round(&mut t).unwrap();
    let pending = t
        .round_matches(round_id)
        .find(|m| m.result == MatchResult::Pending)
        .unwrap()
        .id;
    let bye = t
        .round_matches(round_id)
        .find_map(|m| m.bye_recipient())
        .unwrap();
    assert_eq!(
        swap_pairing(&mut t, pending, Side::A, bye),
        Err(SwapError::NotInSiblingMatch)
    );
}

#[test]
fn matches_of_other_rounds_are_not_siblings() {
    let (mut t, first, _) = swiss_round();
    // A pending match with a newcomer in an older, separate round.
    t.add_registration("E", None).unwrap();
    let e = id(&t, "E");
    let a = id(&t, "A");
    let stray = Match::new(Some(uuid::Uuid::new_v4()), e, a);
    t.matches.push(stray);
    assert_eq!(
        swap_pairing(&mut t, first, Side::A, e),
        Err(SwapError::NotInSiblingMatch)
    );
}

#[test]
fn invalid_requests_are_rejected() {
    let (mut t, first, _) = swiss_round();
    let request = SwapRequest {
        match_id: first,
        slot: "c".to_string(),
        participant_id: id(&t, "A"),
    };
    assert_eq!(request.apply(&mut t), Err(SwapError::InvalidSlot));

    let unknown = uuid::Uuid::new_v4();
    let a = id(&t, "A");
    assert_eq!(
        swap_pairing(&mut t, unknown, Side::A, a),
        Err(SwapError::MatchNotFound)
    );
    assert_eq!(
        swap_pairing(&mut t, first, Side::A, unknown),
        Err(SwapError::ParticipantNotFound)
    );
}

#[test]
fn swap_request_parses_slot() {
    let (mut t, first, second) = swiss_round();
    let target = t.get_match(second).unwrap().a.unwrap();
    let request = SwapRequest {
        match_id: first,
        slot: "b".to_string(),
        participant_id: target,
    };
    assert!(request.apply(&mut t).is_ok());
    assert_eq!(t.get_match(first).unwrap().b, Some(target));
}

#[test]
fn swap_requires_running_grouped_format() {
    let (mut t, first, _) = swiss_round();
    t.state = tournament_engine::TournamentState::Finished;
    let a = id(&t, "A");
    assert_eq!(
        swap_pairing(&mut t, first, Side::A, a),
        Err(SwapError::NotRunning)
    );

    let mut t = running(
        &["A", "B", "C", "D"],
        TournamentConfig::with_format(TournamentFormat::Open),
    );
    let round_id = advance_round(&mut t).unwrap();
    let m = t.round_matches(round_id).next().unwrap().id;
    let a = id(&t, "A");
    assert_eq!(
        swap_pairing(&mut t, m, Side::A, a),
        Err(SwapError::UnsupportedFormat)
    );
}

#[test]
fn elimination_swaps_within_same_depth_only() {
    let mut t = Tournament::with_registrations(
        "Cup",
        TournamentConfig::with_format(TournamentFormat::Elimination),
        registrations(&["P1", "P2", "P3", "P4"]),
    );
    start_tournament(&mut t).unwrap();
    let leaves: Vec<MatchId> = t
        .matches
        .iter()
        .filter(|m| depth(&t, m.id) == Some(1))
        .map(|m| m.id)
        .collect();
    let root = t.matches.iter().find(|m| m.parent_id.is_none()).unwrap().id;

    // Leaves are (P1, P4) and (P2, P3): move P3 against P1.
    let p3 = id(&t, "P3");
    let p4 = id(&t, "P4");
    swap_pairing(&mut t, leaves[0], Side::B, p3).unwrap();
    assert_eq!(t.get_match(leaves[0]).unwrap().b, Some(p3));
    assert_eq!(t.get_match(leaves[1]).unwrap().b, Some(p4));

    // The final sits at depth 0; leaf participants are not its siblings.
    assert_eq!(
        swap_pairing(&mut t, root, Side::A, p3),
        Err(SwapError::NotInSiblingMatch)
    );
}

#[test]
fn error_kinds_are_stable() {
    assert_eq!(SwapError::InvalidSlot.kind(), "invalid_slot");
    assert_eq!(SwapError::MatchAlreadyPlayed.kind(), "match_already_played");
    assert_eq!(SwapError::NotInSiblingMatch.kind(), "not_in_sibling_match");
}
