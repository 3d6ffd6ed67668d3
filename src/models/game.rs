//! Match, Side, MatchResult, scored GameRecord, and Round.

use crate::models::participant::ParticipantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Unique identifier for a round (Swiss/open only).
pub type RoundId = Uuid;

/// Unique identifier for a scored game record.
pub type GameRecordId = Uuid;

/// One of the two participant slots of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Error returned when a slot name is neither `a` nor `b`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseSideError(pub String);

impl fmt::Display for ParseSideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid slot {:?} (expected \"a\" or \"b\")", self.0)
    }
}

impl std::error::Error for ParseSideError {}

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "a" | "A" => Ok(Side::A),
            "b" | "B" => Ok(Side::B),
            other => Err(ParseSideError(other.to_string())),
        }
    }
}

/// Outcome of a match. `Pending` is the only non-terminal state.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    #[default]
    Pending,
    AWin,
    BWin,
    Draw,
}

impl MatchResult {
    pub fn is_final(self) -> bool {
        self != MatchResult::Pending
    }

    /// The winning side, if any. Draws and pending matches have none.
    pub fn winner(self) -> Option<Side> {
        match self {
            MatchResult::AWin => Some(Side::A),
            MatchResult::BWin => Some(Side::B),
            MatchResult::Draw | MatchResult::Pending => None,
        }
    }

    /// The forced result for a bye awarded to `side`.
    pub fn win_for(side: Side) -> MatchResult {
        match side {
            Side::A => MatchResult::AWin,
            Side::B => MatchResult::BWin,
        }
    }
}

/// Numeric scores entered for one side of a played game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SideScore {
    pub primary: f64,
    #[serde(default)]
    pub secondary: f64,
}

/// Scored game record linked to a match once it has been played.
/// Either side's score may be absent if not entered yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameRecordId,
    #[serde(default)]
    pub a: Option<SideScore>,
    #[serde(default)]
    pub b: Option<SideScore>,
}

impl GameRecord {
    pub fn new(a: Option<SideScore>, b: Option<SideScore>) -> Self {
        Self {
            id: Uuid::new_v4(),
            a,
            b,
        }
    }

    pub fn score(&self, side: Side) -> Option<SideScore> {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }
}

/// A single head-to-head match.
///
/// Swiss/open matches belong to a round. Elimination matches have no round; their
/// grouping comes from depth in the tree defined by `parent_id`/`child_slot`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub round_id: Option<RoundId>,
    pub a: Option<ParticipantId>,
    /// Empty `b` with an `a_win` result is a bye for `a` (and vice versa).
    pub b: Option<ParticipantId>,
    pub result: MatchResult,
    /// Linked score record; present once the game has been played.
    pub game: Option<GameRecord>,
    /// Match the winner of this one advances into (elimination only).
    pub parent_id: Option<MatchId>,
    /// Slot of the parent the winner fills.
    pub child_slot: Option<Side>,
    pub reported_at: Option<DateTime<Utc>>,
}

impl Match {
    /// A pending two-sided match within a round.
    pub fn new(round_id: Option<RoundId>, a: ParticipantId, b: ParticipantId) -> Self {
        Self {
            id: Uuid::new_v4(),
            round_id,
            a: Some(a),
            b: Some(b),
            result: MatchResult::Pending,
            game: None,
            parent_id: None,
            child_slot: None,
            reported_at: None,
        }
    }

    /// A bye: `participant` sits in slot `a` and is awarded the win.
    pub fn bye(round_id: Option<RoundId>, participant: ParticipantId) -> Self {
        Self {
            id: Uuid::new_v4(),
            round_id,
            a: Some(participant),
            b: None,
            result: MatchResult::AWin,
            game: None,
            parent_id: None,
            child_slot: None,
            reported_at: None,
        }
    }

    /// An empty bracket node waiting for its children's winners.
    pub fn bracket_node(parent: Option<(MatchId, Side)>) -> Self {
        Self {
            id: Uuid::new_v4(),
            round_id: None,
            a: None,
            b: None,
            result: MatchResult::Pending,
            game: None,
            parent_id: parent.map(|(id, _)| id),
            child_slot: parent.map(|(_, side)| side),
            reported_at: None,
        }
    }

    pub fn slot(&self, side: Side) -> Option<ParticipantId> {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut Option<ParticipantId> {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }

    /// Which slot, if any, holds `participant`.
    pub fn side_of(&self, participant: ParticipantId) -> Option<Side> {
        if self.a == Some(participant) {
            Some(Side::A)
        } else if self.b == Some(participant) {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Both slots filled.
    pub fn is_two_sided(&self) -> bool {
        self.a.is_some() && self.b.is_some()
    }

    /// Exactly one slot filled and the result is that side's forced win.
    pub fn bye_recipient(&self) -> Option<ParticipantId> {
        match (self.a, self.b, self.result) {
            (Some(a), None, MatchResult::AWin) => Some(a),
            (None, Some(b), MatchResult::BWin) => Some(b),
            _ => None,
        }
    }

    /// Not played: no result and no linked score record.
    pub fn is_pending(&self) -> bool {
        self.result == MatchResult::Pending && self.game.is_none()
    }

    /// The participant the result names as winner.
    pub fn winner(&self) -> Option<ParticipantId> {
        self.result.winner().and_then(|side| self.slot(side))
    }
}

/// State of a Swiss/open round.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    #[default]
    Pending,
    Closed,
}

/// A numbered round of a Swiss/open tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    /// 1-based sequence number.
    pub number: u32,
    pub state: RoundState,
    pub created_at: DateTime<Utc>,
}

impl Round {
    pub fn new(number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            state: RoundState::Pending,
            created_at: Utc::now(),
        }
    }
}
