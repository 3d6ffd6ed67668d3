//! Participant identity and Registration (participant + tournament entry).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (a user).
pub type ParticipantId = Uuid;

/// Whether a registered participant has checked in for play.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStatus {
    #[default]
    Pending,
    CheckedIn,
}

/// A participant's entry in a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub participant_id: ParticipantId,
    /// Display name; also the last-resort ordering key in standings.
    pub name: String,
    /// Optional chosen faction (army, deck, character...). Not read by the engine.
    pub faction: Option<String>,
    pub status: CheckInStatus,
}

impl Registration {
    /// Create a new registration with a fresh participant id, not yet checked in.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            participant_id: Uuid::new_v4(),
            name: name.into(),
            faction: None,
            status: CheckInStatus::Pending,
        }
    }

    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = Some(faction.into());
        self
    }

    pub fn is_checked_in(&self) -> bool {
        self.status == CheckInStatus::CheckedIn
    }

    pub fn check_in(&mut self) {
        self.status = CheckInStatus::CheckedIn;
    }
}
