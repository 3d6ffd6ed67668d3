//! Tournament, its configuration, and TournamentState.

use crate::logic::registry;
use crate::models::game::{Match, MatchId, Round, RoundId};
use crate::models::participant::{CheckInStatus, ParticipantId, Registration};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// The tournament format does not support this action.
    UnsupportedFormat,
    /// Not enough participants to start or to build a bracket.
    NotEnoughParticipants { required: usize },
    /// Registration name is empty after trimming.
    EmptyName,
    /// A registration with this name already exists (names are unique, case-insensitive).
    DuplicateParticipantName(String),
    /// Participant is not registered in this tournament.
    ParticipantNotFound(ParticipantId),
    /// Match does not belong to this tournament.
    MatchNotFound(MatchId),
    /// The latest round still has matches without a result.
    IncompleteResults,
    /// A result can never be reset to pending.
    PendingResult,
    /// The match is missing a participant and is not a bye.
    MatchNotReady(MatchId),
    /// The elimination bracket has already been built.
    BracketAlreadyBuilt,
    /// No tournament with this id in the store.
    TournamentNotFound(TournamentId),
    /// The state store could not be locked.
    StoreUnavailable,
    /// CSV registration import failed.
    Import { line: u64, message: String },
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::UnsupportedFormat => {
                write!(f, "This action is not supported by the tournament format")
            }
            TournamentError::NotEnoughParticipants { required } => {
                write!(f, "Need at least {} participants", required)
            }
            TournamentError::EmptyName => write!(f, "Name must not be empty"),
            TournamentError::DuplicateParticipantName(name) => {
                write!(f, "A participant named {:?} is already registered", name)
            }
            TournamentError::ParticipantNotFound(_) => write!(f, "Participant not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::IncompleteResults => {
                write!(f, "Not all matches of the current round have a result")
            }
            TournamentError::PendingResult => write!(f, "A result cannot be reset to pending"),
            TournamentError::MatchNotReady(_) => {
                write!(f, "Match does not have both participants yet")
            }
            TournamentError::BracketAlreadyBuilt => write!(f, "Bracket has already been built"),
            TournamentError::TournamentNotFound(_) => write!(f, "No tournament"),
            TournamentError::StoreUnavailable => write!(f, "Tournament store unavailable"),
            TournamentError::Import { line, message } => {
                write!(f, "Import failed at line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// How matches are organized.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Numbered rounds paired by a pairing strategy.
    #[default]
    Swiss,
    /// Ad-hoc play; rounds are optional and not treated as a pairing group.
    Open,
    /// Single-elimination bracket tree.
    Elimination,
}

impl TournamentFormat {
    pub fn is_round_based(self) -> bool {
        matches!(self, TournamentFormat::Swiss | TournamentFormat::Open)
    }
}

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Taking registrations; not started.
    #[default]
    Setup,
    /// Rounds are being played.
    Running,
    /// No further rounds or results.
    Finished,
}

/// Per-tournament configuration. Strategy keys are free-form and resolved through the
/// registry, falling back to defaults when unknown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    #[serde(default)]
    pub format: TournamentFormat,
    #[serde(default = "default_pairing_strategy")]
    pub pairing_strategy: String,
    #[serde(default = "default_primary_strategy")]
    pub primary_strategy: String,
    #[serde(default = "default_tiebreak1")]
    pub tiebreak1: String,
    #[serde(default = "default_tiebreak2")]
    pub tiebreak2: String,
    /// Score credited to the score sum of a bye recipient.
    #[serde(default)]
    pub bye_score: f64,
}

fn default_pairing_strategy() -> String {
    registry::DEFAULT_PAIRING.to_string()
}

fn default_primary_strategy() -> String {
    registry::DEFAULT_PRIMARY.to_string()
}

fn default_tiebreak1() -> String {
    registry::DEFAULT_TIEBREAK.to_string()
}

fn default_tiebreak2() -> String {
    registry::NO_TIEBREAK.to_string()
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            format: TournamentFormat::default(),
            pairing_strategy: default_pairing_strategy(),
            primary_strategy: default_primary_strategy(),
            tiebreak1: default_tiebreak1(),
            tiebreak2: default_tiebreak2(),
            bye_score: 0.0,
        }
    }
}

impl TournamentConfig {
    pub fn with_format(format: TournamentFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }
}

/// Full tournament state: registrations, rounds, matches, configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub state: TournamentState,
    pub config: TournamentConfig,
    pub registrations: Vec<Registration>,
    /// Swiss/open rounds in creation order.
    pub rounds: Vec<Round>,
    /// Every match of the tournament; never deleted.
    pub matches: Vec<Match>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Setup state with no registrations.
    pub fn new(name: impl Into<String>, config: TournamentConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            state: TournamentState::Setup,
            config,
            registrations: Vec::new(),
            rounds: Vec::new(),
            matches: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Create a tournament with initial registrations. Still in Setup until started.
    pub fn with_registrations(
        name: impl Into<String>,
        config: TournamentConfig,
        registrations: Vec<Registration>,
    ) -> Self {
        Self {
            registrations,
            ..Self::new(name, config)
        }
    }

    pub fn registration(&self, id: ParticipantId) -> Option<&Registration> {
        self.registrations.iter().find(|r| r.participant_id == id)
    }

    pub fn registration_mut(&mut self, id: ParticipantId) -> Option<&mut Registration> {
        self.registrations.iter_mut().find(|r| r.participant_id == id)
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Highest round number so far (0 before the first round).
    pub fn max_round_number(&self) -> u32 {
        self.rounds.iter().map(|r| r.number).max().unwrap_or(0)
    }

    /// The round with the highest number.
    pub fn latest_round(&self) -> Option<&Round> {
        self.rounds.iter().max_by_key(|r| r.number)
    }

    pub fn round_matches(&self, round_id: RoundId) -> impl Iterator<Item = &Match> {
        self.matches
            .iter()
            .filter(move |m| m.round_id == Some(round_id))
    }

    /// Participants eligible for the next round: checked-in registrants if any exist,
    /// otherwise every registrant. Registration order is preserved.
    pub fn eligible_participants(&self) -> Vec<ParticipantId> {
        let checked_in: Vec<ParticipantId> = self
            .registrations
            .iter()
            .filter(|r| r.is_checked_in())
            .map(|r| r.participant_id)
            .collect();
        if !checked_in.is_empty() {
            return checked_in;
        }
        self.registrations.iter().map(|r| r.participant_id).collect()
    }

    /// Add a registration (valid in Setup or Running). Names must be unique (case-insensitive).
    pub fn add_registration(
        &mut self,
        name: impl Into<String>,
        faction: Option<String>,
    ) -> Result<ParticipantId, TournamentError> {
        if self.state == TournamentState::Finished {
            return Err(TournamentError::InvalidState);
        }
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        let is_duplicate = self
            .registrations
            .iter()
            .any(|r| r.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(TournamentError::DuplicateParticipantName(
                name_trimmed.to_string(),
            ));
        }
        let mut registration = Registration::new(name_trimmed);
        registration.faction = faction
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());
        let id = registration.participant_id;
        self.registrations.push(registration);
        Ok(id)
    }

    /// Remove a registration by participant id (only valid in Setup).
    pub fn remove_registration(&mut self, id: ParticipantId) -> Result<(), TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .registrations
            .iter()
            .position(|r| r.participant_id == id)
            .ok_or(TournamentError::ParticipantNotFound(id))?;
        self.registrations.remove(idx);
        Ok(())
    }

    /// Set a registrant's check-in status.
    pub fn set_checked_in(
        &mut self,
        id: ParticipantId,
        checked_in: bool,
    ) -> Result<(), TournamentError> {
        if self.state == TournamentState::Finished {
            return Err(TournamentError::InvalidState);
        }
        let registration = self
            .registration_mut(id)
            .ok_or(TournamentError::ParticipantNotFound(id))?;
        registration.status = if checked_in {
            CheckInStatus::CheckedIn
        } else {
            CheckInStatus::Pending
        };
        Ok(())
    }
}
