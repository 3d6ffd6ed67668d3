//! In-memory tournament state store.
//!
//! Each tournament sits behind its own lock. Reads take a consistent snapshot; writes
//! run on a working copy that replaces the stored tournament only if the operation
//! succeeds, so a failed round advance, result report or swap leaves no partial state.
//! Writers for one tournament are serialized.

use crate::models::{Tournament, TournamentError, TournamentId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type Entry = Arc<RwLock<Tournament>>;

#[derive(Default)]
pub struct TournamentStore {
    tournaments: RwLock<HashMap<TournamentId, Entry>>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tournament (replacing any with the same id) and return its id.
    pub fn insert(&self, tournament: Tournament) -> Result<TournamentId, TournamentError> {
        let id = tournament.id;
        let mut g = self
            .tournaments
            .write()
            .map_err(|_| TournamentError::StoreUnavailable)?;
        g.insert(id, Arc::new(RwLock::new(tournament)));
        Ok(id)
    }

    pub fn ids(&self) -> Result<Vec<TournamentId>, TournamentError> {
        let g = self
            .tournaments
            .read()
            .map_err(|_| TournamentError::StoreUnavailable)?;
        Ok(g.keys().copied().collect())
    }

    fn entry(&self, id: TournamentId) -> Result<Entry, TournamentError> {
        let g = self
            .tournaments
            .read()
            .map_err(|_| TournamentError::StoreUnavailable)?;
        g.get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Consistent copy of a tournament. Never observes a half-applied write.
    pub fn snapshot(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        let entry = self.entry(id)?;
        let t = entry.read().map_err(|_| TournamentError::StoreUnavailable)?;
        Ok(t.clone())
    }

    /// Run `f` against a working copy under the tournament's write lock and commit the
    /// copy only when `f` returns `Ok`.
    pub fn transaction<T, E, F>(&self, id: TournamentId, f: F) -> Result<T, E>
    where
        E: From<TournamentError>,
        F: FnOnce(&mut Tournament) -> Result<T, E>,
    {
        let entry = self.entry(id)?;
        let mut guard = entry
            .write()
            .map_err(|_| TournamentError::StoreUnavailable)?;
        let mut working = guard.clone();
        let value = f(&mut working)?;
        *guard = working;
        Ok(value)
    }
}
