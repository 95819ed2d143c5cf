//! In-memory tracking of active battles and per-player serialization
//!
//! Battles live only in memory: a restart abandons them, the same way fleeing
//! does. `PlayerLocks` gives each player an exclusive section so read-then-write
//! updates to energy, quests and sessions never interleave.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::entities::BattleSession;
use crate::domain::value_objects::PlayerId;

/// Active battles keyed by player; at most one per player
#[derive(Debug, Default)]
pub struct BattleSessionStore {
    sessions: HashMap<PlayerId, BattleSession>,
}

impl BattleSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.sessions.contains_key(&player_id)
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&BattleSession> {
        self.sessions.get(&player_id)
    }

    pub fn get_mut(&mut self, player_id: PlayerId) -> Option<&mut BattleSession> {
        self.sessions.get_mut(&player_id)
    }

    /// Store a new session. The player's existing session, if any, is
    /// handed back untouched and the new one is dropped.
    pub fn insert(&mut self, session: BattleSession) -> Result<(), BattleSession> {
        let player_id = session.player_id();
        if self.sessions.contains_key(&player_id) {
            return Err(session);
        }
        self.sessions.insert(player_id, session);
        Ok(())
    }

    pub fn remove(&mut self, player_id: PlayerId) -> Option<BattleSession> {
        self.sessions.remove(&player_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// One async mutex per player, created on first use
#[derive(Debug, Default)]
pub struct PlayerLocks {
    locks: DashMap<PlayerId, Arc<Mutex<()>>>,
}

impl PlayerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the player's exclusive section. Released when the guard drops.
    pub async fn acquire(&self, player_id: PlayerId) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(player_id).or_default().clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use super::*;
    use crate::domain::entities::{NoteEvent, SongCatalog};
    use crate::domain::value_objects::{Arrow, ArrowSet};

    fn session_for(player_id: PlayerId) -> BattleSession {
        let catalog = SongCatalog::builtin();
        let song = catalog.get("tutorial").expect("tutorial");
        let notes = vec![NoteEvent::new(0, ArrowSet::single(Arrow::Left))];
        BattleSession::new(player_id, song, notes, Utc::now())
    }

    #[test]
    fn test_one_session_per_player() {
        let mut store = BattleSessionStore::new();
        let player_id = PlayerId::new();

        let first = session_for(player_id);
        let first_id = first.id();
        assert!(store.insert(first).is_ok());
        assert!(store.insert(session_for(player_id)).is_err());
        assert_eq!(store.get(player_id).map(|s| s.id()), Some(first_id));

        assert!(store.insert(session_for(PlayerId::new())).is_ok());
        assert_eq!(store.len(), 2);

        assert!(store.remove(player_id).is_some());
        assert!(!store.contains(player_id));
    }

    #[tokio::test]
    async fn test_player_lock_is_exclusive() {
        let locks = Arc::new(PlayerLocks::new());
        let player_id = PlayerId::new();

        let guard = locks.acquire(player_id).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(player_id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        // Other players are not blocked
        let _other = locks.acquire(PlayerId::new()).await;

        drop(guard);
        contender.await.expect("contender finishes");
    }
}
