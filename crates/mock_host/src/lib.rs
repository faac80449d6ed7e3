//! # Mock Host
//!
//! An in-memory implementation of the Magic Circle [`Host`] interface for
//! tests. It reproduces the semantics the client relies on — snapshot
//! reads, partial-mapping merges with last-writer-wins, and resnapshot
//! change notifications fired with the entire current room metadata — while
//! adding the handles a test needs: a controllable party roster, direct
//! metadata injection, a write counter for asserting batching behavior,
//! and a kill switch for exercising platform-failure propagation.
//!
//! Writes from "another client" are simulated by calling
//! [`Host::set_room_metadata`] directly; subscribed handlers fire exactly
//! as they would for a remote update.

use async_trait::async_trait;
use dashmap::DashMap;
use magic_circle_client::{
    Host, HostError, HostSubscription, Metadata, MetadataHandler, PartyPlayer, PlayerIdentity,
};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// In-memory host with controllable state.
pub struct MockHost {
    local: PlayerIdentity,
    room: DashMap<String, Value>,
    players: Mutex<Vec<PartyPlayer>>,
    handlers: Arc<DashMap<u64, MetadataHandler>>,
    next_handler_id: AtomicU64,
    room_writes: AtomicU64,
    offline: AtomicBool,
}

impl MockHost {
    /// A host whose local player has the given display name and a fresh
    /// random id. The local player is included in the party roster.
    pub fn new(local_name: &str) -> Self {
        Self::with_identity(PlayerIdentity {
            id: Uuid::new_v4().to_string(),
            name: local_name.to_string(),
        })
    }

    /// A host with an exact local identity, for deterministic tests.
    pub fn with_identity(local: PlayerIdentity) -> Self {
        let host = Self {
            local: local.clone(),
            room: DashMap::new(),
            players: Mutex::new(Vec::new()),
            handlers: Arc::new(DashMap::new()),
            next_handler_id: AtomicU64::new(0),
            room_writes: AtomicU64::new(0),
            offline: AtomicBool::new(false),
        };
        host.insert_player(PartyPlayer {
            id: local.id,
            name: local.name,
            metadata: Metadata::new(),
        });
        host
    }

    /// The identity [`Host::local_player`] reports.
    pub fn local_identity(&self) -> PlayerIdentity {
        self.local.clone()
    }

    /// Adds a party member with a fresh random id.
    pub fn add_player(&self, name: &str) -> PlayerIdentity {
        self.add_player_with_id(&Uuid::new_v4().to_string(), name)
    }

    /// Adds a party member with an exact id, for collision tests.
    pub fn add_player_with_id(&self, id: &str, name: &str) -> PlayerIdentity {
        self.insert_player(PartyPlayer {
            id: id.to_string(),
            name: name.to_string(),
            metadata: Metadata::new(),
        });
        PlayerIdentity {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    /// Plants metadata directly on a roster member, bypassing the host
    /// write path (for seeding alias sets and the like).
    pub fn set_player_metadata_of(&self, player_id: &str, key: &str, value: Value) {
        let mut players = self.players.lock().expect("player roster poisoned");
        if let Some(player) = players.iter_mut().find(|p| p.id == player_id) {
            player.metadata.insert(key.to_string(), value);
        }
    }

    /// Number of room metadata writes issued so far.
    pub fn room_write_count(&self) -> u64 {
        self.room_writes.load(Ordering::SeqCst)
    }

    /// A snapshot of the current room metadata, for asserting stored state.
    pub fn room_snapshot(&self) -> Metadata {
        self.room
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Makes every subsequent host call fail, simulating a lost platform
    /// connection.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), HostError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(HostError::Call("host connection lost".to_string()));
        }
        Ok(())
    }

    fn insert_player(&self, player: PartyPlayer) {
        self.players
            .lock()
            .expect("player roster poisoned")
            .push(player);
    }

    fn notify_all(&self) {
        let snapshot = self.room_snapshot();
        // Collect first so a handler can unsubscribe without deadlocking
        // against the registry shard it is stored in.
        let handlers: Vec<MetadataHandler> =
            self.handlers.iter().map(|entry| entry.value().clone()).collect();
        for handler in handlers {
            (*handler)(snapshot.clone());
        }
    }
}

#[async_trait]
impl Host for MockHost {
    async fn room_metadata(&self) -> Result<Metadata, HostError> {
        self.check_online()?;
        Ok(self.room_snapshot())
    }

    async fn set_room_metadata(&self, patch: Metadata) -> Result<(), HostError> {
        self.check_online()?;
        for (key, value) in patch {
            self.room.insert(key, value);
        }
        self.room_writes.fetch_add(1, Ordering::SeqCst);
        self.notify_all();
        Ok(())
    }

    async fn on_room_metadata_change(
        &self,
        handler: MetadataHandler,
    ) -> Result<HostSubscription, HostError> {
        self.check_online()?;
        let id = self.next_handler_id.fetch_add(1, Ordering::SeqCst);
        self.handlers.insert(id, handler);
        let handlers = Arc::clone(&self.handlers);
        Ok(HostSubscription::new(move || {
            handlers.remove(&id);
        }))
    }

    async fn player_metadata(&self) -> Result<Metadata, HostError> {
        self.check_online()?;
        let players = self.players.lock().expect("player roster poisoned");
        Ok(players
            .iter()
            .find(|p| p.id == self.local.id)
            .map(|p| p.metadata.clone())
            .unwrap_or_default())
    }

    async fn set_player_metadata(&self, patch: Metadata) -> Result<(), HostError> {
        self.check_online()?;
        let mut players = self.players.lock().expect("player roster poisoned");
        if let Some(local) = players.iter_mut().find(|p| p.id == self.local.id) {
            for (key, value) in patch {
                local.metadata.insert(key, value);
            }
        }
        Ok(())
    }

    async fn party_players(&self) -> Result<Vec<PartyPlayer>, HostError> {
        self.check_online()?;
        Ok(self.players.lock().expect("player roster poisoned").clone())
    }

    async fn local_player(&self) -> Result<PlayerIdentity, HostError> {
        self.check_online()?;
        Ok(self.local.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(flavor = "multi_thread")]
    async fn writes_merge_and_notify_with_full_snapshot() {
        let host = MockHost::new("Snail");
        let seen: Arc<Mutex<Vec<Metadata>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = host
            .on_room_metadata_change(Arc::new(move |metadata| {
                sink.lock().expect("sink poisoned").push(metadata);
            }))
            .await
            .expect("Failed to subscribe");

        let mut patch = Metadata::new();
        patch.insert("a".to_string(), json!(1));
        host.set_room_metadata(patch).await.expect("Failed to write");

        let mut patch = Metadata::new();
        patch.insert("b".to_string(), json!(2));
        host.set_room_metadata(patch).await.expect("Failed to write");

        let seen = seen.lock().expect("sink poisoned");
        assert_eq!(seen.len(), 2);
        // Second notification resnapshots the whole store, not the diff.
        assert_eq!(seen[1]["a"], json!(1));
        assert_eq!(seen[1]["b"], json!(2));
        assert_eq!(host.room_write_count(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn cancelled_subscriptions_stop_firing() {
        let host = MockHost::new("Snail");
        let count = Arc::new(AtomicU64::new(0));
        let sink = Arc::clone(&count);
        let sub = host
            .on_room_metadata_change(Arc::new(move |_| {
                sink.fetch_add(1, Ordering::SeqCst);
            }))
            .await
            .expect("Failed to subscribe");

        host.set_room_metadata(Metadata::new())
            .await
            .expect("Failed to write");
        sub.cancel();
        host.set_room_metadata(Metadata::new())
            .await
            .expect("Failed to write");

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn offline_hosts_fail_every_call() {
        let host = MockHost::new("Snail");
        host.go_offline();
        assert!(host.room_metadata().await.is_err());
        assert!(host.party_players().await.is_err());
    }
}
