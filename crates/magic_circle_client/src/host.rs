//! The host platform interface.
//!
//! Magic Circle runs embedded in a virtual tabletop host that owns all
//! persistent state. The client never talks to a server of its own; it
//! reads and writes shared metadata through the host and listens to the
//! host's change-notification feed. This module defines that collaborator
//! contract as a narrow trait so tests can substitute an in-memory host
//! with controllable interleavings.
//!
//! # Consistency model
//!
//! The host store is atomic enough for last-writer-wins, nothing more: no
//! compare-and-swap, no transactions. Reads are snapshots, writes are
//! partial-mapping merges, and change notifications deliver the *entire
//! current value* on every change (a resnapshot, not a diff), possibly for
//! changes to keys the listener does not care about.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A metadata bag, keyed by namespaced path strings.
pub type Metadata = HashMap<String, Value>;

/// Callback invoked with the full current room metadata on every change.
pub type MetadataHandler = Arc<dyn Fn(Metadata) + Send + Sync>;

/// A platform call failed.
///
/// The client never retries these; they propagate to the caller of the
/// operation that issued the call.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The host rejected or failed to complete a metadata or directory call.
    #[error("host platform call failed: {0}")]
    Call(String),
}

/// A member of the current party, as reported by the host directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyPlayer {
    /// Stable unique identifier assigned by the host.
    pub id: String,
    /// Display name. Mutable by the player at any time.
    pub name: String,
    /// The player's metadata bag, holding claimed aliases among other
    /// extension state.
    #[serde(default)]
    pub metadata: Metadata,
}

/// The calling client's own identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub id: String,
    pub name: String,
}

/// Access to the host platform's metadata store and party directory.
///
/// Implementations must be cheap to share (`Arc<dyn Host>`); every method
/// suspends until the host responds. See the `mock_host` crate in this
/// workspace for the in-memory implementation used by tests.
#[async_trait]
pub trait Host: Send + Sync {
    /// The current room metadata, as a snapshot.
    async fn room_metadata(&self) -> Result<Metadata, HostError>;

    /// Merges `patch` into the room metadata. Last writer wins per key.
    async fn set_room_metadata(&self, patch: Metadata) -> Result<(), HostError>;

    /// Registers `handler` on the room metadata change feed. The handler
    /// receives the entire current metadata on every change until the
    /// returned subscription is cancelled.
    async fn on_room_metadata_change(
        &self,
        handler: MetadataHandler,
    ) -> Result<HostSubscription, HostError>;

    /// The calling player's own metadata bag, as a snapshot.
    async fn player_metadata(&self) -> Result<Metadata, HostError>;

    /// Merges `patch` into the calling player's own metadata bag.
    async fn set_player_metadata(&self, patch: Metadata) -> Result<(), HostError>;

    /// The current party roster.
    async fn party_players(&self) -> Result<Vec<PartyPlayer>, HostError>;

    /// The calling client's own identity.
    async fn local_player(&self) -> Result<PlayerIdentity, HostError>;
}

/// Detaches a change handler from the host feed when cancelled or dropped.
///
/// After cancellation the host makes no guarantees about notifications
/// already in flight.
pub struct HostSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl HostSubscription {
    /// Wraps the host-specific detach action.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Detaches the handler now.
    pub fn cancel(mut self) {
        if let Some(detach) = self.cancel.take() {
            detach();
        }
    }
}

impl Drop for HostSubscription {
    fn drop(&mut self) {
        if let Some(detach) = self.cancel.take() {
            detach();
        }
    }
}

impl fmt::Debug for HostSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostSubscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
