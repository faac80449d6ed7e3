//! # Magic Circle
//!
//! A small, shared, append-mostly message bus for virtual tabletop
//! extensions, layered on the host platform's room metadata. Multiple
//! independent clients read and write the same metadata keys with no
//! arbitration beyond the host's own last-writer-wins replication; Magic
//! Circle gives them a common message protocol on top: bounded buffering,
//! monotonic ids, player attribution, whispers, and an incremental
//! subscription stream.
//!
//! This crate is the single entry point. It re-exports the wire contract
//! from `magic_circle_protocol` and the engine from `magic_circle_client`.
//!
//! ## Quick Start Example
//!
//! ```rust,no_run
//! use magic_circle::{create_message_bus, Cursor};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Any implementation of the Host trait works here; tests and examples
//! // use the in-memory mock_host crate.
//! let host = Arc::new(mock_host::MockHost::new("Snail"));
//! let bus = create_message_bus(host);
//!
//! // Follow the room's message stream.
//! let subscription = bus
//!     .subscribe(
//!         Cursor::Start,
//!         Arc::new(|batch| {
//!             for msg in batch {
//!                 println!("[{}] {}", msg.author, msg.text);
//!             }
//!         }),
//!     )
//!     .await?;
//!
//! // Post to it. Batch multi-message bursts into one call.
//! bus.send(["Hello, room!"]).await?;
//!
//! subscription.unsubscribe();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

// Re-export the wire contract.
pub use magic_circle_protocol::{
    current_timestamp_millis, looks_like_player_id, to_dice_string, ConfigSubcommand, Die,
    ItemProperty, Message, MessageType, MsgCmd, MsgRpc, RollInfo, RollValue, Rpc, Target,
    METADATA_ROOT, PLAYER_ALIASES_KEY, PROTOCOL_VERSION, ROOM_MESSAGES_KEY,
};

// Re-export the client engine.
pub use magic_circle_client::{
    claim_alias, find_player, unclaim_alias, AuthorNamePolicy, BatchHandler, ClientConfig,
    ClientError, Cursor, Host, HostError, HostSubscription, MessageBus, MessageSubscription,
    Metadata, MetadataHandler, Outgoing, PartyPlayer, PlayerIdentity,
};

/// Creates a message bus over the given host with default configuration.
///
/// This is the primary factory function; the returned bus is ready for
/// [`MessageBus::send`] and [`MessageBus::subscribe`].
pub fn create_message_bus(host: Arc<dyn Host>) -> MessageBus {
    MessageBus::new(host)
}

/// Creates a message bus with explicit configuration.
pub fn create_message_bus_with_config(host: Arc<dyn Host>, config: ClientConfig) -> MessageBus {
    MessageBus::with_config(host, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn facade_wires_protocol_and_client_together() {
        let host = Arc::new(mock_host::MockHost::new("Snail"));
        let bus = create_message_bus(host);

        let roll = RollInfo::new("check", vec![20.into(), 20.into()]);
        bus.send([MsgRpc::dice(to_dice_string(&roll, true), &roll)])
            .await
            .expect("Failed to send");
    }
}
