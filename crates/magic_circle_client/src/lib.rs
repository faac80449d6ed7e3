//! # Magic Circle Client - Shared Message Bus Engine
//!
//! The behavior half of Magic Circle: a small append-mostly message bus
//! layered on a key/value metadata store owned by the host platform, plus
//! the identity plumbing that message attribution depends on.
//!
//! ## Design Philosophy
//!
//! The client owns **no state of its own** - the shared room buffer in host
//! metadata is the source of truth on every operation:
//!
//! * **Snapshot discipline** - every send re-reads the stored buffer; every
//!   change notification is treated as a full resnapshot, never a diff
//! * **Optimistic concurrency** - the host store is last-writer-wins with no
//!   compare-and-swap; concurrent clients can race, and in-client batching
//!   is the only mitigation offered
//! * **Narrow host seam** - all platform access goes through the [`Host`]
//!   trait so tests can inject an in-memory store with controllable
//!   interleavings
//!
//! ## Core Components
//!
//! * **Message Bus** - [`MessageBus`] appends cooked messages to the bounded
//!   shared buffer and surfaces an incremental, cursor-based subscription
//!   over the host change feed
//! * **Identity Resolver** - [`find_player`] maps a subject string to a
//!   party member by id, then display name, then claimed alias
//! * **Alias Registry** - [`claim_alias`] / [`unclaim_alias`] manage the
//!   calling player's claimed identification strings
//! * **Sanitization** - free text is bounded and markup-escaped before it
//!   reaches the shared buffer
//!
//! ## Error Handling
//!
//! Only failed platform calls are errors ([`ClientError::Host`]). Identity
//! misses, malformed stored values, and oversized text all have defined
//! non-error outcomes; see the individual modules.

// Re-export core types and functions for easy access
pub use alias::{claim_alias, unclaim_alias};
pub use bus::{BatchHandler, Cursor, MessageBus, MessageSubscription, Outgoing};
pub use config::{AuthorNamePolicy, ClientConfig};
pub use error::ClientError;
pub use host::{
    Host, HostError, HostSubscription, Metadata, MetadataHandler, PartyPlayer, PlayerIdentity,
};
pub use resolver::{decode_aliases, find_player};

// Public module declarations
pub mod alias;
pub mod bus;
pub mod config;
pub mod error;
pub mod host;
pub mod resolver;
pub mod sanitize;
