//! # Magic Circle Protocol
//!
//! Wire contract for the Magic Circle message bus. This crate defines the
//! shapes exchanged between Magic Circle clients through the host platform's
//! shared metadata store, with no behavior of its own beyond pure formatting
//! helpers.
//!
//! ## Core Types
//!
//! - [`Rpc`] - The `cmd`-tagged command union covering every wire shape
//! - [`MsgRpc`] - The message body a sender supplies (the only RPC with
//!   client-side behavior, implemented in `magic_circle_client`)
//! - [`Message`] - The cooked form stored in the shared room buffer
//! - [`RollInfo`] - Structured dice roll data carried by dice messages
//!
//! ## Design Principles
//!
//! - **Tag determines shape**: each [`Rpc`] variant carries exactly the
//!   fields its `cmd` tag implies, enforced by the type system rather than
//!   validated at runtime
//! - **Interop**: stored messages and reserved metadata keys serialize
//!   byte-compatibly with the deployed browser-extension client
//! - **No I/O**: everything here is plain data plus deterministic functions

pub mod dice;
pub mod keys;
pub mod message;
pub mod rpc;
pub mod utils;

pub use dice::{to_dice_string, Die, RollInfo, RollValue};
pub use keys::{METADATA_ROOT, PLAYER_ALIASES_KEY, ROOM_MESSAGES_KEY};
pub use message::{Message, MsgCmd};
pub use rpc::{ConfigSubcommand, ItemProperty, MessageType, MsgRpc, Rpc, Target};
pub use utils::{current_timestamp_millis, looks_like_player_id};

/// Version number of the wire protocol, carried by [`Rpc::Open`].
pub const PROTOCOL_VERSION: u32 = 1;
