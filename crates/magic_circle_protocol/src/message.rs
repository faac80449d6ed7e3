//! Stored message definitions.
//!
//! Messages in the shared room buffer are cooked [`MsgRpc`] values: the bus
//! has assigned an id and timestamp, resolved attribution, and bounded the
//! text. Consumers of the client API see these, never the raw RPC forms.

use crate::dice::RollInfo;
use crate::rpc::{MessageType, MsgRpc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminant pinning stored messages to `cmd = "msg"`.
///
/// Buffer entries carry the command tag on the wire so they remain valid
/// [`crate::Rpc`] values; a one-variant enum keeps that fixed at the type
/// level instead of as a free-form string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MsgCmd {
    #[default]
    #[serde(rename = "msg")]
    Msg,
}

/// A human readable message, as stored in the shared room buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Command discriminant, always `"msg"`.
    #[serde(default)]
    pub cmd: MsgCmd,

    /// Unique, monotonically increasing identifier for this message.
    /// Strictly increasing in buffer order; never reused.
    pub id: u64,

    /// Timestamp the message was sent, in milliseconds since the epoch.
    pub time: u64,

    /// The kind of message represented.
    #[serde(rename = "type", default)]
    pub kind: MessageType,

    /// Body of the message, bounded and markup-escaped by the bus.
    #[serde(default)]
    pub text: String,

    /// Name attributed to this message by the source. Often a character
    /// name.
    #[serde(default)]
    pub author: String,

    /// Player ID associated with this message, absent if attribution
    /// found no player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,

    /// Resolved recipient (player id, or the literal target when it never
    /// resolved). Present only on whispered messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whisper: Option<String>,

    /// Structured payload carried through from the sender untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Message {
    /// The roll data of a dice message, when present and well formed.
    pub fn roll(&self) -> Option<RollInfo> {
        if self.kind != MessageType::Dice {
            return None;
        }
        self.metadata
            .clone()
            .and_then(|m| serde_json::from_value(m).ok())
    }

    /// The uncooked body of this message, useful for re-sending.
    pub fn to_rpc(&self) -> MsgRpc {
        MsgRpc {
            kind: self.kind,
            text: self.text.clone(),
            author: Some(self.author.clone()),
            whisper: self.whisper.clone(),
            metadata: self.metadata.clone(),
        }
    }
}
