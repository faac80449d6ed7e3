//! RPC command definitions for the Magic Circle wire protocol.
//!
//! Every value exchanged between Magic Circle endpoints is one of the
//! variants of [`Rpc`], discriminated by its `cmd` field. Most variants are
//! passive schemas for host-side plumbing (metadata get/set, item
//! manipulation, connection lifecycle); only [`Rpc::Msg`] has real client
//! behavior, implemented by the message bus.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A command on the Magic Circle wire, discriminated by its `cmd` tag.
///
/// The tag fully determines which other fields are present. Serialization is
/// internally tagged, so `{"cmd": "ping"}` round-trips to [`Rpc::Ping`] and
/// a `msg` command carries the [`MsgRpc`] fields inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "kebab-case")]
pub enum Rpc {
    /// Sent immediately after a connection is established.
    Open {
        /// Version number of the wire protocol the sender expects.
        version: u32,
        /// Room ID the connection is scoped to.
        room: String,
        /// Any other data the user configured to be sent on open.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
    /// Manage some aspect of the dispatcher's configuration.
    Config {
        subcmd: ConfigSubcommand,
        args: Value,
    },
    /// Liveness probe. Expects a `pong` in response.
    Ping,
    /// Response to a `ping`.
    Pong,
    /// Set a value stored in metadata.
    Set {
        /// Where the metadata is stored.
        target: Target,
        /// When `target` is `item`, a filter or search string describing
        /// the items to modify.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item: Option<String>,
        /// Metadata key to set.
        key: String,
        /// New value of the metadata.
        value: Value,
    },
    /// Set an item's built-in properties rather than its metadata.
    SetItem {
        /// A filter or search string describing the items to modify.
        item: String,
        /// The property being set.
        key: ItemProperty,
        /// The new value of the property.
        value: Value,
    },
    /// Retrieve a value stored somewhere in metadata. A `reply` carrying
    /// the same `reply_id` is expected.
    Get {
        /// Where the metadata is stored.
        target: Target,
        /// When `target` is `item`, a filter or search string describing
        /// the items to retrieve.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item: Option<String>,
        /// Metadata key to retrieve.
        key: String,
        /// Echoed back in the reply.
        reply_id: u64,
    },
    /// Post a message to the shared message buffer.
    Msg(MsgRpc),
    /// A reply to a previous `get`.
    Reply {
        /// Copied from the `reply_id` of the originating command.
        reply_id: u64,
        /// Contents of the reply.
        data: Value,
    },
    /// Error notification.
    Error {
        /// Command and subcommand that originated the error.
        context: String,
        /// If the originating RPC had a `reply_id`, it is copied here.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reply_id: Option<u64>,
        /// Error message.
        msg: String,
    },
}

/// Subcommands accepted by [`Rpc::Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSubcommand {
    Reload,
}

/// Metadata scopes addressable by [`Rpc::Set`] and [`Rpc::Get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Room,
    Scene,
    Item,
    Player,
}

/// Item properties settable through [`Rpc::SetItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemProperty {
    Name,
    Visible,
    Locked,
    ZIndex,
    Position,
    Rotation,
    Scale,
    Layer,
    AttachedTo,
    DisableHit,
    DisableAutoZIndex,
}

/// The kind of message a [`MsgRpc`] represents.
///
/// - `chat`: a human generated chat message
/// - `dice`: dice roll information, with [`crate::RollInfo`] in `metadata`
/// - `info`: a system generated informational message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Chat,
    Dice,
    Info,
}

/// The body of a `msg` command, as supplied by a sender.
///
/// This is the raw, uncooked form: the message bus assigns ids and
/// timestamps, resolves attribution, and bounds the text before anything is
/// stored (see [`crate::Message`] for the cooked result).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MsgRpc {
    /// The kind of message represented.
    #[serde(rename = "type", default)]
    pub kind: MessageType,

    /// Body of the message.
    #[serde(default)]
    pub text: String,

    /// Person the message is attributed to, often a character name. The
    /// bus will attempt to associate an id-looking value with a player by
    /// id, a plain value by player name, then by claimed aliases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Person the message is directed to. Frontends should not display the
    /// message to anyone else when this is present. Hidden, not private:
    /// anyone can still read the room metadata. Subject to the same player
    /// association as `author`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whisper: Option<String>,

    /// Optional additional data carried through untouched. Dice messages
    /// put their [`crate::RollInfo`] here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl MsgRpc {
    /// A chat message with the given body.
    pub fn chat(text: impl Into<String>) -> Self {
        Self {
            kind: MessageType::Chat,
            text: text.into(),
            ..Self::default()
        }
    }

    /// A system informational message with the given body.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageType::Info,
            text: text.into(),
            ..Self::default()
        }
    }

    /// A dice message carrying the given roll as structured metadata.
    ///
    /// Falls back to a plain dice message with no metadata if the roll
    /// cannot be represented as JSON, which cannot happen for any
    /// [`crate::RollInfo`] built from ordinary values.
    pub fn dice(text: impl Into<String>, roll: &crate::RollInfo) -> Self {
        Self {
            kind: MessageType::Dice,
            text: text.into(),
            metadata: serde_json::to_value(roll).ok(),
            ..Self::default()
        }
    }

    /// Attribute this message to the given subject.
    pub fn from_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Direct this message at the given subject.
    pub fn whisper_to(mut self, target: impl Into<String>) -> Self {
        self.whisper = Some(target.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cmd_tag_selects_variant() {
        let rpc: Rpc = serde_json::from_value(json!({"cmd": "ping"}))
            .expect("Failed to parse ping");
        assert_eq!(rpc, Rpc::Ping);

        let rpc: Rpc = serde_json::from_value(json!({
            "cmd": "open",
            "version": 1,
            "room": "abc123",
        }))
        .expect("Failed to parse open");
        assert_eq!(
            rpc,
            Rpc::Open {
                version: 1,
                room: "abc123".to_string(),
                data: None,
            }
        );
    }

    #[test]
    fn set_item_uses_kebab_tag_and_camel_case_keys() {
        let rpc = Rpc::SetItem {
            item: "goblin".to_string(),
            key: ItemProperty::AttachedTo,
            value: json!("wizard"),
        };
        let wire = serde_json::to_value(&rpc).expect("Failed to serialize set-item");
        assert_eq!(wire["cmd"], "set-item");
        assert_eq!(wire["key"], "attachedTo");
    }

    #[test]
    fn get_round_trips_with_optional_item_filter() {
        let rpc = Rpc::Get {
            target: Target::Item,
            item: Some("name:torch".to_string()),
            key: "aura".to_string(),
            reply_id: 7,
        };
        let wire = serde_json::to_string(&rpc).expect("Failed to serialize get");
        let back: Rpc = serde_json::from_str(&wire).expect("Failed to parse get");
        assert_eq!(back, rpc);

        // The filter is omitted from the wire entirely when absent.
        let rpc = Rpc::Get {
            target: Target::Room,
            item: None,
            key: "theme".to_string(),
            reply_id: 8,
        };
        let wire = serde_json::to_value(&rpc).expect("Failed to serialize get");
        assert!(wire.get("item").is_none());
    }

    #[test]
    fn msg_fields_inline_under_msg_tag() {
        let rpc = Rpc::Msg(MsgRpc::chat("hello").from_author("Mordenkainen"));
        let wire = serde_json::to_value(&rpc).expect("Failed to serialize msg");
        assert_eq!(wire["cmd"], "msg");
        assert_eq!(wire["type"], "chat");
        assert_eq!(wire["text"], "hello");
        assert_eq!(wire["author"], "Mordenkainen");
        assert!(wire.get("whisper").is_none());
    }

    #[test]
    fn error_round_trips() {
        let rpc = Rpc::Error {
            context: "get:aura".to_string(),
            reply_id: Some(7),
            msg: "no such key".to_string(),
        };
        let wire = serde_json::to_string(&rpc).expect("Failed to serialize error");
        let back: Rpc = serde_json::from_str(&wire).expect("Failed to parse error");
        assert_eq!(back, rpc);
    }

    #[test]
    fn msg_defaults_to_empty_chat() {
        let msg: MsgRpc = serde_json::from_value(json!({})).expect("Failed to parse empty msg");
        assert_eq!(msg.kind, MessageType::Chat);
        assert_eq!(msg.text, "");
        assert!(msg.author.is_none());
    }
}
