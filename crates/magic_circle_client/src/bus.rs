//! The message bus: append and read engine for the shared room buffer.
//!
//! The buffer lives in room metadata under [`ROOM_MESSAGES_KEY`] and is
//! jointly owned by every client in the room. No client assumes its local
//! copy is current: every send re-reads the stored value, every
//! notification is treated as a full resnapshot. Two clients writing at
//! the same moment race and the later write wins; batching within one
//! client is the only mitigation offered, which is why [`MessageBus::send`]
//! takes a whole batch and writes once.

use crate::config::{AuthorNamePolicy, ClientConfig};
use crate::error::ClientError;
use crate::host::{Host, Metadata, MetadataHandler, PlayerIdentity};
use crate::resolver::find_player;
use crate::sanitize::{escape_markup, truncate_chars};
use magic_circle_protocol::{
    current_timestamp_millis, looks_like_player_id, Message, MsgCmd, MsgRpc, ROOM_MESSAGES_KEY,
};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace, warn};

/// Callback invoked with each non-empty batch of newly observed messages.
pub type BatchHandler = Arc<dyn Fn(Vec<Message>) + Send + Sync>;

/// One outgoing item: bare text or a partial message body.
#[derive(Debug, Clone, PartialEq)]
pub enum Outgoing {
    /// Shorthand for a chat message with this body.
    Text(String),
    /// A message body with whatever fields the sender cares to set.
    Msg(MsgRpc),
}

impl From<&str> for Outgoing {
    fn from(text: &str) -> Self {
        Outgoing::Text(text.to_string())
    }
}

impl From<String> for Outgoing {
    fn from(text: String) -> Self {
        Outgoing::Text(text)
    }
}

impl From<MsgRpc> for Outgoing {
    fn from(msg: MsgRpc) -> Self {
        Outgoing::Msg(msg)
    }
}

/// A subscriber's position in the message stream.
///
/// Id-based cursors are canonical: ids are monotonic and collision free,
/// so the "strictly after" suffix is exact. The timestamp form exists for
/// callers holding no prior [`Message`] (a frontend restoring scroll state
/// from a wall clock, say); two messages sharing a timestamp can straddle
/// that boundary and be skipped or duplicated once. That imprecision is
/// inherent to the fallback, not something the bus papers over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cursor {
    /// Deliver everything currently buffered.
    #[default]
    Start,
    /// Deliver messages with an id strictly greater than this.
    AfterId(u64),
    /// Deliver messages with a creation time strictly after this, in
    /// milliseconds since the epoch.
    AfterTime(u64),
}

impl Cursor {
    fn admits(&self, msg: &Message) -> bool {
        match self {
            Cursor::Start => true,
            Cursor::AfterId(id) => msg.id > *id,
            Cursor::AfterTime(time) => msg.time > *time,
        }
    }
}

impl From<&Message> for Cursor {
    /// The position just after an already-seen message.
    fn from(msg: &Message) -> Self {
        Cursor::AfterId(msg.id)
    }
}

/// An active message subscription.
///
/// Dropping the handle (or calling [`unsubscribe`](Self::unsubscribe))
/// detaches from the host change feed; notifications already in flight may
/// or may not still be delivered.
#[derive(Debug)]
pub struct MessageSubscription {
    inner: crate::host::HostSubscription,
}

impl MessageSubscription {
    /// Detaches from the host change feed.
    pub fn unsubscribe(self) {
        self.inner.cancel();
    }
}

/// The append/read engine over the shared room message buffer.
pub struct MessageBus {
    host: Arc<dyn Host>,
    config: ClientConfig,
}

impl MessageBus {
    /// Creates a bus over the given host with default configuration.
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self::with_config(host, ClientConfig::default())
    }

    /// Creates a bus over the given host with explicit configuration.
    pub fn with_config(host: Arc<dyn Host>, config: ClientConfig) -> Self {
        Self { host, config }
    }

    /// The configuration this bus was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends one or more messages attributed to the local player.
    ///
    /// Always batch when multiple messages go out back to back: the host
    /// coalesces metadata updates, so interleaved single-item writes from
    /// one client can drop each other's messages. The whole batch is
    /// cooked against one snapshot of the buffer and written back in a
    /// single store update.
    pub async fn send<I>(&self, batch: I) -> Result<(), ClientError>
    where
        I: IntoIterator,
        I::Item: Into<Outgoing>,
    {
        self.send_as(batch, None).await
    }

    /// Sends one or more messages, attributing authorless items to
    /// `sender` instead of the local player when given.
    pub async fn send_as<I>(
        &self,
        batch: I,
        sender: Option<PlayerIdentity>,
    ) -> Result<(), ClientError>
    where
        I: IntoIterator,
        I::Item: Into<Outgoing>,
    {
        let items: Vec<Outgoing> = batch.into_iter().map(Into::into).collect();
        debug!("sending batch of {} message(s)", items.len());

        let metadata = self.host.room_metadata().await?;
        let mut buffer = decode_buffer(&metadata);

        for item in items {
            let raw = match item {
                Outgoing::Text(text) => MsgRpc::chat(text),
                Outgoing::Msg(msg) => msg,
            };
            let cooked = self.cook(raw, &buffer, sender.as_ref()).await?;
            buffer.push(cooked);
            if buffer.len() >= self.config.buffer_capacity {
                buffer.remove(0);
            }
        }

        let mut patch = Metadata::new();
        patch.insert(ROOM_MESSAGES_KEY.to_string(), serde_json::to_value(&buffer)?);
        self.host.set_room_metadata(patch).await?;
        Ok(())
    }

    /// Subscribes to new messages as seen by the local player: whispers
    /// addressed to other players are filtered out.
    ///
    /// Already-buffered messages strictly after `since` are delivered
    /// immediately; each subsequent buffer change delivers the strictly
    /// new suffix. The callback is never invoked with an empty batch, no
    /// message is delivered twice to one subscription, and independent
    /// subscriptions never share cursor state.
    pub async fn subscribe(
        &self,
        since: Cursor,
        on_batch: BatchHandler,
    ) -> Result<MessageSubscription, ClientError> {
        let viewer = self.host.local_player().await?;
        self.subscribe_as(Some(viewer), since, on_batch).await
    }

    /// Subscribes with an explicit viewer for whisper filtering, or with
    /// no filtering at all when `viewer` is `None` (log tooling, bridges).
    pub async fn subscribe_as(
        &self,
        viewer: Option<PlayerIdentity>,
        since: Cursor,
        on_batch: BatchHandler,
    ) -> Result<MessageSubscription, ClientError> {
        let cursor = Arc::new(Mutex::new(since));

        let update: MetadataHandler = {
            let cursor = Arc::clone(&cursor);
            Arc::new(move |metadata: Metadata| {
                let buffer = decode_buffer(&metadata);

                // The cursor is this subscription's only memory of what it
                // has seen; each notification is a full resnapshot.
                let Ok(mut cursor) = cursor.lock() else {
                    return;
                };
                let Some(start) = buffer.iter().position(|m| cursor.admits(m)) else {
                    return;
                };
                let newest_id = buffer[buffer.len() - 1].id;
                *cursor = Cursor::AfterId(newest_id);
                drop(cursor);

                let batch: Vec<Message> = buffer[start..]
                    .iter()
                    .filter(|m| visible_to(viewer.as_ref(), m))
                    .cloned()
                    .collect();
                trace!(
                    "buffer change: {} new, {} visible",
                    buffer.len() - start,
                    batch.len()
                );
                if !batch.is_empty() {
                    (*on_batch)(batch);
                }
            })
        };

        // Deliver whatever is already buffered, then follow the feed.
        let snapshot = self.host.room_metadata().await?;
        (*update)(snapshot);
        let inner = self.host.on_room_metadata_change(update).await?;
        Ok(MessageSubscription { inner })
    }

    /// Cooks a raw message body into its stored form: attribution, id and
    /// timestamp assignment, text bounding, whisper resolution.
    async fn cook(
        &self,
        raw: MsgRpc,
        buffer: &[Message],
        sender: Option<&PlayerIdentity>,
    ) -> Result<Message, ClientError> {
        let (author, player) = self.attribute(raw.author.as_deref(), sender).await?;

        let whisper = match raw.whisper {
            None => None,
            Some(subject) => match find_player(self.host.as_ref(), &subject).await? {
                Some(target) => Some(target.id),
                None => Some(subject),
            },
        };

        let next_id = buffer.last().map(|m| m.id + 1).unwrap_or(0);
        Ok(Message {
            cmd: MsgCmd::Msg,
            id: next_id,
            time: current_timestamp_millis(),
            kind: raw.kind,
            text: escape_markup(truncate_chars(&raw.text, self.config.max_text_len)),
            author,
            player,
            whisper,
            metadata: raw.metadata,
        })
    }

    /// Resolves attribution for one message.
    ///
    /// No author supplied: the sending identity (local player unless
    /// `sender` overrides) provides both name and id. An author string
    /// supplied: resolve it against the party; on a miss the literal text
    /// stands (escaped) and the player stays unset unless `sender`
    /// overrides it.
    async fn attribute(
        &self,
        author: Option<&str>,
        sender: Option<&PlayerIdentity>,
    ) -> Result<(String, Option<String>), ClientError> {
        let Some(subject) = author else {
            let identity = match sender {
                Some(explicit) => explicit.clone(),
                None => self.host.local_player().await?,
            };
            return Ok((identity.name, Some(identity.id)));
        };

        match find_player(self.host.as_ref(), subject).await? {
            Some(found) => {
                let adopt = match self.config.author_names {
                    AuthorNamePolicy::IdLike => looks_like_player_id(subject),
                    AuthorNamePolicy::Always => true,
                    AuthorNamePolicy::Never => false,
                };
                let author = if adopt {
                    found.name
                } else {
                    escape_markup(subject)
                };
                Ok((author, Some(found.id)))
            }
            None => Ok((
                escape_markup(subject),
                sender.map(|explicit| explicit.id.clone()),
            )),
        }
    }
}

/// Decodes the stored message buffer out of a room metadata snapshot.
///
/// Anything other than a well-formed message array (missing key, wrong
/// type, undecodable entries) is the empty buffer.
fn decode_buffer(metadata: &Metadata) -> Vec<Message> {
    let Some(raw) = metadata.get(ROOM_MESSAGES_KEY) else {
        return Vec::new();
    };
    match serde_json::from_value(raw.clone()) {
        Ok(buffer) => buffer,
        Err(err) => {
            warn!("stored message buffer is malformed, treating as empty: {err}");
            Vec::new()
        }
    }
}

/// Whether a message should be shown to `viewer`.
///
/// Broadcasts go to everyone. Whispers go to the resolved target (by id,
/// or by display name when the target never resolved at send time) and to
/// their author. An unfiltered subscription sees everything.
fn visible_to(viewer: Option<&PlayerIdentity>, msg: &Message) -> bool {
    let Some(target) = &msg.whisper else {
        return true;
    };
    let Some(viewer) = viewer else {
        return true;
    };
    *target == viewer.id || *target == viewer.name || msg.player.as_deref() == Some(viewer.id.as_str())
}
