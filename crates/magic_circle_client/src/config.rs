//! Client configuration types and defaults.
//!
//! The defaults mirror the deployed protocol limits; changing them on one
//! client desynchronizes it from the rest of the room, so overrides are
//! mainly useful in tests.

use serde::{Deserialize, Serialize};

/// Default for `buffer_capacity`
fn default_buffer_capacity() -> usize {
    5
}

/// Default for `max_text_len`
fn default_max_text_len() -> usize {
    200
}

/// Configuration for a [`crate::MessageBus`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Capacity ceiling of the shared message buffer. The bus evicts from
    /// the front whenever an append reaches this ceiling.
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// Maximum message body length in characters. Longer bodies are
    /// silently truncated before escaping.
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,

    /// When a caller-supplied author string resolves to a player, whether
    /// the resolved display name replaces the supplied text.
    #[serde(default)]
    pub author_names: AuthorNamePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_buffer_capacity(),
            max_text_len: default_max_text_len(),
            author_names: AuthorNamePolicy::default(),
        }
    }
}

/// Policy for adopting a resolved player's display name as the stored
/// `author` of a message.
///
/// The protocol has historically conditioned adoption on the shape of the
/// supplied string, so the choice is an explicit knob rather than a hard
/// rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorNamePolicy {
    /// Adopt the resolved display name only when the supplied author
    /// string looks like an opaque player id (a hyphenated GUID).
    /// Character names given outright stay as written even when they
    /// match a player.
    #[default]
    IdLike,
    /// Always adopt the resolved display name.
    Always,
    /// Never adopt it; the supplied text always stands.
    Never,
}
