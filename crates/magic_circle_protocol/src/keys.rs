//! Reserved metadata keys.
//!
//! All Magic Circle state lives under a namespaced prefix in the host's
//! generic metadata store. The strings match the deployed browser
//! extension so both client generations read and write the same buffers.

/// Root path for all Magic Circle metadata.
pub const METADATA_ROOT: &str = "moe.snail.magic-circle";

/// Path to the message buffer, in room metadata (`Vec<Message>`).
pub const ROOM_MESSAGES_KEY: &str = "moe.snail.magic-circle/messages";

/// Path to a player's claimed alias list, in player metadata (`Vec<String>`).
pub const PLAYER_ALIASES_KEY: &str = "moe.snail.magic-circle/aliases";
