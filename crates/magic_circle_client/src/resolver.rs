//! Identity resolution.
//!
//! Maps a human-supplied subject string (id, display name, or claimed
//! alias) to a concrete party member. Attribution and whisper addressing
//! both go through here.

use crate::host::{Host, HostError, Metadata, PartyPlayer};
use magic_circle_protocol::PLAYER_ALIASES_KEY;

/// Attempts to find a player by id, display name, or claimed alias.
///
/// Fetches the party roster once, then runs three ordered passes over that
/// snapshot, short-circuiting on the first match. Pass order is load
/// bearing: a subject that is simultaneously one player's id and another
/// player's display name always resolves as the id.
///
/// Returns `Ok(None)` when no pass matches; callers fall back to treating
/// the subject as literal display text. Only a failed roster fetch is an
/// error.
pub async fn find_player(
    host: &dyn Host,
    subject: &str,
) -> Result<Option<PartyPlayer>, HostError> {
    let players = host.party_players().await?;

    let by_id = players.iter().find(|p| p.id == subject);
    let by_name = || players.iter().find(|p| p.name == subject);
    let by_alias = || {
        players
            .iter()
            .find(|p| decode_aliases(&p.metadata).iter().any(|a| a == subject))
    };

    Ok(by_id.or_else(by_name).or_else(by_alias).cloned())
}

/// Reads a player's claimed alias list out of a metadata bag.
///
/// A missing or malformed value is the empty set, never an error.
pub fn decode_aliases(metadata: &Metadata) -> Vec<String> {
    metadata
        .get(PLAYER_ALIASES_KEY)
        .and_then(|raw| serde_json::from_value(raw.clone()).ok())
        .unwrap_or_default()
}
