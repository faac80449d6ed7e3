//! The alias registry.
//!
//! Players claim extra strings they can be identified by (character names,
//! nicknames) in their own metadata bag. The identity resolver's third
//! pass consults these. Each player only ever writes their own bag; the
//! host's last-writer-wins merge is the only synchronization.

use crate::host::{Host, HostError, Metadata};
use crate::resolver::decode_aliases;
use magic_circle_protocol::PLAYER_ALIASES_KEY;
use serde_json::Value;
use tracing::debug;

/// Adds `alias` to the calling player's claimed alias set.
///
/// Idempotent: claiming an alias already present is a no-op and issues no
/// write. The stored list is re-read, copied, and written back whole.
pub async fn claim_alias(host: &dyn Host, alias: &str) -> Result<(), HostError> {
    let metadata = host.player_metadata().await?;
    let mut aliases = decode_aliases(&metadata);
    if aliases.iter().any(|a| a == alias) {
        return Ok(());
    }
    aliases.push(alias.to_string());
    debug!("claiming alias {alias:?}");
    write_aliases(host, aliases).await
}

/// Removes `alias` from the calling player's claimed alias set.
///
/// Idempotent: unclaiming an absent alias is a no-op and issues no write.
pub async fn unclaim_alias(host: &dyn Host, alias: &str) -> Result<(), HostError> {
    let metadata = host.player_metadata().await?;
    let mut aliases = decode_aliases(&metadata);
    let before = aliases.len();
    aliases.retain(|a| a != alias);
    if aliases.len() == before {
        return Ok(());
    }
    debug!("unclaiming alias {alias:?}");
    write_aliases(host, aliases).await
}

async fn write_aliases(host: &dyn Host, aliases: Vec<String>) -> Result<(), HostError> {
    let mut patch = Metadata::new();
    patch.insert(PLAYER_ALIASES_KEY.to_string(), Value::from(aliases));
    host.set_player_metadata(patch).await
}
