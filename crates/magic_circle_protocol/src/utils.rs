//! Shared utility functions.

use uuid::Uuid;

/// Returns the current Unix timestamp in milliseconds.
///
/// All message timestamps use this function so ordering comparisons across
/// the codebase agree on precision.
///
/// # Panics
///
/// Panics if the system clock is set to a time before the Unix epoch
/// (January 1, 1970). This should never happen in practice on modern
/// systems.
pub fn current_timestamp_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

/// Whether a subject string has the shape of a host player id.
///
/// Player ids are hyphenated GUIDs. Attribution uses this to decide whether
/// a caller-supplied author string was meant as an opaque identifier (and
/// should be replaced by the resolved display name) or as display text in
/// its own right.
pub fn looks_like_player_id(subject: &str) -> bool {
    subject.contains('-') && Uuid::try_parse(subject).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_shapes_are_player_ids() {
        assert!(looks_like_player_id("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!looks_like_player_id("Mordenkainen"));
        assert!(!looks_like_player_id("550e8400e29b41d4a716446655440000")); // no hyphens
        assert!(!looks_like_player_id(""));
    }

    #[test]
    fn timestamps_are_milliseconds() {
        // Sanity bound: after 2020-01-01 in ms, not in seconds.
        assert!(current_timestamp_millis() > 1_577_836_800_000);
    }
}
