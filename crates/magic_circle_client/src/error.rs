//! Error types for client operations.
//!
//! Only genuine platform failures surface as errors. Identity lookups that
//! find nobody return `None`, malformed stored values decode as empty
//! defaults, and oversized message text is truncated, none of which are
//! error conditions.

use crate::host::HostError;

/// Enumeration of possible client errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A host platform call failed and the surrounding operation was
    /// abandoned.
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// The outgoing message buffer could not be encoded for storage.
    #[error("failed to encode message buffer: {0}")]
    Encode(#[from] serde_json::Error),
}
