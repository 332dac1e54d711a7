//! Snapshot wire encoding (bincode).

use crate::core::SyncError;
use crate::room::Snapshot;

/// Encode a snapshot for storage or transport.
pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>, SyncError> {
    bincode::serialize(snapshot).map_err(|e| SyncError::Codec(e.to_string()))
}

/// Decode a stored snapshot.
pub fn decode(bytes: &[u8]) -> Result<Snapshot, SyncError> {
    bincode::deserialize(bytes).map_err(|e| SyncError::Codec(e.to_string()))
}
