//! Versioned snapshot storage.
//!
//! The store is the single shared record every client in a room reads and
//! writes. Writes are compare-and-set on a monotonically increasing version:
//! a publish whose version is not strictly newer than the stored one is
//! rejected, which is how concurrent clients detect that someone else won.

use std::sync::{Mutex, MutexGuard};

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use super::codec;
use crate::core::SyncError;
use crate::room::Snapshot;

/// Monotonic snapshot version. The first publish for a code is version 1.
pub type Version = u64;

/// A value tagged with the version it was stored under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned<T> {
    pub version: Version,
    pub value: T,
}

impl<T> Versioned<T> {
    #[must_use]
    pub fn new(version: Version, value: T) -> Self {
        Self { version, value }
    }
}

/// Shared room store, keyed by invite code.
///
/// Implementations must make `publish` atomic with respect to its version
/// check. Network-backed transports implement the same trait.
pub trait SnapshotStore: Send + Sync {
    /// Store `snapshot` under `code` as `version`.
    ///
    /// Fails with `StaleVersion` unless `version` is strictly newer than the
    /// stored version. A new code must start at version 1.
    fn publish(&self, code: &str, snapshot: &Snapshot, version: Version) -> Result<(), SyncError>;

    /// Latest snapshot for `code`, if the room exists.
    fn pull(&self, code: &str) -> Result<Option<Versioned<Snapshot>>, SyncError>;

    /// Discard the record for `code` if it is still at `expected`.
    ///
    /// Fails with `StaleVersion` when a newer write has landed since
    /// `expected` was read. Removing a missing code is not an error.
    fn remove(&self, code: &str, expected: Version) -> Result<(), SyncError>;

    /// True iff a record exists for `code`.
    fn contains(&self, code: &str) -> Result<bool, SyncError> {
        Ok(self.pull(code)?.is_some())
    }
}

/// In-process store shared through `Arc` by every client in a process.
///
/// Snapshots are kept bincode-encoded, so each pull hands back an
/// independent copy the way a remote transport would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<FxHashMap<String, (Version, Vec<u8>)>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored version for `code`.
    pub fn version(&self, code: &str) -> Option<Version> {
        self.lock().ok()?.get(code).map(|(version, _)| *version)
    }

    fn lock(&self) -> Result<MutexGuard<'_, FxHashMap<String, (Version, Vec<u8>)>>, SyncError> {
        self.records
            .lock()
            .map_err(|_| SyncError::Unavailable("memory store lock poisoned".into()))
    }
}

impl SnapshotStore for MemoryStore {
    fn publish(&self, code: &str, snapshot: &Snapshot, version: Version) -> Result<(), SyncError> {
        // Encode outside the lock
        let bytes = codec::encode(snapshot)?;
        let mut records = self.lock()?;
        let stored = records.get(code).map(|(v, _)| *v);
        let accepted = match stored {
            Some(stored) => version > stored,
            None => version == 1,
        };
        if !accepted {
            let stored = stored.unwrap_or(0);
            warn!(
                "Rejected publish to {}: stored v{}, attempted v{}",
                code, stored, version
            );
            return Err(SyncError::StaleVersion {
                stored,
                attempted: version,
            });
        }
        records.insert(code.to_owned(), (version, bytes));
        debug!("Published {} v{}", code, version);
        Ok(())
    }

    fn pull(&self, code: &str) -> Result<Option<Versioned<Snapshot>>, SyncError> {
        let record = self.lock()?.get(code).cloned();
        match record {
            Some((version, bytes)) => Ok(Some(Versioned::new(version, codec::decode(&bytes)?))),
            None => Ok(None),
        }
    }

    fn remove(&self, code: &str, expected: Version) -> Result<(), SyncError> {
        let mut records = self.lock()?;
        match records.get(code).map(|(v, _)| *v) {
            None => Ok(()),
            Some(stored) if stored != expected => {
                warn!(
                    "Rejected removal of {}: stored v{}, expected v{}",
                    code, stored, expected
                );
                Err(SyncError::StaleVersion {
                    stored,
                    attempted: expected,
                })
            }
            Some(_) => {
                records.remove(code);
                debug!("Removed room {} at v{}", code, expected);
                Ok(())
            }
        }
    }

    fn contains(&self, code: &str) -> Result<bool, SyncError> {
        Ok(self.lock()?.contains_key(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::room::{Room, RoomId};

    fn snapshot(code: &str) -> Snapshot {
        Snapshot::new(Room::new(RoomId(1), code, PlayerId::new(1), "Host"))
    }

    #[test]
    fn test_first_write_must_be_version_one() {
        let store = MemoryStore::new();
        let snap = snapshot("AAAAAA");
        assert_eq!(
            store.publish("AAAAAA", &snap, 2),
            Err(SyncError::StaleVersion { stored: 0, attempted: 2 })
        );
        store.publish("AAAAAA", &snap, 1).unwrap();
        assert_eq!(store.version("AAAAAA"), Some(1));
    }

    #[test]
    fn test_equal_or_older_versions_rejected() {
        let store = MemoryStore::new();
        let snap = snapshot("AAAAAA");
        store.publish("AAAAAA", &snap, 1).unwrap();
        store.publish("AAAAAA", &snap, 2).unwrap();

        for attempted in [1, 2] {
            assert_eq!(
                store.publish("AAAAAA", &snap, attempted),
                Err(SyncError::StaleVersion { stored: 2, attempted })
            );
        }
        assert_eq!(store.version("AAAAAA"), Some(2));
    }

    #[test]
    fn test_pull_returns_independent_copies() {
        let store = MemoryStore::new();
        store.publish("AAAAAA", &snapshot("AAAAAA"), 1).unwrap();

        let mut first = store.pull("AAAAAA").unwrap().unwrap();
        first.value.room.players.clear();
        let second = store.pull("AAAAAA").unwrap().unwrap();
        assert_eq!(second.version, 1);
        assert_eq!(second.value.room.players.len(), 1);
    }

    #[test]
    fn test_remove_refuses_newer_record() {
        let store = MemoryStore::new();
        let snap = snapshot("AAAAAA");
        store.publish("AAAAAA", &snap, 1).unwrap();
        store.publish("AAAAAA", &snap, 2).unwrap();

        assert_eq!(
            store.remove("AAAAAA", 1),
            Err(SyncError::StaleVersion { stored: 2, attempted: 1 })
        );
        assert!(store.contains("AAAAAA").unwrap());
        store.remove("AAAAAA", 2).unwrap();
        assert!(!store.contains("AAAAAA").unwrap());
    }

    #[test]
    fn test_remove_and_contains() {
        let store = MemoryStore::new();
        assert!(!store.contains("AAAAAA").unwrap());
        store.publish("AAAAAA", &snapshot("AAAAAA"), 1).unwrap();
        assert!(store.contains("AAAAAA").unwrap());
        assert_eq!(store.len(), 1);

        store.remove("AAAAAA", 1).unwrap();
        store.remove("AAAAAA", 1).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.pull("AAAAAA").unwrap(), None);
    }
}
