//! Client side of the shared store.
//!
//! A `SyncChannel` holds one client's view of a room together with the
//! version it was read at. All writes go through [`SyncChannel::commit`],
//! which applies the caller's mutation to a private copy of the latest
//! snapshot and publishes it whole.

use std::sync::Arc;

use tracing::{debug, warn};

use super::store::{SnapshotStore, Version, Versioned};
use crate::core::SyncError;
use crate::room::Snapshot;

/// Attempts `commit` makes before giving up with `Conflict`.
const COMMIT_ATTEMPTS: usize = 2;

/// Result of a reconcile pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciled {
    /// Adopted a newer remote snapshot.
    Updated,
    /// Local view was already current.
    Unchanged,
}

/// One client's versioned view of a room.
pub struct SyncChannel {
    store: Arc<dyn SnapshotStore>,
    code: String,
    local: Versioned<Snapshot>,
}

impl std::fmt::Debug for SyncChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncChannel")
            .field("code", &self.code)
            .field("version", &self.local.version)
            .finish()
    }
}

impl SyncChannel {
    /// Publish a brand-new room as version 1.
    pub fn open(store: Arc<dyn SnapshotStore>, snapshot: Snapshot) -> Result<Self, SyncError> {
        let code = snapshot.room.invite_code.clone();
        store.publish(&code, &snapshot, 1)?;
        Ok(Self {
            store,
            code,
            local: Versioned::new(1, snapshot),
        })
    }

    /// Attach to an existing room.
    pub fn attach(store: Arc<dyn SnapshotStore>, code: &str) -> Result<Self, SyncError> {
        let local = store
            .pull(code)?
            .ok_or_else(|| SyncError::RoomClosed(code.to_owned()))?;
        Ok(Self {
            store,
            code: code.to_owned(),
            local,
        })
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.local.value
    }

    #[must_use]
    pub fn version(&self) -> Version {
        self.local.version
    }

    /// Adopt the remote snapshot if it is newer than the local one.
    ///
    /// Last write wins by version. A missing record means the room was
    /// discarded and reports `RoomClosed`.
    pub fn reconcile(&mut self) -> Result<Reconciled, SyncError> {
        let remote = self.pull_latest()?;
        if remote.version > self.local.version {
            debug!(
                "{}: adopting v{} over local v{}",
                self.code, remote.version, self.local.version
            );
            self.local = remote;
            Ok(Reconciled::Updated)
        } else {
            Ok(Reconciled::Unchanged)
        }
    }

    /// Apply `mutation` to the latest snapshot and publish the result.
    ///
    /// The mutation runs against a private draft; if it fails nothing is
    /// published. When another client wins the write race the mutation is
    /// replayed once against the newer snapshot; losing twice adopts the
    /// remote and reports `Conflict`. A mutation that leaves the room without
    /// seats removes the record from the store instead of publishing it.
    pub fn commit<T, E>(
        &mut self,
        mut mutation: impl FnMut(&mut Snapshot) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<SyncError>,
    {
        for attempt in 1..=COMMIT_ATTEMPTS {
            let latest = self.pull_latest()?;
            let mut draft = latest.value.clone();
            let base = latest.version;
            if base > self.local.version {
                self.local = latest;
            }

            let output = mutation(&mut draft)?;

            let abandoned = draft.is_abandoned();
            if !abandoned && draft == self.local.value && base == self.local.version {
                return Ok(output);
            }

            // An emptied room is removed, guarded by the version it was read at
            let written = if abandoned {
                self.store.remove(&self.code, base)
            } else {
                self.store.publish(&self.code, &draft, base + 1)
            };
            match written {
                Ok(()) => {
                    if abandoned {
                        debug!("{}: last seat left, room discarded", self.code);
                    }
                    self.local = Versioned::new(base + 1, draft);
                    return Ok(output);
                }
                Err(SyncError::StaleVersion { stored, .. }) => {
                    warn!(
                        "{}: lost write race at v{} (stored v{}), attempt {}",
                        self.code,
                        base + 1,
                        stored,
                        attempt
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        if let Some(remote) = self.store.pull(&self.code)? {
            self.local = remote;
        }
        Err(SyncError::Conflict.into())
    }

    fn pull_latest(&self) -> Result<Versioned<Snapshot>, SyncError> {
        self.store
            .pull(&self.code)?
            .ok_or_else(|| SyncError::RoomClosed(self.code.clone()))
    }
}
