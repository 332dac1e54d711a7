//! Shared-record synchronization.
//!
//! Clients never talk to each other directly. Each one publishes whole
//! snapshots to a versioned [`SnapshotStore`] and reconciles against it,
//! either on demand or from a background [poller](spawn_poller).

pub mod channel;
pub mod codec;
pub mod poller;
pub mod store;

pub use channel::{Reconciled, SyncChannel};
pub use poller::{spawn_poller, PollStatus, PollTarget, PollerHandle};
pub use store::{MemoryStore, SnapshotStore, Version, Versioned};
