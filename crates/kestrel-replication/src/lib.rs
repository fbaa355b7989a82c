//! Authoritative character properties and the replication boundary.
//!
//! The authority owns a [`PropertyStore`] and publishes one
//! [`CharacterSnapshot`] per fixed tick. Observers hold a [`ReplicaBuffer`]
//! that accepts snapshots from the transport and commits the newest one at
//! their own fixed-tick boundary.

pub mod properties;
pub mod replica;
pub mod snapshot;

pub use properties::{AuthoritativeProperties, FireAttempt, FireParams, PropertyStore};
pub use replica::ReplicaBuffer;
pub use snapshot::{CharacterSnapshot, SNAPSHOT_VERSION};

/// Errors raised at the replication boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReplicationError {
    /// A snapshot arrived that is not newer than one already accepted.
    #[error("stale snapshot for tick {received}, already have tick {latest}")]
    StaleSnapshot {
        /// Tick carried by the rejected snapshot.
        received: u64,
        /// Newest tick accepted so far.
        latest: u64,
    },

    /// The snapshot was produced by an incompatible build.
    #[error("snapshot version {found} does not match expected {expected}")]
    VersionMismatch {
        /// Version byte found on the wire.
        found: u8,
        /// Version this build writes.
        expected: u8,
    },

    /// Serializing a snapshot failed.
    #[error("failed to encode snapshot: {0}")]
    Encode(String),

    /// Deserializing a snapshot failed.
    #[error("failed to decode snapshot: {0}")]
    Decode(String),
}
