//! The per-tick replication unit and its wire format.
//!
//! Wire layout: one version byte followed by the postcard encoding of
//! [`CharacterSnapshot`]. Snapshots are always complete; there is no delta
//! against a previous tick, so any single snapshot is enough to present the
//! character.

use kestrel_motion::KinematicState;
use serde::{Deserialize, Serialize};

use crate::ReplicationError;
use crate::properties::AuthoritativeProperties;

/// Current wire format version.
pub const SNAPSHOT_VERSION: u8 = 1;

/// Everything the authority publishes for one character on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    /// Fixed tick this snapshot was committed on.
    pub tick: u64,
    /// Kinematic state after the tick.
    pub kinematic: KinematicState,
    /// Networked properties after the tick.
    pub properties: AuthoritativeProperties,
}

impl CharacterSnapshot {
    /// Serializes to the versioned wire format.
    pub fn encode(&self) -> Result<Vec<u8>, ReplicationError> {
        let body =
            postcard::to_allocvec(self).map_err(|e| ReplicationError::Encode(e.to_string()))?;
        let mut bytes = Vec::with_capacity(body.len() + 1);
        bytes.push(SNAPSHOT_VERSION);
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    /// Parses the versioned wire format.
    pub fn decode(bytes: &[u8]) -> Result<Self, ReplicationError> {
        let (&version, body) = bytes
            .split_first()
            .ok_or_else(|| ReplicationError::Decode("empty buffer".to_string()))?;
        if version != SNAPSHOT_VERSION {
            return Err(ReplicationError::VersionMismatch {
                found: version,
                expected: SNAPSHOT_VERSION,
            });
        }
        postcard::from_bytes(body).map_err(|e| ReplicationError::Decode(e.to_string()))
    }
}
