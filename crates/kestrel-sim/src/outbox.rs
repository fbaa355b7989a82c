//! Encoded snapshots waiting for the transport.

use std::collections::VecDeque;

use kestrel_replication::{CharacterSnapshot, ReplicationError};

/// Queue of wire-format snapshots, oldest first.
///
/// The authority pushes one entry per fixed tick. The transport drains it at
/// whatever cadence it sends; ordering is preserved.
#[derive(Debug, Clone, Default)]
pub struct SnapshotOutbox {
    queue: VecDeque<Vec<u8>>,
}

impl SnapshotOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes and queues `snapshot`.
    pub fn publish(&mut self, snapshot: &CharacterSnapshot) -> Result<(), ReplicationError> {
        self.queue.push_back(snapshot.encode()?);
        Ok(())
    }

    /// Removes and yields everything queued, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = Vec<u8>> + '_ {
        self.queue.drain(..)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
