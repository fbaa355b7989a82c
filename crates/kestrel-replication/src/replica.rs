//! Observer-side holder for replicated snapshots.

use tracing::warn;

use crate::ReplicationError;
use crate::snapshot::CharacterSnapshot;

/// Receives snapshots from the transport at any time and exposes a committed
/// one to the presentation step.
///
/// The transport is required to deliver ticks in increasing order. A snapshot
/// that is not newer than the newest one seen is rejected, never applied, so
/// a misbehaving transport shows up as errors instead of state rewinding.
#[derive(Debug, Clone)]
pub struct ReplicaBuffer {
    committed: CharacterSnapshot,
    pending: Option<CharacterSnapshot>,
}

impl ReplicaBuffer {
    /// Starts from the snapshot that made the character visible.
    pub fn new(initial: CharacterSnapshot) -> Self {
        Self {
            committed: initial,
            pending: None,
        }
    }

    /// Newest tick received, committed or not.
    pub fn latest_tick(&self) -> u64 {
        self.pending.map_or(self.committed.tick, |p| p.tick)
    }

    /// Accepts a snapshot from the transport.
    ///
    /// # Errors
    ///
    /// [`ReplicationError::StaleSnapshot`] for duplicate or out-of-order ticks.
    pub fn receive(&mut self, snapshot: CharacterSnapshot) -> Result<(), ReplicationError> {
        let latest = self.latest_tick();
        if snapshot.tick <= latest {
            warn!(received = snapshot.tick, latest, "rejecting stale snapshot");
            return Err(ReplicationError::StaleSnapshot {
                received: snapshot.tick,
                latest,
            });
        }
        self.pending = Some(snapshot);
        Ok(())
    }

    /// Decodes and accepts a wire-format snapshot.
    pub fn receive_bytes(&mut self, bytes: &[u8]) -> Result<(), ReplicationError> {
        self.receive(CharacterSnapshot::decode(bytes)?)
    }

    /// Promotes the newest received snapshot. Called at the fixed-tick boundary.
    ///
    /// Returns `true` if the committed snapshot changed.
    pub fn commit(&mut self) -> bool {
        match self.pending.take() {
            Some(snapshot) => {
                self.committed = snapshot;
                true
            }
            None => false,
        }
    }

    /// The snapshot presentation should read.
    pub fn committed(&self) -> &CharacterSnapshot {
        &self.committed
    }
}
