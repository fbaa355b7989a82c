//! Fixed-tick simulation and variable-rate presentation for one character.
//!
//! A [`TickScheduler`] splits each rendered frame into zero or more fixed
//! ticks. Ticks run [`CharacterRole::fixed_update`]; the frame then runs
//! [`CharacterRole::present`] exactly once. The role is chosen when the
//! character is created: [`Authority`] simulates and publishes snapshots,
//! [`Observer`] consumes them.

pub mod authority;
pub mod observer;
pub mod outbox;
pub mod role;
pub mod scheduler;

pub use authority::Authority;
pub use observer::Observer;
pub use outbox::SnapshotOutbox;
pub use role::CharacterRole;
pub use scheduler::TickScheduler;

use kestrel_motion::MotionError;
use kestrel_presentation::{PresentationFrame, PresentationSink};
use kestrel_replication::ReplicationError;

/// Errors surfaced by a fixed tick or by the replication boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("motion: {0}")]
    Motion(#[from] MotionError),

    #[error("replication: {0}")]
    Replication(#[from] ReplicationError),
}

/// Runs one rendered frame: every fixed tick that is due, then one
/// presentation step.
///
/// Stops at the first failing tick and returns its error; the frame is not
/// presented in that case.
pub fn step_frame<R: CharacterRole + ?Sized>(
    scheduler: &mut TickScheduler,
    role: &mut R,
    frame_secs: f64,
    sink: &mut dyn PresentationSink,
) -> Result<PresentationFrame, SimError> {
    let ticks = scheduler.accumulate(frame_secs);
    let dt = scheduler.fixed_dt();
    for _ in 0..ticks {
        role.fixed_update(dt)?;
    }
    Ok(role.present(scheduler.last_frame_secs() as f32, sink))
}
