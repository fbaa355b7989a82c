//! Fixed-tick character motion: input samples, probe capabilities, kinematic
//! state, and the deterministic [`advance`] integrator.
//!
//! Nothing in this crate touches a physics engine directly. Ground contact and
//! hit queries go through the [`GroundProbe`] and [`HitProbe`] capabilities so
//! the same integrator runs against rapier, an analytic plane, or a replay.

pub mod input;
pub mod integrator;
pub mod params;
pub mod probe;
pub mod state;

pub use input::{InputSample, InputSlot, look_direction};
pub use integrator::{MotionError, advance, blend_factor};
pub use params::MotionParams;
pub use probe::{GroundContact, GroundProbe, HitProbe, HitRecord, NoHits, PlaneGround, TargetMask};
pub use state::KinematicState;
