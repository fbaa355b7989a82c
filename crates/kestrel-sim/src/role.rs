//! The seam between a character's simulation role and the frame loop.

use kestrel_presentation::{PresentationFrame, PresentationSink};
use kestrel_replication::CharacterSnapshot;

use crate::SimError;

/// One character as seen by one participant.
///
/// Exactly one participant holds an authority role for a character; all
/// others hold observer roles. The role never changes after creation.
pub trait CharacterRole {
    /// Runs one fixed tick of `dt` seconds.
    fn fixed_update(&mut self, dt: f32) -> Result<(), SimError>;

    /// Runs one presentation frame against the latest committed snapshot.
    fn present(&mut self, frame_dt: f32, sink: &mut dyn PresentationSink) -> PresentationFrame;

    /// The snapshot presentation reads.
    fn latest(&self) -> &CharacterSnapshot;

    /// True for the participant that simulates this character.
    fn is_authority(&self) -> bool;
}
