//! Turning monotonic counters into one-shot effect triggers.

/// Tracks the last value seen of a counter that only ever increases.
///
/// The authority bumps the counter once per event; presentation frames run at
/// any rate and may see the same value many times or skip several values at
/// once. Reconciling against the last observed value plays every event
/// exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectReconciler {
    last_observed: u32,
}

impl EffectReconciler {
    /// Starts observing from `current`, so events before it are never played.
    pub fn new(current: u32) -> Self {
        Self {
            last_observed: current,
        }
    }

    /// Returns how many new events to play and records `counter` as seen.
    #[inline]
    pub fn reconcile(&mut self, counter: u32) -> u32 {
        let new_events = counter.saturating_sub(self.last_observed);
        self.last_observed = counter;
        new_events
    }

    /// Counter value recorded by the last [`reconcile`](Self::reconcile).
    pub fn last_observed(&self) -> u32 {
        self.last_observed
    }
}

/// Per observer, per character presentation memory. Never replicated.
///
/// Created when a character becomes visible and dropped when it leaves.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PresentationState {
    /// Fire counter reconciliation.
    pub fire: EffectReconciler,
    /// Displayed horizontal speed in m/s.
    pub smoothed_speed: f32,
}

impl PresentationState {
    /// Seeds the fire reconciler with the character's current `fire_count`.
    pub fn new(fire_count: u32) -> Self {
        Self {
            fire: EffectReconciler::new(fire_count),
            smoothed_speed: 0.0,
        }
    }

    /// Last fire count this observer has played effects for.
    pub fn last_observed_fire_count(&self) -> u32 {
        self.fire.last_observed()
    }
}
