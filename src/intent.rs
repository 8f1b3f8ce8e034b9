//! Movement intent components.
//!
//! Intent is the desired movement coming from an input source (keyboard,
//! gamepad, AI, network). Input code writes *held* state every frame; the
//! controller derives per-tick *edge* signals from the previous-tick
//! latches, so a press is consumed exactly once per simulation tick no
//! matter how render frames and fixed ticks interleave.

use bevy::prelude::*;

/// Per-character movement intent.
///
/// # Example
///
/// ```rust
/// use platformer_controller::prelude::*;
///
/// let mut intent = MovementIntent::new();
/// intent.set_walk(1.0);
/// assert!(intent.is_walking());
///
/// intent.set_jump_held(true);
/// assert!(intent.jump_edge());
///
/// // After the tick's latch, the same press no longer reads as an edge.
/// intent.latch_edges();
/// assert!(!intent.jump_edge());
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct MovementIntent {
    /// Horizontal movement intent (-1.0 = left, 1.0 = right).
    pub walk: f32,

    /// Whether the jump button is currently held.
    pub jump_held: bool,

    /// Whether the generic action button is currently held. Unused by the
    /// movement core; exposed for gameplay code.
    pub action_held: bool,

    /// Previous tick's `jump_held`, for edge detection. Managed by the
    /// controller's latch system.
    pub(crate) jump_held_prev: bool,

    /// Previous tick's `action_held`.
    pub(crate) action_held_prev: bool,
}

impl Default for MovementIntent {
    fn default() -> Self {
        Self {
            walk: 0.0,
            jump_held: false,
            action_held: false,
            jump_held_prev: false,
            action_held_prev: false,
        }
    }
}

impl MovementIntent {
    /// Create an empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the walking direction (-1.0 = left, 1.0 = right).
    pub fn set_walk(&mut self, direction: f32) {
        self.walk = direction.clamp(-1.0, 1.0);
    }

    /// Set the jump button's held state. Call every frame with the current
    /// state from any source of a boolean; the controller handles edge
    /// detection and jump logic.
    pub fn set_jump_held(&mut self, held: bool) {
        self.jump_held = held;
    }

    /// Set the action button's held state.
    pub fn set_action_held(&mut self, held: bool) {
        self.action_held = held;
    }

    /// Check if there is active walking input.
    pub fn is_walking(&self) -> bool {
        self.walk.abs() > 0.001
    }

    /// True only on the tick the jump button transitioned from released to
    /// held.
    pub fn jump_edge(&self) -> bool {
        self.jump_held && !self.jump_held_prev
    }

    /// True only on the tick the action button transitioned from released
    /// to held.
    pub fn action_edge(&self) -> bool {
        self.action_held && !self.action_held_prev
    }

    /// Shift the held states into the previous-tick latches. The plugin
    /// runs this once per tick in `FixedPostUpdate`, after the jump step
    /// has consumed the edges.
    pub fn latch_edges(&mut self) {
        self.jump_held_prev = self.jump_held;
        self.action_held_prev = self.action_held;
    }
}
