//! Animation clip selection.
//!
//! Pure presentation: maps the controller's velocity and grounded state to
//! a named clip and a horizontal facing. Rendering layers read these
//! components and drive whatever sprite/animator they own.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::controller::CharacterController;

/// The animation clips a platformer character cycles through.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationClip {
    /// Standing still on the ground.
    #[default]
    Idle,
    /// Moving horizontally on the ground.
    Run,
    /// Moving upward.
    Jump,
    /// Airborne and moving downward.
    Fall,
}

impl AnimationClip {
    /// The clip's name, as an animator would key it.
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Run => "Run",
            Self::Jump => "Jump",
            Self::Fall => "Fall",
        }
    }

    /// Pick a clip from the tick's resulting state.
    ///
    /// Priority: upward motion is always Jump (even on the tick of
    /// takeoff, while grounding still reports true); airborne downward
    /// motion is Fall; otherwise Idle or Run by horizontal velocity.
    pub fn select(velocity: Vec2, is_grounded: bool) -> Self {
        if velocity.y > 0.0 {
            Self::Jump
        } else if !is_grounded && velocity.y < 0.0 {
            Self::Fall
        } else if velocity.x == 0.0 {
            Self::Idle
        } else {
            Self::Run
        }
    }
}

/// The clip and facing selected for a character this tick.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct AnimationState {
    /// The selected clip.
    pub clip: AnimationClip,
    /// Horizontal sprite flip. Holds its last value while the character
    /// stands still.
    pub flip_x: bool,
}

/// Select each character's clip and facing from the tick's final state.
pub fn select_animation(
    mut q_characters: Query<(&CharacterController, &ControllerConfig, &mut AnimationState)>,
) {
    for (controller, config, mut state) in &mut q_characters {
        state.clip = AnimationClip::select(controller.velocity, controller.is_grounded);

        if controller.velocity.x > 0.0 {
            state.flip_x = config.invert_facing;
        }
        if controller.velocity.x < 0.0 {
            state.flip_x = !config.invert_facing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_names() {
        assert_eq!(AnimationClip::Idle.name(), "Idle");
        assert_eq!(AnimationClip::Run.name(), "Run");
        assert_eq!(AnimationClip::Jump.name(), "Jump");
        assert_eq!(AnimationClip::Fall.name(), "Fall");
    }

    #[test]
    fn upward_motion_is_jump_even_when_grounded() {
        let clip = AnimationClip::select(Vec2::new(0.0, 25.0), true);
        assert_eq!(clip, AnimationClip::Jump);
    }

    #[test]
    fn airborne_downward_motion_is_fall() {
        let clip = AnimationClip::select(Vec2::new(3.0, -5.0), false);
        assert_eq!(clip, AnimationClip::Fall);
    }

    #[test]
    fn grounded_downward_motion_is_not_fall() {
        // Grounded with vy < 0 falls through to the horizontal branches.
        assert_eq!(
            AnimationClip::select(Vec2::new(0.0, -0.1), true),
            AnimationClip::Idle
        );
        assert_eq!(
            AnimationClip::select(Vec2::new(2.0, -0.1), true),
            AnimationClip::Run
        );
    }

    #[test]
    fn grounded_rest_is_idle_and_walk_is_run() {
        assert_eq!(AnimationClip::select(Vec2::ZERO, true), AnimationClip::Idle);
        assert_eq!(
            AnimationClip::select(Vec2::new(6.0, 0.0), true),
            AnimationClip::Run
        );
    }
}
