//! # `platformer_controller`
//!
//! A raycast-grounded 2D platformer character controller with physics
//! backend abstraction.
//!
//! This crate provides a tight, tuneable platformer movement core:
//! - Horizontal movement from a pluggable input source (arrow keys, WASD,
//!   or anything implementing [`input::InputSource`])
//! - Apex-eased gravity with a fall-speed cap
//! - Multi-raycast ground detection across the collider footprint
//! - Coyote time, jump buffering via per-tick input edges, and an optional
//!   double jump
//! - Moving-platform carry through an explicit attachment, no reparenting
//! - Animation clip selection (Idle/Run/Jump/Fall) with facing flip
//!
//! ## Architecture
//!
//! The controller owns its velocity vector and rebuilds it every fixed
//! tick: horizontal intent first, then gravity, then the backend's ground
//! sensor, then the jump state machine; the result is written to the
//! physics body exactly once. Physics access goes through the
//! [`backend::CharacterPhysicsBackend`] trait so the same movement logic
//! runs against Rapier2D or a deterministic test backend.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_rapier2d::prelude::*;
//! use platformer_controller::prelude::*;
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
//!     .add_plugins(CharacterControllerPlugin::<Rapier2dBackend>::default())
//!     .run();
//! ```
//!
//! A character is an entity with a [`config::ControllerConfig`], a
//! [`controller::CharacterController`], a [`intent::MovementIntent`], a
//! [`platform::PlatformAttachment`], an input binding, and the backend's
//! body components:
//!
//! ```rust,ignore
//! commands.spawn((
//!     Transform::from_xyz(0.0, 5.0, 0.0),
//!     ControllerConfig::default().with_double_jump(20.0, 25.0),
//!     CharacterController::new(),
//!     MovementIntent::new(),
//!     PlatformAttachment::default(),
//!     AnimationState::default(),
//!     InputBinding::arrows(), // or InputBinding::wasd()
//!     Rapier2dCharacterBundle::rotation_locked(),
//!     Collider::cuboid(0.5, 1.0),
//! ));
//! ```

use bevy::prelude::*;

pub mod animation;
pub mod backend;
pub mod config;
pub mod controller;
pub mod detection;
pub mod input;
pub mod intent;
pub mod platform;
pub mod state;
pub mod systems;

#[cfg(feature = "debug-draw")]
pub mod debug;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::animation::{AnimationClip, AnimationState};
    pub use crate::backend::CharacterPhysicsBackend;
    pub use crate::config::{ConfigError, ControllerConfig, DoubleJumpConfig};
    pub use crate::controller::CharacterController;
    pub use crate::detection::{FootprintBounds, GroundHit};
    pub use crate::input::{ArrowKeyInput, InputBinding, InputSource, WasdInput};
    pub use crate::intent::MovementIntent;
    pub use crate::platform::PlatformAttachment;
    pub use crate::state::{Airborne, Grounded};
    pub use crate::{CharacterControllerPlugin, CharacterControllerSet};

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::{Rapier2dBackend, Rapier2dCharacterBundle};
}

/// System sets for one controller tick, chained in this order inside
/// `FixedUpdate`.
///
/// Backends slot their sensor systems into [`Grounding`](Self::Grounding);
/// gameplay code that wants to read the tick's final state schedules after
/// [`Presentation`](Self::Presentation).
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterControllerSet {
    /// Config sanitization and wiring checks for newly spawned characters.
    Validate,
    /// Horizontal intent scaled into the controller's velocity.
    Intent,
    /// Gravity integration (sees the previous tick's grounded flag).
    Gravity,
    /// Backend ground sensors and platform attachment.
    Grounding,
    /// The jump state machine.
    Jump,
    /// Velocity write to the physics body, then platform carry.
    Apply,
    /// State markers and animation selection.
    Presentation,
}

/// Main plugin for the character controller system.
///
/// Generic over a physics backend `B` which provides velocity access and
/// the grounding sensor (see [`backend::CharacterPhysicsBackend`]).
///
/// # Examples
///
/// With the Rapier2D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use platformer_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(CharacterControllerPlugin::<Rapier2dBackend>::default())
///     .run();
/// ```
pub struct CharacterControllerPlugin<B: backend::CharacterPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::CharacterPhysicsBackend> Default for CharacterControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::CharacterPhysicsBackend> Plugin for CharacterControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::ControllerConfig>();
        app.register_type::<config::DoubleJumpConfig>();
        app.register_type::<controller::CharacterController>();
        app.register_type::<intent::MovementIntent>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<platform::PlatformAttachment>();
        app.register_type::<animation::AnimationState>();
        app.register_type::<animation::AnimationClip>();

        app.configure_sets(
            FixedUpdate,
            (
                CharacterControllerSet::Validate,
                CharacterControllerSet::Intent,
                CharacterControllerSet::Gravity,
                CharacterControllerSet::Grounding,
                CharacterControllerSet::Jump,
                CharacterControllerSet::Apply,
                CharacterControllerSet::Presentation,
            )
                .chain(),
        );

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        // Keyboard polling runs per render frame so no press is missed
        // between fixed ticks. The key-state resource normally comes from
        // InputPlugin; headless apps get an empty one.
        app.init_resource::<bevy::input::ButtonInput<bevy::input::keyboard::KeyCode>>();
        app.add_systems(Update, input::read_input);

        app.add_systems(
            FixedUpdate,
            (
                (systems::sanitize_configs, systems::validate_wiring::<B>)
                    .in_set(CharacterControllerSet::Validate),
                systems::apply_horizontal.in_set(CharacterControllerSet::Intent),
                systems::apply_gravity.in_set(CharacterControllerSet::Gravity),
                systems::update_jump_state.in_set(CharacterControllerSet::Jump),
                (systems::write_body_velocity::<B>, platform::carry_with_platform)
                    .chain()
                    .in_set(CharacterControllerSet::Apply),
                (systems::sync_state_markers, animation::select_animation)
                    .in_set(CharacterControllerSet::Presentation),
            ),
        );

        // Advance input edge latches once the tick has consumed them.
        app.add_systems(FixedPostUpdate, systems::latch_input_edges);

        #[cfg(feature = "debug-draw")]
        app.add_systems(Update, debug::draw_detector_rays);
    }
}
