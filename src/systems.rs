//! Core controller systems.
//!
//! One fixed tick runs these in a fixed order: horizontal intent, gravity,
//! the backend's ground sensor, the jump state machine, the single
//! velocity write to the physics body, then platform carry and state
//! sync. Gravity deliberately runs *before* the sensor, so its grounded
//! snap uses the previous tick's result; the jump step runs after and
//! sees the fresh one.

use bevy::prelude::*;
use log::{error, warn};

use crate::backend::CharacterPhysicsBackend;
use crate::config::ControllerConfig;
use crate::controller::CharacterController;
use crate::intent::MovementIntent;
use crate::platform::PlatformAttachment;
use crate::state::{Airborne, Grounded};

/// Scale horizontal intent into the controller's velocity.
pub fn apply_horizontal(
    mut q_characters: Query<(&MovementIntent, &ControllerConfig, &mut CharacterController)>,
) {
    for (intent, config, mut controller) in &mut q_characters {
        controller.velocity.x = intent.walk * config.walk_speed;
    }
}

/// Integrate gravity for the tick.
pub fn apply_gravity(
    time: Res<Time>,
    mut q_characters: Query<(&ControllerConfig, &mut CharacterController)>,
) {
    let dt = time.delta_secs();
    for (config, mut controller) in &mut q_characters {
        controller.update_gravity(config, dt);
    }
}

/// Run the jump state machine for the tick.
///
/// Consumes the intent's jump edge; the edge latch itself advances in
/// `FixedPostUpdate` via [`latch_input_edges`].
pub fn update_jump_state(
    time: Res<Time>,
    mut q_characters: Query<(&MovementIntent, &ControllerConfig, &mut CharacterController)>,
) {
    let dt = time.delta_secs();
    for (intent, config, mut controller) in &mut q_characters {
        controller.update_jump(config, intent.jump_edge(), dt);
    }
}

/// Write each controller's velocity to its physics body.
///
/// This is the only place the body's velocity is touched; everything
/// before it works on the controller's own copy.
pub fn write_body_velocity<B: CharacterPhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, Vec2)> = world
        .query::<(Entity, &CharacterController)>()
        .iter(world)
        .map(|(entity, controller)| (entity, controller.velocity))
        .collect();

    for (entity, velocity) in entities {
        B::set_velocity(world, entity, velocity);
    }
}

/// Advance the per-tick input edge latches.
///
/// Scheduled in `FixedPostUpdate` so every fixed tick sees each press as
/// an edge exactly once.
pub fn latch_input_edges(mut q_intents: Query<&mut MovementIntent>) {
    for mut intent in &mut q_intents {
        intent.latch_edges();
    }
}

/// Sync [`Grounded`]/[`Airborne`] marker components from the controller's
/// grounded flag.
pub fn sync_state_markers(
    mut commands: Commands,
    q_characters: Query<(Entity, &CharacterController, Has<Grounded>, Has<Airborne>)>,
) {
    for (entity, controller, has_grounded, has_airborne) in &q_characters {
        if controller.is_grounded && !has_grounded {
            commands.entity(entity).insert(Grounded);
            commands.entity(entity).remove::<Airborne>();
        } else if !controller.is_grounded && has_grounded {
            commands.entity(entity).remove::<Grounded>();
            commands.entity(entity).insert(Airborne);
        } else if !controller.is_grounded && !has_airborne && !has_grounded {
            commands.entity(entity).insert(Airborne);
        }
    }
}

/// Clamp newly added configs into their valid domain, loudly.
///
/// A detector count below 2 would divide by zero in the spacing
/// calculation; library users who prefer hard rejection call
/// [`ControllerConfig::validate`] at wiring time instead.
pub fn sanitize_configs(
    mut q_configs: Query<(Entity, &mut ControllerConfig), Added<ControllerConfig>>,
) {
    for (entity, mut config) in &mut q_configs {
        let mut sanitized = *config;
        if sanitized.sanitize() {
            warn!(
                "controller config on {entity:?} was out of range and has been clamped \
                 (detector_count {} -> {}, detector_length {} -> {})",
                config.detector_count,
                sanitized.detector_count,
                config.detector_length,
                sanitized.detector_length,
            );
            *config = sanitized;
        }
    }
}

/// Report characters spawned without their required collaborators.
///
/// A controller without intent, attachment state, or a physics body can
/// never be driven; surface that at spawn time instead of ticking a dead
/// entity silently.
pub fn validate_wiring<B: CharacterPhysicsBackend>(
    q_characters: Query<
        (
            Entity,
            Has<MovementIntent>,
            Has<PlatformAttachment>,
            Has<B::VelocityComponent>,
        ),
        Added<CharacterController>,
    >,
) {
    for (entity, has_intent, has_attachment, has_body) in &q_characters {
        if !has_intent {
            error!("character {entity:?} has no MovementIntent; it will never move");
        }
        if !has_attachment {
            error!("character {entity:?} has no PlatformAttachment; grounding cannot attach it");
        }
        if !has_body {
            error!("character {entity:?} has no physics body velocity component");
        }
    }
}
