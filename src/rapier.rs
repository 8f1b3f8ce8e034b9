//! Rapier2D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier2D.
//! Enable with the `rapier2d` feature.
//!
//! The backend drives a dynamic rigid body with rotation locked and
//! Rapier's own gravity disabled; the controller integrates gravity itself
//! and writes the final velocity once per tick. Grounding raycasts run in
//! a dedicated system that receives the Rapier context as a system
//! parameter.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::config::ControllerConfig;
use crate::controller::CharacterController;
use crate::detection::{self, FootprintBounds, GroundHit};
use crate::platform::PlatformAttachment;
use crate::CharacterControllerSet;

/// Rapier2D physics backend for the character controller.
pub struct Rapier2dBackend;

impl CharacterPhysicsBackend for Rapier2dBackend {
    type VelocityComponent = Velocity;

    fn plugin() -> impl Plugin {
        Rapier2dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }
}

/// Plugin that sets up the Rapier-specific sensor systems.
pub struct Rapier2dBackendPlugin;

impl Plugin for Rapier2dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            rapier_ground_detection.in_set(CharacterControllerSet::Grounding),
        );
    }
}

/// Physics components a Rapier-backed character needs.
///
/// Rotation is locked (the controller never torques the body) and Rapier
/// gravity is disabled because the controller integrates its own.
#[derive(Bundle)]
pub struct Rapier2dCharacterBundle {
    /// Dynamic body driven by velocity writes.
    pub rigid_body: RigidBody,
    /// Velocity component the controller writes each tick.
    pub velocity: Velocity,
    /// Keeps the character upright.
    pub locked_axes: LockedAxes,
    /// Disables Rapier's gravity for this body.
    pub gravity_scale: GravityScale,
}

impl Default for Rapier2dCharacterBundle {
    fn default() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::zero(),
            locked_axes: LockedAxes::ROTATION_LOCKED,
            gravity_scale: GravityScale(0.0),
        }
    }
}

impl Rapier2dCharacterBundle {
    /// The standard upright character body.
    pub fn rotation_locked() -> Self {
        Self::default()
    }
}

/// Footprint half extents for the supported collider shapes.
///
/// For a capsule this is the full bounding box (radius wide, half-height
/// plus radius tall); unknown shapes degrade to a point at the collider
/// center.
fn collider_half_extents(collider: &Collider) -> Vec2 {
    if let Some(cuboid) = collider.as_cuboid() {
        cuboid.half_extents()
    } else if let Some(capsule) = collider.as_capsule() {
        let segment = capsule.segment();
        let half_height = (segment.a().y - segment.b().y).abs() / 2.0;
        Vec2::new(capsule.radius(), half_height + capsule.radius())
    } else if let Some(ball) = collider.as_ball() {
        Vec2::splat(ball.radius())
    } else {
        Vec2::ZERO
    }
}

/// Rapier-specific ground detection.
///
/// Casts the probe's detector rays straight down from the collider
/// footprint against the configured ground groups, excluding the
/// character's own body and any sensors. The first hit in scan order
/// grounds the character and becomes its platform attachment.
fn rapier_ground_detection(
    rapier_context: ReadRapierContext,
    mut q_characters: Query<(
        Entity,
        &GlobalTransform,
        &ControllerConfig,
        &Collider,
        &mut CharacterController,
        &mut PlatformAttachment,
    )>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, transform, config, collider, mut controller, mut attachment) in &mut q_characters
    {
        let position = transform.translation().truncate();
        let bounds =
            FootprintBounds::from_center_half_extents(position, collider_half_extents(collider));

        let mut filter = QueryFilter::default()
            .exclude_rigid_body(entity)
            .exclude_sensors();
        if let Some((memberships, filters)) = config.ground_groups {
            filter = filter.groups(CollisionGroups::new(
                Group::from_bits_truncate(memberships),
                Group::from_bits_truncate(filters),
            ));
        }

        controller.begin_grounding();
        controller.last_footprint = Some(bounds);

        let hit = detection::probe_ground(bounds, config, |origin, direction, max_distance| {
            context
                .cast_ray(origin, direction, max_distance, true, filter)
                .map(|(hit_entity, toi)| {
                    GroundHit::new(toi, origin + direction * toi, hit_entity)
                })
        });

        controller.set_grounded(hit.is_some());
        match hit {
            Some(hit) => attachment.attach(hit.entity),
            None => attachment.detach(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_half_extents() {
        let collider = Collider::cuboid(3.0, 4.0);
        assert_eq!(collider_half_extents(&collider), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn capsule_half_extents_include_caps() {
        let collider = Collider::capsule_y(8.0, 4.0);
        assert_eq!(collider_half_extents(&collider), Vec2::new(4.0, 12.0));
    }

    #[test]
    fn ball_half_extents_are_the_radius() {
        let collider = Collider::ball(5.0);
        assert_eq!(collider_half_extents(&collider), Vec2::splat(5.0));
    }
}
