//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement
//! to work with the character controller. The core systems are generic
//! over a backend so the same movement logic runs against Rapier2D, a
//! custom engine, or the deterministic test backend in the test suite.
//!
//! A backend contributes two things: velocity access on the physics body,
//! and a ground-sensor system (added by [`CharacterPhysicsBackend::plugin`])
//! that performs the detector raycasts and feeds
//! [`crate::detection::probe_ground`].

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// The controller owns the velocity vector and hands it to the body once
/// per tick; the backend decides what "the body" is. For an example
/// implementation see the `rapier` module's `Rapier2dBackend`.
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// The velocity component type used by this backend.
    type VelocityComponent: Component;

    /// Returns the plugin that sets up this backend.
    ///
    /// The plugin must add a ground-sensor system to
    /// [`crate::CharacterControllerSet::Grounding`] that updates each
    /// character's `CharacterController` grounded flags and
    /// `PlatformAttachment`.
    fn plugin() -> impl Plugin;

    /// Get the current velocity of an entity's body.
    fn get_velocity(world: &World, entity: Entity) -> Vec2;

    /// Write a velocity to an entity's body.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2);
}
