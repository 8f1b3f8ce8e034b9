//! State marker components.
//!
//! These components mirror the controller's grounded state as queryable
//! markers. They are added and removed by [`crate::systems::sync_state_markers`]
//! after the ground probe has run each tick.

use bevy::prelude::*;

/// Marker component indicating the character is grounded.
///
/// Added when any grounding detector hits a surface on the ground layer.
/// Removed when the character becomes airborne. Mutually exclusive with
/// [`Airborne`].
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use platformer_controller::prelude::*;
///
/// // Grounded is a marker component - just use it in queries
/// fn check_grounded(grounded: Option<&Grounded>) -> bool {
///     grounded.is_some()
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Added automatically when the character leaves ground contact.
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;
