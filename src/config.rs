//! Controller configuration components.
//!
//! This module defines the designer-facing tuning for platformer characters:
//! walk and jump speeds, the apex-eased gravity band, grounding detector
//! layout, coyote time, and the optional double jump.

use bevy::prelude::*;
use thiserror::Error;

/// Error produced by [`ControllerConfig::validate`].
///
/// All failure modes are configuration-time precondition violations; the
/// per-tick math itself is total.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Fewer than two grounding detectors cannot be spaced across the
    /// footprint (the spacing divides by `detector_count - 1`).
    #[error("detector_count must be at least 2, got {0}")]
    TooFewDetectors(u32),
    /// Detector rays need a positive length to ever hit anything.
    #[error("detector_length must be positive, got {0}")]
    NonPositiveDetectorLength(f32),
    /// A zero or negative walk speed makes horizontal intent a no-op.
    #[error("walk_speed must be positive, got {0}")]
    NonPositiveWalkSpeed(f32),
}

/// Configuration parameters for a platformer character controller.
///
/// All values are designer-set at spawn time; the controller never mutates
/// them. Defaults are tuned for a small pixel-scale character.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerConfig {
    // === Movement ===
    /// Horizontal speed at full intent (units/second).
    pub walk_speed: f32,

    /// Vertical velocity set by a jump impulse.
    pub jump_speed: f32,

    // === Gravity ===
    /// Fall acceleration outside the apex band (units/second^2).
    pub min_gravity: f32,

    /// Fall acceleration at the jump apex itself (units/second^2).
    pub max_gravity: f32,

    /// Downward speed cap while airborne.
    pub max_fall_speed: f32,

    /// Vertical-speed band around the apex: as `|vy|` drops below this
    /// threshold, fall acceleration blends from `min_gravity` toward
    /// `max_gravity`, shaping the top of the jump arc.
    pub jump_apex_threshold: f32,

    // === Grounding ===
    /// Number of evenly spaced downward detector rays across the collider
    /// footprint. Must be at least 2 (endpoints inclusive).
    pub detector_count: u32,

    /// Length of each grounding detector ray.
    pub detector_length: f32,

    /// Collision groups for grounding raycasts as `(memberships, filters)`
    /// bits. `None` casts against everything.
    #[reflect(ignore)]
    #[cfg_attr(feature = "serde", serde(skip))]
    pub ground_groups: Option<(u32, u32)>,

    // === Jump ===
    /// Grace period after leaving a ledge during which a jump is still
    /// accepted (seconds).
    pub coyote_time: f32,

    /// Optional second airborne jump, recharged on landing.
    pub double_jump: DoubleJumpConfig,

    // === Presentation ===
    /// Inverts the horizontal facing flip derived from velocity sign.
    pub invert_facing: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Movement
            walk_speed: 6.0,
            jump_speed: 25.0,

            // Gravity
            min_gravity: 80.0,
            max_gravity: 120.0,
            max_fall_speed: 20.0,
            jump_apex_threshold: 10.0,

            // Grounding
            detector_count: 3,
            detector_length: 0.02,
            ground_groups: None,

            // Jump
            coyote_time: 0.15,
            double_jump: DoubleJumpConfig::default(),

            // Presentation
            invert_facing: false,
        }
    }
}

impl ControllerConfig {
    /// Check the configuration preconditions.
    ///
    /// Returns the first violation found. Call this at wiring time when a
    /// bad config should be rejected outright; the plugin itself only
    /// [`sanitize`](Self::sanitize)s with a warning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detector_count < 2 {
            return Err(ConfigError::TooFewDetectors(self.detector_count));
        }
        if self.detector_length <= 0.0 {
            return Err(ConfigError::NonPositiveDetectorLength(self.detector_length));
        }
        if self.walk_speed <= 0.0 {
            return Err(ConfigError::NonPositiveWalkSpeed(self.walk_speed));
        }
        Ok(())
    }

    /// Clamp the configuration into its valid domain, returning whether
    /// anything had to change.
    pub fn sanitize(&mut self) -> bool {
        let mut changed = false;
        if self.detector_count < 2 {
            self.detector_count = 2;
            changed = true;
        }
        if self.detector_length <= 0.0 {
            self.detector_length = f32::EPSILON;
            changed = true;
        }
        changed
    }

    /// Builder: set walk speed.
    pub fn with_walk_speed(mut self, speed: f32) -> Self {
        self.walk_speed = speed;
        self
    }

    /// Builder: set jump speed.
    pub fn with_jump_speed(mut self, speed: f32) -> Self {
        self.jump_speed = speed;
        self
    }

    /// Builder: set the gravity band.
    pub fn with_gravity(mut self, min: f32, max: f32) -> Self {
        self.min_gravity = min;
        self.max_gravity = max;
        self
    }

    /// Builder: set the maximum fall speed.
    pub fn with_max_fall_speed(mut self, speed: f32) -> Self {
        self.max_fall_speed = speed;
        self
    }

    /// Builder: set the apex threshold.
    pub fn with_jump_apex_threshold(mut self, threshold: f32) -> Self {
        self.jump_apex_threshold = threshold;
        self
    }

    /// Builder: set detector layout.
    pub fn with_detectors(mut self, count: u32, length: f32) -> Self {
        self.detector_count = count;
        self.detector_length = length;
        self
    }

    /// Builder: set the grounding collision groups.
    pub fn with_ground_groups(mut self, memberships: u32, filters: u32) -> Self {
        self.ground_groups = Some((memberships, filters));
        self
    }

    /// Builder: set coyote time.
    pub fn with_coyote_time(mut self, time: f32) -> Self {
        self.coyote_time = time;
        self
    }

    /// Builder: enable the double jump with the given impulse and cap.
    pub fn with_double_jump(mut self, speed: f32, max_speed: f32) -> Self {
        self.double_jump = DoubleJumpConfig {
            enabled: true,
            speed,
            max_speed,
        };
        self
    }

    /// Builder: invert the facing flip.
    pub fn with_inverted_facing(mut self) -> Self {
        self.invert_facing = true;
        self
    }
}

/// Configuration for the double jump.
#[derive(Reflect, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoubleJumpConfig {
    /// Whether the double jump is available at all.
    pub enabled: bool,

    /// Vertical velocity set when double jumping from a fall.
    pub speed: f32,

    /// Velocity cap when the double jump impulse is added on top of upward
    /// motion.
    pub max_speed: f32,
}

impl Default for DoubleJumpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            speed: 20.0,
            max_speed: 25.0,
        }
    }
}

impl DoubleJumpConfig {
    /// Create an enabled double jump config.
    pub fn enabled(speed: f32, max_speed: f32) -> Self {
        Self {
            enabled: true,
            speed,
            max_speed,
        }
    }

    /// Create a disabled double jump config.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..default()
        }
    }
}
