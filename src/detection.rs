//! Ground detection geometry and results.
//!
//! The probe walks N evenly spaced downward rays across the character's
//! collision footprint. Backends supply the actual raycast; the layout,
//! scan order and short-circuiting live here so every backend (and the
//! tests) agree on them.

use bevy::math::FloatExt;
use bevy::prelude::*;

use crate::config::ControllerConfig;

/// Axis-aligned collision footprint of a character, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootprintBounds {
    /// Bottom-left corner.
    pub min: Vec2,
    /// Top-right corner.
    pub max: Vec2,
}

impl FootprintBounds {
    /// Create bounds from explicit corners.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create bounds from a center point and half extents.
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Footprint width.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// The y coordinate detector rays start from.
    pub fn bottom(&self) -> f32 {
        self.min.y
    }
}

/// Result of a grounding raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    /// Distance from the ray origin to the surface.
    pub distance: f32,
    /// World position of the hit point.
    pub point: Vec2,
    /// The surface entity that was hit.
    pub entity: Entity,
}

impl GroundHit {
    /// Create a hit result.
    pub fn new(distance: f32, point: Vec2, entity: Entity) -> Self {
        Self {
            distance,
            point,
            entity,
        }
    }
}

/// Evenly spaced detector ray origins across the bottom of the footprint.
///
/// For N detectors the footprint width is divided into N−1 equal intervals,
/// endpoints inclusive; the final origin is the exact footprint-max corner.
/// `count` must be at least 2 (enforced by config sanitization).
pub fn detector_origins(
    bounds: FootprintBounds,
    count: u32,
) -> impl Iterator<Item = Vec2> {
    let y = bounds.bottom();
    let start_x = bounds.min.x;
    let end_x = bounds.max.x;
    let last = count.saturating_sub(1).max(1);

    (0..last)
        .map(move |i| {
            let t = i as f32 / last as f32;
            Vec2::new(start_x.lerp(end_x, t), y)
        })
        .chain(std::iter::once(Vec2::new(end_x, y)))
}

/// The detector rays as `(origin, vector)` pairs.
///
/// This is the same list the probe casts; the `debug-draw` overlay renders
/// it verbatim.
pub fn detector_rays(
    bounds: FootprintBounds,
    config: &ControllerConfig,
) -> impl Iterator<Item = (Vec2, Vec2)> {
    let ray = Vec2::NEG_Y * config.detector_length;
    detector_origins(bounds, config.detector_count).map(move |origin| (origin, ray))
}

/// Scan the detectors left to right, short-circuiting on the first hit.
///
/// `cast` receives `(origin, direction, max_distance)` and returns the
/// nearest surface, if any. Any single hit grounds the character; when
/// several detectors overlap different surfaces, the first in scan order
/// decides the platform attachment.
pub fn probe_ground<F>(
    bounds: FootprintBounds,
    config: &ControllerConfig,
    mut cast: F,
) -> Option<GroundHit>
where
    F: FnMut(Vec2, Vec2, f32) -> Option<GroundHit>,
{
    detector_origins(bounds, config.detector_count)
        .find_map(|origin| cast(origin, Vec2::NEG_Y, config.detector_length))
}
