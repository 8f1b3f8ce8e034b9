//! Detector-ray debug overlay.
//!
//! Draws the exact ray list the ground probe casts, from the footprint the
//! sensor sampled last tick. Enable with the `debug-draw` feature.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::controller::CharacterController;
use crate::detection;

/// Draw each character's grounding detector rays.
pub fn draw_detector_rays(
    mut gizmos: Gizmos,
    q_characters: Query<(&CharacterController, &ControllerConfig)>,
) {
    for (controller, config) in &q_characters {
        let Some(bounds) = controller.footprint() else {
            continue;
        };
        for (origin, ray) in detection::detector_rays(bounds, config) {
            gizmos.line_2d(origin, origin + ray, Color::srgb(0.25, 0.45, 1.0));
        }
    }
}
