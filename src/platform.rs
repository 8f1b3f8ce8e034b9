//! Moving-platform attachment.
//!
//! Instead of reparenting the character under the surface it stands on,
//! the ground probe records an explicit weak reference to the platform
//! entity. A carry system then adds the platform's per-tick translation
//! delta to the character, which survives platform despawns gracefully and
//! keeps the scene graph untouched.

use bevy::prelude::*;

/// Weak reference to the surface the character currently stands on.
///
/// Set by the backend's ground sensor to the first detector hit in scan
/// order; cleared whenever the character is airborne. The stored
/// translation is the platform's position when it was last sampled, so the
/// first carry tick after attaching applies no delta.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct PlatformAttachment {
    /// The platform entity, if standing on one.
    pub platform: Option<Entity>,
    /// The platform's translation at the previous sample.
    pub(crate) last_translation: Option<Vec2>,
}

impl PlatformAttachment {
    /// Whether the character is attached to a surface.
    pub fn is_attached(&self) -> bool {
        self.platform.is_some()
    }

    /// Attach to a surface. Re-attaching to the same entity keeps the
    /// sampled translation so deltas stay continuous.
    pub fn attach(&mut self, platform: Entity) {
        if self.platform != Some(platform) {
            self.platform = Some(platform);
            self.last_translation = None;
        }
    }

    /// Drop the attachment.
    pub fn detach(&mut self) {
        self.platform = None;
        self.last_translation = None;
    }
}

/// Move attached characters by their platform's frame delta.
///
/// Runs after the body velocity write so platform motion stacks on top of
/// the character's own movement. A platform that despawned since the probe
/// simply detaches.
pub fn carry_with_platform(
    q_platforms: Query<&GlobalTransform, Without<PlatformAttachment>>,
    mut q_characters: Query<(&mut Transform, &mut PlatformAttachment)>,
) {
    for (mut transform, mut attachment) in &mut q_characters {
        let Some(platform) = attachment.platform else {
            continue;
        };

        let Ok(platform_transform) = q_platforms.get(platform) else {
            attachment.detach();
            continue;
        };

        let current = platform_transform.translation().truncate();
        if let Some(last) = attachment.last_translation {
            let delta = current - last;
            transform.translation += delta.extend(0.0);
        }
        attachment.last_translation = Some(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_default_is_detached() {
        let attachment = PlatformAttachment::default();
        assert!(!attachment.is_attached());
        assert!(attachment.last_translation.is_none());
    }

    #[test]
    fn attach_resets_sample_only_on_change() {
        let mut attachment = PlatformAttachment::default();
        let platform = Entity::from_raw(3);

        attachment.attach(platform);
        assert!(attachment.is_attached());
        attachment.last_translation = Some(Vec2::new(1.0, 0.0));

        // Same platform again: sample survives.
        attachment.attach(platform);
        assert_eq!(attachment.last_translation, Some(Vec2::new(1.0, 0.0)));

        // Different platform: sample resets.
        attachment.attach(Entity::from_raw(4));
        assert!(attachment.last_translation.is_none());
    }

    #[test]
    fn detach_clears_everything() {
        let mut attachment = PlatformAttachment::default();
        attachment.attach(Entity::from_raw(3));
        attachment.last_translation = Some(Vec2::ONE);

        attachment.detach();

        assert!(!attachment.is_attached());
        assert!(attachment.last_translation.is_none());
    }
}
