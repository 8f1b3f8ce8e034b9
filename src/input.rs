//! Keyboard input sources.
//!
//! An [`InputSource`] turns raw key state into movement intent. The two
//! stock variants cover the classic layouts (arrow keys and WASD); custom
//! sources implement the trait and are injected per character through
//! [`InputBinding`] at spawn time. Selection is plain wiring, not core
//! logic.

use bevy::input::keyboard::KeyCode;
use bevy::input::ButtonInput;
use bevy::prelude::*;

use crate::intent::MovementIntent;

/// A per-frame source of movement intent.
///
/// Implementations read whatever device they like and report horizontal
/// intent plus the held state of the jump and action buttons. Edge
/// detection is the controller's job, so sources stay stateless.
pub trait InputSource: Send + Sync + 'static {
    /// Horizontal intent in [-1, 1]. Opposing keys cancel out.
    fn horizontal(&self, keys: &ButtonInput<KeyCode>) -> f32;

    /// Whether the jump button is held.
    fn jump_held(&self, keys: &ButtonInput<KeyCode>) -> bool;

    /// Whether the generic action button is held.
    fn action_held(&self, keys: &ButtonInput<KeyCode>) -> bool;
}

/// Arrow-key layout: left/right to walk, up to jump, right shift for the
/// action button.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrowKeyInput;

impl InputSource for ArrowKeyInput {
    fn horizontal(&self, keys: &ButtonInput<KeyCode>) -> f32 {
        let mut dir = 0.0;
        if keys.pressed(KeyCode::ArrowRight) {
            dir += 1.0;
        }
        if keys.pressed(KeyCode::ArrowLeft) {
            dir -= 1.0;
        }
        dir
    }

    fn jump_held(&self, keys: &ButtonInput<KeyCode>) -> bool {
        keys.pressed(KeyCode::ArrowUp)
    }

    fn action_held(&self, keys: &ButtonInput<KeyCode>) -> bool {
        keys.pressed(KeyCode::ShiftRight)
    }
}

/// WASD layout: A/D to walk, W to jump, S for the action button.
#[derive(Debug, Clone, Copy, Default)]
pub struct WasdInput;

impl InputSource for WasdInput {
    fn horizontal(&self, keys: &ButtonInput<KeyCode>) -> f32 {
        let mut dir = 0.0;
        if keys.pressed(KeyCode::KeyD) {
            dir += 1.0;
        }
        if keys.pressed(KeyCode::KeyA) {
            dir -= 1.0;
        }
        dir
    }

    fn jump_held(&self, keys: &ButtonInput<KeyCode>) -> bool {
        keys.pressed(KeyCode::KeyW)
    }

    fn action_held(&self, keys: &ButtonInput<KeyCode>) -> bool {
        keys.pressed(KeyCode::KeyS)
    }
}

/// The input source bound to a character.
///
/// Characters without an `InputBinding` keep whatever intent gameplay code
/// writes into [`MovementIntent`] directly (AI, replays, network).
#[derive(Component)]
pub struct InputBinding(Box<dyn InputSource>);

impl InputBinding {
    /// Bind a custom input source.
    pub fn new(source: impl InputSource) -> Self {
        Self(Box::new(source))
    }

    /// Bind the arrow-key layout.
    pub fn arrows() -> Self {
        Self::new(ArrowKeyInput)
    }

    /// Bind the WASD layout.
    pub fn wasd() -> Self {
        Self::new(WasdInput)
    }

    /// Access the bound source.
    pub fn source(&self) -> &dyn InputSource {
        &*self.0
    }
}

/// Poll each character's bound input source into its intent.
///
/// Runs in `Update` so no key state is missed between fixed ticks; the
/// intent's latches turn the held states into per-tick edges.
pub fn read_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut q_characters: Query<(&InputBinding, &mut MovementIntent)>,
) {
    for (binding, mut intent) in &mut q_characters {
        let source = binding.source();
        intent.set_walk(source.horizontal(&keys));
        intent.set_jump_held(source.jump_held(&keys));
        intent.set_action_held(source.action_held(&keys));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_with(pressed: &[KeyCode]) -> ButtonInput<KeyCode> {
        let mut keys = ButtonInput::default();
        for &key in pressed {
            keys.press(key);
        }
        keys
    }

    #[test]
    fn arrows_read_horizontal() {
        let source = ArrowKeyInput;
        assert_eq!(source.horizontal(&keys_with(&[KeyCode::ArrowRight])), 1.0);
        assert_eq!(source.horizontal(&keys_with(&[KeyCode::ArrowLeft])), -1.0);
        assert_eq!(source.horizontal(&keys_with(&[])), 0.0);
    }

    #[test]
    fn arrows_opposing_keys_cancel() {
        let source = ArrowKeyInput;
        let keys = keys_with(&[KeyCode::ArrowRight, KeyCode::ArrowLeft]);
        assert_eq!(source.horizontal(&keys), 0.0);
    }

    #[test]
    fn arrows_jump_and_action() {
        let source = ArrowKeyInput;
        assert!(source.jump_held(&keys_with(&[KeyCode::ArrowUp])));
        assert!(!source.jump_held(&keys_with(&[])));
        assert!(source.action_held(&keys_with(&[KeyCode::ShiftRight])));
    }

    #[test]
    fn wasd_reads_horizontal() {
        let source = WasdInput;
        assert_eq!(source.horizontal(&keys_with(&[KeyCode::KeyD])), 1.0);
        assert_eq!(source.horizontal(&keys_with(&[KeyCode::KeyA])), -1.0);
        let both = keys_with(&[KeyCode::KeyA, KeyCode::KeyD]);
        assert_eq!(source.horizontal(&both), 0.0);
    }

    #[test]
    fn wasd_jump_and_action() {
        let source = WasdInput;
        assert!(source.jump_held(&keys_with(&[KeyCode::KeyW])));
        assert!(source.action_held(&keys_with(&[KeyCode::KeyS])));
        assert!(!source.action_held(&keys_with(&[KeyCode::KeyW])));
    }

    #[test]
    fn binding_dispatches_to_bound_source() {
        let binding = InputBinding::wasd();
        let keys = keys_with(&[KeyCode::KeyD, KeyCode::KeyW]);
        assert_eq!(binding.source().horizontal(&keys), 1.0);
        assert!(binding.source().jump_held(&keys));

        // Same keys through the other layout read as nothing.
        let binding = InputBinding::arrows();
        assert_eq!(binding.source().horizontal(&keys), 0.0);
        assert!(!binding.source().jump_held(&keys));
    }
}
