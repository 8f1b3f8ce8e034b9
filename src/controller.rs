//! Core character controller state and per-tick movement math.
//!
//! [`CharacterController`] owns the character's velocity and the grounded /
//! jump bookkeeping. The gravity and jump steps are plain methods so the
//! whole movement core is testable without an ECS world or a physics
//! backend; the systems in [`crate::systems`] drive them once per fixed
//! tick in a fixed order.

use bevy::math::FloatExt;
use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::detection::FootprintBounds;

/// Per-character movement state.
///
/// The controller is the sole owner of the velocity vector; the physics
/// body only ever receives it, once per tick, after the gravity, grounding
/// and jump steps have run. Tick order matters and is fixed:
///
/// 1. horizontal intent is written to `velocity.x`;
/// 2. [`update_gravity`](Self::update_gravity) integrates `velocity.y`
///    (reading the *previous* tick's grounded flag);
/// 3. the backend's ground sensor calls
///    [`begin_grounding`](Self::begin_grounding) and
///    [`set_grounded`](Self::set_grounded);
/// 4. [`update_jump`](Self::update_jump) may override `velocity.y`.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct CharacterController {
    /// Velocity applied to the physics body at the end of the tick.
    pub velocity: Vec2,

    /// Whether any grounding detector hit this tick.
    pub is_grounded: bool,

    /// Last tick's `is_grounded`, updated exactly once per tick by
    /// [`begin_grounding`](Self::begin_grounding).
    pub was_grounded: bool,

    /// Coyote-gated single jump permission. Set on landing, consumed the
    /// instant a jump triggers.
    pub can_jump: bool,

    /// Double-jump charge. Recharged on landing, consumed by the airborne
    /// jump.
    pub double_jump_active: bool,

    /// Coyote countdown in seconds. Reset to the configured window while
    /// grounded, decremented otherwise; may go negative.
    pub coyote_timer: f32,

    /// Footprint sampled by the ground sensor this tick. Cached here so
    /// the debug overlay can redraw the exact detector rays.
    #[reflect(ignore)]
    pub(crate) last_footprint: Option<FootprintBounds>,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            is_grounded: false,
            was_grounded: false,
            can_jump: false,
            double_jump_active: true,
            coyote_timer: 0.0,
            last_footprint: None,
        }
    }
}

impl CharacterController {
    /// Create a controller at rest.
    pub fn new() -> Self {
        Self::default()
    }

    /// The footprint the ground sensor last probed, if any.
    pub fn footprint(&self) -> Option<FootprintBounds> {
        self.last_footprint
    }

    /// Shift the grounded flag into history. The ground sensor calls this
    /// once per tick, immediately before recomputing `is_grounded`.
    pub fn begin_grounding(&mut self) {
        self.was_grounded = self.is_grounded;
    }

    /// Record this tick's grounding result.
    pub fn set_grounded(&mut self, grounded: bool) {
        self.is_grounded = grounded;
    }

    /// Whether this tick is a landing edge (airborne last tick, grounded
    /// now).
    pub fn just_landed(&self) -> bool {
        !self.was_grounded && self.is_grounded
    }

    /// Whether this tick is a takeoff edge (grounded last tick, airborne
    /// now).
    pub fn just_left_ground(&self) -> bool {
        self.was_grounded && !self.is_grounded
    }

    /// Integrate gravity into `velocity.y` for one tick.
    ///
    /// Fall acceleration blends from `min_gravity` toward `max_gravity` as
    /// `|velocity.y|` approaches zero inside the apex band. Afterwards,
    /// a grounded, downward-moving character snaps to zero so it never
    /// sinks into the floor; otherwise the fall speed is capped.
    ///
    /// Runs before the ground sensor, so the grounded flag it reads is the
    /// previous tick's result.
    pub fn update_gravity(&mut self, config: &ControllerConfig, dt: f32) {
        let apex_point = if config.jump_apex_threshold > 0.0 {
            (1.0 - self.velocity.y.abs() / config.jump_apex_threshold).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let fall_accel = config.min_gravity.lerp(config.max_gravity, apex_point);
        self.velocity.y -= fall_accel * dt;

        if self.is_grounded && self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        } else {
            self.velocity.y = self.velocity.y.max(-config.max_fall_speed);
        }
    }

    /// Run the jump state machine for one tick.
    ///
    /// Transitions are evaluated in a fixed order: landing recharge, coyote
    /// timer, single jump, double jump. Both jump branches can fire on the
    /// same input edge when a just-expiring coyote window and a charged
    /// double jump line up; the double-jump branch runs second and wins.
    /// That matches the shipped behavior and is relied on by tests.
    pub fn update_jump(&mut self, config: &ControllerConfig, jump_edge: bool, dt: f32) {
        // 1. Landing recharges both jumps.
        if self.just_landed() {
            self.can_jump = true;
            self.double_jump_active = true;
        }

        // 2. Coyote window.
        if self.is_grounded {
            self.coyote_timer = config.coyote_time;
        } else {
            self.coyote_timer -= dt;
        }

        // 3. Single jump, gated by the coyote window and non-upward motion.
        if self.can_jump && jump_edge && self.coyote_timer >= 0.0 && self.velocity.y <= 0.0 {
            self.can_jump = false;
            self.velocity.y = config.jump_speed;
        }

        // 4. Double jump. From a fall the impulse replaces the velocity;
        //    on top of upward motion it adds, capped at max_speed.
        if config.double_jump.enabled && !self.is_grounded && self.double_jump_active && jump_edge
        {
            self.can_jump = false;
            self.double_jump_active = false;
            if self.velocity.y < 0.0 {
                self.velocity.y = config.double_jump.speed;
            } else {
                self.velocity.y =
                    (config.double_jump.speed + self.velocity.y).min(config.double_jump.max_speed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn config() -> ControllerConfig {
        ControllerConfig::default()
    }

    fn grounded_controller() -> CharacterController {
        let mut controller = CharacterController::new();
        controller.is_grounded = true;
        controller.was_grounded = true;
        controller.can_jump = true;
        controller.coyote_timer = config().coyote_time;
        controller
    }

    // ==================== Gravity ====================

    #[test]
    fn gravity_snaps_grounded_falling_velocity_to_zero() {
        let mut controller = grounded_controller();
        controller.velocity.y = -3.0;

        controller.update_gravity(&config(), DT);

        assert_eq!(controller.velocity.y, 0.0);
    }

    #[test]
    fn gravity_clamps_airborne_fall_speed() {
        let cfg = config();
        let mut controller = CharacterController::new();
        controller.velocity.y = -cfg.max_fall_speed;

        // Many ticks of free fall never exceed the cap.
        for _ in 0..120 {
            controller.update_gravity(&cfg, DT);
            assert!(controller.velocity.y >= -cfg.max_fall_speed);
        }
        assert_eq!(controller.velocity.y, -cfg.max_fall_speed);
    }

    #[test]
    fn gravity_uses_max_accel_at_apex() {
        let cfg = config();

        // At the apex (vy == 0) the blend factor is 1, so one tick removes
        // max_gravity * dt.
        let mut at_apex = CharacterController::new();
        at_apex.velocity.y = 0.0;
        at_apex.update_gravity(&cfg, DT);
        assert_relative_eq!(at_apex.velocity.y, -cfg.max_gravity * DT, epsilon = 1e-5);

        // Outside the band (|vy| >= threshold) the factor is 0: min_gravity.
        let mut outside = CharacterController::new();
        outside.velocity.y = cfg.jump_apex_threshold;
        outside.update_gravity(&cfg, DT);
        assert_relative_eq!(
            outside.velocity.y,
            cfg.jump_apex_threshold - cfg.min_gravity * DT,
            epsilon = 1e-5
        );
    }

    #[test]
    fn gravity_with_zero_apex_threshold_uses_min_gravity() {
        let cfg = config().with_jump_apex_threshold(0.0);
        let mut controller = CharacterController::new();
        controller.velocity.y = 5.0;

        controller.update_gravity(&cfg, DT);

        assert_relative_eq!(controller.velocity.y, 5.0 - cfg.min_gravity * DT, epsilon = 1e-5);
    }

    #[test]
    fn gravity_does_not_snap_upward_motion_while_grounded() {
        // The tick a jump fires, grounding may still report true; upward
        // velocity must survive.
        let cfg = config();
        let mut controller = grounded_controller();
        controller.velocity.y = cfg.jump_speed;

        controller.update_gravity(&cfg, DT);

        assert!(controller.velocity.y > 0.0);
    }

    // ==================== Landing edge ====================

    #[test]
    fn landing_recharges_both_jumps_same_tick() {
        let mut controller = CharacterController::new();
        controller.was_grounded = false;
        controller.is_grounded = true;
        controller.can_jump = false;
        controller.double_jump_active = false;

        controller.update_jump(&config(), false, DT);

        assert!(controller.can_jump);
        assert!(controller.double_jump_active);
    }

    #[test]
    fn staying_grounded_is_not_a_landing_edge() {
        let mut controller = grounded_controller();
        controller.can_jump = false;
        controller.double_jump_active = false;

        controller.update_jump(&config(), false, DT);

        // No recharge without the false -> true transition.
        assert!(!controller.can_jump);
        assert!(!controller.double_jump_active);
    }

    // ==================== Single jump ====================

    #[test]
    fn grounded_jump_sets_jump_speed() {
        let cfg = config();
        let mut controller = grounded_controller();

        controller.update_jump(&cfg, true, DT);

        assert_eq!(controller.velocity.y, cfg.jump_speed);
        assert!(!controller.can_jump);
    }

    #[test]
    fn jump_edge_required() {
        let cfg = config();
        let mut controller = grounded_controller();

        controller.update_jump(&cfg, false, DT);

        assert_eq!(controller.velocity.y, 0.0);
        assert!(controller.can_jump);
    }

    #[test]
    fn jump_rejected_while_moving_up() {
        let cfg = config();
        let mut controller = grounded_controller();
        controller.velocity.y = 1.0;

        controller.update_jump(&cfg, true, DT);

        assert_eq!(controller.velocity.y, 1.0);
        assert!(controller.can_jump);
    }

    #[test]
    fn coyote_jump_succeeds_inside_window() {
        let cfg = config();
        let mut controller = grounded_controller();

        // Walk off a ledge: airborne for a few ticks, still within 0.15 s.
        controller.begin_grounding();
        controller.set_grounded(false);
        controller.update_jump(&cfg, false, DT);
        for _ in 0..3 {
            controller.begin_grounding();
            controller.update_jump(&cfg, false, DT);
        }
        assert!(controller.coyote_timer >= 0.0);

        controller.begin_grounding();
        controller.update_jump(&cfg, true, DT);

        assert_eq!(controller.velocity.y, cfg.jump_speed);
    }

    #[test]
    fn coyote_jump_fails_after_window_expires() {
        let cfg = config().with_coyote_time(0.05);
        let mut controller = grounded_controller();
        controller.coyote_timer = cfg.coyote_time;

        controller.begin_grounding();
        controller.set_grounded(false);
        // 0.05 s window: four 1/60 s ticks push the timer below zero.
        for _ in 0..4 {
            controller.update_jump(&cfg, false, DT);
            controller.begin_grounding();
        }
        assert!(controller.coyote_timer < 0.0);

        controller.update_jump(&cfg, true, DT);

        assert_eq!(controller.velocity.y, 0.0);
        // The permission itself was never consumed, only gated off.
        assert!(controller.can_jump);
    }

    // ==================== Double jump ====================

    fn airborne_with_double_jump() -> (ControllerConfig, CharacterController) {
        let cfg = config().with_double_jump(20.0, 25.0);
        let mut controller = CharacterController::new();
        controller.is_grounded = false;
        controller.was_grounded = false;
        controller.can_jump = false;
        controller.double_jump_active = true;
        controller.coyote_timer = -1.0;
        (cfg, controller)
    }

    #[test]
    fn double_jump_while_falling_replaces_velocity() {
        let (cfg, mut controller) = airborne_with_double_jump();
        controller.velocity.y = -5.0;

        controller.update_jump(&cfg, true, DT);

        assert_eq!(controller.velocity.y, cfg.double_jump.speed);
        assert!(!controller.double_jump_active);
    }

    #[test]
    fn double_jump_while_rising_adds_and_caps() {
        let (cfg, mut controller) = airborne_with_double_jump();
        controller.velocity.y = 10.0;

        controller.update_jump(&cfg, true, DT);

        // min(20 + 10, 25)
        assert_eq!(controller.velocity.y, 25.0);
    }

    #[test]
    fn double_jump_fires_once_per_ground_contact() {
        let (cfg, mut controller) = airborne_with_double_jump();
        controller.velocity.y = -5.0;

        controller.update_jump(&cfg, true, DT);
        let after_first = controller.velocity.y;

        controller.update_jump(&cfg, true, DT);

        assert_eq!(controller.velocity.y, after_first);
    }

    #[test]
    fn double_jump_disabled_does_nothing() {
        let (_, mut controller) = airborne_with_double_jump();
        let cfg = config(); // double jump off
        controller.velocity.y = -5.0;

        controller.update_jump(&cfg, true, DT);

        assert_eq!(controller.velocity.y, -5.0);
        assert!(controller.double_jump_active);
    }

    #[test]
    fn expired_coyote_with_charged_double_jump_double_jumps() {
        // With the coyote window expired the single-jump branch is gated
        // off and the double jump consumes the edge instead.
        let (cfg, mut controller) = airborne_with_double_jump();
        controller.can_jump = true;
        controller.coyote_timer = -0.01;
        controller.velocity.y = -2.0;

        controller.update_jump(&cfg, true, DT);

        assert_eq!(controller.velocity.y, cfg.double_jump.speed);
        assert!(!controller.can_jump);
        assert!(!controller.double_jump_active);
    }

    #[test]
    fn simultaneous_eligibility_lets_double_jump_overwrite() {
        // Airborne inside the coyote window with both jumps available:
        // the single jump fires, then the double jump overwrites it in the
        // same tick. Preserved behavior, not an accident of this port.
        let (cfg, mut controller) = airborne_with_double_jump();
        controller.can_jump = true;
        controller.coyote_timer = 0.1;
        controller.velocity.y = -1.0;

        controller.update_jump(&cfg, true, DT);

        // Single jump set vy = 25, then double jump: min(20 + 25, 25) = 25.
        assert_eq!(controller.velocity.y, cfg.double_jump.max_speed);
        assert!(!controller.can_jump);
        assert!(!controller.double_jump_active);
    }

    // ==================== Edges ====================

    #[test]
    fn landing_and_takeoff_edges() {
        let mut controller = CharacterController::new();
        controller.begin_grounding();
        controller.set_grounded(true);
        assert!(controller.just_landed());
        assert!(!controller.just_left_ground());

        controller.begin_grounding();
        controller.set_grounded(false);
        assert!(controller.just_left_ground());
        assert!(!controller.just_landed());
    }
}
