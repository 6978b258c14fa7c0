#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player locomotion state machine: running, jumping, wall sliding and wall
//! jumping.
//!
//! The system owns its [`LocomotionState`] exclusively. Each call to
//! [`Locomotion::tick`] consumes one [`InputSnapshot`] and the
//! [`ContactState`] probed after the previous world step, rewrites the
//! body's velocity and publishes the animation flags. The update order inside
//! a tick is fixed; later steps observe the effects of earlier ones.

use std::time::Duration;

use glam::Vec2;
use quiver_core::{
    seconds, AnimationFlag, AnimationFlags, AnimationSink, ContactOracle, ContactState,
    InputSnapshot, LayerMask, RigidBody, Side,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gravity used when no world gravity is supplied, in units per second squared.
pub const DEFAULT_GRAVITY: f32 = -9.81;

/// Tunables of the locomotion controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Horizontal speed at full axis deflection.
    pub move_speed: f32,
    /// Vertical velocity set by a grounded jump.
    pub jump_force: f32,
    /// Height above the take-off point where rising is cut off.
    pub max_jump_height: f32,
    /// Extra gravity factor while falling.
    pub fall_multiplier: f32,
    /// Extra gravity factor while rising with jump released.
    pub low_jump_multiplier: f32,
    /// Downward speed held while sliding on a wall.
    pub wall_slide_speed: f32,
    /// Vertical velocity of a wall jump.
    pub wall_jump_force: f32,
    /// Horizontal velocity of a wall jump, pointing away from the wall.
    pub wall_jump_horizontal_force: f32,
    /// Factor applied to the wall-jump force when jumping off the same wall twice.
    pub same_wall_jump_upward_multiplier: f32,
    /// How long horizontal input stays locked after a wall jump.
    #[serde(with = "seconds")]
    pub wall_jump_input_lock_time: Duration,
    /// Continuous slide time required before a wall jump is allowed.
    #[serde(with = "seconds")]
    pub wall_jump_ready_time: Duration,
    /// Layers that count as ground and walls.
    pub ground_layer: LayerMask,
    /// Horizontal speed above which the body counts as running.
    pub run_velocity_threshold: f32,
    /// Vertical velocity below which an airborne body counts as falling.
    pub fall_velocity_threshold: f32,
    /// Vertical velocity below which wall contact starts a slide.
    pub wall_slide_velocity_threshold: f32,
    /// World gravity along y. Supplied by the world, never authored.
    #[serde(skip, default = "default_gravity")]
    pub gravity: f32,
}

const fn default_gravity() -> f32 {
    DEFAULT_GRAVITY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_force: 15.0,
            max_jump_height: 2.0,
            fall_multiplier: 2.5,
            low_jump_multiplier: 2.0,
            wall_slide_speed: 1.2,
            wall_jump_force: 15.0,
            wall_jump_horizontal_force: 8.0,
            same_wall_jump_upward_multiplier: 0.5,
            wall_jump_input_lock_time: Duration::from_millis(200),
            wall_jump_ready_time: Duration::from_millis(100),
            ground_layer: LayerMask::GROUND,
            run_velocity_threshold: 0.1,
            fall_velocity_threshold: -2.0,
            wall_slide_velocity_threshold: 0.5,
            gravity: DEFAULT_GRAVITY,
        }
    }
}

impl Config {
    /// Returns the configuration with the provided world gravity.
    #[must_use]
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }
}

/// Mutable state of the locomotion controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocomotionState {
    /// Direction the character faces.
    pub facing: Side,
    /// Ground sensor result of the current tick.
    pub grounded: bool,
    /// The body is sliding down a wall.
    pub wall_sliding: bool,
    /// Side of the wall being slid on.
    pub wall_direction: Option<Side>,
    /// A jump is rising and still subject to the height cap.
    pub jumped: bool,
    /// Height the current jump started from.
    pub jump_start_y: f32,
    /// Wall side of the most recent wall jump since landing.
    pub last_wall_jump_direction: Option<Side>,
    /// A wall jump is allowed.
    pub wall_jump_ready: bool,
    /// Slide time still required before a wall jump is allowed.
    pub wall_jump_ready_counter: Duration,
    /// Remaining input-lock time after a wall jump.
    pub wall_jump_input_lock_counter: Duration,
    /// Horizontal input forced while input is locked.
    pub locked_move_input: f32,
    /// Horizontal input resolved for the current tick.
    pub move_input: f32,
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self {
            facing: Side::Right,
            grounded: false,
            wall_sliding: false,
            wall_direction: None,
            jumped: false,
            jump_start_y: 0.0,
            last_wall_jump_direction: None,
            wall_jump_ready: false,
            wall_jump_ready_counter: Duration::ZERO,
            wall_jump_input_lock_counter: Duration::ZERO,
            locked_move_input: 0.0,
            move_input: 0.0,
        }
    }
}

impl LocomotionState {
    /// Reports whether horizontal input is currently overridden by a wall jump.
    #[must_use]
    pub fn input_locked(&self) -> bool {
        !self.wall_jump_input_lock_counter.is_zero()
    }
}

/// Jump started during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Jump {
    /// Jump off the ground.
    Ground,
    /// Jump off a wall.
    Wall {
        /// Side of the wall jumped from.
        wall: Side,
        /// Vertical velocity applied, after any repeat penalty.
        vertical: f32,
    },
}

/// Pure system that turns input and contacts into body velocity.
#[derive(Debug)]
pub struct Locomotion {
    config: Config,
    state: LocomotionState,
}

impl Locomotion {
    /// Creates a new locomotion controller facing right.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: LocomotionState::default(),
        }
    }

    /// Tunables the controller was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Read-only view of the controller state.
    #[must_use]
    pub const fn state(&self) -> &LocomotionState {
        &self.state
    }

    /// Direction the character faces.
    #[must_use]
    pub const fn facing(&self) -> Side {
        self.state.facing
    }

    /// Probes the oracle's sensors using the current facing and ground layer.
    #[must_use]
    pub fn probe(&self, oracle: &impl ContactOracle) -> ContactState {
        ContactState::probe(oracle, self.state.facing, self.config.ground_layer)
    }

    /// Advances the controller by one tick.
    ///
    /// Writes the new velocity into `body`, pushes every animation flag into
    /// `animation` and returns the jump started this tick, if any.
    pub fn tick(
        &mut self,
        dt: Duration,
        input: &InputSnapshot,
        contacts: &ContactState,
        body: &mut impl RigidBody,
        animation: &mut impl AnimationSink,
    ) -> Option<Jump> {
        self.update_grounded(contacts, body);
        self.update_wall_slide(dt, contacts, body);
        self.resolve_input(dt, input);
        let jump = if input.jump_pressed {
            self.try_jump(contacts, body)
        } else {
            None
        };
        self.shape_gravity(dt, input, body);
        self.enforce_max_jump_height(body);
        self.update_horizontal(body);
        self.publish_flags(body.velocity(), animation);
        jump
    }

    fn update_grounded(&mut self, contacts: &ContactState, body: &impl RigidBody) {
        self.state.grounded = contacts.grounded;
        if !self.state.grounded {
            return;
        }

        self.state.last_wall_jump_direction = None;
        if body.velocity().y <= 0.0 {
            self.state.jumped = false;
        }
    }

    fn update_wall_slide(
        &mut self,
        dt: Duration,
        contacts: &ContactState,
        body: &mut impl RigidBody,
    ) {
        let velocity = body.velocity();
        let wall = contacts
            .wall_side()
            .filter(|_| !self.state.grounded)
            .filter(|_| velocity.y < self.config.wall_slide_velocity_threshold);

        let Some(wall) = wall else {
            self.state.wall_sliding = false;
            self.state.wall_direction = None;
            self.state.wall_jump_ready = false;
            return;
        };

        let entering = !self.state.wall_sliding;
        self.state.wall_sliding = true;
        self.state.wall_direction = Some(wall);
        body.set_velocity(Vec2::new(velocity.x, -self.config.wall_slide_speed));

        if entering {
            self.state.wall_jump_ready_counter = self.config.wall_jump_ready_time;
            self.state.wall_jump_ready = self.state.wall_jump_ready_counter.is_zero();
        } else if !self.state.wall_jump_ready {
            self.state.wall_jump_ready_counter =
                self.state.wall_jump_ready_counter.saturating_sub(dt);
            if self.state.wall_jump_ready_counter.is_zero() {
                self.state.wall_jump_ready = true;
            }
        }
    }

    fn resolve_input(&mut self, dt: Duration, input: &InputSnapshot) {
        if self.state.input_locked() {
            self.state.move_input = self.state.locked_move_input;
            self.state.wall_jump_input_lock_counter =
                self.state.wall_jump_input_lock_counter.saturating_sub(dt);
        } else {
            self.state.move_input = input.horizontal;
        }
    }

    fn try_jump(&mut self, contacts: &ContactState, body: &mut impl RigidBody) -> Option<Jump> {
        let position = body.position();
        let velocity = body.velocity();

        if self.state.grounded {
            body.set_velocity(Vec2::new(velocity.x, self.config.jump_force));
            self.state.jump_start_y = position.y;
            self.state.jumped = true;
            return Some(Jump::Ground);
        }

        if contacts.wall_side().is_none() || !self.state.wall_jump_ready {
            return None;
        }
        let wall = self.state.wall_direction?;
        let away = wall.opposite();

        let mut vertical = self.config.wall_jump_force;
        if self.state.last_wall_jump_direction == Some(wall) {
            vertical *= self.config.same_wall_jump_upward_multiplier;
        }
        body.set_velocity(Vec2::new(
            away.sign() * self.config.wall_jump_horizontal_force,
            vertical,
        ));

        self.state.jump_start_y = position.y;
        self.state.jumped = true;
        self.state.wall_jump_input_lock_counter = self.config.wall_jump_input_lock_time;
        self.state.locked_move_input = away.sign();
        if self.state.facing != away {
            self.state.facing = away;
        }
        self.state.last_wall_jump_direction = Some(wall);
        self.state.wall_jump_ready = false;

        // Leaving the wall ends the slide; the next slide starts a fresh readiness wait.
        self.state.wall_sliding = false;
        self.state.wall_direction = None;

        debug!(?wall, vertical, "wall jump");
        Some(Jump::Wall { wall, vertical })
    }

    fn shape_gravity(&self, dt: Duration, input: &InputSnapshot, body: &mut impl RigidBody) {
        if self.state.wall_sliding {
            return;
        }

        let mut velocity = body.velocity();
        let step = self.config.gravity * dt.as_secs_f32();
        if velocity.y < 0.0 {
            velocity.y += step * (self.config.fall_multiplier - 1.0);
        } else if velocity.y > 0.0 && !input.jump_held {
            velocity.y += step * (self.config.low_jump_multiplier - 1.0);
        } else {
            return;
        }
        body.set_velocity(velocity);
    }

    fn enforce_max_jump_height(&mut self, body: &mut impl RigidBody) {
        let velocity = body.velocity();
        if !self.state.jumped || velocity.y <= 0.0 {
            return;
        }

        if body.position().y >= self.state.jump_start_y + self.config.max_jump_height {
            body.set_velocity(Vec2::new(velocity.x, 0.0));
            self.state.jumped = false;
        }
    }

    fn update_horizontal(&mut self, body: &mut impl RigidBody) {
        if self.state.input_locked() {
            return;
        }

        let input = self.state.move_input;
        if input > 0.0 && self.state.facing == Side::Left {
            self.state.facing = Side::Right;
        } else if input < 0.0 && self.state.facing == Side::Right {
            self.state.facing = Side::Left;
        }

        let velocity = body.velocity();
        body.set_velocity(Vec2::new(input * self.config.move_speed, velocity.y));
    }

    fn publish_flags(&self, velocity: Vec2, animation: &mut impl AnimationSink) {
        let flags = self.flags(velocity);
        for flag in AnimationFlag::ALL {
            animation.set_flag(flag, flags.get(flag));
        }
    }

    /// Animation flags implied by the current state and a body velocity.
    #[must_use]
    pub fn flags(&self, velocity: Vec2) -> AnimationFlags {
        let airborne = !self.state.grounded && !self.state.wall_sliding;
        AnimationFlags {
            grounded: self.state.grounded,
            wall_sliding: self.state.wall_sliding,
            running: velocity.x.abs() > self.config.run_velocity_threshold,
            jumping: airborne && velocity.y > 0.0,
            falling: airborne && velocity.y < self.config.fall_velocity_threshold,
        }
    }
}

impl Default for Locomotion {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use quiver_core::BodyState;

    use super::*;

    const DT: Duration = Duration::from_millis(25);

    fn airborne_on(wall: Side) -> ContactState {
        ContactState {
            grounded: false,
            wall_left: wall == Side::Left,
            wall_right: wall == Side::Right,
        }
    }

    fn grounded() -> ContactState {
        ContactState {
            grounded: true,
            ..ContactState::default()
        }
    }

    fn jump_input() -> InputSnapshot {
        InputSnapshot {
            jump_pressed: true,
            jump_held: true,
            ..InputSnapshot::default()
        }
    }

    fn slide_until_ready(locomotion: &mut Locomotion, wall: Side, body: &mut BodyState) {
        let mut flags = AnimationFlags::default();
        for _ in 0..5 {
            body.velocity.y = -1.0;
            let _ = locomotion.tick(
                DT,
                &InputSnapshot::default(),
                &airborne_on(wall),
                body,
                &mut flags,
            );
        }
        assert!(locomotion.state().wall_jump_ready);
    }

    #[test]
    fn wall_jump_readiness_arrives_after_ready_time() {
        let mut locomotion = Locomotion::default();
        let mut body = BodyState::new(Vec2::new(0.0, 3.0), Vec2::new(0.0, -1.0));
        let mut flags = AnimationFlags::default();
        let contacts = airborne_on(Side::Right);

        let _ = locomotion.tick(DT, &InputSnapshot::default(), &contacts, &mut body, &mut flags);
        assert!(locomotion.state().wall_sliding);
        assert!(!locomotion.state().wall_jump_ready);

        for _ in 0..3 {
            let _ = locomotion.tick(DT, &InputSnapshot::default(), &contacts, &mut body, &mut flags);
            assert!(!locomotion.state().wall_jump_ready);
        }

        let _ = locomotion.tick(DT, &InputSnapshot::default(), &contacts, &mut body, &mut flags);
        assert!(locomotion.state().wall_jump_ready);
    }

    #[test]
    fn jump_before_readiness_does_nothing() {
        let mut locomotion = Locomotion::default();
        let mut body = BodyState::new(Vec2::new(0.0, 3.0), Vec2::new(0.0, -1.0));
        let mut flags = AnimationFlags::default();
        let contacts = airborne_on(Side::Right);

        let _ = locomotion.tick(DT, &InputSnapshot::default(), &contacts, &mut body, &mut flags);
        let jump = locomotion.tick(DT, &jump_input(), &contacts, &mut body, &mut flags);
        assert_eq!(jump, None);
        assert_eq!(body.velocity.y, -1.2);
    }

    #[test]
    fn leaving_the_wall_clears_readiness() {
        let mut locomotion = Locomotion::default();
        let mut body = BodyState::new(Vec2::new(0.0, 3.0), Vec2::ZERO);
        slide_until_ready(&mut locomotion, Side::Right, &mut body);

        let mut flags = AnimationFlags::default();
        let _ = locomotion.tick(
            DT,
            &InputSnapshot::default(),
            &ContactState::default(),
            &mut body,
            &mut flags,
        );
        assert!(!locomotion.state().wall_sliding);
        assert!(!locomotion.state().wall_jump_ready);
        assert_eq!(locomotion.state().wall_direction, None);
    }

    #[test]
    fn sliding_clamps_fall_speed_and_skips_gravity() {
        let mut locomotion = Locomotion::default();
        let mut body = BodyState::new(Vec2::new(0.0, 3.0), Vec2::new(0.0, -7.0));
        let mut flags = AnimationFlags::default();

        let _ = locomotion.tick(
            DT,
            &InputSnapshot::default(),
            &airborne_on(Side::Left),
            &mut body,
            &mut flags,
        );
        assert_eq!(body.velocity.y, -1.2);
        assert!(flags.wall_sliding);
        assert!(!flags.falling);
        assert!(!flags.jumping);
    }

    #[test]
    fn repeated_wall_jump_off_same_wall_is_weaker() {
        let mut locomotion = Locomotion::default();
        let mut body = BodyState::new(Vec2::new(0.0, 3.0), Vec2::ZERO);
        let mut flags = AnimationFlags::default();

        slide_until_ready(&mut locomotion, Side::Right, &mut body);
        let first = locomotion.tick(DT, &jump_input(), &airborne_on(Side::Right), &mut body, &mut flags);
        assert_eq!(
            first,
            Some(Jump::Wall {
                wall: Side::Right,
                vertical: 15.0
            })
        );
        assert_eq!(body.velocity, Vec2::new(-8.0, 15.0));
        assert_eq!(locomotion.facing(), Side::Left);

        slide_until_ready(&mut locomotion, Side::Right, &mut body);
        let second =
            locomotion.tick(DT, &jump_input(), &airborne_on(Side::Right), &mut body, &mut flags);
        assert_eq!(
            second,
            Some(Jump::Wall {
                wall: Side::Right,
                vertical: 7.5
            })
        );

        slide_until_ready(&mut locomotion, Side::Left, &mut body);
        let third = locomotion.tick(DT, &jump_input(), &airborne_on(Side::Left), &mut body, &mut flags);
        assert_eq!(
            third,
            Some(Jump::Wall {
                wall: Side::Left,
                vertical: 15.0
            })
        );
        assert_eq!(body.velocity, Vec2::new(8.0, 15.0));
        assert_eq!(locomotion.facing(), Side::Right);
    }

    #[test]
    fn landing_forgets_last_wall_jump() {
        let mut locomotion = Locomotion::default();
        let mut body = BodyState::new(Vec2::new(0.0, 3.0), Vec2::ZERO);
        let mut flags = AnimationFlags::default();

        slide_until_ready(&mut locomotion, Side::Right, &mut body);
        let _ = locomotion.tick(DT, &jump_input(), &airborne_on(Side::Right), &mut body, &mut flags);
        assert_eq!(locomotion.state().last_wall_jump_direction, Some(Side::Right));

        body.velocity = Vec2::ZERO;
        let _ = locomotion.tick(DT, &InputSnapshot::default(), &grounded(), &mut body, &mut flags);
        assert_eq!(locomotion.state().last_wall_jump_direction, None);
    }

    #[test]
    fn input_is_locked_after_wall_jump() {
        let mut locomotion = Locomotion::default();
        let mut body = BodyState::new(Vec2::new(0.0, 3.0), Vec2::ZERO);
        let mut flags = AnimationFlags::default();

        slide_until_ready(&mut locomotion, Side::Right, &mut body);
        let _ = locomotion.tick(DT, &jump_input(), &airborne_on(Side::Right), &mut body, &mut flags);

        let toward_wall = InputSnapshot {
            horizontal: 1.0,
            jump_held: true,
            ..InputSnapshot::default()
        };
        for _ in 0..8 {
            let _ = locomotion.tick(DT, &toward_wall, &ContactState::default(), &mut body, &mut flags);
            assert_eq!(locomotion.facing(), Side::Left);
        }
        assert_eq!(body.velocity.x, -5.0);
        assert!(!locomotion.state().input_locked());

        let _ = locomotion.tick(DT, &toward_wall, &ContactState::default(), &mut body, &mut flags);
        assert_eq!(body.velocity.x, 5.0);
        assert_eq!(locomotion.facing(), Side::Right);
    }

    #[test]
    fn ground_jump_records_take_off_height() {
        let mut locomotion = Locomotion::default();
        let mut body = BodyState::new(Vec2::new(0.0, 0.5), Vec2::ZERO);
        let mut flags = AnimationFlags::default();

        let jump = locomotion.tick(DT, &jump_input(), &grounded(), &mut body, &mut flags);
        assert_eq!(jump, Some(Jump::Ground));
        assert_eq!(body.velocity.y, 15.0);
        assert!(locomotion.state().jumped);
        assert_eq!(locomotion.state().jump_start_y, 0.5);
    }

    #[test]
    fn rise_is_cut_exactly_at_max_height() {
        let mut locomotion = Locomotion::default();
        let mut body = BodyState::new(Vec2::new(0.0, 0.5), Vec2::ZERO);
        let mut flags = AnimationFlags::default();
        let held = InputSnapshot {
            jump_held: true,
            ..InputSnapshot::default()
        };

        let _ = locomotion.tick(DT, &jump_input(), &grounded(), &mut body, &mut flags);

        body.position.y = 2.25;
        let _ = locomotion.tick(DT, &held, &ContactState::default(), &mut body, &mut flags);
        assert_eq!(body.velocity.y, 15.0);
        assert!(flags.jumping);

        body.position.y = 2.5;
        let _ = locomotion.tick(DT, &held, &ContactState::default(), &mut body, &mut flags);
        assert_eq!(body.velocity.y, 0.0);
        assert!(!locomotion.state().jumped);
    }

    #[test]
    fn releasing_jump_early_shortens_the_rise() {
        let mut locomotion = Locomotion::default();
        let mut body = BodyState::new(Vec2::new(0.0, 1.0), Vec2::new(0.0, 10.0));
        let mut flags = AnimationFlags::default();
        let dt = Duration::from_millis(125);

        let _ = locomotion.tick(
            dt,
            &InputSnapshot::default(),
            &ContactState::default(),
            &mut body,
            &mut flags,
        );
        let expected = 10.0 + DEFAULT_GRAVITY * 0.125 * (2.0 - 1.0);
        assert!((body.velocity.y - expected).abs() < 1e-5);
    }

    #[test]
    fn falling_uses_fall_multiplier() {
        let mut locomotion = Locomotion::default();
        let mut body = BodyState::new(Vec2::new(0.0, 4.0), Vec2::new(0.0, -3.0));
        let mut flags = AnimationFlags::default();
        let dt = Duration::from_millis(125);

        let _ = locomotion.tick(
            dt,
            &InputSnapshot::default(),
            &ContactState::default(),
            &mut body,
            &mut flags,
        );
        let expected = -3.0 + DEFAULT_GRAVITY * 0.125 * (2.5 - 1.0);
        assert!((body.velocity.y - expected).abs() < 1e-5);
        assert!(flags.falling);
    }

    #[test]
    fn running_turns_the_body() {
        let mut locomotion = Locomotion::default();
        let mut body = BodyState::new(Vec2::new(0.0, 0.5), Vec2::ZERO);
        let mut flags = AnimationFlags::default();
        let left = InputSnapshot {
            horizontal: -0.5,
            ..InputSnapshot::default()
        };

        let _ = locomotion.tick(DT, &left, &grounded(), &mut body, &mut flags);
        assert_eq!(locomotion.facing(), Side::Left);
        assert_eq!(body.velocity.x, -2.5);
        assert!(flags.running);
        assert!(flags.grounded);

        let _ = locomotion.tick(DT, &InputSnapshot::default(), &grounded(), &mut body, &mut flags);
        assert_eq!(locomotion.facing(), Side::Left);
        assert!(!flags.running);
    }

    #[test]
    fn zero_ready_time_allows_a_wall_jump_on_contact() {
        let mut locomotion = Locomotion::new(Config {
            wall_jump_ready_time: Duration::ZERO,
            ..Config::default()
        });
        let mut body = BodyState::new(Vec2::new(0.0, 3.0), Vec2::new(0.0, -1.0));
        let mut flags = AnimationFlags::default();

        let _ = locomotion.tick(
            DT,
            &InputSnapshot::default(),
            &airborne_on(Side::Left),
            &mut body,
            &mut flags,
        );
        assert!(locomotion.state().wall_jump_ready);

        let jump = locomotion.tick(DT, &jump_input(), &airborne_on(Side::Left), &mut body, &mut flags);
        assert_eq!(
            jump,
            Some(Jump::Wall {
                wall: Side::Left,
                vertical: 15.0,
            })
        );
    }

    #[test]
    fn authored_wall_timers_hold_to_the_tick() {
        let config: Config = toml::from_str(
            r#"
            wall_jump_ready_time = 0.1
            wall_jump_input_lock_time = 0.2
            "#,
        )
        .expect("valid config");
        assert_eq!(config.wall_jump_ready_time, Duration::from_millis(100));
        assert_eq!(config.wall_jump_input_lock_time, Duration::from_millis(200));

        let mut locomotion = Locomotion::new(config);
        let mut body = BodyState::new(Vec2::new(0.0, 3.0), Vec2::ZERO);
        let mut flags = AnimationFlags::default();
        slide_until_ready(&mut locomotion, Side::Right, &mut body);
        let jump = locomotion.tick(DT, &jump_input(), &airborne_on(Side::Right), &mut body, &mut flags);
        assert!(matches!(jump, Some(Jump::Wall { .. })));

        let toward_wall = InputSnapshot {
            horizontal: 1.0,
            ..InputSnapshot::default()
        };
        for _ in 0..8 {
            let _ = locomotion.tick(DT, &toward_wall, &ContactState::default(), &mut body, &mut flags);
        }
        assert!(!locomotion.state().input_locked());
        let _ = locomotion.tick(DT, &toward_wall, &ContactState::default(), &mut body, &mut flags);
        assert_eq!(body.velocity.x, 5.0);
    }

    #[test]
    fn config_reads_durations_in_seconds() {
        let config: Config = toml::from_str(
            r#"
            move_speed = 7.0
            wall_jump_ready_time = 0.25
            "#,
        )
        .expect("valid config");
        assert_eq!(config.move_speed, 7.0);
        assert_eq!(config.wall_jump_ready_time, Duration::from_millis(250));
        assert_eq!(config.jump_force, 15.0);
        assert_eq!(config.gravity, DEFAULT_GRAVITY);
    }
}
