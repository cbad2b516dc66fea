//! Per-frame animation of the bike's bounded scalar parameters.
//!
//! One [`AnimationState`] is owned by the frame loop and advanced exactly once
//! per tick by [`AnimationState::update`]. Outside flatpack mode the arrow keys
//! steer and ride the bike; a toggle request folds the front assembly down and
//! a second one unfolds it again.
//!
//! ```
//! use flatpack::{AnimationPhase, AnimationState, InputSnapshot};
//!
//! let mut state = AnimationState::default();
//! state.update(&InputSnapshot::new().with_toggle());
//! assert_eq!(state.phase(), AnimationPhase::PackingDown);
//!
//! for _ in 1..40 {
//!     state.update(&InputSnapshot::new());
//! }
//! assert_eq!(state.flat_pack_base_angle, 0.0);
//! assert_eq!(state.flat_pack_steer_angle, -40.0);
//! ```

use crate::input::{InputSnapshot, Key};

/// Steering limit in degrees, either side of straight ahead.
pub const MAX_STEERING_ANGLE: f32 = 45.0;
/// Steering change per held frame, degrees.
pub const STEERING_STEP: f32 = 1.0;
/// Wheel spin per held frame, degrees.
pub const WHEEL_STEP: f32 = 2.0;
/// Forward travel per held frame.
pub const POSITION_STEP: f32 = 0.05;

/// Head-tube angle of the unfolded bike, degrees.
pub const UNPACKED_BASE_ANGLE: f32 = 25.0;
/// Handlebar fold angle of the unfolded bike, degrees.
pub const UNPACKED_STEER_ANGLE: f32 = 0.0;
/// Head-tube angle of the fully folded bike.
pub const PACKED_BASE_ANGLE: f32 = 0.0;
/// Handlebar fold angle of the fully folded bike.
pub const PACKED_STEER_ANGLE: f32 = -50.0;

/// Head-tube fold per frame while packing.
pub const PACK_BASE_STEP: f32 = 0.625;
/// Head-tube unfold per frame while unpacking. Slightly smaller than
/// [`PACK_BASE_STEP`]; the clamp at the bound keeps the round trip exact.
pub const UNPACK_BASE_STEP: f32 = 0.624;
/// Handlebar fold per frame, both directions.
pub const FOLD_STEER_STEP: f32 = 1.0;

/// Which of the machine's states the flags currently describe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationPhase {
    Idle,
    SteeringAndDriving,
    PackingDown,
    UnpackingUp,
}

impl AnimationPhase {
    /// True for the two folding phases.
    pub fn is_flatpack(self) -> bool {
        matches!(self, AnimationPhase::PackingDown | AnimationPhase::UnpackingUp)
    }
}

/// Bounded animation parameters fed into scene composition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState {
    /// Front fork steering in `[-45, 45]` degrees.
    pub steering_angle: f32,
    /// Wheel spin in `[0, 360)` degrees.
    pub wheel_angle: f32,
    /// Distance along world X.
    pub bike_position: f32,
    /// Head-tube angle in `[0, 25]` degrees.
    pub flat_pack_base_angle: f32,
    /// Handlebar fold angle in `[-50, 0]` degrees.
    pub flat_pack_steer_angle: f32,
    pub flat_pack_active: bool,
    pub unpacking: bool,
    pub(crate) driving: bool,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            steering_angle: 0.0,
            wheel_angle: 0.0,
            bike_position: 0.0,
            flat_pack_base_angle: UNPACKED_BASE_ANGLE,
            flat_pack_steer_angle: UNPACKED_STEER_ANGLE,
            flat_pack_active: false,
            unpacking: false,
            driving: false,
        }
    }
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The state the flags describe. Outside flatpack mode, a frame in which a
    /// driving key was held counts as [`AnimationPhase::SteeringAndDriving`].
    pub fn phase(&self) -> AnimationPhase {
        match (self.flat_pack_active, self.unpacking) {
            (true, false) => AnimationPhase::PackingDown,
            (true, true) => AnimationPhase::UnpackingUp,
            (false, _) if self.driving => AnimationPhase::SteeringAndDriving,
            (false, _) => AnimationPhase::Idle,
        }
    }

    /// Whether the front assembly is folding, folded or unfolding.
    pub fn is_flatpack(&self) -> bool {
        self.flat_pack_active
    }

    /// Advances one frame.
    ///
    /// A toggle request is accepted first, so the frame that enters a folding
    /// phase already moves the fold angles. Driving keys are ignored while in
    /// flatpack mode.
    pub fn update(&mut self, input: &InputSnapshot) {
        let before = self.phase();

        if input.toggle_flatpack() {
            self.toggle_flatpack();
        }

        if self.flat_pack_active {
            self.driving = false;
            if self.unpacking {
                self.unpack_step();
            } else {
                self.pack_step();
            }
        } else {
            self.drive(input);
        }

        let after = self.phase();
        if before != after && (before.is_flatpack() || after.is_flatpack()) {
            tracing::info!(from = ?before, to = ?after, "flatpack phase changed");
        }
    }

    /// Latches `flat_pack_active` on the first request; only a later request
    /// can start unpacking. Requests during unpacking are ignored.
    fn toggle_flatpack(&mut self) {
        if !self.flat_pack_active {
            self.flat_pack_active = true;
        } else if !self.unpacking {
            self.unpacking = true;
        }
    }

    fn drive(&mut self, input: &InputSnapshot) {
        let mut steer = 0.0;
        if input.is_held(Key::Right) {
            steer += STEERING_STEP;
        }
        if input.is_held(Key::Left) {
            steer -= STEERING_STEP;
        }

        let mut ride = 0.0;
        if input.is_held(Key::Up) {
            ride += 1.0;
        }
        if input.is_held(Key::Down) {
            ride -= 1.0;
        }

        self.steering_angle =
            (self.steering_angle + steer).clamp(-MAX_STEERING_ANGLE, MAX_STEERING_ANGLE);
        self.wheel_angle = (self.wheel_angle + ride * WHEEL_STEP).rem_euclid(360.0);
        self.bike_position += ride * POSITION_STEP;

        self.driving = [Key::Up, Key::Down, Key::Left, Key::Right]
            .into_iter()
            .any(|key| input.is_held(key));
    }

    fn pack_step(&mut self) {
        self.flat_pack_base_angle = (self.flat_pack_base_angle - PACK_BASE_STEP).max(PACKED_BASE_ANGLE);
        self.flat_pack_steer_angle =
            (self.flat_pack_steer_angle - FOLD_STEER_STEP).max(PACKED_STEER_ANGLE);
    }

    fn unpack_step(&mut self) {
        self.flat_pack_base_angle =
            (self.flat_pack_base_angle + UNPACK_BASE_STEP).min(UNPACKED_BASE_ANGLE);
        self.flat_pack_steer_angle =
            (self.flat_pack_steer_angle + FOLD_STEER_STEP).min(UNPACKED_STEER_ANGLE);

        if self.flat_pack_base_angle >= UNPACKED_BASE_ANGLE
            && self.flat_pack_steer_angle >= UNPACKED_STEER_ANGLE
        {
            self.flat_pack_active = false;
            self.unpacking = false;
        }
    }
}
