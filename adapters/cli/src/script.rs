//! Seeded random input that stands in for a player.

use quiver_core::InputSnapshot;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const STEER_CHANCE: f64 = 0.05;
const JUMP_CHANCE: f64 = 0.04;
const MELEE_CHANCE: f64 = 0.02;
const CHARGE_CHANCE: f64 = 0.03;
const MAX_JUMP_HOLD_TICKS: u32 = 30;
const MAX_CHARGE_TICKS: u32 = 150;

/// Deterministic stream of plausible button presses.
///
/// Buttons are held for random spans so jumps vary in height and ranged
/// shots vary in charge. The same seed always yields the same stream.
#[derive(Debug)]
pub struct RandomInput {
    rng: ChaCha8Rng,
    horizontal: f32,
    jump_hold: u32,
    charge_hold: Option<u32>,
}

impl RandomInput {
    /// Creates a new input stream from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            horizontal: 0.0,
            jump_hold: 0,
            charge_hold: None,
        }
    }

    /// Samples the input of the next tick.
    pub fn sample(&mut self) -> InputSnapshot {
        if self.rng.gen_bool(STEER_CHANCE) {
            self.horizontal = [-1.0, 0.0, 1.0][self.rng.gen_range(0..3)];
        }

        let mut input = InputSnapshot {
            horizontal: self.horizontal,
            ..InputSnapshot::default()
        };

        if self.jump_hold > 0 {
            self.jump_hold -= 1;
            input.jump_held = true;
        } else if self.rng.gen_bool(JUMP_CHANCE) {
            self.jump_hold = self.rng.gen_range(1..=MAX_JUMP_HOLD_TICKS);
            input.jump_pressed = true;
            input.jump_held = true;
        }

        input.melee_pressed = self.rng.gen_bool(MELEE_CHANCE);

        match self.charge_hold {
            Some(0) => {
                input.ranged_released = true;
                self.charge_hold = None;
            }
            Some(remaining) => self.charge_hold = Some(remaining - 1),
            None => {
                if self.rng.gen_bool(CHARGE_CHANCE) {
                    input.ranged_pressed = true;
                    self.charge_hold = Some(self.rng.gen_range(0..=MAX_CHARGE_TICKS));
                }
            }
        }

        input
    }
}

impl Iterator for RandomInput {
    type Item = InputSnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.sample())
    }
}
