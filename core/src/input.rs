//! Per-tick input and environment-contact contracts.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{EntityId, Side};

/// Player input sampled once per tick. Immutable within the tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    /// Horizontal axis, nominally in `-1.0..=1.0`. Used as given.
    pub horizontal: f32,
    /// Jump button went down this tick.
    pub jump_pressed: bool,
    /// Jump button is held.
    pub jump_held: bool,
    /// Melee button went down this tick.
    pub melee_pressed: bool,
    /// Ranged button went down this tick.
    pub ranged_pressed: bool,
    /// Ranged button went up this tick.
    pub ranged_released: bool,
}

/// Bit set of collision layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(u32);

impl LayerMask {
    /// Conventional layer for walkable level geometry.
    pub const GROUND: Self = Self(1 << 0);
    /// Conventional layer for decorative geometry that is not walkable.
    pub const DECOR: Self = Self(1 << 1);

    /// Reports whether both masks share at least one layer.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

/// Named sensor regions attached to the player body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sensor {
    /// Thin strip under the feet.
    Ground,
    /// Upper probe on the facing side.
    WallUpper,
    /// Lower probe on the facing side.
    WallLower,
}

/// Collision queries answered by the external physics layer.
pub trait ContactOracle {
    /// Reports whether the sensor region overlaps geometry on any of `layers`.
    fn is_touching(&self, sensor: Sensor, layers: LayerMask) -> bool;

    /// Enemies whose hit region overlaps the circle, in ascending id order.
    fn enemies_within(&self, center: Vec2, radius: f32) -> Vec<EntityId>;
}

/// What the player body is touching, derived from sensor queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContactState {
    /// Ground sensor overlaps walkable geometry.
    pub grounded: bool,
    /// Wall sensors overlap geometry on the left.
    pub wall_left: bool,
    /// Wall sensors overlap geometry on the right.
    pub wall_right: bool,
}

impl ContactState {
    /// Probes the oracle's sensors.
    ///
    /// Both wall sensors sit on the facing side of the body, so a wall is
    /// attributed to `facing`. A wall only counts when both probes overlap
    /// and the body is airborne.
    #[must_use]
    pub fn probe(oracle: &impl ContactOracle, facing: Side, ground_layer: LayerMask) -> Self {
        let grounded = oracle.is_touching(Sensor::Ground, ground_layer);
        let wall = !grounded
            && oracle.is_touching(Sensor::WallUpper, ground_layer)
            && oracle.is_touching(Sensor::WallLower, ground_layer);

        Self {
            grounded,
            wall_left: wall && facing == Side::Left,
            wall_right: wall && facing == Side::Right,
        }
    }

    /// Side of the wall being touched while airborne, if any.
    #[must_use]
    pub fn wall_side(&self) -> Option<Side> {
        if self.grounded {
            None
        } else if self.wall_right {
            Some(Side::Right)
        } else if self.wall_left {
            Some(Side::Left)
        } else {
            None
        }
    }
}
