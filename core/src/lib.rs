#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Quiver gameplay simulation.
//!
//! This crate defines the message surface that connects the driver, the
//! authoritative world, and pure systems. Systems read immutable snapshots and
//! collaborator traits ([`RigidBody`], [`ContactOracle`], [`AnimationSink`]),
//! and respond with [`Command`] values describing desired world mutations. The
//! world executes those commands via its `apply` entry point and broadcasts
//! [`Event`] values that systems react to on the next pump.

use std::{sync::Arc, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod enhancement;
pub mod input;
pub mod seconds;

pub use enhancement::{Enhancement, EnhancementSet, EnhancementTarget, MultiShot, SplitShot};
pub use input::{ContactOracle, ContactState, InputSnapshot, LayerMask, Sensor};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock and steps body kinematics by `dt`.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Adds a static axis-aligned solid on the provided collision layers.
    AddSolid {
        /// Lower-left corner of the solid in world units.
        min: Vec2,
        /// Upper-right corner of the solid in world units.
        max: Vec2,
        /// Layers the solid belongs to.
        layers: LayerMask,
    },
    /// Spawns the player body. Only one player may exist at a time.
    SpawnPlayer {
        /// Center of the player's bounding box.
        position: Vec2,
        /// Half width and half height of the player's bounding box.
        half_extents: Vec2,
    },
    /// Spawns a damageable enemy.
    SpawnEnemy {
        /// Center of the enemy's hit circle.
        position: Vec2,
        /// Radius of the enemy's hit circle.
        radius: f32,
        /// Health the enemy starts with.
        max_health: i32,
    },
    /// Places a pickup that grants an enhancement to the player on contact.
    SpawnPickup {
        /// Center of the pickup's trigger circle.
        position: Vec2,
        /// Radius of the pickup's trigger circle.
        radius: f32,
        /// Shared descriptor granted when collected.
        enhancement: Arc<Enhancement>,
    },
    /// Instantiates a projectile and launches it.
    SpawnProjectile {
        /// Base stats the projectile starts from.
        template: ProjectileTemplate,
        /// Spawn position in world units.
        position: Vec2,
        /// Launch direction and force.
        launch: Launch,
        /// Enhancement snapshot handed to the projectile.
        enhancements: EnhancementSet,
    },
    /// Overrides the linear velocity of a body.
    SetVelocity {
        /// Entity whose body is updated.
        entity: EntityId,
        /// Velocity to assign.
        velocity: Vec2,
    },
    /// Updates the facing side the player body presents.
    SetFacing {
        /// Entity whose facing is updated.
        entity: EntityId,
        /// Side the entity now faces.
        facing: Side,
    },
    /// Delivers damage to an enemy. Absent or dead enemies ignore the request.
    DamageEnemy {
        /// Identifier of the enemy receiving damage.
        enemy: EntityId,
        /// Amount subtracted from the enemy's health.
        amount: i32,
    },
    /// Removes an entity from the world. Destroying an absent entity is a no-op.
    DestroyEntity {
        /// Identifier of the entity to remove.
        entity: EntityId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player body was created.
    PlayerSpawned {
        /// Identifier assigned to the player.
        player: EntityId,
    },
    /// Confirms that an enemy was created.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EntityId,
    },
    /// Confirms that a pickup was placed.
    PickupSpawned {
        /// Identifier assigned to the pickup.
        pickup: EntityId,
    },
    /// Confirms that a projectile was instantiated and launched.
    ProjectileSpawned {
        /// Identifier assigned to the projectile.
        projectile: EntityId,
        /// Base stats the projectile starts from.
        template: ProjectileTemplate,
        /// Enhancement snapshot handed to the projectile.
        enhancements: EnhancementSet,
    },
    /// Reports that a projectile began overlapping another entity.
    ProjectileContact {
        /// Projectile that made contact.
        projectile: EntityId,
        /// Entity the projectile touched.
        other: EntityId,
        /// Identity tag carried by the touched entity.
        tag: EntityTag,
    },
    /// Reports damage applied to a living enemy.
    EnemyDamaged {
        /// Identifier of the damaged enemy.
        enemy: EntityId,
        /// Amount of damage applied.
        amount: i32,
        /// Health remaining after the damage.
        remaining: i32,
    },
    /// Reports that an enemy's health crossed zero. Emitted once per enemy.
    EnemyDied {
        /// Identifier of the enemy that died.
        enemy: EntityId,
    },
    /// Reports that the player touched a pickup.
    PickupCollected {
        /// Identifier of the collected pickup.
        pickup: EntityId,
        /// Descriptor carried by the pickup.
        enhancement: Arc<Enhancement>,
    },
    /// Confirms that an entity was removed from the world.
    EntityDestroyed {
        /// Identifier of the removed entity.
        entity: EntityId,
        /// Identity tag the entity carried.
        tag: EntityTag,
    },
}

/// Unique identifier assigned to a world entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identity tag carried by every world entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// The player-controlled body that fires projectiles.
    Player,
    /// A damageable enemy.
    Enemy,
    /// A projectile in flight.
    Projectile,
    /// Static level geometry.
    Scenery,
    /// A collectible enhancement pickup.
    Pickup,
}

/// Horizontal side, used both for facing and for wall contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Toward negative X.
    Left,
    /// Toward positive X.
    Right,
}

impl Side {
    /// Signed unit value of the side: `-1.0` for left, `1.0` for right.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit vector pointing toward the side.
    #[must_use]
    pub const fn unit(self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }
}

/// Base stats a projectile is instantiated from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileTemplate {
    /// Damage delivered to an enemy on contact.
    pub damage: i32,
    /// Time after spawning at which the projectile destroys itself.
    #[serde(with = "seconds")]
    pub life_time: Duration,
}

impl Default for ProjectileTemplate {
    fn default() -> Self {
        Self {
            damage: 1,
            life_time: Duration::from_secs(3),
        }
    }
}

/// Direction and force a projectile is launched with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Launch {
    /// Direction of travel. Callers pass normalized vectors.
    pub direction: Vec2,
    /// Speed along `direction`.
    pub force: f32,
}

impl Launch {
    /// Creates a new launch description.
    #[must_use]
    pub const fn new(direction: Vec2, force: f32) -> Self {
        Self { direction, force }
    }

    /// Initial velocity imparted by the launch.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.direction * self.force
    }

    /// Side the projectile visuals face; leftward travel mirrors the sprite.
    #[must_use]
    pub fn facing(&self) -> Side {
        if self.direction.x < 0.0 {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// Handle onto a body integrated by an external rigid-body simulator.
pub trait RigidBody {
    /// Current position of the body's center.
    fn position(&self) -> Vec2;

    /// Current linear velocity.
    fn velocity(&self) -> Vec2;

    /// Overrides the linear velocity.
    fn set_velocity(&mut self, velocity: Vec2);
}

/// Copy of a body's kinematic state that systems mutate during a tick.
///
/// Writes are sequential and last-write-wins; the driver forwards the final
/// velocity to the world as a [`Command::SetVelocity`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyState {
    /// Position of the body's center.
    pub position: Vec2,
    /// Linear velocity of the body.
    pub velocity: Vec2,
}

impl BodyState {
    /// Creates a body state from a position and velocity.
    #[must_use]
    pub const fn new(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }
}

impl RigidBody for BodyState {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }
}

/// Named boolean parameters driven on the animation state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnimationFlag {
    /// The body stands on ground.
    IsGrounded,
    /// The body slides down a wall.
    IsWallSliding,
    /// The body moves horizontally faster than the run threshold.
    IsRunning,
    /// The body rises while airborne.
    IsJumping,
    /// The body falls faster than the fall threshold while airborne.
    IsFalling,
}

impl AnimationFlag {
    /// Every flag in the order they are emitted.
    pub const ALL: [Self; 5] = [
        Self::IsGrounded,
        Self::IsWallSliding,
        Self::IsRunning,
        Self::IsJumping,
        Self::IsFalling,
    ];
}

/// Fire-and-forget receiver of animation flags.
pub trait AnimationSink {
    /// Sets the named flag to the provided value.
    fn set_flag(&mut self, flag: AnimationFlag, value: bool);
}

/// Last value written for every animation flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimationFlags {
    /// Value of [`AnimationFlag::IsGrounded`].
    pub grounded: bool,
    /// Value of [`AnimationFlag::IsWallSliding`].
    pub wall_sliding: bool,
    /// Value of [`AnimationFlag::IsRunning`].
    pub running: bool,
    /// Value of [`AnimationFlag::IsJumping`].
    pub jumping: bool,
    /// Value of [`AnimationFlag::IsFalling`].
    pub falling: bool,
}

impl AnimationFlags {
    /// Reads the stored value of a flag.
    #[must_use]
    pub const fn get(&self, flag: AnimationFlag) -> bool {
        match flag {
            AnimationFlag::IsGrounded => self.grounded,
            AnimationFlag::IsWallSliding => self.wall_sliding,
            AnimationFlag::IsRunning => self.running,
            AnimationFlag::IsJumping => self.jumping,
            AnimationFlag::IsFalling => self.falling,
        }
    }
}

impl AnimationSink for AnimationFlags {
    fn set_flag(&mut self, flag: AnimationFlag, value: bool) {
        let slot = match flag {
            AnimationFlag::IsGrounded => &mut self.grounded,
            AnimationFlag::IsWallSliding => &mut self.wall_sliding,
            AnimationFlag::IsRunning => &mut self.running,
            AnimationFlag::IsJumping => &mut self.jumping,
            AnimationFlag::IsFalling => &mut self.falling,
        };
        *slot = value;
    }
}

/// Read-only snapshot of a projectile body used by systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: EntityId,
    /// Position of the projectile.
    pub position: Vec2,
    /// Linear velocity of the projectile.
    pub velocity: Vec2,
    /// Side the projectile's visuals face.
    pub facing: Side,
}

/// Read-only snapshot of an enemy used by systems and adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EntityId,
    /// Center of the enemy's hit circle.
    pub position: Vec2,
    /// Radius of the enemy's hit circle.
    pub radius: f32,
    /// Health remaining.
    pub current_health: i32,
    /// Health the enemy spawned with.
    pub max_health: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn entity_id_round_trips_through_bincode() {
        assert_round_trip(&EntityId::new(42));
    }

    #[test]
    fn projectile_template_round_trips_through_bincode() {
        assert_round_trip(&ProjectileTemplate {
            damage: 7,
            life_time: Duration::from_millis(1500),
        });
    }

    #[test]
    fn leftward_launch_mirrors_facing() {
        let launch = Launch::new(Vec2::new(-1.0, 0.0), 12.0);
        assert_eq!(launch.facing(), Side::Left);
        assert_eq!(launch.velocity(), Vec2::new(-12.0, 0.0));

        let launch = Launch::new(Vec2::new(0.0, 1.0), 3.0);
        assert_eq!(launch.facing(), Side::Right);
    }

    #[test]
    fn opposite_sides_mirror() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite().sign(), -1.0);
    }

    #[test]
    fn animation_flags_record_last_write() {
        let mut flags = AnimationFlags::default();
        flags.set_flag(AnimationFlag::IsRunning, true);
        flags.set_flag(AnimationFlag::IsFalling, true);
        flags.set_flag(AnimationFlag::IsFalling, false);

        assert!(flags.get(AnimationFlag::IsRunning));
        assert!(!flags.get(AnimationFlag::IsFalling));
    }
}
