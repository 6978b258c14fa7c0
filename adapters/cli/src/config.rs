//! Game tunables and level layout loaded from TOML.

use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use glam::Vec2;
use quiver_core::{Command, Enhancement, EnhancementSet, LayerMask, MultiShot, SplitShot};
use quiver_system_attack as attack;
use quiver_system_locomotion as locomotion;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a configuration is rejected after parsing.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A numeric tunable is NaN or infinite.
    #[error("`{field}` must be finite, got {value}")]
    NonFinite {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value found in the configuration.
        value: f32,
    },
    /// A tunable that must not be negative is negative.
    #[error("`{field}` must not be negative, got {value}")]
    Negative {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value found in the configuration.
        value: f32,
    },
    /// Charging can never reach full force.
    #[error("`attack.max_charge_time` must be greater than zero")]
    ZeroChargeTime,
    /// The launch force range is inverted.
    #[error("`attack.min_launch_force` ({min}) exceeds `attack.max_launch_force` ({max})")]
    InvertedLaunchForce {
        /// Configured minimum force.
        min: f32,
        /// Configured maximum force.
        max: f32,
    },
    /// An enemy would spawn already dead.
    #[error("enemy {index} must start with positive health, got {max_health}")]
    LifelessEnemy {
        /// Position of the enemy in `level.enemies`.
        index: usize,
        /// Configured starting health.
        max_health: i32,
    },
    /// A multi-shot descriptor fans projectiles out with a negative spread.
    #[error("multi-shot spread must not be negative, got {spread}")]
    NegativeSpread {
        /// Configured spread.
        spread: f32,
    },
}

/// Global world parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Gravity along y, in units per second squared.
    pub gravity: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: quiver_world::DEFAULT_GRAVITY,
        }
    }
}

/// Player body placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Spawn position of the body's center.
    pub position: Vec2,
    /// Half width and half height of the body.
    pub half_extents: Vec2,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            position: Vec2::new(0.0, 1.0),
            half_extents: Vec2::new(0.4, 0.5),
        }
    }
}

/// Static level geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolidConfig {
    /// One corner of the rectangle.
    pub min: Vec2,
    /// The opposite corner.
    pub max: Vec2,
    /// Collision layers of the solid.
    #[serde(default = "ground_layer")]
    pub layers: LayerMask,
}

/// Enemy placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    /// Center of the enemy's hit circle.
    pub position: Vec2,
    /// Radius of the hit circle.
    #[serde(default = "default_radius")]
    pub radius: f32,
    /// Starting health.
    #[serde(default = "default_enemy_health")]
    pub max_health: i32,
}

/// Enhancement pickup placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PickupConfig {
    /// Center of the trigger circle.
    pub position: Vec2,
    /// Radius of the trigger circle.
    #[serde(default = "default_radius")]
    pub radius: f32,
    /// Descriptor granted on collection.
    pub enhancement: Enhancement,
}

/// Everything placed into the world before the first tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Player body placement.
    pub player: PlayerConfig,
    /// Static geometry.
    pub solids: Vec<SolidConfig>,
    /// Enemies.
    pub enemies: Vec<EnemyConfig>,
    /// Enhancement pickups.
    pub pickups: Vec<PickupConfig>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        let solid = |min: (f32, f32), max: (f32, f32)| SolidConfig {
            min: Vec2::from(min),
            max: Vec2::from(max),
            layers: LayerMask::GROUND,
        };
        let enemy = |x: f32| EnemyConfig {
            position: Vec2::new(x, 0.5),
            radius: default_radius(),
            max_health: default_enemy_health(),
        };

        Self {
            player: PlayerConfig::default(),
            solids: vec![
                solid((-20.0, -1.0), (20.0, 0.0)),
                solid((-21.0, -1.0), (-20.0, 40.0)),
                solid((20.0, -1.0), (21.0, 40.0)),
                solid((8.0, 2.5), (11.0, 3.0)),
            ],
            enemies: vec![enemy(6.0), enemy(-9.0), enemy(14.0)],
            pickups: vec![
                PickupConfig {
                    position: Vec2::new(3.0, 0.5),
                    radius: default_radius(),
                    enhancement: Enhancement::MultiShot(MultiShot::default()),
                },
                PickupConfig {
                    position: Vec2::new(-4.0, 0.5),
                    radius: default_radius(),
                    enhancement: Enhancement::SplitShot(SplitShot::default()),
                },
            ],
        }
    }
}

/// Authored enhancement descriptors, each distinct value shared once.
///
/// Pickups and starting enhancements that author the same descriptor hand
/// out the same [`Arc`], so collecting a descriptor already active is
/// skipped by the attack controller.
#[derive(Debug, Default)]
pub struct EnhancementAssets {
    shared: Vec<Arc<Enhancement>>,
}

impl EnhancementAssets {
    /// Shared descriptor equal to `enhancement`, allocated on first request.
    pub fn share(&mut self, enhancement: &Enhancement) -> Arc<Enhancement> {
        if let Some(existing) = self.shared.iter().find(|shared| ***shared == *enhancement) {
            return Arc::clone(existing);
        }
        let shared = Arc::new(enhancement.clone());
        self.shared.push(Arc::clone(&shared));
        shared
    }

    /// Shared starting set with repeated descriptors collapsed.
    pub fn starting_set(&mut self, enhancements: &[Enhancement]) -> EnhancementSet {
        let mut set = EnhancementSet::default();
        for enhancement in enhancements {
            let shared = self.share(enhancement);
            if !set.contains_shared(&shared) {
                set.push(shared);
            }
        }
        set
    }
}

impl LevelConfig {
    /// Commands that place the level into an empty world, player first.
    pub fn spawn_commands(&self, assets: &mut EnhancementAssets) -> Vec<Command> {
        let mut commands = vec![Command::SpawnPlayer {
            position: self.player.position,
            half_extents: self.player.half_extents,
        }];
        commands.extend(self.solids.iter().map(|solid| Command::AddSolid {
            min: solid.min,
            max: solid.max,
            layers: solid.layers,
        }));
        commands.extend(self.enemies.iter().map(|enemy| Command::SpawnEnemy {
            position: enemy.position,
            radius: enemy.radius,
            max_health: enemy.max_health,
        }));
        commands.extend(self.pickups.iter().map(|pickup| Command::SpawnPickup {
            position: pickup.position,
            radius: pickup.radius,
            enhancement: assets.share(&pickup.enhancement),
        }));
        commands
    }
}

/// Complete configuration of a headless run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Global world parameters.
    pub world: WorldConfig,
    /// Locomotion tunables.
    pub locomotion: locomotion::Config,
    /// Attack tunables.
    pub attack: attack::Config,
    /// Level layout.
    pub level: LevelConfig,
}

impl GameConfig {
    /// Loads and validates the configuration stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse config toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Locomotion tunables with the world's gravity applied.
    #[must_use]
    pub fn locomotion(&self) -> locomotion::Config {
        self.locomotion.with_gravity(self.world.gravity)
    }

    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("world.gravity", self.world.gravity)?;

        let motion = &self.locomotion;
        for (field, value) in [
            ("locomotion.move_speed", motion.move_speed),
            ("locomotion.jump_force", motion.jump_force),
            ("locomotion.max_jump_height", motion.max_jump_height),
            ("locomotion.fall_multiplier", motion.fall_multiplier),
            ("locomotion.low_jump_multiplier", motion.low_jump_multiplier),
            ("locomotion.wall_slide_speed", motion.wall_slide_speed),
            ("locomotion.wall_jump_force", motion.wall_jump_force),
            (
                "locomotion.wall_jump_horizontal_force",
                motion.wall_jump_horizontal_force,
            ),
            (
                "locomotion.same_wall_jump_upward_multiplier",
                motion.same_wall_jump_upward_multiplier,
            ),
        ] {
            non_negative(field, value)?;
        }
        for (field, value) in [
            ("locomotion.run_velocity_threshold", motion.run_velocity_threshold),
            ("locomotion.fall_velocity_threshold", motion.fall_velocity_threshold),
            (
                "locomotion.wall_slide_velocity_threshold",
                motion.wall_slide_velocity_threshold,
            ),
        ] {
            finite(field, value)?;
        }

        let attack = &self.attack;
        non_negative("attack.melee_range", attack.melee_range)?;
        non_negative("attack.min_launch_force", attack.min_launch_force)?;
        non_negative("attack.max_launch_force", attack.max_launch_force)?;
        if attack.min_launch_force > attack.max_launch_force {
            return Err(ConfigError::InvertedLaunchForce {
                min: attack.min_launch_force,
                max: attack.max_launch_force,
            });
        }
        if attack.max_charge_time.is_zero() {
            return Err(ConfigError::ZeroChargeTime);
        }

        let authored = attack
            .enhancements
            .iter()
            .chain(self.level.pickups.iter().map(|pickup| &pickup.enhancement));
        for enhancement in authored {
            if let Some(multi_shot) = enhancement.as_multi_shot() {
                if !multi_shot.spread.is_finite() || multi_shot.spread < 0.0 {
                    return Err(ConfigError::NegativeSpread {
                        spread: multi_shot.spread,
                    });
                }
            }
        }

        for (index, enemy) in self.level.enemies.iter().enumerate() {
            if enemy.max_health <= 0 {
                return Err(ConfigError::LifelessEnemy {
                    index,
                    max_health: enemy.max_health,
                });
            }
            non_negative("level.enemies.radius", enemy.radius)?;
        }
        for pickup in &self.level.pickups {
            non_negative("level.pickups.radius", pickup.radius)?;
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

const fn ground_layer() -> LayerMask {
    LayerMask::GROUND
}

const fn default_radius() -> f32 {
    0.5
}

const fn default_enemy_health() -> i32 {
    100
}
