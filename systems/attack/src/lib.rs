#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Attack controller that resolves melee swings and charged ranged fire.

use std::{sync::Arc, time::Duration};

use glam::Vec2;
use quiver_core::{
    seconds, Command, ContactOracle, Enhancement, EnhancementSet, Event, InputSnapshot, Launch,
    ProjectileTemplate, Side,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Tunables of the attack controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Radius of the melee hit circle.
    pub melee_range: f32,
    /// Damage dealt to every enemy inside the melee circle.
    pub melee_damage: i32,
    /// Minimum time between melee swings.
    #[serde(with = "seconds")]
    pub melee_cooldown: Duration,
    /// Melee circle center relative to the body, authored facing right.
    pub attack_point: Option<Vec2>,
    /// Projectile spawn point relative to the body, authored facing right.
    pub fire_point: Option<Vec2>,
    /// Launch force of an uncharged shot.
    pub min_launch_force: f32,
    /// Launch force of a fully charged shot.
    pub max_launch_force: f32,
    /// Charge time that yields the maximum launch force.
    #[serde(with = "seconds")]
    pub max_charge_time: Duration,
    /// Stats projectiles are spawned with. Ranged fire is disabled without one.
    pub projectile: Option<ProjectileTemplate>,
    /// Enhancements active from the start.
    pub enhancements: Vec<Enhancement>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            melee_range: 0.5,
            melee_damage: 40,
            melee_cooldown: Duration::from_millis(500),
            attack_point: Some(Vec2::new(0.75, 0.0)),
            fire_point: Some(Vec2::new(0.75, 0.0)),
            min_launch_force: 5.0,
            max_launch_force: 20.0,
            max_charge_time: Duration::from_secs(2),
            projectile: Some(ProjectileTemplate::default()),
            enhancements: Vec::new(),
        }
    }
}

/// Pure system that turns attack input into damage and spawn commands.
#[derive(Debug)]
pub struct AttackController {
    config: Config,
    melee_timer: Duration,
    charging: bool,
    charge: Duration,
    enhancements: EnhancementSet,
}

impl AttackController {
    /// Creates a new attack controller with the configured starting enhancements.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let enhancements = EnhancementSet::from_values(config.enhancements.iter().cloned());
        Self::with_enhancements(config, enhancements)
    }

    /// Creates a new attack controller starting from already shared descriptors.
    ///
    /// The configured starting list is ignored in favour of `enhancements`.
    #[must_use]
    pub fn with_enhancements(config: Config, enhancements: EnhancementSet) -> Self {
        Self {
            config,
            melee_timer: Duration::ZERO,
            charging: false,
            charge: Duration::ZERO,
            enhancements,
        }
    }

    /// Tunables the controller was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Enhancements that will be handed to the next fired projectiles.
    #[must_use]
    pub const fn enhancements(&self) -> &EnhancementSet {
        &self.enhancements
    }

    /// Reports whether the ranged attack is being charged.
    #[must_use]
    pub const fn is_charging(&self) -> bool {
        self.charging
    }

    /// Time left before another melee swing is allowed.
    #[must_use]
    pub const fn melee_cooldown_remaining(&self) -> Duration {
        self.melee_timer
    }

    /// Activates an enhancement for future shots.
    ///
    /// Returns `false` when the same shared descriptor is already active.
    pub fn grant(&mut self, enhancement: Arc<Enhancement>) -> bool {
        if self.enhancements.contains_shared(&enhancement) {
            debug!(kind = enhancement.label(), "enhancement already active");
            return false;
        }

        info!(kind = enhancement.label(), "enhancement granted");
        self.enhancements.push(enhancement);
        true
    }

    /// Launch force for a shot charged for `charge`.
    ///
    /// Interpolates between the minimum and maximum force; charging past
    /// `max_charge_time` saturates at the maximum.
    #[must_use]
    pub fn launch_force(&self, charge: Duration) -> f32 {
        let ratio = if self.config.max_charge_time.is_zero() {
            1.0
        } else {
            (charge.as_secs_f32() / self.config.max_charge_time.as_secs_f32()).clamp(0.0, 1.0)
        };
        let span = self.config.max_launch_force - self.config.min_launch_force;
        self.config.min_launch_force + span * ratio
    }

    /// Consumes world events and this tick's input to emit attack commands.
    ///
    /// `origin` and `facing` describe the attacker's body; `oracle` answers
    /// which enemies overlap the melee circle.
    #[allow(clippy::too_many_arguments)]
    pub fn handle(
        &mut self,
        events: &[Event],
        dt: Duration,
        input: &InputSnapshot,
        origin: Vec2,
        facing: Side,
        oracle: &impl ContactOracle,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::PickupCollected { enhancement, .. } = event {
                let _ = self.grant(Arc::clone(enhancement));
            }
        }

        self.melee_timer = self.melee_timer.saturating_sub(dt);
        if input.melee_pressed && self.melee_timer.is_zero() {
            self.melee(origin, facing, oracle, out);
        }

        if input.ranged_pressed {
            self.charging = true;
            self.charge = Duration::ZERO;
        }
        if self.charging {
            self.charge = self.charge.saturating_add(dt);
        }
        if input.ranged_released && self.charging {
            self.charging = false;
            self.fire(origin, facing, out);
        }
    }

    fn melee(
        &mut self,
        origin: Vec2,
        facing: Side,
        oracle: &impl ContactOracle,
        out: &mut Vec<Command>,
    ) {
        let Some(offset) = self.config.attack_point else {
            return;
        };

        let center = origin + mirror(offset, facing);
        let targets = oracle.enemies_within(center, self.config.melee_range);
        debug!(targets = targets.len(), "melee swing");
        for enemy in targets {
            out.push(Command::DamageEnemy {
                enemy,
                amount: self.config.melee_damage,
            });
        }
        self.melee_timer = self.config.melee_cooldown;
    }

    fn fire(&self, origin: Vec2, facing: Side, out: &mut Vec<Command>) {
        let (Some(template), Some(offset)) = (self.config.projectile, self.config.fire_point) else {
            return;
        };

        let position = origin + mirror(offset, facing);
        let launch = Launch::new(facing.unit(), self.launch_force(self.charge));
        let enhancements = self.enhancements.without_multi_shot();

        out.push(Command::SpawnProjectile {
            template,
            position,
            launch,
            enhancements: enhancements.clone(),
        });

        let Some(multi_shot) = self.enhancements.multi_shot() else {
            return;
        };
        for index in 0..multi_shot.additional_projectiles {
            out.push(Command::SpawnProjectile {
                template,
                position: position + Vec2::new(0.0, multi_shot.offset(index)),
                launch,
                enhancements: enhancements.clone(),
            });
        }
        debug!(
            extra = multi_shot.additional_projectiles,
            force = launch.force,
            "multi-shot fired"
        );
    }
}

impl Default for AttackController {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn mirror(offset: Vec2, facing: Side) -> Vec2 {
    Vec2::new(offset.x * facing.sign(), offset.y)
}
