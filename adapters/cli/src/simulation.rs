//! Fixed-order tick driver wiring the systems to the world.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    mem,
    time::Duration,
};

use anyhow::{Context, Result};
use quiver_core::{AnimationFlags, Command, ContactState, EntityId, Event, InputSnapshot};
use quiver_system_attack::AttackController;
use quiver_system_locomotion::{Jump, Locomotion};
use quiver_system_projectile::ProjectileSystem;
use quiver_world::{self as world, query, World};
use tracing::{debug, trace};

use crate::config::{EnhancementAssets, GameConfig};

/// Running totals gathered from world events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Stats {
    /// Ticks simulated.
    pub ticks: u64,
    /// Jumps off the ground.
    pub jumps: u32,
    /// Jumps off a wall.
    pub wall_jumps: u32,
    /// Projectiles that entered the world, split children included.
    pub projectiles_spawned: u32,
    /// Total damage enemies received.
    pub damage_dealt: i64,
    /// Enemies that died.
    pub enemies_killed: u32,
    /// Pickups the player collected.
    pub pickups_collected: u32,
}

/// One player, the level and every gameplay system.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    player: EntityId,
    locomotion: Locomotion,
    attack: AttackController,
    projectiles: ProjectileSystem,
    animation: AnimationFlags,
    carried: Vec<Event>,
    stats: Stats,
}

impl Simulation {
    /// Creates a new simulation with the configured level in place.
    pub fn new(config: &GameConfig) -> Result<Self> {
        let mut world = World::with_gravity(config.world.gravity);
        let mut assets = EnhancementAssets::default();
        let starting = assets.starting_set(&config.attack.enhancements);
        let mut events = Vec::new();
        for command in config.level.spawn_commands(&mut assets) {
            world::apply(&mut world, command, &mut events);
        }
        let player = events
            .iter()
            .find_map(|event| match event {
                Event::PlayerSpawned { player } => Some(*player),
                _ => None,
            })
            .context("level did not spawn a player")?;

        Ok(Self {
            world,
            player,
            locomotion: Locomotion::new(config.locomotion()),
            attack: AttackController::with_enhancements(config.attack.clone(), starting),
            projectiles: ProjectileSystem::new(),
            animation: AnimationFlags::default(),
            carried: Vec::new(),
            stats: Stats::default(),
        })
    }

    /// Authoritative world state.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Locomotion controller of the player.
    #[must_use]
    pub const fn locomotion(&self) -> &Locomotion {
        &self.locomotion
    }

    /// Attack controller of the player.
    #[must_use]
    pub const fn attack(&self) -> &AttackController {
        &self.attack
    }

    /// Animation flags published on the last tick.
    #[must_use]
    pub const fn animation(&self) -> AnimationFlags {
        self.animation
    }

    /// Totals gathered so far.
    #[must_use]
    pub const fn stats(&self) -> Stats {
        self.stats
    }

    /// Advances the simulation by one tick.
    ///
    /// Locomotion and attacks see the contacts of the previous world step;
    /// the world then steps and the projectile system reacts until no
    /// command is left.
    pub fn step(&mut self, dt: Duration, input: &InputSnapshot) {
        let Some(mut body) = query::player_body(&self.world) else {
            return;
        };
        let contacts = query::player_contacts(&self.world)
            .map(|oracle| self.locomotion.probe(&oracle))
            .unwrap_or_else(ContactState::default);

        match self
            .locomotion
            .tick(dt, input, &contacts, &mut body, &mut self.animation)
        {
            Some(Jump::Ground) => self.stats.jumps += 1,
            Some(Jump::Wall { .. }) => self.stats.wall_jumps += 1,
            None => {}
        }

        let facing = self.locomotion.facing();
        let mut commands = vec![
            Command::SetVelocity {
                entity: self.player,
                velocity: body.velocity,
            },
            Command::SetFacing {
                entity: self.player,
                facing,
            },
        ];

        let carried = mem::take(&mut self.carried);
        if let Some(oracle) = query::player_contacts(&self.world) {
            self.attack.handle(
                &carried,
                dt,
                input,
                body.position,
                facing,
                &oracle,
                &mut commands,
            );
        }

        commands.push(Command::Tick { dt });
        self.pump(commands);
        self.stats.ticks += 1;
        trace!(tick = self.stats.ticks, ?contacts, "tick complete");
    }

    fn pump(&mut self, commands: Vec<Command>) {
        let mut pending = commands;
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }

            let world = &self.world;
            self.projectiles
                .handle(&events, |id| query::projectile(world, id), &mut pending);

            for event in events {
                self.record(&event);
                if matches!(event, Event::PickupCollected { .. }) {
                    self.carried.push(event);
                }
            }
        }
    }

    fn record(&mut self, event: &Event) {
        match event {
            Event::ProjectileSpawned { .. } => self.stats.projectiles_spawned += 1,
            Event::EnemyDamaged { amount, .. } => self.stats.damage_dealt += i64::from(*amount),
            Event::EnemyDied { enemy } => {
                self.stats.enemies_killed += 1;
                debug!(enemy = enemy.get(), "kill recorded");
            }
            Event::PickupCollected { .. } => self.stats.pickups_collected += 1,
            _ => {}
        }
    }

    /// Hash of the observable simulation state, stable within one build.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.stats.hash(&mut hasher);
        query::tick_index(&self.world).hash(&mut hasher);
        if let Some(body) = query::player_body(&self.world) {
            for value in [body.position, body.velocity] {
                value.x.to_bits().hash(&mut hasher);
                value.y.to_bits().hash(&mut hasher);
            }
        }
        for enemy in query::enemies(&self.world) {
            enemy.id.hash(&mut hasher);
            enemy.current_health.hash(&mut hasher);
        }
        for projectile in query::projectiles(&self.world) {
            projectile.id.hash(&mut hasher);
            projectile.position.x.to_bits().hash(&mut hasher);
            projectile.position.y.to_bits().hash(&mut hasher);
        }
        self.attack.enhancements().len().hash(&mut hasher);
        hasher.finish()
    }
}
