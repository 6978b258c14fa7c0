#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Quiver.
//!
//! The world stands in for the host engine the gameplay systems run inside:
//! it owns bodies, level geometry, enemies and pickups, integrates velocities
//! on every [`Command::Tick`], answers contact queries, and reports what
//! happened as [`Event`] values. It performs the least physics needed to
//! drive the systems headlessly: gravity on the player body, per-axis push-out
//! against solids, and enter-only overlap reporting for projectiles.

mod enemies;
mod geometry;

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use glam::Vec2;
use quiver_core::{Command, Enhancement, EntityId, EntityTag, Event, LayerMask, Sensor, Side};
use tracing::{debug, info};

use crate::{
    enemies::{DamageOutcome, EnemyRegistry, EnemyState, Health},
    geometry::{circles_overlap, Aabb},
};

/// Gravity applied to the player body unless configured otherwise.
pub const DEFAULT_GRAVITY: f32 = -9.81;
/// Radius of every projectile's contact circle.
pub const PROJECTILE_RADIUS: f32 = 0.1;

const SENSOR_DEPTH: f32 = 0.05;
const SENSOR_INSET: f32 = 0.02;

#[derive(Debug)]
struct Solid {
    id: EntityId,
    bounds: Aabb,
    layers: LayerMask,
}

#[derive(Debug)]
struct PlayerBody {
    id: EntityId,
    center: Vec2,
    half_extents: Vec2,
    velocity: Vec2,
    facing: Side,
}

impl PlayerBody {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center, self.half_extents)
    }

    fn sensor(&self, sensor: Sensor) -> Aabb {
        let bounds = self.bounds();
        match sensor {
            Sensor::Ground => Aabb::new(
                Vec2::new(bounds.min.x + SENSOR_INSET, bounds.min.y - SENSOR_DEPTH),
                Vec2::new(bounds.max.x - SENSOR_INSET, bounds.min.y),
            ),
            Sensor::WallUpper | Sensor::WallLower => {
                let (near, far) = match self.facing {
                    Side::Right => (bounds.max.x, bounds.max.x + SENSOR_DEPTH),
                    Side::Left => (bounds.min.x, bounds.min.x - SENSOR_DEPTH),
                };
                let (low, high) = if sensor == Sensor::WallUpper {
                    (self.center.y, bounds.max.y - SENSOR_INSET)
                } else {
                    (bounds.min.y + SENSOR_INSET, self.center.y)
                };
                Aabb::new(Vec2::new(near, low), Vec2::new(far, high))
            }
        }
    }
}

#[derive(Debug)]
struct ProjectileBody {
    id: EntityId,
    position: Vec2,
    velocity: Vec2,
    facing: Side,
}

#[derive(Debug)]
struct Pickup {
    id: EntityId,
    position: Vec2,
    radius: f32,
    enhancement: Arc<Enhancement>,
}

/// Represents the authoritative Quiver world state.
#[derive(Debug)]
pub struct World {
    gravity: f32,
    tick_index: u64,
    next_id: u32,
    solids: Vec<Solid>,
    player: Option<PlayerBody>,
    enemies: EnemyRegistry,
    projectiles: BTreeMap<EntityId, ProjectileBody>,
    pickups: BTreeMap<EntityId, Pickup>,
    overlaps: BTreeSet<(EntityId, EntityId)>,
}

impl World {
    /// Creates an empty world using [`DEFAULT_GRAVITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_gravity(DEFAULT_GRAVITY)
    }

    /// Creates an empty world that pulls the player body with `gravity`
    /// units per second squared along Y.
    #[must_use]
    pub fn with_gravity(gravity: f32) -> Self {
        Self {
            gravity,
            tick_index: 0,
            next_id: 1,
            solids: Vec::new(),
            player: None,
            enemies: EnemyRegistry::default(),
            projectiles: BTreeMap::new(),
            pickups: BTreeMap::new(),
            overlaps: BTreeSet::new(),
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn tag_of(&self, entity: EntityId) -> Option<EntityTag> {
        if self.projectiles.contains_key(&entity) {
            Some(EntityTag::Projectile)
        } else if self.enemies.contains(entity) {
            Some(EntityTag::Enemy)
        } else if self.pickups.contains_key(&entity) {
            Some(EntityTag::Pickup)
        } else if self.player.as_ref().is_some_and(|player| player.id == entity) {
            Some(EntityTag::Player)
        } else if self.solids.iter().any(|solid| solid.id == entity) {
            Some(EntityTag::Scenery)
        } else {
            None
        }
    }

    fn step_player(&mut self, dt: f32) {
        let Some(player) = self.player.as_mut() else {
            return;
        };

        player.velocity.y += self.gravity * dt;

        player.center.x += player.velocity.x * dt;
        for solid in &self.solids {
            if !solid.bounds.overlaps(&player.bounds()) {
                continue;
            }
            if player.velocity.x > 0.0 {
                player.center.x = solid.bounds.min.x - player.half_extents.x;
                player.velocity.x = 0.0;
            } else if player.velocity.x < 0.0 {
                player.center.x = solid.bounds.max.x + player.half_extents.x;
                player.velocity.x = 0.0;
            }
        }

        player.center.y += player.velocity.y * dt;
        for solid in &self.solids {
            if !solid.bounds.overlaps(&player.bounds()) {
                continue;
            }
            if player.velocity.y < 0.0 {
                player.center.y = solid.bounds.max.y + player.half_extents.y;
                player.velocity.y = 0.0;
            } else if player.velocity.y > 0.0 {
                player.center.y = solid.bounds.min.y - player.half_extents.y;
                player.velocity.y = 0.0;
            }
        }
    }

    fn step_projectiles(&mut self, dt: f32) {
        for projectile in self.projectiles.values_mut() {
            projectile.position += projectile.velocity * dt;
        }
    }

    fn refresh_projectile_contacts(&mut self, out_events: &mut Vec<Event>) {
        let mut current = BTreeSet::new();

        for projectile in self.projectiles.values() {
            let mut touching: Vec<(EntityId, EntityTag)> = Vec::new();
            if let Some(player) = &self.player {
                if player
                    .bounds()
                    .overlaps_circle(projectile.position, PROJECTILE_RADIUS)
                {
                    touching.push((player.id, EntityTag::Player));
                }
            }
            touching.extend(
                self.enemies
                    .iter()
                    .filter(|enemy| {
                        circles_overlap(
                            projectile.position,
                            PROJECTILE_RADIUS,
                            enemy.position,
                            enemy.radius,
                        )
                    })
                    .map(|enemy| (enemy.id, EntityTag::Enemy)),
            );
            touching.extend(
                self.solids
                    .iter()
                    .filter(|solid| {
                        solid
                            .bounds
                            .overlaps_circle(projectile.position, PROJECTILE_RADIUS)
                    })
                    .map(|solid| (solid.id, EntityTag::Scenery)),
            );

            for (other, tag) in touching {
                let pair = (projectile.id, other);
                if !self.overlaps.contains(&pair) {
                    out_events.push(Event::ProjectileContact {
                        projectile: projectile.id,
                        other,
                        tag,
                    });
                }
                let _ = current.insert(pair);
            }
        }

        self.overlaps = current;
    }

    fn collect_pickups(&mut self, out_events: &mut Vec<Event>) {
        let Some(player) = &self.player else {
            return;
        };

        let bounds = player.bounds();
        let collected: Vec<EntityId> = self
            .pickups
            .values()
            .filter(|pickup| bounds.overlaps_circle(pickup.position, pickup.radius))
            .map(|pickup| pickup.id)
            .collect();

        for id in collected {
            if let Some(pickup) = self.pickups.remove(&id) {
                info!(
                    pickup = id.get(),
                    enhancement = pickup.enhancement.label(),
                    "pickup collected"
                );
                out_events.push(Event::PickupCollected {
                    pickup: id,
                    enhancement: pickup.enhancement,
                });
                out_events.push(Event::EntityDestroyed {
                    entity: id,
                    tag: EntityTag::Pickup,
                });
            }
        }
    }

    fn forget_overlaps(&mut self, entity: EntityId) {
        self.overlaps
            .retain(|(projectile, other)| *projectile != entity && *other != entity);
    }

    fn destroy(&mut self, entity: EntityId, out_events: &mut Vec<Event>) {
        let Some(tag) = self.tag_of(entity) else {
            return;
        };

        match tag {
            EntityTag::Projectile => {
                let _ = self.projectiles.remove(&entity);
            }
            EntityTag::Enemy => {
                let _ = self.enemies.remove(entity);
            }
            EntityTag::Pickup => {
                let _ = self.pickups.remove(&entity);
            }
            EntityTag::Player => {
                self.player = None;
            }
            EntityTag::Scenery => {
                self.solids.retain(|solid| solid.id != entity);
            }
        }

        self.forget_overlaps(entity);
        debug!(entity = entity.get(), ?tag, "entity destroyed");
        out_events.push(Event::EntityDestroyed { entity, tag });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            let seconds = dt.as_secs_f32();
            world.step_player(seconds);
            world.step_projectiles(seconds);
            world.refresh_projectile_contacts(out_events);
            world.collect_pickups(out_events);
        }
        Command::AddSolid { min, max, layers } => {
            let id = world.allocate_id();
            world.solids.push(Solid {
                id,
                bounds: Aabb::new(min, max),
                layers,
            });
        }
        Command::SpawnPlayer {
            position,
            half_extents,
        } => {
            if world.player.is_some() {
                debug!("player already present; spawn ignored");
                return;
            }
            let id = world.allocate_id();
            world.player = Some(PlayerBody {
                id,
                center: position,
                half_extents,
                velocity: Vec2::ZERO,
                facing: Side::Right,
            });
            out_events.push(Event::PlayerSpawned { player: id });
        }
        Command::SpawnEnemy {
            position,
            radius,
            max_health,
        } => {
            let id = world.allocate_id();
            world.enemies.insert(EnemyState {
                id,
                position,
                radius,
                health: Health::full(max_health),
            });
            out_events.push(Event::EnemySpawned { enemy: id });
        }
        Command::SpawnPickup {
            position,
            radius,
            enhancement,
        } => {
            let id = world.allocate_id();
            let _ = world.pickups.insert(
                id,
                Pickup {
                    id,
                    position,
                    radius,
                    enhancement,
                },
            );
            out_events.push(Event::PickupSpawned { pickup: id });
        }
        Command::SpawnProjectile {
            template,
            position,
            launch,
            enhancements,
        } => {
            let id = world.allocate_id();
            let _ = world.projectiles.insert(
                id,
                ProjectileBody {
                    id,
                    position,
                    velocity: launch.velocity(),
                    facing: launch.facing(),
                },
            );
            debug!(
                projectile = id.get(),
                x = position.x,
                y = position.y,
                force = launch.force,
                enhancements = enhancements.len(),
                "projectile spawned"
            );
            out_events.push(Event::ProjectileSpawned {
                projectile: id,
                template,
                enhancements,
            });
        }
        Command::SetVelocity { entity, velocity } => {
            if let Some(player) = world.player.as_mut().filter(|player| player.id == entity) {
                player.velocity = velocity;
            } else if let Some(projectile) = world.projectiles.get_mut(&entity) {
                projectile.velocity = velocity;
            }
        }
        Command::SetFacing { entity, facing } => {
            if let Some(player) = world.player.as_mut().filter(|player| player.id == entity) {
                player.facing = facing;
            } else if let Some(projectile) = world.projectiles.get_mut(&entity) {
                projectile.facing = facing;
            }
        }
        Command::DamageEnemy { enemy, amount } => match world.enemies.damage(enemy, amount) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Wounded { remaining } => {
                out_events.push(Event::EnemyDamaged {
                    enemy,
                    amount,
                    remaining,
                });
            }
            DamageOutcome::Killed { remaining } => {
                out_events.push(Event::EnemyDamaged {
                    enemy,
                    amount,
                    remaining,
                });
                info!(enemy = enemy.get(), "enemy died");
                out_events.push(Event::EnemyDied { enemy });
                world.forget_overlaps(enemy);
                out_events.push(Event::EntityDestroyed {
                    entity: enemy,
                    tag: EntityTag::Enemy,
                });
            }
        },
        Command::DestroyEntity { entity } => world.destroy(entity, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use quiver_core::{
        BodyState, ContactOracle, EnemySnapshot, EntityId, LayerMask, ProjectileSnapshot,
        Sensor, Side,
    };

    use super::{PlayerBody, World};
    use crate::geometry::circles_overlap;

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Kinematic state of the player body.
    #[must_use]
    pub fn player_body(world: &World) -> Option<BodyState> {
        world
            .player
            .as_ref()
            .map(|player| BodyState::new(player.center, player.velocity))
    }

    /// Side the player body currently faces.
    #[must_use]
    pub fn player_facing(world: &World) -> Option<Side> {
        world.player.as_ref().map(|player| player.facing)
    }

    /// Contact oracle anchored on the player body.
    #[must_use]
    pub fn player_contacts(world: &World) -> Option<PlayerContacts<'_>> {
        world
            .player
            .as_ref()
            .map(|player| PlayerContacts { world, player })
    }

    /// Snapshot of a live projectile.
    #[must_use]
    pub fn projectile(world: &World, id: EntityId) -> Option<ProjectileSnapshot> {
        world
            .projectiles
            .get(&id)
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                position: projectile.position,
                velocity: projectile.velocity,
                facing: projectile.facing,
            })
    }

    /// Snapshots of every live projectile in ascending id order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .keys()
            .filter_map(|id| projectile(world, *id))
            .collect()
    }

    /// Snapshot of a living enemy.
    #[must_use]
    pub fn enemy(world: &World, id: EntityId) -> Option<EnemySnapshot> {
        world.enemies.get(id).map(|enemy| enemy.snapshot())
    }

    /// Snapshots of every living enemy in ascending id order.
    #[must_use]
    pub fn enemies(world: &World) -> Vec<EnemySnapshot> {
        world.enemies.iter().map(|enemy| enemy.snapshot()).collect()
    }

    /// Number of pickups waiting to be collected.
    #[must_use]
    pub fn pickup_count(world: &World) -> usize {
        world.pickups.len()
    }

    /// Reports whether the entity still exists.
    #[must_use]
    pub fn is_alive(world: &World, id: EntityId) -> bool {
        world.tag_of(id).is_some()
    }

    /// Contact queries answered relative to the player body.
    #[derive(Debug)]
    pub struct PlayerContacts<'a> {
        world: &'a World,
        player: &'a PlayerBody,
    }

    impl ContactOracle for PlayerContacts<'_> {
        fn is_touching(&self, sensor: Sensor, layers: LayerMask) -> bool {
            let region = self.player.sensor(sensor);
            self.world
                .solids
                .iter()
                .any(|solid| solid.layers.intersects(layers) && solid.bounds.overlaps(&region))
        }

        fn enemies_within(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
            self.world
                .enemies
                .iter()
                .filter(|enemy| circles_overlap(center, radius, enemy.position, enemy.radius))
                .map(|enemy| enemy.id)
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use quiver_core::{ContactOracle, ContactState, EnhancementSet, Launch, ProjectileTemplate};

    fn tick(world: &mut World, millis: u64) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(millis),
            },
            &mut events,
        );
        events
    }

    fn floor(world: &mut World) {
        apply(
            world,
            Command::AddSolid {
                min: Vec2::new(-10.0, -1.0),
                max: Vec2::new(10.0, 0.0),
                layers: LayerMask::GROUND,
            },
            &mut Vec::new(),
        );
    }

    fn spawn_player(world: &mut World, position: Vec2) -> EntityId {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnPlayer {
                position,
                half_extents: Vec2::splat(0.5),
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::PlayerSpawned { player }] => *player,
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn player_falls_onto_floor_and_is_grounded() {
        let mut world = World::new();
        floor(&mut world);
        let _ = spawn_player(&mut world, Vec2::new(0.0, 2.0));

        for _ in 0..120 {
            let _ = tick(&mut world, 16);
        }

        let body = query::player_body(&world).expect("player");
        assert!((body.position.y - 0.5).abs() < 1e-4, "y = {}", body.position.y);
        assert_eq!(body.velocity.y, 0.0);

        let contacts = query::player_contacts(&world).expect("contacts");
        let state = ContactState::probe(&contacts, Side::Right, LayerMask::GROUND);
        assert!(state.grounded);
    }

    #[test]
    fn wall_sensors_follow_facing() {
        let mut world = World::with_gravity(0.0);
        apply(
            &mut world,
            Command::AddSolid {
                min: Vec2::new(1.0, -5.0),
                max: Vec2::new(2.0, 5.0),
                layers: LayerMask::GROUND,
            },
            &mut Vec::new(),
        );
        let player = spawn_player(&mut world, Vec2::new(0.5, 2.0));

        let contacts = query::player_contacts(&world).expect("contacts");
        assert!(contacts.is_touching(Sensor::WallUpper, LayerMask::GROUND));
        assert!(contacts.is_touching(Sensor::WallLower, LayerMask::GROUND));
        assert!(!contacts.is_touching(Sensor::Ground, LayerMask::GROUND));

        apply(
            &mut world,
            Command::SetFacing {
                entity: player,
                facing: Side::Left,
            },
            &mut Vec::new(),
        );
        let contacts = query::player_contacts(&world).expect("contacts");
        assert!(!contacts.is_touching(Sensor::WallUpper, LayerMask::GROUND));
    }

    #[test]
    fn projectile_contact_is_reported_on_enter_only() {
        let mut world = World::with_gravity(0.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                position: Vec2::new(1.0, 0.0),
                radius: 0.5,
                max_health: 10,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnProjectile {
                template: ProjectileTemplate::default(),
                position: Vec2::ZERO,
                launch: Launch::new(Vec2::X, 5.0),
                enhancements: EnhancementSet::default(),
            },
            &mut events,
        );

        let first = tick(&mut world, 100);
        let second = tick(&mut world, 100);

        let contacts = |events: &[Event]| {
            events
                .iter()
                .filter(|event| matches!(event, Event::ProjectileContact { .. }))
                .count()
        };
        assert_eq!(contacts(first.as_slice()), 1);
        assert_eq!(contacts(second.as_slice()), 0);
    }

    #[test]
    fn lethal_damage_removes_enemy_once() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                position: Vec2::ZERO,
                radius: 0.5,
                max_health: 100,
            },
            &mut events,
        );
        let enemy = match events.as_slice() {
            [Event::EnemySpawned { enemy }] => *enemy,
            other => panic!("unexpected events: {other:?}"),
        };

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::DamageEnemy { enemy, amount: 100 },
            &mut events,
        );
        assert_eq!(
            events,
            vec![
                Event::EnemyDamaged {
                    enemy,
                    amount: 100,
                    remaining: 0,
                },
                Event::EnemyDied { enemy },
                Event::EntityDestroyed {
                    entity: enemy,
                    tag: EntityTag::Enemy,
                },
            ]
        );
        assert!(!query::is_alive(&world, enemy));

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::DamageEnemy { enemy, amount: 100 },
            &mut events,
        );
        apply(&mut world, Command::DestroyEntity { entity: enemy }, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn pickups_are_collected_by_player_overlap() {
        let mut world = World::with_gravity(0.0);
        let _ = spawn_player(&mut world, Vec2::ZERO);
        let enhancement = Arc::new(Enhancement::MultiShot(quiver_core::MultiShot::default()));
        apply(
            &mut world,
            Command::SpawnPickup {
                position: Vec2::new(0.6, 0.0),
                radius: 0.25,
                enhancement: Arc::clone(&enhancement),
            },
            &mut Vec::new(),
        );
        assert_eq!(query::pickup_count(&world), 1);

        let events = tick(&mut world, 16);
        let collected = events.iter().find_map(|event| match event {
            Event::PickupCollected { enhancement, .. } => Some(Arc::clone(enhancement)),
            _ => None,
        });
        assert!(collected.is_some_and(|granted| Arc::ptr_eq(&granted, &enhancement)));
        assert_eq!(query::pickup_count(&world), 0);
    }
}
