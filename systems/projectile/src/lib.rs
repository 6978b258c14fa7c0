#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile behaviour: enhancement hooks, lifetime, contacts and splitting.
//!
//! The world owns projectile bodies. This system owns the gameplay record of
//! every live projectile and a schedule of deferred actions keyed by
//! projectile id. Destroying a projectile drops its pending actions, and every
//! action re-checks that its projectile is still alive before running.

use std::{collections::BTreeMap, time::Duration};

use quiver_core::{
    Command, EnhancementSet, EnhancementTarget, EntityId, EntityTag, Event, Launch,
    ProjectileSnapshot, ProjectileTemplate,
};
use tracing::{debug, info};

/// Gameplay record of a live projectile.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    id: EntityId,
    template: ProjectileTemplate,
    enhancements: EnhancementSet,
    split_after: Option<Duration>,
    spent: bool,
}

impl Projectile {
    /// Creates a new record and runs every enhancement hook once, in order.
    #[must_use]
    pub fn spawn(id: EntityId, template: ProjectileTemplate, enhancements: EnhancementSet) -> Self {
        let mut projectile = Self {
            id,
            template,
            enhancements: EnhancementSet::default(),
            split_after: None,
            spent: false,
        };
        for enhancement in enhancements.iter() {
            enhancement.apply(&mut projectile);
        }
        projectile.enhancements = enhancements;
        projectile
    }

    /// Identifier of the projectile.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Damage delivered to an enemy on contact.
    #[must_use]
    pub const fn damage(&self) -> i32 {
        self.template.damage
    }

    /// Time after spawning at which the projectile destroys itself.
    #[must_use]
    pub const fn life_time(&self) -> Duration {
        self.template.life_time
    }

    /// Enhancement snapshot the projectile was spawned with.
    #[must_use]
    pub const fn enhancements(&self) -> &EnhancementSet {
        &self.enhancements
    }

    /// Delay after spawning at which the projectile splits, if enabled.
    #[must_use]
    pub const fn split_after(&self) -> Option<Duration> {
        self.split_after
    }

    /// Reports whether the projectile already collided, split or expired.
    #[must_use]
    pub const fn is_spent(&self) -> bool {
        self.spent
    }
}

impl EnhancementTarget for Projectile {
    fn enable_splitting(&mut self, after: Duration) {
        // The earliest split wins; the parent is gone once it splits.
        self.split_after = Some(self.split_after.map_or(after, |current| current.min(after)));
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum TaskKind {
    Split,
    Expire,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Task {
    due: Duration,
    kind: TaskKind,
}

/// Pure system that reacts to projectile events and emits world commands.
#[derive(Debug, Default)]
pub struct ProjectileSystem {
    now: Duration,
    projectiles: BTreeMap<EntityId, Projectile>,
    schedule: BTreeMap<EntityId, Vec<Task>>,
}

impl ProjectileSystem {
    /// Creates a new projectile system with an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record of a live projectile.
    #[must_use]
    pub fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.get(&id)
    }

    /// Number of projectiles the system tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// Reports whether no projectile is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Number of deferred actions still waiting to run.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.schedule.values().map(Vec::len).sum()
    }

    /// Consumes world events and emits damage, destroy and spawn commands.
    ///
    /// `lookup` reads a projectile's current body from the world; deferred
    /// actions only run for projectiles it still reports.
    pub fn handle<F>(&mut self, events: &[Event], lookup: F, out: &mut Vec<Command>)
    where
        F: Fn(EntityId) -> Option<ProjectileSnapshot>,
    {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => self.now = self.now.saturating_add(*dt),
                Event::ProjectileSpawned {
                    projectile,
                    template,
                    enhancements,
                } => self.track(*projectile, *template, enhancements.clone()),
                Event::ProjectileContact {
                    projectile,
                    other,
                    tag,
                } => self.resolve_contact(*projectile, *other, *tag, out),
                Event::EntityDestroyed { entity, .. } => {
                    let _ = self.projectiles.remove(entity);
                    let _ = self.schedule.remove(entity);
                }
                _ => {}
            }
        }

        self.run_due_tasks(&lookup, out);
    }

    fn track(&mut self, id: EntityId, template: ProjectileTemplate, enhancements: EnhancementSet) {
        let projectile = Projectile::spawn(id, template, enhancements);

        let mut tasks = vec![Task {
            due: self.now.saturating_add(projectile.life_time()),
            kind: TaskKind::Expire,
        }];
        if let Some(after) = projectile.split_after() {
            tasks.push(Task {
                due: self.now.saturating_add(after),
                kind: TaskKind::Split,
            });
        }

        let _ = self.schedule.insert(id, tasks);
        let _ = self.projectiles.insert(id, projectile);
    }

    fn resolve_contact(
        &mut self,
        projectile: EntityId,
        other: EntityId,
        tag: EntityTag,
        out: &mut Vec<Command>,
    ) {
        let Some(record) = self.projectiles.get_mut(&projectile) else {
            return;
        };
        if record.spent {
            return;
        }

        if tag == EntityTag::Enemy {
            out.push(Command::DamageEnemy {
                enemy: other,
                amount: record.damage(),
            });
        }
        if tag != EntityTag::Player {
            record.spent = true;
            out.push(Command::DestroyEntity { entity: projectile });
            debug!(projectile = projectile.get(), ?tag, "projectile hit");
        }
    }

    fn run_due_tasks<F>(&mut self, lookup: &F, out: &mut Vec<Command>)
    where
        F: Fn(EntityId) -> Option<ProjectileSnapshot>,
    {
        let now = self.now;
        let mut due: Vec<(Task, EntityId)> = Vec::new();
        for (id, tasks) in &mut self.schedule {
            tasks.retain(|task| {
                if task.due <= now {
                    due.push((*task, *id));
                    false
                } else {
                    true
                }
            });
        }
        self.schedule.retain(|_, tasks| !tasks.is_empty());
        due.sort();

        for (task, id) in due {
            if self.projectiles.get(&id).map_or(true, |record| record.spent) {
                continue;
            }
            let Some(body) = lookup(id) else {
                debug!(projectile = id.get(), "projectile no longer in the world");
                let _ = self.projectiles.remove(&id);
                let _ = self.schedule.remove(&id);
                continue;
            };
            let Some(record) = self.projectiles.get_mut(&id) else {
                continue;
            };

            record.spent = true;
            match task.kind {
                TaskKind::Split => split(record, &body, out),
                TaskKind::Expire => debug!(projectile = id.get(), "projectile expired"),
            }
            out.push(Command::DestroyEntity { entity: id });
        }
    }
}

fn split(parent: &Projectile, body: &ProjectileSnapshot, out: &mut Vec<Command>) {
    let direction = body.velocity.normalize_or_zero();
    let speed = body.velocity.length();
    let enhancements = parent.enhancements.without_split_shot();

    for heading in [direction, -direction] {
        out.push(Command::SpawnProjectile {
            template: parent.template,
            position: body.position,
            launch: Launch::new(heading, speed),
            enhancements: enhancements.clone(),
        });
    }
    info!(projectile = parent.id.get(), speed, "projectile split");
}
