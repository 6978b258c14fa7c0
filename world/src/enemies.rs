//! Enemy health state and registry.

use std::collections::BTreeMap;

use glam::Vec2;
use quiver_core::{EnemySnapshot, EntityId};

/// Life state of a damageable entity. `Dead` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Vitality {
    Alive,
    Dead,
}

/// Result of delivering damage to a [`Health`] pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DamageOutcome {
    /// The pool was already dead; nothing changed.
    Ignored,
    /// Damage applied and the pool is still alive.
    Wounded { remaining: i32 },
    /// Damage applied and the pool crossed zero on this call.
    Killed { remaining: i32 },
}

/// Health pool with a one-way `Alive -> Dead` transition.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Health {
    current: i32,
    max: i32,
    vitality: Vitality,
}

impl Health {
    pub(crate) fn full(max: i32) -> Self {
        Self {
            current: max,
            max,
            vitality: Vitality::Alive,
        }
    }

    /// Subtracts `amount` unconditionally; negative amounts heal.
    pub(crate) fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.vitality == Vitality::Dead {
            return DamageOutcome::Ignored;
        }

        self.current = self.current.saturating_sub(amount);
        if self.current <= 0 {
            self.vitality = Vitality::Dead;
            DamageOutcome::Killed {
                remaining: self.current,
            }
        } else {
            DamageOutcome::Wounded {
                remaining: self.current,
            }
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) id: EntityId,
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
    pub(crate) health: Health,
}

impl EnemyState {
    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            radius: self.radius,
            current_health: self.health.current,
            max_health: self.health.max,
        }
    }
}

/// Living enemies keyed by identifier.
#[derive(Debug, Default)]
pub(crate) struct EnemyRegistry {
    entries: BTreeMap<EntityId, EnemyState>,
}

impl EnemyRegistry {
    pub(crate) fn insert(&mut self, state: EnemyState) {
        let _ = self.entries.insert(state.id, state);
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&EnemyState> {
        self.entries.get(&id)
    }

    pub(crate) fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<EnemyState> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &EnemyState> {
        self.entries.values()
    }

    /// Damages a registered enemy. Killed enemies are removed immediately so
    /// they can never be damaged or queried again.
    pub(crate) fn damage(&mut self, id: EntityId, amount: i32) -> DamageOutcome {
        let Some(state) = self.entries.get_mut(&id) else {
            return DamageOutcome::Ignored;
        };

        let outcome = state.health.take_damage(amount);
        if let DamageOutcome::Killed { .. } = outcome {
            let _ = self.entries.remove(&id);
        }
        outcome
    }
}
