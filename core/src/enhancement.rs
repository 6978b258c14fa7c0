//! Data-defined projectile enhancements.
//!
//! An [`Enhancement`] is an immutable descriptor shared by reference between
//! the firing source and every projectile that received it. Descriptors hold
//! no per-projectile state, so one instance may back any number of
//! projectiles at once. Each variant attaches its behaviour through
//! [`Enhancement::apply`], which the projectile invokes exactly once when it
//! spawns.
//!
//! [`MultiShot`] is the one variant whose effect happens before a projectile
//! exists: the attack controller reads it through
//! [`EnhancementSet::multi_shot`] to decide how many projectiles to spawn,
//! and its `apply` hook does nothing.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};

use crate::seconds;

/// Fans a single fire action out into several projectiles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiShot {
    /// Number of projectiles spawned in addition to the primary one.
    pub additional_projectiles: u32,
    /// Vertical distance between successive fan rows, in world units.
    pub spread: f32,
}

impl Default for MultiShot {
    fn default() -> Self {
        Self {
            additional_projectiles: 2,
            spread: 0.5,
        }
    }
}

impl MultiShot {
    /// Vertical offset of the extra projectile at `index`.
    ///
    /// Offsets alternate above and below the fire point, growing by one
    /// `spread` every second index: `+1, -1, +2, -2, ...` times `spread`.
    #[must_use]
    pub fn offset(&self, index: u32) -> f32 {
        let sign = if index % 2 == 0 { 1.0 } else { -1.0 };
        let row = (index / 2 + 1) as f32;
        sign * row * self.spread
    }
}

/// Splits a projectile into two opposite-travelling children after a delay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitShot {
    /// Delay between spawning and splitting.
    #[serde(with = "seconds")]
    pub split_time: Duration,
}

impl Default for SplitShot {
    fn default() -> Self {
        Self {
            split_time: Duration::from_millis(500),
        }
    }
}

/// Capabilities a projectile exposes to enhancement hooks.
pub trait EnhancementTarget {
    /// Schedules the projectile to split once `after` has elapsed since spawn.
    fn enable_splitting(&mut self, after: Duration);
}

/// Projectile modifier descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Enhancement {
    /// Spawns extra projectiles in a vertical fan when firing.
    MultiShot(MultiShot),
    /// Splits the projectile in two after a delay.
    SplitShot(SplitShot),
}

impl Enhancement {
    /// Attaches the enhancement's behaviour to a freshly spawned projectile.
    pub fn apply(&self, target: &mut dyn EnhancementTarget) {
        match self {
            // Consumed by the attack controller before spawning.
            Self::MultiShot(_) => {}
            Self::SplitShot(split) => target.enable_splitting(split.split_time),
        }
    }

    /// Returns the multi-shot payload when this is a multi-shot descriptor.
    #[must_use]
    pub fn as_multi_shot(&self) -> Option<&MultiShot> {
        match self {
            Self::MultiShot(multi) => Some(multi),
            Self::SplitShot(_) => None,
        }
    }

    /// Reports whether this is a split-shot descriptor.
    #[must_use]
    pub fn is_split_shot(&self) -> bool {
        matches!(self, Self::SplitShot(_))
    }

    /// Short human readable label used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::MultiShot(_) => "multi-shot",
            Self::SplitShot(_) => "split-shot",
        }
    }
}

/// Ordered snapshot of shared enhancement descriptors.
///
/// Cloning a set copies the list of references, never the descriptors, so a
/// snapshot taken at fire time is unaffected by later changes to the source
/// list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnhancementSet {
    entries: Vec<Arc<Enhancement>>,
}

impl EnhancementSet {
    /// Creates a set from shared descriptors, preserving their order.
    #[must_use]
    pub fn from_shared(entries: Vec<Arc<Enhancement>>) -> Self {
        Self { entries }
    }

    /// Creates a set owning freshly allocated descriptors.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = Enhancement>) -> Self {
        Self {
            entries: values.into_iter().map(Arc::new).collect(),
        }
    }

    /// Iterator over the descriptors in application order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Enhancement>> {
        self.entries.iter()
    }

    /// Number of descriptors in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the set holds no descriptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reports whether the set holds this exact shared descriptor.
    #[must_use]
    pub fn contains_shared(&self, enhancement: &Arc<Enhancement>) -> bool {
        self.entries
            .iter()
            .any(|entry| Arc::ptr_eq(entry, enhancement))
    }

    /// Appends a descriptor to the end of the set.
    pub fn push(&mut self, enhancement: Arc<Enhancement>) {
        self.entries.push(enhancement);
    }

    /// First multi-shot descriptor in the set, which drives fan-out.
    #[must_use]
    pub fn multi_shot(&self) -> Option<MultiShot> {
        self.entries
            .iter()
            .find_map(|entry| entry.as_multi_shot().copied())
    }

    /// Reports whether any split-shot descriptor is present.
    #[must_use]
    pub fn has_split_shot(&self) -> bool {
        self.entries.iter().any(|entry| entry.is_split_shot())
    }

    /// Copy of the set with every multi-shot descriptor removed.
    #[must_use]
    pub fn without_multi_shot(&self) -> Self {
        self.filtered(|entry| entry.as_multi_shot().is_none())
    }

    /// Copy of the set with every split-shot descriptor removed.
    #[must_use]
    pub fn without_split_shot(&self) -> Self {
        self.filtered(|entry| !entry.is_split_shot())
    }

    fn filtered(&self, keep: impl Fn(&Enhancement) -> bool) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| keep(entry))
                .cloned()
                .collect(),
        }
    }
}
