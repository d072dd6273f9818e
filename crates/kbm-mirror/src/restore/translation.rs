//! Source-to-target ID mapping.

use std::collections::HashMap;

use crate::entity::{EntityKind, EntityRef};

/// Mapping from source entities to the target IDs they were reconciled to.
///
/// Entries are write-once: the first target ID recorded for an entity is
/// kept for the rest of the run. The map is shared across locales so an
/// entity restored in one locale is reused by the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationMap {
    ids: HashMap<EntityRef, u64>,
}

impl TranslationMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Target ID for `entity`, if reconciled.
    #[must_use]
    pub fn get(&self, entity: EntityRef) -> Option<u64> {
        self.ids.get(&entity).copied()
    }

    /// Record a mapping. Returns the ID now in effect, which is the earlier
    /// one if `entity` was already mapped.
    pub fn insert(&mut self, entity: EntityRef, target_id: u64) -> u64 {
        *self.ids.entry(entity).or_insert(target_id)
    }

    /// Number of mapped entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if nothing is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of mapped entities of one kind.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.ids.keys().filter(|e| e.kind == kind).count()
    }
}
