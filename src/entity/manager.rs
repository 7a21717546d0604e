//! Owns every [`Entity`] record and the id generator that names them.

use rustc_hash::FxHashMap;

use super::{Entity, EntityId, Role};
use crate::hex::HexCoord;

/// Owns all [`Entity`] records and the monotonic [`EntityId`] generator.
///
/// Iteration order for the per-tick loop is insertion order of alive
/// entities — the sole source of deterministic script ordering.
/// [`EntityManager::compact`] may reclaim the storage of dead
/// entities but must never reorder or recycle the ids of survivors.
#[derive(Debug, Default)]
pub struct EntityManager {
    entities: Vec<Entity>,
    index: FxHashMap<EntityId, usize>,
    next_id: EntityId,
}

impl EntityManager {
    /// Constructs an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a new live entity at `position` with `role`'s starting energy,
    /// appended after every existing entity in insertion order. Returns its
    /// freshly allocated, never-reused id.
    pub fn spawn(&mut self, position: HexCoord, role: Role) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        let slot = self.entities.len();
        self.entities.push(Entity::spawn(id, position, role));
        self.index.insert(id, slot);
        id
    }

    /// Soft-deletes the entity with `id`: clears its `alive` flag and zeroes
    /// its energy. Idempotent — destroying an already-dead or unknown id
    /// simply returns `false`. Returns whether the entity was alive
    /// beforehand.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.is_alive() => {
                entity.kill();
                true
            }
            _ => false,
        }
    }

    /// Gets an entity by id, alive or dead.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&slot| &self.entities[slot])
    }

    /// Gets a mutable reference to an entity by id, alive or dead.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = *self.index.get(&id)?;
        Some(&mut self.entities[slot])
    }

    /// Iterates alive entities in insertion order. This is the order the
    /// tick runner drives scripts in.
    pub fn iter_alive(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_alive())
    }

    /// Writes the ids of alive entities at `coord` into `out`, in insertion
    /// order, and returns the count written. Never allocates. If more
    /// entities qualify than `out` can hold, the count written equals
    /// `out.len()` — the caller's signal that the result was truncated.
    pub fn entities_at(&self, coord: HexCoord, out: &mut [EntityId]) -> usize {
        self.nearby(coord, 0, None, out)
    }

    /// Writes the ids of alive entities within hex distance `range` of
    /// `coord` into `out`, in insertion order, optionally filtered to a
    /// single `role`. Returns the count written; truncates at `out.len()`
    /// exactly like [`EntityManager::entities_at`].
    pub fn nearby(
        &self,
        coord: HexCoord,
        range: u32,
        role: Option<Role>,
        out: &mut [EntityId],
    ) -> usize {
        let mut n = 0;
        for entity in self.iter_alive() {
            if n == out.len() {
                break;
            }
            if entity.position().distance(coord) > range {
                continue;
            }
            if let Some(role) = role {
                if entity.role() != role {
                    continue;
                }
            }
            out[n] = entity.id();
            n += 1;
        }
        n
    }

    /// Removes dead entries from storage while preserving the insertion
    /// order and ids of survivors. Purely a storage optimization: observable
    /// behavior (iteration order, id stability) is unchanged.
    pub fn compact(&mut self) {
        self.entities.retain(Entity::is_alive);
        self.index.clear();
        self.index.reserve(self.entities.len());
        for (slot, entity) in self.entities.iter().enumerate() {
            self.index.insert(entity.id(), slot);
        }
    }

    /// Total number of entity records (alive and dead) currently stored.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if no entity records, alive or dead, are stored.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destroy_is_idempotent() {
        let mut mgr = EntityManager::new();
        let id = mgr.spawn(HexCoord::origin(), Role::Worker);
        assert!(mgr.destroy(id));
        assert!(!mgr.destroy(id));
        let entity = mgr.get(id).unwrap();
        assert!(!entity.is_alive());
        assert_eq!(entity.energy(), 0.0);
    }

    #[test]
    fn dead_entities_are_excluded_from_spatial_queries() {
        let mut mgr = EntityManager::new();
        let id = mgr.spawn(HexCoord::origin(), Role::Worker);
        mgr.destroy(id);
        let mut out = [0u64; 8];
        assert_eq!(mgr.entities_at(HexCoord::origin(), &mut out), 0);
    }

    #[test]
    fn compact_preserves_insertion_order_and_ids() {
        let mut mgr = EntityManager::new();
        let a = mgr.spawn(HexCoord::origin(), Role::Worker);
        let b = mgr.spawn(HexCoord::origin(), Role::Scout);
        let c = mgr.spawn(HexCoord::origin(), Role::Engineer);
        mgr.destroy(b);
        mgr.compact();
        let ids: Vec<_> = mgr.iter_alive().map(Entity::id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn nearby_with_zero_range_is_entities_at() {
        let mut mgr = EntityManager::new();
        let origin = HexCoord::origin();
        mgr.spawn(origin, Role::Worker);
        mgr.spawn(origin + (1, 0), Role::Worker);
        let mut out = [0u64; 8];
        let n = mgr.nearby(origin, 0, None, &mut out);
        assert_eq!(n, mgr.entities_at(origin, &mut [0u64; 8]));
        assert_eq!(n, 1);
    }

    #[test]
    fn nearby_truncates_to_buffer_capacity() {
        let mut mgr = EntityManager::new();
        let origin = HexCoord::origin();
        for _ in 0..5 {
            mgr.spawn(origin, Role::Worker);
        }
        let mut out = [0u64; 3];
        assert_eq!(mgr.nearby(origin, 0, None, &mut out), 3);
    }
}
