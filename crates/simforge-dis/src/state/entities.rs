// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::DisError;
use crate::types::{EntityId, SimulationAddress};
use simforge_core::UniqueId;
use std::collections::HashMap;

/// Two-way table between DIS entity ids and actor ids.
///
/// Holds both remote entities seen on the network and local actors
/// published to it. Local entity ids are allocated from the local
/// simulation address with an increasing entity number.
#[derive(Debug, Clone)]
pub struct ActiveEntityControl {
    address: SimulationAddress,
    by_entity: HashMap<EntityId, UniqueId>,
    by_actor: HashMap<UniqueId, EntityId>,
    next_entity: u16,
}

impl ActiveEntityControl {
    /// Creates an empty table for the given local address.
    pub fn new(address: SimulationAddress) -> Self {
        Self {
            address,
            by_entity: HashMap::new(),
            by_actor: HashMap::new(),
            next_entity: 1,
        }
    }

    /// The local simulation address.
    pub fn address(&self) -> SimulationAddress {
        self.address
    }

    /// Maps `entity` to `actor`, dropping any earlier mapping of either.
    pub fn add(&mut self, entity: EntityId, actor: UniqueId) {
        if let Some(old_actor) = self.by_entity.insert(entity, actor) {
            if old_actor != actor {
                self.by_actor.remove(&old_actor);
            }
        }
        if let Some(old_entity) = self.by_actor.insert(actor, entity) {
            if old_entity != entity {
                self.by_entity.remove(&old_entity);
            }
        }
    }

    /// The actor mapped to an entity.
    pub fn actor_for(&self, entity: &EntityId) -> Option<UniqueId> {
        self.by_entity.get(entity).copied()
    }

    /// The entity mapped to an actor.
    pub fn entity_for(&self, actor: &UniqueId) -> Option<EntityId> {
        self.by_actor.get(actor).copied()
    }

    /// Removes the mapping of an entity, returning its actor.
    pub fn remove_entity(&mut self, entity: &EntityId) -> Option<UniqueId> {
        let actor = self.by_entity.remove(entity)?;
        self.by_actor.remove(&actor);
        Some(actor)
    }

    /// Removes the mapping of an actor, returning its entity.
    pub fn remove_actor(&mut self, actor: &UniqueId) -> Option<EntityId> {
        let entity = self.by_actor.remove(actor)?;
        self.by_entity.remove(&entity);
        Some(entity)
    }

    /// The entity id of a local actor, allocating one if it has none yet.
    pub fn allocate_local(&mut self, actor: UniqueId) -> Result<EntityId, DisError> {
        if let Some(entity) = self.entity_for(&actor) {
            return Ok(entity);
        }

        // Entity numbers 0 and 0xFFFF are reserved.
        let usable = u32::from(EntityId::ALL_ENTITIES - 1);
        for _ in 0..usable {
            let candidate = EntityId::new(
                self.address.site,
                self.address.application,
                self.next_entity,
            );
            self.next_entity = if self.next_entity >= EntityId::ALL_ENTITIES - 1 {
                1
            } else {
                self.next_entity + 1
            };
            if !self.by_entity.contains_key(&candidate) {
                self.add(candidate, actor);
                log::debug!("Allocated entity {candidate} for actor {actor}");
                return Ok(candidate);
            }
        }
        Err(DisError::EntityIdsExhausted {
            site: self.address.site,
            application: self.address.application,
        })
    }

    /// Number of mapped entities.
    pub fn len(&self) -> usize {
        self.by_entity.len()
    }

    /// `true` if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }

    /// Iterates over `(entity, actor)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, UniqueId)> + '_ {
        self.by_entity.iter().map(|(e, a)| (*e, *a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_stays_bijective() {
        let mut control = ActiveEntityControl::new(SimulationAddress::new(1, 1));
        let a = UniqueId::new();
        let b = UniqueId::new();
        let e1 = EntityId::new(2, 3, 10);
        let e2 = EntityId::new(2, 3, 11);

        control.add(e1, a);
        control.add(e2, a);
        assert_eq!(control.entity_for(&a), Some(e2));
        assert_eq!(control.actor_for(&e1), None);

        control.add(e2, b);
        assert_eq!(control.entity_for(&a), None);
        assert_eq!(control.actor_for(&e2), Some(b));
        assert_eq!(control.len(), 1);

        assert_eq!(control.remove_actor(&b), Some(e2));
        assert!(control.is_empty());
    }

    #[test]
    fn local_allocation_skips_used_numbers() {
        let mut control = ActiveEntityControl::new(SimulationAddress::new(5, 6));
        let remote = UniqueId::new();
        control.add(EntityId::new(5, 6, 1), remote);

        let local = UniqueId::new();
        let id = control.allocate_local(local).unwrap();
        assert_eq!(id, EntityId::new(5, 6, 2));
        assert_eq!(control.allocate_local(local).unwrap(), id);

        let other = control.allocate_local(UniqueId::new()).unwrap();
        assert_eq!(other, EntityId::new(5, 6, 3));
    }

    #[test]
    fn remove_entity_returns_actor() {
        let mut control = ActiveEntityControl::new(SimulationAddress::default());
        let actor = UniqueId::new();
        let entity = EntityId::new(1, 1, 1);
        control.add(entity, actor);
        assert_eq!(control.remove_entity(&entity), Some(actor));
        assert_eq!(control.remove_entity(&entity), None);
        assert_eq!(control.entity_for(&actor), None);
    }
}
