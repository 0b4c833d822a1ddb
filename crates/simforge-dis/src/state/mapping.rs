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

use crate::types::EntityType;
use simforge_data::ActorTypeKey;

/// Two-way table between DIS entity types and actor types.
#[derive(Debug, Clone, Default)]
pub struct ActorTypeMapping {
    entries: Vec<(EntityType, ActorTypeKey)>,
}

impl ActorTypeMapping {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps an entity type, replacing any previous mapping of it.
    ///
    /// Returns the actor type it was previously mapped to.
    pub fn add(&mut self, entity_type: EntityType, actor_type: ActorTypeKey) -> Option<ActorTypeKey> {
        if let Some(entry) = self.entries.iter_mut().find(|(et, _)| *et == entity_type) {
            return Some(std::mem::replace(&mut entry.1, actor_type));
        }
        self.entries.push((entity_type, actor_type));
        None
    }

    /// Removes a mapping.
    pub fn remove(&mut self, entity_type: &EntityType) -> Option<ActorTypeKey> {
        let index = self.entries.iter().position(|(et, _)| et == entity_type)?;
        Some(self.entries.remove(index).1)
    }

    /// The actor type for an incoming entity type.
    ///
    /// An exact entry wins; otherwise the entry with the best
    /// [`rank_match`](EntityType::rank_match), earliest added on ties.
    pub fn actor_type_for(&self, entity_type: &EntityType) -> Option<&ActorTypeKey> {
        let mut best: Option<(u8, &ActorTypeKey)> = None;
        for (candidate, actor_type) in &self.entries {
            let Some(rank) = candidate.rank_match(entity_type) else {
                continue;
            };
            if best.map_or(true, |(top, _)| rank > top) {
                best = Some((rank, actor_type));
            }
        }
        best.map(|(_, actor_type)| actor_type)
    }

    /// The entity type published for an actor type: the first one mapped to it.
    pub fn entity_type_for(&self, actor_type: &ActorTypeKey) -> Option<&EntityType> {
        self.entries
            .iter()
            .find(|(_, at)| at == actor_type)
            .map(|(et, _)| et)
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityType, &ActorTypeKey)> {
        self.entries.iter().map(|(et, at)| (et, at))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> ActorTypeKey {
        ActorTypeKey::new("dis", name)
    }

    #[test]
    fn best_rank_wins() {
        let mut mapping = ActorTypeMapping::new();
        mapping.add("1".parse().unwrap(), key("Entity"));
        mapping.add("1.1.225".parse().unwrap(), key("Vehicle"));
        mapping.add("1.2".parse().unwrap(), key("Aircraft"));

        let tank: EntityType = "1.1.225.1.1.3".parse().unwrap();
        assert_eq!(mapping.actor_type_for(&tank), Some(&key("Vehicle")));

        let jet: EntityType = "1.2.222.1".parse().unwrap();
        assert_eq!(mapping.actor_type_for(&jet), Some(&key("Aircraft")));

        let munition: EntityType = "2.1".parse().unwrap();
        assert_eq!(mapping.actor_type_for(&munition), None);
    }

    #[test]
    fn reverse_lookup_and_replacement() {
        let mut mapping = ActorTypeMapping::new();
        let tank: EntityType = "1.1.225.1.1.3".parse().unwrap();
        assert_eq!(mapping.add(tank, key("Entity")), None);
        assert_eq!(mapping.add(tank, key("Vehicle")), Some(key("Entity")));
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.entity_type_for(&key("Vehicle")), Some(&tank));
        assert_eq!(mapping.entity_type_for(&key("Entity")), None);
        assert_eq!(mapping.remove(&tank), Some(key("Vehicle")));
        assert!(mapping.is_empty());
    }
}
