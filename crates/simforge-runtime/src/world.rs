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

//! The actors the runtime simulates, kept in step with bridge messages.

use anyhow::{bail, Context, Result};
use simforge_data::{ActorMap, ActorProxy, LibraryManager, Message, MessageKind};

/// What applying a message did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A new actor joined the map.
    Created,
    /// An existing actor was updated.
    Updated,
    /// An actor left the map.
    Deleted,
    /// The message was about nothing in the map.
    Ignored,
}

/// Applies messages to an [`ActorMap`].
#[derive(Debug)]
pub struct World {
    map: ActorMap,
}

impl World {
    /// An empty world.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            map: ActorMap::new(name),
        }
    }

    /// The actors.
    pub fn map(&self) -> &ActorMap {
        &self.map
    }

    /// Adds a locally owned actor.
    pub fn spawn(&mut self, proxy: ActorProxy) -> Result<()> {
        self.map.add(proxy)?;
        Ok(())
    }

    /// Looks up an actor for modification.
    pub fn actor_mut(&mut self, id: simforge_core::UniqueId) -> Option<&mut ActorProxy> {
        self.map.get_mut(id)
    }

    /// Applies one message, creating actors through `manager`.
    pub fn apply(&mut self, message: &Message, manager: &LibraryManager) -> Result<Change> {
        match &message.kind {
            MessageKind::ActorCreated if self.map.get(message.about_actor).is_none() => {
                let Some(key) = &message.actor_type else {
                    bail!("creation of {} does not name an actor type", message.about_actor);
                };
                let mut proxy = manager
                    .create_actor_by_key(key)
                    .with_context(|| format!("cannot create {} for {}", key, message.about_actor))?
                    .with_id(message.about_actor);
                if !message.name.is_empty() {
                    proxy.set_name(message.name.clone());
                }
                let report = proxy.apply_update(message);
                log::info!(
                    "Created {} '{}' ({} properties set)",
                    proxy.actor_type(),
                    proxy.name(),
                    report.applied.len()
                );
                self.map.add(proxy)?;
                Ok(Change::Created)
            }
            MessageKind::ActorCreated | MessageKind::ActorUpdated => {
                let Some(proxy) = self.map.get_mut(message.about_actor) else {
                    log::debug!("Update about unknown actor {}", message.about_actor);
                    return Ok(Change::Ignored);
                };
                let report = proxy.apply_update(message);
                log::trace!("Updated '{}': {:?}", proxy.name(), report.applied);
                Ok(Change::Updated)
            }
            MessageKind::ActorDeleted => match self.map.remove(message.about_actor) {
                Some(proxy) => {
                    log::info!("Deleted '{}'", proxy.name());
                    Ok(Change::Deleted)
                }
                None => Ok(Change::Ignored),
            },
            MessageKind::Custom(name) => {
                log::debug!("Ignoring custom message '{name}'");
                Ok(Change::Ignored)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simforge_actors::Vehicle;
    use simforge_core::math::DVec3;
    use simforge_core::UniqueId;
    use simforge_dis::params;

    fn manager() -> LibraryManager {
        let mut manager = LibraryManager::new();
        manager.register_static_plugins().unwrap();
        manager
    }

    fn created(id: UniqueId) -> Message {
        Message::new(MessageKind::ActorCreated, id)
            .with_actor_type("dis.Vehicle".parse().unwrap())
            .with_name("LEAD")
            .with_value(params::TRANSLATION, DVec3::new(1.0, 2.0, 3.0))
    }

    #[test]
    fn lifecycle() {
        let manager = manager();
        let mut world = World::new("test");
        let id = UniqueId::new();

        assert_eq!(world.apply(&created(id), &manager).unwrap(), Change::Created);
        let proxy = world.map().get(id).unwrap();
        assert_eq!(proxy.name(), "LEAD");
        assert_eq!(
            proxy.actor::<Vehicle>().unwrap().entity.translation,
            DVec3::new(1.0, 2.0, 3.0)
        );

        let moved = Message::new(MessageKind::ActorUpdated, id)
            .with_value(params::TRANSLATION, DVec3::new(4.0, 5.0, 6.0));
        assert_eq!(world.apply(&moved, &manager).unwrap(), Change::Updated);
        // A second creation of a known actor is an update.
        assert_eq!(world.apply(&created(id), &manager).unwrap(), Change::Updated);

        let deleted = Message::new(MessageKind::ActorDeleted, id);
        assert_eq!(world.apply(&deleted, &manager).unwrap(), Change::Deleted);
        assert_eq!(world.apply(&deleted, &manager).unwrap(), Change::Ignored);
        assert!(world.map().is_empty());
    }

    #[test]
    fn unknown_types_are_errors() {
        let manager = manager();
        let mut world = World::new("test");
        let untyped = Message::new(MessageKind::ActorCreated, UniqueId::new());
        assert!(world.apply(&untyped, &manager).is_err());

        let unknown = Message::new(MessageKind::ActorCreated, UniqueId::new())
            .with_actor_type("dis.Submarine".parse().unwrap());
        assert!(world.apply(&unknown, &manager).is_err());
        assert!(world.map().is_empty());
    }
}
