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

//! Saving and restoring sets of actors.
//!
//! An [`ActorMap`] is written as a [`MapDocument`]: one record per actor
//! with its type, id, name and the string form of every writable property.
//! Loading recreates each actor through a [`LibraryManager`].

use crate::actor::{ActorProxy, ActorTypeKey};
use crate::error::MapError;
use crate::property::DataType;
use crate::registry::LibraryManager;
use serde::{Deserialize, Serialize};
use simforge_core::UniqueId;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// The serialized form of a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    /// The map name.
    pub name: String,
    /// The actors, in map order.
    pub actors: Vec<ActorRecord>,
}

/// The serialized form of one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorRecord {
    /// The actor id.
    pub id: UniqueId,
    /// The display name.
    pub name: String,
    /// The actor type, as `category.name`.
    pub actor_type: ActorTypeKey,
    /// Writable property values.
    pub properties: Vec<PropertyRecord>,
}

/// The serialized form of one property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    /// The property name.
    pub name: String,
    /// The property's data type when saved.
    pub data_type: DataType,
    /// The value's string form.
    pub value: String,
}

/// An ordered set of actors with unique ids.
#[derive(Debug, Default)]
pub struct ActorMap {
    name: String,
    proxies: Vec<ActorProxy>,
    index: HashMap<UniqueId, usize>,
}

impl ActorMap {
    /// Creates an empty map.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The map name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds an actor. Ids must be unique within the map.
    pub fn add(&mut self, proxy: ActorProxy) -> Result<(), MapError> {
        if self.index.contains_key(&proxy.id()) {
            return Err(MapError::DuplicateActor(proxy.id()));
        }
        self.index.insert(proxy.id(), self.proxies.len());
        self.proxies.push(proxy);
        Ok(())
    }

    /// Removes an actor.
    pub fn remove(&mut self, id: UniqueId) -> Option<ActorProxy> {
        let position = self.index.remove(&id)?;
        let proxy = self.proxies.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(proxy)
    }

    /// Looks an actor up by id.
    pub fn get(&self, id: UniqueId) -> Option<&ActorProxy> {
        self.index.get(&id).map(|&i| &self.proxies[i])
    }

    /// Looks an actor up by id, mutably.
    pub fn get_mut(&mut self, id: UniqueId) -> Option<&mut ActorProxy> {
        let i = *self.index.get(&id)?;
        self.proxies.get_mut(i)
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorProxy> {
        self.proxies.iter()
    }

    /// Iterates mutably in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ActorProxy> {
        self.proxies.iter_mut()
    }

    /// Number of actors.
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// `true` if the map holds no actor.
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Captures the map as a document.
    pub fn to_document(&self) -> MapDocument {
        let actors = self
            .proxies
            .iter()
            .map(|proxy| ActorRecord {
                id: proxy.id(),
                name: proxy.name().to_owned(),
                actor_type: proxy.actor_type().key().clone(),
                properties: proxy
                    .properties()
                    .into_iter()
                    .filter(|info| !info.read_only)
                    .filter_map(|info| {
                        let value = proxy.get_property_string(&info.name).ok()?;
                        Some(PropertyRecord {
                            name: info.name.clone(),
                            data_type: info.data_type,
                            value,
                        })
                    })
                    .collect(),
            })
            .collect();
        MapDocument {
            name: self.name.clone(),
            actors,
        }
    }

    /// Rebuilds a map from a document.
    ///
    /// Unknown actor types fail the whole load. Property values that no
    /// longer fit are logged and skipped.
    pub fn from_document(document: &MapDocument, manager: &LibraryManager) -> Result<Self, MapError> {
        let mut map = ActorMap::new(document.name.clone());
        for record in &document.actors {
            let mut proxy = manager.create_actor_by_key(&record.actor_type)?.with_id(record.id);
            proxy.set_name(record.name.clone());

            for property in &record.properties {
                if let Some(info) = proxy.property_info(&property.name) {
                    if info.data_type != property.data_type {
                        log::warn!(
                            "Property '{}' of {} was saved as {} but is now {}",
                            property.name,
                            record.id,
                            property.data_type,
                            info.data_type
                        );
                    }
                }
                if let Err(err) = proxy.set_property_string(&property.name, &property.value) {
                    log::warn!("Skipping property of {} ({}): {err}", record.name, record.id);
                }
            }
            map.add(proxy)?;
        }
        log::info!("Loaded map '{}' with {} actors", map.name, map.len());
        Ok(map)
    }

    /// Encodes the map as pretty RON.
    pub fn to_ron(&self) -> Result<String, MapError> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(&self.to_document(), pretty)
            .map_err(|e| MapError::Format(e.to_string()))
    }

    /// Decodes a map from RON.
    pub fn from_ron(input: &str, manager: &LibraryManager) -> Result<Self, MapError> {
        let document: MapDocument =
            ron::from_str(input).map_err(|e| MapError::Format(e.to_string()))?;
        Self::from_document(&document, manager)
    }

    /// Encodes the map as pretty JSON for external tools.
    pub fn to_json(&self) -> Result<String, MapError> {
        serde_json::to_string_pretty(&self.to_document())
            .map_err(|e| MapError::Format(e.to_string()))
    }

    /// Writes the map to a RON file.
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let path = path.as_ref();
        fs::write(path, self.to_ron()?)?;
        log::info!("Saved map '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Reads a map from a RON file.
    pub fn load_ron(path: impl AsRef<Path>, manager: &LibraryManager) -> Result<Self, MapError> {
        let input = fs::read_to_string(path)?;
        Self::from_ron(&input, manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Actor, ActorType};
    use crate::error::{PropertyError, RegistryError};
    use crate::property::{ActorProperty, PropertyMap, PropertyValue};
    use crate::registry::{ActorFactory, ActorPluginRegistry};
    use simforge_core::math::Vec3;

    #[derive(Default)]
    struct Crate {
        origin: Vec3,
        sealed: bool,
        owner: UniqueId,
        serial: i64,
    }

    impl Actor for Crate {
        fn build_property_map(map: &mut PropertyMap<Self>) -> Result<(), PropertyError> {
            map.add(ActorProperty::new("Origin", "Origin", |c: &Crate| c.origin, |c, v| c.origin = v))?
                .add(ActorProperty::new("Sealed", "Sealed", |c: &Crate| c.sealed, |c, v| c.sealed = v))?
                .add(ActorProperty::new("Owner", "Owner", |c: &Crate| c.owner, |c, v| c.owner = v))?
                .add(ActorProperty::read_only("Serial", "Serial", |c: &Crate| c.serial))?;
            Ok(())
        }
    }

    struct Cargo;

    impl ActorPluginRegistry for Cargo {
        fn name(&self) -> &str {
            "cargo"
        }

        fn register_actor_types(&self, factory: &mut ActorFactory) -> Result<(), RegistryError> {
            factory.register(ActorType::new("Crate", "logistics", ""), Crate::default)?;
            Ok(())
        }
    }

    fn manager() -> LibraryManager {
        let mut manager = LibraryManager::new();
        manager.register_registry(Box::new(Cargo)).unwrap();
        manager
    }

    fn sample(manager: &LibraryManager) -> ActorMap {
        let mut map = ActorMap::new("depot");
        let mut first = manager.create_actor_by_name("logistics", "Crate").unwrap();
        first.set_name("North crate");
        first
            .set_property("Origin", PropertyValue::Vec3(Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();
        first.set_property("Sealed", PropertyValue::Bool(true)).unwrap();
        let owner = first.id();
        map.add(first).unwrap();

        let mut second = manager.create_actor_by_name("logistics", "Crate").unwrap();
        second.set_property("Owner", PropertyValue::ActorId(owner)).unwrap();
        map.add(second).unwrap();
        map
    }

    #[test]
    fn ron_round_trip_restores_ids_names_and_values() {
        let manager = manager();
        let map = sample(&manager);
        let text = map.to_ron().unwrap();
        let restored = ActorMap::from_ron(&text, &manager).unwrap();

        assert_eq!(restored.name(), "depot");
        assert_eq!(restored.len(), 2);
        for (a, b) in map.iter().zip(restored.iter()) {
            assert_eq!(a.id(), b.id());
            assert_eq!(a.name(), b.name());
            for name in ["Origin", "Sealed", "Owner"] {
                assert_eq!(a.get_property(name).unwrap(), b.get_property(name).unwrap());
            }
        }
    }

    #[test]
    fn read_only_properties_are_not_saved() {
        let manager = manager();
        let document = sample(&manager).to_document();
        let names: Vec<_> = document.actors[0]
            .properties
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Origin", "Sealed", "Owner"]);
        assert_eq!(document.actors[0].properties[0].value, "1 2 3");
    }

    #[test]
    fn unknown_types_fail_the_load() {
        let manager = manager();
        let mut document = sample(&manager).to_document();
        document.actors[1].actor_type = ActorTypeKey::new("logistics", "Pallet");
        let err = ActorMap::from_document(&document, &manager).unwrap_err();
        assert!(matches!(err, MapError::Registry(RegistryError::UnknownType(_))));
    }

    #[test]
    fn bad_property_values_are_skipped() {
        let manager = manager();
        let mut document = sample(&manager).to_document();
        document.actors[0].properties[1].value = "perhaps".to_owned();
        document.actors[0].properties.push(PropertyRecord {
            name: "Colour".to_owned(),
            data_type: DataType::String,
            value: "red".to_owned(),
        });
        let map = ActorMap::from_document(&document, &manager).unwrap();
        let first = map.get(document.actors[0].id).unwrap();
        assert_eq!(
            first.get_property("Origin").unwrap(),
            PropertyValue::Vec3(Vec3::new(1.0, 2.0, 3.0))
        );
        assert_eq!(first.get_property("Sealed").unwrap(), PropertyValue::Bool(false));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let manager = manager();
        let mut document = sample(&manager).to_document();
        document.actors[1].id = document.actors[0].id;
        let err = ActorMap::from_document(&document, &manager).unwrap_err();
        assert!(matches!(err, MapError::DuplicateActor(_)));
    }

    #[test]
    fn remove_keeps_lookup_consistent() {
        let manager = manager();
        let mut map = sample(&manager);
        let ids: Vec<_> = map.iter().map(|p| p.id()).collect();
        assert!(map.remove(ids[0]).is_some());
        assert!(map.get(ids[0]).is_none());
        assert_eq!(map.get(ids[1]).map(|p| p.id()), Some(ids[1]));
        assert!(map.remove(ids[0]).is_none());
    }

    #[test]
    fn renaming_an_actor_goes_through_remove_and_add() {
        let manager = manager();
        let mut map = sample(&manager);
        let old = map.iter().next().map(|p| p.id()).unwrap();
        let new = UniqueId::new();

        map.get_mut(old).unwrap().set_name("Renamed");
        let proxy = map.remove(old).unwrap().with_id(new);
        map.add(proxy).unwrap();

        assert!(map.get(old).is_none());
        assert!(map.get_mut(old).is_none());
        assert_eq!(map.get(new).map(|p| p.name()), Some("Renamed"));
        assert_eq!(map.get_mut(new).map(|p| p.id()), Some(new));
        assert_eq!(map.len(), 2);
        for proxy in map.iter() {
            assert_eq!(map.get(proxy.id()).map(|p| p.id()), Some(proxy.id()));
        }
    }

    #[test]
    fn files_and_json() {
        let manager = manager();
        let map = sample(&manager);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depot.ron");
        map.save_ron(&path).unwrap();
        let restored = ActorMap::load_ron(&path, &manager).unwrap();
        assert_eq!(restored.len(), 2);

        let json = map.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["actors"][0]["actor_type"], "logistics.Crate");
        assert_eq!(value["actors"][0]["name"], "North crate");

        assert!(matches!(
            ActorMap::load_ron(dir.path().join("missing.ron"), &manager),
            Err(MapError::Io(_))
        ));
    }
}
