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

use super::*;
use crate::actor::{Actor, ActorType};
use crate::error::{PropertyError, RegistryError};
use crate::property::{ActorProperty, PropertyMap, PropertyValue};
use std::sync::atomic::{AtomicUsize, Ordering};

// --- FIXTURES ---

#[derive(Default)]
struct Tank {
    fuel: f32,
}

impl Actor for Tank {
    fn build_property_map(map: &mut PropertyMap<Self>) -> Result<(), PropertyError> {
        map.add(ActorProperty::new("Fuel", "Fuel", |t: &Tank| t.fuel, |t, v| t.fuel = v))?;
        Ok(())
    }
}

#[derive(Default)]
struct Marker;

impl Actor for Marker {
    fn build_property_map(_: &mut PropertyMap<Self>) -> Result<(), PropertyError> {
        Ok(())
    }
}

struct Armour;

impl ActorPluginRegistry for Armour {
    fn name(&self) -> &str {
        "armour"
    }

    fn register_actor_types(&self, factory: &mut ActorFactory) -> Result<(), RegistryError> {
        let vehicle = factory.register(ActorType::new("Vehicle", "ground", ""), Marker::default)?;
        factory.register(
            ActorType::new("Tank", "ground", "Tracked vehicle").with_parent(vehicle),
            || Tank { fuel: 100.0 },
        )?;
        Ok(())
    }
}

/// Provides a type that `Armour` already provides.
struct Copycat;

impl ActorPluginRegistry for Copycat {
    fn name(&self) -> &str {
        "copycat"
    }

    fn register_actor_types(&self, factory: &mut ActorFactory) -> Result<(), RegistryError> {
        factory.register(ActorType::new("Tank", "ground", ""), Tank::default)?;
        Ok(())
    }
}

struct Markers;

impl ActorPluginRegistry for Markers {
    fn name(&self) -> &str {
        "markers"
    }

    fn register_actor_types(&self, factory: &mut ActorFactory) -> Result<(), RegistryError> {
        factory.register(ActorType::new("Marker", "misc", ""), Marker::default)?;
        Ok(())
    }
}

static BEACON_DROPS: AtomicUsize = AtomicUsize::new(0);

/// Counts its drops, only ever created by `Beacons`.
#[derive(Default)]
struct Beacon {
    channel: i32,
}

impl Drop for Beacon {
    fn drop(&mut self) {
        BEACON_DROPS.fetch_add(1, Ordering::SeqCst);
    }
}

impl Actor for Beacon {
    fn build_property_map(map: &mut PropertyMap<Self>) -> Result<(), PropertyError> {
        map.add(ActorProperty::new("Channel", "Channel", |b: &Beacon| b.channel, |b, v| b.channel = v))?;
        Ok(())
    }
}

struct Beacons;

impl ActorPluginRegistry for Beacons {
    fn name(&self) -> &str {
        "beacons"
    }

    fn register_actor_types(&self, factory: &mut ActorFactory) -> Result<(), RegistryError> {
        factory.register(ActorType::new("Beacon", "nav", ""), Beacon::default)?;
        Ok(())
    }
}

fn create_markers() -> Box<dyn ActorPluginRegistry> {
    Box::new(Markers)
}

inventory::submit! { StaticActorPlugin::new(create_markers) }

// --- FACTORY ---

#[test]
fn test_factory_rejects_duplicate_types() {
    let mut factory = ActorFactory::new();
    factory
        .register(ActorType::new("Tank", "ground", ""), Tank::default)
        .unwrap();
    let err = factory
        .register(ActorType::new("Tank", "ground", "again"), Tank::default)
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateType(name) if name == "ground.Tank"));
    assert_eq!(factory.len(), 1);
}

#[test]
fn test_factory_creates_registered_types_only() {
    let mut factory = ActorFactory::new();
    let tank = factory
        .register(ActorType::new("Tank", "ground", ""), || Tank { fuel: 5.0 })
        .unwrap();
    let proxy = factory.create(&tank).unwrap();
    assert_eq!(proxy.get_property("Fuel").unwrap(), PropertyValue::Float(5.0));

    let err = factory
        .create(&ActorType::new("Boat", "sea", ""))
        .unwrap_err();
    assert!(matches!(err, RegistryError::UnknownType(_)));
}

// --- LIBRARY MANAGER ---

#[test]
fn test_manager_registers_and_creates() {
    let mut manager = LibraryManager::new();
    manager.register_registry(Box::new(Armour)).unwrap();

    let tank_type = manager.find_actor_type("ground", "Tank").unwrap();
    assert_eq!(tank_type.parent().map(|p| p.name()), Some("Vehicle"));
    assert_eq!(manager.actor_types().len(), 2);
    assert_eq!(
        manager.registry_for_type(&tank_type).map(|r| r.name()),
        Some("armour")
    );

    let mut tank = manager.create_actor_by_name("ground", "Tank").unwrap();
    assert!(!tank.is_from_library());
    assert!(tank.actor_type().instance_of(&ActorType::new("Vehicle", "ground", "")));
    tank.set_property("Fuel", PropertyValue::Float(42.0)).unwrap();
    assert_eq!(tank.actor::<Tank>().unwrap().fuel, 42.0);
}

#[test]
fn test_manager_unknown_type() {
    let manager = LibraryManager::new();
    let err = manager.create_actor_by_name("ground", "Tank").unwrap_err();
    assert!(matches!(err, RegistryError::UnknownType(name) if name == "ground.Tank"));
}

#[test]
fn test_manager_rejects_duplicates_across_registries() {
    let mut manager = LibraryManager::new();
    manager.register_registry(Box::new(Armour)).unwrap();

    let err = manager.register_registry(Box::new(Copycat)).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateType(_)));
    assert!(!manager.is_loaded("copycat"));

    let err = manager.register_registry(Box::new(Armour)).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateRegistry(_)));
    assert_eq!(manager.registry_names(), vec!["armour"]);
}

#[test]
fn test_unload_keeps_existing_actors() {
    let mut manager = LibraryManager::new();
    manager.register_registry(Box::new(Armour)).unwrap();
    let tank = manager.create_actor_by_name("ground", "Tank").unwrap();

    manager.unload("armour").unwrap();
    assert!(manager.find_actor_type("ground", "Tank").is_none());
    assert!(manager.create_actor_by_name("ground", "Tank").is_err());
    assert_eq!(tank.get_property("Fuel").unwrap(), PropertyValue::Float(100.0));

    // The type is free again.
    manager.register_registry(Box::new(Copycat)).unwrap();
    assert!(matches!(
        manager.unload("armour"),
        Err(RegistryError::UnknownRegistry(_))
    ));
}

#[test]
fn test_created_actors_are_dropped_with_their_proxy() {
    let mut manager = LibraryManager::new();
    manager.register_registry(Box::new(Beacons)).unwrap();
    let before = BEACON_DROPS.load(Ordering::SeqCst);

    let mut beacon = manager.create_actor_by_name("nav", "Beacon").unwrap();
    beacon.set_property("Channel", PropertyValue::Int(7)).unwrap();
    assert_eq!(BEACON_DROPS.load(Ordering::SeqCst), before);
    drop(beacon);
    assert_eq!(BEACON_DROPS.load(Ordering::SeqCst), before + 1);

    let batch: Vec<_> = (0..3)
        .map(|_| manager.create_actor_by_name("nav", "Beacon").unwrap())
        .collect();
    drop(batch);
    assert_eq!(BEACON_DROPS.load(Ordering::SeqCst), before + 4);

    // Outliving the registry still drops the actor exactly once.
    let survivor = manager.create_actor_by_name("nav", "Beacon").unwrap();
    manager.unload("beacons").unwrap();
    assert_eq!(BEACON_DROPS.load(Ordering::SeqCst), before + 4);
    assert_eq!(survivor.get_property("Channel").unwrap(), PropertyValue::Int(0));
    drop(survivor);
    assert_eq!(BEACON_DROPS.load(Ordering::SeqCst), before + 5);
}

#[test]
fn test_static_plugins_are_discovered_once() {
    let mut manager = LibraryManager::new();
    let added = manager.register_static_plugins().unwrap();
    assert!(added >= 1);
    assert!(manager.is_loaded("markers"));
    assert_eq!(manager.register_static_plugins().unwrap(), 0);
    assert!(manager.create_actor_by_name("misc", "Marker").is_ok());
}

#[test]
fn test_missing_library_is_reported() {
    let mut manager = LibraryManager::new();
    let err = manager
        .load_library("/no/such/dir/libsimforge_missing.so")
        .unwrap_err();
    assert!(matches!(err, RegistryError::Plugin(_)));
    assert!(manager.registry_names().is_empty());
}
