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

use super::plugin::{
    ActorPluginRegistry, StaticActorPlugin, CREATE_REGISTRY_SYMBOL, DESTROY_REGISTRY_SYMBOL,
};
use super::ActorFactory;
use crate::actor::{ActorProxy, ActorType, ActorTypeKey};
use crate::error::RegistryError;
use simforge_core::plugin::{PluginHandle, PluginLibrary};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

struct RegistryEntry {
    // Built by code in the registry's module: dropped before the handle.
    factory: ActorFactory,
    registry: PluginHandle<dyn ActorPluginRegistry>,
}

/// Owns every loaded actor registry and creates actors through them.
///
/// An ordinary value: create one per application and pass it where actors
/// are created.
#[derive(Default)]
pub struct LibraryManager {
    entries: Vec<RegistryEntry>,
    owners: HashMap<ActorTypeKey, String>,
}

impl LibraryManager {
    /// Creates a manager with no registry loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a statically linked registry.
    pub fn register_registry(
        &mut self,
        registry: Box<dyn ActorPluginRegistry>,
    ) -> Result<(), RegistryError> {
        self.install(PluginHandle::from_box(registry)).map(|_| ())
    }

    /// Loads a dynamic actor module and registers the registry it exports.
    ///
    /// Returns the registry's name.
    pub fn load_library(&mut self, path: impl AsRef<Path>) -> Result<String, RegistryError> {
        let library = PluginLibrary::open(path)?;
        // SAFETY: actor modules export the pair generated by `export_actor_plugin!`.
        let registry = unsafe {
            library.instantiate::<dyn ActorPluginRegistry>(
                CREATE_REGISTRY_SYMBOL,
                DESTROY_REGISTRY_SYMBOL,
            )?
        };
        self.install(registry)
    }

    /// Registers every [`StaticActorPlugin`] linked into the executable.
    ///
    /// Registries already loaded under the same name are left alone. Returns
    /// how many were added.
    pub fn register_static_plugins(&mut self) -> Result<usize, RegistryError> {
        let mut added = 0;
        for plugin in inventory::iter::<StaticActorPlugin> {
            let registry = (plugin.create)();
            if self.is_loaded(registry.name()) {
                log::debug!("Static registry '{}' already loaded", registry.name());
                continue;
            }
            self.register_registry(registry)?;
            added += 1;
        }
        Ok(added)
    }

    fn install(
        &mut self,
        registry: PluginHandle<dyn ActorPluginRegistry>,
    ) -> Result<String, RegistryError> {
        let name = registry.name().to_owned();
        if self.is_loaded(&name) {
            return Err(RegistryError::DuplicateRegistry(name));
        }

        let mut factory = ActorFactory::new();
        registry.register_actor_types(&mut factory)?;
        if let Some(taken) = factory
            .actor_types()
            .find(|ty| self.owners.contains_key(ty.key()))
        {
            return Err(RegistryError::DuplicateType(taken.full_name()));
        }

        for ty in factory.actor_types() {
            self.owners.insert(ty.key().clone(), name.clone());
        }
        log::info!(
            "Loaded actor registry '{}' with {} types{}",
            name,
            factory.len(),
            if registry.is_dynamic() { " (dynamic)" } else { "" }
        );
        self.entries.push(RegistryEntry { factory, registry });
        Ok(name)
    }

    /// Removes a registry.
    ///
    /// Actors it created stay usable; a dynamic module stays mapped until the
    /// last of them is dropped.
    pub fn unload(&mut self, name: &str) -> Result<(), RegistryError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.registry.name() == name)
            .ok_or_else(|| RegistryError::UnknownRegistry(name.to_owned()))?;
        let entry = self.entries.remove(index);
        self.owners.retain(|_, owner| owner.as_str() != name);
        log::info!("Unloaded actor registry '{name}'");
        drop(entry);
        Ok(())
    }

    /// `true` if a registry with this name is loaded.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.registry.name() == name)
    }

    /// Names of the loaded registries, in load order.
    pub fn registry_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.registry.name()).collect()
    }

    fn entry_for(&self, key: &ActorTypeKey) -> Option<&RegistryEntry> {
        let owner = self.owners.get(key)?;
        self.entries.iter().find(|e| e.registry.name() == owner)
    }

    /// Looks a type up by category and name.
    pub fn find_actor_type(&self, category: &str, name: &str) -> Option<Arc<ActorType>> {
        self.find_actor_type_by_key(&ActorTypeKey::new(category, name))
    }

    /// Looks a type up by key.
    pub fn find_actor_type_by_key(&self, key: &ActorTypeKey) -> Option<Arc<ActorType>> {
        self.entry_for(key)?.factory.find(key).cloned()
    }

    /// Every loaded type, grouped by registry in load order.
    pub fn actor_types(&self) -> Vec<Arc<ActorType>> {
        self.entries
            .iter()
            .flat_map(|e| e.factory.actor_types().cloned())
            .collect()
    }

    /// The registry providing a type.
    pub fn registry_for_type(&self, actor_type: &ActorType) -> Option<&dyn ActorPluginRegistry> {
        self.entry_for(actor_type.key()).map(|e| &*e.registry)
    }

    /// Creates a new actor of the given type.
    pub fn create_actor(&self, actor_type: &ActorType) -> Result<ActorProxy, RegistryError> {
        let entry = self
            .entry_for(actor_type.key())
            .ok_or_else(|| RegistryError::UnknownType(actor_type.full_name()))?;
        let mut proxy = entry.factory.create(actor_type)?;
        proxy.attach_guard(entry.registry.guard().cloned());
        log::debug!("Created {} {}", actor_type, proxy.id());
        Ok(proxy)
    }

    /// Creates a new actor of the type named `category.name`.
    pub fn create_actor_by_name(
        &self,
        category: &str,
        name: &str,
    ) -> Result<ActorProxy, RegistryError> {
        self.create_actor_by_key(&ActorTypeKey::new(category, name))
    }

    /// Creates a new actor of the type with this key.
    pub fn create_actor_by_key(&self, key: &ActorTypeKey) -> Result<ActorProxy, RegistryError> {
        let actor_type = self
            .find_actor_type_by_key(key)
            .ok_or_else(|| RegistryError::UnknownType(key.full_name()))?;
        self.create_actor(&actor_type)
    }
}

impl fmt::Debug for LibraryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryManager")
            .field("registries", &self.registry_names())
            .field("types", &self.owners.len())
            .finish()
    }
}
