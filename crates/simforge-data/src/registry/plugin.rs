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

use super::ActorFactory;
use crate::error::RegistryError;

/// Symbol of the function a dynamic actor module exports to create its registry.
pub const CREATE_REGISTRY_SYMBOL: &str = "create_plugin_registry";
/// Symbol of the function that takes the registry back.
pub const DESTROY_REGISTRY_SYMBOL: &str = "destroy_plugin_registry";

/// A named group of actor types provided together.
///
/// Dynamic modules export one through [`export_actor_plugin!`](crate::export_actor_plugin);
/// statically linked crates submit a [`StaticActorPlugin`].
pub trait ActorPluginRegistry: Send + Sync {
    /// Unique registry name.
    fn name(&self) -> &str;

    /// Free text for tooling.
    fn description(&self) -> &str {
        ""
    }

    /// Registers every type this registry provides.
    fn register_actor_types(&self, factory: &mut ActorFactory) -> Result<(), RegistryError>;
}

/// A registry linked into the executable, discovered at startup.
///
/// ```ignore
/// fn create() -> Box<dyn ActorPluginRegistry> {
///     Box::new(MyRegistry)
/// }
/// inventory::submit! { StaticActorPlugin::new(create) }
/// ```
pub struct StaticActorPlugin {
    /// Builds the registry.
    pub create: fn() -> Box<dyn ActorPluginRegistry>,
}

impl StaticActorPlugin {
    /// Wraps a registry constructor.
    pub const fn new(create: fn() -> Box<dyn ActorPluginRegistry>) -> Self {
        Self { create }
    }
}

inventory::collect!(StaticActorPlugin);

/// Exports an actor registry from a `cdylib` so
/// [`LibraryManager::load_library`](crate::LibraryManager::load_library) can
/// find it.
///
/// ```ignore
/// simforge_data::export_actor_plugin!(MyRegistry::default());
/// ```
#[macro_export]
macro_rules! export_actor_plugin {
    ($ctor:expr) => {
        $crate::__private::export_plugin!(
            create_plugin_registry,
            destroy_plugin_registry,
            dyn $crate::registry::ActorPluginRegistry,
            $ctor
        );
    };
}
