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

//! # Simforge Actors
//!
//! The stock actor registry, `simforge-actors`.
//!
//! [`Entity`] and [`Vehicle`] name their properties after
//! [`simforge_dis::params`], so the DIS bridge can mirror them without a
//! translation table. [`Waypoint`] and [`Environment`] stay local.
//!
//! Linking this crate is enough for
//! [`LibraryManager::register_static_plugins`](simforge_data::LibraryManager::register_static_plugins)
//! to find the registry; built as a `cdylib` it loads through
//! [`LibraryManager::load_library`](simforge_data::LibraryManager::load_library).

#![deny(missing_docs)]

mod entity;
mod environment;
mod waypoint;

pub use entity::{Entity, Vehicle};
pub use environment::{Environment, Precipitation};
pub use waypoint::Waypoint;

use simforge_data::registry::StaticActorPlugin;
use simforge_data::{ActorFactory, ActorPluginRegistry, ActorType, RegistryError};
use std::sync::Arc;

/// Name of the stock registry.
pub const REGISTRY_NAME: &str = "simforge-actors";
/// Category of the networked actor types.
pub const DIS_CATEGORY: &str = "dis";
/// Category of the environment actor.
pub const ENVIRONMENT_CATEGORY: &str = "environment";

/// Provides `dis.Entity`, `dis.Vehicle`, `dis.Waypoint` and
/// `environment.Environment`.
#[derive(Debug, Default)]
pub struct StockActors;

impl ActorPluginRegistry for StockActors {
    fn name(&self) -> &str {
        REGISTRY_NAME
    }

    fn description(&self) -> &str {
        "Networked entities, waypoints and the environment"
    }

    fn register_actor_types(&self, factory: &mut ActorFactory) -> Result<(), RegistryError> {
        let entity = factory.register(
            ActorType::new("Entity", DIS_CATEGORY, "Anything published on the DIS exercise"),
            Entity::default,
        )?;
        factory.register(
            ActorType::new("Vehicle", DIS_CATEGORY, "A crewed platform").with_parent(Arc::clone(&entity)),
            Vehicle::default,
        )?;
        factory.register(
            ActorType::new("Waypoint", DIS_CATEGORY, "A named point along a route"),
            Waypoint::default,
        )?;
        factory.register(
            ActorType::new("Environment", ENVIRONMENT_CATEGORY, "Time of day and weather"),
            Environment::default,
        )?;
        log::debug!("{REGISTRY_NAME} registered {} actor types", factory.len());
        Ok(())
    }
}

fn create_stock_actors() -> Box<dyn ActorPluginRegistry> {
    Box::new(StockActors)
}

inventory::submit! { StaticActorPlugin::new(create_stock_actors) }

simforge_data::export_actor_plugin!(StockActors);
