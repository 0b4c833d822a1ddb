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

//! Errors of the DIS bridge.

use crate::types::{EntityId, EntityType};
use simforge_core::plugin::PluginLoadError;
use simforge_core::telemetry::MetricsError;
use simforge_core::UniqueId;
use simforge_data::actor::ParseActorTypeKeyError;
use simforge_data::{ActorTypeKey, MessageError};
use std::path::PathBuf;
use thiserror::Error;

/// A PDU or message that could not be translated, or a component failure.
#[derive(Debug, Error)]
pub enum DisError {
    /// No actor is mapped to this DIS entity id.
    #[error("no actor is mapped to entity {0}")]
    UnmappedEntity(EntityId),
    /// No actor type is mapped to this DIS entity type.
    #[error("no actor type is mapped to entity type {0}")]
    UnmappedEntityType(EntityType),
    /// No DIS entity is mapped to this actor.
    #[error("no entity is mapped to actor {0}")]
    UnmappedActor(UniqueId),
    /// No DIS entity type is mapped to this actor type.
    #[error("no entity type is mapped to actor type {0}")]
    UnmappedActorType(ActorTypeKey),
    /// The message does not say which actor type its subject is.
    #[error("message about {0} carries no actor type")]
    MissingActorType(UniqueId),
    /// Every entity number of the local simulation address is in use.
    #[error("no free entity number left for site {site}, application {application}")]
    EntityIdsExhausted {
        /// The local site.
        site: u16,
        /// The local application.
        application: u16,
    },
    /// A message parameter has the wrong type.
    #[error(transparent)]
    Message(#[from] MessageError),
    /// A DIS plugin module could not be loaded.
    #[error(transparent)]
    Plugin(#[from] PluginLoadError),
    /// The component's metrics could not be registered.
    #[error("metrics error: {0}")]
    Metrics(#[from] MetricsError),
}

/// An invalid or unreadable DIS configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read DIS config {path}: {source}")]
    Io {
        /// The file path.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The document is not valid RON for a DIS config.
    #[error("invalid DIS config: {0}")]
    Format(String),
    /// A mapping names an entity type that does not parse.
    #[error("invalid entity type '{0}'")]
    InvalidEntityType(String),
    /// A mapping names an actor type that does not parse.
    #[error(transparent)]
    InvalidActorType(#[from] ParseActorTypeKeyError),
    /// Two mappings name the same entity type.
    #[error("entity type {0} is mapped twice")]
    DuplicateMapping(EntityType),
}
