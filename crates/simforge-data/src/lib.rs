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

//! # Simforge Data
//!
//! The actor layer: typed property reflection over opaque simulation
//! objects, the actor type catalog fed by plugin registries, the engine-side
//! [`Message`](message::Message) with named parameters, and actor maps that
//! persist property values.
//!
//! Nothing here is global. A [`LibraryManager`](registry::LibraryManager) is
//! an ordinary value the application creates and passes around.

#![warn(missing_docs)]

pub mod actor;
pub mod error;
pub mod map;
pub mod message;
pub mod property;
pub mod registry;

pub use actor::{Actor, ActorProxy, ActorType, ActorTypeKey};
pub use error::{MapError, MessageError, PropertyError, RegistryError};
pub use map::ActorMap;
pub use message::{Message, MessageKind, NamedParameter};
pub use property::{ActorProperty, DataType, PropertyMap, PropertyValue};
pub use registry::{ActorFactory, ActorPluginRegistry, LibraryManager};

#[doc(hidden)]
pub mod __private {
    pub use simforge_core::export_plugin;
}
