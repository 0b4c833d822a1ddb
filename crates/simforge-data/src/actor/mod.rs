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

//! Actors, their types, and the proxies that own them.

mod actor_type;
mod proxy;

pub use actor_type::{ActorType, ActorTypeKey, ParseActorTypeKeyError};
pub use proxy::{ActorProxy, UpdateReport};

use crate::error::PropertyError;
use crate::property::PropertyMap;

/// A simulation object that exposes its state through properties.
pub trait Actor: Send + Sync + 'static {
    /// Declares this type's properties.
    ///
    /// Runs once for every proxy created, right after the actor itself.
    fn build_property_map(map: &mut PropertyMap<Self>) -> Result<(), PropertyError>
    where
        Self: Sized;
}
