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

use crate::actor::{Actor, ActorProxy, ActorType, ActorTypeKey};
use crate::error::{PropertyError, RegistryError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Constructor = Box<dyn Fn(Arc<ActorType>) -> Result<ActorProxy, PropertyError> + Send + Sync>;

struct Registration {
    actor_type: Arc<ActorType>,
    construct: Constructor,
}

/// Maps actor types to the constructors that build them.
///
/// Each registry fills one factory with the types it provides.
#[derive(Default)]
pub struct ActorFactory {
    order: Vec<ActorTypeKey>,
    registrations: HashMap<ActorTypeKey, Registration>,
}

impl ActorFactory {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an actor type built by `construct`.
    ///
    /// Returns the shared type so it can serve as a parent of later
    /// registrations.
    pub fn register<A: Actor>(
        &mut self,
        actor_type: impl Into<Arc<ActorType>>,
        construct: impl Fn() -> A + Send + Sync + 'static,
    ) -> Result<Arc<ActorType>, RegistryError> {
        let actor_type = actor_type.into();
        let key = actor_type.key().clone();
        if self.registrations.contains_key(&key) {
            return Err(RegistryError::DuplicateType(key.full_name()));
        }

        log::debug!("Registered actor type {key}");
        self.order.push(key.clone());
        self.registrations.insert(
            key,
            Registration {
                actor_type: actor_type.clone(),
                construct: Box::new(move |ty| ActorProxy::new(ty, construct())),
            },
        );
        Ok(actor_type)
    }

    /// `true` if the type is registered here.
    pub fn contains(&self, key: &ActorTypeKey) -> bool {
        self.registrations.contains_key(key)
    }

    /// Looks a registered type up.
    pub fn find(&self, key: &ActorTypeKey) -> Option<&Arc<ActorType>> {
        self.registrations.get(key).map(|r| &r.actor_type)
    }

    /// Registered types in registration order.
    pub fn actor_types(&self) -> impl Iterator<Item = &Arc<ActorType>> {
        self.order
            .iter()
            .filter_map(|key| self.registrations.get(key).map(|r| &r.actor_type))
    }

    /// Builds a new actor of the given type.
    pub fn create(&self, actor_type: &ActorType) -> Result<ActorProxy, RegistryError> {
        let registration = self
            .registrations
            .get(actor_type.key())
            .ok_or_else(|| RegistryError::UnknownType(actor_type.full_name()))?;
        Ok((registration.construct)(registration.actor_type.clone())?)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// `true` if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl fmt::Debug for ActorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.order.iter()).finish()
    }
}
