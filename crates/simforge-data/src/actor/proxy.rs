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

use super::{Actor, ActorType};
use crate::error::PropertyError;
use crate::message::{Message, MessageKind, NamedParameter};
use crate::property::{PropertyInfo, PropertyMap, PropertyValue};
use simforge_core::plugin::LibraryGuard;
use simforge_core::UniqueId;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased actor together with the property map built for it.
trait PropertyContainer: Send + Sync {
    fn actor(&self) -> &dyn Any;
    fn actor_mut(&mut self) -> &mut dyn Any;
    fn info(&self, name: &str) -> Option<&PropertyInfo>;
    fn infos(&self) -> Vec<&PropertyInfo>;
    fn get(&self, name: &str) -> Result<PropertyValue, PropertyError>;
    fn set(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError>;
    fn set_from_string(&mut self, name: &str, input: &str) -> Result<(), PropertyError>;
}

struct Bound<A: Actor> {
    actor: A,
    map: PropertyMap<A>,
}

impl<A: Actor> PropertyContainer for Bound<A> {
    fn actor(&self) -> &dyn Any {
        &self.actor
    }

    fn actor_mut(&mut self) -> &mut dyn Any {
        &mut self.actor
    }

    fn info(&self, name: &str) -> Option<&PropertyInfo> {
        self.map.get(name).map(|p| p.info())
    }

    fn infos(&self) -> Vec<&PropertyInfo> {
        self.map.iter().map(|p| p.info()).collect()
    }

    fn get(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        self.map
            .get(name)
            .map(|p| p.get(&self.actor))
            .ok_or_else(|| PropertyError::NotFound(name.to_owned()))
    }

    fn set(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        let property = self
            .map
            .get(name)
            .ok_or_else(|| PropertyError::NotFound(name.to_owned()))?;
        property.set(&mut self.actor, value)
    }

    fn set_from_string(&mut self, name: &str, input: &str) -> Result<(), PropertyError> {
        let property = self
            .map
            .get(name)
            .ok_or_else(|| PropertyError::NotFound(name.to_owned()))?;
        property.set_from_string(&mut self.actor, input)
    }
}

/// Outcome of [`ActorProxy::apply_update`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateReport {
    /// Parameters written to a property.
    pub applied: Vec<String>,
    /// Parameters that were not written, with the reason.
    pub skipped: Vec<(String, PropertyError)>,
}

impl UpdateReport {
    /// `true` if every parameter was applied.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// The handle through which every actor is reached.
///
/// A proxy owns one actor and the property map built for it. Proxies created
/// by a dynamically loaded registry also keep that module loaded.
pub struct ActorProxy {
    id: UniqueId,
    name: String,
    actor_type: Arc<ActorType>,
    inner: Box<dyn PropertyContainer>,
    // Declared after `inner` so the actor is dropped while its code is mapped.
    guard: Option<LibraryGuard>,
}

impl ActorProxy {
    /// Wraps `actor`, building its property map.
    pub fn new<A: Actor>(actor_type: Arc<ActorType>, actor: A) -> Result<Self, PropertyError> {
        let mut map = PropertyMap::new();
        A::build_property_map(&mut map)?;
        log::trace!(
            "Built {} properties for a new {}",
            map.len(),
            actor_type.full_name()
        );
        Ok(Self {
            id: UniqueId::new(),
            name: actor_type.name().to_owned(),
            actor_type,
            inner: Box::new(Bound { actor, map }),
            guard: None,
        })
    }

    pub(crate) fn attach_guard(&mut self, guard: Option<LibraryGuard>) {
        self.guard = guard;
    }

    /// `true` if the actor's code lives in a dynamically loaded module.
    pub fn is_from_library(&self) -> bool {
        self.guard.is_some()
    }

    /// The actor's id.
    pub fn id(&self) -> UniqueId {
        self.id
    }

    /// The same proxy under another id, e.g. when restoring a saved map.
    ///
    /// Takes the proxy by value: an actor held by an
    /// [`ActorMap`](crate::map::ActorMap) is indexed by its id, so renaming
    /// one means removing it first and adding it back.
    pub fn with_id(mut self, id: UniqueId) -> Self {
        self.id = id;
        self
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The actor's type.
    pub fn actor_type(&self) -> &Arc<ActorType> {
        &self.actor_type
    }

    /// Property names in declaration order.
    pub fn property_names(&self) -> Vec<&str> {
        self.inner.infos().into_iter().map(|i| i.name.as_str()).collect()
    }

    /// Describes every property in declaration order.
    pub fn properties(&self) -> Vec<&PropertyInfo> {
        self.inner.infos()
    }

    /// Describes one property.
    pub fn property_info(&self, name: &str) -> Option<&PropertyInfo> {
        self.inner.info(name)
    }

    /// Reads a property.
    pub fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        self.inner.get(name)
    }

    /// Writes a property.
    pub fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        self.inner.set(name, value)
    }

    /// Reads a property in its string form.
    pub fn get_property_string(&self, name: &str) -> Result<String, PropertyError> {
        self.inner.get(name).map(|v| v.to_string_repr())
    }

    /// Parses and writes a property from its string form.
    pub fn set_property_string(&mut self, name: &str, input: &str) -> Result<(), PropertyError> {
        self.inner.set_from_string(name, input)
    }

    /// The actor, if it is an `A`.
    ///
    /// Not dependable for actors created by a dynamically loaded registry
    /// (see [`ActorProxy::is_from_library`]): the module carries its own copy
    /// of `A`, and unless both sides were built together its `TypeId`
    /// differs, so this returns `None`. Reach those through the property
    /// accessors.
    pub fn actor<A: Actor>(&self) -> Option<&A> {
        self.inner.actor().downcast_ref()
    }

    /// The actor mutably, if it is an `A`. Same caveat for library actors
    /// as [`ActorProxy::actor`].
    pub fn actor_mut<A: Actor>(&mut self) -> Option<&mut A> {
        self.inner.actor_mut().downcast_mut()
    }

    /// Writes each parameter of `message` into the property of the same name.
    ///
    /// Best effort: parameters without a matching property, or whose type or
    /// access does not fit, are skipped and listed in the report.
    pub fn apply_update(&mut self, message: &Message) -> UpdateReport {
        let mut report = UpdateReport::default();
        for parameter in &message.parameters {
            match self.set_property(&parameter.name, parameter.value.clone()) {
                Ok(()) => report.applied.push(parameter.name.clone()),
                Err(err) => {
                    if matches!(err, PropertyError::NotFound(_)) {
                        log::trace!("{} has no property '{}'", self.actor_type, parameter.name);
                    } else {
                        log::warn!("Skipping update of {} ({}): {err}", self.name, self.id);
                    }
                    report.skipped.push((parameter.name.clone(), err));
                }
            }
        }
        report
    }

    /// Builds a message about this actor carrying every property value.
    pub fn to_update_message(&self, kind: MessageKind) -> Message {
        let mut message = Message::new(kind, self.id)
            .with_name(self.name.clone())
            .with_actor_type(self.actor_type.key().clone());
        for info in self.inner.infos() {
            if let Ok(value) = self.inner.get(&info.name) {
                message.push_parameter(NamedParameter::new(info.name.clone(), value));
            }
        }
        message
    }
}

impl fmt::Debug for ActorProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorProxy")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("actor_type", &self.actor_type.full_name())
            .field("from_library", &self.guard.is_some())
            .finish()
    }
}
