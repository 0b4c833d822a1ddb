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

//! Engine-side messages about actors.
//!
//! A [`Message`] says something happened to an actor and carries the
//! relevant values as [`NamedParameter`]s. Protocol adapters translate
//! between these and wire-level packets.

use crate::actor::{ActorProxy, ActorTypeKey};
use crate::error::MessageError;
use crate::property::{DataType, PropertyType, PropertyValue};
use serde::{Deserialize, Serialize};
use simforge_core::UniqueId;
use std::fmt;

/// What a message reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// A new actor exists.
    ActorCreated,
    /// Some of an actor's properties changed.
    ActorUpdated,
    /// An actor was removed.
    ActorDeleted,
    /// An application defined message.
    Custom(String),
}

impl MessageKind {
    /// The kind's name.
    pub fn name(&self) -> &str {
        match self {
            MessageKind::ActorCreated => "Actor Created",
            MessageKind::ActorUpdated => "Actor Updated",
            MessageKind::ActorDeleted => "Actor Deleted",
            MessageKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named, typed value carried by a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedParameter {
    /// The parameter name, usually a property name.
    pub name: String,
    /// The value.
    pub value: PropertyValue,
}

impl NamedParameter {
    /// Creates a parameter.
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// The value's data type.
    pub fn data_type(&self) -> DataType {
        self.value.data_type()
    }

    /// Captures the current value of one of `proxy`'s properties.
    pub fn from_property(proxy: &ActorProxy, name: &str) -> Result<Self, MessageError> {
        let value = proxy.get_property(name)?;
        Ok(Self::new(name, value))
    }

    /// Writes this parameter into the property of the same name on `proxy`.
    ///
    /// The property's data type must match the parameter's.
    pub fn apply_to(&self, proxy: &mut ActorProxy) -> Result<(), MessageError> {
        let expected = proxy
            .property_info(&self.name)
            .map(|info| info.data_type)
            .ok_or_else(|| crate::error::PropertyError::NotFound(self.name.clone()))?;
        if expected != self.data_type() {
            return Err(MessageError::TypeMismatch {
                parameter: self.name.clone(),
                expected,
                found: self.data_type(),
            });
        }
        proxy.set_property(&self.name, self.value.clone())?;
        Ok(())
    }
}

/// An event about one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// What happened.
    pub kind: MessageKind,
    /// The actor the message is about.
    pub about_actor: UniqueId,
    /// The actor that sent it, nil if none.
    pub sending_actor: UniqueId,
    /// Where the message came from, e.g. a network component name.
    pub source: String,
    /// The subject's display name, empty if unknown.
    pub name: String,
    /// The subject's actor type, when the sender knows it.
    pub actor_type: Option<ActorTypeKey>,
    /// Values carried by the message, at most one per name.
    pub parameters: Vec<NamedParameter>,
}

impl Message {
    /// Creates a message with no parameters.
    pub fn new(kind: MessageKind, about_actor: UniqueId) -> Self {
        Self {
            kind,
            about_actor,
            sending_actor: UniqueId::nil(),
            source: String::new(),
            name: String::new(),
            actor_type: None,
            parameters: Vec::new(),
        }
    }

    /// Sets the sending actor.
    pub fn with_sender(mut self, sender: UniqueId) -> Self {
        self.sending_actor = sender;
        self
    }

    /// Sets the source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the subject's display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the subject's actor type.
    pub fn with_actor_type(mut self, actor_type: ActorTypeKey) -> Self {
        self.actor_type = Some(actor_type);
        self
    }

    /// Adds a typed parameter.
    pub fn with_value<T: PropertyType>(mut self, name: impl Into<String>, value: T) -> Self {
        self.push_parameter(NamedParameter::new(name, value.into_value()));
        self
    }

    /// Adds a parameter, replacing any previous one with the same name.
    pub fn push_parameter(&mut self, parameter: NamedParameter) {
        match self.parameters.iter_mut().find(|p| p.name == parameter.name) {
            Some(existing) => *existing = parameter,
            None => self.parameters.push(parameter),
        }
    }

    /// Looks a parameter up by name.
    pub fn parameter(&self, name: &str) -> Option<&NamedParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// `true` if a parameter with this name exists.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    /// Reads a parameter as `T`.
    pub fn get<T: PropertyType>(&self, name: &str) -> Result<T, MessageError> {
        let parameter = self
            .parameter(name)
            .ok_or_else(|| MessageError::MissingParameter(name.to_owned()))?;
        T::from_value(parameter.value.clone()).map_err(|other| MessageError::TypeMismatch {
            parameter: name.to_owned(),
            expected: T::DATA_TYPE,
            found: other.data_type(),
        })
    }

    /// Reads an enumeration parameter's variant name.
    pub fn get_enumeration(&self, name: &str) -> Result<&str, MessageError> {
        let parameter = self
            .parameter(name)
            .ok_or_else(|| MessageError::MissingParameter(name.to_owned()))?;
        match &parameter.value {
            PropertyValue::Enumeration(label) => Ok(label.as_str()),
            other => Err(MessageError::TypeMismatch {
                parameter: name.to_owned(),
                expected: DataType::Enumeration,
                found: other.data_type(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simforge_core::math::Vec3;

    #[test]
    fn typed_reads_check_tags() {
        let message = Message::new(MessageKind::ActorUpdated, UniqueId::new())
            .with_value("Translation", Vec3::new(1.0, 0.0, 0.0))
            .with_value("Marking", "HAWK".to_owned());

        assert_eq!(message.get::<Vec3>("Translation"), Ok(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(message.get::<String>("Marking").as_deref(), Ok("HAWK"));
        assert_eq!(
            message.get::<f32>("Marking"),
            Err(MessageError::TypeMismatch {
                parameter: "Marking".to_owned(),
                expected: DataType::Float,
                found: DataType::String,
            })
        );
        assert_eq!(
            message.get::<bool>("Visible"),
            Err(MessageError::MissingParameter("Visible".to_owned()))
        );
    }

    #[test]
    fn parameters_are_unique_by_name() {
        let message = Message::new(MessageKind::ActorUpdated, UniqueId::new())
            .with_value("Speed", 1.0f32)
            .with_value("Speed", 2.0f32);
        assert_eq!(message.parameters.len(), 1);
        assert_eq!(message.get::<f32>("Speed"), Ok(2.0));
    }

    #[test]
    fn kind_names() {
        assert_eq!(MessageKind::ActorDeleted.to_string(), "Actor Deleted");
        assert_eq!(MessageKind::Custom("Tick".to_owned()).name(), "Tick");
    }

    #[test]
    fn enumeration_reads() {
        let mut message = Message::new(MessageKind::ActorUpdated, UniqueId::new());
        message.push_parameter(NamedParameter::new(
            "Damage State",
            PropertyValue::Enumeration("Destroyed".to_owned()),
        ));
        assert_eq!(message.get_enumeration("Damage State"), Ok("Destroyed"));
        assert!(message.get_enumeration("Other").is_err());
    }
}
