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

//! Error types of the actor layer.
//!
//! Every failure here is recoverable: callers log it and keep simulating.

use crate::property::DataType;
use simforge_core::plugin::PluginLoadError;
use simforge_core::UniqueId;
use thiserror::Error;

/// An error raised while reading or writing an actor property.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    /// No property with this name exists on the actor.
    #[error("unknown property '{0}'")]
    NotFound(String),
    /// The value's type tag does not match the property's data type.
    #[error("property '{property}' expects {expected} but was given {found}")]
    TypeMismatch {
        /// The property name.
        property: String,
        /// The property's data type.
        expected: DataType,
        /// The data type of the rejected value.
        found: DataType,
    },
    /// The property has no setter.
    #[error("property '{0}' is read-only")]
    ReadOnly(String),
    /// An enumeration property was given a name that is not one of its variants.
    #[error("'{value}' is not a valid value for enumeration property '{property}'")]
    InvalidEnumValue {
        /// The property name.
        property: String,
        /// The rejected name.
        value: String,
    },
    /// A string could not be parsed as the given data type.
    #[error("cannot parse '{input}' as {data_type}")]
    Parse {
        /// The target data type.
        data_type: DataType,
        /// The rejected input.
        input: String,
    },
    /// A property map already holds a property with this name.
    #[error("property '{0}' is already defined")]
    Duplicate(String),
    /// The actor's setter refused the value.
    #[error("property '{property}' rejected the value: {reason}")]
    Rejected {
        /// The property name.
        property: String,
        /// Why the value was refused.
        reason: String,
    },
}

/// An error raised by actor factories and the library manager.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No loaded registry provides this actor type.
    #[error("unknown actor type '{0}'")]
    UnknownType(String),
    /// The actor type name is already provided.
    #[error("actor type '{0}' is already registered")]
    DuplicateType(String),
    /// A registry with this name is already loaded.
    #[error("plugin registry '{0}' is already loaded")]
    DuplicateRegistry(String),
    /// No registry with this name is loaded.
    #[error("plugin registry '{0}' is not loaded")]
    UnknownRegistry(String),
    /// The dynamic module could not be loaded.
    #[error(transparent)]
    Plugin(#[from] PluginLoadError),
    /// Building the new actor's property map failed.
    #[error("failed to build actor properties: {0}")]
    Property(#[from] PropertyError),
}

/// An error raised while reading a message or exchanging values with a proxy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MessageError {
    /// The message has no parameter with this name.
    #[error("message has no parameter '{0}'")]
    MissingParameter(String),
    /// A parameter's type does not match what the reader or property expects.
    #[error("parameter '{parameter}' is {found} but {expected} was expected")]
    TypeMismatch {
        /// The parameter name.
        parameter: String,
        /// The expected data type.
        expected: DataType,
        /// The parameter's data type.
        found: DataType,
    },
    /// The underlying property access failed.
    #[error(transparent)]
    Property(#[from] PropertyError),
}

/// An error raised while saving or loading an actor map.
#[derive(Debug, Error)]
pub enum MapError {
    /// The document could not be encoded or decoded.
    #[error("map format error: {0}")]
    Format(String),
    /// File access failed.
    #[error("map i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Two actors share an id.
    #[error("actor {0} is already in the map")]
    DuplicateActor(UniqueId),
    /// A record names an actor type no loaded registry provides.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
