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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// The `category.name` pair identifying an actor type.
///
/// Serialized as the dotted string. Categories may themselves contain dots,
/// so parsing splits at the last one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorTypeKey {
    /// The category, e.g. `dis`.
    pub category: String,
    /// The type name within the category.
    pub name: String,
}

/// A string that is not a `category.name` pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid actor type name, expected 'category.name'")]
pub struct ParseActorTypeKeyError(pub String);

impl ActorTypeKey {
    /// Creates a key.
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }

    /// The dotted form.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.category, self.name)
    }
}

impl fmt::Display for ActorTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.name)
    }
}

impl FromStr for ActorTypeKey {
    type Err = ParseActorTypeKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('.') {
            Some((category, name)) if !category.is_empty() && !name.is_empty() => {
                Ok(Self::new(category, name))
            }
            _ => Err(ParseActorTypeKeyError(s.to_owned())),
        }
    }
}

impl TryFrom<String> for ActorTypeKey {
    type Error = ParseActorTypeKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActorTypeKey> for String {
    fn from(key: ActorTypeKey) -> Self {
        key.full_name()
    }
}

/// Immutable metadata describing a kind of actor.
///
/// Types form a single-inheritance tree through `parent`. Two types are equal
/// when their category and name match.
#[derive(Debug, Clone)]
pub struct ActorType {
    key: ActorTypeKey,
    description: String,
    parent: Option<Arc<ActorType>>,
}

impl ActorType {
    /// Creates a root type.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: ActorTypeKey::new(category, name),
            description: description.into(),
            parent: None,
        }
    }

    /// Sets the parent type.
    pub fn with_parent(mut self, parent: Arc<ActorType>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// The type name.
    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// The category.
    pub fn category(&self) -> &str {
        &self.key.category
    }

    /// The description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The parent type, if any.
    pub fn parent(&self) -> Option<&Arc<ActorType>> {
        self.parent.as_ref()
    }

    /// The identifying key.
    pub fn key(&self) -> &ActorTypeKey {
        &self.key
    }

    /// `category.name`
    pub fn full_name(&self) -> String {
        self.key.full_name()
    }

    /// `true` if this type is `other` or descends from it.
    pub fn instance_of(&self, other: &ActorType) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty.key == other.key {
                return true;
            }
            current = ty.parent.as_deref();
        }
        false
    }
}

impl PartialEq for ActorType {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ActorType {}

impl Hash for ActorType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key, f)
    }
}
