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

use super::actor_property::ActorProperty;
use crate::error::PropertyError;
use std::collections::HashMap;

/// The properties of one actor type, in declaration order.
pub struct PropertyMap<A> {
    properties: Vec<ActorProperty<A>>,
    index: HashMap<String, usize>,
}

impl<A: 'static> PropertyMap<A> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Appends a property. Names must be unique.
    pub fn add(&mut self, property: ActorProperty<A>) -> Result<&mut Self, PropertyError> {
        if self.index.contains_key(property.name()) {
            return Err(PropertyError::Duplicate(property.name().to_owned()));
        }
        self.index
            .insert(property.name().to_owned(), self.properties.len());
        self.properties.push(property);
        Ok(self)
    }

    /// Looks a property up by name.
    pub fn get(&self, name: &str) -> Option<&ActorProperty<A>> {
        self.index.get(name).map(|&i| &self.properties[i])
    }

    /// `true` if a property with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates over the properties in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorProperty<A>> {
        self.properties.iter()
    }

    /// Property names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name())
    }

    /// Distinct group names in order of first appearance.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for property in &self.properties {
            let group = property.info().group.as_str();
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// `true` if the map holds no property.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<A: 'static> Default for PropertyMap<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for PropertyMap<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.properties.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Lamp {
        on: bool,
        watts: f32,
    }

    #[test]
    fn keeps_declaration_order_and_groups() {
        let mut map = PropertyMap::<Lamp>::new();
        map.add(ActorProperty::new("On", "On", |l: &Lamp| l.on, |l, v| l.on = v).with_group("State"))
            .unwrap()
            .add(ActorProperty::new("Watts", "Watts", |l: &Lamp| l.watts, |l, v| l.watts = v).with_group("Power"))
            .unwrap()
            .add(ActorProperty::read_only("Lit", "Lit", |l: &Lamp| l.on && l.watts > 0.0).with_group("State"))
            .unwrap();

        assert_eq!(map.names().collect::<Vec<_>>(), vec!["On", "Watts", "Lit"]);
        assert_eq!(map.groups(), vec!["State", "Power"]);
        assert_eq!(map.len(), 3);
        assert!(map.contains("Watts"));
        assert!(map.get("Missing").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut map = PropertyMap::<Lamp>::new();
        map.add(ActorProperty::new("On", "On", |l: &Lamp| l.on, |l, v| l.on = v))
            .unwrap();
        let err = map
            .add(ActorProperty::read_only("On", "On again", |l: &Lamp| l.on))
            .unwrap_err();
        assert_eq!(err, PropertyError::Duplicate("On".to_owned()));
        assert_eq!(map.len(), 1);
    }
}
