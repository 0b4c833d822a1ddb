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

use simforge_core::math::{DVec3, Vec3};
use simforge_data::{Actor, ActorProperty, PropertyError, PropertyMap};
use simforge_dis::{params, DamageState, EntityType, ForceId};

const GROUP_TRANSFORM: &str = "Transform";
const GROUP_DIS: &str = "DIS";

/// An entity of the exercise, local or remote.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// World position in geocentric metres.
    pub translation: DVec3,
    /// Psi, theta, phi in radians.
    pub rotation: Vec3,
    /// Metres per second.
    pub velocity: Vec3,
    /// Damage state.
    pub damage: DamageState,
    /// Force.
    pub force: ForceId,
    /// Marking text.
    pub marking: String,
    /// Dotted entity type.
    pub entity_type: String,
    /// Whether the entity is drawn.
    pub visible: bool,
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: Vec3::ZERO,
            velocity: Vec3::ZERO,
            damage: DamageState::default(),
            force: ForceId::default(),
            marking: String::new(),
            entity_type: String::new(),
            visible: true,
        }
    }
}

/// Adds the entity properties to the map of any actor embedding an [`Entity`].
fn add_entity_properties<A: 'static>(
    map: &mut PropertyMap<A>,
    entity: fn(&A) -> &Entity,
    entity_mut: fn(&mut A) -> &mut Entity,
) -> Result<(), PropertyError> {
    map.add(
        ActorProperty::new(
            params::TRANSLATION,
            "Position",
            move |a: &A| entity(a).translation,
            move |a, v| entity_mut(a).translation = v,
        )
        .with_group(GROUP_TRANSFORM),
    )?
    .add(
        ActorProperty::new(
            params::ROTATION,
            "Rotation",
            move |a: &A| entity(a).rotation,
            move |a, v| entity_mut(a).rotation = v,
        )
        .with_group(GROUP_TRANSFORM),
    )?
    .add(
        ActorProperty::new(
            params::VELOCITY,
            "Velocity",
            move |a: &A| entity(a).velocity,
            move |a, v| entity_mut(a).velocity = v,
        )
        .with_group(GROUP_TRANSFORM),
    )?
    .add(
        ActorProperty::enumeration(
            params::DAMAGE_STATE,
            "Damage State",
            move |a: &A| entity(a).damage,
            move |a, v| entity_mut(a).damage = v,
        )
        .with_group(GROUP_DIS),
    )?
    .add(
        ActorProperty::enumeration(
            params::FORCE,
            "Force",
            move |a: &A| entity(a).force,
            move |a, v| entity_mut(a).force = v,
        )
        .with_group(GROUP_DIS),
    )?
    .add(
        ActorProperty::new(
            params::MARKING,
            "Marking",
            move |a: &A| entity(a).marking.clone(),
            move |a, v| entity_mut(a).marking = v,
        )
        .with_description("Up to 11 characters are published")
        .with_group(GROUP_DIS),
    )?
    .add(
        ActorProperty::validated(
            params::ENTITY_TYPE,
            "Entity Type",
            move |a: &A| entity(a).entity_type.clone(),
            move |a, v: String| {
                if !v.is_empty() {
                    v.parse::<EntityType>().map_err(|e| e.to_string())?;
                }
                entity_mut(a).entity_type = v;
                Ok(())
            },
        )
        .with_description("Dotted kind.domain.country... enumeration")
        .with_group(GROUP_DIS),
    )?
    .add(ActorProperty::new(
        "Visible",
        "Visible",
        move |a: &A| entity(a).visible,
        move |a, v| entity_mut(a).visible = v,
    ))?;
    Ok(())
}

impl Actor for Entity {
    fn build_property_map(map: &mut PropertyMap<Self>) -> Result<(), PropertyError> {
        add_entity_properties(map, |e| e, |e| e)
    }
}

/// A crewed entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    /// The networked state.
    pub entity: Entity,
    /// People aboard.
    pub crew: i32,
    /// Top speed in metres per second.
    pub max_speed: f32,
}

impl Default for Vehicle {
    fn default() -> Self {
        Self {
            entity: Entity::default(),
            crew: 1,
            max_speed: 20.0,
        }
    }
}

impl Actor for Vehicle {
    fn build_property_map(map: &mut PropertyMap<Self>) -> Result<(), PropertyError> {
        add_entity_properties(map, |v| &v.entity, |v| &mut v.entity)?;
        map.add(
            ActorProperty::validated(
                "Crew",
                "Crew",
                |v: &Vehicle| v.crew,
                |v, crew: i32| {
                    if crew < 0 {
                        return Err(format!("crew cannot be {crew}"));
                    }
                    v.crew = crew;
                    Ok(())
                },
            )
            .with_group("Vehicle"),
        )?
        .add(
            ActorProperty::new(
                "Max Speed",
                "Max Speed",
                |v: &Vehicle| v.max_speed,
                |v, speed| v.max_speed = speed,
            )
            .with_group("Vehicle"),
        )?;
        Ok(())
    }
}
