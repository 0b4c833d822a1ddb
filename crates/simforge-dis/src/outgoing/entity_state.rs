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

use super::{resolve_entity, MessageToPacketAdapter};
use crate::error::DisError;
use crate::params;
use crate::pdu::{EntityStatePdu, Pdu};
use crate::state::SharedState;
use crate::types::{DamageState, ForceId};
use simforge_core::math::{DVec3, Vec3};
use simforge_data::property::{PropertyEnum, PropertyType};
use simforge_data::{DataType, Message, MessageError, MessageKind, PropertyValue};

/// Publishes created and updated local actors as entity state PDUs.
///
/// Parameters the message does not carry keep their zero value; a
/// parameter of the wrong type drops the message.
#[derive(Debug, Default)]
pub struct ActorUpdateToEntityState;

fn optional<T: PropertyType>(message: &Message, name: &str) -> Result<Option<T>, DisError> {
    match message.get::<T>(name) {
        Ok(value) => Ok(Some(value)),
        Err(MessageError::MissingParameter(_)) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn location(message: &Message) -> Result<DVec3, DisError> {
    match message.parameter(params::TRANSLATION).map(|p| &p.value) {
        None => Ok(DVec3::ZERO),
        Some(PropertyValue::DVec3(v)) => Ok(*v),
        Some(PropertyValue::Vec3(v)) => Ok(DVec3::from(*v)),
        Some(other) => Err(MessageError::TypeMismatch {
            parameter: params::TRANSLATION.to_owned(),
            expected: DataType::DVec3,
            found: other.data_type(),
        }
        .into()),
    }
}

fn enumeration<E: PropertyEnum + Default>(message: &Message, name: &str) -> Result<E, DisError> {
    match message.get_enumeration(name) {
        Ok(label) => Ok(E::from_name(label).unwrap_or_else(|| {
            log::debug!("Unknown {name} '{label}', using the default");
            E::default()
        })),
        Err(MessageError::MissingParameter(_)) => Ok(E::default()),
        Err(err) => Err(err.into()),
    }
}

impl MessageToPacketAdapter for ActorUpdateToEntityState {
    fn convert(&self, message: &Message, state: &mut SharedState) -> Result<Option<Pdu>, DisError> {
        if !matches!(message.kind, MessageKind::ActorCreated | MessageKind::ActorUpdated) {
            return Ok(None);
        }
        // Remote actors are published by their own simulation.
        if message.source == params::SOURCE {
            return Ok(None);
        }

        // Decode everything first: a rejected message must not claim an entity id.
        let location = location(message)?;
        let orientation = optional::<Vec3>(message, params::ROTATION)?.unwrap_or(Vec3::ZERO);
        let velocity = optional::<Vec3>(message, params::VELOCITY)?.unwrap_or(Vec3::ZERO);
        let force = enumeration::<ForceId>(message, params::FORCE)?;
        let damage = enumeration::<DamageState>(message, params::DAMAGE_STATE)?;
        let marking = optional::<String>(message, params::MARKING)?;

        let entity_id = resolve_entity(message, state)?;
        let entity_type = message
            .actor_type
            .as_ref()
            .and_then(|key| state.mapping().entity_type_for(key))
            .copied()
            .unwrap_or_default();

        let mut pdu = EntityStatePdu::new(state.connection().exercise_id, entity_id, entity_type);
        pdu.location = location;
        pdu.orientation = orientation;
        pdu.linear_velocity = velocity;
        pdu.force_id = force;
        pdu.appearance = damage.apply_to_appearance(0);
        if let Some(marking) = marking {
            pdu.set_marking(&marking);
        }
        Ok(Some(Pdu::EntityState(pdu)))
    }
}
