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

use super::PduProcessor;
use crate::error::DisError;
use crate::params;
use crate::pdu::{EntityStatePdu, Pdu};
use crate::state::SharedState;
use crate::types::DamageState;
use simforge_core::UniqueId;
use simforge_data::property::PropertyEnum;
use simforge_data::{Message, MessageKind, NamedParameter, PropertyValue};

/// Turns entity state PDUs into actor created or updated messages.
///
/// The first state of an unknown entity creates an actor of the type its
/// entity type maps to; later states update it.
#[derive(Debug, Default)]
pub struct EntityStateProcessor;

impl EntityStateProcessor {
    fn state_message(kind: MessageKind, actor: UniqueId, pdu: &EntityStatePdu) -> Message {
        let mut message = Message::new(kind, actor)
            .with_source(params::SOURCE)
            .with_value(params::TRANSLATION, pdu.location)
            .with_value(params::ROTATION, pdu.orientation)
            .with_value(params::VELOCITY, pdu.linear_velocity)
            .with_value(params::MARKING, pdu.marking.clone());
        message.push_parameter(NamedParameter::new(
            params::DAMAGE_STATE,
            PropertyValue::Enumeration(DamageState::from_appearance(pdu.appearance).name().to_owned()),
        ));
        message.push_parameter(NamedParameter::new(
            params::FORCE,
            PropertyValue::Enumeration(pdu.force_id.name().to_owned()),
        ));
        message
    }
}

impl PduProcessor for EntityStateProcessor {
    fn process(&self, pdu: &Pdu, state: &mut SharedState) -> Result<Option<Message>, DisError> {
        let Pdu::EntityState(pdu) = pdu else {
            return Ok(None);
        };

        if let Some(actor) = state.entities().actor_for(&pdu.entity_id) {
            return Ok(Some(Self::state_message(MessageKind::ActorUpdated, actor, pdu)));
        }

        let actor_type = state
            .mapping()
            .actor_type_for(&pdu.entity_type)
            .cloned()
            .ok_or(DisError::UnmappedEntityType(pdu.entity_type))?;
        let actor = UniqueId::new();
        state.entities_mut().add(pdu.entity_id, actor);
        match pdu.entity_type.entity_kind() {
            Some(kind) => log::info!(
                "New remote {kind:?} {} ({}) as {actor_type} {actor}",
                pdu.entity_id,
                pdu.entity_type
            ),
            None => log::info!(
                "New remote entity {} of unknown kind ({}) as {actor_type} {actor}",
                pdu.entity_id,
                pdu.entity_type
            ),
        }

        let name = if pdu.marking.is_empty() {
            pdu.entity_id.to_string()
        } else {
            pdu.marking.clone()
        };
        let message = Self::state_message(MessageKind::ActorCreated, actor, pdu)
            .with_actor_type(actor_type)
            .with_name(name)
            .with_value(params::ENTITY_TYPE, pdu.entity_type.to_string())
            .with_value(params::ENTITY_ID, pdu.entity_id.to_string());
        Ok(Some(message))
    }
}
