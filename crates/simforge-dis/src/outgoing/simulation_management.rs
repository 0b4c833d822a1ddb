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
use crate::pdu::{CreateEntityPdu, Pdu, PduHeader, PduType, RemoveEntityPdu};
use crate::state::SharedState;
use crate::types::EntityId;
use simforge_data::{Message, MessageKind};
use std::sync::atomic::{AtomicU32, Ordering};

fn originator(state: &SharedState) -> EntityId {
    let address = state.address();
    EntityId::new(address.site, address.application, EntityId::NO_ENTITY)
}

/// Requests creation of newly created local actors on the exercise.
///
/// Not installed by the default plugin, which publishes entity state
/// instead.
#[derive(Debug, Default)]
pub struct ActorCreatedToCreateEntity {
    next_request: AtomicU32,
}

impl MessageToPacketAdapter for ActorCreatedToCreateEntity {
    fn convert(&self, message: &Message, state: &mut SharedState) -> Result<Option<Pdu>, DisError> {
        if message.kind != MessageKind::ActorCreated || message.source == params::SOURCE {
            return Ok(None);
        }
        let receiving_id = resolve_entity(message, state)?;
        Ok(Some(Pdu::CreateEntity(CreateEntityPdu {
            header: PduHeader::new(PduType::CreateEntity, state.connection().exercise_id),
            originating_id: originator(state),
            receiving_id,
            request_id: self.next_request.fetch_add(1, Ordering::Relaxed),
        })))
    }
}

/// Announces the removal of deleted local actors and forgets their entity.
#[derive(Debug, Default)]
pub struct ActorDeletedToRemoveEntity {
    next_request: AtomicU32,
}

impl MessageToPacketAdapter for ActorDeletedToRemoveEntity {
    fn convert(&self, message: &Message, state: &mut SharedState) -> Result<Option<Pdu>, DisError> {
        if message.kind != MessageKind::ActorDeleted || message.source == params::SOURCE {
            return Ok(None);
        }
        let receiving_id = state
            .entities_mut()
            .remove_actor(&message.about_actor)
            .ok_or(DisError::UnmappedActor(message.about_actor))?;
        Ok(Some(Pdu::RemoveEntity(RemoveEntityPdu {
            header: PduHeader::new(PduType::RemoveEntity, state.connection().exercise_id),
            originating_id: originator(state),
            receiving_id,
            request_id: self.next_request.fetch_add(1, Ordering::Relaxed),
        })))
    }
}
