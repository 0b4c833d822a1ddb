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
use crate::pdu::Pdu;
use crate::state::SharedState;
use simforge_data::{Message, MessageKind};

/// Turns create entity requests about mapped entities into actor created
/// messages.
#[derive(Debug, Default)]
pub struct CreateEntityProcessor;

impl PduProcessor for CreateEntityProcessor {
    fn process(&self, pdu: &Pdu, state: &mut SharedState) -> Result<Option<Message>, DisError> {
        let Pdu::CreateEntity(pdu) = pdu else {
            return Ok(None);
        };
        let actor = state
            .entities()
            .actor_for(&pdu.receiving_id)
            .ok_or(DisError::UnmappedEntity(pdu.receiving_id))?;

        Ok(Some(
            Message::new(MessageKind::ActorCreated, actor)
                .with_source(params::SOURCE)
                .with_value(params::ENTITY_ID, pdu.receiving_id.to_string())
                .with_value(params::REQUEST_ID, i64::from(pdu.request_id)),
        ))
    }
}

/// Turns remove entity requests into actor deleted messages and forgets the
/// entity.
#[derive(Debug, Default)]
pub struct RemoveEntityProcessor;

impl PduProcessor for RemoveEntityProcessor {
    fn process(&self, pdu: &Pdu, state: &mut SharedState) -> Result<Option<Message>, DisError> {
        let Pdu::RemoveEntity(pdu) = pdu else {
            return Ok(None);
        };
        let actor = state
            .entities_mut()
            .remove_entity(&pdu.receiving_id)
            .ok_or(DisError::UnmappedEntity(pdu.receiving_id))?;
        log::info!("Entity {} removed, deleting actor {actor}", pdu.receiving_id);

        Ok(Some(
            Message::new(MessageKind::ActorDeleted, actor)
                .with_source(params::SOURCE)
                .with_value(params::ENTITY_ID, pdu.receiving_id.to_string())
                .with_value(params::REQUEST_ID, i64::from(pdu.request_id)),
        ))
    }
}
