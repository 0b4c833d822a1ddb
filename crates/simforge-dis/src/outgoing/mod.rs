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

//! Message to PDU translation.

mod entity_state;
mod simulation_management;

pub use entity_state::ActorUpdateToEntityState;
pub use simulation_management::{ActorCreatedToCreateEntity, ActorDeletedToRemoveEntity};

use crate::disposition::Disposition;
use crate::error::DisError;
use crate::pdu::Pdu;
use crate::state::SharedState;
use crate::types::EntityId;
use simforge_core::EventBus;
use simforge_data::{Message, MessageKind};
use std::collections::HashMap;

/// Translates one message kind into PDUs.
pub trait MessageToPacketAdapter: Send {
    /// Translates `message`, updating the shared tables as needed.
    ///
    /// `Ok(None)` means the message is not one this adapter reads.
    fn convert(&self, message: &Message, state: &mut SharedState) -> Result<Option<Pdu>, DisError>;
}

/// The entity id a local actor is published under.
///
/// Actors seen before keep their id. New ones get a local id when their
/// actor type maps to an entity type.
pub(crate) fn resolve_entity(message: &Message, state: &mut SharedState) -> Result<EntityId, DisError> {
    if let Some(entity) = state.entities().entity_for(&message.about_actor) {
        return Ok(entity);
    }
    let actor_type = message
        .actor_type
        .as_ref()
        .ok_or(DisError::MissingActorType(message.about_actor))?;
    if state.mapping().entity_type_for(actor_type).is_none() {
        return Err(DisError::UnmappedActorType(actor_type.clone()));
    }
    state.entities_mut().allocate_local(message.about_actor)
}

/// Dispatches messages to their adapter and publishes the resulting PDUs.
pub struct OutgoingMessage {
    adapters: HashMap<MessageKind, Box<dyn MessageToPacketAdapter>>,
    bus: EventBus<Pdu>,
}

impl OutgoingMessage {
    /// Creates a dispatcher with no adapter.
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
            bus: EventBus::new(),
        }
    }

    /// Installs the adapter for a message kind, returning the one it replaces.
    pub fn add_adapter(
        &mut self,
        kind: MessageKind,
        adapter: Box<dyn MessageToPacketAdapter>,
    ) -> Option<Box<dyn MessageToPacketAdapter>> {
        let previous = self.adapters.insert(kind.clone(), adapter);
        if previous.is_some() {
            log::debug!("Replaced the adapter for '{kind}'");
        }
        previous
    }

    /// Uninstalls the adapter for a message kind.
    pub fn remove_adapter(&mut self, kind: &MessageKind) -> Option<Box<dyn MessageToPacketAdapter>> {
        self.adapters.remove(kind)
    }

    /// `true` if an adapter handles this message kind.
    pub fn has_adapter(&self, kind: &MessageKind) -> bool {
        self.adapters.contains_key(kind)
    }

    /// Translates one message and publishes the resulting PDU.
    pub fn handle(&self, message: &Message, state: &mut SharedState) -> Disposition {
        let Some(adapter) = self.adapters.get(&message.kind) else {
            log::trace!("No adapter for '{}'", message.kind);
            return Disposition::Unhandled;
        };

        match adapter.convert(message, state) {
            Ok(Some(pdu)) => {
                log::debug!(
                    "'{}' about {} became {} for entity {}",
                    message.kind,
                    message.about_actor,
                    pdu.pdu_type(),
                    pdu.subject()
                );
                self.bus.publish(pdu);
                Disposition::Forwarded
            }
            Ok(None) => Disposition::Unhandled,
            Err(err) => {
                log::warn!(
                    "Dropped '{}' about actor {}: {err}",
                    message.kind,
                    message.about_actor
                );
                Disposition::Dropped(err)
            }
        }
    }

    /// The receiving end of the PDU sink.
    pub fn pdus(&self) -> &flume::Receiver<Pdu> {
        self.bus.receiver()
    }

    /// Takes every PDU published so far.
    pub fn drain(&self) -> Vec<Pdu> {
        self.bus.drain()
    }
}

impl Default for OutgoingMessage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OutgoingMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutgoingMessage")
            .field("adapters", &self.adapters.keys().collect::<Vec<_>>())
            .field("queued", &self.bus.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
