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

//! PDU to message translation.

mod entity_state;
mod simulation_management;

pub use entity_state::EntityStateProcessor;
pub use simulation_management::{CreateEntityProcessor, RemoveEntityProcessor};

use crate::disposition::Disposition;
use crate::error::DisError;
use crate::pdu::{Pdu, PduType};
use crate::state::SharedState;
use simforge_core::EventBus;
use simforge_data::Message;
use std::collections::HashMap;

/// Translates one PDU type into messages.
pub trait PduProcessor: Send {
    /// Translates `pdu`, updating the shared tables as needed.
    ///
    /// `Ok(None)` means the PDU is not one this processor reads.
    fn process(&self, pdu: &Pdu, state: &mut SharedState) -> Result<Option<Message>, DisError>;
}

/// Dispatches received PDUs to their processor and publishes the results.
pub struct IncomingMessage {
    processors: HashMap<PduType, Box<dyn PduProcessor>>,
    bus: EventBus<Message>,
}

impl IncomingMessage {
    /// Creates a dispatcher with no processor.
    pub fn new() -> Self {
        Self {
            processors: HashMap::new(),
            bus: EventBus::new(),
        }
    }

    /// Installs the processor for a PDU type, returning the one it replaces.
    pub fn add_processor(
        &mut self,
        pdu_type: PduType,
        processor: Box<dyn PduProcessor>,
    ) -> Option<Box<dyn PduProcessor>> {
        let previous = self.processors.insert(pdu_type, processor);
        if previous.is_some() {
            log::debug!("Replaced the processor for {pdu_type}");
        }
        previous
    }

    /// Uninstalls the processor for a PDU type.
    pub fn remove_processor(&mut self, pdu_type: PduType) -> Option<Box<dyn PduProcessor>> {
        self.processors.remove(&pdu_type)
    }

    /// `true` if a processor handles this PDU type.
    pub fn has_processor(&self, pdu_type: PduType) -> bool {
        self.processors.contains_key(&pdu_type)
    }

    /// Translates one PDU and publishes the resulting message.
    ///
    /// PDUs of another exercise are unhandled.
    pub fn handle(&self, pdu: &Pdu, state: &mut SharedState) -> Disposition {
        let pdu_type = pdu.pdu_type();
        let exercise = pdu.header().exercise_id;
        if exercise != state.connection().exercise_id {
            log::trace!("Ignored {pdu_type} of exercise {exercise}");
            return Disposition::Unhandled;
        }
        let Some(processor) = self.processors.get(&pdu_type) else {
            log::trace!("No processor for {pdu_type}");
            return Disposition::Unhandled;
        };

        match processor.process(pdu, state) {
            Ok(Some(message)) => {
                log::debug!(
                    "{pdu_type} from {} became '{}' about {}",
                    pdu.subject(),
                    message.kind,
                    message.about_actor
                );
                self.bus.publish(message);
                Disposition::Forwarded
            }
            Ok(None) => Disposition::Unhandled,
            Err(err) => {
                log::warn!("Dropped {pdu_type} about entity {}: {err}", pdu.subject());
                Disposition::Dropped(err)
            }
        }
    }

    /// The receiving end of the message sink.
    pub fn messages(&self) -> &flume::Receiver<Message> {
        self.bus.receiver()
    }

    /// Takes every message published so far.
    pub fn drain(&self) -> Vec<Message> {
        self.bus.drain()
    }
}

impl Default for IncomingMessage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IncomingMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncomingMessage")
            .field("processors", &self.processors.keys().collect::<Vec<_>>())
            .field("queued", &self.bus.len())
            .finish()
    }
}
