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

//! DIS plugins install processors and adapters on a component.

use crate::incoming::{
    CreateEntityProcessor, EntityStateProcessor, IncomingMessage, RemoveEntityProcessor,
};
use crate::outgoing::{ActorDeletedToRemoveEntity, ActorUpdateToEntityState, OutgoingMessage};
use crate::pdu::PduType;
use crate::state::SharedState;
use simforge_data::MessageKind;

/// Symbol of the function a dynamic DIS module exports to create its plugin.
pub const CREATE_COMPONENT_SYMBOL: &str = "create_component";
/// Symbol of the function that takes the plugin back.
pub const DESTROY_COMPONENT_SYMBOL: &str = "destroy_component";

/// Extends a [`DisComponent`](crate::DisComponent) with processors and adapters.
pub trait DisPlugin: Send {
    /// Unique plugin name.
    fn name(&self) -> &str;

    /// Installs the plugin's processors and adapters.
    fn start(
        &mut self,
        incoming: &mut IncomingMessage,
        outgoing: &mut OutgoingMessage,
        state: &mut SharedState,
    );

    /// Removes everything `start` installed.
    fn finish(&mut self, incoming: &mut IncomingMessage, outgoing: &mut OutgoingMessage);
}

/// Handles entity state, create entity and remove entity in both directions.
#[derive(Debug, Default)]
pub struct DefaultDisPlugin;

impl DefaultDisPlugin {
    const INCOMING: [PduType; 3] = [
        PduType::EntityState,
        PduType::CreateEntity,
        PduType::RemoveEntity,
    ];

    fn outgoing_kinds() -> [MessageKind; 3] {
        [
            MessageKind::ActorCreated,
            MessageKind::ActorUpdated,
            MessageKind::ActorDeleted,
        ]
    }
}

impl DisPlugin for DefaultDisPlugin {
    fn name(&self) -> &str {
        "default"
    }

    fn start(
        &mut self,
        incoming: &mut IncomingMessage,
        outgoing: &mut OutgoingMessage,
        _state: &mut SharedState,
    ) {
        incoming.add_processor(PduType::EntityState, Box::new(EntityStateProcessor));
        incoming.add_processor(PduType::CreateEntity, Box::new(CreateEntityProcessor));
        incoming.add_processor(PduType::RemoveEntity, Box::new(RemoveEntityProcessor));

        outgoing.add_adapter(MessageKind::ActorCreated, Box::new(ActorUpdateToEntityState));
        outgoing.add_adapter(MessageKind::ActorUpdated, Box::new(ActorUpdateToEntityState));
        outgoing.add_adapter(
            MessageKind::ActorDeleted,
            Box::new(ActorDeletedToRemoveEntity::default()),
        );
    }

    fn finish(&mut self, incoming: &mut IncomingMessage, outgoing: &mut OutgoingMessage) {
        for pdu_type in Self::INCOMING {
            incoming.remove_processor(pdu_type);
        }
        for kind in Self::outgoing_kinds() {
            outgoing.remove_adapter(&kind);
        }
    }
}

/// Exports a DIS plugin from a `cdylib` so
/// [`DisComponent::load_plugin`](crate::DisComponent::load_plugin) can find it.
///
/// ```ignore
/// simforge_dis::export_dis_plugin!(MyPlugin::default());
/// ```
#[macro_export]
macro_rules! export_dis_plugin {
    ($ctor:expr) => {
        $crate::__private::export_plugin!(
            create_component,
            destroy_component,
            dyn $crate::plugin::DisPlugin,
            $ctor
        );
    };
}
