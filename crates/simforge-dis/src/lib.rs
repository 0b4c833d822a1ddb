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

//! # Simforge DIS
//!
//! Bridges decoded DIS PDUs and engine [`Message`](simforge_data::Message)s.
//!
//! Incoming PDUs go through per-type [`PduProcessor`]s registered on an
//! [`IncomingMessage`]; outgoing messages go through per-kind
//! [`MessageToPacketAdapter`]s registered on an [`OutgoingMessage`]. Both
//! consult the [`SharedState`], which maps DIS entity ids to actor ids and
//! DIS entity types to actor types. [`DisPlugin`]s install the processors
//! and adapters; a [`DisComponent`] owns all of it and counts what it does.
//!
//! Packets are never silently lost: a PDU or message that cannot be
//! translated yields [`Disposition::Dropped`], is logged and is counted.

#![warn(missing_docs)]

pub mod component;
pub mod error;
pub mod incoming;
pub mod outgoing;
pub mod params;
pub mod pdu;
pub mod plugin;
pub mod state;
pub mod types;

mod disposition;

pub use component::DisComponent;
pub use disposition::Disposition;
pub use error::{ConfigError, DisError};
pub use incoming::{IncomingMessage, PduProcessor};
pub use outgoing::{MessageToPacketAdapter, OutgoingMessage};
pub use pdu::{CreateEntityPdu, EntityStatePdu, Pdu, PduHeader, PduType, RemoveEntityPdu};
pub use plugin::{DefaultDisPlugin, DisPlugin};
pub use state::{ActiveEntityControl, ActorTypeMapping, ConnectionData, DisConfig, SharedState};
pub use types::{DamageState, EntityId, EntityKind, EntityType, ForceId, SimulationAddress};

#[doc(hidden)]
pub mod __private {
    pub use simforge_core::export_plugin;
}
