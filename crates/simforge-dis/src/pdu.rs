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

//! Decoded PDUs.
//!
//! Only the fields the bridge reads or writes are modelled. Byte level
//! encoding belongs to the transport.

use crate::types::{EntityId, EntityType, ForceId};
use serde::{Deserialize, Serialize};
use simforge_core::math::{DVec3, Vec3};
use std::fmt;

/// DIS protocol version 6 (IEEE 1278.1a-1998).
pub const PROTOCOL_VERSION: u8 = 6;

/// Longest marking an entity state PDU carries.
pub const MARKING_LENGTH: usize = 11;

/// The PDU types the bridge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PduType {
    /// Entity state.
    EntityState = 1,
    /// Create entity.
    CreateEntity = 11,
    /// Remove entity.
    RemoveEntity = 12,
}

impl PduType {
    /// Maps the numeric type; unsupported values are `None`.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(PduType::EntityState),
            11 => Some(PduType::CreateEntity),
            12 => Some(PduType::RemoveEntity),
            _ => None,
        }
    }
}

impl fmt::Display for PduType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PduType::EntityState => "EntityState",
            PduType::CreateEntity => "CreateEntity",
            PduType::RemoveEntity => "RemoveEntity",
        };
        write!(f, "{name}({})", *self as u8)
    }
}

/// Fields common to every PDU.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PduHeader {
    /// Protocol version.
    pub protocol_version: u8,
    /// Exercise the PDU belongs to.
    pub exercise_id: u8,
    /// The PDU type.
    pub pdu_type: PduType,
    /// DIS timestamp.
    pub timestamp: u32,
}

impl PduHeader {
    /// A header for the current protocol version.
    pub fn new(pdu_type: PduType, exercise_id: u8) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            exercise_id,
            pdu_type,
            timestamp: 0,
        }
    }
}

/// The state of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStatePdu {
    /// Header.
    pub header: PduHeader,
    /// The entity.
    pub entity_id: EntityId,
    /// The entity's force.
    pub force_id: ForceId,
    /// The entity's type.
    pub entity_type: EntityType,
    /// Geocentric location in metres.
    pub location: DVec3,
    /// Euler angles (psi, theta, phi) in radians.
    pub orientation: Vec3,
    /// Linear velocity in metres per second.
    pub linear_velocity: Vec3,
    /// Appearance bit field.
    pub appearance: u32,
    /// Marking text, at most [`MARKING_LENGTH`] characters.
    pub marking: String,
}

impl EntityStatePdu {
    /// A state PDU with every field zeroed.
    pub fn new(exercise_id: u8, entity_id: EntityId, entity_type: EntityType) -> Self {
        Self {
            header: PduHeader::new(PduType::EntityState, exercise_id),
            entity_id,
            force_id: ForceId::Other,
            entity_type,
            location: DVec3::ZERO,
            orientation: Vec3::ZERO,
            linear_velocity: Vec3::ZERO,
            appearance: 0,
            marking: String::new(),
        }
    }

    /// Sets the marking, truncated to [`MARKING_LENGTH`] characters.
    pub fn set_marking(&mut self, marking: &str) {
        self.marking = marking.chars().take(MARKING_LENGTH).collect();
    }
}

/// A request that the receiving simulation create an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEntityPdu {
    /// Header.
    pub header: PduHeader,
    /// The requesting simulation's entity.
    pub originating_id: EntityId,
    /// The entity to create.
    pub receiving_id: EntityId,
    /// Correlates the request with its acknowledgement.
    pub request_id: u32,
}

/// A request that the receiving simulation remove an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveEntityPdu {
    /// Header.
    pub header: PduHeader,
    /// The requesting simulation's entity.
    pub originating_id: EntityId,
    /// The entity to remove.
    pub receiving_id: EntityId,
    /// Correlates the request with its acknowledgement.
    pub request_id: u32,
}

/// Any PDU the bridge understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pdu {
    /// Entity state.
    EntityState(EntityStatePdu),
    /// Create entity.
    CreateEntity(CreateEntityPdu),
    /// Remove entity.
    RemoveEntity(RemoveEntityPdu),
}

impl Pdu {
    /// The PDU's header.
    pub fn header(&self) -> &PduHeader {
        match self {
            Pdu::EntityState(p) => &p.header,
            Pdu::CreateEntity(p) => &p.header,
            Pdu::RemoveEntity(p) => &p.header,
        }
    }

    /// The PDU's type.
    pub fn pdu_type(&self) -> PduType {
        match self {
            Pdu::EntityState(_) => PduType::EntityState,
            Pdu::CreateEntity(_) => PduType::CreateEntity,
            Pdu::RemoveEntity(_) => PduType::RemoveEntity,
        }
    }

    /// The entity the PDU is about.
    pub fn subject(&self) -> EntityId {
        match self {
            Pdu::EntityState(p) => p.entity_id,
            Pdu::CreateEntity(p) => p.receiving_id,
            Pdu::RemoveEntity(p) => p.receiving_id,
        }
    }
}
