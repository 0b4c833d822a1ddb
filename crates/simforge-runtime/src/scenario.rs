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

//! Scripted traffic standing in for a live network.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use simforge_core::math::{DVec3, Vec3};
use simforge_dis::{
    DamageState, DisConfig, EntityId, EntityStatePdu, EntityType, ForceId, Pdu, PduHeader,
    PduType, RemoveEntityPdu,
};
use std::fs;
use std::path::Path;

/// Exercise the built-in scenario runs on.
const EXERCISE: u8 = 1;
/// The remote simulation sending the built-in traffic.
const REMOTE_SITE: u16 = 42;
const REMOTE_APPLICATION: u16 = 7;

/// Decoded PDUs, replayed in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// The traffic.
    pub pdus: Vec<Pdu>,
}

impl Scenario {
    /// Parses a RON scenario.
    pub fn from_ron(input: &str) -> Result<Self> {
        ron::from_str(input).context("invalid scenario")
    }

    /// Reads a RON scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = fs::read_to_string(path)
            .with_context(|| format!("cannot read scenario {}", path.display()))?;
        Self::from_ron(&input)
    }

    /// Two remote tanks and a helicopter: the tanks advance, one is hit and
    /// destroyed, then removed. The helicopter's type is not mapped.
    pub fn builtin() -> Self {
        let tank = EntityType::new(1, 1, 225, 1, 1, 3, 0);
        let helicopter = EntityType::new(1, 2, 225, 20, 0, 0, 0);
        let lead = remote(1);
        let wing = remote(2);

        let mut pdus = Vec::new();
        for step in 0..3 {
            let offset = f64::from(step) * 10.0;
            pdus.push(state(lead, tank, "LEAD", DVec3::new(offset, 0.0, 0.0), DamageState::None));
            pdus.push(state(wing, tank, "WING", DVec3::new(offset, 25.0, 0.0), DamageState::None));
        }
        pdus.push(state(remote(3), helicopter, "HELO", DVec3::new(0.0, 0.0, 300.0), DamageState::None));
        pdus.push(state(wing, tank, "WING", DVec3::new(30.0, 25.0, 0.0), DamageState::Slight));
        pdus.push(state(wing, tank, "WING", DVec3::new(30.0, 25.0, 0.0), DamageState::Destroyed));
        pdus.push(Pdu::RemoveEntity(RemoveEntityPdu {
            header: PduHeader::new(PduType::RemoveEntity, EXERCISE),
            originating_id: remote(0),
            receiving_id: wing,
            request_id: 1,
        }));
        Self { pdus }
    }
}

fn remote(entity: u16) -> EntityId {
    EntityId::new(REMOTE_SITE, REMOTE_APPLICATION, entity)
}

fn state(
    id: EntityId,
    entity_type: EntityType,
    marking: &str,
    location: DVec3,
    damage: DamageState,
) -> Pdu {
    let mut pdu = EntityStatePdu::new(EXERCISE, id, entity_type);
    pdu.force_id = ForceId::Opposing;
    pdu.location = location;
    pdu.linear_velocity = Vec3::new(5.0, 0.0, 0.0);
    pdu.appearance = damage.apply_to_appearance(0);
    pdu.set_marking(marking);
    Pdu::EntityState(pdu)
}

/// The configuration used when none is given: ground platforms become
/// vehicles, anything else known to the stock actors becomes an entity.
pub const DEFAULT_CONFIG: &str = r#"(
    connection: (
        exercise_id: 1,
        site_id: 1,
        application_id: 1,
    ),
    entity_mappings: [
        (entity_type: "1.1", actor_type: "dis.Vehicle"),
        (entity_type: "1.3", actor_type: "dis.Entity"),
    ],
)"#;

/// Parses [`DEFAULT_CONFIG`].
pub fn default_config() -> Result<DisConfig> {
    DisConfig::from_ron(DEFAULT_CONFIG).context("invalid built-in DIS configuration")
}
