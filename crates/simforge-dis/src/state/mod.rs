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

//! State shared by every processor and adapter.

mod connection;
mod entities;
mod mapping;

pub use connection::ConnectionData;
pub use entities::ActiveEntityControl;
pub use mapping::ActorTypeMapping;

use crate::error::ConfigError;
use crate::types::{EntityType, SimulationAddress};
use serde::{Deserialize, Serialize};
use simforge_data::ActorTypeKey;
use std::fs;
use std::path::Path;

/// One line of the entity type table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Dotted entity type, e.g. `1.1.225.1`.
    pub entity_type: String,
    /// Actor type as `category.name`.
    pub actor_type: String,
}

/// The DIS configuration document.
///
/// ```ron
/// (
///     connection: (ip: "239.1.2.3", port: 3000, exercise_id: 1, site_id: 1, application_id: 1, mtu: 1500),
///     entity_mappings: [
///         (entity_type: "1.1.225", actor_type: "dis.Vehicle"),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisConfig {
    /// Connection settings.
    #[serde(default)]
    pub connection: ConnectionData,
    /// Entity type table.
    #[serde(default)]
    pub entity_mappings: Vec<MappingEntry>,
}

impl DisConfig {
    /// Parses a RON document.
    pub fn from_ron(input: &str) -> Result<Self, ConfigError> {
        ron::from_str(input).map_err(|e| ConfigError::Format(e.to_string()))
    }

    /// Reads a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&input)
    }
}

/// The lookup tables the bridge consults on every call.
#[derive(Debug, Clone)]
pub struct SharedState {
    connection: ConnectionData,
    mapping: ActorTypeMapping,
    entities: ActiveEntityControl,
}

impl SharedState {
    /// Creates a state with no mappings.
    pub fn new(connection: ConnectionData) -> Self {
        let entities = ActiveEntityControl::new(connection.address());
        Self {
            connection,
            mapping: ActorTypeMapping::new(),
            entities,
        }
    }

    /// Builds the state described by a configuration.
    pub fn from_config(config: DisConfig) -> Result<Self, ConfigError> {
        let mut state = Self::new(config.connection);
        for entry in config.entity_mappings {
            let entity_type: EntityType = entry
                .entity_type
                .parse()
                .map_err(|_| ConfigError::InvalidEntityType(entry.entity_type.clone()))?;
            let actor_type: ActorTypeKey = entry.actor_type.parse()?;
            if state.mapping.add(entity_type, actor_type).is_some() {
                return Err(ConfigError::DuplicateMapping(entity_type));
            }
        }
        log::info!(
            "DIS state for site {} application {} on exercise {} with {} type mappings",
            state.connection.site_id,
            state.connection.application_id,
            state.connection.exercise_id,
            state.mapping.len()
        );
        Ok(state)
    }

    /// Reads a configuration file and builds the state it describes.
    pub fn load_config(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_config(DisConfig::load(path)?)
    }

    /// Connection settings.
    pub fn connection(&self) -> &ConnectionData {
        &self.connection
    }

    /// The local simulation address.
    pub fn address(&self) -> SimulationAddress {
        self.connection.address()
    }

    /// The entity type table.
    pub fn mapping(&self) -> &ActorTypeMapping {
        &self.mapping
    }

    /// The entity type table, mutably.
    pub fn mapping_mut(&mut self) -> &mut ActorTypeMapping {
        &mut self.mapping
    }

    /// The entity id table.
    pub fn entities(&self) -> &ActiveEntityControl {
        &self.entities
    }

    /// The entity id table, mutably.
    pub fn entities_mut(&mut self) -> &mut ActiveEntityControl {
        &mut self.entities
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new(ConnectionData::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG: &str = r#"(
        connection: (ip: "10.0.0.255", port: 62040, exercise_id: 3, site_id: 7, application_id: 9, mtu: 1400),
        entity_mappings: [
            (entity_type: "1.1.225", actor_type: "dis.Vehicle"),
            (entity_type: "1", actor_type: "dis.Entity"),
        ],
    )"#;

    #[test]
    fn config_builds_state() {
        let state = SharedState::from_config(DisConfig::from_ron(CONFIG).unwrap()).unwrap();
        assert_eq!(state.connection().port, 62040);
        assert_eq!(state.address(), SimulationAddress::new(7, 9));
        assert_eq!(state.entities().address(), SimulationAddress::new(7, 9));
        assert_eq!(state.mapping().len(), 2);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = DisConfig::from_ron("(connection: (site_id: 4))").unwrap();
        assert_eq!(config.connection.site_id, 4);
        assert_eq!(config.connection.port, 3000);
        assert!(config.entity_mappings.is_empty());
    }

    #[test]
    fn invalid_entries_are_reported() {
        let bad_type = DisConfig {
            entity_mappings: vec![MappingEntry {
                entity_type: "1.x".to_owned(),
                actor_type: "dis.Entity".to_owned(),
            }],
            ..Default::default()
        };
        assert!(matches!(
            SharedState::from_config(bad_type),
            Err(ConfigError::InvalidEntityType(_))
        ));

        let bad_actor = DisConfig {
            entity_mappings: vec![MappingEntry {
                entity_type: "1".to_owned(),
                actor_type: "Entity".to_owned(),
            }],
            ..Default::default()
        };
        assert!(matches!(
            SharedState::from_config(bad_actor),
            Err(ConfigError::InvalidActorType(_))
        ));

        let twice = DisConfig {
            entity_mappings: vec![
                MappingEntry {
                    entity_type: "1.1".to_owned(),
                    actor_type: "dis.Entity".to_owned(),
                },
                MappingEntry {
                    entity_type: "1.1.0".to_owned(),
                    actor_type: "dis.Vehicle".to_owned(),
                },
            ],
            ..Default::default()
        };
        assert!(matches!(
            SharedState::from_config(twice),
            Err(ConfigError::DuplicateMapping(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();
        let state = SharedState::load_config(file.path()).unwrap();
        assert_eq!(state.connection().exercise_id, 3);

        assert!(matches!(
            SharedState::load_config(file.path().with_extension("missing")),
            Err(ConfigError::Io { .. })
        ));
        assert!(matches!(
            DisConfig::from_ron("(connection: 5)"),
            Err(ConfigError::Format(_))
        ));
    }
}
