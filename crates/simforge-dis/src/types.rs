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

//! DIS value types.

use serde::{Deserialize, Serialize};
use simforge_data::property_enum;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A site/application pair identifying one simulation on the exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SimulationAddress {
    /// Site number.
    pub site: u16,
    /// Application number within the site.
    pub application: u16,
}

impl SimulationAddress {
    /// Creates an address.
    pub const fn new(site: u16, application: u16) -> Self {
        Self { site, application }
    }
}

impl fmt::Display for SimulationAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.site, self.application)
    }
}

/// Identifies one entity on the exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct EntityId {
    /// Site number.
    pub site: u16,
    /// Application number.
    pub application: u16,
    /// Entity number within the application.
    pub entity: u16,
}

impl EntityId {
    /// Entity number meaning "no entity".
    pub const NO_ENTITY: u16 = 0;
    /// Entity number meaning "every entity".
    pub const ALL_ENTITIES: u16 = 0xFFFF;

    /// Creates an id.
    pub const fn new(site: u16, application: u16, entity: u16) -> Self {
        Self {
            site,
            application,
            entity,
        }
    }

    /// The simulation that owns the entity.
    pub fn address(&self) -> SimulationAddress {
        SimulationAddress::new(self.site, self.application)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.site, self.application, self.entity)
    }
}

/// The seven-field DIS entity type.
///
/// Written as dotted fields, kind first (`1.1.225.1.1.3.0`). Zero fields act
/// as wildcards when matching, see [`EntityType::rank_match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityType {
    /// Entity kind, see [`EntityKind`].
    pub kind: u8,
    /// Domain.
    pub domain: u8,
    /// Country code.
    pub country: u16,
    /// Category.
    pub category: u8,
    /// Subcategory.
    pub subcategory: u8,
    /// Specific.
    pub specific: u8,
    /// Extra.
    pub extra: u8,
}

impl EntityType {
    /// Creates an entity type.
    pub const fn new(
        kind: u8,
        domain: u8,
        country: u16,
        category: u8,
        subcategory: u8,
        specific: u8,
        extra: u8,
    ) -> Self {
        Self {
            kind,
            domain,
            country,
            category,
            subcategory,
            specific,
            extra,
        }
    }

    fn fields(&self) -> [u16; 7] {
        [
            self.kind as u16,
            self.domain as u16,
            self.country,
            self.category as u16,
            self.subcategory as u16,
            self.specific as u16,
            self.extra as u16,
        ]
    }

    /// The kind field as an [`EntityKind`], `None` for values outside the enumeration.
    pub fn entity_kind(&self) -> Option<EntityKind> {
        EntityKind::from_u8(self.kind)
    }

    /// Scores how well `other` matches this type.
    ///
    /// Each equal field scores one. A field that differs while non-zero on
    /// both sides rules the match out. Seven means identical.
    pub fn rank_match(&self, other: &EntityType) -> Option<u8> {
        let mut rank = 0;
        for (a, b) in self.fields().into_iter().zip(other.fields()) {
            if a == b {
                rank += 1;
            } else if a != 0 && b != 0 {
                return None;
            }
        }
        Some(rank)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}.{}.{}.{}",
            self.kind,
            self.domain,
            self.country,
            self.category,
            self.subcategory,
            self.specific,
            self.extra
        )
    }
}

/// A string that is not a dotted entity type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not an entity type, expected 1 to 7 dot separated numbers")]
pub struct ParseEntityTypeError(pub String);

impl FromStr for EntityType {
    type Err = ParseEntityTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = || ParseEntityTypeError(s.to_owned());
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.is_empty() || parts.len() > 7 {
            return Err(fail());
        }

        let mut fields = [0u16; 7];
        for (slot, part) in fields.iter_mut().zip(&parts) {
            *slot = part.trim().parse().map_err(|_| fail())?;
        }
        let byte = |v: u16| u8::try_from(v).map_err(|_| fail());

        Ok(Self {
            kind: byte(fields[0])?,
            domain: byte(fields[1])?,
            country: fields[2],
            category: byte(fields[3])?,
            subcategory: byte(fields[4])?,
            specific: byte(fields[5])?,
            extra: byte(fields[6])?,
        })
    }
}

impl TryFrom<String> for EntityType {
    type Error = ParseEntityTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityType> for String {
    fn from(value: EntityType) -> Self {
        value.to_string()
    }
}

/// DIS entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityKind {
    /// Other.
    Other = 0,
    /// Platform.
    Platform = 1,
    /// Munition.
    Munition = 2,
    /// Life form.
    LifeForm = 3,
    /// Environmental.
    Environmental = 4,
    /// Cultural feature.
    CulturalFeature = 5,
    /// Supply.
    Supply = 6,
    /// Radio.
    Radio = 7,
    /// Expendable.
    Expendable = 8,
    /// Sensor or emitter.
    SensorEmitter = 9,
}

impl EntityKind {
    /// Maps the numeric kind; unknown values are `None`.
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => EntityKind::Other,
            1 => EntityKind::Platform,
            2 => EntityKind::Munition,
            3 => EntityKind::LifeForm,
            4 => EntityKind::Environmental,
            5 => EntityKind::CulturalFeature,
            6 => EntityKind::Supply,
            7 => EntityKind::Radio,
            8 => EntityKind::Expendable,
            9 => EntityKind::SensorEmitter,
            _ => return None,
        })
    }
}

/// DIS force identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ForceId {
    /// Other.
    #[default]
    Other = 0,
    /// Friendly.
    Friendly = 1,
    /// Opposing.
    Opposing = 2,
    /// Neutral.
    Neutral = 3,
}

property_enum!(ForceId {
    Other => "OTHER",
    Friendly => "FRIENDLY",
    Opposing => "OPPOSING",
    Neutral => "NEUTRAL",
});

impl ForceId {
    /// Maps the numeric force; unknown values become `Other`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => ForceId::Friendly,
            2 => ForceId::Opposing,
            3 => ForceId::Neutral,
            _ => ForceId::Other,
        }
    }
}

/// Damage states carried in bits 3 and 4 of the appearance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum DamageState {
    /// No damage.
    #[default]
    None = 0,
    /// Slight damage.
    Slight = 1,
    /// Moderate damage.
    Moderate = 2,
    /// Destroyed.
    Destroyed = 3,
}

property_enum!(DamageState {
    None => "No Damage",
    Slight => "Slight Damage",
    Moderate => "Moderate Damage",
    Destroyed => "Destroyed",
});

impl DamageState {
    const SHIFT: u32 = 3;
    const MASK: u32 = 0b11 << Self::SHIFT;

    /// Reads the damage bits of an appearance record.
    pub fn from_appearance(appearance: u32) -> Self {
        match (appearance & Self::MASK) >> Self::SHIFT {
            1 => DamageState::Slight,
            2 => DamageState::Moderate,
            3 => DamageState::Destroyed,
            _ => DamageState::None,
        }
    }

    /// Writes the damage bits into an appearance record.
    pub fn apply_to_appearance(self, appearance: u32) -> u32 {
        (appearance & !Self::MASK) | ((self as u32) << Self::SHIFT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simforge_data::property::PropertyEnum;

    #[test]
    fn entity_type_parses_partial_strings() {
        let full: EntityType = "1.1.225.1.1.3.0".parse().unwrap();
        assert_eq!(full, EntityType::new(1, 1, 225, 1, 1, 3, 0));
        assert_eq!(full.to_string(), "1.1.225.1.1.3.0");

        let partial: EntityType = "1.2".parse().unwrap();
        assert_eq!(partial, EntityType::new(1, 2, 0, 0, 0, 0, 0));

        assert!("1.2.3.4.5.6.7.8".parse::<EntityType>().is_err());
        assert!("1.x".parse::<EntityType>().is_err());
        assert!("300".parse::<EntityType>().is_err());
        assert!("".parse::<EntityType>().is_err());
    }

    #[test]
    fn rank_match_treats_zero_as_wildcard() {
        let tank = EntityType::new(1, 1, 225, 1, 1, 3, 0);
        assert_eq!(tank.rank_match(&tank), Some(7));

        let any_land_platform = EntityType::new(1, 1, 0, 0, 0, 0, 0);
        assert_eq!(any_land_platform.rank_match(&tank), Some(3));

        let air = EntityType::new(1, 2, 0, 0, 0, 0, 0);
        assert_eq!(air.rank_match(&tank), None);
    }

    #[test]
    fn entity_id_display() {
        assert_eq!(EntityId::new(1, 2, 3).to_string(), "1:2:3");
        assert_eq!(EntityId::new(1, 2, 3).address(), SimulationAddress::new(1, 2));
        assert_eq!(SimulationAddress::new(1, 2).to_string(), "1:2");
    }

    #[test]
    fn damage_bits_round_trip() {
        let appearance = 0b1000_0001;
        let destroyed = DamageState::Destroyed.apply_to_appearance(appearance);
        assert_eq!(DamageState::from_appearance(destroyed), DamageState::Destroyed);
        assert_eq!(destroyed & !0b11000, appearance);
        assert_eq!(DamageState::from_appearance(0), DamageState::None);
    }

    #[test]
    fn enums_expose_names() {
        assert_eq!(ForceId::Opposing.name(), "OPPOSING");
        assert_eq!(DamageState::from_name("Destroyed"), Some(DamageState::Destroyed));
        assert_eq!(ForceId::from_u8(9), ForceId::Other);
        assert_eq!(EntityKind::from_u8(7), Some(EntityKind::Radio));
        assert_eq!(EntityKind::from_u8(42), None);
        assert_eq!(EntityType::new(3, 1, 0, 0, 0, 0, 0).entity_kind(), Some(EntityKind::LifeForm));
        assert_eq!(EntityType::new(12, 0, 0, 0, 0, 0, 0).entity_kind(), None);
    }
}
