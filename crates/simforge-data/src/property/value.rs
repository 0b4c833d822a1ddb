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

//! The closed set of property value kinds.

use crate::error::PropertyError;
use serde::{Deserialize, Serialize};
use simforge_core::math::{Color, DVec3, Vec2, Vec3, Vec4};
use simforge_core::UniqueId;
use std::fmt;

/// The runtime type tag of a property or message parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// `bool`
    Bool,
    /// `i32`
    Int,
    /// `i64`
    Long,
    /// `f32`
    Float,
    /// `f64`
    Double,
    /// `String`
    String,
    /// One name out of a fixed list, see [`PropertyEnum`].
    Enumeration,
    /// [`Vec2`]
    Vec2,
    /// [`Vec3`]
    Vec3,
    /// [`Vec4`]
    Vec4,
    /// [`DVec3`]
    DVec3,
    /// [`Color`]
    RgbaColor,
    /// A reference to another actor by [`UniqueId`].
    ActorId,
}

impl DataType {
    /// Every data type, in declaration order.
    pub const ALL: [DataType; 13] = [
        DataType::Bool,
        DataType::Int,
        DataType::Long,
        DataType::Float,
        DataType::Double,
        DataType::String,
        DataType::Enumeration,
        DataType::Vec2,
        DataType::Vec3,
        DataType::Vec4,
        DataType::DVec3,
        DataType::RgbaColor,
        DataType::ActorId,
    ];

    /// The display name of the type.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Bool => "Boolean",
            DataType::Int => "Integer",
            DataType::Long => "Long Integer",
            DataType::Float => "Float",
            DataType::Double => "Double",
            DataType::String => "String",
            DataType::Enumeration => "Enumeration",
            DataType::Vec2 => "Vec2",
            DataType::Vec3 => "Vec3",
            DataType::Vec4 => "Vec4",
            DataType::DVec3 => "Vec3d",
            DataType::RgbaColor => "RGBA Color",
            DataType::ActorId => "Actor ID",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A property value: one variant per [`DataType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// A boolean.
    Bool(bool),
    /// A 32-bit integer.
    Int(i32),
    /// A 64-bit integer.
    Long(i64),
    /// A single precision float.
    Float(f32),
    /// A double precision float.
    Double(f64),
    /// A string.
    String(String),
    /// The name of an enumeration variant.
    Enumeration(String),
    /// A 2D vector.
    Vec2(Vec2),
    /// A 3D vector.
    Vec3(Vec3),
    /// A 4D vector.
    Vec4(Vec4),
    /// A double precision 3D vector.
    DVec3(DVec3),
    /// An RGBA colour.
    RgbaColor(Color),
    /// An actor reference; nil means none.
    ActorId(UniqueId),
}

impl PropertyValue {
    /// The type tag of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            PropertyValue::Bool(_) => DataType::Bool,
            PropertyValue::Int(_) => DataType::Int,
            PropertyValue::Long(_) => DataType::Long,
            PropertyValue::Float(_) => DataType::Float,
            PropertyValue::Double(_) => DataType::Double,
            PropertyValue::String(_) => DataType::String,
            PropertyValue::Enumeration(_) => DataType::Enumeration,
            PropertyValue::Vec2(_) => DataType::Vec2,
            PropertyValue::Vec3(_) => DataType::Vec3,
            PropertyValue::Vec4(_) => DataType::Vec4,
            PropertyValue::DVec3(_) => DataType::DVec3,
            PropertyValue::RgbaColor(_) => DataType::RgbaColor,
            PropertyValue::ActorId(_) => DataType::ActorId,
        }
    }

    /// The zero value of a data type.
    pub fn default_for(data_type: DataType) -> Self {
        match data_type {
            DataType::Bool => PropertyValue::Bool(false),
            DataType::Int => PropertyValue::Int(0),
            DataType::Long => PropertyValue::Long(0),
            DataType::Float => PropertyValue::Float(0.0),
            DataType::Double => PropertyValue::Double(0.0),
            DataType::String => PropertyValue::String(String::new()),
            DataType::Enumeration => PropertyValue::Enumeration(String::new()),
            DataType::Vec2 => PropertyValue::Vec2(Vec2::ZERO),
            DataType::Vec3 => PropertyValue::Vec3(Vec3::ZERO),
            DataType::Vec4 => PropertyValue::Vec4(Vec4::ZERO),
            DataType::DVec3 => PropertyValue::DVec3(DVec3::ZERO),
            DataType::RgbaColor => PropertyValue::RgbaColor(Color::default()),
            DataType::ActorId => PropertyValue::ActorId(UniqueId::nil()),
        }
    }

    /// The string form used in actor maps.
    ///
    /// Vector components are separated by single spaces; the nil actor id is
    /// the empty string. [`PropertyValue::parse`] reads this form back.
    pub fn to_string_repr(&self) -> String {
        match self {
            PropertyValue::Bool(v) => v.to_string(),
            PropertyValue::Int(v) => v.to_string(),
            PropertyValue::Long(v) => v.to_string(),
            PropertyValue::Float(v) => v.to_string(),
            PropertyValue::Double(v) => v.to_string(),
            PropertyValue::String(v) | PropertyValue::Enumeration(v) => v.clone(),
            PropertyValue::Vec2(v) => join(&v.to_array()),
            PropertyValue::Vec3(v) => join(&v.to_array()),
            PropertyValue::Vec4(v) => join(&v.to_array()),
            PropertyValue::DVec3(v) => join(&v.to_array()),
            PropertyValue::RgbaColor(c) => join(&[c.r, c.g, c.b, c.a]),
            PropertyValue::ActorId(id) if id.is_nil() => String::new(),
            PropertyValue::ActorId(id) => id.to_string(),
        }
    }

    /// Parses the string form of a value of the given type.
    pub fn parse(data_type: DataType, input: &str) -> Result<Self, PropertyError> {
        let fail = || PropertyError::Parse {
            data_type,
            input: input.to_owned(),
        };
        let trimmed = input.trim();

        let value = match data_type {
            DataType::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" => PropertyValue::Bool(true),
                "false" | "0" => PropertyValue::Bool(false),
                _ => return Err(fail()),
            },
            DataType::Int => PropertyValue::Int(trimmed.parse().map_err(|_| fail())?),
            DataType::Long => PropertyValue::Long(trimmed.parse().map_err(|_| fail())?),
            DataType::Float => PropertyValue::Float(trimmed.parse().map_err(|_| fail())?),
            DataType::Double => PropertyValue::Double(trimmed.parse().map_err(|_| fail())?),
            DataType::String => PropertyValue::String(input.to_owned()),
            DataType::Enumeration => PropertyValue::Enumeration(trimmed.to_owned()),
            DataType::Vec2 => {
                let [x, y] = components::<f32, 2>(trimmed).ok_or_else(fail)?;
                PropertyValue::Vec2(Vec2::new(x, y))
            }
            DataType::Vec3 => {
                let [x, y, z] = components::<f32, 3>(trimmed).ok_or_else(fail)?;
                PropertyValue::Vec3(Vec3::new(x, y, z))
            }
            DataType::Vec4 => {
                let [x, y, z, w] = components::<f32, 4>(trimmed).ok_or_else(fail)?;
                PropertyValue::Vec4(Vec4::new(x, y, z, w))
            }
            DataType::DVec3 => {
                let [x, y, z] = components::<f64, 3>(trimmed).ok_or_else(fail)?;
                PropertyValue::DVec3(DVec3::new(x, y, z))
            }
            DataType::RgbaColor => {
                let [r, g, b, a] = components::<f32, 4>(trimmed).ok_or_else(fail)?;
                PropertyValue::RgbaColor(Color::rgba(r, g, b, a))
            }
            DataType::ActorId => {
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
                    PropertyValue::ActorId(UniqueId::nil())
                } else {
                    PropertyValue::ActorId(trimmed.parse().map_err(|_| fail())?)
                }
            }
        };
        Ok(value)
    }
}

fn join<T: ToString>(parts: &[T]) -> String {
    parts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn components<T: std::str::FromStr + Copy + Default, const N: usize>(input: &str) -> Option<[T; N]> {
    let mut out = [T::default(); N];
    let mut parts = input.split_whitespace();
    for slot in out.iter_mut() {
        *slot = parts.next()?.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

/// Binds a Rust type to its [`DataType`].
///
/// Typed property constructors use this so a getter/setter pair is checked at
/// compile time, and only the type-erased boundary checks tags at runtime.
pub trait PropertyType: Sized + 'static {
    /// The tag values of this type carry.
    const DATA_TYPE: DataType;

    /// Wraps the value.
    fn into_value(self) -> PropertyValue;

    /// Unwraps a value of the right tag, or hands the value back.
    fn from_value(value: PropertyValue) -> Result<Self, PropertyValue>;
}

macro_rules! impl_property_type {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl PropertyType for $ty {
                const DATA_TYPE: DataType = DataType::$variant;

                fn into_value(self) -> PropertyValue {
                    PropertyValue::$variant(self)
                }

                fn from_value(value: PropertyValue) -> Result<Self, PropertyValue> {
                    match value {
                        PropertyValue::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )+
    };
}

impl_property_type! {
    bool => Bool,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    DVec3 => DVec3,
    Color => RgbaColor,
    UniqueId => ActorId,
}

/// A Rust enum exposed as an enumeration property.
///
/// Implement it with [`property_enum!`](crate::property_enum).
pub trait PropertyEnum: Sized + Copy + 'static {
    /// The display names of every variant.
    fn variants() -> &'static [&'static str];

    /// The display name of this variant.
    fn name(&self) -> &'static str;

    /// Looks a variant up by display name.
    fn from_name(name: &str) -> Option<Self>;
}

/// Implements [`PropertyEnum`] for a fieldless enum.
///
/// ```
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Damage { None, Destroyed }
///
/// simforge_data::property_enum!(Damage {
///     None => "No Damage",
///     Destroyed => "Destroyed",
/// });
///
/// use simforge_data::property::PropertyEnum;
/// assert_eq!(Damage::from_name("Destroyed"), Some(Damage::Destroyed));
/// assert_eq!(Damage::None.name(), "No Damage");
/// ```
#[macro_export]
macro_rules! property_enum {
    ($ty:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $crate::property::PropertyEnum for $ty {
            fn variants() -> &'static [&'static str] {
                &[$($label),+]
            }

            fn name(&self) -> &'static str {
                match self {
                    $($ty::$variant => $label),+
                }
            }

            fn from_name(name: &str) -> ::std::option::Option<Self> {
                match name {
                    $($label => ::std::option::Option::Some($ty::$variant),)+
                    _ => ::std::option::Option::None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_default_has_its_own_tag() {
        for data_type in DataType::ALL {
            assert_eq!(PropertyValue::default_for(data_type).data_type(), data_type);
        }
    }

    #[test]
    fn string_form_of_vectors_is_space_separated() {
        let v = PropertyValue::Vec3(Vec3::new(1.5, -2.0, 0.25));
        assert_eq!(v.to_string_repr(), "1.5 -2 0.25");
        assert_eq!(PropertyValue::parse(DataType::Vec3, "1.5 -2 0.25").unwrap(), v);
    }

    #[test]
    fn parse_rejects_wrong_component_counts() {
        assert!(PropertyValue::parse(DataType::Vec3, "1 2").is_err());
        assert!(PropertyValue::parse(DataType::Vec2, "1 2 3").is_err());
        assert!(PropertyValue::parse(DataType::RgbaColor, "1 1 1 x").is_err());
    }

    #[test]
    fn parse_booleans_leniently() {
        assert_eq!(
            PropertyValue::parse(DataType::Bool, "TRUE").unwrap(),
            PropertyValue::Bool(true)
        );
        assert_eq!(
            PropertyValue::parse(DataType::Bool, "0").unwrap(),
            PropertyValue::Bool(false)
        );
        let err = PropertyValue::parse(DataType::Bool, "maybe").unwrap_err();
        assert_eq!(
            err,
            PropertyError::Parse {
                data_type: DataType::Bool,
                input: "maybe".to_owned()
            }
        );
    }

    #[test]
    fn nil_actor_id_is_empty_string() {
        let nil = PropertyValue::ActorId(UniqueId::nil());
        assert_eq!(nil.to_string_repr(), "");
        assert_eq!(PropertyValue::parse(DataType::ActorId, "NULL").unwrap(), nil);

        let id = UniqueId::new();
        let value = PropertyValue::ActorId(id);
        assert_eq!(
            PropertyValue::parse(DataType::ActorId, &value.to_string_repr()).unwrap(),
            value
        );
    }

    #[test]
    fn doubles_keep_full_precision() {
        let v = PropertyValue::DVec3(DVec3::new(6_378_137.123_456_789, -0.1, 1e-12));
        assert_eq!(PropertyValue::parse(DataType::DVec3, &v.to_string_repr()).unwrap(), v);
    }

    #[test]
    fn typed_unwrap_hands_back_mismatches() {
        assert_eq!(f32::from_value(PropertyValue::Float(2.0)), Ok(2.0));
        assert_eq!(
            f32::from_value(PropertyValue::Int(2)),
            Err(PropertyValue::Int(2))
        );
        assert_eq!(<String as PropertyType>::DATA_TYPE, DataType::String);
    }
}
