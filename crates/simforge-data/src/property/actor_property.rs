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

use super::value::{DataType, PropertyEnum, PropertyType, PropertyValue};
use crate::error::PropertyError;
use serde::Serialize;

type Getter<A> = Box<dyn Fn(&A) -> PropertyValue + Send + Sync>;
type Setter<A> = Box<dyn Fn(&str, &mut A, PropertyValue) -> Result<(), PropertyError> + Send + Sync>;

/// Static description of a property, independent of any actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyInfo {
    /// Unique name within the actor's property map.
    pub name: String,
    /// Human readable label.
    pub label: String,
    /// Longer description for tooling.
    pub description: String,
    /// Grouping used by editors and map files.
    pub group: String,
    /// Type tag of the values this property accepts and returns.
    pub data_type: DataType,
    /// `true` if the property has no setter.
    pub read_only: bool,
    /// Variant names of an enumeration property, empty otherwise.
    pub enum_values: &'static [&'static str],
}

/// A named, typed accessor bound to an actor type `A`.
///
/// The getter and setter are invoked with the actor the owning proxy holds;
/// a property never stores a reference to an actor.
pub struct ActorProperty<A> {
    info: PropertyInfo,
    getter: Getter<A>,
    setter: Option<Setter<A>>,
}

impl<A: 'static> ActorProperty<A> {
    fn with_accessors(
        name: impl Into<String>,
        label: impl Into<String>,
        data_type: DataType,
        getter: Getter<A>,
        setter: Option<Setter<A>>,
    ) -> Self {
        Self {
            info: PropertyInfo {
                name: name.into(),
                label: label.into(),
                description: String::new(),
                group: String::new(),
                data_type,
                read_only: setter.is_none(),
                enum_values: &[],
            },
            getter,
            setter,
        }
    }

    /// A read/write property over a typed getter and setter.
    pub fn new<T: PropertyType>(
        name: impl Into<String>,
        label: impl Into<String>,
        get: impl Fn(&A) -> T + Send + Sync + 'static,
        set: impl Fn(&mut A, T) + Send + Sync + 'static,
    ) -> Self {
        Self::validated(name, label, get, move |actor: &mut A, value: T| {
            set(actor, value);
            Ok(())
        })
    }

    /// A read/write property whose setter may refuse a value.
    ///
    /// A refusal surfaces as [`PropertyError::Rejected`] and leaves the
    /// actor untouched.
    pub fn validated<T: PropertyType>(
        name: impl Into<String>,
        label: impl Into<String>,
        get: impl Fn(&A) -> T + Send + Sync + 'static,
        set: impl Fn(&mut A, T) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        let setter: Setter<A> = Box::new(move |property, actor, value| {
            let typed = T::from_value(value).map_err(|other| PropertyError::TypeMismatch {
                property: property.to_owned(),
                expected: T::DATA_TYPE,
                found: other.data_type(),
            })?;
            set(actor, typed).map_err(|reason| PropertyError::Rejected {
                property: property.to_owned(),
                reason,
            })
        });
        Self::with_accessors(
            name,
            label,
            T::DATA_TYPE,
            Box::new(move |actor| get(actor).into_value()),
            Some(setter),
        )
    }

    /// A property without a setter.
    pub fn read_only<T: PropertyType>(
        name: impl Into<String>,
        label: impl Into<String>,
        get: impl Fn(&A) -> T + Send + Sync + 'static,
    ) -> Self {
        Self::with_accessors(
            name,
            label,
            T::DATA_TYPE,
            Box::new(move |actor| get(actor).into_value()),
            None,
        )
    }

    /// An enumeration property over a [`PropertyEnum`].
    pub fn enumeration<E: PropertyEnum>(
        name: impl Into<String>,
        label: impl Into<String>,
        get: impl Fn(&A) -> E + Send + Sync + 'static,
        set: impl Fn(&mut A, E) + Send + Sync + 'static,
    ) -> Self {
        let setter: Setter<A> = Box::new(move |property, actor, value| match value {
            PropertyValue::Enumeration(label) => match E::from_name(&label) {
                Some(variant) => {
                    set(actor, variant);
                    Ok(())
                }
                None => Err(PropertyError::InvalidEnumValue {
                    property: property.to_owned(),
                    value: label,
                }),
            },
            other => Err(PropertyError::TypeMismatch {
                property: property.to_owned(),
                expected: DataType::Enumeration,
                found: other.data_type(),
            }),
        });
        let mut property = Self::with_accessors(
            name,
            label,
            DataType::Enumeration,
            Box::new(move |actor| PropertyValue::Enumeration(get(actor).name().to_owned())),
            Some(setter),
        );
        property.info.enum_values = E::variants();
        property
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.info.description = description.into();
        self
    }

    /// Sets the group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.info.group = group.into();
        self
    }

    /// The property's static description.
    pub fn info(&self) -> &PropertyInfo {
        &self.info
    }

    /// The property name.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// The property's data type.
    pub fn data_type(&self) -> DataType {
        self.info.data_type
    }

    /// `true` if the property cannot be set.
    pub fn is_read_only(&self) -> bool {
        self.info.read_only
    }

    /// Reads the property from `actor`.
    pub fn get(&self, actor: &A) -> PropertyValue {
        (self.getter)(actor)
    }

    /// Writes `value` into `actor`.
    ///
    /// Fails with [`PropertyError::ReadOnly`] when there is no setter and
    /// with [`PropertyError::TypeMismatch`] when the value's tag differs from
    /// the property's data type. Neither failure touches the actor.
    pub fn set(&self, actor: &mut A, value: PropertyValue) -> Result<(), PropertyError> {
        let Some(setter) = &self.setter else {
            return Err(PropertyError::ReadOnly(self.info.name.clone()));
        };
        if value.data_type() != self.info.data_type {
            return Err(PropertyError::TypeMismatch {
                property: self.info.name.clone(),
                expected: self.info.data_type,
                found: value.data_type(),
            });
        }
        setter(&self.info.name, actor, value)
    }

    /// The string form of the current value.
    pub fn to_string_repr(&self, actor: &A) -> String {
        self.get(actor).to_string_repr()
    }

    /// Parses `input` as this property's data type and sets it.
    pub fn set_from_string(&self, actor: &mut A, input: &str) -> Result<(), PropertyError> {
        if self.is_read_only() {
            return Err(PropertyError::ReadOnly(self.info.name.clone()));
        }
        let value = PropertyValue::parse(self.info.data_type, input)?;
        self.set(actor, value)
    }
}

impl<A> std::fmt::Debug for ActorProperty<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorProperty")
            .field("name", &self.info.name)
            .field("data_type", &self.info.data_type)
            .field("read_only", &self.info.read_only)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simforge_core::math::Vec3;

    #[derive(Default)]
    struct Beacon {
        position: Vec3,
        range: f32,
        serial: i32,
        mode: Mode,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    enum Mode {
        #[default]
        Idle,
        Active,
    }

    crate::property_enum!(Mode {
        Idle => "IDLE",
        Active => "ACTIVE",
    });

    fn position() -> ActorProperty<Beacon> {
        ActorProperty::new("Position", "Position", |b: &Beacon| b.position, |b, v| b.position = v)
            .with_group("Transform")
    }

    #[test]
    fn typed_property_reads_and_writes() {
        let mut beacon = Beacon::default();
        let property = position();
        property
            .set(&mut beacon, PropertyValue::Vec3(Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();
        assert_eq!(beacon.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(property.get(&beacon), PropertyValue::Vec3(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(property.info().group, "Transform");
        assert!(!property.is_read_only());
    }

    #[test]
    fn mismatched_value_is_rejected_without_side_effects() {
        let mut beacon = Beacon::default();
        let err = position()
            .set(&mut beacon, PropertyValue::Float(4.0))
            .unwrap_err();
        assert_eq!(
            err,
            PropertyError::TypeMismatch {
                property: "Position".to_owned(),
                expected: DataType::Vec3,
                found: DataType::Float,
            }
        );
        assert_eq!(beacon.position, Vec3::ZERO);
    }

    #[test]
    fn read_only_property_refuses_writes() {
        let mut beacon = Beacon {
            serial: 7,
            ..Default::default()
        };
        let property = ActorProperty::read_only("Serial", "Serial", |b: &Beacon| b.serial);
        assert_eq!(property.get(&beacon), PropertyValue::Int(7));
        assert_eq!(
            property.set(&mut beacon, PropertyValue::Int(9)),
            Err(PropertyError::ReadOnly("Serial".to_owned()))
        );
        assert!(matches!(
            property.set_from_string(&mut beacon, "9"),
            Err(PropertyError::ReadOnly(_))
        ));
        assert_eq!(beacon.serial, 7);
    }

    #[test]
    fn validated_setter_can_refuse() {
        let mut beacon = Beacon::default();
        let property = ActorProperty::validated(
            "Range",
            "Range",
            |b: &Beacon| b.range,
            |b, v: f32| {
                if v < 0.0 {
                    return Err("range must be positive".to_owned());
                }
                b.range = v;
                Ok(())
            },
        );
        property.set(&mut beacon, PropertyValue::Float(10.0)).unwrap();
        let err = property.set(&mut beacon, PropertyValue::Float(-1.0)).unwrap_err();
        assert!(matches!(err, PropertyError::Rejected { .. }));
        assert_eq!(beacon.range, 10.0);
    }

    #[test]
    fn enumeration_checks_names() {
        let mut beacon = Beacon::default();
        let property =
            ActorProperty::enumeration("Mode", "Mode", |b: &Beacon| b.mode, |b, m| b.mode = m);
        assert_eq!(property.info().enum_values, &["IDLE", "ACTIVE"]);
        assert_eq!(property.get(&beacon), PropertyValue::Enumeration("IDLE".to_owned()));

        property.set_from_string(&mut beacon, "ACTIVE").unwrap();
        assert_eq!(beacon.mode, Mode::Active);

        let err = property
            .set(&mut beacon, PropertyValue::Enumeration("BROKEN".to_owned()))
            .unwrap_err();
        assert_eq!(
            err,
            PropertyError::InvalidEnumValue {
                property: "Mode".to_owned(),
                value: "BROKEN".to_owned()
            }
        );
        assert_eq!(beacon.mode, Mode::Active);
    }

    #[test]
    fn string_round_trip_through_property() {
        let mut beacon = Beacon::default();
        let property = position();
        property.set_from_string(&mut beacon, "4 5 6").unwrap();
        assert_eq!(property.to_string_repr(&beacon), "4 5 6");
        assert!(matches!(
            property.set_from_string(&mut beacon, "four"),
            Err(PropertyError::Parse { .. })
        ));
    }
}
