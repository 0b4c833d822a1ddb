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

//! Property reflection.
//!
//! An actor type describes its state as a [`PropertyMap`] of named
//! [`ActorProperty`] accessors. Values cross the untyped boundary as a
//! [`PropertyValue`] whose [`DataType`] tag is checked on every write.

mod actor_property;
mod map;
mod value;

pub use actor_property::{ActorProperty, PropertyInfo};
pub use map::PropertyMap;
pub use value::{DataType, PropertyEnum, PropertyType, PropertyValue};
