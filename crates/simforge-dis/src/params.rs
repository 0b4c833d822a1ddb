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

//! Names of the message parameters the bridge reads and writes.
//!
//! Actor types meant to be mirrored on the network name their properties
//! after these.

/// World position, [`DVec3`](simforge_core::math::DVec3).
pub const TRANSLATION: &str = "Translation";
/// Euler angles, [`Vec3`](simforge_core::math::Vec3).
pub const ROTATION: &str = "Rotation";
/// Linear velocity, [`Vec3`](simforge_core::math::Vec3).
pub const VELOCITY: &str = "Velocity";
/// Damage state enumeration.
pub const DAMAGE_STATE: &str = "Damage State";
/// Force enumeration.
pub const FORCE: &str = "Force";
/// Marking text.
pub const MARKING: &str = "Marking";
/// Dotted DIS entity type string.
pub const ENTITY_TYPE: &str = "Entity Type";
/// The `site:application:entity` id string.
pub const ENTITY_ID: &str = "Entity ID";
/// Request id of a simulation management PDU, as a long.
pub const REQUEST_ID: &str = "Request ID";

/// Source name stamped on messages the bridge produces.
pub const SOURCE: &str = "dis";
