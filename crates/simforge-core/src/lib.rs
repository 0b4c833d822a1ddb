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

//! # Simforge Core
//!
//! Foundational crate containing the value types, identifiers, channels and
//! plugin ABI shared by every other Simforge crate. It knows nothing about
//! actors or DIS; those live in higher layers.

#![warn(missing_docs)]

pub mod event;
pub mod id;
pub mod math;
pub mod plugin;
pub mod telemetry;

pub use event::EventBus;
pub use id::UniqueId;
