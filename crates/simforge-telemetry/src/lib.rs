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

//! Telemetry for Simforge: a metrics registry with counter and gauge handles
//! over a pluggable storage backend.

#![warn(missing_docs)]

pub mod backend;
pub mod registry;

pub use backend::{InMemoryBackend, MetricsBackend};
pub use registry::{CounterHandle, GaugeHandle, MetricsRegistry};
