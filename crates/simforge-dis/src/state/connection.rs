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

use crate::types::SimulationAddress;
use serde::{Deserialize, Serialize};

/// Where and as whom the bridge takes part in the exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionData {
    /// Multicast or broadcast address.
    pub ip: String,
    /// UDP port.
    pub port: u16,
    /// Exercise number.
    pub exercise_id: u8,
    /// This simulation's site number.
    pub site_id: u16,
    /// This simulation's application number.
    pub application_id: u16,
    /// Largest datagram the transport sends.
    pub mtu: u32,
}

impl ConnectionData {
    /// The local simulation address.
    pub fn address(&self) -> SimulationAddress {
        SimulationAddress::new(self.site_id, self.application_id)
    }
}

impl Default for ConnectionData {
    fn default() -> Self {
        Self {
            ip: "239.1.2.3".to_owned(),
            port: 3000,
            exercise_id: 1,
            site_id: 1,
            application_id: 1,
            mtu: 1500,
        }
    }
}
