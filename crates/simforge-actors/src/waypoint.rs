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

use simforge_core::math::DVec3;
use simforge_data::{Actor, ActorProperty, PropertyError, PropertyMap};

/// A named point along a route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Waypoint {
    /// World position.
    pub position: DVec3,
    /// Text shown next to the marker.
    pub label: String,
    /// Arrival radius in metres.
    pub radius: f32,
}

impl Actor for Waypoint {
    fn build_property_map(map: &mut PropertyMap<Self>) -> Result<(), PropertyError> {
        map.add(ActorProperty::new(
            "Position",
            "Position",
            |w: &Waypoint| w.position,
            |w, v| w.position = v,
        ))?
        .add(ActorProperty::new(
            "Label",
            "Label",
            |w: &Waypoint| w.label.clone(),
            |w, v| w.label = v,
        ))?
        .add(
            ActorProperty::validated(
                "Radius",
                "Arrival Radius",
                |w: &Waypoint| w.radius,
                |w, radius: f32| {
                    if !radius.is_finite() || radius < 0.0 {
                        return Err(format!("radius must be a positive distance, got {radius}"));
                    }
                    w.radius = radius;
                    Ok(())
                },
            )
            .with_description("Distance at which the waypoint counts as reached"),
        )?;
        Ok(())
    }
}
