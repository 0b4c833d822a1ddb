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

use simforge_core::math::Color;
use simforge_data::{property_enum, Actor, ActorProperty, PropertyError, PropertyMap};

/// What falls from the sky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precipitation {
    /// Nothing.
    #[default]
    None,
    /// Rain.
    Rain,
    /// Snow.
    Snow,
}

property_enum!(Precipitation {
    None => "None",
    Rain => "Rain",
    Snow => "Snow",
});

/// Scene wide conditions. A map holds at most one.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    /// Local hour in `[0, 24)`.
    pub time_of_day: f32,
    /// Metres.
    pub visibility: f32,
    /// Colour distant objects fade into.
    pub fog_color: Color,
    /// Precipitation.
    pub precipitation: Precipitation,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            time_of_day: 12.0,
            visibility: 10_000.0,
            fog_color: Color::rgba(0.7, 0.75, 0.8, 1.0),
            precipitation: Precipitation::None,
        }
    }
}

impl Actor for Environment {
    fn build_property_map(map: &mut PropertyMap<Self>) -> Result<(), PropertyError> {
        map.add(ActorProperty::validated(
            "Time Of Day",
            "Time of Day",
            |e: &Environment| e.time_of_day,
            |e, hour: f32| {
                if !(0.0..24.0).contains(&hour) {
                    return Err(format!("{hour} is not an hour of the day"));
                }
                e.time_of_day = hour;
                Ok(())
            },
        ))?
        .add(ActorProperty::validated(
            "Visibility",
            "Visibility",
            |e: &Environment| e.visibility,
            |e, metres: f32| {
                if !metres.is_finite() || metres < 0.0 {
                    return Err(format!("visibility cannot be {metres}"));
                }
                e.visibility = metres;
                Ok(())
            },
        ))?
        .add(
            ActorProperty::new(
                "Fog Color",
                "Fog Colour",
                |e: &Environment| e.fog_color,
                |e, c: Color| e.fog_color = c.saturated(),
            )
            .with_group("Weather"),
        )?
        .add(
            ActorProperty::enumeration(
                "Precipitation",
                "Precipitation",
                |e: &Environment| e.precipitation,
                |e, p| e.precipitation = p,
            )
            .with_group("Weather"),
        )?;
        Ok(())
    }
}
