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

// Simforge runtime
// Replays DIS traffic into an actor map and publishes a local actor back.

mod scenario;
mod world;

use anyhow::{Context, Result};
use clap::Parser;
use scenario::Scenario;
use simforge_actors::{Vehicle, DIS_CATEGORY};
use simforge_core::math::{DVec3, Vec3};
use simforge_data::{LibraryManager, MessageKind, PropertyValue};
use simforge_dis::{params, DefaultDisPlugin, DisComponent, Pdu, SharedState};
use simforge_telemetry::MetricsRegistry;
use std::ffi::OsString;
use std::path::PathBuf;
use world::World;

const DEFAULT_OUTPUT: &str = "simforge-map.ron";

#[derive(Parser, Debug)]
#[command(name = "simforge-runtime")]
#[command(about = "Replay DIS traffic into an actor map and publish an ownship back", long_about = None)]
struct Options {
    /// DIS configuration (default: built-in exercise 1 mappings)
    #[arg(value_name = "CONFIG.ron")]
    config: Option<PathBuf>,

    /// Where to save the resulting actor map
    #[arg(value_name = "OUT.ron", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// PDUs to replay (default: the built-in scenario)
    #[arg(value_name = "SCENARIO.ron")]
    scenario: Option<PathBuf>,

    /// Dynamic actor modules to load, as a PATH style list
    #[arg(long, env = "SIMFORGE_ACTOR_PLUGINS", value_name = "PATHS")]
    actor_plugins: Option<OsString>,
}

impl Options {
    /// Every path listed in `--actor-plugins`.
    fn plugin_paths(&self) -> Vec<PathBuf> {
        self.actor_plugins
            .as_deref()
            .map(|paths| std::env::split_paths(paths).filter(|p| !p.as_os_str().is_empty()).collect())
            .unwrap_or_default()
    }
}

fn load_libraries(options: &Options) -> Result<LibraryManager> {
    let mut manager = LibraryManager::new();
    let linked = manager.register_static_plugins()?;
    log::info!("{linked} statically linked actor registries");

    for path in options.plugin_paths() {
        match manager.load_library(&path) {
            Ok(name) => log::info!("Loaded actor registry '{name}' from {}", path.display()),
            Err(e) => log::error!("Skipping {}: {e}", path.display()),
        }
    }
    Ok(manager)
}

fn load_state(options: &Options) -> Result<SharedState> {
    let state = match &options.config {
        Some(path) => SharedState::load_config(path)
            .with_context(|| format!("cannot load DIS configuration {}", path.display()))?,
        None => {
            log::info!("No DIS configuration given, using the built-in one");
            SharedState::from_config(scenario::default_config()?)?
        }
    };
    log::info!(
        "DIS exercise {} as {} ({} entity type mappings)",
        state.connection().exercise_id,
        state.address(),
        state.mapping().len()
    );
    Ok(state)
}

fn log_pdus(pdus: &[Pdu]) {
    for pdu in pdus {
        log::info!("  -> {} about {}", pdu.pdu_type(), pdu.subject());
    }
}

fn run(options: Options) -> Result<()> {
    let manager = load_libraries(&options)?;
    let registry = MetricsRegistry::new();
    let mut component = DisComponent::new(load_state(&options)?, &registry)?;
    component.add_plugin(Box::new(DefaultDisPlugin));

    let scenario = match &options.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::builtin(),
    };
    log::info!("Replaying {} PDUs", scenario.pdus.len());

    let mut world = World::new("simforge");
    for pdu in &scenario.pdus {
        component.process_pdu(pdu);
        for message in component.drain_messages() {
            if let Err(e) = world.apply(&message, &manager) {
                log::warn!("{e:#}");
            }
        }
    }

    // One actor of our own, published like any simulation would.
    let mut ownship = manager.create_actor_by_name(DIS_CATEGORY, "Vehicle")?;
    ownship.set_name("OWNSHIP");
    ownship.set_property_string(params::MARKING, "OWNSHIP")?;
    ownship.set_property_string(params::FORCE, "FRIENDLY")?;
    ownship.set_property_string(params::ENTITY_TYPE, "1.1.225.1.1.1")?;
    let id = ownship.id();
    component.process_message(&ownship.to_update_message(MessageKind::ActorCreated));
    world.spawn(ownship)?;

    for step in 1..=3 {
        let Some(ownship) = world.actor_mut(id) else {
            break;
        };
        ownship.set_property(
            params::TRANSLATION,
            PropertyValue::DVec3(DVec3::new(f64::from(step) * 8.0, -50.0, 0.0)),
        )?;
        ownship.set_property(params::VELOCITY, PropertyValue::Vec3(Vec3::new(8.0, 0.0, 0.0)))?;
        let message = ownship.to_update_message(MessageKind::ActorUpdated);
        component.process_message(&message);
    }
    log::info!("Published ownship:");
    log_pdus(&component.drain_pdus());

    if let Some(vehicle) = world.map().get(id).and_then(|p| p.actor::<Vehicle>()) {
        log::info!("Ownship ends at {:?}", vehicle.entity.translation);
    }

    let output = options.output;
    world
        .map()
        .save_ron(&output)
        .with_context(|| format!("cannot write {}", output.display()))?;
    log::info!("Saved {} actors to {}", world.map().len(), output.display());

    component.log_metrics();
    component.shutdown();
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    run(Options::parse())
}
