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

//! The DIS component owning the bridge.

use crate::disposition::Disposition;
use crate::error::DisError;
use crate::incoming::IncomingMessage;
use crate::outgoing::OutgoingMessage;
use crate::pdu::Pdu;
use crate::plugin::{DisPlugin, CREATE_COMPONENT_SYMBOL, DESTROY_COMPONENT_SYMBOL};
use crate::state::SharedState;
use simforge_core::plugin::{PluginHandle, PluginLibrary};
use simforge_core::telemetry::MetricsResult;
use simforge_data::Message;
use simforge_telemetry::{CounterHandle, GaugeHandle, MetricsRegistry};
use std::path::Path;

/// Metric namespace of the component.
pub const METRICS_NAMESPACE: &str = "dis";

#[derive(Debug)]
struct DisMetrics {
    pdus_received: CounterHandle,
    pdus_processed: CounterHandle,
    pdus_dropped: CounterHandle,
    messages_received: CounterHandle,
    messages_converted: CounterHandle,
    messages_dropped: CounterHandle,
    active_entities: GaugeHandle,
}

impl DisMetrics {
    fn register(registry: &MetricsRegistry) -> MetricsResult<Self> {
        let counter = |name: &str, description: &str| {
            registry.register_counter(METRICS_NAMESPACE, name, description)
        };
        Ok(Self {
            pdus_received: counter("pdus_received", "PDUs handed to the bridge")?,
            pdus_processed: counter("pdus_processed", "PDUs translated into a message")?,
            pdus_dropped: counter("pdus_dropped", "PDUs that could not be translated")?,
            messages_received: counter("messages_received", "Messages handed to the bridge")?,
            messages_converted: counter("messages_converted", "Messages translated into a PDU")?,
            messages_dropped: counter("messages_dropped", "Messages that could not be translated")?,
            active_entities: registry.register_gauge(
                METRICS_NAMESPACE,
                "active_entities",
                "Entities mapped to actors",
                "entities",
            )?,
        })
    }
}

fn bump(counter: &CounterHandle) {
    if let Err(e) = counter.increment() {
        log::debug!("Failed to update {}: {e}", counter.id());
    }
}

/// Owns the shared state, both dispatchers and the plugins feeding them.
///
/// Received PDUs go in through [`process_pdu`](Self::process_pdu) and come
/// out as messages on [`messages`](Self::messages); local messages go in
/// through [`process_message`](Self::process_message) and come out as PDUs
/// on [`pdus`](Self::pdus).
pub struct DisComponent {
    state: SharedState,
    // Processors and adapters may live in plugin modules: both dispatchers
    // must drop before `plugins`.
    incoming: IncomingMessage,
    outgoing: OutgoingMessage,
    plugins: Vec<PluginHandle<dyn DisPlugin>>,
    metrics: DisMetrics,
    registry: MetricsRegistry,
}

impl DisComponent {
    /// Creates a component with no plugin, registering its metrics.
    pub fn new(state: SharedState, registry: &MetricsRegistry) -> Result<Self, DisError> {
        Ok(Self {
            state,
            incoming: IncomingMessage::new(),
            outgoing: OutgoingMessage::new(),
            plugins: Vec::new(),
            metrics: DisMetrics::register(registry)?,
            registry: registry.clone(),
        })
    }

    /// Adds and starts a statically linked plugin.
    pub fn add_plugin(&mut self, plugin: Box<dyn DisPlugin>) {
        self.start_plugin(PluginHandle::from_box(plugin));
    }

    /// Loads a dynamic DIS module, then adds and starts its plugin.
    ///
    /// Returns the plugin's name.
    pub fn load_plugin(&mut self, path: impl AsRef<Path>) -> Result<String, DisError> {
        let library = PluginLibrary::open(path)?;
        // SAFETY: DIS modules export the pair generated by `export_dis_plugin!`.
        let plugin = unsafe {
            library.instantiate::<dyn DisPlugin>(CREATE_COMPONENT_SYMBOL, DESTROY_COMPONENT_SYMBOL)?
        };
        let name = plugin.name().to_owned();
        self.start_plugin(plugin);
        Ok(name)
    }

    fn start_plugin(&mut self, mut plugin: PluginHandle<dyn DisPlugin>) {
        plugin.start(&mut self.incoming, &mut self.outgoing, &mut self.state);
        log::info!("Started DIS plugin '{}'", plugin.name());
        self.plugins.push(plugin);
    }

    /// Names of the running plugins, in start order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Translates one received PDU.
    pub fn process_pdu(&mut self, pdu: &Pdu) -> Disposition {
        bump(&self.metrics.pdus_received);
        let disposition = self.incoming.handle(pdu, &mut self.state);
        match &disposition {
            Disposition::Forwarded => bump(&self.metrics.pdus_processed),
            Disposition::Dropped(_) => bump(&self.metrics.pdus_dropped),
            Disposition::Unhandled => {}
        }
        self.update_gauge();
        disposition
    }

    /// Translates one local message.
    pub fn process_message(&mut self, message: &Message) -> Disposition {
        bump(&self.metrics.messages_received);
        let disposition = self.outgoing.handle(message, &mut self.state);
        match &disposition {
            Disposition::Forwarded => bump(&self.metrics.messages_converted),
            Disposition::Dropped(_) => bump(&self.metrics.messages_dropped),
            Disposition::Unhandled => {}
        }
        self.update_gauge();
        disposition
    }

    fn update_gauge(&self) {
        if let Err(e) = self
            .metrics
            .active_entities
            .set(self.state.entities().len() as f64)
        {
            log::debug!("Failed to update active entities: {e}");
        }
    }

    /// Messages translated from received PDUs.
    pub fn messages(&self) -> &flume::Receiver<Message> {
        self.incoming.messages()
    }

    /// PDUs translated from local messages.
    pub fn pdus(&self) -> &flume::Receiver<Pdu> {
        self.outgoing.pdus()
    }

    /// Takes every pending message.
    pub fn drain_messages(&self) -> Vec<Message> {
        self.incoming.drain()
    }

    /// Takes every pending PDU.
    pub fn drain_pdus(&self) -> Vec<Pdu> {
        self.outgoing.drain()
    }

    /// Logs the component's counters at info level.
    pub fn log_metrics(&self) {
        log::info!("DIS metrics:");
        self.registry.log_namespace(METRICS_NAMESPACE);
    }

    /// The shared state.
    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// The shared state, mutably.
    pub fn state_mut(&mut self) -> &mut SharedState {
        &mut self.state
    }

    /// Finishes every plugin, last started first, and releases them.
    pub fn shutdown(&mut self) {
        while let Some(mut plugin) = self.plugins.pop() {
            plugin.finish(&mut self.incoming, &mut self.outgoing);
            log::info!("Finished DIS plugin '{}'", plugin.name());
        }
    }
}

impl Drop for DisComponent {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for DisComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisComponent")
            .field("plugins", &self.plugin_names())
            .field("incoming", &self.incoming)
            .field("outgoing", &self.outgoing)
            .field("active_entities", &self.state.entities().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdu::{EntityStatePdu, PduHeader, PduType, RemoveEntityPdu};
    use crate::plugin::DefaultDisPlugin;
    use crate::types::{EntityId, EntityType};
    use simforge_core::telemetry::MetricId;
    use simforge_core::UniqueId;
    use simforge_data::{ActorTypeKey, MessageKind};

    fn component(registry: &MetricsRegistry) -> DisComponent {
        let mut state = SharedState::default();
        state
            .mapping_mut()
            .add("1.1".parse().unwrap(), ActorTypeKey::new("dis", "Vehicle"));
        let mut component = DisComponent::new(state, registry).unwrap();
        component.add_plugin(Box::new(DefaultDisPlugin));
        component
    }

    fn counter(registry: &MetricsRegistry, name: &str) -> u64 {
        registry
            .get_metric(&MetricId::new(METRICS_NAMESPACE, name))
            .unwrap()
            .value
            .as_counter()
            .unwrap()
    }

    #[test]
    fn drops_are_counted() {
        let registry = MetricsRegistry::new();
        let mut component = component(&registry);

        let state = Pdu::EntityState(EntityStatePdu::new(
            1,
            EntityId::new(4, 4, 4),
            EntityType::new(1, 1, 225, 0, 0, 0, 0),
        ));
        let unknown = Pdu::RemoveEntity(RemoveEntityPdu {
            header: PduHeader::new(PduType::RemoveEntity, 1),
            originating_id: EntityId::new(4, 4, 0),
            receiving_id: EntityId::new(4, 4, 99),
            request_id: 1,
        });

        assert!(component.process_pdu(&state).is_forwarded());
        assert!(component.process_pdu(&unknown).is_dropped());

        assert_eq!(counter(&registry, "pdus_received"), 2);
        assert_eq!(counter(&registry, "pdus_processed"), 1);
        assert_eq!(counter(&registry, "pdus_dropped"), 1);
        let active = registry
            .get_metric(&MetricId::new(METRICS_NAMESPACE, "active_entities"))
            .unwrap();
        assert_eq!(active.value.as_gauge(), Some(1.0));
        assert_eq!(component.messages().try_iter().count(), 1);
    }

    #[test]
    fn messages_are_counted() {
        let registry = MetricsRegistry::new();
        let mut component = component(&registry);
        let unknown = Message::new(MessageKind::ActorDeleted, UniqueId::new());
        assert!(component.process_message(&unknown).is_dropped());
        assert_eq!(counter(&registry, "messages_received"), 1);
        assert_eq!(counter(&registry, "messages_dropped"), 1);
        assert_eq!(counter(&registry, "messages_converted"), 0);
        assert!(component.pdus().is_empty());
    }

    #[test]
    fn shutdown_finishes_plugins() {
        let registry = MetricsRegistry::new();
        let mut component = component(&registry);
        assert_eq!(component.plugin_names(), vec!["default"]);
        component.shutdown();
        assert!(component.plugin_names().is_empty());

        let remove = Pdu::RemoveEntity(RemoveEntityPdu {
            header: PduHeader::new(PduType::RemoveEntity, 1),
            originating_id: EntityId::new(4, 4, 0),
            receiving_id: EntityId::new(4, 4, 99),
            request_id: 1,
        });
        assert!(matches!(component.process_pdu(&remove), Disposition::Unhandled));
    }

    #[test]
    fn missing_module_is_an_error() {
        let registry = MetricsRegistry::new();
        let mut component = component(&registry);
        assert!(matches!(
            component.load_plugin("/no/such/libsimforge_dis_plugin.so"),
            Err(DisError::Plugin(_))
        ));
        assert_eq!(component.plugin_names().len(), 1);
    }
}
