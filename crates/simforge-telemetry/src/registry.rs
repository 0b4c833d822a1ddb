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

//! Registry for managing metrics.

use crate::backend::{InMemoryBackend, MetricsBackend};
use simforge_core::telemetry::{Metric, MetricId, MetricType, MetricsError, MetricsResult};
use std::sync::Arc;

/// Entry point of the metrics system.
///
/// Registering a metric returns a cheap, cloneable handle that updates it
/// in the shared backend.
#[derive(Debug, Clone)]
pub struct MetricsRegistry {
    backend: Arc<dyn MetricsBackend>,
}

impl MetricsRegistry {
    /// Creates a registry over a fresh [`InMemoryBackend`].
    pub fn new() -> Self {
        Self {
            backend: Arc::new(InMemoryBackend::new()),
        }
    }

    /// Creates a registry over a custom backend.
    pub fn with_backend(backend: Arc<dyn MetricsBackend>) -> Self {
        Self { backend }
    }

    /// Registers a counter starting at zero.
    ///
    /// Registering an existing id resets it.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = MetricId::new(namespace, name);
        self.backend
            .put_metric(Metric::new_counter(id.clone(), description))?;
        Ok(CounterHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// Registers a gauge starting at zero.
    pub fn register_gauge(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> MetricsResult<GaugeHandle> {
        let id = MetricId::new(namespace, name);
        self.backend
            .put_metric(Metric::new_gauge(id.clone(), description, unit, 0.0))?;
        Ok(GaugeHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// Returns a copy of a metric.
    pub fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        self.backend.get_metric(id)
    }

    /// Returns every metric in a namespace, sorted by name.
    pub fn namespace_metrics(&self, namespace: &str) -> Vec<Metric> {
        let mut metrics: Vec<Metric> = self
            .backend
            .list_all_metrics()
            .into_iter()
            .filter(|m| m.id.namespace == namespace)
            .collect();
        metrics.sort_by(|a, b| a.id.name.cmp(&b.id.name));
        metrics
    }

    /// Number of registered metrics.
    pub fn metric_count(&self) -> usize {
        self.backend.metric_count()
    }

    /// Logs every metric of a namespace at info level.
    pub fn log_namespace(&self, namespace: &str) {
        for metric in self.namespace_metrics(namespace) {
            match metric.metric_type() {
                MetricType::Counter => log::info!(
                    "  {} = {}",
                    metric.id,
                    metric.value.as_counter().unwrap_or(0)
                ),
                MetricType::Gauge => log::info!(
                    "  {} = {:.2} {}",
                    metric.id,
                    metric.value.as_gauge().unwrap_or(0.0),
                    metric.unit
                ),
            }
        }
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a registered counter.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl CounterHandle {
    /// Increments by one and returns the new value.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.backend.increment_counter(&self.id, 1)
    }

    /// Increments by `amount` and returns the new value.
    pub fn increment_by(&self, amount: u64) -> MetricsResult<u64> {
        self.backend.increment_counter(&self.id, amount)
    }

    /// Current value.
    pub fn get(&self) -> MetricsResult<u64> {
        let metric = self.backend.get_metric(&self.id)?;
        metric
            .value
            .as_counter()
            .ok_or(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: metric.metric_type(),
            })
    }

    /// The counter's id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle to a registered gauge.
#[derive(Debug, Clone)]
pub struct GaugeHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl GaugeHandle {
    /// Sets the gauge.
    pub fn set(&self, value: f64) -> MetricsResult<()> {
        self.backend.set_gauge(&self.id, value)
    }

    /// Adds `delta` (possibly negative) and returns the new value.
    pub fn add(&self, delta: f64) -> MetricsResult<f64> {
        let value = self.get()? + delta;
        self.set(value)?;
        Ok(value)
    }

    /// Current value.
    pub fn get(&self) -> MetricsResult<f64> {
        let metric = self.backend.get_metric(&self.id)?;
        metric.value.as_gauge().ok_or(MetricsError::TypeMismatch {
            expected: MetricType::Gauge,
            found: metric.metric_type(),
        })
    }

    /// The gauge's id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_registration_and_operations() {
        let registry = MetricsRegistry::new();
        let dropped = registry
            .register_counter("dis", "pdus_dropped", "PDUs that produced no message")
            .unwrap();

        assert_eq!(dropped.increment().unwrap(), 1);
        assert_eq!(dropped.increment_by(4).unwrap(), 5);
        assert_eq!(dropped.get().unwrap(), 5);
        assert_eq!(registry.metric_count(), 1);
    }

    #[test]
    fn test_gauge_operations() {
        let registry = MetricsRegistry::new();
        let active = registry
            .register_gauge("dis", "active_entities", "Mapped entities", "entities")
            .unwrap();

        active.set(3.0).unwrap();
        assert_eq!(active.add(2.0).unwrap(), 5.0);
        assert_eq!(active.add(-1.0).unwrap(), 4.0);
        assert_eq!(active.get().unwrap(), 4.0);
    }

    #[test]
    fn test_handles_share_backend() {
        let registry = MetricsRegistry::new();
        let counter = registry.register_counter("dis", "pdus", "").unwrap();
        let clone = counter.clone();
        counter.increment().unwrap();
        clone.increment().unwrap();

        let metric = registry.get_metric(counter.id()).unwrap();
        assert_eq!(metric.value.as_counter(), Some(2));
    }

    #[test]
    fn test_namespace_metrics_sorted() {
        let registry = MetricsRegistry::new();
        registry.register_counter("dis", "zeta", "").unwrap();
        registry.register_counter("dis", "alpha", "").unwrap();
        registry.register_counter("actors", "created", "").unwrap();

        let names: Vec<_> = registry
            .namespace_metrics("dis")
            .into_iter()
            .map(|m| m.id.name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
