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

/// A thread-safe, unbounded channel that acts as an output sink.
///
/// The bus is generic over the item it carries so the core crate stays
/// decoupled from message and packet types defined in higher-level crates.
/// Producers publish into it; the owner drains it once per frame.
#[derive(Debug)]
pub struct EventBus<T: Send + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Send + 'static> EventBus<T> {
    /// Creates a new bus with an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Publishes an item, logging an error if every receiver is gone.
    ///
    /// Returns `true` if the item was queued.
    pub fn publish(&self, item: T) -> bool {
        match self.sender.send(item) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to publish on event bus: {e}. Receiver disconnected.");
                false
            }
        }
    }

    /// Returns a clone of the sender end, for producers living elsewhere.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Returns a reference to the receiver end.
    pub fn receiver(&self) -> &flume::Receiver<T> {
        &self.receiver
    }

    /// Removes and returns everything currently queued, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<T: Send + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Packet {
        State { entity: u16 },
        Remove { entity: u16 },
    }

    #[test]
    fn publish_then_drain_in_order() {
        let bus = EventBus::<Packet>::new();
        assert!(bus.publish(Packet::State { entity: 1 }));
        assert!(bus.publish(Packet::Remove { entity: 1 }));
        assert_eq!(bus.len(), 2);

        let drained = bus.drain();
        assert_eq!(
            drained,
            vec![Packet::State { entity: 1 }, Packet::Remove { entity: 1 }]
        );
        assert!(bus.is_empty());
    }

    #[test]
    fn drain_empty_bus() {
        let bus = EventBus::<Packet>::default();
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn send_from_thread() {
        let bus = EventBus::<Packet>::new();
        let sender = bus.sender();
        let handle = thread::spawn(move || {
            sender
                .send(Packet::State { entity: 7 })
                .expect("send from thread should succeed");
        });
        handle.join().unwrap();

        let received = bus
            .receiver()
            .recv_timeout(Duration::from_millis(100))
            .expect("packet should arrive");
        assert_eq!(received, Packet::State { entity: 7 });
    }
}
