use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Identifies a panel on one dashboard.
pub type PanelId = u64;

/// Crosshair position in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrosshairPosition {
    /// Epoch milliseconds.
    pub time: f64,
    pub value: Option<f64>,
}

impl CrosshairPosition {
    #[must_use]
    pub fn new(time: f64, value: Option<f64>) -> Self {
        Self { time, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CrosshairEvent {
    Moved {
        source: PanelId,
        position: CrosshairPosition,
    },
    Cleared {
        source: PanelId,
    },
}

impl CrosshairEvent {
    #[must_use]
    pub fn source(&self) -> PanelId {
        match self {
            Self::Moved { source, .. } | Self::Cleared { source } => *source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

type CrosshairHandler = Box<dyn FnMut(&CrosshairEvent)>;

struct Subscriber {
    panel: PanelId,
    handler: CrosshairHandler,
}

/// Crosshair broadcast scoped to one dashboard.
///
/// Handlers run synchronously in subscription order. A panel never receives
/// its own events.
#[derive(Default)]
pub struct CrosshairBus {
    next_id: u64,
    subscribers: IndexMap<SubscriptionId, Subscriber>,
}

impl CrosshairBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        panel: PanelId,
        handler: impl FnMut(&CrosshairEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.insert(
            id,
            Subscriber {
                panel,
                handler: Box::new(handler),
            },
        );
        id
    }

    /// Removes a subscription; returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.shift_remove(&id).is_some()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Delivers `event` to every other panel and returns the delivery count.
    pub fn publish(&mut self, event: CrosshairEvent) -> usize {
        let source = event.source();
        let mut delivered = 0;
        for subscriber in self.subscribers.values_mut() {
            if subscriber.panel == source {
                continue;
            }
            (subscriber.handler)(&event);
            delivered += 1;
        }
        trace!(source, delivered, "crosshair event published");
        delivered
    }
}

impl std::fmt::Debug for CrosshairBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrosshairBus")
            .field("next_id", &self.next_id)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{CrosshairBus, CrosshairEvent, CrosshairPosition};

    #[test]
    fn publish_skips_the_source_panel() {
        let mut bus = CrosshairBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for panel in [1, 2, 3] {
            let seen = Rc::clone(&seen);
            bus.subscribe(panel, move |event| seen.borrow_mut().push((panel, *event)));
        }

        let event = CrosshairEvent::Moved {
            source: 2,
            position: CrosshairPosition::new(1_000.0, Some(4.0)),
        };
        assert_eq!(bus.publish(event), 2);
        let receivers: Vec<u64> = seen.borrow().iter().map(|(panel, _)| *panel).collect();
        assert_eq!(receivers, vec![1, 3]);
    }

    #[test]
    fn unsubscribed_handlers_stop_receiving() {
        let mut bus = CrosshairBus::new();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let id = bus.subscribe(7, move |_| *counter.borrow_mut() += 1);

        bus.publish(CrosshairEvent::Cleared { source: 1 });
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(CrosshairEvent::Cleared { source: 1 });

        assert_eq!(*hits.borrow(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
