//! Named-topic publish/subscribe used between the engine, the router and the breadcrumb.
//!
//! The engine only talks to collaborators through an injected [`EventBus`]. Delivery
//! is synchronous: `publish` returns after every matching subscriber ran, in
//! subscription order.

use std::{
    fmt,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use navdeck_types::{BusEvent, Topic};
use tracing::trace;

/// Callback invoked for each event on a subscribed topic.
pub type Subscriber = Arc<dyn Fn(&BusEvent) + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub trait EventBus: Send + Sync {
    fn publish(&self, event: BusEvent);
    fn subscribe(&self, topic: Topic, subscriber: Subscriber) -> SubscriptionId;
    /// Returns `false` when the id was unknown.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

struct Subscription {
    id: SubscriptionId,
    topic: Topic,
    subscriber: Subscriber,
}

/// In-process bus.
///
/// Subscribers are cloned out of the lock before they run, so a subscriber may
/// itself publish or subscribe.
#[derive(Default)]
pub struct LocalEventBus {
    subscriptions: Mutex<Vec<Subscription>>,
    next_id: AtomicU64,
}

impl LocalEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscriptions
            .lock()
            .expect("bus subscriptions lock poisoned")
            .iter()
            .filter(|subscription| subscription.topic == topic)
            .count()
    }
}

impl fmt::Debug for LocalEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.subscriptions.lock().map(|subscriptions| subscriptions.len()).unwrap_or(0);
        f.debug_struct("LocalEventBus").field("subscriptions", &count).finish()
    }
}

impl EventBus for LocalEventBus {
    fn publish(&self, event: BusEvent) {
        let topic = event.topic();
        let subscribers: Vec<Subscriber> = self
            .subscriptions
            .lock()
            .expect("bus subscriptions lock poisoned")
            .iter()
            .filter(|subscription| subscription.topic == topic)
            .map(|subscription| Arc::clone(&subscription.subscriber))
            .collect();

        trace!(%topic, subscribers = subscribers.len(), "publishing bus event");
        for subscriber in subscribers {
            subscriber(&event);
        }
    }

    fn subscribe(&self, topic: Topic, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions
            .lock()
            .expect("bus subscriptions lock poisoned")
            .push(Subscription { id, topic, subscriber });
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.lock().expect("bus subscriptions lock poisoned");
        let before = subscriptions.len();
        subscriptions.retain(|subscription| subscription.id != id);
        subscriptions.len() != before
    }
}

/// Bus that keeps every published event, then delivers it like [`LocalEventBus`].
#[derive(Debug, Default)]
pub struct RecordingEventBus {
    inner: LocalEventBus,
    published: Mutex<Vec<BusEvent>>,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every published event, oldest first.
    pub fn events(&self) -> Vec<BusEvent> {
        self.published.lock().expect("recorded events lock poisoned").clone()
    }

    pub fn events_on(&self, topic: Topic) -> Vec<BusEvent> {
        self.events().into_iter().filter(|event| event.topic() == topic).collect()
    }

    pub fn last_on(&self, topic: Topic) -> Option<BusEvent> {
        self.events_on(topic).pop()
    }

    /// Drains the record.
    pub fn take(&self) -> Vec<BusEvent> {
        std::mem::take(&mut *self.published.lock().expect("recorded events lock poisoned"))
    }
}

impl EventBus for RecordingEventBus {
    fn publish(&self, event: BusEvent) {
        self.published.lock().expect("recorded events lock poisoned").push(event.clone());
        self.inner.publish(event);
    }

    fn subscribe(&self, topic: Topic, subscriber: Subscriber) -> SubscriptionId {
        self.inner.subscribe(topic, subscriber)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }
}
