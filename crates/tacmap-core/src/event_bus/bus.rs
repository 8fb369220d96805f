//! Event bus used by the measurement engine.
//!
//! Delivery is synchronous and ordered: handlers run on the publishing
//! thread in the order they subscribed, before `publish` returns. A
//! `tokio` broadcast channel mirrors every event for async consumers, and
//! an optional bounded log keeps the most recent events with sequence
//! numbers so a late host can catch up.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

use super::events::{EngineEvent, EventCategory};
use crate::types::{thread_safe_rw, ThreadSafeRw};

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Which events a handler wants.
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    #[default]
    All,
    /// Any event in one of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &EngineEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler = Box<dyn Fn(EngineEvent) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    filter: EventFilter,
    handler: EventHandler,
}

#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Capacity of the broadcast channel; slow async receivers lag past it.
    pub channel_capacity: usize,
    /// Number of recent events kept in the log. Zero disables the log.
    pub history_limit: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            history_limit: 0,
        }
    }
}

/// A logged event and its position in the publish order.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencedEvent {
    pub sequence: u64,
    pub event: EngineEvent,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EventBusError {
    /// Neither a handler nor an async receiver saw the event.
    #[error("No active subscribers")]
    NoSubscribers,
}

pub struct EventBus {
    sender: broadcast::Sender<EngineEvent>,
    subscriptions: ThreadSafeRw<Vec<Subscription>>,
    log: ThreadSafeRw<VecDeque<SequencedEvent>>,
    next_subscription: AtomicU64,
    next_sequence: AtomicU64,
    config: EventBusConfig,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            subscriptions: thread_safe_rw(Vec::new()),
            log: thread_safe_rw(VecDeque::with_capacity(config.history_limit)),
            next_subscription: AtomicU64::new(1),
            next_sequence: AtomicU64::new(1),
            config,
        }
    }

    /// Delivers `event` to every matching handler, then to async receivers.
    ///
    /// Returns how many handlers and receivers got it. The event is logged
    /// even when nobody is listening.
    pub fn publish(&self, event: EngineEvent) -> Result<usize, EventBusError> {
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("Event {}: {}", sequence, event.description());
        self.record(sequence, &event);

        let mut delivered = 0;
        {
            let subscriptions = self.subscriptions.read();
            for subscription in subscriptions.iter().filter(|s| s.filter.matches(&event)) {
                (subscription.handler)(event.clone());
                delivered += 1;
            }
        }

        // send only fails when there are no receivers
        delivered += self.sender.send(event).unwrap_or(0);

        if delivered == 0 {
            Err(EventBusError::NoSubscribers)
        } else {
            Ok(delivered)
        }
    }

    /// Registers a synchronous handler.
    ///
    /// The handler runs inside the engine operation that produced the
    /// event, so it must not call back into the engine or this bus.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(EngineEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscriptions.write().push(Subscription {
            id,
            filter,
            handler: Box::new(handler),
        });
        tracing::debug!("Subscription {} added", id);
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.write();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        let removed = subscriptions.len() != before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Async receiver that sees every event published after this call.
    pub fn receiver(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Logged events, oldest first. Empty when the log is disabled.
    pub fn history(&self) -> Vec<EngineEvent> {
        self.log.read().iter().map(|e| e.event.clone()).collect()
    }

    /// Logged events published after `sequence`.
    pub fn history_after(&self, sequence: u64) -> Vec<SequencedEvent> {
        self.log
            .read()
            .iter()
            .filter(|e| e.sequence > sequence)
            .cloned()
            .collect()
    }

    /// Sequence number of the most recently published event, or 0.
    pub fn last_sequence(&self) -> u64 {
        self.next_sequence.load(Ordering::Relaxed) - 1
    }

    pub fn clear_history(&self) {
        self.log.write().clear();
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    fn record(&self, sequence: u64, event: &EngineEvent) {
        let limit = self.config.history_limit;
        if limit == 0 {
            return;
        }
        let mut log = self.log.write();
        if log.len() == limit {
            log.pop_front();
        }
        log.push_back(SequencedEvent {
            sequence,
            event: event.clone(),
        });
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("last_sequence", &self.last_sequence())
            .field("config", &self.config)
            .finish()
    }
}
