use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::dashboard::{group_events, EventQuery, ExecutionGroup, GroupStats, SinkStats};
use super::event::{ExecutionId, XRayEvent};

/// Append-only destination for X-Ray events. The filter engine only ever appends.
pub trait TraceSink: Send + Sync {
    fn append(&self, event: XRayEvent);

    /// Append a whole execution; implementations may notify consumers once per batch.
    fn append_batch(&self, events: Vec<XRayEvent>) {
        for event in events {
            self.append(event);
        }
    }
}

/// Callback receiving the full retained event list after every change.
pub type Listener = Arc<dyn Fn(&[XRayEvent]) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct SinkState {
    events: VecDeque<XRayEvent>,
    evicted: u64,
}

/// Bounded in-memory event log backing the X-Ray dashboard.
///
/// Once `capacity` events are retained, each append evicts the oldest entry. Eviction is the
/// only way events are lost; the running total is reported by [`SinkStats::evicted`].
pub struct InMemoryTraceSink {
    capacity: usize,
    state: Mutex<SinkState>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

impl Default for InMemoryTraceSink {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl InMemoryTraceSink {
    pub const DEFAULT_CAPACITY: usize = 1000;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(SinkState::default()),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock_state().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of retained events, oldest first.
    pub fn events(&self) -> Vec<XRayEvent> {
        self.lock_state().events.iter().cloned().collect()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&[XRayEvent]) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .expect("listener mutex poisoned")
            .push((id, Arc::new(listener)));
        id
    }

    /// Returns `false` when the subscription was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().expect("listener mutex poisoned");
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn clear(&self) {
        self.lock_state().events.clear();
        self.notify();
    }

    pub fn stats(&self) -> SinkStats {
        let state = self.lock_state();
        SinkStats::from_events(state.events.iter(), state.evicted)
    }

    pub fn grouped(&self) -> Vec<ExecutionGroup> {
        group_events(&self.events())
    }

    pub fn group_stats(&self, execution_id: &ExecutionId) -> GroupStats {
        GroupStats::for_execution(&self.events(), execution_id)
    }

    pub fn query(&self, query: &EventQuery) -> Vec<XRayEvent> {
        self.lock_state()
            .events
            .iter()
            .filter(|event| query.matches(event))
            .cloned()
            .collect()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SinkState> {
        self.state.lock().expect("x-ray sink mutex poisoned")
    }

    fn push(&self, state: &mut SinkState, event: XRayEvent) -> usize {
        state.events.push_back(event);
        let mut evicted = 0;
        while state.events.len() > self.capacity {
            state.events.pop_front();
            evicted += 1;
        }
        state.evicted += evicted as u64;
        evicted
    }

    // Listeners run after the state lock is released so they may read the sink again.
    fn notify(&self) {
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .expect("listener mutex poisoned")
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        if listeners.is_empty() {
            return;
        }

        let snapshot = self.events();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

impl TraceSink for InMemoryTraceSink {
    fn append(&self, event: XRayEvent) {
        let evicted = {
            let mut state = self.lock_state();
            self.push(&mut state, event)
        };
        if evicted > 0 {
            debug!(evicted, capacity = self.capacity, "x-ray sink full; evicted oldest events");
        }
        self.notify();
    }

    fn append_batch(&self, events: Vec<XRayEvent>) {
        if events.is_empty() {
            return;
        }

        let evicted = {
            let mut state = self.lock_state();
            events
                .into_iter()
                .map(|event| self.push(&mut state, event))
                .sum::<usize>()
        };
        if evicted > 0 {
            debug!(evicted, capacity = self.capacity, "x-ray sink full; evicted oldest events");
        }
        self.notify();
    }
}
