//! In-process publish/subscribe.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::model::{AppEvent, EventKind};

/// Callback invoked for each delivered event.
pub type EventHandler = Arc<dyn Fn(&AppEvent) + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    handler: EventHandler,
    active: Arc<AtomicBool>,
}

#[derive(Default)]
struct BusState {
    subscriptions: Vec<Subscription>,
    next_id: u64,
    pending: VecDeque<AppEvent>,
    delivering: bool,
}

/// Publish/subscribe keyed by [`EventKind`].
///
/// - Publishing is fire-and-forget; handlers run synchronously on the
///   publishing thread.
/// - Handlers of a kind run in subscription order, over a snapshot of the
///   subscriber list, so they may subscribe or unsubscribe freely.
/// - Events published while another event is being delivered are queued and
///   delivered afterwards, so every subscriber sees events in publish order.
/// - A handler is never invoked after its unsubscribe returns.
///
/// Built once at start-up and shared as `Arc<EventBus>`.
#[derive(Default)]
pub struct EventBus {
    state: Mutex<BusState>,
}

/// Clears the delivering flag if a handler panics mid-delivery.
struct DeliveryGuard<'a> {
    bus: &'a EventBus,
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut state = self.bus.lock();
            state.delivering = false;
            state.pending.clear();
        }
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers `handler` for every event of `kind` published from now on.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let mut state = self.lock();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.subscriptions.push(Subscription {
            id,
            kind,
            handler: Arc::new(handler),
            active: Arc::new(AtomicBool::new(true)),
        });
        tracing::trace!("Subscribed {:?} to {}", id, kind);
        id
    }

    /// Removes a subscription.
    ///
    /// Returns `true` the first time it is called for `id`, `false` after.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.lock();
        match state.subscriptions.iter().position(|s| s.id == id) {
            Some(index) => {
                let subscription = state.subscriptions.remove(index);
                subscription.active.store(false, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    /// Number of live subscriptions for `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.lock()
            .subscriptions
            .iter()
            .filter(|s| s.kind == kind)
            .count()
    }

    /// Delivers `event` to every subscriber of its kind.
    pub fn publish(&self, event: AppEvent) {
        {
            let mut state = self.lock();
            state.pending.push_back(event);
            if state.delivering {
                // the outer publish drains the queue
                return;
            }
            state.delivering = true;
        }

        let _guard = DeliveryGuard { bus: self };

        loop {
            let (event, targets) = {
                let mut state = self.lock();
                let Some(event) = state.pending.pop_front() else {
                    state.delivering = false;
                    return;
                };
                let kind = event.kind();
                let targets: Vec<(EventHandler, Arc<AtomicBool>)> = state
                    .subscriptions
                    .iter()
                    .filter(|s| s.kind == kind)
                    .map(|s| (s.handler.clone(), s.active.clone()))
                    .collect();
                (event, targets)
            };

            tracing::debug!(
                "Delivering {} to {} subscriber(s)",
                event.kind(),
                targets.len()
            );

            for (handler, active) in targets {
                if active.load(Ordering::SeqCst) {
                    handler(&event);
                }
            }
        }
    }
}
