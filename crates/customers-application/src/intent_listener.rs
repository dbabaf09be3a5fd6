//! Bridges save/delete intents from the event bus to the customer service.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use customers_core::customer::Customer;
use customers_core::event::{AppEvent, EventBus, EventKind, SubscriptionId};

use crate::customer_service::CustomerService;

#[derive(Debug)]
enum Intent {
    Save(Customer),
    Delete(String),
}

/// Subscribes the [`CustomerService`] to `SaveCustomer` and `DeleteCustomer`.
///
/// Bus handlers are synchronous, so they only enqueue the intent; a single
/// worker task applies intents to the service one at a time, in publish
/// order. The queue is unbounded so a burst of intents is never lost.
pub struct IntentListener {
    bus: Arc<EventBus>,
    subscriptions: Vec<SubscriptionId>,
    worker: JoinHandle<()>,
}

impl IntentListener {
    /// Subscribes to the bus and starts the worker on the current runtime.
    pub fn spawn(service: Arc<CustomerService>, bus: Arc<EventBus>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let save_tx = tx.clone();
        let save = bus.subscribe(EventKind::SaveCustomer, move |event| {
            if let AppEvent::SaveCustomer(customer) = event {
                enqueue(&save_tx, Intent::Save(customer.clone()));
            }
        });

        let delete = bus.subscribe(EventKind::DeleteCustomer, move |event| {
            if let AppEvent::DeleteCustomer(customer) = event {
                enqueue(&tx, Intent::Delete(customer.id.clone()));
            }
        });

        let worker = tokio::spawn(run_worker(service, rx));

        Self {
            bus,
            subscriptions: vec![save, delete],
            worker,
        }
    }

    /// Unsubscribes from the bus and waits for queued intents to finish.
    pub async fn shutdown(self) {
        for id in &self.subscriptions {
            self.bus.unsubscribe(*id);
        }
        // The handlers owned the senders; once they are gone the worker
        // drains the queue and exits.
        if let Err(e) = self.worker.await {
            tracing::error!("Intent worker terminated abnormally: {}", e);
        }
    }
}

fn enqueue(tx: &mpsc::UnboundedSender<Intent>, intent: Intent) {
    // Only fails once the worker has stopped.
    if let Err(e) = tx.send(intent) {
        tracing::warn!("Customer intent after worker stopped: {:?}", e.0);
    }
}

async fn run_worker(service: Arc<CustomerService>, mut rx: mpsc::UnboundedReceiver<Intent>) {
    while let Some(intent) = rx.recv().await {
        let result = match intent {
            Intent::Save(customer) => service.save(customer).await.map(|_| ()),
            Intent::Delete(id) => service.delete(&id).await,
        };
        // Failures were already surfaced as alerts by the service.
        if let Err(e) = result {
            tracing::debug!("Customer intent failed: {}", e);
        }
    }
    tracing::debug!("Intent worker stopped");
}
