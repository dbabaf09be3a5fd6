//! Customer service: the single mediator between intents and the store.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::{Mutex, watch};

use customers_core::config::ServiceSettings;
use customers_core::customer::{Customer, CustomerRepository};
use customers_core::error::{CustomersError, Result};
use customers_core::event::{Alert, AppEvent, EventBus};
use customers_core::query;

#[derive(Default)]
struct ServiceState {
    /// Mirror of the store, capped at `load_cap`. `None` until first read.
    customers: Option<Vec<Customer>>,
    query: String,
}

/// Mediates every read and mutation of the customer collection.
///
/// Each intent runs under one async lock, so intents are atomic with respect
/// to each other and a completed `save` is visible to every later read.
/// After each change the visible list (the collection ranked by the current
/// query) is published on a `watch` channel.
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
    bus: Arc<EventBus>,
    settings: ServiceSettings,
    state: Mutex<ServiceState>,
    snapshots: watch::Sender<Vec<Customer>>,
}

impl CustomerService {
    pub fn new(
        repository: Arc<dyn CustomerRepository>,
        bus: Arc<EventBus>,
        settings: ServiceSettings,
    ) -> Self {
        let (snapshots, _) = watch::channel(Vec::new());
        Self {
            repository,
            bus,
            settings,
            state: Mutex::new(ServiceState::default()),
            snapshots,
        }
    }

    /// Receives the visible list after every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Customer>> {
        self.snapshots.subscribe()
    }

    /// The most recently published visible list.
    pub fn snapshot(&self) -> Vec<Customer> {
        self.snapshots.borrow().clone()
    }

    /// Reloads the collection from the store and publishes the visible list.
    pub async fn load(&self) -> Result<Vec<Customer>> {
        self.simulate_latency().await;

        let mut state = self.state.lock().await;
        let customers = self.fetch().await?;
        tracing::info!("Loaded {} customers", customers.len());
        state.customers = Some(customers);
        Ok(self.publish(&state))
    }

    /// Normalizes, validates and persists `customer`.
    ///
    /// Validation failures publish the matching alert; store failures are
    /// logged and publish a generic alert. The error is returned either way.
    pub async fn save(&self, customer: Customer) -> Result<Customer> {
        let customer = customer.normalized();
        if let Err(e) = customer.validate() {
            tracing::debug!("Rejected customer {}: {}", customer.id, e);
            self.alert_for(&e);
            return Err(e);
        }

        let mut state = self.state.lock().await;
        if let Err(e) = self.repository.save(&customer).await {
            tracing::error!("Failed to save customer {}: {}", customer.id, e);
            self.alert_for(&e);
            return Err(e);
        }

        state.customers = Some(self.fetch().await?);
        self.publish(&state);
        tracing::info!("Saved customer {}", customer.id);
        Ok(customer)
    }

    /// Removes the customer with `id`; unknown ids are ignored.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if let Err(e) = self.repository.delete(id).await {
            tracing::error!("Failed to delete customer {}: {}", id, e);
            self.alert_for(&e);
            return Err(e);
        }

        state.customers = Some(self.fetch().await?);
        self.publish(&state);
        tracing::info!("Deleted customer {}", id);
        Ok(())
    }

    /// Looks up a stored customer by id.
    pub async fn find(&self, id: &str) -> Result<Customer> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CustomersError::not_found("Customer", id))
    }

    /// Re-ranks the in-memory collection for a new search text.
    pub async fn query_changed(&self, text: &str) -> Result<Vec<Customer>> {
        let mut state = self.state.lock().await;
        if state.customers.is_none() {
            state.customers = Some(self.fetch().await?);
        }
        state.query = text.to_string();
        tracing::debug!("Query changed to {:?}", text);
        Ok(self.publish(&state))
    }

    /// Returns the page `[start, start + count)` of the collection ranked
    /// against `query`.
    pub async fn get_items(&self, start: usize, count: usize, query: &str) -> Result<Vec<Customer>> {
        self.simulate_latency().await;

        let mut state = self.state.lock().await;
        if state.customers.is_none() {
            state.customers = Some(self.fetch().await?);
        }
        let customers = state.customers.as_deref().unwrap_or_default();
        Ok(query::get_items(customers, start, count, query))
    }

    /// Reads the store, capped at `load_cap`. Failures are logged and
    /// surfaced as the generic alert before being returned.
    async fn fetch(&self) -> Result<Vec<Customer>> {
        match self.repository.load_all().await {
            Ok(mut customers) => {
                customers.truncate(self.settings.load_cap);
                Ok(customers)
            }
            Err(e) => {
                tracing::error!("Failed to read customers: {}", e);
                self.alert_for(&e);
                Err(e)
            }
        }
    }

    fn publish(&self, state: &ServiceState) -> Vec<Customer> {
        let customers = state.customers.as_deref().unwrap_or_default();
        let visible: Vec<Customer> = query::rank(customers, &state.query)
            .into_iter()
            .cloned()
            .collect();
        self.snapshots.send_replace(visible.clone());
        visible
    }

    fn alert_for(&self, error: &CustomersError) {
        let alert = match error {
            CustomersError::InvalidName => Alert::invalid_name(),
            CustomersError::InvalidAddress => Alert::invalid_address(),
            _ => Alert::store_failure(),
        };
        self.bus.publish(AppEvent::DisplayAlert(alert));
    }

    async fn simulate_latency(&self) {
        if !self.settings.simulate_latency || self.settings.max_latency_ms == 0 {
            return;
        }
        let delay = rand::thread_rng().gen_range(0..self.settings.max_latency_ms);
        tracing::debug!("Simulating {}ms of latency", delay);
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
}
