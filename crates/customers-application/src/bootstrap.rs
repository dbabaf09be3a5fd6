//! Application start-up: builds and wires every long-lived service.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use customers_core::config::CustomersConfig;
use customers_core::customer::{Customer, CustomerRepository};
use customers_core::event::EventBus;
use customers_core::geocoding::{Geocoder, GeocodingPipeline};
use customers_core::platform::{CapabilityService, Localization};
use customers_infrastructure::{
    ConfigService, CustomersPaths, FakeCustomerSeeder, JsonCustomerRepository,
};

use crate::customer_service::CustomerService;
use crate::detail::{AttachedDetail, CustomerDetail};
use crate::intent_listener::IntentListener;
use crate::logging;

/// Services the host platform provides.
pub struct Platform {
    pub geocoder: Arc<dyn Geocoder>,
    pub capabilities: Arc<dyn CapabilityService>,
    pub localization: Arc<dyn Localization>,
}

/// The wired application: every long-lived service, built once.
pub struct AppBootstrap {
    pub config: CustomersConfig,
    pub paths: CustomersPaths,
    pub bus: Arc<EventBus>,
    pub repository: Arc<dyn CustomerRepository>,
    pub customer_service: Arc<CustomerService>,
    pub geocoding: GeocodingPipeline,
    pub capabilities: Arc<dyn CapabilityService>,
    intent_listener: IntentListener,
}

impl AppBootstrap {
    /// Opens the detail view for `customer`, or for a new customer.
    pub fn open_detail(&self, customer: Option<Customer>) -> CustomerDetail {
        CustomerDetail::new(
            customer,
            self.bus.clone(),
            self.geocoding.clone(),
            self.capabilities.clone(),
        )
    }

    /// Opens a detail view that follows saves and location updates on the
    /// bus until it is dropped.
    pub fn attach_detail(&self, customer: Option<Customer>) -> AttachedDetail {
        self.open_detail(customer).attach()
    }

    /// Stops listening for intents once the queued ones are applied.
    pub async fn shutdown(self) {
        self.intent_listener.shutdown().await;
        tracing::info!("[Bootstrap] Shut down");
    }
}

/// Composition root.
///
/// `base_dir` replaces the platform data directory. Must run inside a tokio
/// runtime; the intent worker is spawned on it.
pub async fn bootstrap(base_dir: Option<&Path>, platform: Platform) -> Result<AppBootstrap> {
    let paths = CustomersPaths::new(base_dir);
    let data_dir = paths
        .ensure_data_dir()
        .context("Failed to create data directory")?;

    let config_service = ConfigService::from_paths(&paths).context("Failed to locate config")?;
    let config = config_service.get_config();

    if let Err(e) = logging::init(&config.logging.level) {
        tracing::debug!("[Bootstrap] Keeping existing subscriber: {}", e);
    }
    tracing::info!("[Bootstrap] Data directory: {}", data_dir.display());

    let seeder = Arc::new(FakeCustomerSeeder::new(platform.localization.clone()));
    let repository: Arc<dyn CustomerRepository> = Arc::new(
        JsonCustomerRepository::from_paths(&paths, &config.store, seeder)
            .context("Failed to locate customer store")?,
    );

    let bus = Arc::new(EventBus::new());
    let customer_service = Arc::new(CustomerService::new(
        repository.clone(),
        bus.clone(),
        config.service.clone(),
    ));
    let intent_listener = IntentListener::spawn(customer_service.clone(), bus.clone());

    let customers = customer_service
        .load()
        .await
        .context("Failed to load customers")?;
    tracing::info!("[Bootstrap] {} customers available", customers.len());

    Ok(AppBootstrap {
        config,
        paths,
        bus,
        repository,
        customer_service,
        geocoding: GeocodingPipeline::new(platform.geocoder),
        capabilities: platform.capabilities,
        intent_listener,
    })
}
