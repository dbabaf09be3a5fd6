//! Detail and edit view coordination for a single customer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use strum::IntoEnumIterator;

use customers_core::customer::{Attribute, AttributeChanged, Customer, Field, ObservableCustomer};
use customers_core::error::{CustomersError, Result};
use customers_core::event::{Alert, AppEvent, EventBus, EventKind, Question, SubscriptionId};
use customers_core::geocoding::{Coordinate, GeocodingPipeline};
use customers_core::platform::CapabilityService;

pub const NEW_CUSTOMER_TITLE: &str = "New Customer";

const CALLS_UNSUPPORTED: &str = "Phone calls are not supported in the iOS simulator.";
const MESSAGING_UNSUPPORTED: &str = "Messaging is not supported in the iOS simulator.";
const EMAIL_UNSUPPORTED: &str = "Email composition is not supported in the iOS simulator.";

/// A request for the host to hand off to the platform dialer, messenger or
/// mail composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactRequest {
    /// Digits only.
    Dial(String),
    /// Digits only.
    Message(String),
    Email(String),
}

/// View logic behind the customer detail and edit screens.
///
/// Holds the record being viewed or edited, turns user actions into bus
/// events, and resolves the map position through the geocoding pipeline.
pub struct CustomerDetail {
    customer: ObservableCustomer,
    is_new: bool,
    /// Address last shown on the map.
    shown_address: String,
    bus: Arc<EventBus>,
    geocoding: GeocodingPipeline,
    capabilities: Arc<dyn CapabilityService>,
}

impl CustomerDetail {
    /// Opens an existing customer, or a blank new one when `customer` is
    /// `None`.
    pub fn new(
        customer: Option<Customer>,
        bus: Arc<EventBus>,
        geocoding: GeocodingPipeline,
        capabilities: Arc<dyn CapabilityService>,
    ) -> Self {
        let is_new = customer.is_none();
        let customer = customer.unwrap_or_else(Customer::new);
        Self {
            shown_address: customer.address_string(),
            customer: ObservableCustomer::new(customer),
            is_new,
            bus,
            geocoding,
            capabilities,
        }
    }

    pub fn customer(&self) -> &Customer {
        self.customer.customer()
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn title(&self) -> String {
        if self.is_new {
            NEW_CUSTOMER_TITLE.to_string()
        } else {
            self.customer().display_last_name_first()
        }
    }

    pub fn has_address(&self) -> bool {
        self.customer().has_address()
    }

    pub fn has_email(&self) -> bool {
        self.customer().has_email()
    }

    pub fn has_phone(&self) -> bool {
        self.customer().has_phone()
    }

    /// Registers a binding for attribute change notifications.
    pub fn observe<F>(&mut self, observer: F)
    where
        F: Fn(&AttributeChanged) + Send + Sync + 'static,
    {
        self.customer.observe(observer);
    }

    /// Applies an edit from the form.
    pub fn edit(&mut self, field: Field, value: impl Into<String>) -> Vec<Attribute> {
        self.customer.set(field, value)
    }

    /// Validates the edited record and, if valid, asks for it to be saved and
    /// closes the editor. Otherwise publishes the matching alert.
    pub fn request_save(&self) -> Result<()> {
        let customer = self.customer.snapshot().normalized();
        if let Err(e) = customer.validate() {
            let alert = match e {
                CustomersError::InvalidName => Alert::invalid_name(),
                _ => Alert::invalid_address(),
            };
            self.bus.publish(AppEvent::DisplayAlert(alert));
            return Err(e);
        }

        self.bus.publish(AppEvent::SaveCustomer(customer));
        self.bus.publish(AppEvent::PopAsync { animated: true });
        Ok(())
    }

    /// Asks the user to confirm deletion. On confirmation both the editor and
    /// the detail screen are closed before the delete intent goes out.
    pub fn request_delete(&self) {
        let customer = self.customer.snapshot();
        let bus = self.bus.clone();
        let title = format!("Delete {}?", customer.display_name());

        let question = Question::new(title, None, "Delete", "Cancel", move |confirmed| {
            if !confirmed {
                return;
            }
            bus.publish(AppEvent::PopAsync { animated: false });
            bus.publish(AppEvent::PopAsync { animated: true });
            bus.publish(AppEvent::DeleteCustomer(customer.clone()));
        });

        self.bus.publish(AppEvent::DisplayQuestion(question));
    }

    /// Adopts a saved snapshot of this customer.
    ///
    /// Publishes `CustomerLocationUpdated` when the address differs from the
    /// one last shown. Snapshots of other customers are ignored.
    pub fn customer_saved(&mut self, saved: &Customer) {
        if saved.id != self.customer().id {
            return;
        }

        for field in Field::iter() {
            self.customer.set(field, field.get(saved));
        }
        self.is_new = false;

        let address = saved.address_string();
        if address != self.shown_address {
            tracing::debug!("Address of customer {} changed", saved.id);
            self.shown_address = address;
            self.bus
                .publish(AppEvent::CustomerLocationUpdated(self.customer.snapshot()));
        }
    }

    /// Requests a map for the customer when there is an address to show.
    pub fn setup_map(&self) {
        if self.has_address() {
            self.bus.publish(AppEvent::SetupMap);
        }
    }

    /// Geocodes the customer's address.
    ///
    /// Returns `None` without any event when there is no address, and
    /// publishes `DisplayGeocodingError` when the address cannot be placed.
    pub async fn resolve_position(&self) -> Option<Coordinate> {
        resolve(&self.geocoding, &self.bus, self.customer()).await
    }

    /// Keeps this detail current with the bus until the returned handle is
    /// dropped.
    ///
    /// `SaveCustomer` for this record goes through
    /// [`customer_saved`](Self::customer_saved), and `CustomerLocationUpdated`
    /// for it redraws the map with [`setup_map`](Self::setup_map).
    pub fn attach(self) -> AttachedDetail {
        let bus = self.bus.clone();
        let shared = Arc::new(SharedDetail {
            detail: Mutex::new(self),
            inbox: Mutex::new(VecDeque::new()),
        });

        let subscriptions = [EventKind::SaveCustomer, EventKind::CustomerLocationUpdated]
            .into_iter()
            .map(|kind| {
                let shared = shared.clone();
                bus.subscribe(kind, move |event| shared.deliver(event))
            })
            .collect();

        AttachedDetail {
            shared,
            bus,
            subscriptions,
        }
    }

    fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::SaveCustomer(saved) => self.customer_saved(&saved),
            AppEvent::CustomerLocationUpdated(updated) if updated.id == self.customer().id => {
                self.setup_map()
            }
            _ => {}
        }
    }

    pub fn dial(&self) -> Option<ContactRequest> {
        if !self.has_phone() {
            return None;
        }
        self.contact(
            self.capabilities.can_make_calls(),
            CALLS_UNSUPPORTED,
            ContactRequest::Dial(self.customer().sanitized_phone()),
        )
    }

    pub fn message(&self) -> Option<ContactRequest> {
        if !self.has_phone() {
            return None;
        }
        self.contact(
            self.capabilities.can_send_messages(),
            MESSAGING_UNSUPPORTED,
            ContactRequest::Message(self.customer().sanitized_phone()),
        )
    }

    pub fn email(&self) -> Option<ContactRequest> {
        if !self.has_email() {
            return None;
        }
        self.contact(
            self.capabilities.can_send_email(),
            EMAIL_UNSUPPORTED,
            ContactRequest::Email(self.customer().email.clone()),
        )
    }

    fn contact(
        &self,
        supported: bool,
        unsupported_message: &str,
        request: ContactRequest,
    ) -> Option<ContactRequest> {
        if supported {
            return Some(request);
        }
        self.bus
            .publish(AppEvent::DisplayAlert(Alert::simulator_not_supported(unsupported_message)));
        None
    }
}

async fn resolve(
    geocoding: &GeocodingPipeline,
    bus: &EventBus,
    customer: &Customer,
) -> Option<Coordinate> {
    match geocoding.locate(customer).await {
        Ok(position) => Some(position),
        Err(CustomersError::GeocodingNoAddress) => None,
        Err(e) => {
            tracing::warn!("Could not resolve position of {}: {}", customer.id, e);
            bus.publish(AppEvent::DisplayGeocodingError);
            None
        }
    }
}

struct SharedDetail {
    detail: Mutex<CustomerDetail>,
    /// Bus events waiting for the detail to be free.
    inbox: Mutex<VecDeque<AppEvent>>,
}

impl SharedDetail {
    fn lock(&self) -> MutexGuard<'_, CustomerDetail> {
        self.detail.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn try_lock(&self) -> Option<MutexGuard<'_, CustomerDetail>> {
        match self.detail.try_lock() {
            Ok(detail) => Some(detail),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    fn inbox(&self) -> MutexGuard<'_, VecDeque<AppEvent>> {
        self.inbox.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn deliver(&self, event: &AppEvent) {
        self.inbox().push_back(event.clone());
        self.drain();
    }

    /// Applies queued events unless someone else holds the detail; whoever
    /// holds it drains after releasing.
    fn drain(&self) {
        loop {
            {
                let Some(mut detail) = self.try_lock() else {
                    return;
                };
                loop {
                    let next = self.inbox().pop_front();
                    match next {
                        Some(event) => detail.apply(event),
                        None => break,
                    }
                }
            }
            if self.inbox().is_empty() {
                return;
            }
        }
    }
}

/// A [`CustomerDetail`] subscribed to the bus. Dropping it unsubscribes.
///
/// Events that arrive while the detail is borrowed through [`with`](Self::with)
/// are applied as soon as the borrow ends, so a host may publish from inside
/// the closure.
pub struct AttachedDetail {
    shared: Arc<SharedDetail>,
    bus: Arc<EventBus>,
    subscriptions: Vec<SubscriptionId>,
}

impl AttachedDetail {
    /// Runs `f` with exclusive access to the detail.
    pub fn with<R>(&self, f: impl FnOnce(&mut CustomerDetail) -> R) -> R {
        let result = {
            let mut detail = self.shared.lock();
            f(&mut detail)
        };
        self.shared.drain();
        result
    }

    pub fn customer(&self) -> Customer {
        self.with(|detail| detail.customer().clone())
    }

    pub async fn resolve_position(&self) -> Option<Coordinate> {
        let (geocoding, customer) =
            self.with(|detail| (detail.geocoding.clone(), detail.customer().clone()));
        resolve(&geocoding, &self.bus, &customer).await
    }
}

impl Drop for AttachedDetail {
    fn drop(&mut self) {
        for id in &self.subscriptions {
            self.bus.unsubscribe(*id);
        }
    }
}
