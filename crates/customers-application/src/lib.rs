//! Application layer for the Customers address book.
//!
//! Wires the core services to the file-backed infrastructure and exposes
//! the use cases a UI drives: the customer service, the detail coordinator
//! and the intent bridge between the event bus and the service.

pub mod bootstrap;
pub mod customer_service;
pub mod detail;
pub mod intent_listener;
pub mod logging;

pub use bootstrap::{AppBootstrap, Platform, bootstrap};
pub use customer_service::CustomerService;
pub use detail::{AttachedDetail, ContactRequest, CustomerDetail};
pub use intent_listener::IntentListener;
