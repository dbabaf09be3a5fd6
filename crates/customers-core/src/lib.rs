//! Domain layer for the Customers address book.
//!
//! Holds the customer model, the query engine, the geocoding pipeline and
//! the event bus, plus the traits the infrastructure layer implements.

pub mod config;
pub mod customer;
pub mod error;
pub mod event;
pub mod geocoding;
pub mod platform;
pub mod query;

// Re-export common error type
pub use error::{CustomersError, Result};
