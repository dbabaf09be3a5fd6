//! Infrastructure layer for the Customers address book.
//!
//! File-backed implementations of the traits declared in `customers-core`:
//! the JSON customer store, the fake-data seeder, configuration loading and
//! path resolution.

pub mod config_service;
pub mod json_customer_repository;
pub mod localization;
pub mod paths;
pub mod seed;
pub mod storage;

pub use config_service::ConfigService;
pub use json_customer_repository::JsonCustomerRepository;
pub use localization::InvariantLocalization;
pub use paths::CustomersPaths;
pub use seed::FakeCustomerSeeder;
