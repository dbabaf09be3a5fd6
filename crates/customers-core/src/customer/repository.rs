//! Customer repository and seeder traits.
//!
//! Defines the interface for customer persistence operations.

use async_trait::async_trait;

use super::model::Customer;
use crate::error::Result;

/// An abstract repository for the customer collection.
///
/// This trait defines the contract for persisting and retrieving the
/// customer collection, decoupling the service from the storage mechanism
/// (a JSON document, a database, a remote API).
///
/// # Implementation Notes
///
/// Implementations should handle:
/// - Seeding an empty or unreadable store on first access
/// - Position-preserving upserts
/// - Flushing after every mutation
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Lists the whole collection in stored order.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Customer>)`: All stored customers (freshly seeded on first run)
    /// - `Err(_)`: Error occurred while reading or seeding
    async fn load_all(&self) -> Result<Vec<Customer>>;

    /// Finds a customer by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Customer))`: Customer found
    /// - `Ok(None)`: Customer not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>>;

    /// Inserts or replaces a customer by ID.
    ///
    /// An existing record keeps its position; a new one is appended.
    async fn save(&self, customer: &Customer) -> Result<()>;

    /// Deletes a customer.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Customer deleted successfully (or didn't exist)
    /// - `Err(_)`: Error occurred during deletion
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Produces the initial collection for an empty store.
pub trait CustomerSeeder: Send + Sync {
    /// Generates `count` fresh customers, each with a unique ID.
    fn generate(&self, count: usize) -> Vec<Customer>;
}
