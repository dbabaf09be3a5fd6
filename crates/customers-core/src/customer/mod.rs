//! Customer domain module.
//!
//! # Module Structure
//!
//! - `model`: The `Customer` record and its derived renderings
//! - `attribute`: Attribute identifiers, dependency graph, change notification
//! - `repository`: Persistence and seeding traits
//!
//! # Usage
//!
//! ```ignore
//! use customers_core::customer::{Customer, CustomerRepository, Field, ObservableCustomer};
//! ```

mod attribute;
mod model;
pub mod repository;

pub use attribute::{Attribute, AttributeChanged, ChangeObserver, Field, ObservableCustomer};
pub use model::{
    Customer, NO_PHOTO_URL, POSTAL_CODE_MAX_LEN, STATE_MAX_LEN, sanitize_phone_number,
};
pub use repository::{CustomerRepository, CustomerSeeder};
