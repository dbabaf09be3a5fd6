//! Event domain module.
//!
//! A closed set of typed application events and the bus that routes them.
//! The string form of [`EventKind`] is kept as the wire name of each event.

mod bus;
mod model;

pub use bus::{EventBus, EventHandler, SubscriptionId};
pub use model::{Alert, AppEvent, EventKind, Question, QuestionCallback};
