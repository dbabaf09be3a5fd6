//! Application events and their payloads.

use std::fmt;
use std::sync::Arc;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::customer::Customer;

/// A modal alert with a single dismiss button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub cancel: String,
}

impl Alert {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        cancel: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            cancel: cancel.into(),
        }
    }

    pub fn invalid_name() -> Self {
        Self::new(
            "Invalid name!",
            "A customer must have both a first and last name.",
            "OK",
        )
    }

    pub fn invalid_address() -> Self {
        Self::new(
            "Invalid address!",
            "You must enter either a street, city, and state combination, or a postal code.",
            "OK",
        )
    }

    pub fn geocoding_error() -> Self {
        Self::new(
            "Geocoding Error",
            "Please make sure the address is valid.",
            "OK",
        )
    }

    pub fn store_failure() -> Self {
        Self::new(
            "Something went wrong",
            "Your changes could not be saved. Please try again.",
            "OK",
        )
    }

    /// Explains that the current device lacks a contact capability.
    pub fn simulator_not_supported(message: impl Into<String>) -> Self {
        Self::new("Simulator Not Supported", message, "OK")
    }
}

/// Callback receiving the user's answer to a [`Question`].
pub type QuestionCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// A yes/no prompt; the view calls [`Question::complete`] with the answer.
#[derive(Clone)]
pub struct Question {
    pub title: String,
    pub question: Option<String>,
    pub positive: String,
    pub negative: String,
    on_completed: QuestionCallback,
}

impl Question {
    pub fn new<F>(
        title: impl Into<String>,
        question: Option<String>,
        positive: impl Into<String>,
        negative: impl Into<String>,
        on_completed: F,
    ) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        Self {
            title: title.into(),
            question,
            positive: positive.into(),
            negative: negative.into(),
            on_completed: Arc::new(on_completed),
        }
    }

    pub fn complete(&self, answer: bool) {
        (self.on_completed)(answer);
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("title", &self.title)
            .field("question", &self.question)
            .field("positive", &self.positive)
            .field("negative", &self.negative)
            .finish_non_exhaustive()
    }
}

/// Everything that travels over the [`EventBus`](super::EventBus).
#[derive(Debug, Clone)]
pub enum AppEvent {
    DisplayAlert(Alert),
    DisplayQuestion(Question),
    DisplayGeocodingError,
    SaveCustomer(Customer),
    DeleteCustomer(Customer),
    CustomerLocationUpdated(Customer),
    SetupMap,
    NavigateToDetail(Customer),
    NavigateToEdit(Customer),
    PopAsync { animated: bool },
}

/// Routing key of an [`AppEvent`].
///
/// The string form is the wire name used when events are serialized or
/// logged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
pub enum EventKind {
    DisplayAlert,
    DisplayQuestion,
    DisplayGeocodingError,
    SaveCustomer,
    DeleteCustomer,
    CustomerLocationUpdated,
    SetupMap,
    NavigateToDetail,
    NavigateToEdit,
    PopAsync,
}

impl AppEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            AppEvent::DisplayAlert(_) => EventKind::DisplayAlert,
            AppEvent::DisplayQuestion(_) => EventKind::DisplayQuestion,
            AppEvent::DisplayGeocodingError => EventKind::DisplayGeocodingError,
            AppEvent::SaveCustomer(_) => EventKind::SaveCustomer,
            AppEvent::DeleteCustomer(_) => EventKind::DeleteCustomer,
            AppEvent::CustomerLocationUpdated(_) => EventKind::CustomerLocationUpdated,
            AppEvent::SetupMap => EventKind::SetupMap,
            AppEvent::NavigateToDetail(_) => EventKind::NavigateToDetail,
            AppEvent::NavigateToEdit(_) => EventKind::NavigateToEdit,
            AppEvent::PopAsync { .. } => EventKind::PopAsync,
        }
    }

    /// The customer carried by the event, if any.
    pub fn customer(&self) -> Option<&Customer> {
        match self {
            AppEvent::SaveCustomer(customer)
            | AppEvent::DeleteCustomer(customer)
            | AppEvent::CustomerLocationUpdated(customer)
            | AppEvent::NavigateToDetail(customer)
            | AppEvent::NavigateToEdit(customer) => Some(customer),
            _ => None,
        }
    }
}
