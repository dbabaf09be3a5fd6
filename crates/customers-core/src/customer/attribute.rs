//! Attribute identifiers and change notification for customer records.
//!
//! Writable fields are named by [`Field`]; everything a view may bind to,
//! including the derived renderings, is named by [`Attribute`]. The
//! dependency graph between the two is fixed in [`Field::dependents`].

use std::fmt;

use strum::{EnumIter, IntoStaticStr};

use super::model::Customer;

/// A writable customer attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    Company,
    JobTitle,
    Department,
    Email,
    Phone,
    Street,
    Unit,
    City,
    State,
    PostalCode,
    Country,
    PhotoUrl,
}

/// Any attribute a view can observe: a stored field or a derived rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Field(Field),
    DisplayName,
    DisplayLastNameFirst,
    AddressString,
    CityState,
    CityStatePostal,
    StatePostal,
    SmallPhotoUrl,
}

impl Field {
    /// Derived attributes whose value depends on this field.
    pub fn dependents(self) -> &'static [Attribute] {
        use Attribute::{
            AddressString, CityState, CityStatePostal, DisplayLastNameFirst, DisplayName,
            SmallPhotoUrl, StatePostal,
        };

        match self {
            Field::FirstName | Field::LastName => &[DisplayName, DisplayLastNameFirst],
            Field::Street | Field::Unit => &[AddressString],
            Field::City => &[AddressString, CityState, CityStatePostal],
            Field::State => &[AddressString, CityState, CityStatePostal, StatePostal],
            Field::PostalCode => &[AddressString, CityStatePostal, StatePostal],
            Field::PhotoUrl => &[SmallPhotoUrl],
            Field::Company
            | Field::JobTitle
            | Field::Department
            | Field::Email
            | Field::Phone
            | Field::Country => &[],
        }
    }

    /// Stable camelCase name, matching the persisted JSON key.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Reads this field from a customer.
    pub fn get(self, customer: &Customer) -> &str {
        match self {
            Field::FirstName => &customer.first_name,
            Field::LastName => &customer.last_name,
            Field::Company => &customer.company,
            Field::JobTitle => &customer.job_title,
            Field::Department => &customer.department,
            Field::Email => &customer.email,
            Field::Phone => &customer.phone,
            Field::Street => &customer.street,
            Field::Unit => &customer.unit,
            Field::City => &customer.city,
            Field::State => &customer.state,
            Field::PostalCode => &customer.postal_code,
            Field::Country => &customer.country,
            Field::PhotoUrl => &customer.photo_url,
        }
    }

    fn slot(self, customer: &mut Customer) -> &mut String {
        match self {
            Field::FirstName => &mut customer.first_name,
            Field::LastName => &mut customer.last_name,
            Field::Company => &mut customer.company,
            Field::JobTitle => &mut customer.job_title,
            Field::Department => &mut customer.department,
            Field::Email => &mut customer.email,
            Field::Phone => &mut customer.phone,
            Field::Street => &mut customer.street,
            Field::Unit => &mut customer.unit,
            Field::City => &mut customer.city,
            Field::State => &mut customer.state,
            Field::PostalCode => &mut customer.postal_code,
            Field::Country => &mut customer.country,
            Field::PhotoUrl => &mut customer.photo_url,
        }
    }
}

impl Attribute {
    /// Stable camelCase name of the attribute.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Field(field) => field.name(),
            Attribute::DisplayName => "displayName",
            Attribute::DisplayLastNameFirst => "displayLastNameFirst",
            Attribute::AddressString => "addressString",
            Attribute::CityState => "cityState",
            Attribute::CityStatePostal => "cityStatePostal",
            Attribute::StatePostal => "statePostal",
            Attribute::SmallPhotoUrl => "smallPhotoUrl",
        }
    }

    pub fn is_derived(self) -> bool {
        !matches!(self, Attribute::Field(_))
    }
}

impl From<Field> for Attribute {
    fn from(field: Field) -> Self {
        Attribute::Field(field)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Notification that an attribute of a customer changed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChanged {
    pub customer_id: String,
    pub attribute: Attribute,
}

/// Callback invoked for each [`AttributeChanged`] notification.
pub type ChangeObserver = Box<dyn Fn(&AttributeChanged) + Send + Sync>;

/// A customer being edited, with change notification.
///
/// Edit views bind to this wrapper instead of mutating a stored record;
/// the finished snapshot goes back through the customer service.
pub struct ObservableCustomer {
    customer: Customer,
    observers: Vec<ChangeObserver>,
}

impl ObservableCustomer {
    pub fn new(customer: Customer) -> Self {
        Self {
            customer,
            observers: Vec::new(),
        }
    }

    /// Registers an observer. Observers are notified in registration order.
    pub fn observe<F>(&mut self, observer: F)
    where
        F: Fn(&AttributeChanged) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// Clones the current state for handing to the service.
    pub fn snapshot(&self) -> Customer {
        self.customer.clone()
    }

    pub fn into_inner(self) -> Customer {
        self.customer
    }

    /// Assigns `value` to `field`.
    ///
    /// When the value differs from the current one, observers are notified
    /// once for the field itself and once for each dependent attribute, in
    /// that order. Returns the attributes that were announced; an equal
    /// value announces nothing.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> Vec<Attribute> {
        let value = value.into();
        let slot = field.slot(&mut self.customer);
        if *slot == value {
            return Vec::new();
        }
        *slot = value;

        let mut changed = Vec::with_capacity(1 + field.dependents().len());
        changed.push(Attribute::Field(field));
        changed.extend_from_slice(field.dependents());

        for attribute in &changed {
            let event = AttributeChanged {
                customer_id: self.customer.id.clone(),
                attribute: *attribute,
            };
            for observer in &self.observers {
                observer(&event);
            }
        }

        changed
    }
}

impl fmt::Debug for ObservableCustomer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableCustomer")
            .field("customer", &self.customer)
            .field("observers", &self.observers.len())
            .finish()
    }
}
