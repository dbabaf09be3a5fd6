//! Customer domain model.
//!
//! `Customer` is the sole persisted entity. Everything a view renders beyond
//! the stored fields (display names, address lines, thumbnails) is derived
//! on demand and never serialized.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CustomersError, Result};

/// Sentinel photo URL meaning "no photo".
pub const NO_PHOTO_URL: &str = "placeholderProfileImage";

/// Maximum length of a normalized state abbreviation.
pub const STATE_MAX_LEN: usize = 2;

/// Maximum length of a normalized postal code.
pub const POSTAL_CODE_MAX_LEN: usize = 5;

/// An address-book record.
///
/// Serialized with camelCase field names. Missing fields load as empty
/// strings and unknown fields are ignored, so older documents stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    /// Globally unique identifier, immutable once assigned.
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub job_title: String,
    pub department: String,
    pub email: String,
    /// Free-form phone number; see [`Customer::sanitized_phone`].
    pub phone: String,
    pub street: String,
    pub unit: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// Informational only; populated by the seeder.
    pub country: String,
    pub photo_url: String,
}

impl Default for Customer {
    fn default() -> Self {
        Self {
            id: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            company: String::new(),
            job_title: String::new(),
            department: String::new(),
            email: String::new(),
            phone: String::new(),
            street: String::new(),
            unit: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: String::new(),
            photo_url: NO_PHOTO_URL.to_string(),
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Joins the non-blank parts (trimmed) with `separator`.
fn join_present(parts: &[&str], separator: &str) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

impl Customer {
    /// Creates an empty customer with a fresh identifier.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ..Self::default()
        }
    }

    /// `"First Last"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// `"Last, First"`.
    pub fn display_last_name_first(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    /// Single-line postal address.
    ///
    /// Rendered as `street[ unit], [city, ]state postalCode`, dropping any
    /// blank group so that no doubled spaces or stray commas appear.
    pub fn address_string(&self) -> String {
        let street_line = join_present(&[&self.street, &self.unit], " ");
        let state_postal = self.state_postal();
        join_present(&[&street_line, &self.city, &state_postal], ", ")
    }

    /// `"City, ST"`.
    pub fn city_state(&self) -> String {
        join_present(&[&self.city, &self.state], ", ")
    }

    /// `"City, ST 12345"`.
    pub fn city_state_postal(&self) -> String {
        let city_state = self.city_state();
        join_present(&[&city_state, &self.postal_code], " ")
    }

    /// `"ST 12345"`.
    pub fn state_postal(&self) -> String {
        join_present(&[&self.state, &self.postal_code], " ")
    }

    /// Thumbnail URL used by list rows.
    pub fn small_photo_url(&self) -> &str {
        &self.photo_url
    }

    pub fn has_photo(&self) -> bool {
        !is_blank(&self.photo_url) && self.photo_url != NO_PHOTO_URL
    }

    /// The digits of [`Customer::phone`], suitable for dialling.
    pub fn sanitized_phone(&self) -> String {
        sanitize_phone_number(&self.phone)
    }

    pub fn has_email(&self) -> bool {
        !is_blank(&self.email)
    }

    pub fn has_phone(&self) -> bool {
        !is_blank(&self.phone)
    }

    /// Whether any address field is filled in.
    pub fn has_address(&self) -> bool {
        !is_blank(&self.address_string())
    }

    /// Returns a copy with state and postal code brought into their stored
    /// shape: trimmed, state uppercased and clipped to two characters, postal
    /// code clipped to five.
    pub fn normalized(&self) -> Self {
        let mut customer = self.clone();
        customer.state = customer
            .state
            .trim()
            .to_uppercase()
            .chars()
            .take(STATE_MAX_LEN)
            .collect();
        customer.postal_code = customer
            .postal_code
            .trim()
            .chars()
            .take(POSTAL_CODE_MAX_LEN)
            .collect();
        customer
    }

    /// Checks the invariants every persisted record must satisfy.
    ///
    /// # Errors
    ///
    /// - [`CustomersError::InvalidName`] when first or last name is blank.
    /// - [`CustomersError::InvalidAddress`] when the address is partially
    ///   filled: neither street + city + state, nor a postal code.
    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.first_name) || is_blank(&self.last_name) {
            return Err(CustomersError::InvalidName);
        }

        if !self.has_address() {
            return Ok(());
        }

        let full_street_address =
            !is_blank(&self.street) && !is_blank(&self.city) && !is_blank(&self.state);
        if full_street_address || !is_blank(&self.postal_code) {
            Ok(())
        } else {
            Err(CustomersError::InvalidAddress)
        }
    }
}

/// Strips everything but ASCII and Unicode decimal digits.
pub fn sanitize_phone_number(value: &str) -> String {
    value.chars().filter(|c| c.is_numeric()).collect()
}
