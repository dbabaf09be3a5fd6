//! Error types for the Customers core.

use thiserror::Error;

/// A shared error type for the entire Customers application.
///
/// Validation and geocoding failures are typed so that the service and
/// detail layers can turn them into user-facing alerts; storage failures
/// carry a message and are logged where they are caught.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CustomersError {
    /// Save attempted with a blank first or last name.
    #[error("A customer must have both a first and last name")]
    InvalidName,

    /// Save attempted with a partially filled address.
    #[error("A customer address must have a street, city, and state combination, or a postal code")]
    InvalidAddress,

    /// Disk read/write failure in the persistent store.
    #[error("Store I/O error: {message}")]
    StoreIo { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML"
        message: String,
    },

    /// The customer has no address to geocode.
    #[error("Customer has no address")]
    GeocodingNoAddress,

    /// The geocoder returned no usable coordinate.
    #[error("Unable to geocode address '{address}'")]
    GeocodingFailed { address: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CustomersError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a StoreIo error
    pub fn store_io(message: impl Into<String>) -> Self {
        Self::StoreIo {
            message: message.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a GeocodingFailed error
    pub fn geocoding_failed(address: impl Into<String>) -> Self {
        Self::GeocodingFailed {
            address: address.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a validation error (name or address).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidName | Self::InvalidAddress)
    }

    /// Check if this is a store I/O error
    pub fn is_store_io(&self) -> bool {
        matches!(self, Self::StoreIo { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a geocoding error of either kind.
    pub fn is_geocoding(&self) -> bool {
        matches!(
            self,
            Self::GeocodingNoAddress | Self::GeocodingFailed { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for CustomersError {
    fn from(err: std::io::Error) -> Self {
        Self::StoreIo {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CustomersError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CustomersError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for CustomersError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, CustomersError>`.
pub type Result<T> = std::result::Result<T, CustomersError>;
