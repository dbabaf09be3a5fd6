//! Address to coordinate resolution.

use std::sync::Arc;

use async_trait::async_trait;

use super::model::Coordinate;
use crate::customer::Customer;
use crate::error::{CustomersError, Result};

/// An external geocoding provider.
///
/// Returns zero or more candidate coordinates for a free-form address,
/// best match first. A `(0, 0)` candidate means the provider could not
/// place the address.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>>;
}

/// Converts customer addresses into map coordinates.
///
/// Some geocoder back-ends fail on oddly specific street numbers but succeed
/// once the number is rounded down to its hundreds block, so a sentinel
/// answer for an address starting with a digit is retried once with the
/// rounded number. The stored address is never modified.
#[derive(Clone)]
pub struct GeocodingPipeline {
    geocoder: Arc<dyn Geocoder>,
}

impl GeocodingPipeline {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    /// Resolves the coordinate of a customer's address.
    ///
    /// # Errors
    ///
    /// - [`CustomersError::GeocodingNoAddress`] when the customer has no
    ///   address; the provider is not contacted.
    /// - [`CustomersError::GeocodingFailed`] when the provider fails or
    ///   returns no usable coordinate.
    pub async fn locate(&self, customer: &Customer) -> Result<Coordinate> {
        if !customer.has_address() {
            return Err(CustomersError::GeocodingNoAddress);
        }
        self.resolve(&customer.address_string()).await
    }

    /// Resolves a single-line address string.
    pub async fn resolve(&self, address: &str) -> Result<Coordinate> {
        if address.trim().is_empty() {
            return Err(CustomersError::GeocodingNoAddress);
        }

        let mut position = self.first_candidate(address).await?;

        if position.is_sentinel() {
            if let Some(rounded) = round_street_number(address) {
                tracing::debug!(
                    "Geocoder could not place '{}', retrying as '{}'",
                    address,
                    rounded
                );
                position = self.first_candidate(&rounded).await?;
            }
        }

        if position.is_sentinel() {
            tracing::warn!("Unable to geocode address '{}'", address);
            return Err(CustomersError::geocoding_failed(address));
        }

        Ok(position)
    }

    async fn first_candidate(&self, address: &str) -> Result<Coordinate> {
        let candidates = self.geocoder.geocode(address).await.map_err(|e| {
            tracing::warn!("Geocoder error for '{}': {}", address, e);
            CustomersError::geocoding_failed(address)
        })?;
        Ok(candidates.into_iter().next().unwrap_or(Coordinate::SENTINEL))
    }
}

/// Rewrites the leading street number of `address` rounded down to the
/// nearest hundred, e.g. `"394 Pacific Ave"` becomes `"300 Pacific Ave"`.
///
/// Returns `None` when the address does not start with an ASCII digit or
/// the number does not fit in a `u64`. An already round number still yields
/// the address, so the provider is always asked a second time.
pub fn round_street_number(address: &str) -> Option<String> {
    let digits_end = address
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(address.len(), |(index, _)| index);

    if digits_end == 0 {
        return None;
    }

    let (number, rest) = address.split_at(digits_end);
    let number: u64 = number.parse().ok()?;
    Some(format!("{}{}", number / 100 * 100, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers from a fixed table and records every address it was asked.
    #[derive(Default)]
    struct TableGeocoder {
        answers: HashMap<String, Vec<Coordinate>>,
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    impl TableGeocoder {
        fn with(mut self, address: &str, candidates: Vec<Coordinate>) -> Self {
            self.answers.insert(address.to_string(), candidates);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Geocoder for TableGeocoder {
        async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>> {
            self.calls.lock().unwrap().push(address.to_string());
            if self.fail {
                return Err(CustomersError::internal("provider unavailable"));
            }
            Ok(self.answers.get(address).cloned().unwrap_or_default())
        }
    }

    fn pipeline(geocoder: &Arc<TableGeocoder>) -> GeocodingPipeline {
        GeocodingPipeline::new(geocoder.clone())
    }

    fn pacific(street: &str) -> Customer {
        Customer {
            first_name: "Evan".to_string(),
            last_name: "Armstead".to_string(),
            street: street.to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            postal_code: "94111".to_string(),
            ..Customer::new()
        }
    }

    #[tokio::test]
    async fn test_first_candidate_wins() {
        let geocoder = Arc::new(TableGeocoder::default().with(
            "394 Pacific Ave, San Francisco, CA 94111",
            vec![Coordinate::new(37.79, -122.40), Coordinate::new(1.0, 1.0)],
        ));

        let position = pipeline(&geocoder)
            .locate(&pacific("394 Pacific Ave"))
            .await
            .unwrap();

        assert_eq!(position, Coordinate::new(37.79, -122.40));
        assert_eq!(geocoder.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_rounded_street_number_fallback() {
        let geocoder = Arc::new(
            TableGeocoder::default()
                .with(
                    "394 Pacific Ave, San Francisco, CA 94111",
                    vec![Coordinate::SENTINEL],
                )
                .with(
                    "300 Pacific Ave, San Francisco, CA 94111",
                    vec![Coordinate::new(37.8, -122.4)],
                ),
        );

        let position = pipeline(&geocoder)
            .locate(&pacific("394 Pacific Ave"))
            .await
            .unwrap();

        assert_eq!(position, Coordinate::new(37.8, -122.4));
        assert_eq!(
            geocoder.calls(),
            vec![
                "394 Pacific Ave, San Francisco, CA 94111".to_string(),
                "300 Pacific Ave, San Francisco, CA 94111".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_round_number_is_still_retried() {
        let geocoder = Arc::new(TableGeocoder::default().with(
            "300 Pacific Ave, San Francisco, CA 94111",
            vec![Coordinate::SENTINEL],
        ));

        let result = pipeline(&geocoder).locate(&pacific("300 Pacific Ave")).await;

        assert!(matches!(result, Err(CustomersError::GeocodingFailed { .. })));
        assert_eq!(
            geocoder.calls(),
            vec![
                "300 Pacific Ave, San Francisco, CA 94111".to_string(),
                "300 Pacific Ave, San Francisco, CA 94111".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_leading_digit_fails_after_one_call() {
        let geocoder = Arc::new(TableGeocoder::default().with(
            "Pacific Ave, San Francisco, CA 94111",
            vec![Coordinate::SENTINEL],
        ));

        let result = pipeline(&geocoder).locate(&pacific("Pacific Ave")).await;

        assert!(matches!(result, Err(CustomersError::GeocodingFailed { .. })));
        assert_eq!(geocoder.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_candidate_list_is_sentinel() {
        let geocoder = Arc::new(TableGeocoder::default());

        let result = pipeline(&geocoder).locate(&pacific("394 Pacific Ave")).await;

        assert!(matches!(result, Err(CustomersError::GeocodingFailed { .. })));
        assert_eq!(geocoder.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_no_address_skips_provider() {
        let geocoder = Arc::new(TableGeocoder::default());
        let customer = Customer {
            first_name: "No".to_string(),
            last_name: "Address".to_string(),
            ..Customer::new()
        };

        let result = pipeline(&geocoder).locate(&customer).await;

        assert_eq!(result, Err(CustomersError::GeocodingNoAddress));
        assert!(geocoder.calls().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_is_geocoding_failed() {
        let geocoder = Arc::new(TableGeocoder {
            fail: true,
            ..TableGeocoder::default()
        });

        let result = pipeline(&geocoder).resolve("394 Pacific Ave").await;

        assert!(matches!(result, Err(CustomersError::GeocodingFailed { .. })));
        assert_eq!(geocoder.calls().len(), 1);
    }

    #[test]
    fn test_round_street_number() {
        assert_eq!(
            round_street_number("394 Pacific Ave").as_deref(),
            Some("300 Pacific Ave")
        );
        assert_eq!(round_street_number("1999 Elm").as_deref(), Some("1900 Elm"));
        assert_eq!(round_street_number("42 Wallaby Way").as_deref(), Some("0 Wallaby Way"));
        assert_eq!(round_street_number("0394 Main").as_deref(), Some("300 Main"));
        assert_eq!(
            round_street_number("300 Pacific Ave").as_deref(),
            Some("300 Pacific Ave")
        );
        assert_eq!(round_street_number("Pacific Ave"), None);
        assert_eq!(round_street_number(""), None);
        assert_eq!(round_street_number("99999999999999999999999 Long"), None);
    }

    #[test]
    fn test_round_only_touches_leading_run() {
        assert_eq!(
            round_street_number("394 394th St, CA 94111").as_deref(),
            Some("300 394th St, CA 94111")
        );
    }
}
