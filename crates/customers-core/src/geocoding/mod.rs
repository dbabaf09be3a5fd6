//! Geocoding domain module.
//!
//! Resolves a customer's postal address to a map coordinate through an
//! external [`Geocoder`], retrying with a rounded street number when the
//! provider cannot place the exact address.

mod model;
mod pipeline;

pub use model::Coordinate;
pub use pipeline::{Geocoder, GeocodingPipeline, round_street_number};
