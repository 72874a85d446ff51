//! Offer sources: where a vehicle's raw offer list comes from.
//!
//! Fetching is the caller's concern; the engine only consumes the result.
//! A source failure maps to the resolver's `Error` status.

use crate::domain::{Decimal, RawOffer, VehicleContext};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod file;
pub mod mock;

pub use file::FileOfferSource;
pub use mock::MockOfferSource;

/// Raw offers for one vehicle together with its retail price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingOffers {
    #[serde(default, deserialize_with = "crate::domain::offer::deserialize_amount")]
    pub retail_price: Option<Decimal>,
    #[serde(default)]
    pub offers: Vec<RawOffer>,
}

impl ListingOffers {
    pub fn new(retail_price: Option<Decimal>, offers: Vec<RawOffer>) -> Self {
        Self {
            retail_price,
            offers,
        }
    }

    pub fn vehicle(&self) -> VehicleContext {
        VehicleContext::new(self.retail_price)
    }
}

/// Supplies the complete offer list of one vehicle.
pub trait OfferSource: Send + Sync + std::fmt::Debug {
    fn fetch_listing(&self) -> Result<ListingOffers, OfferSourceError>;
}

#[derive(Debug, Error)]
pub enum OfferSourceError {
    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unsupported offer file format: {0}")]
    UnsupportedFormat(String),
    #[error("Error: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_source_error_display() {
        let err = OfferSourceError::Io {
            path: "offers.json".to_string(),
            message: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "I/O error reading offers.json: not found");

        let err = OfferSourceError::Parse("expected value".to_string());
        assert_eq!(err.to_string(), "Parse error: expected value");

        let err = OfferSourceError::UnsupportedFormat("xlsx".to_string());
        assert_eq!(err.to_string(), "Unsupported offer file format: xlsx");
    }

    #[test]
    fn test_listing_vehicle_context() {
        let listing = ListingOffers::new(Some(Decimal::from_u32(300_000)), Vec::new());
        assert_eq!(
            listing.vehicle().retail_price,
            Some(Decimal::from_u32(300_000))
        );
    }
}
