//! In-memory offer source for tests.

use super::{ListingOffers, OfferSource, OfferSourceError};
use crate::domain::{Decimal, RawOffer};

/// Returns predefined offers, or a predefined failure.
#[derive(Debug, Clone, Default)]
pub struct MockOfferSource {
    listing: ListingOffers,
    failure: Option<String>,
}

impl MockOfferSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offer(mut self, offer: RawOffer) -> Self {
        self.listing.offers.push(offer);
        self
    }

    pub fn with_offers(mut self, offers: Vec<RawOffer>) -> Self {
        self.listing.offers.extend(offers);
        self
    }

    pub fn with_retail_price(mut self, retail_price: Decimal) -> Self {
        self.listing.retail_price = Some(retail_price);
        self
    }

    /// Make every fetch fail with `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }
}

impl OfferSource for MockOfferSource {
    fn fetch_listing(&self) -> Result<ListingOffers, OfferSourceError> {
        match &self.failure {
            Some(message) => Err(OfferSourceError::Other(message.clone())),
            None => Ok(self.listing.clone()),
        }
    }
}
