//! Ties an offer source to a selection resolver for one listing.

use crate::domain::{Decimal, SelectionTarget, VehicleContext};
use crate::engine::{EngineError, LeaseQuote, ResolverStatus, SelectionResolver};
use crate::source::OfferSource;
use std::sync::Arc;

/// One listing page's lease state: fetch offers, resolve a selection, quote.
#[derive(Debug, Clone)]
pub struct ListingSession {
    source: Arc<dyn OfferSource>,
    resolver: SelectionResolver,
    retail_override: Option<Decimal>,
}

impl ListingSession {
    pub fn new(source: Arc<dyn OfferSource>, resolver: SelectionResolver) -> Self {
        Self {
            source,
            resolver,
            retail_override: None,
        }
    }

    /// Use `retail_price` instead of the one delivered with the offers.
    pub fn with_retail_price(mut self, retail_price: Option<Decimal>) -> Self {
        self.retail_override = retail_price;
        self
    }

    pub fn resolver(&self) -> &SelectionResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut SelectionResolver {
        &mut self.resolver
    }

    /// Fetch the complete offer list and rebuild the engine from it.
    pub fn refresh(&mut self, target: Option<SelectionTarget>) -> ResolverStatus {
        self.resolver.begin_loading();
        match self.source.fetch_listing() {
            Ok(listing) => {
                let vehicle =
                    VehicleContext::new(self.retail_override.or(listing.retail_price));
                self.resolver.apply_offers(&listing.offers, vehicle, target)
            }
            Err(e) => self.resolver.apply_error(e),
        }
    }

    /// Quote for the current selection, `None` unless a selection is
    /// resolved.
    pub fn quote(&self) -> Option<Result<LeaseQuote, EngineError>> {
        let engine = self.resolver.engine()?;
        let current = self.resolver.current()?;
        Some(engine.quote(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawOffer;
    use crate::source::MockOfferSource;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_refresh_and_quote() {
        let source = MockOfferSource::new()
            .with_offer(RawOffer::new(10000, 36, d("0"), d("2500")))
            .with_retail_price(d("300000"));
        let mut session = ListingSession::new(Arc::new(source), SelectionResolver::new());

        assert_eq!(session.refresh(None), ResolverStatus::Initialized);
        let quote = session.quote().unwrap().unwrap();
        assert_eq!(quote.lease_score, Some(72));
    }

    #[test]
    fn test_retail_override_wins() {
        let source = MockOfferSource::new()
            .with_offer(RawOffer::new(10000, 36, d("0"), d("2500")))
            .with_retail_price(d("300000"));
        let mut session = ListingSession::new(Arc::new(source), SelectionResolver::new())
            .with_retail_price(Some(d("100000")));

        session.refresh(None);
        let engine = session.resolver().engine().unwrap();
        assert_eq!(engine.vehicle().retail_price, Some(d("100000")));
    }

    #[test]
    fn test_failed_fetch_has_no_quote() {
        let source = MockOfferSource::new().failing("timeout");
        let mut session = ListingSession::new(Arc::new(source), SelectionResolver::new());

        assert_eq!(session.refresh(None), ResolverStatus::Error);
        assert!(session.quote().is_none());
        assert_eq!(session.resolver().last_error(), Some("Error: timeout"));
    }
}
