//! Offer files on disk: JSON documents and CSV offer sheets.

use super::{ListingOffers, OfferSource, OfferSourceError};
use crate::domain::{parse_amount, RawOffer};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads a vehicle's offers from a `.json` or `.csv` file.
///
/// JSON may be a bare array of offers or an object
/// `{ "retail_price": ..., "offers": [...] }`. CSV needs a header row naming
/// `monthly_price`, `first_payment`, `period_months`, `mileage_per_year` and
/// optionally `retail_price`; other columns are ignored.
#[derive(Debug, Clone)]
pub struct FileOfferSource {
    path: PathBuf,
}

impl FileOfferSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse_json(bytes: &[u8]) -> Result<ListingOffers, OfferSourceError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| OfferSourceError::Parse(e.to_string()))?;

        match value {
            serde_json::Value::Array(_) => {
                let offers: Vec<RawOffer> = serde_json::from_value(value)
                    .map_err(|e| OfferSourceError::Parse(e.to_string()))?;
                Ok(ListingOffers::new(None, offers))
            }
            serde_json::Value::Object(_) => serde_json::from_value(value)
                .map_err(|e| OfferSourceError::Parse(e.to_string())),
            other => Err(OfferSourceError::Parse(format!(
                "expected an array or object of offers, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn parse_csv(bytes: &[u8]) -> Result<ListingOffers, OfferSourceError> {
        #[derive(Debug, Deserialize)]
        struct Row {
            #[serde(default, alias = "monthly_payment")]
            monthly_price: Option<String>,
            #[serde(default)]
            first_payment: Option<String>,
            #[serde(default, alias = "lease_period_months")]
            period_months: Option<String>,
            #[serde(default, alias = "annual_kilometers")]
            mileage_per_year: Option<String>,
            #[serde(default)]
            retail_price: Option<String>,
        }

        fn amount(field: &Option<String>) -> Option<crate::domain::Decimal> {
            field.as_deref().and_then(parse_amount)
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let mut retail_price = None;
        let mut offers = Vec::new();
        for record in reader.deserialize::<Row>() {
            let row = record.map_err(|e| OfferSourceError::Parse(e.to_string()))?;
            if retail_price.is_none() {
                retail_price = amount(&row.retail_price);
            }
            offers.push(RawOffer {
                monthly_price: amount(&row.monthly_price),
                first_payment: amount(&row.first_payment),
                period_months: amount(&row.period_months),
                mileage_per_year: amount(&row.mileage_per_year),
            });
        }

        Ok(ListingOffers::new(retail_price, offers))
    }
}

impl OfferSource for FileOfferSource {
    fn fetch_listing(&self) -> Result<ListingOffers, OfferSourceError> {
        let bytes = std::fs::read(&self.path).map_err(|e| OfferSourceError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let listing = match extension.as_str() {
            "json" => Self::parse_json(&bytes)?,
            "csv" => Self::parse_csv(&bytes)?,
            other => return Err(OfferSourceError::UnsupportedFormat(other.to_string())),
        };

        debug!(
            path = %self.path.display(),
            offers = listing.offers.len(),
            "Loaded offer file"
        );
        Ok(listing)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
