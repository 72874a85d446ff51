//! Validated lease options and selections.

use crate::domain::{Decimal, RawOffer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One priced offer for a vehicle.
///
/// Always satisfies: mileage and period > 0, first payment >= 0, monthly
/// price > 0, and the total cost is representable. Construct through
/// [`LeaseOption::new`] or [`LeaseOption::from_raw`]; deserialization runs
/// the same checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "LeaseOptionRecord")]
pub struct LeaseOption {
    pub mileage_per_year: u32,
    pub period_months: u32,
    pub first_payment: Decimal,
    pub monthly_price: Decimal,
}

impl LeaseOption {
    /// Build a validated option, `None` if any field is out of range.
    pub fn new(
        mileage_per_year: u32,
        period_months: u32,
        first_payment: Decimal,
        monthly_price: Decimal,
    ) -> Option<Self> {
        if mileage_per_year == 0
            || period_months == 0
            || first_payment.is_negative()
            || !monthly_price.is_positive()
        {
            return None;
        }
        let option = Self {
            mileage_per_year,
            period_months,
            first_payment: first_payment.normalized(),
            monthly_price: monthly_price.normalized(),
        };
        option.total_cost()?;
        Some(option)
    }

    /// Validate a raw record. A missing first payment counts as zero; every
    /// other missing, fractional or non-positive field rejects the record.
    pub fn from_raw(raw: &RawOffer) -> Option<Self> {
        let mileage = raw.mileage_per_year?.to_u32_exact()?;
        let period = raw.period_months?.to_u32_exact()?;
        let first_payment = raw.first_payment.unwrap_or_else(Decimal::zero);
        let monthly_price = raw.monthly_price?;
        Self::new(mileage, period, first_payment, monthly_price)
    }

    /// `monthly_price * period_months + first_payment`, `None` on overflow.
    /// Always `Some` for an option built through [`LeaseOption::new`].
    pub fn total_cost(&self) -> Option<Decimal> {
        self.monthly_price
            .checked_mul(Decimal::from_u32(self.period_months))?
            .checked_add(self.first_payment)
    }

    pub fn selection(&self) -> Selection {
        Selection {
            mileage_per_year: self.mileage_per_year,
            period_months: self.period_months,
            first_payment: self.first_payment,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeaseOptionRecord {
    mileage_per_year: u32,
    period_months: u32,
    first_payment: Decimal,
    monthly_price: Decimal,
}

impl TryFrom<LeaseOptionRecord> for LeaseOption {
    type Error = String;

    fn try_from(record: LeaseOptionRecord) -> Result<Self, Self::Error> {
        LeaseOption::new(
            record.mileage_per_year,
            record.period_months,
            record.first_payment,
            record.monthly_price,
        )
        .ok_or_else(|| {
            format!(
                "invalid lease option: {} km/yr, {} mo, {} upfront @ {}/mo",
                record.mileage_per_year,
                record.period_months,
                record.first_payment,
                record.monthly_price
            )
        })
    }
}

impl fmt::Display for LeaseOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} km/yr, {} mo, {} upfront @ {}/mo",
            self.mileage_per_year, self.period_months, self.first_payment, self.monthly_price
        )
    }
}

/// The `(mileage, period, upfront)` triple identifying a current option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub mileage_per_year: u32,
    pub period_months: u32,
    pub first_payment: Decimal,
}

impl Selection {
    pub fn new(mileage_per_year: u32, period_months: u32, first_payment: Decimal) -> Self {
        Self {
            mileage_per_year,
            period_months,
            first_payment: first_payment.normalized(),
        }
    }

    /// Copy of this selection with one dimension replaced.
    ///
    /// Values that cannot be a mileage or period (fractional, negative)
    /// yield `None`.
    pub fn with_value(&self, dimension: Dimension, value: Decimal) -> Option<Selection> {
        let mut next = *self;
        match dimension {
            Dimension::Mileage => next.mileage_per_year = value.to_u32_exact()?,
            Dimension::Period => next.period_months = value.to_u32_exact()?,
            Dimension::Upfront => next.first_payment = value.normalized(),
        }
        Some(next)
    }
}

/// A requested selection that may leave dimensions unset.
///
/// Unset dimensions act as wildcards during resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionTarget {
    pub mileage_per_year: Option<u32>,
    pub period_months: Option<u32>,
    pub first_payment: Option<Decimal>,
}

impl SelectionTarget {
    pub fn new(
        mileage_per_year: Option<u32>,
        period_months: Option<u32>,
        first_payment: Option<Decimal>,
    ) -> Self {
        Self {
            mileage_per_year,
            period_months,
            first_payment,
        }
    }

    /// Target with every dimension unset.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_any(&self) -> bool {
        self.mileage_per_year.is_none()
            && self.period_months.is_none()
            && self.first_payment.is_none()
    }

    /// True if the option agrees with every dimension that is set.
    pub fn matches(&self, option: &LeaseOption) -> bool {
        self.mileage_per_year
            .map_or(true, |m| m == option.mileage_per_year)
            && self
                .period_months
                .map_or(true, |p| p == option.period_months)
            && self
                .first_payment
                .map_or(true, |u| u == option.first_payment)
    }
}

impl From<Selection> for SelectionTarget {
    fn from(selection: Selection) -> Self {
        Self {
            mileage_per_year: Some(selection.mileage_per_year),
            period_months: Some(selection.period_months),
            first_payment: Some(selection.first_payment),
        }
    }
}

/// One of the three priced dimensions of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Mileage,
    Period,
    Upfront,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Mileage => write!(f, "mileage"),
            Dimension::Period => write!(f, "period"),
            Dimension::Upfront => write!(f, "upfront"),
        }
    }
}

/// Read-only facts about the vehicle being leased.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleContext {
    pub retail_price: Option<Decimal>,
}

impl VehicleContext {
    pub fn new(retail_price: Option<Decimal>) -> Self {
        Self { retail_price }
    }

    /// Retail price usable for scoring, i.e. present and > 0.
    pub fn scoring_price(&self) -> Option<Decimal> {
        self.retail_price.filter(|p| p.is_positive())
    }
}
