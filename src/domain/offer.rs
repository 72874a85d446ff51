//! Raw offer records as delivered by upstream data entry.
//!
//! Every field is optional; validation happens in
//! [`LeaseOption::from_raw`](crate::domain::LeaseOption::from_raw).

use crate::domain::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One unvalidated priced offer.
///
/// Numeric fields accept JSON numbers or strings. Strings may use Danish
/// formatting, see [`parse_amount`]. Values that cannot be parsed are treated
/// as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOffer {
    #[serde(
        default,
        alias = "monthly_payment",
        deserialize_with = "deserialize_amount"
    )]
    pub monthly_price: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub first_payment: Option<Decimal>,
    #[serde(
        default,
        alias = "lease_period_months",
        deserialize_with = "deserialize_amount"
    )]
    pub period_months: Option<Decimal>,
    #[serde(
        default,
        alias = "annual_kilometers",
        deserialize_with = "deserialize_amount"
    )]
    pub mileage_per_year: Option<Decimal>,
}

impl RawOffer {
    /// Offer with all four fields present.
    pub fn new(
        mileage_per_year: u32,
        period_months: u32,
        first_payment: Decimal,
        monthly_price: Decimal,
    ) -> Self {
        Self {
            monthly_price: Some(monthly_price),
            first_payment: Some(first_payment),
            period_months: Some(Decimal::from_u32(period_months)),
            mileage_per_year: Some(Decimal::from_u32(mileage_per_year)),
        }
    }
}

/// Parse a price or count written by a human.
///
/// Accepts plain decimals (`"2699"`, `"2699.50"`) and Danish formatting:
/// `.` as thousands separator and `,` as decimal separator (`"2.699"`,
/// `"4.999,50"`, `"2.699,-"`), with an optional `kr`/`DKK` suffix.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let mut s: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();

    let lower = s.to_ascii_lowercase();
    for suffix in ["dkk", "kr.", "kr"] {
        if lower.ends_with(suffix) {
            s.truncate(s.len() - suffix.len());
            break;
        }
    }
    if let Some(stripped) = s.strip_suffix(",-") {
        s = stripped.to_string();
    }
    if s.is_empty() {
        return None;
    }

    let canonical = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else if is_thousands_grouped(&s) {
        s.replace('.', "")
    } else {
        s
    };

    Decimal::from_str_canonical(&canonical).ok()
}

/// `"2.699"`, `"1.250.000"`: a leading group of 1-3 digits (not starting
/// with 0) followed by one or more groups of exactly three digits.
fn is_thousands_grouped(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut groups = digits.split('.');
    let Some(head) = groups.next() else {
        return false;
    };
    if head.is_empty() || head.len() > 3 || head.starts_with('0') {
        return false;
    }
    if !head.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let mut tail = 0;
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        tail += 1;
    }
    tail > 0
}

pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(AmountVisitor)
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Option<Decimal>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a numeric string, or null")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(Decimal::new(v.into())))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(Decimal::new(v.into())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Decimal::from_f64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(parse_amount(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_amount(deserializer)
    }
}
