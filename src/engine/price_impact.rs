//! Monthly-price deltas for changing one dimension of a selection.

use super::{EngineError, OptionIndex};
use crate::domain::{Decimal, Dimension, LeaseOption};
use serde::{Deserialize, Serialize};

/// Monthly-price change from switching one dimension away from a baseline.
///
/// `delta_percent` is a fraction of the baseline monthly price. Both deltas
/// are zero and meaningless when `is_available` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceImpact {
    pub delta_amount: Decimal,
    pub delta_percent: Decimal,
    pub is_available: bool,
}

impl PriceImpact {
    pub fn unavailable() -> Self {
        Self {
            delta_amount: Decimal::zero(),
            delta_percent: Decimal::zero(),
            is_available: false,
        }
    }

    fn between(baseline: &LeaseOption, candidate: &LeaseOption) -> Self {
        let delta_amount = candidate.monthly_price - baseline.monthly_price;
        // monthly_price is always > 0 on an indexed option
        let delta_percent = delta_amount
            .checked_div(baseline.monthly_price)
            .unwrap_or_else(Decimal::zero);
        Self {
            delta_amount,
            delta_percent,
            is_available: true,
        }
    }
}

/// Price impact of one candidate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactEntry {
    pub value: Decimal,
    pub impact: PriceImpact,
}

/// Impacts for every distinct value of every dimension, relative to one
/// baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceImpactSet {
    pub mileage: Vec<ImpactEntry>,
    pub period: Vec<ImpactEntry>,
    pub upfront: Vec<ImpactEntry>,
}

impl PriceImpactSet {
    pub fn for_dimension(&self, dimension: Dimension) -> &[ImpactEntry] {
        match dimension {
            Dimension::Mileage => &self.mileage,
            Dimension::Period => &self.period,
            Dimension::Upfront => &self.upfront,
        }
    }

    /// Impact of switching `dimension` to `value`, if `value` is one of the
    /// index's distinct values.
    pub fn get(&self, dimension: Dimension, value: Decimal) -> Option<&PriceImpact> {
        self.for_dimension(dimension)
            .iter()
            .find(|entry| entry.value == value)
            .map(|entry| &entry.impact)
    }
}

/// Price impact of moving `baseline` to `value` along `dimension` while
/// holding the other two dimensions fixed.
///
/// Also serves hover previews: it is a single hash lookup.
///
/// # Errors
/// Returns [`EngineError::BaselineNotIndexed`] if `baseline` is not an
/// option of `index`.
pub fn price_impact(
    index: &OptionIndex,
    baseline: &LeaseOption,
    dimension: Dimension,
    value: Decimal,
) -> Result<PriceImpact, EngineError> {
    ensure_indexed(index, baseline)?;
    Ok(lookup_impact(index, baseline, dimension, value))
}

/// Impacts for every distinct value of `dimension`, ascending by value.
///
/// # Errors
/// Returns [`EngineError::BaselineNotIndexed`] if `baseline` is not an
/// option of `index`.
pub fn dimension_impacts(
    index: &OptionIndex,
    baseline: &LeaseOption,
    dimension: Dimension,
) -> Result<Vec<ImpactEntry>, EngineError> {
    ensure_indexed(index, baseline)?;
    Ok(collect_dimension(index, baseline, dimension))
}

/// Impacts for all three dimensions.
///
/// # Errors
/// Returns [`EngineError::BaselineNotIndexed`] if `baseline` is not an
/// option of `index`.
pub fn impact_set(
    index: &OptionIndex,
    baseline: &LeaseOption,
) -> Result<PriceImpactSet, EngineError> {
    ensure_indexed(index, baseline)?;
    Ok(PriceImpactSet {
        mileage: collect_dimension(index, baseline, Dimension::Mileage),
        period: collect_dimension(index, baseline, Dimension::Period),
        upfront: collect_dimension(index, baseline, Dimension::Upfront),
    })
}

fn ensure_indexed(index: &OptionIndex, baseline: &LeaseOption) -> Result<(), EngineError> {
    if index.contains(baseline) {
        Ok(())
    } else {
        Err(EngineError::BaselineNotIndexed(*baseline))
    }
}

fn collect_dimension(
    index: &OptionIndex,
    baseline: &LeaseOption,
    dimension: Dimension,
) -> Vec<ImpactEntry> {
    let values: Vec<Decimal> = match dimension {
        Dimension::Mileage => index.mileages().iter().map(|&m| m.into()).collect(),
        Dimension::Period => index.periods().iter().map(|&p| p.into()).collect(),
        Dimension::Upfront => index.upfronts().to_vec(),
    };

    values
        .into_iter()
        .map(|value| ImpactEntry {
            value,
            impact: lookup_impact(index, baseline, dimension, value),
        })
        .collect()
}

fn lookup_impact(
    index: &OptionIndex,
    baseline: &LeaseOption,
    dimension: Dimension,
    value: Decimal,
) -> PriceImpact {
    baseline
        .selection()
        .with_value(dimension, value)
        .and_then(|target| index.lookup(&target))
        .map(|candidate| PriceImpact::between(baseline, candidate))
        .unwrap_or_else(PriceImpact::unavailable)
}
