use super::price_impact::{self, PriceImpact, PriceImpactSet};
use super::resolver;
use super::scorer::{self, ScoreBreakdown, ScoredOption};
use super::{EngineError, OptionIndex};
use crate::domain::{Decimal, Dimension, LeaseOption, RawOffer, VehicleContext};
use serde::{Deserialize, Serialize};

/// One immutable version of a vehicle's option set plus its vehicle
/// context. Rebuild it whenever either changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseEngine {
    index: OptionIndex,
    vehicle: VehicleContext,
}

impl LeaseEngine {
    pub fn new(index: OptionIndex, vehicle: VehicleContext) -> Self {
        Self { index, vehicle }
    }

    pub fn from_offers(raw: &[RawOffer], vehicle: VehicleContext) -> Self {
        Self::new(OptionIndex::build(raw), vehicle)
    }

    pub fn index(&self) -> &OptionIndex {
        &self.index
    }

    pub fn vehicle(&self) -> &VehicleContext {
        &self.vehicle
    }

    pub fn version(&self) -> &str {
        self.index.version()
    }

    pub fn score(&self, option: &LeaseOption) -> Option<u8> {
        scorer::lease_score(option, &self.vehicle)
    }

    pub fn breakdown(&self, option: &LeaseOption) -> Option<ScoreBreakdown> {
        scorer::score_breakdown(option, self.vehicle.scoring_price()?)
    }

    pub fn scored_options(&self) -> Vec<ScoredOption> {
        scorer::score_options(&self.index, &self.vehicle)
    }

    pub fn cheapest(&self) -> Option<&LeaseOption> {
        resolver::cheapest(&self.index)
    }

    /// Highest-scoring option ("recommended"), distinct from the cheapest.
    pub fn best_scored(&self) -> Option<ScoredOption> {
        resolver::best_scored(&self.scored_options())
    }

    pub fn impact(
        &self,
        baseline: &LeaseOption,
        dimension: Dimension,
        value: Decimal,
    ) -> Result<PriceImpact, EngineError> {
        price_impact::price_impact(&self.index, baseline, dimension, value)
    }

    pub fn impacts(&self, baseline: &LeaseOption) -> Result<PriceImpactSet, EngineError> {
        price_impact::impact_set(&self.index, baseline)
    }

    /// Everything a listing page needs to render `option`.
    pub fn quote(&self, option: &LeaseOption) -> Result<LeaseQuote, EngineError> {
        let impacts = self.impacts(option)?;
        // indexed options always have a representable total cost
        let total_cost = option
            .total_cost()
            .ok_or(EngineError::BaselineNotIndexed(*option))?;
        let recommended = self.best_scored().map(|s| s.option);
        let breakdown = self.breakdown(option);

        Ok(LeaseQuote {
            option: *option,
            lease_score: breakdown.map(|b| b.total),
            breakdown,
            total_cost,
            is_cheapest: self.cheapest() == Some(option),
            is_recommended: recommended.as_ref() == Some(option),
            mileages: self.index.mileages().to_vec(),
            periods: self.index.periods().to_vec(),
            upfronts: self.index.upfronts().to_vec(),
            impacts,
            version: self.index.version().to_string(),
        })
    }
}

/// UI-facing view of a resolved option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseQuote {
    pub option: LeaseOption,
    /// Absent when the vehicle has no retail price.
    pub lease_score: Option<u8>,
    pub breakdown: Option<ScoreBreakdown>,
    pub total_cost: Decimal,
    pub is_cheapest: bool,
    pub is_recommended: bool,
    pub mileages: Vec<u32>,
    pub periods: Vec<u32>,
    pub upfronts: Vec<Decimal>,
    pub impacts: PriceImpactSet,
    pub version: String,
}
