//! Lease desirability score.
//!
//! A 0-100 composite of three step-function sub-scores:
//! - monthly rate as a share of retail price (45 %)
//! - yearly mileage allowance (35 %)
//! - contract flexibility, shorter is better (20 %)

use super::OptionIndex;
use crate::domain::{Decimal, LeaseOption, VehicleContext};
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};

const RATE_WEIGHT: u32 = 45;
const MILEAGE_WEIGHT: u32 = 35;
const FLEXIBILITY_WEIGHT: u32 = 20;

/// `(max monthly rate % in tenths, score)`, checked in order with `<=`.
const RATE_STEPS: [(i64, u8); 7] = [
    (9, 100),
    (11, 90),
    (13, 80),
    (15, 70),
    (17, 60),
    (19, 50),
    (21, 40),
];
const RATE_FLOOR: u8 = 25;

/// `(min km per year, score)`, checked in order with `>=`.
const MILEAGE_STEPS: [(u32, u8); 5] = [
    (25_000, 100),
    (20_000, 90),
    (15_000, 75),
    (12_000, 55),
    (10_000, 35),
];
const MILEAGE_FLOOR: u8 = 20;

/// `(max months, score)`, checked in order with `<=`.
const FLEXIBILITY_STEPS: [(u32, u8); 4] = [(12, 100), (24, 90), (36, 75), (48, 55)];
const FLEXIBILITY_FLOOR: u8 = 30;

/// The three sub-scores behind a lease score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub monthly_rate_percent: Decimal,
    pub rate_score: u8,
    pub mileage_score: u8,
    pub flexibility_score: u8,
    pub total: u8,
}

/// A lease option with its derived score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredOption {
    #[serde(flatten)]
    pub option: LeaseOption,
    pub lease_score: u8,
}

/// `monthly / retail * 100`, `None` for a non-positive retail price or a
/// ratio too large to represent.
pub fn monthly_rate_percent(monthly_price: Decimal, retail_price: Decimal) -> Option<Decimal> {
    if !retail_price.is_positive() {
        return None;
    }
    monthly_price
        .checked_div(retail_price)?
        .checked_mul(Decimal::hundred())
}

pub fn rate_score(monthly_rate_percent: Decimal) -> u8 {
    RATE_STEPS
        .iter()
        .find(|&&(tenths, _)| monthly_rate_percent <= tenths_to_decimal(tenths))
        .map(|&(_, score)| score)
        .unwrap_or(RATE_FLOOR)
}

pub fn mileage_score(mileage_per_year: u32) -> u8 {
    MILEAGE_STEPS
        .iter()
        .find(|&&(min, _)| mileage_per_year >= min)
        .map(|&(_, score)| score)
        .unwrap_or(MILEAGE_FLOOR)
}

pub fn flexibility_score(period_months: u32) -> u8 {
    FLEXIBILITY_STEPS
        .iter()
        .find(|&&(max, _)| period_months <= max)
        .map(|&(_, score)| score)
        .unwrap_or(FLEXIBILITY_FLOOR)
}

/// Weighted composite rounded half up and clamped to `[0, 100]`.
pub fn composite(rate: u8, mileage: u8, flexibility: u8) -> u8 {
    let weighted = u32::from(rate) * RATE_WEIGHT
        + u32::from(mileage) * MILEAGE_WEIGHT
        + u32::from(flexibility) * FLEXIBILITY_WEIGHT;
    let rounded = (weighted + 50) / 100;
    rounded.min(100) as u8
}

/// Full breakdown for one option, `None` without a usable retail price.
pub fn score_breakdown(option: &LeaseOption, retail_price: Decimal) -> Option<ScoreBreakdown> {
    let percent = monthly_rate_percent(option.monthly_price, retail_price)?;
    let rate = rate_score(percent);
    let mileage = mileage_score(option.mileage_per_year);
    let flexibility = flexibility_score(option.period_months);

    Some(ScoreBreakdown {
        monthly_rate_percent: percent,
        rate_score: rate,
        mileage_score: mileage,
        flexibility_score: flexibility,
        total: composite(rate, mileage, flexibility),
    })
}

/// Lease score for one option.
///
/// Scoring is skipped (not zero) when the retail price is absent or not
/// positive.
pub fn lease_score(option: &LeaseOption, vehicle: &VehicleContext) -> Option<u8> {
    let retail = vehicle.scoring_price()?;
    score_breakdown(option, retail).map(|b| b.total)
}

/// Every indexed option with its score, in indexed order. Empty when the
/// vehicle has no usable retail price.
pub fn score_options(index: &OptionIndex, vehicle: &VehicleContext) -> Vec<ScoredOption> {
    let Some(retail) = vehicle.scoring_price() else {
        return Vec::new();
    };
    index
        .options()
        .iter()
        .filter_map(|option| {
            score_breakdown(option, retail).map(|b| ScoredOption {
                option: *option,
                lease_score: b.total,
            })
        })
        .collect()
}

fn tenths_to_decimal(tenths: i64) -> Decimal {
    Decimal::new(RustDecimal::new(tenths, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_rate_thresholds_are_inclusive() {
        assert_eq!(rate_score(d("0.9")), 100);
        assert_eq!(rate_score(d("0.9000001")), 90);
        assert_eq!(rate_score(d("1.1")), 90);
        assert_eq!(rate_score(d("1.3")), 80);
        assert_eq!(rate_score(d("1.5")), 70);
        assert_eq!(rate_score(d("1.7")), 60);
        assert_eq!(rate_score(d("1.9")), 50);
        assert_eq!(rate_score(d("2.1")), 40);
        assert_eq!(rate_score(d("2.1000001")), 25);
        assert_eq!(rate_score(d("0")), 100);
    }

    #[test]
    fn test_rate_score_is_monotonic() {
        let mut previous = 100u8;
        let mut percent = Decimal::zero();
        let step = d("0.05");
        while percent <= d("3") {
            let score = rate_score(percent);
            assert!(score <= previous, "score rose at {}", percent);
            previous = score;
            percent = percent.checked_add(step).unwrap();
        }
    }

    #[test]
    fn test_mileage_steps() {
        assert_eq!(mileage_score(30_000), 100);
        assert_eq!(mileage_score(25_000), 100);
        assert_eq!(mileage_score(20_000), 90);
        assert_eq!(mileage_score(15_000), 75);
        assert_eq!(mileage_score(12_000), 55);
        assert_eq!(mileage_score(10_000), 35);
        assert_eq!(mileage_score(9_999), 20);
    }

    #[test]
    fn test_flexibility_steps() {
        assert_eq!(flexibility_score(6), 100);
        assert_eq!(flexibility_score(12), 100);
        assert_eq!(flexibility_score(24), 90);
        assert_eq!(flexibility_score(36), 75);
        assert_eq!(flexibility_score(48), 55);
        assert_eq!(flexibility_score(60), 30);
    }

    #[test]
    fn test_composite_rounds_half_up() {
        // 100*0.45 + 35*0.35 + 75*0.20 = 72.25
        assert_eq!(composite(100, 35, 75), 72);
        // 90*0.45 + 75*0.35 + 90*0.20 = 84.75
        assert_eq!(composite(90, 75, 90), 85);
        // 25*0.45 + 20*0.35 + 30*0.20 = 24.25
        assert_eq!(composite(25, 20, 30), 24);
        assert_eq!(composite(100, 100, 100), 100);
    }

    #[test]
    fn test_breakdown_for_example_option() {
        let option = LeaseOption::new(10000, 36, d("0"), d("2500")).unwrap();
        let breakdown = score_breakdown(&option, d("300000")).unwrap();
        assert_eq!(breakdown.rate_score, 100);
        assert_eq!(breakdown.mileage_score, 35);
        assert_eq!(breakdown.flexibility_score, 75);
        assert_eq!(breakdown.total, 72);
    }

    #[test]
    fn test_exact_boundary_percent() {
        // 2700 / 300000 * 100 = 0.9 exactly
        let option = LeaseOption::new(10000, 36, d("0"), d("2700")).unwrap();
        let breakdown = score_breakdown(&option, d("300000")).unwrap();
        assert_eq!(breakdown.monthly_rate_percent, d("0.9"));
        assert_eq!(breakdown.rate_score, 100);
    }

    #[test]
    fn test_no_score_without_retail_price() {
        let option = LeaseOption::new(10000, 36, d("0"), d("2500")).unwrap();
        assert_eq!(lease_score(&option, &VehicleContext::new(None)), None);
        assert_eq!(
            lease_score(&option, &VehicleContext::new(Some(Decimal::zero()))),
            None
        );
    }

    #[test]
    fn test_oversized_rate_is_unscorable() {
        let huge = d("100000000000000000000000000");
        assert_eq!(monthly_rate_percent(huge, d("0.1")), None);

        let oversized = LeaseOption::new(15000, 36, d("0"), huge).unwrap();
        let vehicle = VehicleContext::new(Some(d("0.1")));
        assert_eq!(lease_score(&oversized, &vehicle), None);
    }

    #[test]
    fn test_score_options_skips_unscorable_option() {
        let raw = [
            crate::domain::RawOffer::new(15000, 36, d("0"), d("100000000000000000000000000")),
            crate::domain::RawOffer::new(15000, 36, d("4999"), d("0.0001")),
        ];
        let index = OptionIndex::build(&raw);
        let scored = score_options(&index, &VehicleContext::new(Some(d("0.1"))));
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].option.first_payment, d("4999"));
    }

    #[test]
    fn test_score_is_deterministic() {
        let option = LeaseOption::new(15000, 24, d("4999"), d("3299")).unwrap();
        let vehicle = VehicleContext::new(Some(d("289990")));
        let first = lease_score(&option, &vehicle);
        for _ in 0..10 {
            assert_eq!(lease_score(&option, &vehicle), first);
        }
    }
}
