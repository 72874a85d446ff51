//! End-to-end properties of the lease option engine over the public API.

use leasing_engine::engine::price_impact::{dimension_impacts, price_impact};
use leasing_engine::engine::resolver::{cheapest, resolve};
use leasing_engine::engine::scorer::{lease_score, monthly_rate_percent, rate_score};
use leasing_engine::engine::{ResolutionStep, DEFAULT_PREFERRED_PERIODS};
use leasing_engine::{
    Decimal, Dimension, LeaseEngine, LeaseOption, OptionIndex, RawOffer, ResolverStatus,
    SelectionResolver, SelectionTarget, VehicleContext,
};

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn offer(mileage: u32, period: u32, upfront: &str, monthly: &str) -> RawOffer {
    RawOffer::new(mileage, period, d(upfront), d(monthly))
}

fn scenario_offers() -> Vec<RawOffer> {
    vec![
        offer(10000, 36, "0", "2500"),
        offer(15000, 36, "0", "2800"),
        offer(20000, 36, "0", "3100"),
    ]
}

fn grid_offers() -> Vec<RawOffer> {
    let mut offers = Vec::new();
    for (mi, mileage) in [10000u32, 15000, 20000, 25000].iter().enumerate() {
        for (pi, period) in [24u32, 36, 48].iter().enumerate() {
            for (ui, upfront) in ["0", "4999", "9999"].iter().enumerate() {
                let monthly = 2500 + 250 * mi as u32 + 150 * (2 - pi as u32) - 120 * ui as u32;
                offers.push(offer(*mileage, *period, upfront, &monthly.to_string()));
            }
        }
    }
    offers
}

#[test]
fn test_example_scenario_score() {
    let index = OptionIndex::build(&scenario_offers());
    let vehicle = VehicleContext::new(Some(d("300000")));
    let option = index.get(10000, 36, d("0")).unwrap();

    let percent = monthly_rate_percent(option.monthly_price, d("300000")).unwrap();
    assert!(percent > d("0.833") && percent < d("0.834"));
    assert_eq!(rate_score(percent), 100);
    assert_eq!(lease_score(option, &vehicle), Some(72));
}

#[test]
fn test_reset_to_cheapest_picks_lowest_monthly() {
    let index = OptionIndex::build(&scenario_offers());
    let option = cheapest(&index).unwrap();
    assert_eq!(
        *option,
        LeaseOption::new(10000, 36, d("0"), d("2500")).unwrap()
    );
}

#[test]
fn test_resolver_prefers_36_months_over_cheaper_24() {
    let index = OptionIndex::build(&[
        offer(15000, 36, "0", "3000"),
        offer(15000, 24, "0", "2800"),
        offer(15000, 48, "0", "3200"),
    ]);
    let target = SelectionTarget::new(Some(15000), None, Some(d("0")));
    let resolution = resolve(&index, &target, &DEFAULT_PREFERRED_PERIODS).unwrap();
    assert_eq!(resolution.option.period_months, 36);
    assert_eq!(resolution.option.monthly_price, d("3000"));
}

#[test]
fn test_every_input_option_round_trips_through_lookup() {
    let offers = grid_offers();
    let index = OptionIndex::build(&offers);
    assert_eq!(index.len(), offers.len());
    for raw in &offers {
        let option = LeaseOption::from_raw(raw).unwrap();
        let found = index
            .get(option.mileage_per_year, option.period_months, option.first_payment)
            .unwrap();
        assert_eq!(*found, option);
    }
}

#[test]
fn test_price_impact_matches_target_option() {
    let index = OptionIndex::build(&grid_offers());
    let baseline = *index.get(15000, 36, d("4999")).unwrap();

    for &mileage in index.mileages() {
        let impact = price_impact(&index, &baseline, Dimension::Mileage, mileage.into()).unwrap();
        let other = index.get(mileage, 36, d("4999")).unwrap();
        assert!(impact.is_available);
        assert_eq!(impact.delta_amount, other.monthly_price - baseline.monthly_price);
    }
}

#[test]
fn test_dimension_impacts_flag_missing_combinations() {
    let index = OptionIndex::build(&[
        offer(10000, 36, "0", "2500"),
        offer(15000, 36, "0", "2800"),
        offer(15000, 24, "5000", "2700"),
    ]);
    let baseline = *index.get(10000, 36, d("0")).unwrap();

    let periods = dimension_impacts(&index, &baseline, Dimension::Period).unwrap();
    assert_eq!(periods.len(), 2);
    assert!(!periods[0].impact.is_available); // 24 months not offered at 10000/0
    assert!(periods[1].impact.is_available);

    let upfronts = dimension_impacts(&index, &baseline, Dimension::Upfront).unwrap();
    assert!(!upfronts[1].impact.is_available);
}

#[test]
fn test_score_determinism_across_engines() {
    let vehicle = VehicleContext::new(Some(d("289990")));
    let a = LeaseEngine::from_offers(&grid_offers(), vehicle);
    let b = LeaseEngine::from_offers(&grid_offers(), vehicle);
    assert_eq!(a.version(), b.version());
    assert_eq!(a.scored_options(), b.scored_options());
    assert_eq!(a.best_scored(), b.best_scored());
}

#[test]
fn test_cheaper_price_never_lowers_rate_score() {
    let retail = d("250000");
    let mut previous = None;
    for monthly in (1500..=6000).rev().step_by(50) {
        let percent = monthly_rate_percent(Decimal::from_u32(monthly), retail).unwrap();
        let score = rate_score(percent);
        if let Some(prev) = previous {
            assert!(score >= prev, "score fell at monthly {}", monthly);
        }
        previous = Some(score);
    }
}

#[test]
fn test_empty_option_set_is_not_an_error() {
    let mut resolver = SelectionResolver::new();
    resolver.begin_loading();
    let status = resolver.apply_offers(&[], VehicleContext::default(), None);
    assert_eq!(status, ResolverStatus::Empty);
    assert!(resolver.current().is_none());
    assert!(resolver.last_error().is_none());
}

#[test]
fn test_invalid_offers_never_reach_selection() {
    let offers = vec![
        offer(10000, 36, "0", "0"),
        offer(0, 36, "0", "1500"),
        RawOffer {
            monthly_price: Some(d("1000")),
            first_payment: Some(d("0")),
            period_months: None,
            mileage_per_year: Some(d("10000")),
        },
        offer(15000, 36, "0", "2800"),
    ];
    let mut resolver = SelectionResolver::new();
    resolver.apply_offers(&offers, VehicleContext::default(), None);
    assert_eq!(resolver.status(), ResolverStatus::Initialized);
    assert_eq!(resolver.reset_to_cheapest().unwrap().monthly_price, d("2800"));
}

#[test]
fn test_carry_over_mileage_from_another_car() {
    let mut resolver = SelectionResolver::new();
    let target = SelectionTarget::new(Some(20000), Some(36), Some(d("4999")));
    resolver.apply_offers(&grid_offers(), VehicleContext::default(), Some(target));
    let current = *resolver.current().unwrap();
    assert_eq!(current.mileage_per_year, 20000);
    assert_eq!(current.period_months, 36);
    assert_eq!(current.first_payment, d("4999"));

    // a car offering 20000 km only at 48 months with a different upfront
    let next_car = vec![offer(10000, 36, "0", "2100"), offer(20000, 48, "3000", "2600")];
    let resolution = resolve(
        &OptionIndex::build(&next_car),
        &SelectionTarget::from(current.selection()),
        &DEFAULT_PREFERRED_PERIODS,
    )
    .unwrap();
    assert_eq!(resolution.step, ResolutionStep::SameMileage);
    assert_eq!(resolution.option.mileage_per_year, 20000);
}
