//! Mapping a requested selection onto a real, indexed option.
//!
//! Resolution order, each step only if the previous found nothing:
//! 1. exact match, unset target dimensions act as wildcards
//! 2. best option sharing the target mileage
//! 3. globally cheapest option
//!
//! Candidates within a step are ranked by upfront distance (when an upfront
//! is requested), then position in the preferred period list, then lower
//! monthly price, then higher first payment. Full ties keep the first option
//! in indexed order.

use super::{LeaseEngine, OptionIndex, ScoredOption};
use crate::domain::{Decimal, LeaseOption, RawOffer, SelectionTarget, VehicleContext};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use tracing::{debug, info, warn};

/// Contract lengths preferred when the target leaves the period open.
pub const DEFAULT_PREFERRED_PERIODS: [u32; 3] = [36, 24, 48];

/// Initialization status of a [`SelectionResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverStatus {
    /// Nothing requested yet.
    Pending,
    /// Offers are being fetched; no queries are answered.
    Loading,
    /// The option set is empty. Not an error.
    Empty,
    /// The upstream fetch failed.
    Error,
    /// An option set is loaded and a selection is resolved.
    Initialized,
}

impl fmt::Display for ResolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolverStatus::Pending => "pending",
            ResolverStatus::Loading => "loading",
            ResolverStatus::Empty => "empty",
            ResolverStatus::Error => "error",
            ResolverStatus::Initialized => "initialized",
        };
        f.write_str(s)
    }
}

/// Which step of the resolution order produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStep {
    Exact,
    SameMileage,
    Cheapest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub option: LeaseOption,
    pub step: ResolutionStep,
}

/// Resolve `target` against `index`. `None` only for an empty index.
pub fn resolve(
    index: &OptionIndex,
    target: &SelectionTarget,
    preferred_periods: &[u32],
) -> Option<Resolution> {
    let exact = best_ranked(
        index.options().iter().filter(|o| target.matches(o)),
        target,
        preferred_periods,
    );
    if let Some(option) = exact {
        return Some(Resolution {
            option: *option,
            step: ResolutionStep::Exact,
        });
    }

    let same_mileage = best_ranked(
        index.options().iter().filter(|o| {
            target
                .mileage_per_year
                .map_or(true, |m| m == o.mileage_per_year)
        }),
        target,
        preferred_periods,
    );
    if let Some(option) = same_mileage {
        return Some(Resolution {
            option: *option,
            step: ResolutionStep::SameMileage,
        });
    }

    cheapest(index).map(|option| Resolution {
        option: *option,
        step: ResolutionStep::Cheapest,
    })
}

/// Option with the lowest monthly price, first in indexed order on ties.
pub fn cheapest(index: &OptionIndex) -> Option<&LeaseOption> {
    index.options().iter().min_by_key(|o| o.monthly_price)
}

/// Scored option with the highest lease score, first in indexed order on
/// ties.
pub fn best_scored(scored: &[ScoredOption]) -> Option<ScoredOption> {
    let mut best: Option<ScoredOption> = None;
    for candidate in scored {
        if best.map_or(true, |b| candidate.lease_score > b.lease_score) {
            best = Some(*candidate);
        }
    }
    best
}

fn best_ranked<'a>(
    candidates: impl Iterator<Item = &'a LeaseOption>,
    target: &SelectionTarget,
    preference: &[u32],
) -> Option<&'a LeaseOption> {
    candidates.min_by_key(|option| rank_key(option, target, preference))
}

fn rank_key(
    option: &LeaseOption,
    target: &SelectionTarget,
    preference: &[u32],
) -> (Decimal, usize, Decimal, Reverse<Decimal>) {
    let upfront_distance = target
        .first_payment
        .map(|requested| {
            option
                .first_payment
                .checked_sub(requested)
                .map_or_else(Decimal::max_value, |distance| distance.abs())
        })
        .unwrap_or_else(Decimal::zero);
    let period_rank = preference
        .iter()
        .position(|&p| p == option.period_months)
        .unwrap_or(preference.len());
    (
        upfront_distance,
        period_rank,
        option.monthly_price,
        Reverse(option.first_payment),
    )
}

/// Selection state over successive versions of a vehicle's option set.
///
/// `Pending -> Loading -> {Empty | Error | Initialized}`. `Empty` and
/// `Error` recover when new offers arrive; a refresh while `Initialized`
/// carries the current selection over as the target.
#[derive(Debug, Clone)]
pub struct SelectionResolver {
    status: ResolverStatus,
    preferred_periods: Vec<u32>,
    engine: Option<LeaseEngine>,
    current: Option<LeaseOption>,
    carry_over: Option<SelectionTarget>,
    last_error: Option<String>,
}

impl SelectionResolver {
    pub fn new() -> Self {
        Self::with_preferred_periods(DEFAULT_PREFERRED_PERIODS.to_vec())
    }

    pub fn with_preferred_periods(preferred_periods: Vec<u32>) -> Self {
        Self {
            status: ResolverStatus::Pending,
            preferred_periods,
            engine: None,
            current: None,
            carry_over: None,
            last_error: None,
        }
    }

    pub fn status(&self) -> ResolverStatus {
        self.status
    }

    /// The currently selected option; always an exact indexed option.
    pub fn current(&self) -> Option<&LeaseOption> {
        self.current.as_ref()
    }

    /// Engine over the loaded option set, only while `Initialized`.
    pub fn engine(&self) -> Option<&LeaseEngine> {
        match self.status {
            ResolverStatus::Initialized => self.engine.as_ref(),
            _ => None,
        }
    }

    /// Upstream error message while in `Error`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn preferred_periods(&self) -> &[u32] {
        &self.preferred_periods
    }

    /// Mark a fetch as in flight. Queries are refused until offers or an
    /// error are applied.
    pub fn begin_loading(&mut self) {
        if let Some(option) = self.current.take() {
            self.carry_over = Some(option.selection().into());
        }
        self.engine = None;
        self.last_error = None;
        self.transition(ResolverStatus::Loading);
    }

    /// Load a freshly fetched offer list and resolve a selection.
    ///
    /// `target` defaults to the selection carried over from the previous
    /// option set, and to "anything" when there is none.
    pub fn apply_offers(
        &mut self,
        raw: &[RawOffer],
        vehicle: VehicleContext,
        target: Option<SelectionTarget>,
    ) -> ResolverStatus {
        if let Some(option) = self.current.take() {
            self.carry_over = Some(option.selection().into());
        }
        let engine = LeaseEngine::from_offers(raw, vehicle);
        self.last_error = None;

        if engine.index().is_empty() {
            debug!(records = raw.len(), "No valid offers in option set");
            if target.is_some() {
                self.carry_over = target;
            }
            self.engine = None;
            self.transition(ResolverStatus::Empty);
            return self.status;
        }

        let target = target
            .or_else(|| self.carry_over.take())
            .unwrap_or_else(SelectionTarget::any);
        self.current = resolve(engine.index(), &target, &self.preferred_periods).map(|r| {
            debug!(step = ?r.step, option = %r.option, "Resolved selection");
            r.option
        });
        self.carry_over = None;
        self.engine = Some(engine);
        self.transition(ResolverStatus::Initialized);
        self.status
    }

    /// Record an upstream fetch failure. No resolution is attempted until
    /// new offers are applied.
    pub fn apply_error(&mut self, error: impl fmt::Display) -> ResolverStatus {
        let message = error.to_string();
        warn!(error = %message, "Offer fetch failed");
        if let Some(option) = self.current.take() {
            self.carry_over = Some(option.selection().into());
        }
        self.engine = None;
        self.last_error = Some(message);
        self.transition(ResolverStatus::Error);
        self.status
    }

    /// Resolve `target` against the loaded option set and make it current.
    /// `None` unless `Initialized`.
    pub fn select(&mut self, target: SelectionTarget) -> Option<Resolution> {
        let engine = self.engine()?;
        let resolution = resolve(engine.index(), &target, &self.preferred_periods)?;
        self.current = Some(resolution.option);
        Some(resolution)
    }

    /// Select the option with the lowest monthly price.
    pub fn reset_to_cheapest(&mut self) -> Option<LeaseOption> {
        let option = *self.engine()?.cheapest()?;
        self.current = Some(option);
        Some(option)
    }

    /// Select the option with the highest lease score. `None` when the
    /// vehicle has no retail price to score against.
    pub fn reset_to_best_score(&mut self) -> Option<ScoredOption> {
        let best = self.engine()?.best_scored()?;
        self.current = Some(best.option);
        Some(best)
    }

    fn transition(&mut self, next: ResolverStatus) {
        if self.status != next {
            info!(from = %self.status, to = %next, "Resolver status changed");
        }
        self.status = next;
    }
}

impl Default for SelectionResolver {
    fn default() -> Self {
        Self::new()
    }
}
