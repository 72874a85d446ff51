//! Exact lookup over the validated offers of one vehicle.

use crate::domain::{Decimal, LeaseOption, RawOffer, Selection};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Immutable index over one version of a vehicle's option set.
///
/// Options keep their input order; when two records share a
/// `(mileage, period, first_payment)` triple the first one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionIndex {
    options: Vec<LeaseOption>,
    by_selection: HashMap<Selection, usize>,
    mileages: Vec<u32>,
    periods: Vec<u32>,
    upfronts: Vec<Decimal>,
    dropped: usize,
    version: String,
}

impl OptionIndex {
    /// Validate raw records and build the index. Invalid and duplicate
    /// records are skipped, never reported as errors.
    pub fn build(raw: &[RawOffer]) -> Self {
        let mut options = Vec::with_capacity(raw.len());
        let mut by_selection = HashMap::with_capacity(raw.len());
        let mut invalid = 0usize;
        let mut duplicates = 0usize;

        for record in raw {
            let Some(option) = LeaseOption::from_raw(record) else {
                invalid += 1;
                continue;
            };
            let key = option.selection();
            if by_selection.contains_key(&key) {
                duplicates += 1;
                continue;
            }
            by_selection.insert(key, options.len());
            options.push(option);
        }

        if invalid > 0 || duplicates > 0 {
            debug!(
                kept = options.len(),
                invalid, duplicates, "Skipped offers while building option index"
            );
        }

        Self::from_parts(options, by_selection, invalid + duplicates)
    }

    fn from_parts(
        options: Vec<LeaseOption>,
        by_selection: HashMap<Selection, usize>,
        dropped: usize,
    ) -> Self {
        let mileages: BTreeSet<u32> = options.iter().map(|o| o.mileage_per_year).collect();
        let periods: BTreeSet<u32> = options.iter().map(|o| o.period_months).collect();
        let upfronts: BTreeSet<Decimal> = options.iter().map(|o| o.first_payment).collect();
        let version = compute_version(&options);

        Self {
            options,
            by_selection,
            mileages: mileages.into_iter().collect(),
            periods: periods.into_iter().collect(),
            upfronts: upfronts.into_iter().collect(),
            dropped,
            version,
        }
    }

    /// Exact lookup by `(mileage, period, first_payment)`.
    pub fn get(
        &self,
        mileage_per_year: u32,
        period_months: u32,
        first_payment: Decimal,
    ) -> Option<&LeaseOption> {
        self.lookup(&Selection::new(mileage_per_year, period_months, first_payment))
    }

    pub fn lookup(&self, selection: &Selection) -> Option<&LeaseOption> {
        let key = Selection::new(
            selection.mileage_per_year,
            selection.period_months,
            selection.first_payment,
        );
        self.by_selection.get(&key).map(|&i| &self.options[i])
    }

    /// True if this exact option (including its price) is indexed.
    pub fn contains(&self, option: &LeaseOption) -> bool {
        self.lookup(&option.selection())
            .map(|found| found.monthly_price == option.monthly_price)
            .unwrap_or(false)
    }

    /// Options in indexed (input) order.
    pub fn options(&self) -> &[LeaseOption] {
        &self.options
    }

    /// Distinct mileages, ascending.
    pub fn mileages(&self) -> &[u32] {
        &self.mileages
    }

    /// Distinct contract lengths, ascending.
    pub fn periods(&self) -> &[u32] {
        &self.periods
    }

    /// Distinct upfront payments, ascending.
    pub fn upfronts(&self) -> &[Decimal] {
        &self.upfronts
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Number of input records that did not make it into the index.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Content fingerprint identifying this option set.
    pub fn version(&self) -> &str {
        &self.version
    }
}

fn compute_version(options: &[LeaseOption]) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    for option in options {
        hasher.update(option.mileage_per_year.to_le_bytes());
        hasher.update(option.period_months.to_le_bytes());
        hasher.update(option.first_payment.to_canonical_string());
        hasher.update(b"|");
        hasher.update(option.monthly_price.to_canonical_string());
        hasher.update(b";");
    }
    let hash = hasher.finalize();
    format!("v:{}", hex::encode(&hash[..16]))
}
