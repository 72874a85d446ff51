//! Pure computation engine over one vehicle's lease options.
//!
//! Build an [`OptionIndex`] from the full offer list first; price impacts,
//! scores and selection resolution all read from that immutable index.

use crate::domain::LeaseOption;
use thiserror::Error;

pub mod lease;
pub mod option_index;
pub mod price_impact;
pub mod resolver;
pub mod scorer;

pub use lease::{LeaseEngine, LeaseQuote};
pub use option_index::OptionIndex;
pub use price_impact::{ImpactEntry, PriceImpact, PriceImpactSet};
pub use resolver::{
    Resolution, ResolutionStep, ResolverStatus, SelectionResolver, DEFAULT_PREFERRED_PERIODS,
};
pub use scorer::{ScoreBreakdown, ScoredOption};

/// Caller errors. Missing or invalid options are never reported here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Baseline option is not part of the option set: {0}")]
    BaselineNotIndexed(LeaseOption),
}
