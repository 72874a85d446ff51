pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod session;
pub mod source;

pub use config::{Config, SelectionMode};
pub use domain::{
    Decimal, Dimension, LeaseOption, RawOffer, Selection, SelectionTarget, VehicleContext,
};
pub use engine::{
    LeaseEngine, LeaseQuote, OptionIndex, PriceImpact, ResolverStatus, ScoredOption,
    SelectionResolver,
};
pub use error::AppError;
pub use session::ListingSession;
pub use source::{FileOfferSource, MockOfferSource, OfferSource, OfferSourceError};
