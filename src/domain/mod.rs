//! Domain types for lease offers.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Raw offer records as delivered by upstream data entry, with lenient
//!   number parsing
//! - Validated lease options, selections and vehicle context

pub mod decimal;
pub mod offer;
pub mod option;

pub use decimal::Decimal;
pub use offer::{parse_amount, RawOffer};
pub use option::{Dimension, LeaseOption, Selection, SelectionTarget, VehicleContext};
