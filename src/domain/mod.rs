//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - raw observations and annual series (`TimeSeriesObservation`, `AnnualSeries`, `AnnualRateSeries`)
//! - normalized outputs (`NormalizedSeries`, `Projection`, `PriceToIncome`)
//! - the persisted record and the currency catalog (`CurrencySeriesRecord`, `CurrencySpec`)

pub mod catalog;
pub mod types;

pub use catalog::*;
pub use types::*;
