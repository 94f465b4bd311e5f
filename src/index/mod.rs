//! Index normalization and the calculations built on it.
//!
//! - annual aggregation of raw observations (`aggregate`)
//! - base-year normalization and rate compounding (`normalize`)
//! - purchasing-power projection (`projection`)
//! - PPP adjustment and price-to-income ratios (`derived`)
//!
//! Everything here is pure: no I/O, no shared state.

pub mod aggregate;
pub mod derived;
pub mod normalize;
pub mod projection;

pub use aggregate::{AggregateStats, annual_levels, annual_rates};
pub use derived::{PppTable, ppp_adjust, price_to_income_ratio};
pub use normalize::{
    COMPOUND_DECIMALS, NormalizeOptions, RATIO_DECIMALS, normalize, normalize_from_annual_rates, normalize_with,
    rescale, to_index,
};
pub use projection::{clamp_year, cumulative_inflation, project, project_with_rates, purchasing_power_loss_percent};
