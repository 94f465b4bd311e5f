//! Input/output helpers.
//!
//! - record JSON read/write (`record`)
//! - yearly series CSV import/export (`series_csv`)

pub mod record;
pub mod series_csv;

pub use record::*;
pub use series_csv::*;
