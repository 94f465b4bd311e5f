//! Command-line parsing for the inflation index tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! ingestion and index arithmetic.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{IndexConvention, SeriesKind, YearRange};
use crate::math::MAX_DECIMALS;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "infl", version, about = "Inflation index ingestion and calculators")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch CPI data for catalog currencies and write one record JSON per currency.
    Fetch(FetchArgs),
    /// Normalize a local `year,value` CSV.
    Normalize(NormalizeArgs),
    /// Project an amount between two years using a stored record.
    Project(ProjectArgs),
    /// Convert an amount between countries with World Bank PPP factors.
    Ppp(PppArgs),
    /// Price-to-income ratios (FRED Case-Shiller and median income, or local CSVs).
    Ratio(RatioArgs),
    /// Summarize a stored record.
    Show(ShowArgs),
    /// List the built-in currency catalog.
    Catalog,
}

/// Year window shared by fetching commands.
#[derive(Debug, Args, Clone, Copy)]
pub struct RangeArgs {
    /// First year to keep.
    #[arg(long)]
    pub start: Option<i32>,

    /// Last year to keep.
    #[arg(long)]
    pub end: Option<i32>,
}

impl RangeArgs {
    pub fn range(&self) -> YearRange {
        YearRange::new(self.start, self.end)
    }
}

#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    /// Currency code to fetch (repeatable). Defaults to the whole catalog.
    #[arg(short = 'c', long = "currency")]
    pub currencies: Vec<String>,

    /// Output directory (defaults to INFL_DATA_DIR or `data`).
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Express records as ratios (base = 1.0) or indices (base = 100).
    #[arg(long, value_enum, default_value_t = IndexConvention::Ratio)]
    pub convention: IndexConvention,

    /// Decimal places stored per value.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_DECIMALS)))]
    pub decimals: u32,

    /// Fetch and report without writing any files.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args, Clone)]
pub struct NormalizeArgs {
    /// CSV with a year column and a value column.
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    /// Whether the CSV holds levels or annual percentage rates.
    #[arg(long, value_enum, default_value_t = SeriesKind::Level)]
    pub kind: SeriesKind,

    /// Base year (defaults to the earliest year).
    #[arg(long)]
    pub base_year: Option<i32>,

    #[arg(long, value_enum, default_value_t = IndexConvention::Ratio)]
    pub convention: IndexConvention,

    /// Decimal places per value (defaults to 2 for levels, 4 for rates).
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_DECIMALS)))]
    pub decimals: Option<u32>,

    /// Write the normalized series to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ProjectArgs {
    /// Record JSON written by `infl fetch`.
    #[arg(long, value_name = "JSON")]
    pub record: PathBuf,

    #[arg(long)]
    pub amount: f64,

    #[arg(long)]
    pub from: i32,

    #[arg(long)]
    pub to: i32,

    /// Clamp years into the record's covered range instead of failing.
    #[arg(long)]
    pub clamp: bool,
}

#[derive(Debug, Args, Clone)]
pub struct PppArgs {
    #[arg(long)]
    pub amount: f64,

    /// ISO3 country code of the amount (e.g. USA).
    #[arg(long)]
    pub from: String,

    /// ISO3 country code to convert into (e.g. SWE).
    #[arg(long)]
    pub to: String,

    /// Year of the factors (defaults to the latest year both countries cover).
    #[arg(long)]
    pub year: Option<i32>,
}

#[derive(Debug, Args, Clone)]
pub struct RatioArgs {
    /// Year whose median home price is known.
    #[arg(long)]
    pub base_year: i32,

    /// Median home price in the base year.
    #[arg(long)]
    pub base_price: f64,

    /// Local home-price index CSV (instead of FRED).
    #[arg(long, requires = "income")]
    pub home: Option<PathBuf>,

    /// Local median-income CSV (instead of FRED).
    #[arg(long, requires = "home")]
    pub income: Option<PathBuf>,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[arg(long, value_name = "JSON")]
    pub record: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fetch_parses_repeated_currencies_and_range() {
        let cli = Cli::parse_from(["infl", "fetch", "-c", "USD", "-c", "gbp", "--start", "2000", "--convention", "index100"]);
        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.currencies, vec!["USD", "gbp"]);
        assert_eq!(args.range.range(), YearRange::new(Some(2000), None));
        assert_eq!(args.convention, IndexConvention::Index100);
        assert_eq!(args.decimals, 4);
    }

    #[test]
    fn decimals_are_bounded() {
        assert!(Cli::try_parse_from(["infl", "fetch", "--decimals", "400"]).is_err());
        assert!(Cli::try_parse_from(["infl", "normalize", "--csv", "cpi.csv", "--decimals", "16"]).is_err());

        let cli = Cli::parse_from(["infl", "normalize", "--csv", "cpi.csv", "--decimals", "15"]);
        let Command::Normalize(args) = cli.command else {
            panic!("expected normalize");
        };
        assert_eq!(args.decimals, Some(15));
    }

    #[test]
    fn ratio_local_inputs_come_in_pairs() {
        let res = Cli::try_parse_from(["infl", "ratio", "--base-year", "2000", "--base-price", "1", "--home", "h.csv"]);
        assert!(res.is_err());
    }
}
