//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - loads settings
//! - parses CLI arguments and dispatches commands
//! - prints reports

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, FetchArgs, NormalizeArgs, PppArgs, ProjectArgs, RatioArgs, ShowArgs};
use crate::config::Settings;
use crate::data::HttpProvider;
use crate::domain::{AnnualRateSeries, AnnualSeries, SeriesKind, builtin_catalog, select};
use crate::error::AppError;
use crate::events::TracingSink;
use crate::index::{
    COMPOUND_DECIMALS, NormalizeOptions, RATIO_DECIMALS, clamp_year, normalize_from_annual_rates, normalize_with,
    price_to_income_ratio, project, rescale,
};
use crate::io::{read_record_json, read_series_csv, write_series_csv};
use crate::notify::{HttpPing, Notifier, notify_best_effort};

pub mod pipeline;

/// Entry point for the `infl` binary.
pub fn run() -> Result<(), AppError> {
    let settings = Settings::from_env()?;
    init_tracing(settings.log_json);

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fetch(args) => handle_fetch(args, &settings),
        Command::Normalize(args) => handle_normalize(args),
        Command::Project(args) => handle_project(args),
        Command::Ppp(args) => handle_ppp(args, &settings),
        Command::Ratio(args) => handle_ratio(args, &settings),
        Command::Show(args) => handle_show(args),
        Command::Catalog => {
            print!("{}", crate::report::format_catalog(&builtin_catalog()));
            Ok(())
        }
    }
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(err) = result {
        eprintln!("logging already initialized: {err}");
    }
}

fn handle_fetch(args: FetchArgs, settings: &Settings) -> Result<(), AppError> {
    let specs = select(&builtin_catalog(), &args.currencies).map_err(|msg| AppError::new(2, msg))?;
    let provider = HttpProvider::from_settings(settings)?;
    let options = pipeline::BatchOptions {
        range: args.range.range(),
        convention: args.convention,
        decimals: args.decimals,
    };

    let sink = TracingSink;
    let report = pipeline::run_batch(&specs, &provider, &options, &sink);

    let written = if args.dry_run {
        info!("dry run, no records written");
        Vec::new()
    } else {
        let dir = args.out.as_deref().unwrap_or(&settings.data_dir);
        pipeline::write_batch(dir, &report, &sink)?
    };

    print!("{}", crate::report::format_batch_report(&report, &written));

    let changed: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
    let ping = settings
        .notify_url
        .as_ref()
        .map(|url| HttpPing::new(provider.client().clone(), url.clone()));
    notify_best_effort(ping.as_ref().map(|p| p as &dyn Notifier), &changed);

    if report.all_failed() {
        return Err(AppError::new(4, "Every source failed; no records written."));
    }
    Ok(())
}

fn handle_normalize(args: NormalizeArgs) -> Result<(), AppError> {
    let csv = read_series_csv(&args.csv)?;
    for err in &csv.row_errors {
        warn!(line = err.line, "skipped row: {}", err.message);
    }

    let series = match args.kind {
        SeriesKind::Level => {
            let options = NormalizeOptions {
                base_year: args.base_year,
                convention: args.convention,
                decimals: args.decimals.unwrap_or(RATIO_DECIMALS),
            };
            normalize_with(&AnnualSeries::from_observations(&csv.observations), &options)?
        }
        SeriesKind::Rate => {
            let rates = AnnualRateSeries::from_observations(&csv.observations);
            let index = normalize_from_annual_rates(&rates, args.base_year)?;
            rescale(&index, args.convention, args.decimals.unwrap_or(COMPOUND_DECIMALS))
        }
    };

    print!("{}", crate::report::format_series_table(&series, 1));
    if let Some(path) = &args.export {
        write_series_csv(path, &series)?;
        info!(path = %path.display(), "exported normalized series");
    }
    Ok(())
}

fn handle_project(args: ProjectArgs) -> Result<(), AppError> {
    let record = read_record_json(&args.record)?;
    let series = record.series();

    let (from, to) = if args.clamp {
        let clamp = |y| clamp_year(y, &series).unwrap_or(y);
        (clamp(args.from), clamp(args.to))
    } else {
        (args.from, args.to)
    };

    let projection = project(args.amount, from, to, &series)?;
    print!("{}", crate::report::format_projection(&projection, &record.symbol));
    Ok(())
}

fn handle_ppp(args: PppArgs, settings: &Settings) -> Result<(), AppError> {
    let provider = HttpProvider::from_settings(settings)?;
    let (year, adjusted) =
        pipeline::fetch_ppp_adjustment(&provider.world_bank(), args.amount, &args.from, &args.to, args.year)?;
    println!(
        "{:.2} in {} buys what {:.2} buys in {} ({year} PPP)",
        args.amount,
        args.from.to_ascii_uppercase(),
        adjusted,
        args.to.to_ascii_uppercase()
    );
    Ok(())
}

fn handle_ratio(args: RatioArgs, settings: &Settings) -> Result<(), AppError> {
    let rows = match (&args.home, &args.income) {
        (Some(home), Some(income)) => {
            let range = args.range.range();
            let home = AnnualSeries::from_observations(&read_series_csv(home)?.observations).restrict(range);
            let income = AnnualSeries::from_observations(&read_series_csv(income)?.observations).restrict(range);
            price_to_income_ratio(&home, &income, args.base_year, args.base_price)?
        }
        _ => {
            let provider = HttpProvider::from_settings(settings)?;
            let fred = provider.fred()?;
            pipeline::fetch_price_to_income(&fred, args.range.range(), args.base_year, args.base_price)?
        }
    };
    print!("{}", crate::report::format_price_to_income(&rows));
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let record = read_record_json(&args.record)?;
    print!("{}", crate::report::format_record_summary(&record));
    Ok(())
}
