//! Greed/Fear CLI: compute, refresh and display the sentiment series.
//!
//! Commands:
//! - `compute`: fetch the full history, compute greed/fear, overwrite the store
//! - `refresh`: after market close, fetch, recompute and merge into the store
//! - `show`: print the last reading of a date range and its table from the store
//! - `config`: print the effective configuration as TOML

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use greedfear_core::data::{
    ingest_fetched, CsvProvider, DataProvider, SyntheticProvider, YahooProvider,
};
use greedfear_core::domain::SentimentRecord;
use greedfear_core::refresh::{refresh, RefreshOutcome};
use greedfear_core::store::{Series, SeriesStore};
use greedfear_core::{compute_sentiment, SentimentConfig};
use std::path::PathBuf;

/// Months shown by `show` when no range is given.
const DEFAULT_WINDOW_MONTHS: u32 = 2;

#[derive(Parser)]
#[command(
    name = "greedfear",
    about = "Greed/Fear sentiment index from daily OHLCV bars"
)]
struct Cli {
    /// TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Yahoo,
    Csv,
    Synthetic,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Where bars come from.
    #[arg(long, value_enum, default_value_t = Source::Yahoo)]
    source: Source,

    /// Bar CSV file (required with --source csv).
    #[arg(long)]
    input: Option<PathBuf>,

    /// Instrument symbol. Overrides the config file.
    #[arg(long)]
    symbol: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full series from scratch and overwrite the store.
    Compute {
        #[command(flatten)]
        source: SourceArgs,

        /// First bar date (YYYY-MM-DD). Overrides refresh.history_start.
        #[arg(long)]
        start: Option<String>,

        /// Last bar date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Series file (.csv or .parquet). Overrides refresh.store_path.
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Fetch the latest bars and merge new days into the store.
    Refresh {
        #[command(flatten)]
        source: SourceArgs,

        /// Run even before the cutoff hour.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Series file (.csv or .parquet). Overrides refresh.store_path.
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Show the latest reading and the series over a date range.
    Show {
        /// Series file (.csv or .parquet). Overrides refresh.store_path.
        #[arg(long)]
        store: Option<PathBuf>,

        /// Range start (YYYY-MM-DD). Defaults to two months before the latest row.
        #[arg(long)]
        start: Option<String>,

        /// Range end (YYYY-MM-DD). Defaults to the latest row.
        #[arg(long)]
        end: Option<String>,

        /// Print JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SentimentConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SentimentConfig::default(),
    };

    match cli.command {
        Commands::Compute {
            source,
            start,
            end,
            store,
        } => run_compute(config, source, start, end, store),
        Commands::Refresh {
            source,
            force,
            store,
        } => run_refresh(config, source, force, store),
        Commands::Show {
            store,
            start,
            end,
            json,
        } => run_show(config, store, start, end, json),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn parse_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
    s.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
    })
    .transpose()
}

fn build_provider(args: &SourceArgs) -> Result<Box<dyn DataProvider>> {
    Ok(match args.source {
        Source::Yahoo => Box::new(YahooProvider::new()?),
        Source::Synthetic => Box::new(SyntheticProvider),
        Source::Csv => match &args.input {
            Some(path) => Box::new(CsvProvider::new(path)),
            None => bail!("--source csv requires --input <FILE>"),
        },
    })
}

fn apply_overrides(config: &mut SentimentConfig, args: &SourceArgs, store: Option<PathBuf>) {
    if let Some(symbol) = &args.symbol {
        config.symbol = symbol.clone();
    }
    if let Some(path) = store {
        config.refresh.store_path = path;
    }
}

fn run_compute(
    mut config: SentimentConfig,
    args: SourceArgs,
    start: Option<String>,
    end: Option<String>,
    store: Option<PathBuf>,
) -> Result<()> {
    apply_overrides(&mut config, &args, store);
    if let Some(start) = parse_date(start.as_deref())? {
        config.refresh.history_start = start;
    }
    config.validate()?;
    let end = parse_date(end.as_deref())?.unwrap_or_else(|| chrono::Local::now().date_naive());

    let provider = build_provider(&args)?;
    let fetched = provider.fetch(&config.symbol, config.refresh.history_start, end)?;
    let source = fetched.source;
    let report = ingest_fetched(fetched, config.ingest.max_rejected_fraction)?;
    if report.rejected > 0 {
        log::warn!("{} malformed bar(s) excluded", report.rejected);
    }

    let run = compute_sentiment(&report.bars, &config);
    if run.records.is_empty() {
        bail!(
            "insufficient history: {} bars < {} required",
            report.bars.len(),
            run.required_bars
        );
    }

    let store = SeriesStore::new(&config.refresh.store_path)?;
    let series = Series::from_records(run.records);
    let meta = store.save(&series)?;

    println!(
        "{} ({}): {} bars -> {} rows, {} to {}",
        config.symbol,
        source,
        report.bars.len(),
        meta.rows,
        fmt_date(meta.start_date),
        fmt_date(meta.end_date)
    );
    println!("Saved to: {}", store.path().display());
    if let Some(latest) = series.latest() {
        print_latest(latest);
    }
    Ok(())
}

fn run_refresh(
    mut config: SentimentConfig,
    args: SourceArgs,
    force: bool,
    store: Option<PathBuf>,
) -> Result<()> {
    apply_overrides(&mut config, &args, store);
    let provider = build_provider(&args)?;
    let store = SeriesStore::new(&config.refresh.store_path)?;
    let now = chrono::Local::now().naive_local();

    match refresh(provider.as_ref(), &store, &config, now, force)? {
        RefreshOutcome::Skipped { hour, cutoff_hour } => {
            println!("Skipped: hour {hour} is not after the {cutoff_hour}:00 cutoff (use --force)");
        }
        RefreshOutcome::Updated { added, total } => {
            println!("Updated {}: {added} new rows, {total} total", store.path().display());
        }
    }
    Ok(())
}

fn run_show(
    config: SentimentConfig,
    store: Option<PathBuf>,
    start: Option<String>,
    end: Option<String>,
    json: bool,
) -> Result<()> {
    let path = store.unwrap_or(config.refresh.store_path);
    let store = SeriesStore::new(&path)?;
    let series = store.load()?;
    let Some((default_start, default_end)) = series.default_window(DEFAULT_WINDOW_MONTHS) else {
        println!("Series is empty: {}", path.display());
        return Ok(());
    };

    let start = parse_date(start.as_deref())?.unwrap_or(default_start);
    let end = parse_date(end.as_deref())?.unwrap_or(default_end);
    if start > end {
        bail!("start {start} is after end {end}");
    }
    let rows = series.range(Some(start), Some(end));
    let Some(latest) = series.latest_in(Some(start), Some(end)) else {
        println!("No rows between {start} and {end} in {}", path.display());
        return Ok(());
    };

    if json {
        let out = serde_json::json!({
            "latest": latest,
            "greed_level": latest.greed_level(),
            "fear_level": latest.fear_level(),
            "start": start,
            "end": end,
            "rows": rows,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_latest(latest);
    println!();
    println!("{start} to {end} ({} rows)", rows.len());
    println!(
        "{:<12} {:>10} {:>8} {:>8} {:>10}",
        "Date", "Close", "Greed", "Fear", "Volatility"
    );
    println!("{}", "-".repeat(52));
    for r in rows {
        println!(
            "{:<12} {:>10.2} {:>8.1} {:>8.1} {:>10}",
            r.date.to_string(),
            r.close,
            r.greed,
            r.fear,
            r.volatility.map_or("-".to_string(), |v| format!("{v:.3}"))
        );
    }
    Ok(())
}

fn print_latest(r: &SentimentRecord) {
    let change = r
        .pct_change
        .map_or("-".to_string(), |p| format!("{p:+.2}%"));
    println!("Latest {}: close {:.2} ({change})", r.date, r.close);
    println!("  Greed {:>5.1}  {}", r.greed, r.greed_level());
    println!("  Fear  {:>5.1}  {}", r.fear, r.fear_level());
}

fn fmt_date(d: Option<NaiveDate>) -> String {
    d.map_or("-".to_string(), |d| d.to_string())
}
