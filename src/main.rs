//! Demand Pager - Main Entry Point
//!
//! Usage: demand-pager [OPTIONS] <ADDRESSES>
//!
//! Translates every logical address in `ADDRESSES` (one per line) to a
//! physical address, loading pages from the backing store on first use, and
//! writes one report line per address plus the page fault summary.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;

use demand_pager::constants::{DEFAULT_BACKING_STORE, DEFAULT_OUTPUT};
use demand_pager::io::{read_addresses, ReportWriter};
use demand_pager::memory::BackingStore;
use demand_pager::{ExhaustionPolicy, PagerError, PagingConfig, Translator};

#[derive(Parser, Debug)]
#[command(name = "demand-pager")]
#[command(version)]
#[command(about = "Translate logical addresses to physical addresses with demand paging")]
struct Args {
    /// File with one logical address per line
    addresses: PathBuf,

    /// Backing store holding every page of the logical address space
    #[arg(short, long, default_value = DEFAULT_BACKING_STORE)]
    backing_store: PathBuf,

    /// Report file, or `-` for stdout
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// TOML file with paging geometry
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of physical frames (overrides the config file)
    #[arg(long)]
    frames: Option<usize>,

    /// What to do once every frame is in use (overrides the config file)
    #[arg(long, value_enum)]
    on_exhaustion: Option<ExhaustionPolicy>,

    /// Log every translation and page fault
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(&args) {
        log::error!("{:#}", e);
        process::exit(exit_code(&e));
    }
}

/// Exit status for a failed run, taken from the underlying `PagerError`
fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<PagerError>().map_or(1, PagerError::exit_code)
}

fn load_config(args: &Args) -> Result<PagingConfig> {
    let mut config = match &args.config {
        Some(path) => PagingConfig::from_file(path)?,
        None => PagingConfig::default(),
    };
    if let Some(frames) = args.frames {
        config.frame_count = frames;
    }
    if let Some(policy) = args.on_exhaustion {
        config.on_exhaustion = policy;
    }
    config.validate()?;
    Ok(config)
}

/// Main logic separated from main() for cleaner error handling
fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;

    log::info!("Configuration:");
    log::info!("  Page size:     {} bytes", config.page_size());
    log::info!("  Page table:    {} entries", config.page_table_size);
    log::info!("  Frames:        {}", config.frame_count);
    log::info!("  On exhaustion: {:?}", config.on_exhaustion);

    // Step 1: Open every resource before any translation work
    let addresses = read_addresses(&args.addresses)?;
    let mut report = ReportWriter::create(&args.output)?;
    let store = BackingStore::open(&args.backing_store, config.page_size())?;

    match store.page_count() {
        Some(pages) if pages < config.page_table_size => log::warn!(
            "backing store {} holds {} pages, fewer than the {} page table entries",
            args.backing_store.display(),
            pages,
            config.page_table_size
        ),
        _ => {}
    }
    log::info!("Logical addresses to translate: {}", addresses.len());

    // Step 2: Translate in input order
    let mut translator = Translator::new(&config, store)?;
    let records = translator.translate_all(addresses)?;
    let stats = translator.statistics();

    // Step 3: Report
    report.write_records(&records)?;
    report.write_summary(&stats)?;
    report.finish()?;

    log::info!("Page faults: {} of {} addresses", stats.fault_count, stats.address_count);
    if let Some(rate) = stats.fault_rate() {
        log::info!("Page fault rate: {:.3}", rate);
    }
    log::info!("Successfully generated output file '{}'", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_exit_code_follows_failed_resource() {
        let err = anyhow::Error::from(PagerError::BackingStoreOpen {
            path: PathBuf::from("BACKING_STORE.bin"),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
        assert_eq!(exit_code(&err), 3);

        let err = anyhow::Error::from(PagerError::InvalidAddress { line: 1, token: "x".into() });
        assert_eq!(exit_code(&err.context("reading addresses")), 1);

        assert_eq!(exit_code(&anyhow::anyhow!("something else")), 1);
    }

    #[test]
    fn test_missing_resources_fail_before_translation() {
        let args = Args::parse_from([
            "demand-pager",
            "/nonexistent/addresses.txt",
            "--backing-store",
            "/nonexistent/BACKING_STORE.bin",
            "--output",
            "-",
        ]);
        let err = run(&args).unwrap_err();
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn test_cli_overrides() {
        let args = Args::parse_from([
            "demand-pager",
            "in.txt",
            "--frames",
            "64",
            "--on-exhaustion",
            "wrap",
        ]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.frame_count, 64);
        assert_eq!(config.on_exhaustion, ExhaustionPolicy::Wrap);

        let args = Args::parse_from(["demand-pager", "in.txt", "--frames", "0"]);
        let err = load_config(&args).unwrap_err();
        assert_eq!(exit_code(&err), 4);
    }
}
