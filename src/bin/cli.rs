//! reco.nz ZBLL Crawler CLI
//!
//! Local execution entry point.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use reco_zbll::{
    error::{AppError, Result},
    models::{Config, CrawlRange},
    pipeline,
    services::{Extraction, PageLayout, ZbllExtractor, normalize},
    storage::{CheckpointStore, LocalStorage, RecordStore},
    utils::{
        http::{FetchOutcome, PageFetcher, ReqwestFetcher, solve_url},
        log::{TeeWriter, open_log_file},
    },
};

/// reco-zbll - ZBLL collector for reco.nz reconstructions
#[derive(Parser, Debug)]
#[command(
    name = "reco-zbll",
    version,
    about = "Collects ZBLL algorithms from reco.nz solve reconstructions"
)]
struct Cli {
    /// Path to storage directory holding records, checkpoint and config
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Config file (default: {storage_dir}/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl solves, resuming after the saved checkpoint by default
    Crawl {
        /// First solve ID to visit (skips the checkpoint lookup)
        #[arg(long)]
        start: Option<u64>,

        /// Last solve ID to visit (default: start + batch size)
        #[arg(long, requires = "start")]
        end: Option<u64>,
    },

    /// Print the canonical form of a move sequence
    Normalize {
        /// Moves, e.g. `U R U R' U R U2 R'`
        #[arg(required = true, allow_hyphen_values = true)]
        moves: Vec<String>,
    },

    /// Extract the ZBLL from a single solve page
    Extract {
        /// Local HTML file
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        file: Option<PathBuf>,

        /// Solve ID to fetch
        #[arg(long)]
        id: Option<u64>,

        /// Accepted solver (repeatable; default: configured solvers)
        #[arg(long)]
        solver: Vec<String>,
    },

    /// Validate configuration
    Validate,

    /// Show checkpoint and record counts
    Info,
}

/// Initialize logging based on verbosity flag, mirroring to `log_file` when set.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    builder.format_timestamp_secs();

    if let Some(path) = log_file {
        let tee = TeeWriter::new(std::io::stderr(), open_log_file(path)?);
        builder
            .target(env_logger::Target::Pipe(Box::new(tee)))
            .write_style(env_logger::WriteStyle::Never);
    }

    builder.init();
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.storage_dir.join("config.toml"));
    let (config, load_error) = match Config::load(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let log_file = (!config.logging.file.is_empty())
        .then(|| cli.storage_dir.join(&config.logging.file));
    init_logging(cli.verbose, log_file.as_deref())?;

    match load_error {
        Some(e) => log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            config_path.display(),
            e
        ),
        None => log::debug!("Loaded configuration from {}", config_path.display()),
    }

    let storage = LocalStorage::with_checkpoint(&cli.storage_dir, &config.progress.checkpoint_file);

    match cli.command {
        Command::Crawl { start, end } => {
            config.validate()?;

            let range = start.map(|start| {
                let end = end.unwrap_or(start.saturating_add(config.progress.batch_size));
                CrawlRange::new(start, end)
            });
            let fetcher = ReqwestFetcher::from_config(&config.crawler)?;
            let summary = pipeline::run_batch(&config, &fetcher, &storage, range).await?;

            log::info!("Done! {} new ZBLL records", summary.total_new());
        }

        Command::Normalize { moves } => {
            println!("{}", normalize(&moves.join(" ")));
        }

        Command::Extract { file, id, solver } => {
            let solvers = if solver.is_empty() {
                config.targets.solvers.clone()
            } else {
                solver
            };

            let body = match (file, id) {
                (Some(path), _) => std::fs::read_to_string(&path)?,
                (None, Some(id)) => fetch_solve(&config, id).await?,
                (None, None) => return Err(AppError::config("Either --file or --id is required")),
            };

            let layout = PageLayout::new(&config.selectors)?;
            let extractor = ZbllExtractor::new(solvers, config.selectors.zbll_marker.clone());
            let page = layout.parse(&body);

            match extractor.extract(&page) {
                Extraction::NoSolver => log::warn!("No solver found on the page"),
                Extraction::Untargeted { solver } => {
                    log::warn!("Solver {} is not in the accepted list", solver)
                }
                Extraction::Matched { solver, zbll: None } => {
                    log::warn!("{}: no ZBLL step in the reconstruction", solver)
                }
                Extraction::Matched {
                    solver,
                    zbll: Some(zbll),
                } => println!("{solver}\t{zbll}"),
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} solvers, base URL {})",
                config.targets.solvers.len(),
                config.crawler.base_url
            );
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            let checkpoint = storage
                .read_last_id(config.progress.default_start_id)
                .await?;
            log::info!(
                "Checkpoint: {} (next run starts at {})",
                checkpoint,
                checkpoint.saturating_add(1)
            );

            for solver in &config.targets.solvers {
                match storage.load_records(solver).await {
                    Ok(records) => log::info!("{}: {} records", solver, records.len()),
                    Err(e) => log::warn!("{}: unreadable records ({})", solver, e),
                }
            }
        }
    }

    Ok(())
}

/// Fetch one solve page, treating anything but a success as an error.
async fn fetch_solve(config: &Config, id: u64) -> Result<String> {
    let fetcher = ReqwestFetcher::from_config(&config.crawler)?;
    let url = solve_url(&config.crawler.base_url, id);

    match fetcher.fetch(&url).await {
        FetchOutcome::Success(body) => Ok(body),
        FetchOutcome::NotFound => Err(AppError::crawl(url, "solve not found")),
        FetchOutcome::RateLimited => Err(AppError::crawl(url, "rate limited, try again later")),
        FetchOutcome::Failed(failure) => Err(AppError::crawl(url, failure)),
    }
}
