//! Main entry point for the reviewer binary
//!
//! Wires the reviewer to the HTTP matching service and runs one command per
//! invocation. Logs go to stderr; command output goes to stdout.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use reviewer::{
    display, Page, PriceListFile, RealMatchingService, ReviewConfig, ReviewUpdate, Reviewer,
};
use shared::{logging, review_debug, Component, ExportFormat, FilterSelection, MasterEntryId, RecordId};

/// Review and correct supplier price-list matches
#[derive(Parser)]
#[command(name = "reviewer")]
#[command(about = "Review automatic price-list matches and resolve the rest by hand")]
pub struct Args {
    /// Matching service base URL (overrides PRICEMATCH_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Page size for list requests
    #[arg(long, global = true)]
    pub page_limit: Option<u32>,

    /// Confidence below this percentage is flagged for review
    #[arg(long, global = true)]
    pub attention_threshold: Option<u8>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List reconciliation records with their match tier
    Results {
        /// all, matched or unmatched
        #[arg(long, default_value = "all")]
        filter: FilterSelection,
    },
    /// Search the master catalog
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Open a manual match session for a record
    Review {
        record_id: RecordId,
        /// Search with this query instead of the seeded one
        #[arg(long)]
        query: Option<String>,
        /// Commit the N-th candidate (1-based)
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Link a record to a catalog entry directly
    Match {
        record_id: RecordId,
        master_id: MasterEntryId,
    },
    /// Upload a supplier price list and run automatic matching
    Upload {
        file: PathBuf,
        #[arg(long)]
        supplier: String,
    },
    /// Download the catalog export of matched records
    Export {
        /// csv or xml
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List master catalog entries
    Catalog {
        #[arg(long, default_value = "0")]
        skip: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = load_config(&args)?;
    logging::log_startup(Component::Cli, &format!("reviewer against {}", config.api_url));

    let service = RealMatchingService::new(&config).context("failed to build HTTP client")?;
    let links = service.clone();
    let mut reviewer = Reviewer::new(service, config);

    match args.command {
        Command::Results { filter } => {
            reviewer.set_filter(filter);
            settle(&mut reviewer).await?;
            print_results(&reviewer);
        }
        Command::Search { query } => {
            let entries = reviewer.search_catalog(&query.join(" ")).await?;
            if entries.is_empty() {
                println!("No catalog entries found");
            }
            for entry in &entries {
                println!("{}", display::catalog_row(None, entry));
            }
        }
        Command::Review { record_id, query, pick } => {
            load_record(&mut reviewer, record_id).await?;
            reviewer.open_session(record_id)?;
            if let Some(query) = query {
                reviewer.search(&query)?;
            }
            settle(&mut reviewer).await?;

            let session = reviewer.session().context("manual match session closed unexpectedly")?;
            println!("Searching for \"{}\"", session.query());
            let candidates = session.results().to_vec();
            if candidates.is_empty() {
                println!("No catalog entries found");
            }
            for (i, entry) in candidates.iter().enumerate() {
                println!("{}", display::catalog_row(Some(i + 1), entry));
            }

            match pick {
                Some(n) => {
                    let Some(entry) = n.checked_sub(1).and_then(|i| candidates.get(i)) else {
                        bail!("--pick {n} is out of range (1..={})", candidates.len());
                    };
                    commit(&mut reviewer, entry.id).await?;
                }
                None => reviewer.cancel_session()?,
            }
        }
        Command::Match { record_id, master_id } => {
            load_record(&mut reviewer, record_id).await?;
            reviewer.open_session(record_id)?;
            commit(&mut reviewer, master_id).await?;
        }
        Command::Upload { file, supplier } => {
            let file = PriceListFile::from_path(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            reviewer.stage_file(file)?;
            reviewer.set_supplier_name(supplier);
            reviewer.submit_upload()?;

            for update in settle(&mut reviewer).await? {
                if let ReviewUpdate::SubmissionCompleted { summary } = update {
                    println!("{}", summary.message);
                    println!("Matched: {}  Remaining: {}", summary.matched, summary.remaining);
                }
            }
            print_results(&reviewer);
        }
        Command::Export { format, out } => {
            let bytes = reviewer.export(format).await?;
            let path = out.unwrap_or_else(|| default_export_path(format));
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;

            println!("Saved {} bytes to {}", bytes.len(), path.display());
            println!("Direct link: {}", links.export_url(format)?);
        }
        Command::Catalog { skip, limit } => {
            let page = Page::new(skip, limit.unwrap_or(reviewer.config().page.limit));
            let entries = reviewer.list_master_items(page).await?;
            for entry in &entries {
                println!("{}", display::catalog_row(None, entry));
            }
            println!("{} entries (skip {})", entries.len(), page.skip);
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<ReviewConfig> {
    let config = ReviewConfig::from_env().context("invalid environment configuration")?;
    let config = apply_overrides(config, args)?;
    review_debug!(Component::Cli, config = ?config, "Configuration loaded");
    Ok(config)
}

/// Command-line flags take precedence over the environment
fn apply_overrides(mut config: ReviewConfig, args: &Args) -> Result<ReviewConfig> {
    if let Some(url) = &args.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(limit) = args.page_limit {
        config = config.with_page_limit(limit);
    }
    if let Some(threshold) = args.attention_threshold {
        config = config.with_attention_threshold(threshold);
    }

    config.validate()?;
    Ok(config)
}

/// Drain all in-flight requests, failing on the first error
async fn settle(reviewer: &mut Reviewer<RealMatchingService>) -> Result<Vec<ReviewUpdate>> {
    reviewer.settle().await.into_iter().map(|r| r.map_err(anyhow::Error::from)).collect()
}

async fn load_record(reviewer: &mut Reviewer<RealMatchingService>, record_id: RecordId) -> Result<()> {
    reviewer.set_filter(FilterSelection::All);
    settle(reviewer).await?;
    if reviewer.store().find(record_id).is_none() {
        bail!("record {record_id} not found in the loaded results");
    }
    Ok(())
}

async fn commit(reviewer: &mut Reviewer<RealMatchingService>, master_id: MasterEntryId) -> Result<()> {
    reviewer.select_and_commit(master_id)?;
    for update in settle(reviewer).await? {
        if let ReviewUpdate::MatchCommitted { record_id, master_id } = update {
            println!("Record {record_id} matched to catalog entry {master_id}");
        }
    }
    Ok(())
}

fn print_results(reviewer: &Reviewer<RealMatchingService>) {
    let threshold = reviewer.config().attention_threshold;
    let summary = reviewer.store().summary(threshold);

    println!("{}", display::filter_options(reviewer.store().filter(), &summary));
    for record in reviewer.store().records() {
        println!("{}", display::record_row(record, threshold));
    }
    println!("{}", display::summary_line(&summary));
}

fn default_export_path(format: ExportFormat) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("{stamp}_{}", format.default_file_name()))
}
