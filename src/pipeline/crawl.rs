// src/pipeline/crawl.rs

//! Solve crawling pipeline.
//!
//! IDs are visited strictly in order, one request at a time:
//!
//! - 429: sleep for the backoff, then retry the same ID
//! - 404: the newest solve has been passed, stop the run
//! - timeout or other error: log it and move on without advancing the checkpoint
//! - success: advance the checkpoint and collect the ZBLL for targeted solvers

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Config, CrawlRange, SolveRecord};
use crate::services::{Extraction, PageLayout, ProgressTracker, ZbllExtractor};
use crate::storage::{CheckpointStore, RecordStore};
use crate::utils::http::{FetchFailure, FetchOutcome, PageFetcher, solve_url};
use crate::utils::log::{header, id_prefix, summary};

/// What a crawl run did.
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub range: CrawlRange,
    /// Highest ID whose page was fetched successfully
    pub last_definitive_id: u64,
    pub pages_fetched: u64,
    pub failures: u64,
    pub rate_limited: u64,
    /// Records appended during this run, per solver
    pub new_records: BTreeMap<String, usize>,
    /// ID that returned 404 and ended the run
    pub stopped_at_not_found: Option<u64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl CrawlSummary {
    fn new(range: CrawlRange) -> Self {
        let now = Utc::now();
        Self {
            range,
            last_definitive_id: range.start.saturating_sub(1),
            pages_fetched: 0,
            failures: 0,
            rate_limited: 0,
            new_records: BTreeMap::new(),
            stopped_at_not_found: None,
            start_time: now,
            end_time: now,
        }
    }

    pub fn total_new(&self) -> usize {
        self.new_records.values().sum()
    }

    fn log(&self) {
        let duration = self.end_time - self.start_time;
        let mut items = vec![
            ("Range", format!("{}..={}", self.range.start, self.range.end)),
            ("Last definitive ID", self.last_definitive_id.to_string()),
            ("Pages fetched", self.pages_fetched.to_string()),
            ("Failures", self.failures.to_string()),
            ("Rate limited", self.rate_limited.to_string()),
            ("Duration", format!("{}s", duration.num_seconds())),
        ];
        if let Some(id) = self.stopped_at_not_found {
            items.push(("Stopped at", format!("ID {id} (not found)")));
        }
        items.push(("New records", self.total_new().to_string()));
        summary("Crawl finished", &items);

        for (solver, count) in &self.new_records {
            log::info!("    {}: +{}", solver, count);
        }
    }
}

/// Per-run state shared by every ID in the loop.
struct CrawlContext<'a> {
    base_url: &'a str,
    layout: PageLayout,
    extractor: ZbllExtractor,
    tracker: ProgressTracker,
    store: &'a dyn RecordStore,
}

impl CrawlContext<'_> {
    async fn handle_page(
        &mut self,
        id: u64,
        body: &str,
        prefix: &str,
        summary: &mut CrawlSummary,
    ) -> Result<()> {
        let extraction = {
            let page = self.layout.parse(body);
            self.extractor.extract(&page)
        };

        let (solver, zbll) = match extraction {
            Extraction::NoSolver => {
                log::info!("{} Skip", prefix);
                return Ok(());
            }
            Extraction::Untargeted { solver } => {
                log::info!("{} Skip ({} not targeted)", prefix, solver);
                return Ok(());
            }
            Extraction::Matched { solver, zbll } => (solver, zbll),
        };

        let Some(zbll) = zbll.filter(|z| !z.is_empty()) else {
            log::info!("{} Skip ({} has no ZBLL step)", prefix, solver);
            return Ok(());
        };

        if self.tracker.exists(&solver, id) {
            log::info!("{} Already recorded {} - {}", prefix, solver, zbll);
            return Ok(());
        }

        let record = SolveRecord::new(id, solve_url(self.base_url, id), zbll);
        self.store.append(&solver, &record).await?;
        self.tracker.record(&solver, id);
        *summary.new_records.entry(solver.clone()).or_default() += 1;
        log::info!("{} FOUND {} - {}", prefix, solver, record.zbll);

        Ok(())
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Crawl `range` and append new ZBLL records for the configured solvers.
///
/// Returns once the range is exhausted or a solve is not found. A record
/// that cannot be stored is counted as a failure and left for a later run;
/// only setup errors abort the run. The checkpoint is left to the caller.
pub async fn run_crawler(
    config: &Config,
    fetcher: &dyn PageFetcher,
    store: &dyn RecordStore,
    range: CrawlRange,
) -> Result<CrawlSummary> {
    let solvers = &config.targets.solvers;
    let delay = Duration::from_millis(config.crawler.request_delay_ms);
    let backoff = Duration::from_secs(config.crawler.rate_limit_backoff_secs);

    let mut ctx = CrawlContext {
        base_url: &config.crawler.base_url,
        layout: PageLayout::new(&config.selectors)?,
        extractor: ZbllExtractor::new(solvers.iter().cloned(), config.selectors.zbll_marker.clone()),
        tracker: ProgressTracker::load(store, solvers).await?,
        store,
    };

    let mut summary = CrawlSummary::new(range);
    log::info!(
        "Crawling {} solvers from ID {} to {}...",
        solvers.len(),
        range.start,
        range.end
    );

    'ids: for id in range.start..=range.end {
        let prefix = id_prefix(&range, id);
        let url = solve_url(ctx.base_url, id);

        loop {
            match fetcher.fetch(&url).await {
                FetchOutcome::RateLimited => {
                    summary.rate_limited += 1;
                    log::warn!(
                        "{} 429 Too Many Requests. Sleeping {}s before retrying...",
                        prefix,
                        backoff.as_secs()
                    );
                    pause(backoff).await;
                    continue;
                }
                FetchOutcome::NotFound => {
                    log::info!("{} 404 Not found. Reached the newest solve, stopping.", prefix);
                    summary.stopped_at_not_found = Some(id);
                    break 'ids;
                }
                FetchOutcome::Failed(FetchFailure::Timeout) => {
                    summary.failures += 1;
                    log::warn!("{} Timeout, server responded too slowly.", prefix);
                }
                FetchOutcome::Failed(failure) => {
                    summary.failures += 1;
                    log::error!("{} Error - {}", prefix, failure);
                }
                FetchOutcome::Success(body) => {
                    summary.last_definitive_id = id;
                    summary.pages_fetched += 1;
                    if let Err(e) = ctx.handle_page(id, &body, &prefix, &mut summary).await {
                        summary.failures += 1;
                        log::error!("{} Error - {}", prefix, e);
                    }
                }
            }
            break;
        }

        pause(delay).await;
    }

    summary.end_time = Utc::now();
    Ok(summary)
}

/// Crawl one batch and persist the checkpoint.
///
/// Without an explicit range the batch starts right after the stored
/// checkpoint. The checkpoint never moves backwards.
pub async fn run_batch<S>(
    config: &Config,
    fetcher: &dyn PageFetcher,
    storage: &S,
    range: Option<CrawlRange>,
) -> Result<CrawlSummary>
where
    S: RecordStore + CheckpointStore,
{
    header("reco.nz ZBLL crawler");

    let checkpoint = storage
        .read_last_id(config.progress.default_start_id)
        .await?;
    let range = range
        .unwrap_or_else(|| CrawlRange::after_checkpoint(checkpoint, config.progress.batch_size));
    log::info!("Checkpoint: {}", checkpoint);

    let summary = run_crawler(config, fetcher, storage, range).await?;

    let next_checkpoint = summary.last_definitive_id.max(checkpoint);
    storage.write_last_id(next_checkpoint).await?;
    summary.log();
    log::info!("Saved checkpoint for the next run: {}", next_checkpoint);

    Ok(summary)
}
