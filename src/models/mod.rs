// src/models/mod.rs

//! Domain models for the crawler application.

mod config;
mod moves;
mod record;

// Re-export all public types
pub use config::{
    Config, CrawlerConfig, LoggingConfig, PageSelectors, ProgressConfig, TargetConfig,
    parse_selector,
};
pub use moves::Move;
pub use record::{SolveRecord, solver_file_name};

/// Inclusive range of solve IDs visited by one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlRange {
    pub start: u64,
    pub end: u64,
}

impl CrawlRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Range for a resumed run: the ID after the checkpoint, plus `batch_size` more.
    pub fn after_checkpoint(last_id: u64, batch_size: u64) -> Self {
        let start = last_id.saturating_add(1);
        Self::new(start, start.saturating_add(batch_size))
    }

    pub fn total(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start).saturating_add(1)
        }
    }

    /// 1-based position of `id` within the range.
    pub fn position(&self, id: u64) -> u64 {
        id.saturating_sub(self.start).saturating_add(1)
    }
}
