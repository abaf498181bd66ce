//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: Visit a range of solve IDs and collect ZBLL records
//! - `run_batch`: Resume from the checkpoint, crawl, and save the new checkpoint

pub mod crawl;

pub use crawl::{CrawlSummary, run_batch, run_crawler};
