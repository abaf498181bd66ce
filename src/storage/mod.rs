//! Storage abstractions for solve record persistence.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── config.toml                      # Crawler configuration
//! ├── last_id.txt                      # Checkpoint: last definitive solve ID
//! ├── Xuanyi_Geng_zbll_algs.json       # Append-only records, one file per solver
//! └── Tymon_Kolasiński_zbll_algs.json
//! ```

pub mod local;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::SolveRecord;

// Re-export for convenience
pub use local::LocalStorage;

/// Per-solver, append-only record collections.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// IDs already persisted for a solver.
    ///
    /// Entries count by their `id` alone. A missing or syntactically broken
    /// collection is reinitialized and reported as empty.
    async fn load_existing_ids(&self, solver: &str) -> Result<HashSet<u64>>;

    /// Append a record, leaving every existing entry untouched.
    async fn append(&self, solver: &str, record: &SolveRecord) -> Result<()>;

    /// All records persisted for a solver, in append order.
    async fn load_records(&self, solver: &str) -> Result<Vec<SolveRecord>>;
}

/// The highest solve ID with a definitive fetch outcome.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Stored checkpoint, or `default` if there is none.
    async fn read_last_id(&self, default: u64) -> Result<u64>;

    async fn write_last_id(&self, last_id: u64) -> Result<()>;
}
