//! Tracks which solve IDs are already persisted per solver.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::storage::RecordStore;

/// In-memory view of persisted (solver, id) pairs.
#[derive(Debug, Default, Clone)]
pub struct ProgressTracker {
    seen: HashMap<String, HashSet<u64>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the tracker from every solver's persisted collection.
    pub async fn load<S: AsRef<str>>(store: &dyn RecordStore, solvers: &[S]) -> Result<Self> {
        let mut tracker = Self::new();
        for solver in solvers {
            let solver = solver.as_ref();
            let ids = store.load_existing_ids(solver).await?;
            log::info!("Loaded {} existing records for {}", ids.len(), solver);
            tracker.seen.insert(solver.to_string(), ids);
        }
        Ok(tracker)
    }

    pub fn exists(&self, solver: &str, id: u64) -> bool {
        self.seen.get(solver).is_some_and(|ids| ids.contains(&id))
    }

    /// Mark a pair as persisted. Call only after the append succeeded.
    pub fn record(&mut self, solver: &str, id: u64) {
        self.seen.entry(solver.to_string()).or_default().insert(id);
    }

    pub fn count(&self, solver: &str) -> usize {
        self.seen.get(solver).map_or(0, HashSet::len)
    }
}
