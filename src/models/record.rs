//! Solve record data structure.

use serde::{Deserialize, Serialize};

/// A ZBLL algorithm collected from one solve page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SolveRecord {
    /// Solve ID assigned by the site
    pub id: u64,

    /// Full URL to the solve page
    pub url: String,

    /// Canonical ZBLL move text
    pub zbll: String,
}

impl SolveRecord {
    pub fn new(id: u64, url: impl Into<String>, zbll: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            zbll: zbll.into(),
        }
    }
}

/// File name holding a solver's records, e.g. `Xuanyi_Geng_zbll_algs.json`.
pub fn solver_file_name(solver: &str) -> String {
    format!("{}_zbll_algs.json", solver.replace(' ', "_"))
}
