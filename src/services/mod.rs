//! Service layer for the crawler application.
//!
//! This module contains the business logic for:
//! - Move sequence normalization (`normalize`)
//! - Solve page lookups (`PageLayout`, `SolvePage`)
//! - ZBLL extraction (`ZbllExtractor`)
//! - Duplicate tracking (`ProgressTracker`)

mod extractor;
mod normalizer;
mod page;
mod tracker;

pub use extractor::{Extraction, ZbllExtractor};
pub use normalizer::normalize;
pub use page::{HtmlSolvePage, PageLayout, SolvePage};
pub use tracker::ProgressTracker;
