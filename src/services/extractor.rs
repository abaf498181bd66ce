// src/services/extractor.rs

//! ZBLL extraction from a solve page.
//!
//! A reconstruction is a list of lines such as `R U R' U' // F2L 3`; the
//! line whose comment carries the ZBLL marker holds the last-layer moves.

use std::collections::HashSet;

use super::normalizer::normalize;
use super::page::SolvePage;

/// Result of reading one solve page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The page has no solver element.
    NoSolver,

    /// The solver is not one of the targeted names.
    Untargeted { solver: String },

    /// A targeted solver. `zbll` is absent when no line carries the marker.
    Matched {
        solver: String,
        zbll: Option<String>,
    },
}

impl Extraction {
    /// The solver and normalized ZBLL text, only for targeted solvers.
    pub fn into_match(self) -> Option<(String, Option<String>)> {
        match self {
            Extraction::Matched { solver, zbll } => Some((solver, zbll)),
            _ => None,
        }
    }
}

/// Extracts the ZBLL step for a set of accepted solvers.
#[derive(Debug, Clone)]
pub struct ZbllExtractor {
    solvers: HashSet<String>,
    marker: String,
}

impl ZbllExtractor {
    pub fn new<I, S>(solvers: I, marker: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            solvers: solvers.into_iter().map(Into::into).collect(),
            marker: marker.into(),
        }
    }

    pub fn accepts(&self, solver: &str) -> bool {
        self.solvers.contains(solver)
    }

    pub fn extract(&self, page: &dyn SolvePage) -> Extraction {
        let Some(solver) = page.solver_name() else {
            return Extraction::NoSolver;
        };
        if !self.accepts(&solver) {
            return Extraction::Untargeted { solver };
        }

        let zbll = page
            .reconstruction_lines()
            .and_then(|lines| self.find_zbll_moves(&lines).map(normalize));

        Extraction::Matched { solver, zbll }
    }

    /// Text before the first `//` on the first line carrying the marker.
    fn find_zbll_moves<'a>(&self, lines: &'a [String]) -> Option<&'a str> {
        lines
            .iter()
            .find(|line| line.contains(&self.marker))
            .map(|line| line.split("//").next().unwrap_or_default().trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePage {
        solver: Option<&'static str>,
        lines: Option<Vec<&'static str>>,
    }

    impl SolvePage for FakePage {
        fn solver_name(&self) -> Option<String> {
            self.solver.map(str::to_string)
        }

        fn reconstruction_lines(&self) -> Option<Vec<String>> {
            self.lines
                .as_ref()
                .map(|lines| lines.iter().map(|l| l.to_string()).collect())
        }
    }

    fn extractor() -> ZbllExtractor {
        ZbllExtractor::new(["Xuanyi Geng", "Bofan Zhang"], "// ZBLL")
    }

    fn page(solver: &'static str, lines: Vec<&'static str>) -> FakePage {
        FakePage {
            solver: Some(solver),
            lines: Some(lines),
        }
    }

    #[test]
    fn test_matched_zbll_is_normalized() {
        let page = page(
            "Xuanyi Geng",
            vec!["y2 // inspection", "U' R' R' U R U' // ZBLL", "// AUF"],
        );
        assert_eq!(
            extractor().extract(&page),
            Extraction::Matched {
                solver: "Xuanyi Geng".to_string(),
                zbll: Some("(U') R2' U R".to_string()),
            }
        );
    }

    #[test]
    fn test_first_marked_line_wins() {
        let page = page(
            "Bofan Zhang",
            vec!["R U R' // ZBLL", "F R F' // ZBLL (alt)"],
        );
        let (_, zbll) = extractor().extract(&page).into_match().unwrap();
        assert_eq!(zbll.as_deref(), Some("R U R'"));
    }

    #[test]
    fn test_splits_at_first_comment() {
        let page = page("Bofan Zhang", vec!["R U2 R' // ZBLL // 3.1s"]);
        let (_, zbll) = extractor().extract(&page).into_match().unwrap();
        assert_eq!(zbll.as_deref(), Some("R U2 R'"));
    }

    #[test]
    fn test_untargeted_solver_is_absent() {
        let page = page("Someone Else", vec!["R U R' // ZBLL"]);
        let extraction = extractor().extract(&page);
        assert_eq!(
            extraction,
            Extraction::Untargeted {
                solver: "Someone Else".to_string()
            }
        );
        assert_eq!(extraction.into_match(), None);
    }

    #[test]
    fn test_missing_solver() {
        let page = FakePage {
            solver: None,
            lines: Some(vec!["R U R' // ZBLL"]),
        };
        assert_eq!(extractor().extract(&page), Extraction::NoSolver);
    }

    #[test]
    fn test_no_marker_gives_absent_moves() {
        let page = page("Xuanyi Geng", vec!["R U R' U' // OLL", "R2 U // PLL"]);
        assert_eq!(
            extractor().extract(&page).into_match(),
            Some(("Xuanyi Geng".to_string(), None))
        );
    }

    #[test]
    fn test_missing_reconstruction_gives_absent_moves() {
        let page = FakePage {
            solver: Some("Xuanyi Geng"),
            lines: None,
        };
        assert_eq!(
            extractor().extract(&page).into_match(),
            Some(("Xuanyi Geng".to_string(), None))
        );
    }

    #[test]
    fn test_marker_without_moves_is_empty() {
        let page = page("Xuanyi Geng", vec!["// ZBLL skip"]);
        let (_, zbll) = extractor().extract(&page).into_match().unwrap();
        assert_eq!(zbll.as_deref(), Some(""));
    }
}
