//! Solve page structure lookups.

use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::models::{PageSelectors, parse_selector};

/// The parts of a solve page the extractor reads.
pub trait SolvePage {
    /// Display name of the solver, if the page has one.
    fn solver_name(&self) -> Option<String>;

    /// Non-empty reconstruction lines in document order.
    fn reconstruction_lines(&self) -> Option<Vec<String>>;
}

/// Compiled page selectors, reusable across pages.
#[derive(Debug, Clone)]
pub struct PageLayout {
    solver_name: Selector,
    reconstruction: Selector,
}

impl PageLayout {
    pub fn new(selectors: &PageSelectors) -> Result<Self> {
        Ok(Self {
            solver_name: parse_selector(&selectors.solver_name)?,
            reconstruction: parse_selector(&selectors.reconstruction)?,
        })
    }

    /// Parse a page body against this layout.
    pub fn parse<'a>(&'a self, html: &str) -> HtmlSolvePage<'a> {
        HtmlSolvePage {
            document: Html::parse_document(html),
            layout: self,
        }
    }
}

/// A parsed solve page.
pub struct HtmlSolvePage<'a> {
    document: Html,
    layout: &'a PageLayout,
}

impl HtmlSolvePage<'_> {
    fn first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.document.select(selector).next()
    }
}

impl SolvePage for HtmlSolvePage<'_> {
    fn solver_name(&self) -> Option<String> {
        let element = self.first(&self.layout.solver_name)?;
        let name = element.text().collect::<String>().trim().to_string();
        (!name.is_empty()).then_some(name)
    }

    fn reconstruction_lines(&self) -> Option<Vec<String>> {
        let element = self.first(&self.layout.reconstruction)?;
        let lines = element
            .text()
            .flat_map(str::lines)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Some(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <h1>Solve <a id="solver-link" href="/solver/1">
            Xuanyi Geng
          </a></h1>
          <div id="reconstruction">
            z2 // inspection<br>
            R' D' R U' R' D R // cross<br>
            <span>U R U' R'</span> // F2L 1<br>

            U2 R U R' U R U2 R' // ZBLL
          </div>
        </body></html>
    "#;

    fn layout() -> PageLayout {
        PageLayout::new(&PageSelectors::default()).unwrap()
    }

    #[test]
    fn test_solver_name_trimmed() {
        let layout = layout();
        let page = layout.parse(PAGE);
        assert_eq!(page.solver_name(), Some("Xuanyi Geng".to_string()));
    }

    #[test]
    fn test_reconstruction_lines() {
        let layout = layout();
        let page = layout.parse(PAGE);
        let lines = page.reconstruction_lines().unwrap();
        assert_eq!(lines[0], "z2 // inspection");
        assert_eq!(lines[2], "U R U' R'");
        assert_eq!(lines[3], "// F2L 1");
        assert_eq!(lines.last().unwrap(), "U2 R U R' U R U2 R' // ZBLL");
    }

    #[test]
    fn test_missing_elements() {
        let layout = layout();
        let page = layout.parse("<html><body><p>Not found</p></body></html>");
        assert_eq!(page.solver_name(), None);
        assert_eq!(page.reconstruction_lines(), None);
    }

    #[test]
    fn test_empty_solver_link_is_absent() {
        let layout = layout();
        let page = layout.parse(r#"<a id="solver-link">  </a>"#);
        assert_eq!(page.solver_name(), None);
    }
}
