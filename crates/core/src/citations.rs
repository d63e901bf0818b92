//! Display mapping for guideline citations.
//!
//! Pure and stateless; shared by the assessment and chat views. Source, page and excerpt are
//! carried verbatim. `chunk_id` is kept as a secondary, low-emphasis reference for tracing an
//! answer back to the corpus.

use ng12_types::Citation;

/// One citation prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationCard<'a> {
    /// 1-based position in display order.
    pub position: usize,
    /// `"{source} - Page {page}"`
    pub heading: String,
    pub excerpt: &'a str,
    pub chunk_id: &'a str,
}

/// Maps citations to display cards in the order the backend returned them.
///
/// An empty slice yields no cards; callers render nothing in that case.
pub fn render(citations: &[Citation]) -> Vec<CitationCard<'_>> {
    citations
        .iter()
        .enumerate()
        .map(|(i, c)| CitationCard {
            position: i + 1,
            heading: format!("{} - Page {}", c.source, c.page),
            excerpt: &c.excerpt,
            chunk_id: &c.chunk_id,
        })
        .collect()
}
