// src/specs/averages.rs
//! Scraping *spec* for the exchange-rate statistics block.
//!
//! Purpose:
//! - Find the single row labelled **"Average"** and read the 7/30/90-day values
//!   that follow the label.
//! - Work against both layouts the site has shipped: tab-delimited text rows and
//!   element rows with one text cell per column.
//!
//! Non-Responsibilities:
//! - **No I/O.** Loading and rendering the page is `session`'s job; retrying is `fetch`'s.
//!
//! Matching rule: rows are scanned in document order; the first row whose first
//! field (trimmed, case-insensitive) is `Average` and that has at least four fields
//! wins. Fields 2–4 become avg7/avg30/avg90. A cell that isn't a plain number is
//! kept as `None` instead of failing the whole row.

use crate::{
    config::{consts::AVERAGE_LABEL, options::LayoutStrategy},
    core::html,
    error::ExtractError,
    session::PageContent,
    types::AverageTriple,
};

/// Rows of a rendered page, in one of the two observed shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowSource {
    /// One string per row, fields separated by `\t`.
    Text(Vec<String>),
    /// One vector of cell texts per row.
    Cells(Vec<Vec<String>>),
}

impl RowSource {
    pub fn len(&self) -> usize {
        match self { RowSource::Text(r) => r.len(), RowSource::Cells(r) => r.len() }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Build the row source the configured layout expects.
///
/// TextRow prefers the browser's rendered text when the backend supplied it and
/// falls back to table rows reconstructed from the markup.
pub fn row_source(page: &PageContent, layout: &LayoutStrategy) -> Result<RowSource, ExtractError> {
    match layout {
        LayoutStrategy::TextRow => {
            let rows = match &page.text {
                Some(text) => html::text_lines(text),
                None => html::table_text_rows(&page.html),
            };
            Ok(RowSource::Text(rows))
        }
        LayoutStrategy::CellRow { row_selector, cell_selector } => {
            html::cell_rows(&page.html, row_selector, cell_selector).map(RowSource::Cells)
        }
    }
}

/// Read the averages from the first "Average" row.
pub fn extract(source: &RowSource) -> Result<AverageTriple, ExtractError> {
    let found = match source {
        RowSource::Text(lines) => lines
            .iter()
            .find_map(|line| average_from_fields(&line.split('\t').collect::<Vec<_>>())),
        RowSource::Cells(rows) => rows
            .iter()
            .find_map(|row| average_from_fields(&row.iter().map(String::as_str).collect::<Vec<_>>())),
    };
    found.ok_or(ExtractError::NoAverageRow)
}

/// Convenience: layout + extraction in one call.
pub fn extract_page(page: &PageContent, layout: &LayoutStrategy) -> Result<AverageTriple, ExtractError> {
    let rows = row_source(page, layout)?;
    logd!("Extract: layout={} rows={}", layout.label(), rows.len());
    extract(&rows)
}

fn average_from_fields(fields: &[&str]) -> Option<AverageTriple> {
    let [label, avg7, avg30, avg90, ..] = fields else {
        return None;
    };
    if !label.trim().eq_ignore_ascii_case(AVERAGE_LABEL) {
        return None;
    }
    Some(AverageTriple::from_cells(avg7, avg30, avg90))
}
