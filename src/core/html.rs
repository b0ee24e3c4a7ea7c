// src/core/html.rs
//! HTML → rows helpers. Page-agnostic; `specs` decides which rows matter.

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;

use super::sanitize::normalize_ws;

pub fn parse_selector(sel: &str) -> Result<Selector, ExtractError> {
    Selector::parse(sel).map_err(|e| ExtractError::Selector {
        selector: s!(sel),
        reason: format!("{e:?}"),
    })
}

/// All visible text of an element, whitespace-collapsed.
/// Text nodes are concatenated as-is; hydrated markup splits numbers across them.
pub fn element_text(el: &ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Every element matching `row_sel`, each as the texts of its `cell_sel` descendants.
/// Rows are returned in document order, empty ones included.
pub fn cell_rows(html: &str, row_sel: &str, cell_sel: &str) -> Result<Vec<Vec<String>>, ExtractError> {
    let rows = parse_selector(row_sel)?;
    let cells = parse_selector(cell_sel)?;
    let doc = Html::parse_document(html);

    Ok(doc
        .select(&rows)
        .map(|row| row.select(&cells).map(|c| element_text(&c)).collect())
        .collect())
}

/// Table rows rendered the way a browser's `innerText` does: cells joined by tabs.
pub fn table_text_rows(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let (Ok(tr), Ok(cell)) = (Selector::parse("tr"), Selector::parse("td, th")) else {
        return Vec::new();
    };

    doc.select(&tr)
        .map(|row| {
            row.select(&cell)
                .map(|c| element_text(&c))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect()
}

/// Split rendered text into rows, dropping blank lines.
pub fn text_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_rows_in_document_order() {
        let html = r#"
            <div class="flex flex-row"><span>High</span><span>1.3</span></div>
            <div class="flex flex-row">
                <span> Average </span><span>1.23</span><span>1.25</span><span>1.20</span>
            </div>
            <div class="other"><span>Average</span></div>
        "#;
        let rows = cell_rows(html, "div.flex.flex-row", "span").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["High", "1.3"]);
        assert_eq!(rows[1], vec!["Average", "1.23", "1.25", "1.20"]);
    }

    #[test]
    fn split_text_nodes_are_joined() {
        let html = r#"<div class="flex flex-row"><span>Average</span><span>0.74<!-- -->32</span><span>0.7<b>415</b></span><span> 0.7398 </span></div>"#;
        let rows = cell_rows(html, "div.flex.flex-row", "span").unwrap();
        assert_eq!(rows[0], vec!["Average", "0.7432", "0.7415", "0.7398"]);
    }

    #[test]
    fn spaces_between_inline_children_survive() {
        let html = r#"<table><tr><td>7 <b>days</b></td><td>1.2</td></tr></table>"#;
        assert_eq!(table_text_rows(html), vec!["7 days\t1.2"]);
    }

    #[test]
    fn bad_selector_is_reported() {
        let err = cell_rows("<p></p>", "div[[", "span").unwrap_err();
        assert!(matches!(err, ExtractError::Selector { ref selector, .. } if selector == "div[["));
    }

    #[test]
    fn table_rows_join_cells_with_tabs() {
        let html = r#"
            <table>
              <tr><th></th><th>7 days</th><th>30 days</th><th>90 days</th></tr>
              <tr><td>Average</td><td>1.23</td><td>1.25</td><td>1.20</td></tr>
            </table>
        "#;
        let rows = table_text_rows(html);
        assert_eq!(rows[1], "Average\t1.23\t1.25\t1.20");
    }

    #[test]
    fn text_lines_skip_blanks() {
        assert_eq!(text_lines("a\r\n\n  \nb\tc\n"), vec!["a", "b\tc"]);
    }
}
