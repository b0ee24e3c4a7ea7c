// src/table.rs
//! Table: the result mapping laid out for display and export.
//!
//! - Three rows, one per averaging window (`7days`, `30days`, `90days`).
//! - One column per target currency.
//! - A missing value is `None` and renders as an empty cell.
//!
//! The GUI renders it directly; `to_grid` flattens it for CSV/TSV and clipboard.

use crate::batch::ResultMapping;
use crate::config::consts::ROW_LABELS;
use crate::types::Rate;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableRow {
    pub label: String,
    pub cells: Vec<Option<Rate>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Default for Table {
    fn default() -> Self {
        Self::empty()
    }
}

impl Table {
    /// No columns, but still the three labelled rows.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: ROW_LABELS.iter().map(|l| TableRow { label: s!(*l), cells: Vec::new() }).collect(),
        }
    }

    /// Build from results. With `order`, columns follow it (keys absent from the
    /// results are skipped) and any leftover keys are appended in map order.
    pub fn from_results(results: &ResultMapping, order: Option<&[&str]>) -> Self {
        let mut columns: Vec<String> = Vec::with_capacity(results.len());
        if let Some(order) = order {
            for &key in order {
                if results.contains(key) && !columns.iter().any(|c| c.as_str() == key) {
                    columns.push(s!(key));
                }
            }
        }
        for key in results.keys() {
            if !columns.iter().any(|c| c.as_str() == key) {
                columns.push(s!(key));
            }
        }

        let mut table = Self::empty();
        for key in &columns {
            let fields = results.get(key).map(|t| t.fields()).unwrap_or([None, None, None]);
            for (row, field) in table.rows.iter_mut().zip(fields) {
                row.cells.push(field.cloned());
            }
        }
        table.columns = columns;
        table
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Number of filled cells.
    pub fn filled(&self) -> usize {
        self.rows.iter().flat_map(|r| &r.cells).filter(|c| c.is_some()).count()
    }

    /// Header row (empty corner + currency keys), if any.
    pub fn header_row(&self) -> Vec<String> {
        let mut h = Vec::with_capacity(self.columns.len() + 1);
        h.push(s!());
        h.extend(self.columns.iter().cloned());
        h
    }

    /// Flatten to strings: `[header?, 7days, 30days, 90days]`.
    pub fn to_grid(&self, include_headers: bool) -> Vec<Vec<String>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        if include_headers {
            grid.push(self.header_row());
        }
        for row in &self.rows {
            let mut line = Vec::with_capacity(row.cells.len() + 1);
            line.push(row.label.clone());
            line.extend(row.cells.iter().map(|c| c.as_ref().map(|r| r.text.clone()).unwrap_or_default()));
            grid.push(line);
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchState;
    use crate::pairs;

    fn specs() -> Vec<crate::pairs::CurrencyPairSpec> {
        pairs::from_json(r#"[
            {"from_currency": "SGD", "to_currency": "USD", "url": "https://x.example/usd"},
            {"from_currency": "SGD", "to_currency": "JPY", "url": "https://x.example/jpy"}
        ]"#).unwrap()
    }

    #[test]
    fn empty_table_keeps_row_labels() {
        let t = BatchState::new().snapshot();
        assert!(t.is_empty());
        assert_eq!(t.to_grid(true), vec![cells![""], cells!["7days"], cells!["30days"], cells!["90days"]]);
        assert_eq!(t.to_grid(false).len(), 3);
    }

    #[test]
    fn json_round_trip_preserves_nulls() {
        let json = r#"{"completed_keys":["USD"],"cursor":2,"results":{
            "USD":{"avg7":{"value":0.74,"text":"0.74"},"avg30":null,"avg90":{"value":0.73,"text":"0.73"}},
            "JPY":{"avg7":null,"avg30":null,"avg90":null}}}"#;
        let state: BatchState = serde_json::from_str(json).unwrap();
        let t = state.snapshot_for(&specs());
        assert_eq!(t.columns, vec!["USD", "JPY"]);
        assert_eq!(
            t.to_grid(true),
            vec![
                cells!["", "USD", "JPY"],
                cells!["7days", "0.74", ""],
                cells!["30days", "", ""],
                cells!["90days", "0.73", ""],
            ]
        );
        assert_eq!(t.filled(), 2);
    }

    #[test]
    fn unordered_snapshot_uses_key_order() {
        let json = r#"{"completed_keys":[],"cursor":0,"results":{
            "USD":{"avg7":null,"avg30":null,"avg90":null},
            "EUR":{"avg7":null,"avg30":null,"avg90":null}}}"#;
        let state: BatchState = serde_json::from_str(json).unwrap();
        assert_eq!(state.snapshot().columns, vec!["EUR", "USD"]);
    }
}
