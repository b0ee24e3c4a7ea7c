// src/types.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::sanitize::numeric_text;

/// One parsed average. Keeps the page's own spelling for export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub value: f64,
    pub text: String,
}

impl Rate {
    /// Parse a trimmed cell; `None` for anything that isn't a plain decimal.
    pub fn parse(cell: &str) -> Option<Rate> {
        let text = cell.trim();
        let cleaned = numeric_text(text)?;
        let value: f64 = cleaned.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(Rate { value, text: s!(text) })
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// 7/30/90-day averages for one pair. `None` = no value for that window.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AverageTriple {
    pub avg7: Option<Rate>,
    pub avg30: Option<Rate>,
    pub avg90: Option<Rate>,
}

impl AverageTriple {
    /// All-null placeholder recorded for a pair that could not be fetched.
    pub fn null() -> Self {
        Self::default()
    }

    pub fn from_cells(avg7: &str, avg30: &str, avg90: &str) -> Self {
        Self {
            avg7: Rate::parse(avg7),
            avg30: Rate::parse(avg30),
            avg90: Rate::parse(avg90),
        }
    }

    /// True when no window has a value.
    pub fn is_null(&self) -> bool {
        self.avg7.is_none() && self.avg30.is_none() && self.avg90.is_none()
    }

    /// Fields in snapshot row order (7, 30, 90 days).
    pub fn fields(&self) -> [Option<&Rate>; 3] {
        [self.avg7.as_ref(), self.avg30.as_ref(), self.avg90.as_ref()]
    }

    pub fn values(&self) -> [Option<f64>; 3] {
        self.fields().map(|r| r.map(|r| r.value))
    }
}
