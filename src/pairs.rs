// src/pairs.rs
//! Currency pair list: which pages to scrape and under which key to store them.
//!
//! Input is a JSON array, loaded once before a run:
//! ```json
//! [{ "from_currency": "SGD", "to_currency": "USD", "url": "https://…" }]
//! ```
//! Any problem in the list is a startup error; nothing is fetched until the whole
//! list validates.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::sanitize::normalize_code;
use crate::error::PairsError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPairSpec {
    #[serde(rename = "from_currency")]
    pub source_currency: String,
    #[serde(rename = "to_currency")]
    pub target_currency: String,
    #[serde(rename = "url")]
    pub location: Url,
}

impl CurrencyPairSpec {
    pub fn new(source: &str, target: &str, location: Url) -> Self {
        Self {
            source_currency: normalize_code(source),
            target_currency: normalize_code(target),
            location,
        }
    }

    /// Result key for this pair.
    pub fn key(&self) -> &str {
        &self.target_currency
    }

    /// `SGD/USD`
    pub fn label(&self) -> String {
        format!("{}/{}", self.source_currency, self.target_currency)
    }
}

impl fmt::Display for CurrencyPairSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.source_currency, self.target_currency, self.location)
    }
}

/// Raw entry as it appears in the file; URL still unchecked.
#[derive(Deserialize)]
struct RawPair {
    from_currency: String,
    to_currency: String,
    url: String,
}

pub fn load(path: &Path) -> Result<Vec<CurrencyPairSpec>, PairsError> {
    let text = fs::read_to_string(path)
        .map_err(|source| PairsError::Read { path: path.to_path_buf(), source })?;
    let pairs = parse(&text).map_err(|e| match e {
        ParseFailure::Json(source) => PairsError::Parse { path: path.to_path_buf(), source },
        ParseFailure::Invalid(e) => e,
    })?;
    logf!("Pairs: loaded {} pair(s) from {}", pairs.len(), path.display());
    Ok(pairs)
}

enum ParseFailure {
    Json(serde_json::Error),
    Invalid(PairsError),
}

fn parse(text: &str) -> Result<Vec<CurrencyPairSpec>, ParseFailure> {
    let raw: Vec<RawPair> = serde_json::from_str(text).map_err(ParseFailure::Json)?;
    validate(raw).map_err(ParseFailure::Invalid)
}

/// Parse a pair list from a JSON string (no file involved).
pub fn from_json(text: &str) -> Result<Vec<CurrencyPairSpec>, PairsError> {
    parse(text).map_err(|e| match e {
        ParseFailure::Json(source) => PairsError::Parse { path: "<inline>".into(), source },
        ParseFailure::Invalid(e) => e,
    })
}

fn validate(raw: Vec<RawPair>) -> Result<Vec<CurrencyPairSpec>, PairsError> {
    if raw.is_empty() {
        return Err(PairsError::Empty);
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(raw.len());

    for (index, r) in raw.into_iter().enumerate() {
        let source = normalize_code(&r.from_currency);
        let target = normalize_code(&r.to_currency);
        if source.is_empty() || target.is_empty() {
            return Err(PairsError::EmptyCode { index });
        }

        let location = Url::parse(r.url.trim()).map_err(|e| PairsError::InvalidUrl {
            index,
            source_currency: source.clone(),
            target_currency: target.clone(),
            url: r.url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(location.scheme(), "http" | "https") {
            return Err(PairsError::InvalidUrl {
                index,
                source_currency: source,
                target_currency: target,
                url: r.url,
                reason: format!("unsupported scheme `{}`", location.scheme()),
            });
        }

        if let Some(&first) = seen.get(&target) {
            return Err(PairsError::DuplicateTarget { index, first, key: target });
        }
        seen.insert(target.clone(), index);

        out.push(CurrencyPairSpec::new(&source, &target, location));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_normalizes() {
        let pairs = from_json(r#"[
            {"from_currency": "sgd", "to_currency": " usd ", "url": "https://example.com/?from=SGD&to=USD"},
            {"from_currency": "SGD", "to_currency": "JPY", "url": "https://example.com/?from=SGD&to=JPY"}
        ]"#).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].key(), "USD");
        assert_eq!(pairs[0].label(), "SGD/USD");
        assert_eq!(pairs[1].location.query(), Some("from=SGD&to=JPY"));
    }

    #[test]
    fn rejects_duplicate_target() {
        let err = from_json(r#"[
            {"from_currency": "SGD", "to_currency": "USD", "url": "https://a.example/"},
            {"from_currency": "EUR", "to_currency": "usd", "url": "https://b.example/"}
        ]"#).unwrap_err();
        assert!(matches!(err, PairsError::DuplicateTarget { index: 1, first: 0, ref key } if key == "USD"));
    }

    #[test]
    fn rejects_bad_url_and_scheme() {
        let err = from_json(r#"[{"from_currency": "SGD", "to_currency": "USD", "url": "not a url"}]"#).unwrap_err();
        assert!(matches!(err, PairsError::InvalidUrl { index: 0, .. }));

        let err = from_json(r#"[{"from_currency": "SGD", "to_currency": "USD", "url": "ftp://x.example/"}]"#).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn rejects_empty_list_and_codes() {
        assert!(matches!(from_json("[]"), Err(PairsError::Empty)));
        let err = from_json(r#"[{"from_currency": " ", "to_currency": "USD", "url": "https://x.example/"}]"#).unwrap_err();
        assert!(matches!(err, PairsError::EmptyCode { index: 0 }));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(from_json("{"), Err(PairsError::Parse { .. })));
        assert!(matches!(from_json(r#"[{"from_currency": "SGD"}]"#), Err(PairsError::Parse { .. })));
    }
}
