use polars::prelude::*;
use std::collections::HashMap;

use crate::error::{Result, RollError};

/// Canonical field -> accepted vendor spellings, in match-priority order.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("date", &["date", "datetime", "dt", "time"]),
    ("symbol", &["symbol", "ticker", "contract", "ric", "secid", "security"]),
    ("open", &["open", "px_open", "o"]),
    ("high", &["high", "px_high", "h"]),
    ("low", &["low", "px_low", "l"]),
    ("last", &["last", "close", "px_last", "settle", "settlement", "adj_close"]),
    ("volume", &["volume", "vol", "px_volume", "qty"]),
    ("openinterest", &["openinterest", "open_interest", "oi"]),
    ("expiry", &["expiry", "expiration", "maturity", "exp_date"]),
];

/// Preference order for the reference price when several synonyms coexist.
pub const DEFAULT_LAST_CANDIDATES: &[&str] = &["last", "close", "settle", "px_last", "adj_close"];

fn synonyms_for(field: &str) -> &'static [&'static str] {
    SYNONYMS
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, s)| *s)
        .unwrap_or(&[])
}

/// First existing column (original spelling) matching any candidate,
/// case-insensitively. Candidate order wins over column order.
fn guess<'a>(existing: &'a [String], candidates: &[&str]) -> Option<&'a str> {
    for cand in candidates {
        if let Some(orig) = existing.iter().find(|c| c.eq_ignore_ascii_case(cand)) {
            return Some(orig.as_str());
        }
    }
    None
}

/// Return a copy of `df` with canonical column names:
/// date, symbol, open?, high?, low?, last, volume?, openinterest?, expiry?
///
/// Explicit `rename_map` entries are applied first and override
/// auto-detection. `date`, `symbol` and `last` are mandatory; the rest are
/// optional and silently omitted when absent.
pub fn standardize_columns(
    df: &DataFrame,
    rename_map: Option<&HashMap<String, String>>,
    prefer_last: &[String],
) -> Result<DataFrame> {
    let mut df = df.clone();

    // User overrides first. Sorted by key so the result never depends on
    // hash-map iteration order.
    if let Some(map) = rename_map {
        let mut entries: Vec<(&String, &String)> = map.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (from, to) in entries {
            if from != to && df.get_column_names_str().iter().any(|c| c == from) {
                df.rename(from, to.as_str().into())?;
            }
        }
    }

    let cols: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let last_candidates: Vec<&str> = if prefer_last.is_empty() {
        DEFAULT_LAST_CANDIDATES.to_vec()
    } else {
        prefer_last.iter().map(|s| s.as_str()).collect()
    };

    let date_col = guess(&cols, synonyms_for("date")).ok_or_else(|| RollError::Schema {
        field: "date",
        tried: synonyms_for("date").iter().map(|s| s.to_string()).collect(),
    })?;
    let sym_col = guess(&cols, synonyms_for("symbol")).ok_or_else(|| RollError::Schema {
        field: "symbol",
        tried: synonyms_for("symbol").iter().map(|s| s.to_string()).collect(),
    })?;
    let last_col = guess(&cols, &last_candidates).ok_or_else(|| RollError::Schema {
        field: "last",
        tried: last_candidates.iter().map(|s| s.to_string()).collect(),
    })?;

    let mut rename: Vec<(String, &'static str)> = vec![
        (date_col.to_string(), "date"),
        (sym_col.to_string(), "symbol"),
        (last_col.to_string(), "last"),
    ];
    for field in ["open", "high", "low", "volume", "openinterest", "expiry"] {
        if let Some(orig) = guess(&cols, synonyms_for(field)) {
            rename.push((orig.to_string(), field));
        }
    }

    for (from, to) in rename {
        if from != to {
            df.rename(&from, to.into())?;
        }
    }

    // `DataFrame::rename` populates the cached schema (via its internal
    // duplicate-name check) but does not invalidate it after the rename, so a
    // later `.lazy()` would resolve against the pre-rename column names.
    // Clear the cache so downstream stages see the canonical names.
    df.clear_schema();

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_case_insensitive_detection() {
        let raw = df!(
            "Date" => ["2024-01-02"],
            "TICKER" => ["CLH4"],
            "PX_LAST" => [70.5],
            "OI" => [1000i64]
        )
        .unwrap();
        let out = standardize_columns(&raw, None, &[]).unwrap();
        for c in ["date", "symbol", "last", "openinterest"] {
            assert!(out.get_column_names_str().iter().any(|n| *n == c), "missing {c}");
        }
    }

    #[test]
    fn test_explicit_override_wins() {
        let raw = df!(
            "when" => ["2024-01-02"],
            "ric" => ["CLH4"],
            "close" => [70.5]
        )
        .unwrap();
        let mut map = HashMap::new();
        map.insert("when".to_string(), "date".to_string());
        let out = standardize_columns(&raw, Some(&map), &[]).unwrap();
        assert!(out.get_column_names_str().iter().any(|n| *n == "date"));
        assert!(out.get_column_names_str().iter().any(|n| *n == "symbol"));
    }

    #[test]
    fn test_prefer_last_order() {
        let raw = df!(
            "date" => ["2024-01-02"],
            "symbol" => ["CLH4"],
            "close" => [70.5],
            "settle" => [70.9]
        )
        .unwrap();
        let prefer = vec!["settle".to_string(), "close".to_string()];
        let out = standardize_columns(&raw, None, &prefer).unwrap();
        let last = out.column("last").unwrap().f64().unwrap().get(0).unwrap();
        assert!((last - 70.9).abs() < 1e-12);
    }

    #[test]
    fn test_missing_symbol_is_schema_error() {
        let raw = df!(
            "date" => ["2024-01-02"],
            "close" => [70.5]
        )
        .unwrap();
        let err = standardize_columns(&raw, None, &[]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("symbol"), "unexpected error: {msg}");
        assert!(msg.contains("ticker"), "candidates not named: {msg}");
    }
}
