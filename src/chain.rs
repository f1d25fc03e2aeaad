use polars::prelude::*;

use crate::error::{Result, RollError};

/// How to reduce the table to one contract row per date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainPolicy {
    /// Trust the input; if duplicate dates remain, keep the last row after
    /// ordering by (date, symbol).
    #[default]
    AsIs,
    /// Per date, keep the row with the highest open interest.
    ByOpenInterest,
    /// Per date, keep the row with the highest volume.
    ByVolume,
}

impl ChainPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            ChainPolicy::AsIs => "as_is",
            ChainPolicy::ByOpenInterest => "by_openinterest",
            ChainPolicy::ByVolume => "by_volume",
        }
    }

    fn metric(&self) -> Option<&'static str> {
        match self {
            ChainPolicy::AsIs => None,
            ChainPolicy::ByOpenInterest => Some("openinterest"),
            ChainPolicy::ByVolume => Some("volume"),
        }
    }
}

/// Reduce to exactly one row per distinct date, ascending by date.
///
/// Metric ties go to the lexicographically smallest symbol, so the selection
/// is deterministic for any input ordering.
pub fn select_chain(df: &DataFrame, policy: ChainPolicy) -> Result<DataFrame> {
    match policy.metric() {
        Some(metric) => {
            if !df.get_column_names_str().iter().any(|c| *c == metric) {
                return Err(RollError::MissingColumn {
                    policy: policy.name(),
                    column: metric,
                });
            }
            let sorted = df.sort(
                ["date", metric, "symbol"],
                SortMultipleOptions::default().with_order_descending_multi([false, true, false]),
            )?;
            let unique = sorted.unique_stable(
                Some(&["date".to_string()]),
                UniqueKeepStrategy::First,
                None,
            )?;
            Ok(unique)
        }
        None => {
            let sorted = df.sort(["date", "symbol"], SortMultipleOptions::default())?;
            let unique = sorted.unique_stable(
                Some(&["date".to_string()]),
                UniqueKeepStrategy::Last,
                None,
            )?;
            Ok(unique)
        }
    }
}
