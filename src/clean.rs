use polars::prelude::*;
use tracing::warn;

use crate::error::Result;

/// A cleaned observation table plus the number of rows that had to go.
pub struct CleanReport {
    pub frame: DataFrame,
    pub rows_dropped: usize,
}

/// Coerce types on a standardized table and drop rows unusable for roll
/// detection. Unparseable dates and non-numeric prices become nulls, then any
/// row missing `date`, `symbol` or `last` is dropped. Dropping is policy, not
/// failure; the count is returned and logged so it never disappears silently.
pub fn clean_observations(df: &DataFrame) -> Result<CleanReport> {
    let mut lf = df.clone().lazy();

    match df.column("date")?.dtype() {
        DataType::String => {
            lf = lf.with_column(col("date").str().to_date(StrptimeOptions {
                strict: false,
                ..Default::default()
            }));
        }
        DataType::Date => {}
        _ => {
            lf = lf.with_column(col("date").cast(DataType::Date));
        }
    }

    if df.column("symbol")?.dtype() != &DataType::String {
        lf = lf.with_column(col("symbol").cast(DataType::String));
    }

    for c in ["open", "high", "low", "last"] {
        if df.get_column_names_str().iter().any(|n| *n == c) {
            lf = lf.with_column(col(c).cast(DataType::Float64));
        }
    }

    let coerced = lf.collect()?;
    let before = coerced.height();
    let kept = coerced
        .lazy()
        .drop_nulls(Some(vec![col("date"), col("symbol"), col("last")]))
        .collect()?;
    let rows_dropped = before - kept.height();
    if rows_dropped > 0 {
        warn!(rows_dropped, "dropped rows with unparseable date or missing symbol/last");
    }

    Ok(CleanReport {
        frame: kept,
        rows_dropped,
    })
}
