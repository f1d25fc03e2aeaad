use polars::prelude::*;

use crate::error::Result;
use crate::roll::column_f64;

/// Cumulative-return level series over a gap-adjusted field.
///
/// The return at row t divides the adjusted price change by the *raw* price
/// at t-1; that denominator is what keeps the level positive no matter how
/// large the cumulative roll gaps get. The first row has no predecessor, so
/// its return is taken as zero and the level always starts at 1.0.
pub fn rebased_levels(adjusted: &[f64], raw: &[f64]) -> Vec<f64> {
    let mut levels = Vec::with_capacity(adjusted.len());
    if adjusted.is_empty() {
        return levels;
    }
    let mut level = 1.0;
    levels.push(level);
    for t in 1..adjusted.len() {
        let ret = (adjusted[t] - adjusted[t - 1]) / raw[t - 1];
        level *= 1.0 + ret;
        levels.push(level);
    }
    levels
}

/// Append one `r<field>` level column per field that has a `<field>_Adj`
/// companion in the frame. Per-row returns stay internal; only the adjusted
/// price and the rebased level survive per field.
pub fn rebase_non_negative(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();
    let names: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for name in &names {
        let Some(base) = name.strip_suffix("_Adj") else {
            continue;
        };
        if !names.iter().any(|c| c == base) {
            continue;
        }
        let adjusted = column_f64(df, name)?;
        let raw = column_f64(df, base)?;
        out.with_column(Series::new(
            PlSmallStr::from(format!("r{base}").as_str()),
            rebased_levels(&adjusted, &raw),
        ))?;
    }
    Ok(out)
}
