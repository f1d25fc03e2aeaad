use polars::prelude::*;
use std::collections::HashMap;
use tracing::info;

use crate::chain::{select_chain, ChainPolicy};
use crate::clean::clean_observations;
use crate::error::Result;
use crate::gap::{roll_gaps, segment_adjustments, RollType};
use crate::schema::standardize_columns;
use crate::segment::{tag_segments, Segment};

/// Knobs for one pipeline invocation.
///
/// An empty `prefer_last_candidates` means the built-in preference order;
/// `cols_to_not_roll` is an extra exclusion set on top of the identifier
/// columns, which are never rolled.
#[derive(Debug, Clone, Default)]
pub struct RollConfig {
    pub roll_type: RollType,
    pub chain_selector: ChainPolicy,
    pub rename_map: Option<HashMap<String, String>>,
    pub prefer_last_candidates: Vec<String>,
    pub cols_to_not_roll: Vec<String>,
}

/// The continuous series plus what the cleaning stage had to discard.
pub struct RollOutput {
    pub frame: DataFrame,
    pub rows_dropped: usize,
}

pub(crate) fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    Ok(df
        .column(name)?
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names_str().iter().any(|c| *c == name)
}

/// Build a roll-adjusted continuous futures series from a raw table with
/// vendor column names.
///
/// Stages: resolve columns, coerce and drop unusable rows, reduce to one
/// contract per date, segment on symbol runs, then gap-adjust. The output
/// keeps the input row order (post-selection) and adds `Contract_ID`,
/// `Roll_Adjustment` and one `<field>_Adj` per adjustable price field.
pub fn build_continuous(data: &DataFrame, cfg: &RollConfig) -> Result<RollOutput> {
    let df = standardize_columns(data, cfg.rename_map.as_ref(), &cfg.prefer_last_candidates)?;
    let cleaned = clean_observations(&df)?;
    let rows_dropped = cleaned.rows_dropped;
    let df = select_chain(&cleaned.frame, cfg.chain_selector)?;
    let (df, segments) = tag_segments(&df, "symbol")?;

    let fields: Vec<&str> = ["open", "high", "low", "last"]
        .iter()
        .copied()
        .filter(|c| has_column(&df, c) && !cfg.cols_to_not_roll.iter().any(|x| x == c))
        .collect();

    let rolled = apply_adjustments(&df, &segments, "last", &fields, cfg.roll_type)?;
    let frame = order_columns(&rolled, &fields)?;
    info!(
        segments = segments.len(),
        rows = frame.height(),
        roll_type = ?cfg.roll_type,
        "continuous series built"
    );
    Ok(RollOutput { frame, rows_dropped })
}

/// Roll a table that already carries a current-contract-identifier column
/// (the shape a terminal history call returns). Boundary detection and
/// anchoring are the same engine as `build_continuous`; only the membership
/// column differs. Every numeric column outside `cols_to_not_roll` is
/// adjusted — callers exclude metrics like volume there.
pub fn roll_by_contract_column(
    data: &DataFrame,
    contract_col: &str,
    price_col: &str,
    cfg: &RollConfig,
) -> Result<DataFrame> {
    let (df, segments) = tag_segments(data, contract_col)?;

    let mut excluded: Vec<&str> = vec!["date", "symbol", contract_col];
    excluded.extend(cfg.cols_to_not_roll.iter().map(|s| s.as_str()));
    let fields: Vec<&str> = data
        .get_columns()
        .iter()
        .filter(|c| {
            matches!(
                c.dtype(),
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::UInt64
                    | DataType::UInt32
            )
        })
        .map(|c| c.name().as_str())
        .filter(|n| !excluded.iter().any(|e| e == n))
        .collect();

    apply_adjustments(&df, &segments, price_col, &fields, cfg.roll_type)
}

/// Compute gaps on `price_col`, spread the per-segment scalar across rows and
/// append `Roll_Adjustment` plus one `<field>_Adj` per requested field.
/// Plain floating-point addition; nothing is rounded or clamped.
pub fn apply_adjustments(
    df: &DataFrame,
    segments: &[Segment],
    price_col: &str,
    fields: &[&str],
    roll_type: RollType,
) -> Result<DataFrame> {
    let reference = column_f64(df, price_col)?;
    let gaps = roll_gaps(&reference, segments);
    let per_segment = segment_adjustments(&gaps, roll_type);

    let mut row_adj = vec![0.0; df.height()];
    for (seg, adj) in segments.iter().zip(per_segment.iter()) {
        for slot in &mut row_adj[seg.start..seg.end] {
            *slot = *adj;
        }
    }

    let mut out = df.clone();
    out.with_column(Series::new(
        PlSmallStr::from("Roll_Adjustment"),
        row_adj.clone(),
    ))?;
    for f in fields {
        let raw = column_f64(df, f)?;
        let adjusted: Vec<f64> = raw.iter().zip(row_adj.iter()).map(|(v, a)| v + a).collect();
        out.with_column(Series::new(
            PlSmallStr::from(format!("{f}_Adj").as_str()),
            adjusted,
        ))?;
    }
    Ok(out)
}

/// Readable ordering: identifiers and adjustment first, then raw price
/// fields, their adjusted counterparts, then everything else untouched.
fn order_columns(df: &DataFrame, fields: &[&str]) -> Result<DataFrame> {
    let mut front: Vec<String> = vec![
        "date".to_string(),
        "symbol".to_string(),
        "Contract_ID".to_string(),
        "Roll_Adjustment".to_string(),
    ];
    front.extend(fields.iter().map(|f| f.to_string()));
    front.extend(fields.iter().map(|f| format!("{f}_Adj")));
    let rest: Vec<String> = df
        .get_column_names_str()
        .iter()
        .filter(|c| !front.iter().any(|f| f == *c))
        .map(|c| c.to_string())
        .collect();
    front.extend(rest);
    Ok(df.select(front)?)
}
