use polars::prelude::*;

use crate::error::Result;

/// A maximal run of rows sharing one contract identifier. `end` is exclusive.
/// Segments partition the row range: adjacent segments touch, ids ascend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub id: i64,
    pub start: usize,
    pub end: usize,
}

/// 1-based run ids over a date-ordered identifier column: the counter
/// increments whenever the value differs from the previous row.
pub fn contract_ids<S: AsRef<str>>(values: &[S]) -> Vec<i64> {
    let mut ids = Vec::with_capacity(values.len());
    let mut id = 0i64;
    let mut prev: Option<&str> = None;
    for v in values {
        let v = v.as_ref();
        if prev != Some(v) {
            id += 1;
            prev = Some(v);
        }
        ids.push(id);
    }
    ids
}

/// Boundary positions for a run-id vector, computed once so downstream
/// stages never re-derive them by scanning.
pub fn segment_bounds(ids: &[i64]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    for (i, &id) in ids.iter().enumerate() {
        match segments.last_mut() {
            Some(seg) if seg.id == id => seg.end = i + 1,
            _ => segments.push(Segment {
                id,
                start: i,
                end: i + 1,
            }),
        }
    }
    segments
}

/// Append `Contract_ID` derived from runs of `id_col` and return the segment
/// bounds alongside. The canonical pipeline passes `symbol`; tables that
/// already carry a vendor contract-identifier column pass that instead — the
/// detection logic is the same either way.
pub fn tag_segments(df: &DataFrame, id_col: &str) -> Result<(DataFrame, Vec<Segment>)> {
    let id_values = df.column(id_col)?.cast(&DataType::String)?;
    let values: Vec<String> = id_values
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or("").to_string())
        .collect();
    let ids = contract_ids(&values);
    let bounds = segment_bounds(&ids);
    let mut out = df.clone();
    out.with_column(Series::new(PlSmallStr::from("Contract_ID"), ids))?;
    Ok((out, bounds))
}
