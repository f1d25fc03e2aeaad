use anyhow::{Context, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// One daily observation as delivered by the data vendor. Column names stay
/// vendor-flavored on purpose; the resolver maps them downstream.
#[derive(Debug, Deserialize, Clone)]
pub struct DailyBar {
    pub date: NaiveDate,
    /// The specific contract this row's prices belong to.
    pub contract: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub settle: f64,
    pub volume: Option<f64>,
    pub open_interest: Option<f64>,
    pub expiry: Option<NaiveDate>,
}

/// A market-data terminal as the engine sees it: one history call, one
/// tabular result. The frame always carries `date`, `contract` and `settle`;
/// other requested fields appear when the feed has them. Connection
/// lifecycle is the implementor's problem, never the pipeline's.
pub trait MarketDataClient {
    fn daily_history(
        &self,
        root: &str,
        fields: &[&str],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DataFrame>;
}

/// Reads vendor bars from a directory of JSON files (concatenated `DailyBar`
/// records, one per line).
pub struct FlatFileClient {
    dir: PathBuf,
}

impl FlatFileClient {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn load_bars(&self) -> Result<Vec<DailyBar>> {
        let mut bars = Vec::new();
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read bar directory: {}", self.dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let file = File::open(&path)
                    .with_context(|| format!("Failed to open file: {}", path.display()))?;
                let reader = BufReader::new(file);
                let file_bars: Vec<DailyBar> = serde_json::Deserializer::from_reader(reader)
                    .into_iter::<DailyBar>()
                    .collect::<std::result::Result<_, _>>()
                    .with_context(|| {
                        format!("Failed to deserialize JSON in file: {}", path.display())
                    })?;
                bars.extend(file_bars);
            }
        }
        Ok(bars)
    }
}

impl MarketDataClient for FlatFileClient {
    fn daily_history(
        &self,
        root: &str,
        fields: &[&str],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DataFrame> {
        let mut bars: Vec<DailyBar> = self
            .load_bars()?
            .into_iter()
            .filter(|b| b.contract.starts_with(root) && b.date >= start && b.date <= end)
            .collect();
        bars.sort_by(|a, b| (a.date, a.contract.as_str()).cmp(&(b.date, b.contract.as_str())));
        let df = bars_to_frame(&bars)?;

        let mut keep: Vec<&str> = vec!["date", "contract", "settle"];
        for f in fields {
            if !keep.contains(f) && df.get_column_names_str().iter().any(|c| c == f) {
                keep.push(f);
            }
        }
        Ok(df.select(keep)?)
    }
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.signed_duration_since(NaiveDate::default()).num_days() as i32
}

pub fn bars_to_frame(bars: &[DailyBar]) -> Result<DataFrame> {
    let date: Vec<i32> = bars.iter().map(|b| days_since_epoch(b.date)).collect();
    let contract: Vec<&str> = bars.iter().map(|b| b.contract.as_str()).collect();
    let open: Vec<Option<f64>> = bars.iter().map(|b| b.open).collect();
    let high: Vec<Option<f64>> = bars.iter().map(|b| b.high).collect();
    let low: Vec<Option<f64>> = bars.iter().map(|b| b.low).collect();
    let settle: Vec<f64> = bars.iter().map(|b| b.settle).collect();
    let volume: Vec<Option<f64>> = bars.iter().map(|b| b.volume).collect();
    let oi: Vec<Option<f64>> = bars.iter().map(|b| b.open_interest).collect();
    let expiry: Vec<Option<i32>> = bars
        .iter()
        .map(|b| b.expiry.map(days_since_epoch))
        .collect();

    let df = df![
        "date" => date,
        "contract" => contract,
        "open" => open,
        "high" => high,
        "low" => low,
        "settle" => settle,
        "volume" => volume,
        "open_interest" => oi,
        "expiry" => expiry
    ]?;

    let df = df
        .lazy()
        .with_column(col("date").cast(DataType::Date))
        .with_column(col("expiry").cast(DataType::Date))
        .collect()?;
    Ok(df)
}
