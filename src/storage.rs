use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs::File;

/// Read a raw observation table from CSV, schema inferred.
pub fn read_csv(path: &str) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to open CSV file: {path}"))?
        .finish()
        .context("Failed to read CSV data")?;
    Ok(df)
}

/// Save a rolled series to a Parquet file.
pub fn write_parquet(df: &DataFrame, path: &str) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {path}"))?;
    let mut df = df.clone();
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Zstd(None))
        .finish(&mut df)
        .context("Failed to write Parquet data")?;
    Ok(())
}

/// Load a previously written series from a Parquet file.
pub fn read_parquet(path: &str) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open Parquet file: {path}"))?;
    let df = ParquetReader::new(file)
        .finish()
        .context("Failed to read Parquet data")?;
    Ok(df)
}
