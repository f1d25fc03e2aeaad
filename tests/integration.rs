use polars::df;
use polars::prelude::*;
use tempfile::NamedTempFile;
use RollFactory::{
    build_continuous, rebase_non_negative, roll_by_contract_column, storage, ChainPolicy,
    RollConfig, RollType,
};

fn vendor_frame() -> DataFrame {
    // Vendor-flavored names on purpose: the resolver has to earn its keep.
    df!(
        "Date" => ["2024-01-02", "2024-01-03", "2024-01-04", "2024-01-04", "2024-01-05", "2024-01-08"],
        "Ticker" => ["CLH4", "CLH4", "CLH4", "CLJ4", "CLJ4", "CLJ4"],
        "PX_LAST" => [100.0, 101.0, 102.0, 104.8, 105.0, 106.0],
        "OI" => [900i64, 850, 300, 700, 800, 820]
    )
    .unwrap()
}

fn column(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

#[test]
fn pipeline_smoke() {
    let cfg = RollConfig {
        chain_selector: ChainPolicy::ByOpenInterest,
        ..Default::default()
    };
    let out = build_continuous(&vendor_frame(), &cfg).unwrap();
    // 2024-01-04 is duplicated; open interest picks CLJ4 (700 > 300).
    assert_eq!(out.frame.height(), 5);
    assert_eq!(out.rows_dropped, 0);

    let adj = column(&out.frame, "last_Adj");
    let raw = column(&out.frame, "last");
    // Backward roll: the live contract matches raw exactly.
    assert_eq!(&adj[2..], &raw[2..]);
    // Gap = 104.8 - 101.0; the old segment shifts up to meet it.
    assert!((adj[0] - 103.8).abs() < 1e-12);

    let tmp = NamedTempFile::new().unwrap();
    let path = tmp.path().to_str().unwrap();
    storage::write_parquet(&out.frame, path).unwrap();
    let read = storage::read_parquet(path).unwrap();
    assert_eq!(read.height(), out.frame.height());
    assert_eq!(column(&read, "last_Adj"), adj);
}

#[test]
fn backward_minus_forward_is_one_constant() {
    let backward = build_continuous(&vendor_frame(), &RollConfig::default()).unwrap();
    let forward = build_continuous(
        &vendor_frame(),
        &RollConfig {
            roll_type: RollType::Forward,
            ..Default::default()
        },
    )
    .unwrap();
    let b = column(&backward.frame, "Roll_Adjustment");
    let f = column(&forward.frame, "Roll_Adjustment");
    let diffs: Vec<f64> = b.iter().zip(f.iter()).map(|(x, y)| x - y).collect();
    for d in &diffs {
        assert!((d - diffs[0]).abs() < 1e-12, "diffs: {diffs:?}");
    }
}

#[test]
fn rebased_output_carries_levels() {
    let out = build_continuous(&vendor_frame(), &RollConfig::default()).unwrap();
    let rebased = rebase_non_negative(&out.frame).unwrap();
    let levels = column(&rebased, "rlast");
    assert!((levels[0] - 1.0).abs() < 1e-12);
    assert!(levels.iter().all(|v| *v >= 0.0));
    // Adjusted prices and levels coexist per field.
    assert!(rebased.column("last_Adj").is_ok());
}

#[test]
fn legacy_identifier_column_agrees_with_pipeline() {
    // Terminal-shaped table: identifier column present, already one row per
    // date, canonical price column name supplied by the caller.
    let legacy_input = df!(
        "date" => [19724i32, 19725, 19726, 19727],
        "FUT_CUR_GEN_TICKER" => ["CLH4", "CLH4", "CLJ4", "CLJ4"],
        "px" => [100.0, 102.0, 105.0, 106.0],
        "vwap" => [99.9, 101.8, 104.9, 105.8]
    )
    .unwrap();
    let cfg = RollConfig::default();
    let rolled = roll_by_contract_column(&legacy_input, "FUT_CUR_GEN_TICKER", "px", &cfg).unwrap();

    // Same engine as the canonical pipeline on equivalent input.
    let canonical_input = df!(
        "date" => ["2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"],
        "symbol" => ["CLH4", "CLH4", "CLJ4", "CLJ4"],
        "last" => [100.0, 102.0, 105.0, 106.0]
    )
    .unwrap();
    let canonical = build_continuous(&canonical_input, &cfg).unwrap();
    assert_eq!(
        column(&rolled, "px_Adj"),
        column(&canonical.frame, "last_Adj")
    );
    // Extra numeric columns roll too, by the same per-segment scalar.
    let vwap_adj = column(&rolled, "vwap_Adj");
    assert!((vwap_adj[0] - 102.9).abs() < 1e-12);
}

#[test]
fn dropped_rows_are_reported() {
    let raw = df!(
        "date" => ["2024-01-02", "garbage", "2024-01-04"],
        "symbol" => ["CLH4", "CLH4", "CLJ4"],
        "last" => [100.0, 101.0, 105.0]
    )
    .unwrap();
    let out = build_continuous(&raw, &RollConfig::default()).unwrap();
    assert_eq!(out.rows_dropped, 1);
    assert_eq!(out.frame.height(), 2);
}

#[test]
fn schema_error_yields_no_output() {
    let raw = df!(
        "date" => ["2024-01-02"],
        "last" => [100.0]
    )
    .unwrap();
    assert!(build_continuous(&raw, &RollConfig::default()).is_err());
}
