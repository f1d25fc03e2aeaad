use anyhow::Result;
use RollFactory::roll::{build_continuous, RollConfig};
use RollFactory::storage;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "raw_data/sample.csv".to_string());
    let output = args.next();

    let raw = storage::read_csv(&input)?;
    let rolled = build_continuous(&raw, &RollConfig::default())?;
    println!(
        "Rolled {} rows ({} dropped during cleaning)",
        rolled.frame.height(),
        rolled.rows_dropped
    );

    if let Some(path) = output {
        storage::write_parquet(&rolled.frame, &path)?;
    }
    Ok(())
}
