use polars::error::PolarsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RollError>;

/// Errors surfaced before any rolled output is produced. Data-quality issues
/// (unparseable dates, non-numeric prices) are not errors; those rows are
/// dropped and counted in `clean::CleanReport`.
#[derive(Debug, Error)]
pub enum RollError {
    /// A mandatory canonical column (date/symbol/last) could not be resolved.
    #[error("could not resolve required column '{field}' (tried: {tried:?})")]
    Schema {
        field: &'static str,
        tried: Vec<String>,
    },

    /// A chain-selection policy needs a metric column the table doesn't have.
    #[error("chain selector '{policy}' requires column '{column}', which was not found")]
    MissingColumn {
        policy: &'static str,
        column: &'static str,
    },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}
