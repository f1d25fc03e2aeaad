//! Roll-adjusted continuous futures series from per-contract price tables.

pub mod chain;
pub mod clean;
pub mod client;
pub mod error;
pub mod gap;
pub mod rebase;
pub mod roll;
pub mod schema;
pub mod segment;
pub mod storage;

pub use chain::ChainPolicy;
pub use error::RollError;
pub use gap::RollType;
pub use rebase::rebase_non_negative;
pub use roll::{build_continuous, roll_by_contract_column, RollConfig, RollOutput};
