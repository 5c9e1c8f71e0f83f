pub mod aggregator;
pub mod traits;
