pub mod cli;
pub mod config;
pub mod db;
pub mod planner;

pub use cli::error::RangeReadError;
pub use planner::{build_partition_plan, BoundValue, PartitionPlan};
