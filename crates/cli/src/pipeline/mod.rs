//! Watch pipeline module.

mod orchestrator;
mod stats;

pub use orchestrator::WatchPipeline;
pub use stats::RunStats;
