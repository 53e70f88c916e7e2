//! The benchmark driver: population building, fan-out/fan-in messaging,
//! partitioned computation and the phase timing around all three.

mod config;
mod error;
mod orchestrator;
mod report;

pub mod compute;
pub mod fanout;
pub mod population;

pub use config::BenchConfig;
pub use error::{BenchError, ComputeError, DispatchError, InvalidConfigurationError};
pub use orchestrator::Benchmark;
pub use report::{BenchmarkReport, ComputeReport, SweepReport, Trial};
