//! Scalability benchmark driver for actor-style runtimes.
//!
//! The driver creates large populations of addressable units, fans requests
//! out to all of them and back in, partitions a bulk reduction across a pool
//! of worker units, and reports how long each phase took. The runtime that
//! actually hosts the units sits behind the [`runtime::Runtime`] trait, so the
//! same driver can measure any substrate; [`runtime::LocalRuntime`] is the
//! bundled in-process one built on tokio tasks.

pub mod bench;
pub mod fmt;
pub mod memory;
pub mod runtime;
pub mod unit;

pub use bench::{Benchmark, BenchConfig, BenchError};
pub use runtime::{LocalRuntime, Runtime};
pub use unit::{Reply, Request, Unit, UnitHandle};

#[cfg(test)]
pub(crate) mod testing;
