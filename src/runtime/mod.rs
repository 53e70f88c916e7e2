//! The substrate the benchmark measures.
//!
//! The driver only ever needs three capabilities from an actor runtime: a
//! one-time system handshake, creating a unit inside that system, and a
//! request/reply exchange with a unit. Anything that can provide those can be
//! benchmarked.

use std::future::Future;

use crate::unit::{Reply, Request};

mod error;
mod local;

pub use error::{SendError, SystemCreationError, UnitCreationError};
pub use local::{LocalAddress, LocalRuntime, LocalRuntimeConfig, LocalSystem};

pub trait Runtime: Send + Sync + 'static {
    /// Product of the handshake. Shared read-only by every unit created in it.
    type System: Send + Sync + 'static;
    /// Opaque address of a single unit.
    type Address: Clone + Send + Sync + 'static;

    fn create_system(
        &self,
        name: &str,
        cookie: &str,
    ) -> impl Future<Output = Result<Self::System, SystemCreationError>> + Send;

    fn create_unit(
        &self,
        index: usize,
        system: &Self::System,
    ) -> impl Future<Output = Result<Self::Address, UnitCreationError>> + Send;

    /// Sends `request` to `unit` and waits for its reply. There is no timeout,
    /// a unit that never answers stalls the caller.
    fn send(
        &self,
        unit: &Self::Address,
        request: Request,
    ) -> impl Future<Output = Result<Reply, SendError>> + Send;
}
