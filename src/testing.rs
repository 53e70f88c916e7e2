use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::runtime::{
    LocalAddress, LocalRuntime, LocalSystem, Runtime, SendError,
    SystemCreationError, UnitCreationError,
};
use crate::unit::{Reply, Request};

/// Wraps [`LocalRuntime`] and injects failures at chosen points.
#[derive(Debug, Default)]
pub(crate) struct FaultyRuntime {
    inner: LocalRuntime,
    fail_create: HashSet<usize>,
    fail_send: HashSet<usize>,
    stall_send: HashSet<usize>,
    fail_handshake_call: Option<usize>,
    handshakes: AtomicUsize,
    sends: AtomicUsize,
}

#[derive(Clone, Debug)]
pub(crate) struct FaultyAddress {
    index: usize,
    inner: LocalAddress,
}

impl FaultyRuntime {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_create(mut self, index: usize) -> Self {
        self.fail_create.insert(index);
        self
    }

    pub(crate) fn fail_send(mut self, index: usize) -> Self {
        self.fail_send.insert(index);
        self
    }

    /// Requests to this unit never complete.
    pub(crate) fn stall_send(mut self, index: usize) -> Self {
        self.stall_send.insert(index);
        self
    }

    /// Fails the `call`-th handshake, counting from 0.
    pub(crate) fn fail_handshake(mut self, call: usize) -> Self {
        self.fail_handshake_call = Some(call);
        self
    }

    pub(crate) fn sends(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }
}

impl Runtime for FaultyRuntime {
    type System = LocalSystem;
    type Address = FaultyAddress;

    async fn create_system(
        &self,
        name: &str,
        cookie: &str,
    ) -> Result<LocalSystem, SystemCreationError> {
        let call = self.handshakes.fetch_add(1, Ordering::SeqCst);
        if self.fail_handshake_call == Some(call) {
            return Err(SystemCreationError::Rejected {
                name: name.to_owned(),
                reason: "injected".into(),
            });
        }
        self.inner.create_system(name, cookie).await
    }

    async fn create_unit(
        &self,
        index: usize,
        system: &LocalSystem,
    ) -> Result<FaultyAddress, UnitCreationError> {
        if self.fail_create.contains(&index) {
            return Err(UnitCreationError::Rejected {
                index,
                reason: "injected".into(),
            });
        }
        let inner = self.inner.create_unit(index, system).await?;
        Ok(FaultyAddress { index, inner })
    }

    async fn send(
        &self,
        unit: &FaultyAddress,
        request: Request,
    ) -> Result<Reply, SendError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        if self.fail_send.contains(&unit.index) {
            return Err(SendError::Rejected(format!(
                "injected failure for unit {}",
                unit.index
            )));
        }
        if self.stall_send.contains(&unit.index) {
            std::future::pending::<()>().await;
        }
        self.inner.send(&unit.inner, request).await
    }
}
