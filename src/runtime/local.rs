use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

use super::{Runtime, SendError, SystemCreationError, UnitCreationError};
use crate::unit::{Reply, Request, Unit};

#[derive(Clone, Debug, Default, TypedBuilder)]
pub struct LocalRuntimeConfig {
    /// Upper bound on the units a single system will host. Creation beyond it
    /// fails per unit instead of exhausting the host.
    #[builder(default, setter(strip_option))]
    pub max_units: Option<usize>,
}

/// In-process runtime where every unit is its own tokio task draining a
/// mailbox. Requests carry a oneshot channel for the reply.
#[derive(Clone, Debug, Default)]
pub struct LocalRuntime {
    config: LocalRuntimeConfig,
}

impl LocalRuntime {
    pub fn new(config: LocalRuntimeConfig) -> Self {
        Self { config }
    }
}

#[derive(Debug)]
pub struct LocalSystem {
    name: String,
    max_units: Option<usize>,
    units_spawned: AtomicUsize,
}

impl LocalSystem {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of units successfully spawned into this system so far.
    pub fn units_spawned(&self) -> usize {
        self.units_spawned.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
struct Envelope {
    request: Request,
    reply_tx: oneshot::Sender<Reply>,
}

/// Mailbox of a unit hosted by [`LocalRuntime`].
///
/// The unit's task ends once every address to it has been dropped.
#[derive(Clone, Debug)]
pub struct LocalAddress {
    mailbox: mpsc::UnboundedSender<Envelope>,
}

/// Node names follow the `name@host` shape distributed runtimes use.
fn validate_handshake(name: &str, cookie: &str) -> Result<(), SystemCreationError> {
    if name.is_empty() {
        return Err(SystemCreationError::EmptyName);
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '@' | '.'))
    {
        return Err(SystemCreationError::InvalidName(name.to_owned()));
    }
    if cookie.is_empty() {
        return Err(SystemCreationError::EmptyCookie(name.to_owned()));
    }
    Ok(())
}

impl Runtime for LocalRuntime {
    type System = LocalSystem;
    type Address = LocalAddress;

    async fn create_system(
        &self,
        name: &str,
        cookie: &str,
    ) -> Result<LocalSystem, SystemCreationError> {
        validate_handshake(name, cookie)?;
        debug!(system = name, max_units = ?self.config.max_units, "system ready");
        Ok(LocalSystem {
            name: name.to_owned(),
            max_units: self.config.max_units,
            units_spawned: AtomicUsize::new(0),
        })
    }

    async fn create_unit(
        &self,
        index: usize,
        system: &LocalSystem,
    ) -> Result<LocalAddress, UnitCreationError> {
        system
            .units_spawned
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |spawned| {
                match system.max_units {
                    Some(limit) if spawned >= limit => None,
                    _ => Some(spawned + 1),
                }
            })
            .map_err(|spawned| UnitCreationError::CapacityExhausted {
                system: system.name.clone(),
                limit: system.max_units.unwrap_or(spawned),
            })?;

        let (mailbox, mut inbox) = mpsc::unbounded_channel::<Envelope>();
        let unit = Unit::new(index);
        tokio::spawn(async move {
            while let Some(Envelope { request, reply_tx }) = inbox.recv().await {
                // the requester may have stopped waiting
                let _ = reply_tx.send(unit.handle(request));
            }
            trace!(index, "unit stopped");
        });

        Ok(LocalAddress { mailbox })
    }

    async fn send(
        &self,
        unit: &LocalAddress,
        request: Request,
    ) -> Result<Reply, SendError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        unit.mailbox
            .send(Envelope { request, reply_tx })
            .map_err(|_| SendError::MailboxClosed)?;
        reply_rx.await.map_err(|_| SendError::NoReply)
    }
}
