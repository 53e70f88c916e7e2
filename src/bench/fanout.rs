use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::trace;

use super::error::DispatchError;
use crate::runtime::Runtime;
use crate::unit::{Reply, Request, UnitHandle};

/// Sends one request to every unit concurrently and waits for all replies.
///
/// Each unit gets its own task on the runtime's scheduler, with no cap on
/// how many run at once. Replies come back in completion order, so the result
/// is only meaningful as a multiset. `request` is called once per unit, in
/// the order of `units`, to build that unit's request, and `decode` turns each
/// reply into the caller's type.
///
/// The first failure aborts every sibling task that has not finished yet and
/// is returned on its own; replies that already arrived are discarded.
pub async fn dispatch_all<R, T, F>(
    runtime: &Arc<R>,
    units: &[UnitHandle<R::Address>],
    mut request: F,
    decode: fn(Reply) -> Result<T, Reply>,
) -> Result<Vec<T>, DispatchError>
where
    R: Runtime,
    T: Send + 'static,
    F: FnMut(&UnitHandle<R::Address>) -> Request,
{
    let mut tasks = JoinSet::new();
    for unit in units {
        let runtime = Arc::clone(runtime);
        let address = unit.address().clone();
        let index = unit.index();
        let request = request(unit);
        tasks.spawn(async move {
            let reply = runtime
                .send(&address, request)
                .await
                .map_err(|source| DispatchError::Send { index, source })?;
            decode(reply)
                .map_err(|reply| DispatchError::UnexpectedReply { index, reply })
        });
    }

    let mut responses = Vec::with_capacity(units.len());
    while let Some(joined) = tasks.join_next().await {
        match joined.map_err(DispatchError::from).and_then(|task| task) {
            Ok(response) => responses.push(response),
            Err(error) => {
                trace!(outstanding = tasks.len(), "aborting remaining requests");
                tasks.abort_all();
                return Err(error);
            }
        }
    }

    Ok(responses)
}

/// Pings every unit.
pub async fn ping_all<R: Runtime>(
    runtime: &Arc<R>,
    units: &[UnitHandle<R::Address>],
) -> Result<Vec<&'static str>, DispatchError> {
    dispatch_all(runtime, units, |_| Request::Ping, Reply::into_pong).await
}

/// Asks every unit for its index.
pub async fn collect_indices<R: Runtime>(
    runtime: &Arc<R>,
    units: &[UnitHandle<R::Address>],
) -> Result<Vec<usize>, DispatchError> {
    dispatch_all(runtime, units, |_| Request::GetIndex, Reply::into_index).await
}
