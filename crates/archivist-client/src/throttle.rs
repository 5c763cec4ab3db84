//! Rate-limited dispatch through a dedicated worker task.
//!
//! [`dispatch_throttled`] wraps an async operation so that any number of
//! concurrent callers are serialized through one long-lived worker which
//! enforces a minimum wall-clock interval between invocations. Each caller
//! blocks only until its own call completes and receives that call's exact
//! outcome.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, trace};

/// Error returned when a throttled call cannot be dispatched at all.
///
/// Errors produced by the wrapped operation are not represented here; they
/// travel back to the caller unchanged as the operation's own output.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The worker task is no longer running, so the request can neither be
    /// enqueued nor completed.
    #[error("throttle worker is no longer running")]
    WorkerGone,
}

/// One queued unit of work awaiting throttled execution.
struct DispatchRequest<Req, Res> {
    input: Req,
    reply: oneshot::Sender<Res>,
}

/// Handle to a throttled operation created by [`dispatch_throttled`].
///
/// Cloning the handle shares the same worker, queue and rate budget.
/// The worker exits once every handle has been dropped and the queue has
/// drained.
pub struct Throttled<Req, Res> {
    tx: mpsc::UnboundedSender<DispatchRequest<Req, Res>>,
}

impl<Req, Res> Clone for Throttled<Req, Res> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<Req, Res> Throttled<Req, Res> {
    /// Enqueue one invocation and wait for its outcome.
    ///
    /// Requests are served in strict arrival order. There is no timeout or
    /// cancellation; the caller waits until the worker reaches its request.
    ///
    /// # Errors
    /// Returns [`DispatchError::WorkerGone`] if the worker task has
    /// terminated.
    pub async fn call(&self, input: Req) -> Result<Res, DispatchError> {
        let (reply, receipt) = oneshot::channel();
        self.tx
            .send(DispatchRequest { input, reply })
            .map_err(|_| DispatchError::WorkerGone)?;
        receipt.await.map_err(|_| DispatchError::WorkerGone)
    }
}

/// Wrap `op` so that its invocations are serialized and spaced at least
/// `interval` apart.
///
/// A single worker task is spawned immediately and lives for as long as any
/// [`Throttled`] handle does. The worker dequeues requests in FIFO order;
/// before each invocation it sleeps out whatever remains of `interval`
/// since the previous invocation *started*. A failing invocation still
/// consumes rate budget and never stops the worker.
///
/// Every call to this function creates an isolated worker with its own
/// queue and timestamp; wrapping two operations never shares rate budget.
///
/// Must be called from within a tokio runtime.
pub fn dispatch_throttled<Req, Res, Op, Fut>(interval: Duration, mut op: Op) -> Throttled<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
    Op: FnMut(Req) -> Fut + Send + 'static,
    Fut: Future<Output = Res> + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<DispatchRequest<Req, Res>>();

    tokio::spawn(async move {
        let mut last_dispatch: Option<Instant> = None;

        while let Some(DispatchRequest { input, reply }) = rx.recv().await {
            if let Some(last) = last_dispatch {
                let ready_at = last + interval;
                let now = Instant::now();
                if now < ready_at {
                    trace!(
                        wait_ms = ready_at.duration_since(now).as_millis() as u64,
                        "throttling dispatch"
                    );
                    tokio::time::sleep_until(ready_at).await;
                }
            }

            // Recorded before the call: a failing operation consumed budget too.
            last_dispatch = Some(Instant::now());
            let outcome = op(input).await;

            if reply.send(outcome).is_err() {
                debug!("dispatch caller went away before receiving its result");
            }
        }

        debug!("throttle worker exiting; all handles dropped");
    });

    Throttled { tx }
}
