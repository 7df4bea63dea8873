//! The bridge that routes surface requests to native handlers.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use super::errors::{BridgeError, BridgeResult};
use super::handler::{AsyncCall, Handler};
use super::types::{CancelToken, InvokeOutcome, Request, ResolveStatus, Response, ResponseSink};

/// Resolve-side state shared between the bridge and every scheduled call:
/// the outstanding-id set and the sink completions are delivered through.
struct ResolveCore {
    pending: Mutex<HashSet<String>>,
    sink: ResponseSink,
}

impl ResolveCore {
    fn new(sink: ResponseSink) -> Self {
        Self {
            pending: Mutex::new(HashSet::new()),
            sink,
        }
    }

    /// Claim an id before its worker is scheduled.
    fn claim(&self, id: &str) -> BridgeResult<()> {
        let mut pending = self.pending.lock();
        if !pending.insert(id.to_string()) {
            return Err(BridgeError::protocol_violation(
                id,
                "a call with this id is already outstanding",
            ));
        }
        Ok(())
    }

    /// Deliver a completion, enforcing exactly-once per id.
    ///
    /// The sink runs outside the pending lock; it may do arbitrary work.
    fn complete(
        &self,
        id: &str,
        status: ResolveStatus,
        result: String,
    ) -> BridgeResult<()> {
        {
            let mut pending = self.pending.lock();
            if !pending.remove(id) {
                return Err(BridgeError::protocol_violation(
                    id,
                    "no outstanding call with this id",
                ));
            }
        }
        tracing::debug!("Delivering {} response for request '{}'", status, id);
        (self.sink)(Response {
            id: id.to_string(),
            status,
            result,
        });
        Ok(())
    }

    fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

/// Exactly-once completion guard for one scheduled call.
///
/// Dropping it unfinished delivers a rejected response, so a handler
/// that returns early or unwinds still answers the surface.
pub(super) struct Resolver {
    id: String,
    name: String,
    core: Arc<ResolveCore>,
    finished: bool,
}

impl Resolver {
    fn new(id: impl Into<String>, name: impl Into<String>, core: Arc<ResolveCore>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            core,
            finished: false,
        }
    }

    pub(super) fn finish(mut self, status: ResolveStatus, result: String) {
        self.finished = true;
        if let Err(e) = self.core.complete(&self.id, status, result) {
            tracing::warn!("Discarding late completion from handler '{}': {}", self.name, e);
        }
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let message = if thread::panicking() {
            format!("handler '{}' panicked before resolving", self.name)
        } else {
            format!("handler '{}' finished without resolving", self.name)
        };
        if self
            .core
            .complete(&self.id, ResolveStatus::Rejected, message)
            .is_ok()
        {
            tracing::warn!(
                "Async handler '{}' never resolved request '{}'; rejected on its behalf",
                self.name,
                self.id
            );
        }
    }
}

/// Routes named requests from a UI surface to native handlers.
///
/// Sync handlers run inline on the caller's context and reply through
/// the returned outcome. Async handlers run on bridge-owned worker
/// threads and reply through the response sink, keyed by request id.
/// The bridge owns the registration table, the outstanding-id set, and
/// every worker it spawned; [`shutdown`](Self::shutdown) cancels and
/// joins them all.
pub struct CallBridge {
    handlers: HashMap<String, Handler>,
    core: Arc<ResolveCore>,
    cancel: CancelToken,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl CallBridge {
    /// Create a bridge that delivers async completions through `sink`.
    pub fn new(sink: ResponseSink) -> Self {
        Self {
            handlers: HashMap::new(),
            core: Arc::new(ResolveCore::new(sink)),
            cancel: CancelToken::new(),
            workers: Mutex::new(Vec::new()),
        }
    }

    /// Bind a name to a handler.
    ///
    /// Reusing a name fails rather than overwriting; a harness that
    /// silently replaced bindings would hide wiring mistakes.
    pub fn register(&mut self, name: impl Into<String>, handler: Handler) -> BridgeResult<()> {
        let name = name.into();
        if self.handlers.contains_key(&name) {
            return Err(BridgeError::duplicate_name(name));
        }
        tracing::debug!("Registered {} handler '{}'", handler.kind(), name);
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Bind a synchronous handler.
    ///
    /// The closure runs inline on the surface's loop whenever the name
    /// is invoked, so it must not block or sleep.
    pub fn register_sync<F>(&mut self, name: impl Into<String>, f: F) -> BridgeResult<()>
    where
        F: Fn(&Request) -> Result<String, String> + Send + Sync + 'static,
    {
        self.register(name, Handler::Sync(Box::new(f)))
    }

    /// Bind an asynchronous handler.
    ///
    /// Each invocation runs the closure on its own worker thread with an
    /// [`AsyncCall`] it must resolve or reject.
    pub fn register_async<F>(&mut self, name: impl Into<String>, f: F) -> BridgeResult<()>
    where
        F: Fn(AsyncCall) + Send + Sync + 'static,
    {
        self.register(name, Handler::Async(Arc::new(f)))
    }

    /// Route a request to its handler.
    ///
    /// Sync handlers complete before this returns and their reply is in
    /// the outcome; one that fails or panics surfaces as
    /// [`BridgeError::HandlerFailed`] instead of unwinding into the
    /// caller. Async handlers are scheduled and the id stays outstanding
    /// until exactly one completion is delivered for it through the sink.
    pub fn invoke(&self, request: Request) -> BridgeResult<InvokeOutcome> {
        let handler = self
            .handlers
            .get(&request.name)
            .ok_or_else(|| BridgeError::unknown_handler(&request.name))?;

        match handler {
            Handler::Sync(f) => {
                tracing::debug!(
                    "Running sync handler '{}' for request '{}'",
                    request.name,
                    request.id
                );
                // A handler that unwinds must not take the surface loop down.
                let reply = panic::catch_unwind(AssertUnwindSafe(|| f(&request)))
                    .unwrap_or_else(|payload| Err(panic_text(payload)))
                    .map_err(|message| {
                        tracing::warn!("Sync handler '{}' failed: {}", request.name, message);
                        BridgeError::handler_failed(&request.name, message)
                    })?;
                Ok(InvokeOutcome::Reply(reply))
            }
            Handler::Async(f) => {
                self.core.claim(&request.id)?;
                tracing::debug!(
                    "Scheduling async handler '{}' for request '{}'",
                    request.name,
                    request.id
                );
                let resolver = Resolver::new(&request.id, &request.name, Arc::clone(&self.core));
                let call = AsyncCall::new(request, self.cancel.clone(), resolver);
                let f = Arc::clone(f);
                let worker = thread::spawn(move || f(call));
                let mut workers = self.workers.lock();
                // Finished workers are pruned here; shutdown joins the rest.
                workers.retain(|handle| !handle.is_finished());
                workers.push(worker);
                Ok(InvokeOutcome::Pending)
            }
        }
    }

    /// Deliver a completion for an outstanding async call.
    ///
    /// Handlers normally resolve through their [`AsyncCall`]; this is the
    /// embedder-facing path and enforces the same exactly-once rule.
    pub fn resolve(
        &self,
        id: &str,
        status: ResolveStatus,
        result: impl Into<String>,
    ) -> BridgeResult<()> {
        self.core.complete(id, status, result.into())
    }

    /// Number of async calls still waiting on a completion.
    pub fn pending_count(&self) -> usize {
        self.core.pending_count()
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Names of all registered handlers, sorted.
    pub fn handler_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get the token async handlers watch for shutdown.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Cancel outstanding work and join every worker this bridge spawned.
    ///
    /// Runs automatically on drop. Workers are expected to observe the
    /// cancellation token and resolve promptly; any request whose worker
    /// unwound was already rejected by its resolver.
    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        let workers: Vec<JoinHandle<()>> = self.workers.lock().drain(..).collect();
        if workers.is_empty() {
            return;
        }
        tracing::debug!("Joining {} bridge worker(s)", workers.len());
        for worker in workers {
            if worker.join().is_err() {
                tracing::warn!("A bridge worker panicked during its handler");
            }
        }
    }
}

impl Drop for CallBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Best-effort text from a panic payload.
fn panic_text(payload: Box<dyn Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "handler panicked".to_string()
    }
}
