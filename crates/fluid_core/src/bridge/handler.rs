//! Handler variants and the per-call context for async work.

use std::sync::Arc;

use super::call_bridge::Resolver;
use super::types::{CancelToken, Request, ResolveStatus};

/// Boxed synchronous handler.
///
/// Runs inline on the surface's loop, so it must return quickly and
/// never block on I/O or sleep. An `Err` or a panic becomes a failed
/// response for the caller instead of crashing the loop.
pub type SyncHandler = Box<dyn Fn(&Request) -> Result<String, String> + Send + Sync>;

/// Shared asynchronous handler, cloned into the worker thread that runs it.
pub type AsyncHandler = Arc<dyn Fn(AsyncCall) + Send + Sync>;

/// A registered handler.
pub enum Handler {
    /// Completes before `invoke` returns; the reply travels inline.
    Sync(SyncHandler),
    /// Scheduled on a bridge-owned worker thread; replies through the
    /// resolve channel.
    Async(AsyncHandler),
}

impl Handler {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Handler::Sync(_) => "sync",
            Handler::Async(_) => "async",
        }
    }
}

/// Everything one scheduled async call owns: the request, the shutdown
/// token, and the resolver that must answer it.
///
/// The resolver enforces the exactly-once completion rule. If the
/// handler returns or unwinds without calling [`resolve`](Self::resolve)
/// or [`reject`](Self::reject), a rejected response is delivered on drop
/// so the surface never waits on the request forever.
pub struct AsyncCall {
    request: Request,
    cancel: CancelToken,
    resolver: Resolver,
}

impl AsyncCall {
    pub(super) fn new(request: Request, cancel: CancelToken, resolver: Resolver) -> Self {
        Self {
            request,
            cancel,
            resolver,
        }
    }

    /// Id of the request this call answers.
    pub fn id(&self) -> &str {
        &self.request.id
    }

    /// Name the request was routed under.
    pub fn name(&self) -> &str {
        &self.request.name
    }

    /// Opaque payload sent by the surface.
    pub fn payload(&self) -> &str {
        &self.request.payload
    }

    /// Check if shutdown has been requested.
    ///
    /// Long-running work should poll this between slices and resolve
    /// promptly once it is set.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Deliver a successful result and consume the call.
    pub fn resolve(self, result: impl Into<String>) {
        self.resolver.finish(ResolveStatus::Resolved, result.into());
    }

    /// Deliver a failure and consume the call.
    pub fn reject(self, message: impl Into<String>) {
        self.resolver.finish(ResolveStatus::Rejected, message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_kind_labels_variants() {
        let sync = Handler::Sync(Box::new(|_req| Ok(String::new())));
        let scheduled = Handler::Async(Arc::new(|call: AsyncCall| call.resolve("done")));

        assert_eq!(sync.kind(), "sync");
        assert_eq!(scheduled.kind(), "async");
    }
}
