//! Core types for the call bridge.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Sink for async completions crossing back into the surface's context.
///
/// Must be safe to call from any thread. Surfaces typically back it with
/// a channel sender drained by their event loop, so worker threads never
/// touch surface-owned state directly.
pub type ResponseSink = Box<dyn Fn(Response) + Send + Sync>;

/// A named call from the UI surface to a native handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Handler key to route to.
    pub name: String,
    /// Unique id for this call, chosen by the surface.
    pub id: String,
    /// Opaque payload in whatever encoding the caller picked.
    pub payload: String,
}

impl Request {
    /// Create a new request.
    pub fn new(name: impl Into<String>, id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            payload: payload.into(),
        }
    }
}

/// Completion status of an asynchronous call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveStatus {
    /// The handler produced a result.
    Resolved,
    /// The handler failed; the result carries the failure message.
    Rejected,
}

impl std::fmt::Display for ResolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveStatus::Resolved => write!(f, "resolved"),
            ResolveStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Completion for an asynchronous call, delivered through the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Id of the request this answers.
    pub id: String,
    /// Whether the handler succeeded.
    pub status: ResolveStatus,
    /// Result string when resolved, failure message when rejected.
    pub result: String,
}

/// Result of dispatching a request through the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeOutcome {
    /// A sync handler ran inline; this is its reply.
    Reply(String),
    /// An async handler was scheduled; the response arrives through the sink.
    Pending,
}

/// Token observed by async handlers to stop work early at shutdown.
#[derive(Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation.
    ///
    /// Long-running handlers observe it at their next poll and must
    /// still resolve before returning.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let observer = token.clone();

        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn response_serializes_with_lowercase_status() {
        let response = Response {
            id: "req-1".to_string(),
            status: ResolveStatus::Rejected,
            result: "boom".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"rejected\""));
    }
}
