//! Call bridge between a UI surface and native handlers.
//!
//! The surface invokes handlers by name. Sync handlers run inline on the
//! surface's loop and reply immediately; async handlers run on worker
//! threads owned by the bridge and answer later through a response sink.
//!
//! # Architecture
//!
//! ```text
//! UI surface ──invoke(name, id, payload)──▶ CallBridge
//!     ▲                                        ├── Sync handler (inline reply)
//!     │                                        └── Async handler (worker thread)
//!     └──────── ResponseSink ◀──resolve(id)────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use fluid_core::bridge::{CallBridge, Request, Response};
//!
//! let (tx, rx) = std::sync::mpsc::channel::<Response>();
//! let mut bridge = CallBridge::new(Box::new(move |response| {
//!     let _ = tx.send(response);
//! }));
//!
//! bridge.register_sync("echo", |req| Ok(req.payload.clone()))?;
//! bridge.register_async("slow", |call| call.resolve("done"))?;
//!
//! bridge.invoke(Request::new("slow", "req-1", "{}"))?;
//! let response = rx.recv()?;
//! assert_eq!(response.id, "req-1");
//! ```

mod call_bridge;
mod errors;
mod handler;
mod types;

pub use call_bridge::CallBridge;
pub use errors::{BridgeError, BridgeResult};
pub use handler::{AsyncCall, AsyncHandler, Handler, SyncHandler};
pub use types::{CancelToken, InvokeOutcome, Request, ResolveStatus, Response, ResponseSink};
