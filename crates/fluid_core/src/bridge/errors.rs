//! Error types for the call bridge.
//!
//! Registration and lookup errors surface synchronously to the caller;
//! handler failures are contained at the bridge boundary and never
//! crash the surface's loop.

use thiserror::Error;

/// Error raised by bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// `invoke` named a handler that was never registered.
    #[error("No handler registered under '{name}'")]
    UnknownHandler { name: String },

    /// `register` reused a name that is already bound.
    #[error("Handler name '{name}' is already registered")]
    DuplicateName { name: String },

    /// A completion was claimed or delivered against the outstanding-id
    /// rules (double resolve, resolve for an unknown id, reused id).
    #[error("Protocol violation for request '{id}': {message}")]
    ProtocolViolation { id: String, message: String },

    /// A handler body failed during execution.
    #[error("Handler '{name}' failed: {message}")]
    HandlerFailed { name: String, message: String },
}

impl BridgeError {
    /// Create an unknown handler error.
    pub fn unknown_handler(name: impl Into<String>) -> Self {
        Self::UnknownHandler { name: name.into() }
    }

    /// Create a duplicate name error.
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Create a protocol violation error.
    pub fn protocol_violation(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Create a handler failed error.
    pub fn handler_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HandlerFailed {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display_their_context() {
        let err = BridgeError::unknown_handler("compute");
        assert!(err.to_string().contains("compute"));

        let err = BridgeError::protocol_violation("req-7", "no outstanding call with this id");
        let msg = err.to_string();
        assert!(msg.contains("req-7"));
        assert!(msg.contains("no outstanding call"));
    }

    #[test]
    fn handler_failure_names_the_handler() {
        let err = BridgeError::handler_failed("count", "bad integer 'abc'");
        let msg = err.to_string();
        assert!(msg.contains("count"));
        assert!(msg.contains("bad integer"));
    }
}
