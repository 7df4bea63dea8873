//! Headless surface that plays a scripted page against the bridge.
//!
//! Stands in for a desktop webview: it records the window setup calls,
//! replays a scripted sequence of page invocations, and drains the
//! resolve channel until every pending call has been answered. Every
//! exchange lands in the session transcript in its wire shape.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use fluid_core::bridge::{CallBridge, InvokeOutcome, Request, ResolveStatus, Response};
use fluid_core::logging::SessionLog;
use fluid_core::surface::{SurfaceError, SurfaceResult, UiSurface};

/// How long to wait for each outstanding resolve before giving up.
const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// One page-side call to play through the bridge.
#[derive(Debug, Clone)]
pub struct ScriptedCall {
    /// Binding name the page invokes.
    pub name: String,
    /// JSON argument payload.
    pub payload: String,
}

impl ScriptedCall {
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }
}

/// Surface that replays a script instead of opening a real window.
///
/// Owns the receiving end of the bridge's response channel; the bridge
/// must have been built with the matching sender as its sink.
pub struct HeadlessSurface {
    title: String,
    width: u32,
    height: u32,
    page_bytes: usize,
    script: Vec<ScriptedCall>,
    responses: Receiver<Response>,
    log: Arc<SessionLog>,
    resolve_timeout: Duration,
}

impl HeadlessSurface {
    /// Create a surface that will play `script` once run.
    pub fn new(
        script: Vec<ScriptedCall>,
        responses: Receiver<Response>,
        log: Arc<SessionLog>,
    ) -> Self {
        Self {
            title: String::new(),
            width: 0,
            height: 0,
            page_bytes: 0,
            script,
            responses,
            log,
            resolve_timeout: DEFAULT_RESOLVE_TIMEOUT,
        }
    }

    /// Override how long to wait on each outstanding resolve.
    pub fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }
}

/// Render a wire value for the transcript.
fn wire_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<unserializable>".to_string())
}

impl UiSurface for HeadlessSurface {
    fn name(&self) -> &str {
        "headless"
    }

    fn set_title(&mut self, title: &str) -> SurfaceResult<()> {
        self.title = title.to_string();
        self.log.info(&format!("Window title set to '{}'", title));
        Ok(())
    }

    fn set_size(&mut self, width: u32, height: u32) -> SurfaceResult<()> {
        self.width = width;
        self.height = height;
        self.log
            .info(&format!("Window size set to {}x{}", width, height));
        Ok(())
    }

    fn set_html(&mut self, html: &str) -> SurfaceResult<()> {
        self.page_bytes = html.len();
        self.log
            .info(&format!("Page loaded ({} bytes)", html.len()));
        Ok(())
    }

    fn run(&mut self, bridge: &mut CallBridge) -> SurfaceResult<()> {
        let script = std::mem::take(&mut self.script);
        self.log.info(&format!(
            "Running scripted session with {} call(s)",
            script.len()
        ));

        // Play the script, counting calls that resolve later.
        let mut pending = 0usize;
        for call in script {
            let id = Uuid::new_v4().to_string();
            let request = Request::new(&call.name, &id, &call.payload);
            self.log.info(&format!("page -> {}", wire_json(&request)));

            match bridge.invoke(request) {
                Ok(InvokeOutcome::Reply(result)) => {
                    // Inline replies take the same wire shape back.
                    let response = Response {
                        id,
                        status: ResolveStatus::Resolved,
                        result,
                    };
                    self.log.info(&format!("page <- {}", wire_json(&response)));
                }
                Ok(InvokeOutcome::Pending) => {
                    pending += 1;
                    self.log
                        .info(&format!("Call '{}' pending (id {})", call.name, id));
                }
                Err(e) => {
                    // A bad page call does not end the session.
                    self.log.error(&e.to_string());
                }
            }
        }

        // Drain outstanding resolves.
        while pending > 0 {
            match self.responses.recv_timeout(self.resolve_timeout) {
                Ok(response) => {
                    self.log.info(&format!("page <- {}", wire_json(&response)));
                    pending -= 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(SurfaceError::stalled(
                        pending,
                        self.resolve_timeout.as_millis() as u64,
                    ));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(SurfaceError::disconnected(pending));
                }
            }
        }

        self.log.info("Scripted session complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;

    use fluid_core::logging::{LogLevel, SessionConfig};

    use super::*;

    fn test_log(dir: &std::path::Path) -> Arc<SessionLog> {
        let config = SessionConfig {
            level: LogLevel::Debug,
            show_timestamps: false,
        };
        Arc::new(SessionLog::new("surface-test", dir, config, None).unwrap())
    }

    #[test]
    fn sync_replies_are_logged_inline() {
        let dir = tempfile::tempdir().unwrap();
        let log = test_log(dir.path());

        let (tx, rx) = mpsc::channel();
        let mut bridge = CallBridge::new(Box::new(move |response| {
            let _ = tx.send(response);
        }));
        bridge
            .register_sync("echo", |request| Ok(request.payload.clone()))
            .unwrap();

        let script = vec![ScriptedCall::new("echo", "[\"hi\"]")];
        let mut surface = HeadlessSurface::new(script, rx, Arc::clone(&log));
        surface.run(&mut bridge).unwrap();
        log.close();

        let contents = std::fs::read_to_string(log.log_path()).unwrap();
        assert!(contents.contains("page -> "));
        assert!(contents.contains("\"result\":\"[\\\"hi\\\"]\""));
        assert!(contents.contains("Scripted session complete"));
    }

    #[test]
    fn pending_calls_drain_through_the_channel() {
        let dir = tempfile::tempdir().unwrap();
        let log = test_log(dir.path());

        let (tx, rx) = mpsc::channel();
        let mut bridge = CallBridge::new(Box::new(move |response| {
            let _ = tx.send(response);
        }));
        bridge
            .register_async("later", |call| {
                thread::sleep(Duration::from_millis(30));
                call.resolve("done");
            })
            .unwrap();

        let script = vec![ScriptedCall::new("later", "{}")];
        let mut surface = HeadlessSurface::new(script, rx, Arc::clone(&log));
        surface.run(&mut bridge).unwrap();
        log.close();

        let contents = std::fs::read_to_string(log.log_path()).unwrap();
        assert!(contents.contains("pending (id "));
        assert!(contents.contains("\"result\":\"done\""));
    }

    #[test]
    fn unknown_bindings_do_not_end_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let log = test_log(dir.path());

        let (tx, rx) = mpsc::channel();
        let mut bridge = CallBridge::new(Box::new(move |response| {
            let _ = tx.send(response);
        }));
        bridge
            .register_sync("real", |_| Ok("yes".to_string()))
            .unwrap();

        let script = vec![
            ScriptedCall::new("imaginary", "{}"),
            ScriptedCall::new("real", "{}"),
        ];
        let mut surface = HeadlessSurface::new(script, rx, Arc::clone(&log));
        surface.run(&mut bridge).unwrap();
        log.close();

        let contents = std::fs::read_to_string(log.log_path()).unwrap();
        assert!(contents.contains("[ERROR] No handler registered under 'imaginary'"));
        assert!(contents.contains("\"result\":\"yes\""));
    }

    #[test]
    fn stalls_when_a_handler_never_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let log = test_log(dir.path());

        let (tx, rx) = mpsc::channel();
        let mut bridge = CallBridge::new(Box::new(move |response| {
            let _ = tx.send(response);
        }));
        bridge
            .register_async("glacial", |call| {
                // Holds the call until cancelled at teardown.
                while !call.is_cancelled() {
                    thread::sleep(Duration::from_millis(10));
                }
                call.reject("cancelled");
            })
            .unwrap();

        let script = vec![ScriptedCall::new("glacial", "{}")];
        let mut surface = HeadlessSurface::new(script, rx, Arc::clone(&log))
            .with_resolve_timeout(Duration::from_millis(100));
        let err = surface.run(&mut bridge).unwrap_err();

        assert!(matches!(err, SurfaceError::Stalled { pending: 1, .. }));
    }
}
