//! Demo bindings and the value showcase.
//!
//! Two bindings mirror the classic bind example: `count` adjusts a
//! shared counter and replies inline, `compute` simulates a slow job
//! on a worker thread and resolves later. The showcase renders demo
//! values through the stringifier into the session transcript.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use fluid_core::bridge::{BridgeResult, CallBridge};
use fluid_core::logging::SessionLog;
use fluid_core::value::{Matrix, Value};

/// Cancellation poll interval for the compute worker.
const COMPUTE_SLICE: Duration = Duration::from_millis(50);

/// Register the demo bindings on the bridge.
///
/// `compute_delay` is how long the compute binding pretends to work
/// before resolving.
pub fn register_bindings(bridge: &mut CallBridge, compute_delay: Duration) -> BridgeResult<()> {
    let counter = Arc::new(Mutex::new(0i64));

    bridge.register_sync("count", move |request| {
        let direction = parse_direction(&request.payload)?;
        let mut count = counter.lock().unwrap();
        *count += direction;
        Ok(count.to_string())
    })?;

    bridge.register_async("compute", move |call| {
        // Sleep in slices so cancellation is picked up promptly.
        let mut remaining = compute_delay;
        while remaining > Duration::ZERO {
            if call.is_cancelled() {
                tracing::debug!("Compute call '{}' cancelled", call.id());
                call.reject("computation cancelled");
                return;
            }
            let slice = remaining.min(COMPUTE_SLICE);
            thread::sleep(slice);
            remaining -= slice;
        }
        call.resolve("42");
    })?;

    Ok(())
}

/// Parse the signed step out of a count payload.
///
/// The page sends a one-element JSON array like `[5]` or `["-3"]`.
/// Bare numbers are accepted too so the binding is easy to poke by
/// hand.
fn parse_direction(payload: &str) -> Result<i64, String> {
    let trimmed = payload.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed)
        .trim();
    let bare = inner
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(inner)
        .trim();
    bare.parse::<i64>()
        .map_err(|_| format!("Could not parse step from payload '{}'", payload))
}

/// Render a handful of demo values into the session transcript.
///
/// Covers each composite shape the stringifier knows: a random matrix
/// with entries scaled into a readable range, a sequence, a pair, and
/// a mapping.
pub fn log_value_showcase(log: &SessionLog) {
    let m = Matrix::random(3, 3).map(|v| ((v + 1.2) * 50.0).round());
    log.info(&format!("m =\n{}", Value::from(m)));

    let v = Value::Seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    log.info(&format!("v =\n{}", v));

    let bounds = Value::pair(0, 100);
    log.info(&format!("bounds =\n{}", bounds));

    let dims = Value::Map(vec![
        (Value::from("rows"), Value::Int(3)),
        (Value::from("cols"), Value::Int(3)),
    ]);
    log.info(&format!("dims =\n{}", dims));
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use fluid_core::bridge::{InvokeOutcome, Request, ResolveStatus, Response};
    use fluid_core::logging::SessionConfig;

    use super::*;

    fn bridge_with_bindings(compute_delay: Duration) -> (CallBridge, mpsc::Receiver<Response>) {
        let (tx, rx) = mpsc::channel();
        let mut bridge = CallBridge::new(Box::new(move |response| {
            let _ = tx.send(response);
        }));
        register_bindings(&mut bridge, compute_delay).unwrap();
        (bridge, rx)
    }

    #[test]
    fn parse_direction_accepts_page_payloads() {
        assert_eq!(parse_direction("[5]"), Ok(5));
        assert_eq!(parse_direction("[-3]"), Ok(-3));
        assert_eq!(parse_direction("[\"7\"]"), Ok(7));
        assert_eq!(parse_direction(" [ 12 ] "), Ok(12));
        assert_eq!(parse_direction("5"), Ok(5));
    }

    #[test]
    fn parse_direction_rejects_garbage() {
        assert!(parse_direction("[]").is_err());
        assert!(parse_direction("[up]").is_err());
        assert!(parse_direction("[5").is_err());
        assert!(parse_direction("").is_err());
    }

    #[test]
    fn counter_steps_accumulate_across_calls() {
        let (bridge, _rx) = bridge_with_bindings(Duration::from_millis(50));

        let first = bridge.invoke(Request::new("count", "1", "[5]")).unwrap();
        assert_eq!(first, InvokeOutcome::Reply("5".to_string()));

        let second = bridge.invoke(Request::new("count", "2", "[-3]")).unwrap();
        assert_eq!(second, InvokeOutcome::Reply("2".to_string()));
    }

    #[test]
    fn counter_rejects_unparseable_steps() {
        let (bridge, _rx) = bridge_with_bindings(Duration::from_millis(50));

        let err = bridge
            .invoke(Request::new("count", "1", "[sideways]"))
            .unwrap_err();
        assert!(err.to_string().contains("count"));
    }

    #[test]
    fn compute_resolves_forty_two() {
        let (bridge, rx) = bridge_with_bindings(Duration::from_millis(80));

        let outcome = bridge.invoke(Request::new("compute", "7", "{}")).unwrap();
        assert_eq!(outcome, InvokeOutcome::Pending);

        let response = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(response.id, "7");
        assert_eq!(response.status, ResolveStatus::Resolved);
        assert_eq!(response.result, "42");
    }

    #[test]
    fn compute_rejects_when_cancelled_mid_sleep() {
        let (bridge, rx) = bridge_with_bindings(Duration::from_secs(30));

        bridge.invoke(Request::new("compute", "9", "{}")).unwrap();
        bridge.cancel_token().cancel();

        let response = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(response.id, "9");
        assert_eq!(response.status, ResolveStatus::Rejected);
        assert!(response.result.contains("cancelled"));
    }

    #[test]
    fn showcase_lands_in_the_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            level: fluid_core::logging::LogLevel::Debug,
            show_timestamps: false,
        };
        let log = SessionLog::new("showcase", dir.path(), config, None).unwrap();

        log_value_showcase(&log);
        log.close();

        let contents = std::fs::read_to_string(log.log_path()).unwrap();
        assert!(contents.contains("m =\n"));
        assert!(contents.contains("v =\n[\n  1,\n  2,\n  3\n]"));
        assert!(contents.contains("bounds =\n(\n  0,\n  100\n)"));
        assert!(contents.contains("dims =\n{\n  rows: 3,\n  cols: 3\n}"));
    }
}
