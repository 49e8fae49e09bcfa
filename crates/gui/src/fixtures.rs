//! Factory functions and fakes for tests.
//!
//! Provides a recording [`Submitter`] and point lists for drawing trails
//! through the [`TestHarness`](crate::harness::TestHarness).

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde_json::Value;
use shared::LogResponse;

use crate::transport::{SubmitError, Submitter};

// ── Submitter fake ──────────────────────────────────────────────

/// Records every `log` call and answers success unless told to fail.
#[derive(Debug, Default)]
pub struct RecordingSubmitter {
    calls: Mutex<Vec<(String, Value)>>,
    fail: AtomicBool,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A submitter whose every call fails with 503
    pub fn failing() -> Self {
        let s = Self::default();
        s.set_failing(true);
        s
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// All calls so far, failed ones included
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Payloads sent to `table`
    pub fn payloads(&self, table: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|(t, _)| t == table)
            .map(|(_, p)| p)
            .collect()
    }
}

impl Submitter for RecordingSubmitter {
    fn log(
        &self,
        table: &str,
        payload: Value,
    ) -> impl Future<Output = Result<LogResponse, SubmitError>> + Send {
        let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.push((table.to_string(), payload));
        let result = if self.fail.load(Ordering::SeqCst) {
            Err(SubmitError::Status {
                status: 503,
                body: "backend unavailable".to_string(),
            })
        } else {
            Ok(LogResponse {
                id: calls.len().to_string(),
                table: table.to_string(),
            })
        };
        drop(calls);
        async move { result }
    }
}

// ── Point factories ─────────────────────────────────────────────

/// `n` points along +x, `spacing` apart, starting at `origin`
pub fn straight_line(origin: (f64, f64), n: usize, spacing: f64) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| (origin.0 + i as f64 * spacing, origin.1))
        .collect()
}

/// `n` points alternating between `origin.1` and `origin.1 + spacing`
pub fn zigzag(origin: (f64, f64), n: usize, spacing: f64) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let dy = if i % 2 == 0 { 0.0 } else { spacing };
            (origin.0 + i as f64 * spacing, origin.1 + dy)
        })
        .collect()
}

/// Three points forming a right angle: 3-4-5 scaled by `scale`
pub fn right_angle(origin: (f64, f64), scale: f64) -> Vec<(f64, f64)> {
    vec![
        origin,
        (origin.0 + 3.0 * scale, origin.1),
        (origin.0 + 3.0 * scale, origin.1 + 4.0 * scale),
    ]
}
