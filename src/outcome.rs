//! Per-request outcome classification.
//! Used by: handlers.
//!
//! Every instrumented request opens a [`RequestScope`], which bumps the request
//! counter, and settles it exactly once on the pass or error path. A scope that
//! is dropped unsettled (panic, aborted task) is counted as an error.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Error;
use crate::telemetry::{Metrics, SummaryKind};

#[must_use = "a request scope must be settled as pass or error"]
pub struct RequestScope {
    metrics: Arc<Metrics>,
    settled: bool,
}

impl RequestScope {
    pub fn begin(metrics: &Arc<Metrics>) -> Self {
        let n = metrics.record_request();
        if n % 1000 == 0 {
            tracing::warn!(count = n, "high request volume");
        }
        Self {
            metrics: Arc::clone(metrics),
            settled: false,
        }
    }

    pub fn pass(mut self) {
        self.settled = true;
        self.metrics.pass_rate.inc();
    }

    /// Pass path for a timed synthetic delay.
    pub fn pass_timed(mut self, elapsed: Duration, summary: Option<SummaryKind>) {
        self.settled = true;
        self.metrics.observe_latency(elapsed);
        if let Some(kind) = summary {
            self.metrics.summary(kind).observe(elapsed.as_secs_f64());
        }
        self.metrics.pass_rate.inc();
    }

    /// Records the latency sample without reporting pass. Only `/latency` ends this way.
    pub fn observe_only(mut self, elapsed: Duration) {
        self.settled = true;
        self.metrics.observe_latency(elapsed);
    }

    pub fn fail(mut self, err: Error) -> Error {
        self.settled = true;
        self.metrics.error_rate.inc();
        tracing::debug!(error = %err, status = %err.status(), "request failed");
        err
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        if !self.settled {
            self.metrics.error_rate.inc();
            tracing::warn!("request ended without an outcome, counted as error");
        }
    }
}
