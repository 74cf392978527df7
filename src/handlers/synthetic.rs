//! Deterministic fault and delay endpoints.
//! Used by: server.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::outcome::RequestScope;
use crate::state::AppState;
use crate::telemetry::SummaryKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    Latency,
    TwoSeconds,
    FiveSeconds,
    Short,
}

impl Delay {
    pub fn duration(self) -> Duration {
        match self {
            Delay::Latency => Duration::from_secs(1),
            Delay::TwoSeconds => Duration::from_secs(2),
            Delay::FiveSeconds => Duration::from_secs(5),
            Delay::Short => Duration::from_millis(200),
        }
    }

    fn message(self) -> &'static str {
        match self {
            Delay::Latency => "Latency endpoint",
            Delay::TwoSeconds => "End after 2sec",
            Delay::FiveSeconds => "End after 5sec",
            Delay::Short => "End after 20ms",
        }
    }

    fn summary(self) -> Option<SummaryKind> {
        match self {
            Delay::Latency => None,
            Delay::TwoSeconds => Some(SummaryKind::TwoSeconds),
            Delay::FiveSeconds => Some(SummaryKind::FiveSeconds),
            Delay::Short => Some(SummaryKind::Short),
        }
    }

    fn settle(self, scope: RequestScope, elapsed: Duration) -> Response {
        match self {
            // Reports latency but never pass.
            Delay::Latency => {
                scope.observe_only(elapsed);
                self.message().into_response()
            }
            _ => {
                scope.pass_timed(elapsed, self.summary());
                (StatusCode::OK, Json(json!({ "message": self.message() }))).into_response()
            }
        }
    }
}

/// Sleeps on a detached task that owns the request scope, so the outcome is
/// recorded even if the client goes away mid-delay.
async fn delayed(state: AppState, delay: Delay) -> Result<Response> {
    let scope = RequestScope::begin(&state.metrics);
    let task = tokio::spawn(async move {
        let start = Instant::now();
        tokio::time::sleep(delay.duration()).await;
        let elapsed = start.elapsed();
        delay.settle(scope, elapsed)
    });
    task.await.map_err(|e| {
        tracing::error!(error = %e, ?delay, "delay task failed");
        Error::DelayInterrupted(e.to_string())
    })
}

pub async fn error(State(state): State<AppState>) -> Error {
    RequestScope::begin(&state.metrics).fail(Error::Simulated)
}

pub async fn latency(State(state): State<AppState>) -> Result<Response> {
    delayed(state, Delay::Latency).await
}

pub async fn timeout(State(state): State<AppState>) -> Result<Response> {
    delayed(state, Delay::TwoSeconds).await
}

pub async fn timeout5(State(state): State<AppState>) -> Result<Response> {
    delayed(state, Delay::FiveSeconds).await
}

pub async fn mstimeout(State(state): State<AppState>) -> Result<Response> {
    delayed(state, Delay::Short).await
}
