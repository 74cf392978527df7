//! Metric instruments and Prometheus text exposition.
//! Used by: state, outcome, handlers::metrics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use prometheus::core::{Collector, Desc};
use prometheus::proto::{self, MetricFamily, MetricType};
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

use crate::error::{Error, Result};

pub const LATENCY_BUCKETS: [f64; 6] = [0.5, 1.0, 2.0, 3.0, 5.0, 10.0];

/// Which auxiliary summary a synthetic delay feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Short,
    TwoSeconds,
    FiveSeconds,
}

/// Count and sum of observed latencies, exposed as a quantile-less summary.
#[derive(Clone)]
pub struct LatencySummary {
    inner: Arc<SummaryCore>,
}

struct SummaryCore {
    desc: Desc,
    state: Mutex<SummaryState>,
}

#[derive(Default, Clone, Copy)]
struct SummaryState {
    count: u64,
    sum: f64,
}

impl LatencySummary {
    pub fn new(name: &str, help: &str) -> Result<Self> {
        let desc = Desc::new(name.into(), help.into(), Vec::new(), HashMap::new())?;
        Ok(Self {
            inner: Arc::new(SummaryCore {
                desc,
                state: Mutex::new(SummaryState::default()),
            }),
        })
    }

    pub fn observe(&self, seconds: f64) {
        let mut state = self.lock();
        state.count += 1;
        state.sum += seconds;
    }

    #[cfg(test)]
    pub fn count(&self) -> u64 {
        self.lock().count
    }

    #[cfg(test)]
    pub fn sum(&self) -> f64 {
        self.lock().sum
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SummaryState> {
        // Count and sum are updated together, so a poisoned guard still holds a whole sample.
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Collector for LatencySummary {
    fn desc(&self) -> Vec<&Desc> {
        vec![&self.inner.desc]
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let state = *self.lock();

        let mut summary = proto::Summary::default();
        summary.set_sample_count(state.count);
        summary.set_sample_sum(state.sum);

        let mut metric = proto::Metric::default();
        metric.set_summary(summary);

        let mut family = MetricFamily::default();
        family.set_name(self.inner.desc.fq_name.clone());
        family.set_help(self.inner.desc.help.clone());
        family.set_field_type(MetricType::SUMMARY);
        family.set_metric(vec![metric].into());
        vec![family]
    }
}

/// Process-lifetime instruments backed by an owned registry.
///
/// Each `Metrics` carries its own `Registry`, so tests get a clean slate by
/// building a new one instead of resetting shared state. The registry guards
/// name uniqueness; `collectors` keeps registration order for export.
pub struct Metrics {
    registry: Registry,
    collectors: RwLock<Vec<Box<dyn Collector>>>,
    requests_seen: AtomicU64,
    pub request_count: IntCounter,
    pub pass_rate: IntCounter,
    pub error_rate: IntCounter,
    pub request_latency: Histogram,
    latency_short: LatencySummary,
    latency_two_seconds: LatencySummary,
    latency_five_seconds: LatencySummary,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let request_count = IntCounter::new("request_count_total", "Total number of HTTP requests")?;
        let pass_rate = IntCounter::new("pass_rate_total", "Total number of successful requests")?;
        let error_rate = IntCounter::new("error_rate_total", "Total number of errors")?;
        let request_latency = Histogram::with_opts(
            HistogramOpts::new(
                "request_latency_seconds",
                "Latency of HTTP requests in seconds",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
        )?;
        let latency_short = LatencySummary::new(
            "request_latency2ms_seconds",
            "Latency of HTTP method in seconds",
        )?;
        let latency_two_seconds = LatencySummary::new(
            "request_latency2s_seconds",
            "Latency of HTTP method in seconds",
        )?;
        let latency_five_seconds = LatencySummary::new(
            "request_latency5s_seconds",
            "Latency of HTTP method in seconds",
        )?;

        let metrics = Self {
            registry: Registry::new(),
            collectors: RwLock::new(Vec::new()),
            requests_seen: AtomicU64::new(0),
            request_count,
            pass_rate,
            error_rate,
            request_latency,
            latency_short,
            latency_two_seconds,
            latency_five_seconds,
        };

        metrics.register(metrics.latency_short.clone())?;
        metrics.register(metrics.request_latency.clone())?;
        metrics.register(metrics.latency_two_seconds.clone())?;
        metrics.register(metrics.latency_five_seconds.clone())?;
        metrics.register(metrics.request_count.clone())?;
        metrics.register(metrics.pass_rate.clone())?;
        metrics.register(metrics.error_rate.clone())?;

        Ok(metrics)
    }

    /// Adds an instrument to the registry. Fails if its name is taken.
    pub fn register<C>(&self, collector: C) -> Result<()>
    where
        C: Collector + Clone + 'static,
    {
        let name = collector
            .desc()
            .first()
            .map(|d| d.fq_name.clone())
            .unwrap_or_default();
        self.registry
            .register(Box::new(collector.clone()))
            .map_err(|e| match e {
                prometheus::Error::AlreadyReg => Error::DuplicateMetric(name),
                other => Error::Metrics(other),
            })?;
        self.collectors
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(collector));
        Ok(())
    }

    /// Bumps the request counter and returns this request's ordinal.
    pub fn record_request(&self) -> u64 {
        self.request_count.inc();
        self.requests_seen.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn summary(&self, kind: SummaryKind) -> &LatencySummary {
        match kind {
            SummaryKind::Short => &self.latency_short,
            SummaryKind::TwoSeconds => &self.latency_two_seconds,
            SummaryKind::FiveSeconds => &self.latency_five_seconds,
        }
    }

    pub fn observe_latency(&self, elapsed: Duration) {
        self.request_latency.observe(elapsed.as_secs_f64());
    }

    /// Renders every registered instrument in the text exposition format,
    /// in registration order.
    pub fn export(&self) -> Result<String> {
        let families: Vec<MetricFamily> = self
            .collectors
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .flat_map(|c| c.collect())
            .collect();
        let mut buf = Vec::new();
        TextEncoder::new().encode(&families, &mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::Metrics(prometheus::Error::Msg(e.to_string())))
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            request_count: self.request_count.get(),
            pass_rate: self.pass_rate.get(),
            error_rate: self.error_rate.get(),
            latency_count: self.request_latency.get_sample_count(),
            latency_sum: self.request_latency.get_sample_sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub request_count: u64,
    pub pass_rate: u64,
    pub error_rate: u64,
    pub latency_count: u64,
    pub latency_sum: f64,
}
