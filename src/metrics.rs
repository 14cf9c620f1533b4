//! Prometheus metrics for the booking service.
//!
//! [`BookingMetrics`] owns its own [`prometheus::Registry`] instead of a
//! process-global one. It is built once at startup (every series at zero),
//! shared through `Arc`, and lives until the process exits.
//!
//! ## Series
//!
//! - `db_commits_total` - committed booking writes
//! - `db_commit_failures_total` - booking writes that failed and were rolled back
//! - `new_bookings_total` - bookings created
//! - `canceled_bookings_total` - bookings canceled
//! - `total_bookings` - booking count, refreshed when the list is rendered
//! - `requests_by_path{path}` - inbound HTTP requests by raw path
//! - `http_request_duration_seconds{method,route,status}` - request latency

use std::fmt;
use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Request latency buckets in seconds.
const LATENCY_BUCKETS: [f64; 10] = [0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5];

/// Counters and gauges written by the request handlers.
///
/// All primitives are atomic, so one instance can be updated from any
/// number of concurrently handled requests.
#[derive(Clone)]
pub struct BookingMetrics {
    registry: Registry,
    db_commits: IntCounter,
    db_commit_failures: IntCounter,
    new_bookings: IntCounter,
    canceled_bookings: IntCounter,
    total_bookings: IntGauge,
    requests_by_path: IntCounterVec,
    request_duration: HistogramVec,
}

impl BookingMetrics {
    /// Creates a registry with every series registered and at zero.
    ///
    /// # Errors
    ///
    /// Returns a [`prometheus::Error`] if a metric descriptor is invalid or
    /// a name is registered twice.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let db_commits = IntCounter::new("db_commits_total", "Total database commits")?;
        let db_commit_failures = IntCounter::new(
            "db_commit_failures_total",
            "Total database commits that failed and were rolled back",
        )?;
        let new_bookings = IntCounter::new("new_bookings_total", "Total bookings created")?;
        let canceled_bookings =
            IntCounter::new("canceled_bookings_total", "Total bookings canceled")?;
        let total_bookings = IntGauge::new(
            "total_bookings",
            "Bookings currently stored, as of the last booking list render",
        )?;
        let requests_by_path = IntCounterVec::new(
            Opts::new("requests_by_path", "Inbound HTTP requests by path"),
            &["path"],
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency by method, route and status",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
            &["method", "route", "status"],
        )?;

        registry.register(Box::new(db_commits.clone()))?;
        registry.register(Box::new(db_commit_failures.clone()))?;
        registry.register(Box::new(new_bookings.clone()))?;
        registry.register(Box::new(canceled_bookings.clone()))?;
        registry.register(Box::new(total_bookings.clone()))?;
        registry.register(Box::new(requests_by_path.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            registry,
            db_commits,
            db_commit_failures,
            new_bookings,
            canceled_bookings,
            total_bookings,
            requests_by_path,
            request_duration,
        })
    }

    /// Records a successful booking creation: one commit, one new booking.
    pub fn record_booking_created(&self) {
        self.db_commits.inc();
        self.new_bookings.inc();
    }

    /// Records a successful cancellation: one commit, one canceled booking.
    pub fn record_booking_canceled(&self) {
        self.db_commits.inc();
        self.canceled_bookings.inc();
    }

    /// Records a booking write that failed and was rolled back.
    pub fn record_commit_failure(&self) {
        self.db_commit_failures.inc();
    }

    /// Sets the `total_bookings` gauge to a fresh count.
    pub fn set_total_bookings(&self, count: usize) {
        self.total_bookings
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Counts one inbound request and observes its latency.
    ///
    /// `path` is the raw request path; `route` is the matched route
    /// template (e.g. `/hotel/{hotel_id}`), which keeps the histogram's
    /// label set bounded.
    pub fn record_request(
        &self,
        path: &str,
        method: &str,
        route: &str,
        status: u16,
        elapsed: Duration,
    ) {
        let status = status.to_string();
        self.requests_by_path.with_label_values(&[path]).inc();
        self.request_duration
            .with_label_values(&[method, route, status.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    /// Current value of `db_commits_total`.
    #[must_use]
    pub fn db_commits(&self) -> u64 {
        self.db_commits.get()
    }

    /// Current value of `db_commit_failures_total`.
    #[must_use]
    pub fn db_commit_failures(&self) -> u64 {
        self.db_commit_failures.get()
    }

    /// Current value of `new_bookings_total`.
    #[must_use]
    pub fn new_bookings(&self) -> u64 {
        self.new_bookings.get()
    }

    /// Current value of `canceled_bookings_total`.
    #[must_use]
    pub fn canceled_bookings(&self) -> u64 {
        self.canceled_bookings.get()
    }

    /// Current value of the `total_bookings` gauge.
    #[must_use]
    pub fn total_bookings(&self) -> i64 {
        self.total_bookings.get()
    }

    /// Current value of `requests_by_path` for one path.
    #[must_use]
    pub fn requests_for_path(&self, path: &str) -> u64 {
        self.requests_by_path.with_label_values(&[path]).get()
    }

    /// Renders every series in the Prometheus text exposition format.
    ///
    /// Encoding failures are logged and produce an empty body.
    #[must_use]
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = vec![];
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!(error = %e, "failed to encode prometheus metrics");
            return String::new();
        }
        match String::from_utf8(buffer) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "prometheus metrics were not valid UTF-8");
                String::new()
            }
        }
    }
}

impl fmt::Debug for BookingMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingMetrics")
            .field("db_commits", &self.db_commits.get())
            .field("db_commit_failures", &self.db_commit_failures.get())
            .field("new_bookings", &self.new_bookings.get())
            .field("canceled_bookings", &self.canceled_bookings.get())
            .field("total_bookings", &self.total_bookings.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_metrics() -> BookingMetrics {
        let Ok(metrics) = BookingMetrics::new() else {
            panic!("metrics registry should build");
        };
        metrics
    }

    #[test]
    fn starts_at_zero() {
        let m = make_metrics();
        assert_eq!(m.db_commits(), 0);
        assert_eq!(m.db_commit_failures(), 0);
        assert_eq!(m.new_bookings(), 0);
        assert_eq!(m.canceled_bookings(), 0);
        assert_eq!(m.total_bookings(), 0);
        assert_eq!(m.requests_for_path("/"), 0);
    }

    #[test]
    fn booking_events_count_commits() {
        let m = make_metrics();
        m.record_booking_created();
        m.record_booking_created();
        m.record_booking_canceled();
        m.record_commit_failure();

        assert_eq!(m.db_commits(), 3);
        assert_eq!(m.new_bookings(), 2);
        assert_eq!(m.canceled_bookings(), 1);
        assert_eq!(m.db_commit_failures(), 1);
    }

    #[test]
    fn gauge_follows_last_value() {
        let m = make_metrics();
        m.set_total_bookings(4);
        assert_eq!(m.total_bookings(), 4);
        m.set_total_bookings(1);
        assert_eq!(m.total_bookings(), 1);
    }

    #[test]
    fn requests_are_counted_per_path() {
        let m = make_metrics();
        let elapsed = Duration::from_millis(3);
        m.record_request("/hotel/1", "GET", "/hotel/{hotel_id}", 200, elapsed);
        m.record_request("/hotel/1", "POST", "/hotel/{hotel_id}", 303, elapsed);
        m.record_request("/hotel/2", "GET", "/hotel/{hotel_id}", 200, elapsed);

        assert_eq!(m.requests_for_path("/hotel/1"), 2);
        assert_eq!(m.requests_for_path("/hotel/2"), 1);
    }

    #[test]
    fn render_exposes_every_series() {
        let m = make_metrics();
        m.record_booking_created();
        m.set_total_bookings(1);
        m.record_request("/bookings", "GET", "/bookings", 200, Duration::from_millis(1));

        let text = m.render();
        assert!(text.contains("db_commits_total 1"));
        assert!(text.contains("db_commit_failures_total 0"));
        assert!(text.contains("new_bookings_total 1"));
        assert!(text.contains("canceled_bookings_total 0"));
        assert!(text.contains("total_bookings 1"));
        assert!(text.contains("requests_by_path{path=\"/bookings\"} 1"));
        assert!(text.contains("http_request_duration_seconds_bucket"));
    }

    #[test]
    fn instances_do_not_share_state() {
        let a = make_metrics();
        let b = make_metrics();
        a.record_booking_created();
        assert_eq!(a.new_bookings(), 1);
        assert_eq!(b.new_bookings(), 0);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let m = std::sync::Arc::new(make_metrics());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let m = std::sync::Arc::clone(&m);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        m.record_booking_created();
                    }
                })
            })
            .collect();
        for handle in handles {
            if handle.join().is_err() {
                panic!("worker thread panicked");
            }
        }
        assert_eq!(m.new_bookings(), 8_000);
        assert_eq!(m.db_commits(), 8_000);
    }
}
