//! Metrics registry for the server.
//!
//! `Counter` and `Gauge` are single atomics; `CounterVec` keys atomics by
//! label sets backed by `DashMap`. Labels are flattened into sorted key vectors and
//! rendered in sorted order to keep the output deterministic.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const METRICS_HANDLER_REQUESTS_TOTAL: &str = "promhttp_metric_handler_requests_total";
pub const METRICS_HANDLER_REQUESTS_IN_FLIGHT: &str = "promhttp_metric_handler_requests_in_flight";
pub const PROCESS_START_TIME_SECONDS: &str = "process_start_time_seconds";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

fn write_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(help));
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

/// Unlabelled monotonic counter.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Increment by 1.
    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, v: u64) {
        self.value.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "counter");
        let _ = writeln!(out, "{} {}", name, self.get());
    }
}

/// Unlabelled gauge.
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicI64,
}

impl Gauge {
    pub fn inc(&self) {
        self.add(1);
    }

    pub fn dec(&self) {
        self.add(-1);
    }

    pub fn add(&self, v: i64) {
        self.value.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "gauge");
        let _ = writeln!(out, "{} {}", name, self.get());
    }
}

/// Holds a gauge raised until dropped.
pub struct InFlight<'a> {
    gauge: &'a Gauge,
}

impl<'a> InFlight<'a> {
    fn enter(gauge: &'a Gauge) -> Self {
        gauge.inc();
        Self { gauge }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    fn key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut key: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();
        key
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(Self::key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Make a series visible at 0 before its first increment.
    pub fn touch(&self, labels: &[(&str, &str)]) {
        self.add(labels, 0);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> Option<u64> {
        self.map
            .get(&Self::key(labels))
            .map(|c| c.load(Ordering::Relaxed))
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "counter");
        let mut rows: Vec<(Vec<(String, String)>, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (key, val) in rows {
            let label_str = key
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                .collect::<Vec<_>>()
                .join(",");
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str, val);
        }
    }
}

/// Everything `/metrics` exposes.
pub struct ServerMetrics {
    /// Requests served by the root and readiness handlers.
    pub http_requests: Counter,
    /// Scrapes served by the metrics handler, by status code.
    pub metrics_handler_requests: CounterVec,
    /// Scrapes currently being served.
    pub metrics_handler_in_flight: Gauge,
    process_start_time_seconds: f64,
}

impl ServerMetrics {
    pub fn new(started: SystemTime) -> Self {
        let metrics_handler_requests = CounterVec::default();
        for code in ["200", "500", "503"] {
            metrics_handler_requests.touch(&[("code", code)]);
        }
        // A clock set before the epoch reports 0.
        let process_start_time_seconds = started
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Self {
            http_requests: Counter::default(),
            metrics_handler_requests,
            metrics_handler_in_flight: Gauge::default(),
            process_start_time_seconds,
        }
    }

    /// Mark a scrape as in flight for the lifetime of the returned guard.
    pub fn scrape_in_flight(&self) -> InFlight<'_> {
        InFlight::enter(&self.metrics_handler_in_flight)
    }

    pub fn process_start_time_seconds(&self) -> f64 {
        self.process_start_time_seconds
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.http_requests.render(
            HTTP_REQUESTS_TOTAL,
            "Total number of http requests.",
            &mut out,
        );
        self.metrics_handler_requests.render(
            METRICS_HANDLER_REQUESTS_TOTAL,
            "Total number of scrapes by HTTP status code.",
            &mut out,
        );
        self.metrics_handler_in_flight.render(
            METRICS_HANDLER_REQUESTS_IN_FLIGHT,
            "Current number of scrapes being served.",
            &mut out,
        );
        write_header(
            &mut out,
            PROCESS_START_TIME_SECONDS,
            "Start time of the process since unix epoch in seconds.",
            "gauge",
        );
        let _ = writeln!(
            out,
            "{} {}",
            PROCESS_START_TIME_SECONDS, self.process_start_time_seconds
        );
        out
    }
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new(SystemTime::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn counter_renders_help_type_and_value() {
        let m = ServerMetrics::new(UNIX_EPOCH + Duration::from_millis(1_700_000_000_500));
        m.http_requests.inc();
        m.http_requests.inc();
        let out = m.render();

        assert!(out.contains("# HELP http_requests_total Total number of http requests.\n"));
        assert!(out.contains("# TYPE http_requests_total counter\n"));
        assert!(out.contains("\nhttp_requests_total 2\n"));
        assert!(out.contains("# TYPE process_start_time_seconds gauge\n"));
        assert!(out.contains("process_start_time_seconds 1700000000.5\n"));
    }

    #[test]
    fn scrape_counter_is_preregistered_at_zero() {
        let m = ServerMetrics::default();
        let out = m.render();
        assert!(out.contains("promhttp_metric_handler_requests_total{code=\"200\"} 0\n"));
        assert!(out.contains("promhttp_metric_handler_requests_total{code=\"500\"} 0\n"));
        assert!(out.contains("promhttp_metric_handler_requests_total{code=\"503\"} 0\n"));
        assert!(out.contains("# TYPE promhttp_metric_handler_requests_in_flight gauge\n"));
        assert!(out.contains("promhttp_metric_handler_requests_in_flight 0\n"));
    }

    #[test]
    fn in_flight_guard_raises_and_lowers_gauge() {
        let m = ServerMetrics::default();
        {
            let _outer = m.scrape_in_flight();
            let _inner = m.scrape_in_flight();
            assert_eq!(m.metrics_handler_in_flight.get(), 2);
            assert!(m
                .render()
                .contains("\npromhttp_metric_handler_requests_in_flight 2\n"));
        }
        assert_eq!(m.metrics_handler_in_flight.get(), 0);
    }

    #[test]
    fn counter_vec_sorts_labels_and_rows() {
        let v = CounterVec::default();
        v.inc(&[("method", "GET"), ("code", "200")]);
        v.inc(&[("code", "200"), ("method", "GET")]);
        v.inc(&[("code", "404"), ("method", "GET")]);
        assert_eq!(v.get(&[("method", "GET"), ("code", "200")]), Some(2));
        assert_eq!(v.get(&[("code", "500")]), None);

        let mut out = String::new();
        v.render("x_total", "x", &mut out);
        let rows: Vec<&str> = out.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(
            rows,
            vec![
                "x_total{code=\"200\",method=\"GET\"} 2",
                "x_total{code=\"404\",method=\"GET\"} 1",
            ]
        );
    }

    #[test]
    fn label_values_are_escaped() {
        let v = CounterVec::default();
        v.inc(&[("path", "a\"b\\c\n")]);
        let mut out = String::new();
        v.render("p_total", "line one\nline two", &mut out);
        assert!(out.contains("# HELP p_total line one\\nline two\n"));
        assert!(out.contains("p_total{path=\"a\\\"b\\\\c\\n\"} 1\n"));
    }

    #[test]
    fn pre_epoch_start_renders_zero() {
        let m = ServerMetrics::new(UNIX_EPOCH - Duration::from_secs(10));
        assert_eq!(m.process_start_time_seconds(), 0.0);
    }
}
