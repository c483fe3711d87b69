// SPDX-License-Identifier: MIT
//
// Jitterpool: Blocking Entropy Pool Fed by Network Round-Trip Jitter
//
// https://github.com/yourusername/jitterpool

//! Metrics collection and reporting

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Global metrics collector
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    start_time: Instant,

    // Sampling metrics
    samples_total: AtomicU64,
    samples_failed: AtomicU64,
    rounds_total: AtomicU64,

    // Extraction metrics
    extractions_total: AtomicU64,
    bits_extracted: AtomicU64,
    digests_total: AtomicU64,

    // Probe latency tracking (microseconds)
    probe_latencies: RwLock<Vec<u64>>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                start_time: Instant::now(),
                samples_total: AtomicU64::new(0),
                samples_failed: AtomicU64::new(0),
                rounds_total: AtomicU64::new(0),
                extractions_total: AtomicU64::new(0),
                bits_extracted: AtomicU64::new(0),
                digests_total: AtomicU64::new(0),
                probe_latencies: RwLock::new(Vec::with_capacity(10000)),
            }),
        }
    }

    // Sampling metrics
    pub fn record_sample(&self) {
        self.inner.samples_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sample_failure(&self) {
        self.inner.samples_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_round(&self) {
        self.inner.rounds_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn samples_total(&self) -> u64 {
        self.inner.samples_total.load(Ordering::Relaxed)
    }

    pub fn samples_failed(&self) -> u64 {
        self.inner.samples_failed.load(Ordering::Relaxed)
    }

    pub fn rounds_total(&self) -> u64 {
        self.inner.rounds_total.load(Ordering::Relaxed)
    }

    // Extraction metrics
    pub fn record_extraction(&self, bits: u64) {
        self.inner.extractions_total.fetch_add(1, Ordering::Relaxed);
        self.inner.bits_extracted.fetch_add(bits, Ordering::Relaxed);
    }

    pub fn record_digest(&self) {
        self.inner.digests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn extractions_total(&self) -> u64 {
        self.inner.extractions_total.load(Ordering::Relaxed)
    }

    pub fn bits_extracted(&self) -> u64 {
        self.inner.bits_extracted.load(Ordering::Relaxed)
    }

    pub fn digests_total(&self) -> u64 {
        self.inner.digests_total.load(Ordering::Relaxed)
    }

    // Probe latency tracking
    pub fn record_probe(&self, latency_micros: u64) {
        let mut latencies = self.inner.probe_latencies.write();
        latencies.push(latency_micros);
        if latencies.len() > 10000 {
            latencies.drain(0..5000);
        }
    }

    // Derived metrics
    pub fn uptime_seconds(&self) -> u64 {
        self.inner.start_time.elapsed().as_secs()
    }

    pub fn latency_percentile(&self, percentile: f64) -> Option<u64> {
        let latencies = self.inner.probe_latencies.read();
        if latencies.is_empty() {
            return None;
        }

        let mut sorted = latencies.clone();
        sorted.sort_unstable();
        let index = ((sorted.len() as f64 * percentile).ceil() as usize).min(sorted.len() - 1);
        Some(sorted[index])
    }

    pub fn latency_p50(&self) -> Option<u64> {
        self.latency_percentile(0.50)
    }

    pub fn latency_p95(&self) -> Option<u64> {
        self.latency_percentile(0.95)
    }

    pub fn latency_p99(&self) -> Option<u64> {
        self.latency_percentile(0.99)
    }

    /// Generate Prometheus-compatible metrics output
    pub fn prometheus_format(&self) -> String {
        let mut output = String::new();

        output.push_str("# HELP jitterpool_samples_total Total successful jitter samples\n");
        output.push_str("# TYPE jitterpool_samples_total counter\n");
        output.push_str(&format!("jitterpool_samples_total {}\n", self.samples_total()));

        output.push_str("# HELP jitterpool_samples_failed Total failed probe attempts\n");
        output.push_str("# TYPE jitterpool_samples_failed counter\n");
        output.push_str(&format!("jitterpool_samples_failed {}\n", self.samples_failed()));

        output.push_str("# HELP jitterpool_rounds_total Total accumulation rounds mixed\n");
        output.push_str("# TYPE jitterpool_rounds_total counter\n");
        output.push_str(&format!("jitterpool_rounds_total {}\n", self.rounds_total()));

        output.push_str("# HELP jitterpool_bits_extracted Total pool bits drawn by callers\n");
        output.push_str("# TYPE jitterpool_bits_extracted counter\n");
        output.push_str(&format!("jitterpool_bits_extracted {}\n", self.bits_extracted()));

        output.push_str("# HELP jitterpool_digests_total Total whitened digests emitted\n");
        output.push_str("# TYPE jitterpool_digests_total counter\n");
        output.push_str(&format!("jitterpool_digests_total {}\n", self.digests_total()));

        output.push_str("# HELP jitterpool_uptime_seconds Process uptime in seconds\n");
        output.push_str("# TYPE jitterpool_uptime_seconds gauge\n");
        output.push_str(&format!("jitterpool_uptime_seconds {}\n", self.uptime_seconds()));

        if let Some(p50) = self.latency_p50() {
            output.push_str("# HELP jitterpool_probe_latency_p50_microseconds Probe latency 50th percentile\n");
            output.push_str("# TYPE jitterpool_probe_latency_p50_microseconds gauge\n");
            output.push_str(&format!("jitterpool_probe_latency_p50_microseconds {}\n", p50));
        }

        if let Some(p99) = self.latency_p99() {
            output.push_str("# HELP jitterpool_probe_latency_p99_microseconds Probe latency 99th percentile\n");
            output.push_str("# TYPE jitterpool_probe_latency_p99_microseconds gauge\n");
            output.push_str(&format!("jitterpool_probe_latency_p99_microseconds {}\n", p99));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.record_sample();
        metrics.record_sample();
        metrics.record_sample_failure();
        metrics.record_round();
        metrics.record_extraction(160);
        metrics.record_extraction(32);
        metrics.record_digest();

        assert_eq!(metrics.samples_total(), 2);
        assert_eq!(metrics.samples_failed(), 1);
        assert_eq!(metrics.rounds_total(), 1);
        assert_eq!(metrics.extractions_total(), 2);
        assert_eq!(metrics.bits_extracted(), 192);
        assert_eq!(metrics.digests_total(), 1);
    }

    #[test]
    fn test_latency_percentiles() {
        let metrics = Metrics::new();

        for i in 1..=100 {
            metrics.record_probe(i);
        }

        let p50 = metrics.latency_p50().unwrap();
        assert!((45..=55).contains(&p50));

        let p99 = metrics.latency_p99().unwrap();
        assert!((95..=100).contains(&p99));
    }

    #[test]
    fn test_percentile_empty() {
        let metrics = Metrics::new();
        assert_eq!(metrics.latency_p50(), None);
    }

    #[test]
    fn test_prometheus_format() {
        let metrics = Metrics::new();
        metrics.record_sample();
        let text = metrics.prometheus_format();
        assert!(text.contains("jitterpool_samples_total 1"));
        assert!(text.contains("# TYPE jitterpool_uptime_seconds gauge"));
    }
}
