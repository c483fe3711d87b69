//! Jitter source contract and the ping probe adapter
//!
//! The pool treats the round-trip latency of an external network probe as an
//! opaque noise process with unknown, assumed-nonzero entropy. A probe failure
//! is signalled distinctly from a zero-latency sample so the pool can skip the
//! attempt instead of folding in fabricated bits.

use crate::{metrics::Metrics, Error, Result, LATENCY_SCALE};
use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::debug;

/// A source of timing jitter samples.
///
/// One call performs one measurement and converts it to a non-negative
/// integer. Implementations report failure through `Err` rather than
/// returning a made-up value; the pool treats a failed call as "no bits
/// contributed this attempt".
pub trait JitterSource: Send {
    /// Take one measurement.
    fn sample(&mut self) -> Result<u64>;
}

/// Configuration for the ping probe
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Host to probe for round-trip jitter
    pub host: String,
    /// Per-probe timeout
    pub timeout: Duration,
}

impl ProbeConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            timeout: Duration::from_secs(2),
        }
    }
}

/// Jitter source backed by the system `ping` utility.
///
/// Each sample spawns `ping -c 1 <host>`, parses the `time=` field of the
/// reply line, and scales the millisecond value by [`LATENCY_SCALE`] with
/// truncation. Spawn failures, non-zero exits, and unparseable output all
/// map to [`Error::Source`].
pub struct PingProbe {
    config: ProbeConfig,
    metrics: Metrics,
}

impl PingProbe {
    pub fn new(config: ProbeConfig, metrics: Metrics) -> Self {
        Self { config, metrics }
    }

    /// Probe once and return the round-trip time in milliseconds.
    fn ping_once(&self) -> Result<f64> {
        // -W takes whole seconds on iputils ping
        let timeout_secs = self.config.timeout.as_secs().max(1);

        let output = Command::new("ping")
            .arg("-c")
            .arg("1")
            .arg("-W")
            .arg(timeout_secs.to_string())
            .arg(&self.config.host)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| Error::Source(format!("failed to spawn ping: {}", e)))?;

        if !output.status.success() {
            return Err(Error::Source(format!(
                "ping exited with status {}",
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_latency_ms(&stdout)
            .ok_or_else(|| Error::Source("no latency field in ping output".to_string()))
    }
}

impl JitterSource for PingProbe {
    fn sample(&mut self) -> Result<u64> {
        let ms = self.ping_once()?;
        self.metrics.record_probe((ms * 1000.0) as u64);
        debug!(host = %self.config.host, latency_ms = ms, "probe round trip");
        Ok(scale_latency(ms))
    }
}

/// Extract the round-trip time in milliseconds from `ping` output.
///
/// Handles the `time=<float> ms` field emitted by iputils, BSD/macOS, and
/// BusyBox ping. Returns `None` when no parseable field is present.
pub fn parse_latency_ms(output: &str) -> Option<f64> {
    for line in output.lines() {
        if let Some(idx) = line.find("time=") {
            let rest = &line[idx + "time=".len()..];
            let token = match rest.split_whitespace().next() {
                Some(token) => token,
                None => continue,
            };
            if let Ok(value) = token.parse::<f64>() {
                if value.is_finite() && value >= 0.0 {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// Scale a millisecond latency to a pool sample, truncating to an integer.
pub fn scale_latency(ms: f64) -> u64 {
    (ms * LATENCY_SCALE).max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPUTILS_REPLY: &str = "\
PING google.com (142.250.74.78) 56(84) bytes of data.
64 bytes from arn09s22-in-f14.1e100.net (142.250.74.78): icmp_seq=1 ttl=115 time=23.4 ms

--- google.com ping statistics ---
1 packets transmitted, 1 received, 0% packet loss, time 0ms
rtt min/avg/max/mdev = 23.415/23.415/23.415/0.000 ms";

    const MACOS_REPLY: &str = "\
PING google.com (142.250.74.78): 56 data bytes
64 bytes from 142.250.74.78: icmp_seq=0 ttl=115 time=18.976 ms

--- google.com ping statistics ---
1 packets transmitted, 1 packets received, 0.0% packet loss
round-trip min/avg/max/stddev = 18.976/18.976/18.976/0.000 ms";

    const BUSYBOX_REPLY: &str = "\
PING google.com (142.250.74.78): 56 data bytes
64 bytes from 142.250.74.78: seq=0 ttl=115 time=10.726 ms

--- google.com ping statistics ---
1 packets transmitted, 1 packets received, 0% packet loss";

    #[test]
    fn test_parse_iputils() {
        assert_eq!(parse_latency_ms(IPUTILS_REPLY), Some(23.4));
    }

    #[test]
    fn test_parse_macos() {
        assert_eq!(parse_latency_ms(MACOS_REPLY), Some(18.976));
    }

    #[test]
    fn test_parse_busybox() {
        assert_eq!(parse_latency_ms(BUSYBOX_REPLY), Some(10.726));
    }

    #[test]
    fn test_parse_no_reply() {
        let output = "\
PING nosuchhost.invalid (10.0.0.1) 56(84) bytes of data.

--- nosuchhost.invalid ping statistics ---
1 packets transmitted, 0 received, 100% packet loss, time 0ms";
        assert_eq!(parse_latency_ms(output), None);
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_latency_ms("not ping output at all"), None);
        assert_eq!(parse_latency_ms(""), None);
        assert_eq!(parse_latency_ms("time=not-a-number ms"), None);
    }

    #[test]
    fn test_scale_truncates() {
        assert_eq!(scale_latency(23.45), 234);
        assert_eq!(scale_latency(0.09), 0);
        assert_eq!(scale_latency(0.1), 1);
        assert_eq!(scale_latency(0.0), 0);
        assert_eq!(scale_latency(1500.0), 15000);
    }
}
