//! Run-level statistics: sent/error counters and min/avg/max RTT.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Process-lifetime aggregator, created once and mutated additively.
///
/// RTT samples are recorded only for successfully received replies; the
/// caller invokes [`Statistics::record_rtt`] exactly once per reply.
/// Timeouts and transmission failures go through
/// [`Statistics::record_error`] instead, once per probe.
#[derive(Debug, Clone)]
pub struct Statistics {
    started_at: DateTime<Utc>,
    packets_sent: u64,
    packet_errors: u64,
    min_rtt: Duration,
    max_rtt: Duration,
    total_rtt: Duration,
    rtt_samples: u64,
}

impl Statistics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            packets_sent: 0,
            packet_errors: 0,
            min_rtt: Duration::ZERO,
            max_rtt: Duration::ZERO,
            total_rtt: Duration::ZERO,
            rtt_samples: 0,
        }
    }

    pub fn record_sent(&mut self) {
        self.packets_sent += 1;
    }

    pub fn record_error(&mut self) {
        self.packet_errors += 1;
    }

    /// Record one RTT sample. The first sample initializes min and max;
    /// later samples take the running min/max.
    pub fn record_rtt(&mut self, rtt: Duration) {
        if self.rtt_samples == 0 {
            self.min_rtt = rtt;
            self.max_rtt = rtt;
        } else {
            if rtt < self.min_rtt {
                self.min_rtt = rtt;
            }
            if rtt > self.max_rtt {
                self.max_rtt = rtt;
            }
        }
        self.total_rtt += rtt;
        self.rtt_samples += 1;
    }

    #[allow(dead_code)]
    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }

    #[allow(dead_code)]
    pub fn packet_errors(&self) -> u64 {
        self.packet_errors
    }

    #[allow(dead_code)]
    pub fn rtt_samples(&self) -> u64 {
        self.rtt_samples
    }

    /// Final roll-up for the end-of-run report.
    pub fn summary(&self) -> Summary {
        let received = self.packets_sent.saturating_sub(self.packet_errors);
        let loss_pct = if self.packets_sent == 0 {
            0.0
        } else {
            self.packet_errors as f64 / self.packets_sent as f64 * 100.0
        };
        let avg_rtt_ms = if self.rtt_samples == 0 {
            0.0
        } else {
            self.total_rtt.as_secs_f64() * 1000.0 / self.rtt_samples as f64
        };

        Summary {
            started_at: self.started_at,
            sent: self.packets_sent,
            received,
            loss_pct,
            min_rtt_ms: self.min_rtt.as_secs_f64() * 1000.0,
            avg_rtt_ms,
            max_rtt_ms: self.max_rtt.as_secs_f64() * 1000.0,
            rtt_samples: self.rtt_samples,
        }
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Final summary, serializable for the `--json` output mode.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub started_at: DateTime<Utc>,
    pub sent: u64,
    pub received: u64,
    pub loss_pct: f64,
    pub min_rtt_ms: f64,
    pub avg_rtt_ms: f64,
    pub max_rtt_ms: f64,
    pub rtt_samples: u64,
}
