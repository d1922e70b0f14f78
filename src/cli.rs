use clap::Parser;
use std::time::Duration;

/// ICMP Echo ("ping") probe tool with reply validation and RTT statistics
#[derive(Parser, Debug, Clone)]
#[command(name = "pingr")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Target host to ping (IPv4 address or hostname)
    #[arg(required = true)]
    pub host: String,

    /// Number of echo requests to send (0 = until interrupted)
    #[arg(short = 'c', long = "count", default_value = "0")]
    pub count: u64,

    /// Interval between probes in seconds
    #[arg(short = 'i', long = "interval", default_value = "1.0")]
    pub interval: f64,

    /// Time to live for outgoing packets
    #[arg(short = 't', long = "ttl", default_value = "64")]
    pub ttl: u8,

    /// Reply timeout in seconds
    #[arg(short = 'W', long = "timeout", default_value = "30")]
    pub timeout: f64,

    /// Print the built packet in hex and extra diagnostics
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Print the final summary as JSON
    #[arg(long = "json")]
    pub json: bool,
}

impl Args {
    /// Get probe interval as Duration
    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs_f64(self.interval)
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    /// Validate arguments
    pub fn validate(&self) -> Result<(), String> {
        if self.interval <= 0.0 {
            return Err("Interval must be positive".into());
        }

        if self.timeout <= 0.0 {
            return Err("Timeout must be positive".into());
        }

        if self.ttl == 0 {
            return Err("TTL must be at least 1".into());
        }

        Ok(())
    }
}
