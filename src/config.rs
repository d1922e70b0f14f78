use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cli::Args;

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of probes to send (None = until interrupted)
    pub count: Option<u64>,
    /// Interval between probes
    #[serde(with = "duration_serde")]
    pub interval: Duration,
    /// Reply timeout
    #[serde(with = "duration_serde")]
    pub timeout: Duration,
    /// Time to live for outgoing packets
    pub ttl: u8,
    /// Extra diagnostics (hex dumps, checksum warnings)
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: None,
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
            ttl: 64,
            debug: false,
        }
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            count: if args.count == 0 {
                None
            } else {
                Some(args.count)
            },
            interval: args.interval_duration(),
            timeout: args.timeout_duration(),
            ttl: args.ttl,
            debug: args.debug,
        }
    }
}

/// Serde helper for Duration
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}
