//! Per-probe driver: send, classify the outcome, update statistics.

use anyhow::Result;
use pnet::packet::icmp::IcmpTypes;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::config::Config;
use crate::icmp::classify::icmp_message;
use crate::icmp::packet::EchoRequest;
use crate::icmp::reply::{self, EchoReply, Validation};
use crate::probe::transport::{self, Outcome};
use crate::stats::Statistics;

/// Terminal outcome of one probe, reported to orchestration for printing.
///
/// Each probe ends in exactly one of these states; none re-enters the
/// send path.
#[derive(Debug)]
pub enum ProbeReport {
    /// An Echo Reply was decoded; validation flags may still be false.
    Reply {
        reply: EchoReply,
        validation: Validation,
        from: IpAddr,
        rtt: Duration,
    },
    /// A classified Destination Unreachable / Time Exceeded reply.
    IcmpError {
        icmp_type: u8,
        icmp_code: u8,
        message: &'static str,
        from: IpAddr,
    },
    /// A reply of a type this engine does not handle.
    UnknownType { icmp_type: u8, from: IpAddr },
    /// No reply within the timeout.
    TimedOut,
    /// Transmission-layer failure or undecodable reply.
    Failed(String),
}

/// Run one probe end to end.
///
/// Counts the send, performs the scoped send/receive, and classifies the
/// result. `Err` is reserved for the fatal privilege condition; every
/// per-probe failure comes back as a [`ProbeReport`].
pub fn run_probe(
    request: &EchoRequest,
    target: Ipv4Addr,
    config: &Config,
    stats: &mut Statistics,
) -> Result<ProbeReport> {
    stats.record_sent();
    let outcome = transport::send_and_receive(request, target, config.ttl, config.timeout)?;
    Ok(report_outcome(request, outcome, stats))
}

/// Classify a transport outcome and apply its statistics effects.
///
/// This is the single authoritative RTT recording point: one
/// `record_rtt` per successfully received reply — Echo Replies whether
/// or not they validate, and classified error replies, which are
/// protocol-valid outcomes rather than errors. Timeouts, transmission
/// failures, and undecodable replies count as errors instead; replies of
/// unknown type are reported but affect neither counter.
pub fn report_outcome(
    request: &EchoRequest,
    outcome: Outcome,
    stats: &mut Statistics,
) -> ProbeReport {
    match outcome {
        Outcome::TimedOut => {
            stats.record_error();
            ProbeReport::TimedOut
        }
        Outcome::Failed(reason) => {
            stats.record_error();
            ProbeReport::Failed(reason)
        }
        Outcome::Replied { data, from, rtt } => {
            let Some((icmp_type, icmp_code)) = reply::icmp_type_and_code(&data) else {
                stats.record_error();
                return ProbeReport::Failed(format!("reply too short ({} bytes)", data.len()));
            };

            match icmp_type {
                IcmpTypes::EchoReply => match EchoReply::parse(&data) {
                    Ok(echo) => {
                        stats.record_rtt(rtt);
                        let validation = echo.validate(request);
                        ProbeReport::Reply {
                            reply: echo,
                            validation,
                            from,
                            rtt,
                        }
                    }
                    Err(e) => {
                        stats.record_error();
                        ProbeReport::Failed(format!("undecodable reply: {:#}", e))
                    }
                },
                IcmpTypes::DestinationUnreachable | IcmpTypes::TimeExceeded => {
                    stats.record_rtt(rtt);
                    ProbeReport::IcmpError {
                        icmp_type: icmp_type.0,
                        icmp_code: icmp_code.0,
                        message: icmp_message(icmp_type, icmp_code),
                        from,
                    }
                }
                other => ProbeReport::UnknownType {
                    icmp_type: other.0,
                    from,
                },
            }
        }
    }
}
