use anyhow::{Context, Result};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

mod cli;
mod config;
mod icmp;
mod probe;
mod stats;

use cli::Args;
use config::Config;
use icmp::packet::EchoRequest;
use icmp::wire::{ECHO_PAYLOAD, TIMESTAMP_SIZE};
use probe::{ProbeReport, check_permissions, run_probe};
use stats::Statistics;

fn main() -> Result<()> {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let config = Config::from(&args);

    // Check permissions early - without raw sockets no probe can succeed
    if let Err(e) = check_permissions() {
        eprintln!("{}", e);
        process::exit(1);
    }

    // Resolve the target; failure here is fatal
    let target = match resolve_target(&args.host) {
        Ok(ip) => ip,
        Err(e) => {
            eprintln!("pingr: unknown host {}: {:#}", args.host, e);
            process::exit(1);
        }
    };

    // Cooperative stop flag, observed between probes only
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to install Ctrl-C handler")?;

    println!(
        "PING {} ({}): {} data bytes",
        args.host,
        target,
        TIMESTAMP_SIZE + ECHO_PAYLOAD.len()
    );

    // Identifier distinguishes this process's probes from other pings
    let identifier = (process::id() & 0xFFFF) as u16;
    let mut stats = Statistics::new();
    let mut sequence: u16 = 0;
    let mut sent: u64 = 0;

    while running.load(Ordering::SeqCst) {
        if let Some(count) = config.count {
            if sent >= count {
                break;
            }
        }

        // A fresh request per probe; the transport opens a fresh socket
        let request = EchoRequest::build(identifier, sequence);
        if config.debug {
            println!("{}", request.hex_dump());
        }

        match run_probe(&request, target, &config, &mut stats) {
            Ok(report) => print_report(&report, &request, &config),
            Err(e) => {
                // Fatal: no later probe can succeed without privileges.
                // Statistics are still printed on the way out.
                eprintln!("{}", e);
                let _ = print_summary(&args, &stats);
                process::exit(1);
            }
        }

        sent += 1;
        sequence = sequence.wrapping_add(1);

        let more_to_send = config.count.is_none_or(|count| sent < count);
        if more_to_send && running.load(Ordering::SeqCst) {
            std::thread::sleep(config.interval);
        }
    }

    print_summary(&args, &stats)
}

/// Resolve a literal IPv4 address or hostname to the probe target.
fn resolve_target(host: &str) -> Result<Ipv4Addr> {
    // Try parsing as IP address first
    if let Ok(ip) = host.parse::<IpAddr>() {
        return match ip {
            IpAddr::V4(v4) => Ok(v4),
            IpAddr::V6(_) => anyhow::bail!("IPv6 targets are not supported"),
        };
    }

    // Resolve hostname, keeping the first IPv4 address
    let addrs: Vec<_> = format!("{}:0", host)
        .to_socket_addrs()
        .context("hostname resolution failed")?
        .collect();

    addrs
        .iter()
        .find_map(|sa| match sa.ip() {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
        .ok_or_else(|| anyhow::anyhow!("no IPv4 addresses found for hostname"))
}

/// Print the per-probe console line(s) for a terminal probe state.
fn print_report(report: &ProbeReport, request: &EchoRequest, config: &Config) {
    match report {
        ProbeReport::Reply {
            reply,
            validation,
            from,
            rtt,
        } => {
            println!(
                "{} bytes from {}: icmp_seq={} ttl={} time={:.3} ms",
                reply.len,
                from,
                reply.sequence,
                reply.response_ttl,
                rtt.as_secs_f64() * 1000.0
            );
            if !validation.is_valid() {
                if !validation.identifier_valid {
                    println!(
                        "ICMP Identifier invalid. Received: {} BUT - expected: {}",
                        reply.identifier, request.identifier
                    );
                }
                if !validation.sequence_valid {
                    println!(
                        "ICMP Sequence Number invalid. Received: {} BUT - expected: {}",
                        reply.sequence, request.sequence
                    );
                }
                if !validation.data_valid {
                    println!(
                        "ICMP Raw Data invalid. Received: {:?} BUT - expected: {:?}",
                        reply.data,
                        String::from_utf8_lossy(request.payload_pattern())
                    );
                }
            }
            if config.debug {
                println!(
                    "reply header: type={} code={} checksum=0x{:04x} sent_ts={:.6}",
                    reply.icmp_type, reply.icmp_code, reply.header_checksum, reply.sent_timestamp
                );
                if !reply.checksum_valid {
                    eprintln!("Warning: reply checksum does not verify");
                }
            }
        }
        ProbeReport::IcmpError {
            icmp_type,
            icmp_code,
            message,
            from,
        } => {
            println!(
                "From {}: icmp_type={} icmp_code={} - {}",
                from, icmp_type, icmp_code, message
            );
        }
        ProbeReport::UnknownType { icmp_type, from } => {
            println!("Unknown ICMP type {} received from {}.", icmp_type, from);
        }
        ProbeReport::TimedOut => {
            println!("Request timed out.");
        }
        ProbeReport::Failed(reason) => {
            println!("Probe failed: {}", reason);
        }
    }
}

/// Print the end-of-run summary (plain text, or JSON with --json).
fn print_summary(args: &Args, stats: &Statistics) -> Result<()> {
    let summary = stats.summary();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!("--- {} ping statistics ---", args.host);
    println!(
        "{} packets transmitted, {} packets received, {:.2}% packet loss",
        summary.sent, summary.received, summary.loss_pct
    );
    if summary.rtt_samples > 0 {
        println!(
            "round-trip min/avg/max = {:.3} / {:.3} / {:.3} ms",
            summary.min_rtt_ms, summary.avg_rtt_ms, summary.max_rtt_ms
        );
    } else {
        println!("No RTT records available.");
    }

    Ok(())
}
