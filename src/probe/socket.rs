//! Raw ICMP socket creation and permission checking.

use anyhow::{Result, anyhow};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Check raw-socket permissions up front, before the probe loop starts.
///
/// Raw ICMP sockets need CAP_NET_RAW (or root) on Linux; without it no
/// probe can ever succeed, so this failure is fatal to the whole run.
pub fn check_permissions() -> Result<()> {
    match Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4)) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Err(privilege_error()),
        Err(e) => Err(anyhow!("failed to create raw ICMP socket: {}", e)),
    }
}

/// Fatal diagnostic for missing raw-socket privilege.
pub(crate) fn privilege_error() -> anyhow::Error {
    let binary_path = std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "pingr".to_string());

    anyhow!(
        "Insufficient permissions for raw ICMP sockets.\n\n\
         Fix options:\n\
         \u{2022} Run with sudo: sudo pingr <target>\n\
         \u{2022} Add capability: sudo setcap cap_net_raw+ep {}",
        binary_path
    )
}

/// Create and configure a raw ICMPv4 socket for a single probe.
///
/// Sets the outgoing TTL and read timeout, and binds an ephemeral local
/// endpoint on any interface. The caller drops the socket when its probe
/// completes; sockets are never pooled or reused across probes.
pub fn create_probe_socket(ttl: u8, timeout: Duration) -> io::Result<Socket> {
    let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))?;
    socket.set_ttl(ttl as u32)?;
    socket.set_read_timeout(Some(timeout))?;
    socket.bind(&SockAddr::from(SocketAddr::new(
        IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        0,
    )))?;
    Ok(socket)
}
