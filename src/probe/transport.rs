//! One-shot send/receive transport: a scoped raw socket per probe.

use anyhow::Result;
use socket2::SockAddr;
use std::io;
use std::mem::MaybeUninit;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::{Duration, Instant};

use crate::icmp::packet::EchoRequest;
use crate::probe::socket::{create_probe_socket, privilege_error};

/// Receive buffer size; comfortably larger than any conforming reply.
const MAX_REPLY_SIZE: usize = 1024;

/// Outcome of one send/receive cycle.
#[derive(Debug)]
pub enum Outcome {
    /// A packet arrived within the timeout; `rtt` is the arrival instant
    /// minus the send instant.
    Replied {
        data: Vec<u8>,
        from: IpAddr,
        rtt: Duration,
    },
    /// Nothing arrived within the timeout.
    TimedOut,
    /// A non-fatal transmission error; the run continues.
    Failed(String),
}

/// Send one Echo Request and block for a reply for at most `timeout`.
///
/// The socket lives only for this call and is released on every exit
/// path. Missing raw-socket privilege is the single fatal condition and
/// propagates as `Err`; every other failure is a per-probe
/// [`Outcome::Failed`].
pub fn send_and_receive(
    request: &EchoRequest,
    target: Ipv4Addr,
    ttl: u8,
    timeout: Duration,
) -> Result<Outcome> {
    let socket = match create_probe_socket(ttl, timeout) {
        Ok(socket) => socket,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => return Err(privilege_error()),
        Err(e) => return Ok(Outcome::Failed(format!("socket setup failed: {}", e))),
    };

    // ICMP has no port; 0 is ignored
    let dest = SockAddr::from(SocketAddr::V4(SocketAddrV4::new(target, 0)));
    if let Err(e) = socket.send_to(request.as_bytes(), &dest) {
        return Ok(Outcome::Failed(format!("send failed: {}", e)));
    }
    let sent_at = Instant::now();

    let mut buffer = [MaybeUninit::<u8>::uninit(); MAX_REPLY_SIZE];
    match socket.recv_from(&mut buffer) {
        Ok((len, addr)) => {
            // Capture arrival time before any decoding for accurate RTT
            let received_at = Instant::now();
            // recv_from initialized the first `len` bytes
            let data: Vec<u8> = buffer[..len]
                .iter()
                .map(|b| unsafe { b.assume_init() })
                .collect();
            let from = addr
                .as_socket_ipv4()
                .map(|sa| IpAddr::V4(*sa.ip()))
                .unwrap_or(IpAddr::V4(target));
            Ok(Outcome::Replied {
                data,
                from,
                rtt: received_at - sent_at,
            })
        }
        Err(e)
            if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut =>
        {
            Ok(Outcome::TimedOut)
        }
        Err(e) => Ok(Outcome::Failed(format!("receive failed: {}", e))),
    }
}
