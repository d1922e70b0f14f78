//! Echo Request construction.

use pnet::packet::MutablePacket;
use pnet::packet::icmp::IcmpCode;
use pnet::packet::icmp::IcmpTypes;
use pnet::packet::icmp::echo_request::MutableEchoRequestPacket;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::icmp::wire::{self, ECHO_PAYLOAD, ICMP_HEADER_SIZE, TIMESTAMP_SIZE};

/// An ICMP Echo Request, immutable once built.
///
/// The payload is an 8-byte big-endian f64 send timestamp (seconds since
/// the Unix epoch) followed by the fixed ASCII pattern. The checksum is
/// computed over header and payload with the checksum field zeroed, then
/// the header is re-packed with the real value.
#[derive(Debug, Clone, PartialEq)]
pub struct EchoRequest {
    pub identifier: u16,
    pub sequence: u16,
    pub sent_timestamp: f64,
    packet: Vec<u8>,
}

impl EchoRequest {
    /// Build an Echo Request stamped with the current time.
    ///
    /// Identifier and sequence are taken as-is; the caller masks wider
    /// values to 16 bits (e.g. the process id).
    pub fn build(identifier: u16, sequence: u16) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        Self::build_at(identifier, sequence, timestamp)
    }

    /// Build with an explicit timestamp (used by tests for determinism).
    pub fn build_at(identifier: u16, sequence: u16, timestamp: f64) -> Self {
        let mut buffer = vec![0u8; ICMP_HEADER_SIZE + TIMESTAMP_SIZE + ECHO_PAYLOAD.len()];

        let mut packet = MutableEchoRequestPacket::new(&mut buffer).unwrap();
        packet.set_icmp_type(IcmpTypes::EchoRequest);
        packet.set_icmp_code(IcmpCode::new(0));
        packet.set_identifier(identifier);
        packet.set_sequence_number(sequence);

        let payload = packet.payload_mut();
        payload[..TIMESTAMP_SIZE].copy_from_slice(&timestamp.to_be_bytes());
        payload[TIMESTAMP_SIZE..].copy_from_slice(ECHO_PAYLOAD);

        // Checksum over header || data with the checksum field still zero,
        // then re-pack the header with the real value
        let cksum = wire::checksum(&buffer);
        let mut packet = MutableEchoRequestPacket::new(&mut buffer).unwrap();
        packet.set_checksum(cksum);

        Self {
            identifier,
            sequence,
            sent_timestamp: timestamp,
            packet: buffer,
        }
    }

    /// Serialized packet (header and payload) with the final checksum.
    pub fn as_bytes(&self) -> &[u8] {
        &self.packet
    }

    /// The ASCII pattern portion of the payload (after the timestamp).
    pub fn payload_pattern(&self) -> &[u8] {
        &self.packet[ICMP_HEADER_SIZE + TIMESTAMP_SIZE..]
    }

    /// Hex dump of the built packet, 8 bytes per row (debug output).
    pub fn hex_dump(&self) -> String {
        let (header, data) = self.packet.split_at(ICMP_HEADER_SIZE);
        let mut out = String::from("header:");
        for byte in header {
            out.push_str(&format!(" {:02x}", byte));
        }
        out.push_str("\ndata:");
        for (i, byte) in data.iter().enumerate() {
            out.push_str(if i % 8 == 0 { "\n" } else { " " });
            out.push_str(&format!("{:02x}", byte));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_echo_request_header() {
        let request = EchoRequest::build_at(0x0102, 7, 1000.5);
        let bytes = request.as_bytes();

        assert_eq!(bytes.len(), ICMP_HEADER_SIZE + TIMESTAMP_SIZE + ECHO_PAYLOAD.len());
        assert_eq!(bytes[0], 8); // Echo Request type
        assert_eq!(bytes[1], 0); // Code
        assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), 0x0102);
        assert_eq!(u16::from_be_bytes([bytes[6], bytes[7]]), 7);
    }

    #[test]
    fn test_build_embeds_timestamp_and_pattern() {
        let request = EchoRequest::build_at(1, 2, 1234.25);
        let bytes = request.as_bytes();

        let mut ts = [0u8; TIMESTAMP_SIZE];
        ts.copy_from_slice(&bytes[ICMP_HEADER_SIZE..ICMP_HEADER_SIZE + TIMESTAMP_SIZE]);
        assert_eq!(f64::from_be_bytes(ts), 1234.25);
        assert_eq!(request.payload_pattern(), ECHO_PAYLOAD);
    }

    #[test]
    fn test_build_checksum_self_verifies() {
        let request = EchoRequest::build_at(0xBEEF, 42, 42.0);
        let bytes = request.as_bytes();
        assert_ne!(u16::from_be_bytes([bytes[2], bytes[3]]), 0);
        assert!(wire::verify(bytes));
    }

    #[test]
    fn test_build_is_pure_given_timestamp() {
        let a = EchoRequest::build_at(9, 9, 9.0);
        let b = EchoRequest::build_at(9, 9, 9.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hex_dump_shape() {
        let request = EchoRequest::build_at(1, 1, 0.0);
        let dump = request.hex_dump();
        assert!(dump.starts_with("header: 08 00"));
        // 56 data bytes => 7 rows of 8
        assert_eq!(dump.lines().count(), 2 + 7);
    }
}
