//! Reply decoding and validation against the originating request.

use anyhow::{Context, Result, bail};
use pnet::packet::Packet;
use pnet::packet::icmp::echo_reply::EchoReplyPacket;
use pnet::packet::icmp::{IcmpCode, IcmpType};

use crate::icmp::packet::EchoRequest;
use crate::icmp::wire::{self, ICMP_HEADER_SIZE, IP_HEADER_SIZE, TIMESTAMP_SIZE};

/// Peek the ICMP type and code of a raw reply buffer.
///
/// A fixed 20-byte IP header with no options is assumed; the ICMP section
/// starts at byte 20. Returns `None` for buffers too short to carry one.
pub fn icmp_type_and_code(raw: &[u8]) -> Option<(IcmpType, IcmpCode)> {
    if raw.len() < IP_HEADER_SIZE + 2 {
        return None;
    }
    Some((IcmpType(raw[IP_HEADER_SIZE]), IcmpCode(raw[IP_HEADER_SIZE + 1])))
}

/// A decoded Echo Reply.
///
/// Field offsets are relative to the start of the ICMP section: type at 0,
/// code at 1, checksum at 2-3, identifier at 4-5, sequence at 6-7, the
/// 8-byte embedded send timestamp, then the payload text.
#[derive(Debug, Clone)]
pub struct EchoReply {
    pub icmp_type: u8,
    pub icmp_code: u8,
    pub header_checksum: u16,
    pub identifier: u16,
    pub sequence: u16,
    /// Send timestamp echoed back from the request payload
    pub sent_timestamp: f64,
    /// UTF-8 decoded payload remainder
    pub data: String,
    /// TTL from the IP header of the reply (byte 8)
    pub response_ttl: u8,
    /// Whether the ICMP section sums to 0xFFFF including its checksum field
    pub checksum_valid: bool,
    /// ICMP section length in bytes
    pub len: usize,
}

impl EchoReply {
    /// Decode a received raw buffer (IP header included).
    ///
    /// Fails on truncated buffers and on payloads that are not valid UTF-8;
    /// both are decode failures, distinct from validation mismatches which
    /// are reported through [`Validation`] flags.
    pub fn parse(raw: &[u8]) -> Result<EchoReply> {
        if raw.len() < IP_HEADER_SIZE + ICMP_HEADER_SIZE + TIMESTAMP_SIZE {
            bail!("reply too short: {} bytes", raw.len());
        }

        let icmp_data = &raw[IP_HEADER_SIZE..];
        let packet = EchoReplyPacket::new(icmp_data).context("truncated ICMP header")?;

        let payload = packet.payload();
        let mut ts = [0u8; TIMESTAMP_SIZE];
        ts.copy_from_slice(&payload[..TIMESTAMP_SIZE]);
        let data = std::str::from_utf8(&payload[TIMESTAMP_SIZE..])
            .context("reply payload is not valid UTF-8")?
            .to_string();

        Ok(EchoReply {
            icmp_type: packet.get_icmp_type().0,
            icmp_code: packet.get_icmp_code().0,
            header_checksum: packet.get_checksum(),
            identifier: packet.get_identifier(),
            sequence: packet.get_sequence_number(),
            sent_timestamp: f64::from_be_bytes(ts),
            data,
            response_ttl: raw[8],
            checksum_valid: wire::verify(icmp_data),
            len: icmp_data.len(),
        })
    }

    /// Compare this reply against the originating request.
    ///
    /// All three checks run regardless of earlier failures, so every flag
    /// is always meaningful.
    pub fn validate(&self, request: &EchoRequest) -> Validation {
        Validation {
            identifier_valid: self.identifier == request.identifier,
            sequence_valid: self.sequence == request.sequence,
            data_valid: self.data.as_bytes() == request.payload_pattern(),
        }
    }
}

/// Outcome of validating a reply, one flag per independent check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    pub identifier_valid: bool,
    pub sequence_valid: bool,
    pub data_valid: bool,
}

impl Validation {
    /// True iff all three checks hold.
    pub fn is_valid(&self) -> bool {
        self.identifier_valid && self.sequence_valid && self.data_valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icmp::wire::ECHO_PAYLOAD;

    /// Wrap an ICMP section in a minimal 20-byte IPv4 header (ttl at byte 8)
    fn with_ip_header(icmp: &[u8], ttl: u8) -> Vec<u8> {
        let mut raw = vec![0u8; IP_HEADER_SIZE];
        raw[0] = 0x45;
        raw[8] = ttl;
        raw.extend_from_slice(icmp);
        raw
    }

    /// Build the Echo Reply a well-behaved target would send back
    fn reply_bytes_for(request: &EchoRequest, ttl: u8) -> Vec<u8> {
        let mut icmp = request.as_bytes().to_vec();
        icmp[0] = 0; // Echo Reply type
        icmp[2] = 0;
        icmp[3] = 0;
        let cksum = wire::checksum(&icmp);
        icmp[2..4].copy_from_slice(&cksum.to_be_bytes());
        with_ip_header(&icmp, ttl)
    }

    #[test]
    fn test_parse_recovers_request_fields() {
        // Round-trip identity across the u16 range
        for (identifier, sequence) in [
            (0u16, 0u16),
            (1, 2),
            (0x00FF, 0x0100),
            (0x1234, 0xABCD),
            (0xFFFF, 0xFFFF),
        ] {
            let request = EchoRequest::build_at(identifier, sequence, 1700000000.5);
            let raw = reply_bytes_for(&request, 64);
            let reply = EchoReply::parse(&raw).unwrap();

            assert_eq!(reply.icmp_type, 0);
            assert_eq!(reply.icmp_code, 0);
            assert_eq!(reply.identifier, identifier);
            assert_eq!(reply.sequence, sequence);
            assert_eq!(reply.sent_timestamp, 1700000000.5);
            assert_eq!(reply.data.as_bytes(), ECHO_PAYLOAD);
            assert_eq!(reply.response_ttl, 64);
            assert!(reply.checksum_valid);
        }
    }

    #[test]
    fn test_parse_rejects_short_buffer() {
        let raw = vec![0u8; IP_HEADER_SIZE + ICMP_HEADER_SIZE];
        assert!(EchoReply::parse(&raw).is_err());
    }

    #[test]
    fn test_parse_rejects_invalid_utf8_payload() {
        let request = EchoRequest::build_at(1, 1, 1.0);
        let mut raw = reply_bytes_for(&request, 64);
        // Clobber the payload text with a continuation byte
        let text_start = IP_HEADER_SIZE + ICMP_HEADER_SIZE + TIMESTAMP_SIZE;
        raw[text_start] = 0xBF;
        assert!(EchoReply::parse(&raw).is_err());
    }

    #[test]
    fn test_parse_flags_corrupted_checksum() {
        let request = EchoRequest::build_at(1, 1, 1.0);
        let mut raw = reply_bytes_for(&request, 64);
        raw[IP_HEADER_SIZE + 2] ^= 0xFF;
        let reply = EchoReply::parse(&raw).unwrap();
        assert!(!reply.checksum_valid);
    }

    #[test]
    fn test_validation_is_independent_per_flag() {
        let request = EchoRequest::build_at(1234, 5, 1.0);

        // Mismatched identifier only
        let other = EchoRequest::build_at(4321, 5, 1.0);
        let reply = EchoReply::parse(&reply_bytes_for(&other, 64)).unwrap();
        let validation = reply.validate(&request);
        assert!(!validation.identifier_valid);
        assert!(validation.sequence_valid);
        assert!(validation.data_valid);
        assert!(!validation.is_valid());

        // Mismatched sequence only
        let other = EchoRequest::build_at(1234, 6, 1.0);
        let reply = EchoReply::parse(&reply_bytes_for(&other, 64)).unwrap();
        let validation = reply.validate(&request);
        assert!(validation.identifier_valid);
        assert!(!validation.sequence_valid);
        assert!(validation.data_valid);

        // Mismatched payload only
        let mut raw = reply_bytes_for(&request, 64);
        let text_start = IP_HEADER_SIZE + ICMP_HEADER_SIZE + TIMESTAMP_SIZE;
        raw[text_start] = b'z';
        let reply = EchoReply::parse(&raw).unwrap();
        let validation = reply.validate(&request);
        assert!(validation.identifier_valid);
        assert!(validation.sequence_valid);
        assert!(!validation.data_valid);
    }

    #[test]
    fn test_validation_all_flags_hold_for_faithful_reply() {
        let request = EchoRequest::build_at(1234, 0, 1.0);
        let reply = EchoReply::parse(&reply_bytes_for(&request, 57)).unwrap();
        let validation = reply.validate(&request);
        assert!(validation.is_valid());
        assert_eq!(reply.response_ttl, 57);
    }

    #[test]
    fn test_type_and_code_peek() {
        let raw = with_ip_header(&[11, 0, 0, 0, 0, 0, 0, 0], 3);
        let (icmp_type, icmp_code) = icmp_type_and_code(&raw).unwrap();
        assert_eq!(icmp_type.0, 11);
        assert_eq!(icmp_code.0, 0);

        assert!(icmp_type_and_code(&[0u8; 21]).is_none());
    }
}
