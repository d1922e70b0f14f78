//! Diagnostic text for ICMP error replies.

use pnet::packet::icmp::{IcmpCode, IcmpType, IcmpTypes};

/// Returned for any (type, code) pair outside the known tables.
pub const UNKNOWN_MESSAGE: &str = "Unknown ICMP Type or Code";

/// Map a (type, code) pair to its registry message.
///
/// Covers the Destination Unreachable (16 codes) and Time Exceeded
/// (2 codes) spaces from the IANA ICMP parameters registry. Total
/// function: unmatched pairs get [`UNKNOWN_MESSAGE`].
pub fn icmp_message(icmp_type: IcmpType, icmp_code: IcmpCode) -> &'static str {
    match (icmp_type, icmp_code) {
        // Type 3: Destination Unreachable
        (IcmpTypes::DestinationUnreachable, IcmpCode(0)) => "Network Unreachable",
        (IcmpTypes::DestinationUnreachable, IcmpCode(1)) => "Host Unreachable",
        (IcmpTypes::DestinationUnreachable, IcmpCode(2)) => "Protocol Unreachable",
        (IcmpTypes::DestinationUnreachable, IcmpCode(3)) => "Port Unreachable",
        (IcmpTypes::DestinationUnreachable, IcmpCode(4)) => {
            "Fragmentation Needed and Don't Fragment was Set"
        }
        (IcmpTypes::DestinationUnreachable, IcmpCode(5)) => "Source Route Failed",
        (IcmpTypes::DestinationUnreachable, IcmpCode(6)) => "Destination Network Unknown",
        (IcmpTypes::DestinationUnreachable, IcmpCode(7)) => "Destination Host Unknown",
        (IcmpTypes::DestinationUnreachable, IcmpCode(8)) => "Source Host Isolated",
        (IcmpTypes::DestinationUnreachable, IcmpCode(9)) => {
            "Communication with Destination Network is Administratively Prohibited"
        }
        (IcmpTypes::DestinationUnreachable, IcmpCode(10)) => {
            "Communication with Destination Host is Administratively Prohibited"
        }
        (IcmpTypes::DestinationUnreachable, IcmpCode(11)) => {
            "Destination Network Unreachable for Type of Service"
        }
        (IcmpTypes::DestinationUnreachable, IcmpCode(12)) => {
            "Destination Host Unreachable for Type of Service"
        }
        (IcmpTypes::DestinationUnreachable, IcmpCode(13)) => {
            "Communication Administratively Prohibited"
        }
        (IcmpTypes::DestinationUnreachable, IcmpCode(14)) => "Host Precedence Violation",
        (IcmpTypes::DestinationUnreachable, IcmpCode(15)) => "Precedence Cutoff in Effect",

        // Type 11: Time Exceeded
        (IcmpTypes::TimeExceeded, IcmpCode(0)) => "TTL Exceeded in Transit",
        (IcmpTypes::TimeExceeded, IcmpCode(1)) => "Fragment Reassembly Time Exceeded",

        _ => UNKNOWN_MESSAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(
            icmp_message(IcmpTypes::DestinationUnreachable, IcmpCode(3)),
            "Port Unreachable"
        );
        assert_eq!(
            icmp_message(IcmpTypes::TimeExceeded, IcmpCode(0)),
            "TTL Exceeded in Transit"
        );
        assert_eq!(
            icmp_message(IcmpTypes::TimeExceeded, IcmpCode(1)),
            "Fragment Reassembly Time Exceeded"
        );
    }

    #[test]
    fn test_full_destination_unreachable_space() {
        // All 16 registry codes resolve to something other than the fallback
        for code in 0..16 {
            let message = icmp_message(IcmpTypes::DestinationUnreachable, IcmpCode(code));
            assert_ne!(message, UNKNOWN_MESSAGE, "code {}", code);
        }
    }

    #[test]
    fn test_unknown_pairs_never_fail() {
        assert_eq!(
            icmp_message(IcmpTypes::DestinationUnreachable, IcmpCode(99)),
            UNKNOWN_MESSAGE
        );
        assert_eq!(
            icmp_message(IcmpTypes::TimeExceeded, IcmpCode(2)),
            UNKNOWN_MESSAGE
        );
        assert_eq!(icmp_message(IcmpType(42), IcmpCode(0)), UNKNOWN_MESSAGE);
    }
}
