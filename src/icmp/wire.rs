//! Wire-level constants and the RFC 1071 Internet checksum.

/// IPv4 header size assumed on received packets (no options).
pub const IP_HEADER_SIZE: usize = 20;
/// ICMP header size (fixed)
pub const ICMP_HEADER_SIZE: usize = 8;
/// Size of the big-endian f64 send timestamp embedded in the payload
pub const TIMESTAMP_SIZE: usize = 8;

/// Fixed ASCII pattern carried after the timestamp in every Echo Request.
pub const ECHO_PAYLOAD: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuv";

/// Calculate the RFC 1071 Internet checksum over an arbitrary buffer.
///
/// Sums 16-bit big-endian words into a 32-bit accumulator (a trailing odd
/// byte is added as the high byte of a final word), folds the carries back
/// into the low 16 bits, and returns the one's complement. The result is a
/// host-order `u16`; the packer writes it big-endian into the header.
///
/// The checksum field must be zero in `data` when computing the value to
/// insert.
pub fn checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;

    let mut i = 0;
    while i + 1 < data.len() {
        sum += u16::from_be_bytes([data[i], data[i + 1]]) as u32;
        i += 2;
    }

    // Handle odd byte
    if i < data.len() {
        sum += (data[i] as u32) << 8;
    }

    // Fold 32-bit sum to 16 bits (two folds are always enough)
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    !(sum as u16)
}

/// Verify a buffer that already contains its checksum field.
///
/// Summing the whole message including the checksum must fold to 0xFFFF
/// (0x0000 is accepted for the all-zero checksum case).
pub fn verify(data: &[u8]) -> bool {
    if data.len() < 4 {
        return false;
    }

    let mut sum: u32 = 0;
    let mut i = 0;
    while i + 1 < data.len() {
        sum += u16::from_be_bytes([data[i], data[i + 1]]) as u32;
        i += 2;
    }
    if i < data.len() {
        sum += (data[i] as u32) << 8;
    }
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    sum == 0xFFFF || sum == 0x0000
}
