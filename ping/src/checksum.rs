//! Internet Checksum Implementation (RFC 1071)
//!
//! Words are formed little-endian (`data[i]` low, `data[i + 1]` high). The
//! resulting value must be written back low byte first, see
//! [`crate::message::write_checksum_le`].

/// Calculate the Internet checksum of `data`.
///
/// Total over any input, including empty and odd-length buffers. A trailing
/// odd byte is summed as the low byte of a word whose high byte is zero.
pub fn checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    let mut words = data.chunks_exact(2);

    for w in &mut words {
        sum = sum.wrapping_add(u16::from_le_bytes([w[0], w[1]]) as u32);
    }

    if let Some(&last) = words.remainder().first() {
        sum = sum.wrapping_add(last as u32);
    }

    // Single fold; a carry out of the fold is dropped
    sum = (sum & 0xFFFF) + (sum >> 16);

    // One's complement
    !(sum as u16)
}

/// Verify checksum of a packet
///
/// Returns true if the checksum computed over data that already carries its
/// checksum field is zero.
pub fn verify_checksum(data: &[u8]) -> bool {
    checksum(data) == 0
}
