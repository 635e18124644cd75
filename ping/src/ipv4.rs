//! IPv4 framing on the receive path
//!
//! Raw ICMP sockets hand back the whole datagram, IP header included.

/// Minimum IP header size
pub const IPV4_MIN_HEADER_LEN: usize = 20;

/// IHL is four bits of 32-bit words
pub const IPV4_MAX_HEADER_LEN: usize = 60;

/// Header length announced by the IHL nibble of `first`, in bytes.
pub(crate) const fn header_len(first: u8) -> usize {
    ((first & 0x0F) as usize) << 2
}

/// Return `buf` without its leading IPv4 header, if it has one.
///
/// A header is recognised when the buffer is longer than a minimal header,
/// the version nibble is 4 and the announced length fits the buffer.
/// Anything else is returned unchanged.
pub fn strip_ip_header(buf: &[u8]) -> &[u8] {
    if buf.len() <= IPV4_MIN_HEADER_LEN || buf[0] >> 4 != 4 {
        return buf;
    }

    let ihl = header_len(buf[0]);
    if ihl < IPV4_MIN_HEADER_LEN || ihl > buf.len() {
        return buf;
    }

    &buf[ihl..]
}
