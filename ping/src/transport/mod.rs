//! Transport seam.
//!
//! A ping session only needs a connected, deadline-bounded datagram
//! endpoint. Real sessions use [`RawIcmpTransport`]; tests plug in an
//! in-memory implementation.

#[cfg(unix)]
mod raw;

#[cfg(unix)]
pub use raw::{RawIcmpSocket, RawIcmpTransport};

use std::io;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::time::Instant;

/// An open endpoint to one peer.
pub trait Connection {
    /// Bound every later `write` and `read` by `deadline`.
    ///
    /// Operations pending past the deadline fail with
    /// [`io::ErrorKind::TimedOut`].
    fn set_deadline(&mut self, deadline: Instant) -> io::Result<()>;

    /// Send one datagram.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Receive one datagram into `buf`.
    ///
    /// # Returns
    /// Number of bytes copied
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Release the endpoint. Must be idempotent.
    fn close(&mut self);
}

/// Opens connections to ICMP peers.
pub trait Transport {
    type Conn: Connection;

    fn dial(&self, addr: Ipv4Addr) -> io::Result<Self::Conn>;
}

/// Resolve a dotted quad or host name to its first IPv4 address.
pub fn resolve_ipv4(address: &str) -> io::Result<Ipv4Addr> {
    if let Ok(ip) = address.parse::<Ipv4Addr>() {
        return Ok(ip);
    }

    (address, 0)
        .to_socket_addrs()?
        .find_map(|addr| match addr {
            SocketAddr::V4(v4) => Some(*v4.ip()),
            SocketAddr::V6(_) => None,
        })
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no IPv4 address for {}", address),
            )
        })
}

/// Error returned once a connection's deadline has passed.
pub(crate) fn deadline_exceeded() -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, "deadline exceeded")
}
