//! Raw `AF_INET` / `IPPROTO_ICMP` socket.
//!
//! Needs `CAP_NET_RAW` (or root). The socket is connected to its peer so
//! that `recv` only sees datagrams from that address. Received datagrams
//! include the IPv4 header.

use std::io;
use std::mem;
use std::net::Ipv4Addr;
use std::os::fd::{AsRawFd, RawFd};
use std::time::{Duration, Instant};

use libc::{c_int, c_void};
use log::trace;

use super::{deadline_exceeded, Connection, Transport};
use crate::message::ICMP_PROTOCOL;

/// Dials [`RawIcmpSocket`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawIcmpTransport;

impl Transport for RawIcmpTransport {
    type Conn = RawIcmpSocket;

    fn dial(&self, addr: Ipv4Addr) -> io::Result<RawIcmpSocket> {
        RawIcmpSocket::connect(addr)
    }
}

/// Connected raw ICMP socket. Closed on [`Connection::close`] or drop.
#[derive(Debug)]
pub struct RawIcmpSocket {
    fd: RawFd,
    peer: Ipv4Addr,
    deadline: Option<Instant>,
}

impl RawIcmpSocket {
    pub fn connect(peer: Ipv4Addr) -> io::Result<Self> {
        let protocol = c_int::from(ICMP_PROTOCOL);
        // SAFETY: no pointers involved
        let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_RAW, protocol) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }

        // Owns fd from here on, so early returns close it
        let socket = Self {
            fd,
            peer,
            deadline: None,
        };

        // SAFETY: sockaddr_in is plain old data; all-zero is a valid value
        let mut addr: libc::sockaddr_in = unsafe { mem::zeroed() };
        addr.sin_family = libc::AF_INET as libc::sa_family_t;
        addr.sin_addr = libc::in_addr {
            s_addr: u32::from_ne_bytes(peer.octets()),
        };

        // SAFETY: addr outlives the call and the length matches its type
        let rc = unsafe {
            libc::connect(
                fd,
                &addr as *const libc::sockaddr_in as *const libc::sockaddr,
                mem::size_of::<libc::sockaddr_in>() as libc::socklen_t,
            )
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }

        trace!("raw ICMP socket fd={} connected to {}", fd, peer);
        Ok(socket)
    }

    pub fn peer(&self) -> Ipv4Addr {
        self.peer
    }

    /// Apply the time left until the deadline to `option`.
    fn arm(&self, option: c_int) -> io::Result<()> {
        let Some(deadline) = self.deadline else {
            return Ok(());
        };

        let remaining = deadline
            .checked_duration_since(Instant::now())
            .filter(|d| !d.is_zero())
            .ok_or_else(deadline_exceeded)?;

        self.set_timeout(option, remaining)
    }

    fn set_timeout(&self, option: c_int, timeout: Duration) -> io::Result<()> {
        // A zero timeval means "block forever"
        let timeout = timeout.max(Duration::from_micros(1));
        let tv = libc::timeval {
            tv_sec: timeout.as_secs() as libc::time_t,
            tv_usec: timeout.subsec_micros() as libc::suseconds_t,
        };

        // SAFETY: tv outlives the call and the length matches its type
        let rc = unsafe {
            libc::setsockopt(
                self.fd,
                libc::SOL_SOCKET,
                option,
                &tv as *const libc::timeval as *const c_void,
                mem::size_of::<libc::timeval>() as libc::socklen_t,
            )
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn check_open(&self) -> io::Result<()> {
        if self.fd < 0 {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "socket closed"));
        }
        Ok(())
    }
}

/// Map a failed syscall to an error, folding socket timeouts into `TimedOut`.
fn syscall_error() -> io::Error {
    fold_timeout(io::Error::last_os_error())
}

fn fold_timeout(err: io::Error) -> io::Error {
    if err.kind() == io::ErrorKind::WouldBlock {
        deadline_exceeded()
    } else {
        err
    }
}

impl Connection for RawIcmpSocket {
    fn set_deadline(&mut self, deadline: Instant) -> io::Result<()> {
        self.check_open()?;
        self.deadline = Some(deadline);

        // Already expired: the next write or read reports it
        match self.arm(libc::SO_SNDTIMEO).and_then(|()| self.arm(libc::SO_RCVTIMEO)) {
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(()),
            other => other,
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.check_open()?;
        self.arm(libc::SO_SNDTIMEO)?;
        loop {
            // SAFETY: buf is valid for buf.len() bytes
            let n = unsafe { libc::send(self.fd, buf.as_ptr() as *const c_void, buf.len(), 0) };
            if n >= 0 {
                return Ok(n as usize);
            }
            let err = syscall_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.check_open()?;
        self.arm(libc::SO_RCVTIMEO)?;
        loop {
            // SAFETY: buf is valid for writes of buf.len() bytes
            let n = unsafe { libc::recv(self.fd, buf.as_mut_ptr() as *mut c_void, buf.len(), 0) };
            if n >= 0 {
                return Ok(n as usize);
            }
            let err = syscall_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    fn close(&mut self) {
        if self.fd >= 0 {
            trace!("closing raw ICMP socket fd={}", self.fd);
            // SAFETY: fd is owned by this socket and closed only here
            unsafe { libc::close(self.fd) };
            self.fd = -1;
        }
    }
}

impl AsRawFd for RawIcmpSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for RawIcmpSocket {
    fn drop(&mut self) {
        self.close();
    }
}
