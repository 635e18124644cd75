//! Ping session - one echo request, one reply.
//!
//! # States
//! Idle → Connected → Sent → AwaitingReply → Decoded → Closed
//!
//! Any failure jumps straight to Closed. The connection is released exactly
//! once on every path.

use std::io;
use std::net::Ipv4Addr;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::PingConfig;
use crate::error::{PingError, Result};
use crate::ipv4::strip_ip_header;
use crate::message::IcmpMessage;
use crate::transport::{resolve_ipv4, Connection, Transport};

/// Where a session is in its exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing opened yet
    Idle,
    /// Connection open, deadline set
    Connected,
    /// Echo request written
    Sent,
    /// Blocked on the reply
    AwaitingReply,
    /// Reply decoded
    Decoded,
    /// Connection released (terminal)
    Closed,
}

/// Decoded reply to one echo request
#[derive(Debug, Clone)]
pub struct PingReply {
    /// Peer the request was sent to
    pub from: Ipv4Addr,
    /// Reply as decoded
    pub message: IcmpMessage,
    /// Time between write and read completing
    pub rtt: Duration,
}

impl PingReply {
    /// Payload echoed back by the peer
    pub fn payload(&self) -> &[u8] {
        self.message.payload()
    }
}

/// Closes the wrapped connection when dropped.
struct ScopedConnection<C: Connection>(C);

impl<C: Connection> Deref for ScopedConnection<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.0
    }
}

impl<C: Connection> DerefMut for ScopedConnection<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.0
    }
}

impl<C: Connection> Drop for ScopedConnection<C> {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Drives a single echo exchange over a [`Transport`].
#[derive(Debug)]
pub struct PingSession<T: Transport> {
    transport: T,
    config: PingConfig,
    state: SessionState,
}

impl<T: Transport> PingSession<T> {
    pub fn new(transport: T, config: PingConfig) -> Self {
        Self {
            transport,
            config,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &PingConfig {
        &self.config
    }

    /// Send one echo request to `target` and wait for one reply.
    ///
    /// Each call is an independent exchange on a fresh connection. The
    /// session is [`SessionState::Closed`] when this returns.
    pub fn run(&mut self, target: Ipv4Addr) -> Result<PingReply> {
        self.state = SessionState::Idle;
        let result = self.exchange(target);
        self.transition(SessionState::Closed);
        result
    }

    fn exchange(&mut self, target: Ipv4Addr) -> Result<PingReply> {
        let conn = self.transport.dial(target).map_err(PingError::Connect)?;
        let mut conn = ScopedConnection(conn);

        let deadline = Instant::now() + self.config.timeout;
        conn.set_deadline(deadline).map_err(PingError::Connect)?;
        self.transition(SessionState::Connected);

        let mut request = IcmpMessage::echo_request(
            self.config.identifier,
            self.config.sequence,
            self.config.payload.clone(),
        );
        let wire = request.marshal()?;

        let started = Instant::now();
        let written = conn.write(&wire).map_err(|e| {
            log_timeout("send", target, &e);
            PingError::Send(e)
        })?;
        if written != wire.len() {
            return Err(PingError::Send(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short write: {} of {} bytes", written, wire.len()),
            )));
        }
        self.transition(SessionState::Sent);

        let mut recv = vec![0u8; self.config.recv_buffer_len()];
        self.transition(SessionState::AwaitingReply);
        let n = conn.read(&mut recv).map_err(|e| {
            log_timeout("receive", target, &e);
            PingError::Receive(e)
        })?;
        let rtt = started.elapsed();

        let message = IcmpMessage::decode(strip_ip_header(&recv[..n]), self.config.decode)?;
        self.transition(SessionState::Decoded);

        Ok(PingReply {
            from: target,
            message,
            rtt,
        })
    }

    fn transition(&mut self, next: SessionState) {
        debug!("ping session: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

fn log_timeout(op: &str, target: Ipv4Addr, err: &io::Error) {
    if err.kind() == io::ErrorKind::TimedOut {
        warn!("{} to {} timed out", op, target);
    }
}

/// Ping `address` once over `transport` and return the echoed payload.
pub fn ping_with<T: Transport>(transport: T, address: &str, config: PingConfig) -> Result<Vec<u8>> {
    let target = resolve_ipv4(address).map_err(PingError::Connect)?;
    let reply = PingSession::new(transport, config).run(target)?;

    info!(
        "reply from {}: type={} code={} time={:?} data={}",
        reply.from,
        reply.message.icmp_type,
        reply.message.code,
        reply.rtt,
        String::from_utf8_lossy(reply.payload())
    );

    Ok(reply.payload().to_vec())
}

/// Ping `address` once over a raw ICMP socket.
///
/// Both the send and the receive must complete within `timeout_secs`.
#[cfg(unix)]
pub fn ping(address: &str, timeout_secs: u64) -> Result<Vec<u8>> {
    let config = PingConfig::default().with_timeout_secs(timeout_secs);
    ping_with(crate::transport::RawIcmpTransport, address, config)
}
