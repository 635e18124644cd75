//! Ping configuration

use std::time::Duration;

use crate::body::ECHO_HEADER_SIZE;
use crate::ipv4::IPV4_MAX_HEADER_LEN;
use crate::message::{DecodeOptions, ICMP_HEADER_SIZE};

/// Payload carried by a default echo request
pub const DEFAULT_PAYLOAD: &[u8] = b"Neu Spider";

/// Settings for one echo exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingConfig {
    /// Deadline for the whole exchange, measured from connection open
    pub timeout: Duration,
    /// Echo identifier
    pub identifier: u16,
    /// Sequence number
    pub sequence: u16,
    /// Echo payload
    pub payload: Vec<u8>,
    /// How the reply is decoded
    pub decode: DecodeOptions,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            identifier: 1,
            sequence: 1,
            payload: DEFAULT_PAYLOAD.to_vec(),
            decode: DecodeOptions::legacy(),
        }
    }
}

impl PingConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_secs(self, secs: u64) -> Self {
        self.with_timeout(Duration::from_secs(secs))
    }

    pub fn with_identifier(mut self, identifier: u16) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn with_sequence(mut self, sequence: u16) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_decode(mut self, decode: DecodeOptions) -> Self {
        self.decode = decode;
        self
    }

    /// Size of the marshaled echo request (ICMP header + echo body)
    pub fn request_len(&self) -> usize {
        ICMP_HEADER_SIZE + ECHO_HEADER_SIZE + self.payload.len()
    }

    /// Receive buffer size: largest IPv4 header plus the echoed request
    pub fn recv_buffer_len(&self) -> usize {
        IPV4_MAX_HEADER_LEN + self.request_len()
    }
}
