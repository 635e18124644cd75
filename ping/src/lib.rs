//! ICMPv4 Echo (ping)
//!
//! Codec for ICMP echo messages plus a single-exchange ping session over a
//! raw socket.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Ping Structure                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌────────────┐  ┌────────────┐  ┌────────────┐  ┌───────────┐  │
//! │  │  Checksum  │  │    Body    │  │  Message   │  │  Session  │  │
//! │  │            │  │            │  │            │  │           │  │
//! │  │ checksum   │  │ EchoBody   │  │ IcmpMessage│  │ dial      │  │
//! │  │ verify     │  │ RawBody    │  │ marshal    │  │ send      │  │
//! │  │            │  │ IcmpBody   │  │ unmarshal  │  │ receive   │  │
//! │  └────────────┘  └────────────┘  └────────────┘  └─────┬─────┘  │
//! │                                                        │        │
//! │                                           ┌────────────┴─────┐  │
//! │                                           │    Transport     │  │
//! │                                           │ RawIcmpTransport │  │
//! │                                           └──────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! let payload = pingwire::ping("192.0.2.1", 1)?;
//! println!("{}", String::from_utf8_lossy(&payload));
//! # Ok::<(), pingwire::PingError>(())
//! ```

mod body;
mod checksum;
mod config;
mod error;
mod ipv4;
mod message;
mod session;
pub mod transport;

pub use body::{EchoBody, IcmpBody, MessageBody, RawBody, ECHO_HEADER_SIZE};
pub use checksum::{checksum, verify_checksum};
pub use config::{PingConfig, DEFAULT_PAYLOAD};
pub use error::{PingError, Result};
pub use ipv4::{strip_ip_header, IPV4_MAX_HEADER_LEN, IPV4_MIN_HEADER_LEN};
pub use message::{
    read_checksum_be, write_checksum_le, BodyDispatch, BodyErrors, DecodeOptions, IcmpMessage,
    IcmpType, ICMP_HEADER_SIZE, ICMP_PROTOCOL,
};
#[cfg(unix)]
pub use session::ping;
pub use session::{ping_with, PingReply, PingSession, SessionState};
pub use transport::{Connection, Transport};
