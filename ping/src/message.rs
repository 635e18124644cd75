//! ICMP Message Codec
//!
//! ```text
//!  0        1        2        3
//! +--------+--------+--------+--------+
//! |  type  |  code  |    checksum     |
//! +--------+--------+--------+--------+
//! |        body (MessageBody) ...     |
//! ```
//!
//! The checksum is written low byte first but read back as a big-endian
//! field. The two helpers below keep that asymmetry explicit; a decoded
//! [`IcmpMessage::checksum`] is the byte-swapped value of the one computed
//! on marshal.

use log::debug;

use crate::body::{EchoBody, IcmpBody, MessageBody};
use crate::checksum::checksum;
use crate::error::{PingError, Result};

/// ICMP protocol number in IP header
pub const ICMP_PROTOCOL: u8 = 1;

/// ICMP header size (type, code, checksum)
pub const ICMP_HEADER_SIZE: usize = 4;

/// ICMP message types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IcmpType {
    /// Echo Reply (type 0)
    EchoReply = 0,
    /// Destination Unreachable (type 3)
    DestUnreachable = 3,
    /// Redirect (type 5)
    Redirect = 5,
    /// Echo Request (type 8) - ping
    EchoRequest = 8,
    /// Time Exceeded (type 11)
    TimeExceeded = 11,
}

impl IcmpType {
    /// Parse from byte value
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::EchoReply),
            3 => Some(Self::DestUnreachable),
            5 => Some(Self::Redirect),
            8 => Some(Self::EchoRequest),
            11 => Some(Self::TimeExceeded),
            _ => None,
        }
    }
}

/// How the body decoder is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyDispatch {
    /// Every non-empty body is decoded as an echo body.
    #[default]
    AlwaysEcho,
    /// Decoder picked from `(type, code)`, unknown kinds stay raw.
    ByKind,
}

/// What happens when the body decoder fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyErrors {
    /// Log and keep the header; the body keeps whatever was decoded.
    #[default]
    Discard,
    /// Fail the whole decode with [`PingError::MalformedBody`].
    Propagate,
}

/// Decode policy for [`IcmpMessage::unmarshal_with`].
///
/// The default reproduces the historical behaviour: echo-shaped bodies and
/// silently dropped body errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub dispatch: BodyDispatch,
    pub body_errors: BodyErrors,
}

impl DecodeOptions {
    /// Historical decoding
    pub const fn legacy() -> Self {
        Self {
            dispatch: BodyDispatch::AlwaysEcho,
            body_errors: BodyErrors::Discard,
        }
    }

    /// Kind-aware decoding that reports malformed bodies
    pub const fn strict() -> Self {
        Self {
            dispatch: BodyDispatch::ByKind,
            body_errors: BodyErrors::Propagate,
        }
    }
}

/// Store `sum` into header bytes 2..4, low byte first.
///
/// # Panics
/// If `header` is shorter than [`ICMP_HEADER_SIZE`].
pub fn write_checksum_le(header: &mut [u8], sum: u16) {
    header[2..4].copy_from_slice(&sum.to_le_bytes());
}

/// Read header bytes 2..4 as a big-endian value.
///
/// # Panics
/// If `header` is shorter than [`ICMP_HEADER_SIZE`].
pub fn read_checksum_be(header: &[u8]) -> u16 {
    u16::from_be_bytes([header[2], header[3]])
}

/// An ICMP message: header fields plus an owned body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IcmpMessage {
    pub icmp_type: u8,
    pub code: u8,
    /// Last computed (marshal) or read (unmarshal) checksum
    pub checksum: u16,
    pub body: Option<IcmpBody>,
}

impl IcmpMessage {
    pub fn new(icmp_type: u8, code: u8, body: Option<IcmpBody>) -> Self {
        Self {
            icmp_type,
            code,
            checksum: 0,
            body,
        }
    }

    /// Echo Request (type 8, code 0) carrying an [`EchoBody`].
    pub fn echo_request(identifier: u16, sequence: u16, data: impl Into<Vec<u8>>) -> Self {
        Self::new(
            IcmpType::EchoRequest as u8,
            0,
            Some(EchoBody::new(identifier, sequence, data).into()),
        )
    }

    /// Decode a fresh message from `data`.
    pub fn decode(data: &[u8], options: DecodeOptions) -> Result<Self> {
        let mut message = Self::default();
        message.unmarshal_with(data, options)?;
        Ok(message)
    }

    /// Known ICMP type, if any
    pub fn kind(&self) -> Option<IcmpType> {
        IcmpType::from_u8(self.icmp_type)
    }

    /// Echo view of the body
    pub fn echo(&self) -> Option<&EchoBody> {
        self.body.as_ref().and_then(IcmpBody::as_echo)
    }

    /// User payload of the body; empty when there is none.
    pub fn payload(&self) -> &[u8] {
        self.body.raw_data()
    }

    /// Serialize header and body, recomputing [`IcmpMessage::checksum`].
    pub fn marshal(&mut self) -> Result<Vec<u8>> {
        let mut b = vec![self.icmp_type, self.code, 0, 0];

        if !self.body.is_empty() {
            b.extend_from_slice(&self.body.marshal()?);
        }

        self.checksum = checksum(&b);
        write_checksum_le(&mut b, self.checksum);

        Ok(b)
    }

    /// Decode with [`DecodeOptions::legacy`].
    pub fn unmarshal(&mut self, data: &[u8]) -> Result<()> {
        self.unmarshal_with(data, DecodeOptions::legacy())
    }

    /// Decode header and body from `data`.
    ///
    /// The received checksum is stored as read and never validated here.
    pub fn unmarshal_with(&mut self, data: &[u8], options: DecodeOptions) -> Result<()> {
        if data.len() < ICMP_HEADER_SIZE {
            return Err(PingError::Format { len: data.len() });
        }

        self.icmp_type = data[0];
        self.code = data[1];
        self.checksum = read_checksum_be(data);
        self.body = None;

        if data.len() > ICMP_HEADER_SIZE {
            let mut body = match options.dispatch {
                BodyDispatch::AlwaysEcho => IcmpBody::default(),
                BodyDispatch::ByKind => IcmpBody::for_kind(self.icmp_type, self.code),
            };

            if let Err(e) = body.unmarshal(&data[ICMP_HEADER_SIZE..]) {
                match options.body_errors {
                    BodyErrors::Discard => {
                        debug!("discarding body error for type {}: {}", self.icmp_type, e)
                    }
                    BodyErrors::Propagate => return Err(PingError::MalformedBody(Box::new(e))),
                }
            }

            self.body = Some(body);
        }

        Ok(())
    }

    /// Recompute the checksum and compare it with the decoded field.
    ///
    /// The decoded field was read big-endian, so it is swapped back before
    /// comparing.
    pub fn checksum_matches(&self) -> bool {
        let mut copy = self.clone();
        match copy.marshal() {
            Ok(_) => copy.checksum == self.checksum.swap_bytes(),
            Err(_) => false,
        }
    }
}
