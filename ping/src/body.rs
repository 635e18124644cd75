//! ICMP message bodies
//!
//! Everything after the 4-byte ICMP header is a body. Bodies are encoded and
//! decoded through [`MessageBody`], so the message codec never needs to know
//! which concrete shape it is carrying.

use crate::error::{PingError, Result};

/// Size of the identifier + sequence prefix of an echo body
pub const ECHO_HEADER_SIZE: usize = 4;

/// `(type, code)` pairs whose body is echo-shaped
const ECHO_KINDS: [(u8, u8); 2] = [(0, 0), (8, 0)];

/// Capability set of anything that can ride behind an ICMP header.
pub trait MessageBody {
    /// Serialized length in bytes.
    fn len(&self) -> usize;

    /// True when the body serializes to nothing.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// User payload only, without any body-specific prefix.
    fn raw_data(&self) -> &[u8];

    /// Serialize into exactly [`MessageBody::len`] bytes.
    fn marshal(&self) -> Result<Vec<u8>>;

    /// Replace the contents of `self` with the decoded form of `data`.
    fn unmarshal(&mut self, data: &[u8]) -> Result<()>;
}

/// An absent body has length 0 and refuses to marshal.
///
/// Unmarshalling into `None` allocates a default body first.
impl<B: MessageBody + Default> MessageBody for Option<B> {
    fn len(&self) -> usize {
        match self {
            Some(body) => body.len(),
            None => 0,
        }
    }

    fn raw_data(&self) -> &[u8] {
        match self {
            Some(body) => body.raw_data(),
            None => &[],
        }
    }

    fn marshal(&self) -> Result<Vec<u8>> {
        self.as_ref().ok_or(PingError::Encode)?.marshal()
    }

    fn unmarshal(&mut self, data: &[u8]) -> Result<()> {
        self.get_or_insert_with(B::default).unmarshal(data)
    }
}

/// Echo Request / Echo Reply body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EchoBody {
    /// Echo identifier
    pub identifier: u16,
    /// Sequence number
    pub sequence: u16,
    /// Opaque payload echoed back by the peer
    pub data: Vec<u8>,
}

impl EchoBody {
    pub fn new(identifier: u16, sequence: u16, data: impl Into<Vec<u8>>) -> Self {
        Self {
            identifier,
            sequence,
            data: data.into(),
        }
    }
}

impl MessageBody for EchoBody {
    fn len(&self) -> usize {
        ECHO_HEADER_SIZE + self.data.len()
    }

    fn raw_data(&self) -> &[u8] {
        &self.data
    }

    fn marshal(&self) -> Result<Vec<u8>> {
        let mut b = Vec::with_capacity(self.len());
        b.extend_from_slice(&self.identifier.to_be_bytes());
        b.extend_from_slice(&self.sequence.to_be_bytes());
        b.extend_from_slice(&self.data);
        Ok(b)
    }

    fn unmarshal(&mut self, data: &[u8]) -> Result<()> {
        if data.len() < ECHO_HEADER_SIZE {
            return Err(PingError::Decode { len: data.len() });
        }

        self.identifier = u16::from_be_bytes([data[0], data[1]]);
        self.sequence = u16::from_be_bytes([data[2], data[3]]);
        // Vec::new() does not allocate for a bare 4-byte body
        self.data = if data.len() > ECHO_HEADER_SIZE {
            data[ECHO_HEADER_SIZE..].to_vec()
        } else {
            Vec::new()
        };
        Ok(())
    }
}

/// Opaque body for message kinds without a dedicated decoder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBody {
    pub data: Vec<u8>,
}

impl MessageBody for RawBody {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn raw_data(&self) -> &[u8] {
        &self.data
    }

    fn marshal(&self) -> Result<Vec<u8>> {
        Ok(self.data.clone())
    }

    fn unmarshal(&mut self, data: &[u8]) -> Result<()> {
        self.data = data.to_vec();
        Ok(())
    }
}

/// Body variants, selected by `(type, code)` when decoding by kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IcmpBody {
    Echo(EchoBody),
    Raw(RawBody),
}

impl IcmpBody {
    /// Empty body of the shape registered for `(icmp_type, code)`.
    pub fn for_kind(icmp_type: u8, code: u8) -> Self {
        if ECHO_KINDS.contains(&(icmp_type, code)) {
            Self::Echo(EchoBody::default())
        } else {
            Self::Raw(RawBody::default())
        }
    }

    /// Echo view of the body, if it is echo-shaped.
    pub fn as_echo(&self) -> Option<&EchoBody> {
        match self {
            Self::Echo(echo) => Some(echo),
            Self::Raw(_) => None,
        }
    }
}

impl Default for IcmpBody {
    fn default() -> Self {
        Self::Echo(EchoBody::default())
    }
}

impl From<EchoBody> for IcmpBody {
    fn from(body: EchoBody) -> Self {
        Self::Echo(body)
    }
}

impl From<RawBody> for IcmpBody {
    fn from(body: RawBody) -> Self {
        Self::Raw(body)
    }
}

impl MessageBody for IcmpBody {
    fn len(&self) -> usize {
        match self {
            Self::Echo(b) => b.len(),
            Self::Raw(b) => b.len(),
        }
    }

    fn raw_data(&self) -> &[u8] {
        match self {
            Self::Echo(b) => b.raw_data(),
            Self::Raw(b) => b.raw_data(),
        }
    }

    fn marshal(&self) -> Result<Vec<u8>> {
        match self {
            Self::Echo(b) => b.marshal(),
            Self::Raw(b) => b.marshal(),
        }
    }

    fn unmarshal(&mut self, data: &[u8]) -> Result<()> {
        match self {
            Self::Echo(b) => b.unmarshal(data),
            Self::Raw(b) => b.unmarshal(data),
        }
    }
}
