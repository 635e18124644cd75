//! Ping error types

use std::{error, fmt, io};

/// Result type for ping operations
pub type Result<T> = core::result::Result<T, PingError>;

/// Errors surfaced by the codec and by a ping session.
#[derive(Debug)]
pub enum PingError {
    /// Transport could not be established (socket, resolve, connect, deadline)
    Connect(io::Error),
    /// Write failed or the deadline passed before it completed
    Send(io::Error),
    /// Read failed or the deadline passed before a reply arrived
    Receive(io::Error),
    /// Buffer shorter than the 4-byte ICMP header
    Format {
        /// Length of the rejected buffer.
        len: usize,
    },
    /// Echo body shorter than identifier + sequence
    Decode {
        /// Length of the rejected body.
        len: usize,
    },
    /// Marshal requested on an absent body
    Encode,
    /// A reply arrived but its body could not be decoded
    MalformedBody(Box<PingError>),
}

impl PingError {
    /// True when the underlying I/O error is a deadline expiry.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Connect(e) | Self::Send(e) | Self::Receive(e) => matches!(
                e.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

impl fmt::Display for PingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect(e) => write!(f, "connect failed: {}", e),
            Self::Send(e) => write!(f, "send failed: {}", e),
            Self::Receive(e) => write!(f, "receive failed: {}", e),
            Self::Format { len } => {
                write!(f, "ICMP message too short: {} bytes, need at least 4", len)
            }
            Self::Decode { len } => {
                write!(f, "echo body too short: {} bytes, need at least 4", len)
            }
            Self::Encode => write!(f, "cannot marshal an absent message body"),
            Self::MalformedBody(inner) => write!(f, "reply body malformed: {}", inner),
        }
    }
}

impl error::Error for PingError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Connect(e) | Self::Send(e) | Self::Receive(e) => Some(e),
            Self::MalformedBody(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_timeout_detection() {
        let err = PingError::Receive(io::Error::from(io::ErrorKind::TimedOut));
        assert!(err.is_timeout());

        let err = PingError::Send(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(!err.is_timeout());

        assert!(!PingError::Encode.is_timeout());
    }

    #[test]
    fn test_malformed_body_keeps_source() {
        let err = PingError::MalformedBody(Box::new(PingError::Decode { len: 3 }));
        assert_eq!(
            err.to_string(),
            "reply body malformed: echo body too short: 3 bytes, need at least 4"
        );
        assert!(err.source().is_some());
    }
}
