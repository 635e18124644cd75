//! Common test utilities and a mock ICMP transport

#![allow(dead_code)]

use std::io;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use pingwire::{Connection, IcmpMessage, IcmpType, Transport};

/// What the mock connection answers to a read
#[derive(Debug, Clone)]
pub enum Reply {
    /// Echo the last written request back as an Echo Reply.
    Echo { ip_header: bool },
    /// Return these exact bytes.
    Bytes(Vec<u8>),
    /// Block until the deadline, then time out.
    Silence,
    /// Fail immediately.
    Fail(io::ErrorKind),
}

/// Everything the mock observed
#[derive(Debug, Default)]
pub struct MockLog {
    pub dialed: Vec<Ipv4Addr>,
    pub deadline: Option<Instant>,
    pub writes: Vec<Vec<u8>>,
    pub reads: usize,
    pub closes: usize,
}

/// In-memory transport for driving sessions without raw sockets
#[derive(Debug, Clone)]
pub struct MockTransport {
    pub log: Arc<Mutex<MockLog>>,
    pub reply: Reply,
    pub dial_error: Option<io::ErrorKind>,
    pub write_error: Option<io::ErrorKind>,
}

impl MockTransport {
    pub fn new(reply: Reply) -> Self {
        Self {
            log: Arc::new(Mutex::new(MockLog::default())),
            reply,
            dial_error: None,
            write_error: None,
        }
    }

    pub fn failing_dial(kind: io::ErrorKind) -> Self {
        Self {
            dial_error: Some(kind),
            ..Self::new(Reply::Silence)
        }
    }

    pub fn failing_write(kind: io::ErrorKind) -> Self {
        Self {
            write_error: Some(kind),
            ..Self::new(Reply::Silence)
        }
    }

    pub fn closes(&self) -> usize {
        self.log.lock().unwrap().closes
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.log.lock().unwrap().writes.clone()
    }
}

impl Transport for MockTransport {
    type Conn = MockConnection;

    fn dial(&self, addr: Ipv4Addr) -> io::Result<MockConnection> {
        if let Some(kind) = self.dial_error {
            return Err(io::Error::from(kind));
        }
        self.log.lock().unwrap().dialed.push(addr);
        Ok(MockConnection {
            log: Arc::clone(&self.log),
            reply: self.reply.clone(),
            write_error: self.write_error,
        })
    }
}

pub struct MockConnection {
    log: Arc<Mutex<MockLog>>,
    reply: Reply,
    write_error: Option<io::ErrorKind>,
}

impl Connection for MockConnection {
    fn set_deadline(&mut self, deadline: Instant) -> io::Result<()> {
        self.log.lock().unwrap().deadline = Some(deadline);
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(kind) = self.write_error {
            return Err(io::Error::from(kind));
        }
        let mut log = self.log.lock().unwrap();
        // Same as the raw socket: an elapsed deadline fails the next call
        if log.deadline.is_some_and(|d| d <= Instant::now()) {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "deadline exceeded"));
        }
        log.writes.push(buf.to_vec());
        Ok(buf.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let (request, deadline) = {
            let mut log = self.log.lock().unwrap();
            log.reads += 1;
            (log.writes.last().cloned().unwrap_or_default(), log.deadline)
        };

        let bytes = match &self.reply {
            Reply::Echo { ip_header } => {
                let reply = echo_reply_for(&request);
                if *ip_header {
                    with_ip_header(&reply)
                } else {
                    reply
                }
            }
            Reply::Bytes(bytes) => bytes.clone(),
            Reply::Silence => {
                if let Some(deadline) = deadline {
                    let now = Instant::now();
                    if deadline > now {
                        std::thread::sleep(deadline - now);
                    }
                }
                return Err(io::Error::new(io::ErrorKind::TimedOut, "deadline exceeded"));
            }
            Reply::Fail(kind) => return Err(io::Error::from(*kind)),
        };

        let n = bytes.len().min(buf.len());
        buf[..n].copy_from_slice(&bytes[..n]);
        Ok(n)
    }

    /// Counts every call so double releases show up.
    fn close(&mut self) {
        self.log.lock().unwrap().closes += 1;
    }
}

/// Turn a marshaled echo request into the matching marshaled echo reply.
pub fn echo_reply_for(request: &[u8]) -> Vec<u8> {
    let mut msg = IcmpMessage::default();
    msg.unmarshal(request).expect("request should decode");
    msg.icmp_type = IcmpType::EchoReply as u8;
    msg.marshal().expect("reply should encode")
}

/// Prefix `icmp` with a minimal IPv4 header (version 4, IHL 5).
pub fn with_ip_header(icmp: &[u8]) -> Vec<u8> {
    let mut d = vec![0u8; 20];
    d[0] = 0x45;
    d[2..4].copy_from_slice(&((20 + icmp.len()) as u16).to_be_bytes());
    d[8] = 64; // TTL
    d[9] = 1; // ICMP
    d[12..16].copy_from_slice(&[203, 0, 113, 1]);
    d[16..20].copy_from_slice(&[192, 0, 2, 10]);
    d.extend_from_slice(icmp);
    d
}
