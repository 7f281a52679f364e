//! Bulk-pull wire frames.
//!
//! A frame is a fixed 6-byte header followed by the per-message body. Header
//! layout: two magic bytes (protocol and network), protocol version, message
//! type, and a little-endian u16 of extension flags. Body integers are
//! big-endian except the request count, which is little-endian.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

use lattice_primitives::buf::Buf32;

pub const PROTOCOL_MAGIC: u8 = b'L';
/// Dev network id; other networks use different letters so frames never
/// cross networks.
pub const NETWORK_DEV: u8 = b'X';
pub const PROTOCOL_VERSION: u8 = 1;

/// Extension flag: the request carries an explicit count.
pub const EXT_COUNT_PRESENT: u16 = 0x0001;
/// Extension flag: respond with an ascending slice instead of the
/// descending legacy order.
pub const EXT_ASCENDING: u16 = 0x0002;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad magic or network")]
    BadMagic,

    #[error("unsupported protocol version {0}")]
    BadVersion(u8),

    #[error("unknown message type {0}")]
    UnknownMessage(u8),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum MessageType {
    BulkPull = 0x06,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MessageHeader {
    pub message_type: MessageType,
    pub extensions: u16,
}

impl MessageHeader {
    pub const SIZE: usize = 6;

    pub fn new(message_type: MessageType, extensions: u16) -> Self {
        Self {
            message_type,
            extensions,
        }
    }

    pub fn serialize(&self, out: &mut Vec<u8>) {
        out.push(PROTOCOL_MAGIC);
        out.push(NETWORK_DEV);
        out.push(PROTOCOL_VERSION);
        out.push(self.message_type.into());
        out.extend_from_slice(&self.extensions.to_le_bytes());
    }

    pub fn deserialize(bytes: &[u8; Self::SIZE]) -> Result<Self, WireError> {
        if bytes[0] != PROTOCOL_MAGIC || bytes[1] != NETWORK_DEV {
            return Err(WireError::BadMagic);
        }
        if bytes[2] != PROTOCOL_VERSION {
            return Err(WireError::BadVersion(bytes[2]));
        }
        let message_type =
            MessageType::try_from(bytes[3]).map_err(|_| WireError::UnknownMessage(bytes[3]))?;
        let extensions = u16::from_le_bytes([bytes[4], bytes[5]]);
        Ok(Self {
            message_type,
            extensions,
        })
    }

    pub fn has_flag(&self, flag: u16) -> bool {
        self.extensions & flag != 0
    }
}

/// Request for an ascending slice of one account chain. `start` is a chain
/// head hash (slice begins there, inclusive) or an account id (slice begins
/// at the chain root). `end` is reserved and zero.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BulkPullRequest {
    pub start: Buf32,
    pub end: Buf32,
    pub count: u32,
}

impl BulkPullRequest {
    pub const BODY_SIZE: usize = 32 + 32 + 4;

    pub fn ascending(start: Buf32, count: u32) -> Self {
        Self {
            start,
            end: Buf32::zero(),
            count,
        }
    }

    pub fn header(&self) -> MessageHeader {
        MessageHeader::new(MessageType::BulkPull, EXT_ASCENDING | EXT_COUNT_PRESENT)
    }

    pub fn serialize(&self, out: &mut Vec<u8>) {
        self.header().serialize(out);
        out.extend_from_slice(self.start.as_slice());
        out.extend_from_slice(self.end.as_slice());
        out.extend_from_slice(&self.count.to_le_bytes());
    }
}

/// Reads one request frame off a peer connection.
pub async fn read_request<R>(stream: &mut R) -> Result<BulkPullRequest, WireError>
where
    R: AsyncRead + Unpin,
{
    let mut header_bytes = [0u8; MessageHeader::SIZE];
    stream.read_exact(&mut header_bytes).await?;
    let _header = MessageHeader::deserialize(&header_bytes)?;

    let mut body = [0u8; BulkPullRequest::BODY_SIZE];
    stream.read_exact(&mut body).await?;
    let start = Buf32::try_from(&body[0..32]).expect("wire: sized body");
    let end = Buf32::try_from(&body[32..64]).expect("wire: sized body");
    let count = u32::from_le_bytes([body[64], body[65], body[66], body[67]]);
    Ok(BulkPullRequest { start, end, count })
}
