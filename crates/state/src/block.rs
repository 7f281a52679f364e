//! Block variants and their frozen wire forms.
//!
//! Five variants exist on the wire. The legacy four (`send`, `receive`,
//! `open`, `change`) each encode one operation; `state` blocks carry the full
//! account state and encode the operation implicitly through the balance and
//! link fields. Body layouts and sizes are frozen network constants:
//! multi-byte integers are big-endian except the 8-byte work nonce, which is
//! little-endian.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use lattice_primitives::amount::Amount;
use lattice_primitives::buf::{Buf32, Buf64};
use lattice_primitives::hash;

use crate::ids::{Account, BlockHash, QualifiedRoot};

/// Wire tag for a block body. `NotABlock` is the stream terminator slot and
/// has no body.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum BlockType {
    NotABlock = 1,
    Send = 2,
    Receive = 3,
    Open = 4,
    Change = 5,
    State = 6,
}

impl BlockType {
    /// Frozen body size for the type, `None` for the terminator.
    pub fn body_size(&self) -> Option<usize> {
        match self {
            BlockType::NotABlock => None,
            BlockType::Send => Some(SendBlock::SIZE),
            BlockType::Receive => Some(ReceiveBlock::SIZE),
            BlockType::Open => Some(OpenBlock::SIZE),
            BlockType::Change => Some(ChangeBlock::SIZE),
            BlockType::State => Some(StateBlock::SIZE),
        }
    }
}

/// Hash preamble distinguishing state blocks from legacy blocks whose first
/// hashed field is also 32 bytes.
const STATE_HASH_PREAMBLE: [u8; 32] = {
    let mut p = [0u8; 32];
    p[31] = BlockType::State as u8;
    p
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SendBlock {
    pub previous: BlockHash,
    pub destination: Account,
    pub balance: Amount,
    pub signature: Buf64,
    pub work: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReceiveBlock {
    pub previous: BlockHash,
    pub source: BlockHash,
    pub signature: Buf64,
    pub work: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OpenBlock {
    pub source: BlockHash,
    pub representative: Account,
    pub account: Account,
    pub signature: Buf64,
    pub work: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChangeBlock {
    pub previous: BlockHash,
    pub representative: Account,
    pub signature: Buf64,
    pub work: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateBlock {
    pub account: Account,
    pub previous: BlockHash,
    pub representative: Account,
    pub balance: Amount,
    pub link: Buf32,
    pub signature: Buf64,
    pub work: u64,
}

impl SendBlock {
    pub const SIZE: usize = 32 + 32 + 16 + 64 + 8;
}

impl ReceiveBlock {
    pub const SIZE: usize = 32 + 32 + 64 + 8;
}

impl OpenBlock {
    pub const SIZE: usize = 32 + 32 + 32 + 64 + 8;
}

impl ChangeBlock {
    pub const SIZE: usize = 32 + 32 + 64 + 8;
}

impl StateBlock {
    pub const SIZE: usize = 32 + 32 + 32 + 16 + 32 + 64 + 8;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Block {
    Send(SendBlock),
    Receive(ReceiveBlock),
    Open(OpenBlock),
    Change(ChangeBlock),
    State(StateBlock),
}

impl Block {
    pub fn block_type(&self) -> BlockType {
        match self {
            Block::Send(_) => BlockType::Send,
            Block::Receive(_) => BlockType::Receive,
            Block::Open(_) => BlockType::Open,
            Block::Change(_) => BlockType::Change,
            Block::State(_) => BlockType::State,
        }
    }

    /// Content hash over the typed fields, excluding signature and work.
    pub fn hash(&self) -> BlockHash {
        let digest = match self {
            Block::Send(b) => hash::parts(&[
                b.previous.as_ref(),
                b.destination.as_ref(),
                &b.balance.to_be_bytes(),
            ]),
            Block::Receive(b) => hash::parts(&[b.previous.as_ref(), b.source.as_ref()]),
            Block::Open(b) => hash::parts(&[
                b.source.as_ref(),
                b.representative.as_ref(),
                b.account.as_ref(),
            ]),
            Block::Change(b) => hash::parts(&[b.previous.as_ref(), b.representative.as_ref()]),
            Block::State(b) => hash::parts(&[
                &STATE_HASH_PREAMBLE,
                b.account.as_ref(),
                b.previous.as_ref(),
                b.representative.as_ref(),
                &b.balance.to_be_bytes(),
                b.link.as_slice(),
            ]),
        };
        BlockHash::from(digest)
    }

    /// Predecessor on the account chain, zero for a chain-opening block.
    pub fn previous(&self) -> BlockHash {
        match self {
            Block::Send(b) => b.previous,
            Block::Receive(b) => b.previous,
            Block::Open(_) => BlockHash::zero(),
            Block::Change(b) => b.previous,
            Block::State(b) => b.previous,
        }
    }

    /// The value the work nonce must be computed against: the previous hash,
    /// or the account for a chain-opening block.
    pub fn root(&self) -> Buf32 {
        match self {
            Block::Open(b) => *b.account.inner(),
            Block::State(b) if b.previous.is_zero() => *b.account.inner(),
            other => *other.previous().inner(),
        }
    }

    pub fn qualified_root(&self) -> QualifiedRoot {
        QualifiedRoot {
            root: self.root(),
            previous: self.previous(),
        }
    }

    pub fn work(&self) -> u64 {
        match self {
            Block::Send(b) => b.work,
            Block::Receive(b) => b.work,
            Block::Open(b) => b.work,
            Block::Change(b) => b.work,
            Block::State(b) => b.work,
        }
    }

    pub fn signature(&self) -> &Buf64 {
        match self {
            Block::Send(b) => &b.signature,
            Block::Receive(b) => &b.signature,
            Block::Open(b) => &b.signature,
            Block::Change(b) => &b.signature,
            Block::State(b) => &b.signature,
        }
    }

    /// The account written into the block itself, for the variants carrying
    /// one. Other variants derive their account from the previous block.
    pub fn account_field(&self) -> Option<Account> {
        match self {
            Block::Open(b) => Some(b.account),
            Block::State(b) => Some(b.account),
            _ => None,
        }
    }

    pub fn balance_field(&self) -> Option<Amount> {
        match self {
            Block::Send(b) => Some(b.balance),
            Block::State(b) => Some(b.balance),
            _ => None,
        }
    }

    pub fn representative_field(&self) -> Option<Account> {
        match self {
            Block::Open(b) => Some(b.representative),
            Block::Change(b) => Some(b.representative),
            Block::State(b) => Some(b.representative),
            _ => None,
        }
    }

    /// The referenced source block: the source field for receives and opens,
    /// the link reinterpreted as a hash for state blocks, zero otherwise.
    pub fn source(&self) -> BlockHash {
        match self {
            Block::Send(_) | Block::Change(_) => BlockHash::zero(),
            Block::Receive(b) => b.source,
            Block::Open(b) => b.source,
            Block::State(b) => BlockHash::from(b.link),
        }
    }

    pub fn link_field(&self) -> Option<Buf32> {
        match self {
            Block::State(b) => Some(b.link),
            _ => None,
        }
    }

    pub fn destination_field(&self) -> Option<Account> {
        match self {
            Block::Send(b) => Some(b.destination),
            _ => None,
        }
    }

    /// Appends the wire form, type byte followed by the fixed-size body.
    pub fn wire_serialize(&self, out: &mut Vec<u8>) {
        out.push(self.block_type().into());
        match self {
            Block::Send(b) => {
                out.extend_from_slice(b.previous.as_ref());
                out.extend_from_slice(b.destination.as_ref());
                out.extend_from_slice(&b.balance.to_be_bytes());
                out.extend_from_slice(b.signature.as_slice());
                out.extend_from_slice(&b.work.to_le_bytes());
            }
            Block::Receive(b) => {
                out.extend_from_slice(b.previous.as_ref());
                out.extend_from_slice(b.source.as_ref());
                out.extend_from_slice(b.signature.as_slice());
                out.extend_from_slice(&b.work.to_le_bytes());
            }
            Block::Open(b) => {
                out.extend_from_slice(b.source.as_ref());
                out.extend_from_slice(b.representative.as_ref());
                out.extend_from_slice(b.account.as_ref());
                out.extend_from_slice(b.signature.as_slice());
                out.extend_from_slice(&b.work.to_le_bytes());
            }
            Block::Change(b) => {
                out.extend_from_slice(b.previous.as_ref());
                out.extend_from_slice(b.representative.as_ref());
                out.extend_from_slice(b.signature.as_slice());
                out.extend_from_slice(&b.work.to_le_bytes());
            }
            Block::State(b) => {
                out.extend_from_slice(b.account.as_ref());
                out.extend_from_slice(b.previous.as_ref());
                out.extend_from_slice(b.representative.as_ref());
                out.extend_from_slice(&b.balance.to_be_bytes());
                out.extend_from_slice(b.link.as_slice());
                out.extend_from_slice(b.signature.as_slice());
                out.extend_from_slice(&b.work.to_le_bytes());
            }
        }
    }

    /// Parses a body of exactly `ty.body_size()` bytes. `None` on a length
    /// mismatch or the terminator type.
    pub fn wire_deserialize(ty: BlockType, body: &[u8]) -> Option<Block> {
        if ty.body_size() != Some(body.len()) {
            return None;
        }
        let mut r = Reader::new(body);
        let block = match ty {
            BlockType::NotABlock => return None,
            BlockType::Send => Block::Send(SendBlock {
                previous: BlockHash::from(r.buf32()),
                destination: Account::from(r.buf32()),
                balance: r.amount(),
                signature: r.buf64(),
                work: r.work(),
            }),
            BlockType::Receive => Block::Receive(ReceiveBlock {
                previous: BlockHash::from(r.buf32()),
                source: BlockHash::from(r.buf32()),
                signature: r.buf64(),
                work: r.work(),
            }),
            BlockType::Open => Block::Open(OpenBlock {
                source: BlockHash::from(r.buf32()),
                representative: Account::from(r.buf32()),
                account: Account::from(r.buf32()),
                signature: r.buf64(),
                work: r.work(),
            }),
            BlockType::Change => Block::Change(ChangeBlock {
                previous: BlockHash::from(r.buf32()),
                representative: Account::from(r.buf32()),
                signature: r.buf64(),
                work: r.work(),
            }),
            BlockType::State => Block::State(StateBlock {
                account: Account::from(r.buf32()),
                previous: BlockHash::from(r.buf32()),
                representative: Account::from(r.buf32()),
                balance: r.amount(),
                link: r.buf32(),
                signature: r.buf64(),
                work: r.work(),
            }),
        };
        Some(block)
    }
}

/// Cursor over an exact-size body. Length is checked up front, so the reads
/// can't run past the end.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> &'a [u8] {
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        out
    }

    fn buf32(&mut self) -> Buf32 {
        Buf32::try_from(self.take(32)).expect("block: body size checked")
    }

    fn buf64(&mut self) -> Buf64 {
        Buf64::try_from(self.take(64)).expect("block: body size checked")
    }

    fn amount(&mut self) -> Amount {
        let mut bytes = [0u8; Amount::LEN];
        bytes.copy_from_slice(self.take(Amount::LEN));
        Amount::from_be_bytes(bytes)
    }

    fn work(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.take(8));
        u64::from_le_bytes(bytes)
    }
}
