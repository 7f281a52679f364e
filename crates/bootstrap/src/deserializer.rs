//! Framed read of one block from a byte stream.
//!
//! Stream protocol: one type byte, then the fixed-size body for that type.
//! The `not_a_block` byte ends the stream. After any error the stream
//! position is undefined and the connection should be dropped.

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

use lattice_state::block::{Block, BlockType};

#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown block type {0}")]
    UnknownType(u8),
}

/// Reads one block. `Ok(None)` is the orderly end of the stream; a short
/// read surfaces as an unexpected-EOF io error. A returned block is
/// well-framed and syntactically parsed, nothing more.
pub async fn read_block<R>(stream: &mut R) -> Result<Option<Block>, DeserializeError>
where
    R: AsyncRead + Unpin,
{
    let raw_type = stream.read_u8().await?;
    if raw_type == u8::from(BlockType::NotABlock) {
        return Ok(None);
    }
    let block_type =
        BlockType::try_from(raw_type).map_err(|_| DeserializeError::UnknownType(raw_type))?;
    let size = block_type
        .body_size()
        .expect("deserializer: terminator handled above");

    let mut body = vec![0u8; size];
    stream.read_exact(&mut body).await?;
    let block =
        Block::wire_deserialize(block_type, &body).expect("deserializer: body sized for type");
    Ok(Some(block))
}

#[cfg(test)]
mod tests {
    use lattice_primitives::amount::Amount;
    use lattice_test_utils::{dev_params, keys, BlockBuilder};

    use super::*;

    fn stream_of(blocks: &[Block]) -> Vec<u8> {
        let mut out = Vec::new();
        for block in blocks {
            block.wire_serialize(&mut out);
        }
        out.push(u8::from(BlockType::NotABlock));
        out
    }

    #[tokio::test]
    async fn test_reads_blocks_then_end() {
        let params = dev_params();
        let genesis_key = keys::dev_genesis_key();
        let send = BlockBuilder::new(&params).state_send(
            &genesis_key,
            params.genesis.hash(),
            Amount::MAX.checked_sub(Amount::raw(1)).unwrap(),
            keys::dev_key(1).account(),
        );
        let wire = stream_of(&[params.genesis.clone(), send.clone()]);
        let mut stream = wire.as_slice();

        let first = read_block(&mut stream).await.unwrap().unwrap();
        assert_eq!(first.hash(), params.genesis.hash());
        let second = read_block(&mut stream).await.unwrap().unwrap();
        assert_eq!(second.hash(), send.hash());
        assert!(read_block(&mut stream).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_stream_ends_immediately() {
        let wire = stream_of(&[]);
        let mut stream = wire.as_slice();
        assert!(read_block(&mut stream).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_type_is_framing_error() {
        let wire = [0x7fu8];
        let mut stream = wire.as_slice();
        assert!(matches!(
            read_block(&mut stream).await,
            Err(DeserializeError::UnknownType(0x7f))
        ));
    }

    #[tokio::test]
    async fn test_short_body_is_io_error() {
        // A state block type byte followed by too few body bytes.
        let mut wire = vec![u8::from(BlockType::State)];
        wire.extend_from_slice(&[0u8; 50]);
        let mut stream = wire.as_slice();
        assert!(matches!(
            read_block(&mut stream).await,
            Err(DeserializeError::Io(_))
        ));
    }
}
