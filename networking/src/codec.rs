use containers::ssz::{Decode, Encode};
use containers::SignedBlock;
use snap::read::FrameDecoder;
use snap::write::FrameEncoder;
use std::io::{self, Read, Write};
use thiserror::Error;

/// Upper bound on a decompressed block.
pub const MAX_BLOCK_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("snappy framing failed: {0}")]
    Io(#[from] io::Error),
    #[error("SSZ decode failed: {0}")]
    Ssz(String),
    #[error("block exceeds {MAX_BLOCK_SIZE} bytes")]
    TooLarge,
}

/// Canonical binary form of blocks on the wire.
pub trait BlockCodec: Send + Sync {
    fn encode(&self, block: &SignedBlock) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Result<SignedBlock, CodecError>;
}

/// SSZ wrapped in the snappy framing format.
#[derive(Debug, Clone, Copy, Default)]
pub struct SszSnappyCodec;

impl SszSnappyCodec {
    fn compress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut encoder = FrameEncoder::new(Vec::new());
        encoder.write_all(data)?;
        encoder
            .into_inner()
            .map_err(|err| CodecError::Io(io::Error::other(err.to_string())))
    }

    fn decompress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut decompressed = Vec::new();
        FrameDecoder::new(data)
            .take(MAX_BLOCK_SIZE + 1)
            .read_to_end(&mut decompressed)?;

        if decompressed.len() as u64 > MAX_BLOCK_SIZE {
            return Err(CodecError::TooLarge);
        }

        Ok(decompressed)
    }
}

impl BlockCodec for SszSnappyCodec {
    fn encode(&self, block: &SignedBlock) -> Result<Vec<u8>, CodecError> {
        Self::compress(&block.as_ssz_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> Result<SignedBlock, CodecError> {
        let ssz_bytes = Self::decompress(bytes)?;
        SignedBlock::from_ssz_bytes(&ssz_bytes).map_err(|err| CodecError::Ssz(format!("{err:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use containers::{Block, Bytes32, Slot};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encoded_block_decodes_to_same_root() {
        let block = SignedBlock::new(
            Block {
                slot: Slot(4),
                parent_root: Bytes32::repeat_byte(2),
                ..Block::default()
            },
            vec![9; 8],
        );

        let codec = SszSnappyCodec;
        let bytes = codec.encode(&block).expect("encodes");
        let decoded = codec.decode(&bytes).expect("decodes");
        assert_eq!(decoded.root(), block.root());
        assert_eq!(decoded, block);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(SszSnappyCodec.decode(&[0xde, 0xad, 0xbe, 0xef]).is_err());
        assert!(SszSnappyCodec.decode(&[]).is_err());
    }
}
