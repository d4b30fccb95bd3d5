use core::fmt::Debug;

use super::ChunkType;

/// The framing of one chunk: its declared data length and type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkHeadToken {
  /// Length of the chunk data, at most `2^31 - 1`.
  pub length: u32,
  /// The chunk type code.
  pub code: ChunkType,
  /// Stream offset of the chunk's first length byte.
  pub position: u64,
}

/// Some of a chunk's data.
///
/// Long chunks arrive as several parts. Joining every part of a chunk in the
/// order they were produced gives back the chunk's full data.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ChunkDataPartToken {
  /// The chunk this data belongs to.
  pub head: ChunkHeadToken,
  /// At most 4096 bytes of data.
  pub data: Vec<u8>,
}
impl Debug for ChunkDataPartToken {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ChunkDataPartToken")
      .field("head", &self.head)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .finish()
  }
}

/// The end of a chunk, after its CRC has been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkEndToken {
  /// The chunk that just ended.
  pub head: ChunkHeadToken,
  /// If the declared CRC matched the computed one.
  pub crc_ok: bool,
}

/// One token from a [`ChunkTokenStream`](super::ChunkTokenStream).
///
/// Each chunk gives one `Head`, zero or more `DataPart`s, then one `End`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChunkToken {
  /// Start of a chunk.
  Head(ChunkHeadToken),
  /// Data of the current chunk.
  DataPart(ChunkDataPartToken),
  /// End of the current chunk.
  End(ChunkEndToken),
}
impl ChunkToken {
  /// The head of the chunk that this token belongs to.
  #[inline]
  #[must_use]
  pub const fn head(&self) -> &ChunkHeadToken {
    match self {
      Self::Head(head) => head,
      Self::DataPart(part) => &part.head,
      Self::End(end) => &end.head,
    }
  }
}
