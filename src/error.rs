use core::fmt;

use crate::png::ChunkType;

/// Shorthand for results using [`PngError`].
pub type PngResult<T> = Result<T, PngError>;

/// An error from decoding PNG data.
///
/// Every error is fatal: the first one ends the decode, and nothing after it
/// should be trusted.
#[derive(Debug)]
pub enum PngError {
  /// The first eight bytes are not the PNG signature.
  SignatureMismatch {
    /// The bytes that were found instead.
    found: [u8; 8],
  },

  /// The source ran out of bytes in the middle of something.
  UnexpectedEof {
    /// How many bytes the read asked for.
    expected: usize,
    /// How many bytes the source actually had.
    actual: usize,
    /// Total bytes read from the source, including this short read.
    total_read: u64,
  },

  /// A read would have pushed the total bytes read past the byte budget.
  TooLarge {
    /// The byte budget that would have been exceeded.
    limit: u64,
  },

  /// The data breaks a structural rule: a bad length, a bad chunk type code,
  /// chunk ordering or repetition, a bad field value, or a bad filter tag.
  Syntax(String),

  /// The declared CRC of a chunk doesn't match its contents.
  BadCrc {
    /// Type code of the chunk.
    code: ChunkType,
    /// Stream offset of the chunk.
    position: u64,
    /// Total bytes read from the source when the mismatch was found.
    total_read: u64,
  },

  /// The image is larger than the decoder's width or height limit.
  DimensionsTooLarge {
    /// Width from the image header.
    width: u32,
    /// Height from the image header.
    height: u32,
  },

  /// The allocator couldn't give us enough space.
  Alloc,

  /// A well-formed field value that this decoder has no implementation for.
  UnsupportedField(String),

  /// The compressed image data stopped before the compressed stream ended.
  DecompressionNotFinished,

  /// The compressed stream ended but there were still image data bytes left.
  DecompressionFinishedEarly {
    /// How many bytes followed the end of the compressed stream.
    trailing: usize,
  },

  /// The deflate engine rejected the compressed image data.
  CorruptImageData(&'static str),

  /// A token stream operation was called out of order.
  ///
  /// This is a bug in the calling code, not a problem with the input.
  StreamState(&'static str),

  /// The byte source failed with something other than running out of data.
  Io(std::io::Error),
}

impl PngError {
  #[inline]
  pub(crate) fn syntax(msg: impl Into<String>) -> Self {
    Self::Syntax(msg.into())
  }
}

impl fmt::Display for PngError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::SignatureMismatch { found } => {
        write!(f, "expected the PNG signature, found {found:02X?}")
      }
      Self::UnexpectedEof { expected, actual, total_read } => write!(
        f,
        "unexpected end of data: wanted {expected} bytes, got {actual}, total read {total_read}"
      ),
      Self::TooLarge { limit } => write!(f, "attempted to read past the {limit} byte limit"),
      Self::Syntax(msg) => write!(f, "PNG syntax error: {msg}"),
      Self::BadCrc { code, position, total_read } => write!(
        f,
        "CRC32 check failed for {code} chunk at byte {position} after {total_read} bytes read"
      ),
      Self::DimensionsTooLarge { width, height } => {
        write!(f, "a {width}x{height} image is larger than the decoder allows")
      }
      Self::Alloc => f.write_str("memory allocation failed"),
      Self::UnsupportedField(msg) => write!(f, "unsupported field: {msg}"),
      Self::DecompressionNotFinished => f.write_str("image data ended inside the compressed stream"),
      Self::DecompressionFinishedEarly { trailing } => {
        write!(f, "compressed stream ended with {trailing} bytes of image data left over")
      }
      Self::CorruptImageData(msg) => write!(f, "corrupt compressed image data: {msg}"),
      Self::StreamState(msg) => write!(f, "token stream misuse: {msg}"),
      Self::Io(e) => write!(f, "read failed: {e}"),
    }
  }
}

impl std::error::Error for PngError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<std::io::Error> for PngError {
  #[inline]
  fn from(e: std::io::Error) -> Self {
    Self::Io(e)
  }
}

impl From<std::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: std::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}
