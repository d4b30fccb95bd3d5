use std::io::{ErrorKind, Read};

use log::trace;

use super::*;
use crate::{DecoderOptions, PngError, PngResult};

/// The first eight bytes of a PNG datastream must match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Largest chunk data length allowed by the format.
pub const PNG_MAX_CHUNK_LENGTH: u32 = (1 << 31) - 1;

/// The chunk currently being turned into tokens.
#[derive(Debug, Clone, Copy)]
struct SingleChunkState {
  head: ChunkHeadToken,
  data_remaining: u32,
  crc: RunningCrc,
  /// Always `min(max_data_part, data_remaining)`.
  next_read: u32,
}
impl SingleChunkState {
  fn new(head: ChunkHeadToken, max_data_part: usize) -> Self {
    let mut crc = RunningCrc::new();
    crc.update(&head.code.code());
    let mut out = Self { head, data_remaining: head.length, crc, next_read: 0 };
    out.update_next_read(max_data_part);
    out
  }
  fn update(&mut self, data: &[u8], max_data_part: usize) {
    debug_assert_eq!(data.len(), self.next_read as usize);
    self.data_remaining -= self.next_read;
    self.crc.update(data);
    self.update_next_read(max_data_part);
  }
  fn update_next_read(&mut self, max_data_part: usize) {
    self.next_read = self.data_remaining.min(max_data_part as u32);
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
  Signature,
  Chunks,
  Done,
}

/// Turns a byte source into a sequence of chunk tokens.
///
/// This is the lowest layer of the decoder. It checks:
/// * The PNG signature.
/// * That each declared chunk length is at most `2^31 - 1`.
/// * That each chunk type code is four ASCII letters.
/// * Each chunk's CRC.
/// * That the total bytes read stays within the byte budget.
///
/// It does *not* check chunk ordering, see
/// [`ChunkOrderParser`](super::ChunkOrderParser) for that.
///
/// As an [`Iterator`] it produces, for each chunk, one
/// [`Head`](ChunkToken::Head), zero or more
/// [`DataPart`](ChunkToken::DataPart)s, then one [`End`](ChunkToken::End).
/// A CRC mismatch comes out as [`PngError::BadCrc`] in place of the `End`
/// token. The iterator stops after the first error, and stops cleanly if the
/// source ends exactly between two chunks.
///
/// The individual steps are also public, for callers that want to drive the
/// framing themselves. Calling them out of order gives
/// [`PngError::StreamState`].
pub struct ChunkTokenStream<R> {
  source: R,
  options: DecoderOptions,
  total_bytes_read: u64,
  chunk_state: Option<SingleChunkState>,
  /// First byte of the next chunk, read early to look for the end of input.
  peeked: Option<u8>,
  phase: Phase,
}

impl<R: Read> ChunkTokenStream<R> {
  /// Makes a token stream with the default limits.
  #[inline]
  pub fn new(source: R) -> Self {
    Self::with_options(source, DecoderOptions::default())
  }

  /// Makes a token stream with the given limits.
  #[inline]
  pub fn with_options(source: R, options: DecoderOptions) -> Self {
    Self { source, options, total_bytes_read: 0, chunk_state: None, peeked: None, phase: Phase::Signature }
  }

  /// Total bytes consumed from the source so far.
  #[inline]
  #[must_use]
  pub const fn total_bytes_read(&self) -> u64 {
    self.total_bytes_read
  }

  /// Gives back the byte source.
  #[inline]
  pub fn into_inner(self) -> R {
    self.source
  }

  /// Reads the 8 signature bytes and checks them.
  pub fn read_signature(&mut self) -> PngResult<()> {
    let mut found = [0_u8; 8];
    self.read(&mut found)?;
    if found != PNG_SIGNATURE {
      return Err(PngError::SignatureMismatch { found });
    }
    Ok(())
  }

  /// Reads one byte to find out if another chunk follows.
  ///
  /// Gives `false` when the source is cleanly out of data, which is the only
  /// place where running out of data isn't an error.
  pub fn probe_chunk_start(&mut self) -> PngResult<bool> {
    if self.chunk_state.is_some() {
      return Err(PngError::StreamState("can't look for a new chunk inside a chunk"));
    }
    if self.peeked.is_some() {
      return Ok(true);
    }
    let mut byte = [0_u8; 1];
    match self.read(&mut byte) {
      Ok(()) => {
        self.peeked = Some(byte[0]);
        Ok(true)
      }
      Err(PngError::UnexpectedEof { actual: 0, .. }) => Ok(false),
      Err(e) => Err(e),
    }
  }

  /// Reads a chunk's length and type code and starts that chunk.
  pub fn next_head(&mut self) -> PngResult<ChunkHeadToken> {
    if self.chunk_state.is_some() {
      return Err(PngError::StreamState("must finish the last chunk before starting another"));
    }
    let mut length_bytes = [0_u8; 4];
    let position = match self.peeked.take() {
      Some(first) => {
        length_bytes[0] = first;
        self.read(&mut length_bytes[1..])?;
        self.total_bytes_read - 4
      }
      None => {
        self.read(&mut length_bytes)?;
        self.total_bytes_read - 4
      }
    };
    let length = u32::from_be_bytes(length_bytes);
    if length > PNG_MAX_CHUNK_LENGTH {
      return Err(PngError::syntax(format!(
        "chunk claims to be {length} bytes long, must be no longer than {PNG_MAX_CHUNK_LENGTH}"
      )));
    }
    let mut code = [0_u8; 4];
    self.read(&mut code)?;
    let code = ChunkType::new(code).ok_or_else(|| {
      PngError::syntax(format!("invalid type code for chunk at byte {position}"))
    })?;
    let head = ChunkHeadToken { length, code, position };
    self.chunk_state = Some(SingleChunkState::new(head, self.options.max_data_part()));
    Ok(head)
  }

  /// Reads the next part of the current chunk's data.
  pub fn next_data_part(&mut self) -> PngResult<ChunkDataPartToken> {
    let state = match self.chunk_state {
      Some(state) if state.next_read > 0 => state,
      _ => return Err(PngError::StreamState("no chunk data left to read")),
    };
    let mut data = vec![0_u8; state.next_read as usize];
    self.read(&mut data)?;
    let max_data_part = self.options.max_data_part();
    if let Some(state) = self.chunk_state.as_mut() {
      state.update(&data, max_data_part);
    }
    Ok(ChunkDataPartToken { head: state.head, data })
  }

  /// Reads the current chunk's CRC, compares it, and ends the chunk.
  ///
  /// A mismatch is reported through [`crc_ok`](ChunkEndToken::crc_ok), it's
  /// up to the caller to treat that as fatal. The iterator does.
  pub fn next_end(&mut self) -> PngResult<ChunkEndToken> {
    let state = match self.chunk_state {
      Some(state) if state.next_read == 0 => state,
      _ => return Err(PngError::StreamState("chunk is not ready to end")),
    };
    let mut crc_bytes = [0_u8; 4];
    self.read(&mut crc_bytes)?;
    self.chunk_state = None;
    let crc_ok = u32::from_be_bytes(crc_bytes) == state.crc.finish();
    Ok(ChunkEndToken { head: state.head, crc_ok })
  }

  fn next_token(&mut self) -> PngResult<Option<ChunkToken>> {
    if self.phase == Phase::Signature {
      self.read_signature()?;
      self.phase = Phase::Chunks;
    }
    if self.phase == Phase::Done {
      return Ok(None);
    }
    let token = match self.chunk_state {
      None => {
        if !self.probe_chunk_start()? {
          return Ok(None);
        }
        ChunkToken::Head(self.next_head()?)
      }
      Some(state) if state.next_read > 0 => ChunkToken::DataPart(self.next_data_part()?),
      Some(_) => {
        let end = self.next_end()?;
        if !end.crc_ok {
          return Err(PngError::BadCrc {
            code: end.head.code,
            position: end.head.position,
            total_read: self.total_bytes_read,
          });
        }
        ChunkToken::End(end)
      }
    };
    trace!("{token:?}");
    Ok(Some(token))
  }

  /// Fills all of `buf` from the source.
  ///
  /// The byte budget is checked before the source is touched.
  fn read(&mut self, buf: &mut [u8]) -> PngResult<()> {
    let limit = self.options.max_total_bytes();
    if self.total_bytes_read.saturating_add(buf.len() as u64) > limit {
      return Err(PngError::TooLarge { limit });
    }
    let mut filled = 0;
    while filled < buf.len() {
      match self.source.read(&mut buf[filled..]) {
        Ok(0) => break,
        Ok(n) => filled += n,
        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
        Err(e) => return Err(PngError::Io(e)),
      }
    }
    self.total_bytes_read += filled as u64;
    if filled < buf.len() {
      return Err(PngError::UnexpectedEof {
        expected: buf.len(),
        actual: filled,
        total_read: self.total_bytes_read,
      });
    }
    Ok(())
  }
}

impl<R: Read> Iterator for ChunkTokenStream<R> {
  type Item = PngResult<ChunkToken>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    match self.next_token() {
      Ok(Some(token)) => Some(Ok(token)),
      Ok(None) => {
        self.phase = Phase::Done;
        None
      }
      Err(e) => {
        self.phase = Phase::Done;
        Some(Err(e))
      }
    }
  }
}

impl<R: Read> core::iter::FusedIterator for ChunkTokenStream<R> {}
