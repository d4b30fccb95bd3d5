use log::trace;
use miniz_oxide::{
  inflate::stream::{inflate, InflateState},
  DataFormat, MZError, MZFlush, MZStatus,
};

use crate::{PngError, PngResult};

/// How many output bytes we ask the inflater for at once.
const OUT_STEP: usize = 32 * 1024;

/// A zlib/deflate decompressor that's fed the image data in pieces.
///
/// Input that can't be used yet (because an output limit was hit) is kept
/// and used first on the next call.
pub struct Deflate32kDecompressor {
  state: Box<InflateState>,
  unconsumed: Vec<u8>,
  finished: bool,
  total_out: u64,
}
impl Default for Deflate32kDecompressor {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
impl core::fmt::Debug for Deflate32kDecompressor {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Deflate32kDecompressor")
      .field("unconsumed", &self.unconsumed.len())
      .field("finished", &self.finished)
      .field("total_out", &self.total_out)
      .finish()
  }
}
impl Deflate32kDecompressor {
  #[inline]
  #[must_use]
  pub fn new() -> Self {
    Self {
      state: InflateState::new_boxed(DataFormat::Zlib),
      unconsumed: Vec::new(),
      finished: false,
      total_out: 0,
    }
  }

  /// Adds `data` to the input and decompresses as much as possible.
  ///
  /// With `max_length` set, no more than that many bytes are returned and any
  /// input left over waits for the next call.
  pub fn decompress(&mut self, data: &[u8], max_length: Option<usize>) -> PngResult<Vec<u8>> {
    self.unconsumed.extend_from_slice(data);
    let mut out = Vec::new();
    let mut buf = vec![0_u8; OUT_STEP];
    let mut consumed = 0;
    while !self.finished {
      let room = match max_length {
        Some(max) => (max - out.len()).min(OUT_STEP),
        None => OUT_STEP,
      };
      if room == 0 {
        break;
      }
      let result =
        inflate(&mut self.state, &self.unconsumed[consumed..], &mut buf[..room], MZFlush::None);
      consumed += result.bytes_consumed;
      out.extend_from_slice(&buf[..result.bytes_written]);
      match result.status {
        Ok(MZStatus::StreamEnd) => self.finished = true,
        Ok(MZStatus::Ok) | Err(MZError::Buf) => {
          if result.bytes_consumed == 0 && result.bytes_written == 0 {
            break;
          }
        }
        Ok(MZStatus::NeedDict) => {
          return Err(PngError::CorruptImageData("image data asks for a preset dictionary"))
        }
        Err(_) => return Err(PngError::CorruptImageData("invalid deflate stream")),
      }
    }
    self.unconsumed.drain(..consumed);
    self.total_out += out.len() as u64;
    trace!(
      "decompressed {} bytes, {} input bytes waiting, finished: {}",
      out.len(),
      self.unconsumed.len(),
      self.finished
    );
    Ok(out)
  }

  /// If the deflate stream has reached its end marker.
  #[inline]
  #[must_use]
  pub const fn is_finished(&self) -> bool {
    self.finished
  }

  /// Total bytes produced so far.
  #[inline]
  #[must_use]
  pub const fn total_out(&self) -> u64 {
    self.total_out
  }

  /// Checks that the stream ended, and that nothing came after it.
  pub fn verify_end(&self) -> PngResult<()> {
    if !self.finished {
      Err(PngError::DecompressionNotFinished)
    } else if !self.unconsumed.is_empty() {
      Err(PngError::DecompressionFinishedEarly { trailing: self.unconsumed.len() })
    } else {
      Ok(())
    }
  }
}
