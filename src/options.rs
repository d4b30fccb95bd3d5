//! Decoder configuration.

/// The most bytes a decode will ever read from its source: 20 MiB.
pub const PNG_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// The most chunk data bytes handed out in a single data part token: 4 KiB.
pub const PNG_CHUNK_MAX_DATA_READ: usize = 4 * 1024;

/// The smallest allowed data part size.
///
/// A full palette chunk (length, type, 768 data bytes, CRC) is 780 bytes and
/// must always fit in one read.
pub const PNG_CHUNK_MIN_DATA_READ: usize = 780;

/// Default limit on image width and height: 16,384 pixels.
pub const PNG_DEFAULT_MAX_DIMENSION: u32 = 1 << 14;

/// Limits applied while decoding.
///
/// The byte limits can only be made more restrictive. The image dimension
/// limits can be raised, up to the format's own limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
  max_total_bytes: u64,
  max_data_part: usize,
  max_width: u32,
  max_height: u32,
}

impl Default for DecoderOptions {
  #[inline]
  fn default() -> Self {
    Self {
      max_total_bytes: PNG_MAX_FILE_SIZE,
      max_data_part: PNG_CHUNK_MAX_DATA_READ,
      max_width: PNG_DEFAULT_MAX_DIMENSION,
      max_height: PNG_DEFAULT_MAX_DIMENSION,
    }
  }
}

impl DecoderOptions {
  /// Total bytes the decoder may read from its source.
  ///
  /// - Default value: 20 MiB
  #[inline]
  #[must_use]
  pub const fn max_total_bytes(&self) -> u64 {
    self.max_total_bytes
  }

  /// Sets the total byte budget, clamped to at most 20 MiB.
  #[inline]
  #[must_use]
  pub const fn set_max_total_bytes(mut self, bytes: u64) -> Self {
    self.max_total_bytes = if bytes < PNG_MAX_FILE_SIZE { bytes } else { PNG_MAX_FILE_SIZE };
    self
  }

  /// Largest data part token the token stream will produce.
  ///
  /// - Default value: 4096
  #[inline]
  #[must_use]
  pub const fn max_data_part(&self) -> usize {
    self.max_data_part
  }

  /// Sets the data part size, clamped to `780..=4096`.
  #[inline]
  #[must_use]
  pub const fn set_max_data_part(mut self, bytes: usize) -> Self {
    self.max_data_part = if bytes < PNG_CHUNK_MIN_DATA_READ {
      PNG_CHUNK_MIN_DATA_READ
    } else if bytes > PNG_CHUNK_MAX_DATA_READ {
      PNG_CHUNK_MAX_DATA_READ
    } else {
      bytes
    };
    self
  }

  /// Widest image the decoder will reconstruct.
  ///
  /// A header is only 13 bytes, but the image it describes decides how much
  /// memory the decode needs.
  ///
  /// - Default value: 16384
  #[inline]
  #[must_use]
  pub const fn max_width(&self) -> u32 {
    self.max_width
  }

  /// Sets the width limit.
  #[inline]
  #[must_use]
  pub const fn set_max_width(mut self, width: u32) -> Self {
    self.max_width = width;
    self
  }

  /// Tallest image the decoder will reconstruct.
  ///
  /// - Default value: 16384
  #[inline]
  #[must_use]
  pub const fn max_height(&self) -> u32 {
    self.max_height
  }

  /// Sets the height limit.
  #[inline]
  #[must_use]
  pub const fn set_max_height(mut self, height: u32) -> Self {
    self.max_height = height;
    self
  }
}

#[test]
fn test_options_only_tighten() {
  let opts = DecoderOptions::default().set_max_total_bytes(u64::MAX).set_max_data_part(1 << 20);
  assert_eq!(opts, DecoderOptions::default());
  let opts = DecoderOptions::default().set_max_total_bytes(100).set_max_data_part(1);
  assert_eq!(opts.max_total_bytes(), 100);
  assert_eq!(opts.max_data_part(), PNG_CHUNK_MIN_DATA_READ);
  let opts = DecoderOptions::default().set_max_width(1 << 20).set_max_height(5);
  assert_eq!((opts.max_width(), opts.max_height()), (1 << 20, 5));
}
