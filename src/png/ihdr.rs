use log::debug;

use crate::{PngError, PngResult};

/// Largest width or height an image may declare.
pub const PNG_MAX_DIMENSION: u32 = (1 << 31) - 1;

/// Which sample channels each pixel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ColorType {
  /// Greyscale
  Grayscale = 0,
  /// Red, Green, Blue
  Rgb = 2,
  /// Index into a palette.
  ///
  /// The stored value is the index, so there's only one sample per pixel.
  Indexed = 3,
  /// Greyscale + Alpha
  GrayscaleAlpha = 4,
  /// Red, Green, Blue, Alpha
  RgbAlpha = 6,
}
impl ColorType {
  /// The number of samples in each pixel of this color type.
  #[inline]
  #[must_use]
  pub const fn samples_per_pixel(self) -> usize {
    match self {
      Self::Grayscale => 1,
      Self::Rgb => 3,
      Self::Indexed => 1,
      Self::GrayscaleAlpha => 2,
      Self::RgbAlpha => 4,
    }
  }

  /// The bit depths that this color type may use.
  #[inline]
  #[must_use]
  pub const fn allowed_bit_depths(self) -> &'static [u8] {
    match self {
      Self::Grayscale => &[1, 2, 4, 8, 16],
      Self::Indexed => &[1, 2, 4, 8],
      Self::Rgb | Self::GrayscaleAlpha | Self::RgbAlpha => &[8, 16],
    }
  }

  /// If `bit_depth` is allowed with this color type.
  #[inline]
  #[must_use]
  pub fn allows_bit_depth(self, bit_depth: u8) -> bool {
    self.allowed_bit_depths().contains(&bit_depth)
  }
}
impl TryFrom<u8> for ColorType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> PngResult<Self> {
    Ok(match value {
      0 => ColorType::Grayscale,
      2 => ColorType::Rgb,
      3 => ColorType::Indexed,
      4 => ColorType::GrayscaleAlpha,
      6 => ColorType::RgbAlpha,
      _ => return Err(PngError::syntax(format!("unknown color type {value}"))),
    })
  }
}

/// The only compression method: deflate with at most a 32 KiB window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum CompressionMethod {
  #[default]
  Deflate32k,
}
impl TryFrom<u8> for CompressionMethod {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> PngResult<Self> {
    match value {
      0 => Ok(Self::Deflate32k),
      _ => Err(PngError::UnsupportedField(format!("compression method {value}"))),
    }
  }
}

/// The only filter method: a per-scanline choice of five filter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FilterMethod {
  #[default]
  AdaptiveFiveBasic,
}
impl TryFrom<u8> for FilterMethod {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> PngResult<Self> {
    match value {
      0 => Ok(Self::AdaptiveFiveBasic),
      _ => Err(PngError::UnsupportedField(format!("filter method {value}"))),
    }
  }
}

/// How the image data is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum InterlaceMethod {
  /// Plain top to bottom scanlines.
  #[default]
  None,
  /// Seven passes, each a sparse sub-image.
  ///
  /// please don't make new interlaced images, they're terrible.
  Adam7,
}
impl TryFrom<u8> for InterlaceMethod {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> PngResult<Self> {
    match value {
      0 => Ok(Self::None),
      1 => Ok(Self::Adam7),
      _ => Err(PngError::UnsupportedField(format!("interlace method {value}"))),
    }
  }
}

/// Image Header, the content of the `IHDR` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageHeader {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per sample
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: ColorType,
  pub compression_method: CompressionMethod,
  pub filter_method: FilterMethod,
  pub interlace_method: InterlaceMethod,
}
impl ImageHeader {
  /// Size of an `IHDR` chunk's data.
  pub const DATA_SIZE: usize = 13;

  /// Parses and checks the 13 bytes of an `IHDR` chunk.
  ///
  /// Checks are done in this order: the data length, width and height, bit
  /// depth, color type, the bit depth for that color type, then the three
  /// method fields.
  ///
  /// ## Failure
  /// * A compression, filter, or interlace method other than the ones listed
  ///   in the format is [`UnsupportedField`](PngError::UnsupportedField):
  ///   the byte is well formed, there's just no decoder for that method.
  /// * Every other problem is [`Syntax`](PngError::Syntax).
  pub fn parse(data: &[u8]) -> PngResult<Self> {
    let Ok([w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, compression_method, filter_method, interlace_method]) =
      <[u8; 13]>::try_from(data)
    else {
      return Err(PngError::syntax(format!(
        "IHDR data must be {} bytes, found {}",
        Self::DATA_SIZE,
        data.len()
      )));
    };
    let width = u32::from_be_bytes([w0, w1, w2, w3]);
    let height = u32::from_be_bytes([h0, h1, h2, h3]);
    for (name, dim) in [("width", width), ("height", height)] {
      if dim == 0 || dim > PNG_MAX_DIMENSION {
        return Err(PngError::syntax(format!("image {name} {dim} is out of range")));
      }
    }
    if ![1, 2, 4, 8, 16].contains(&bit_depth) {
      return Err(PngError::syntax(format!("bit depth {bit_depth} is not allowed")));
    }
    let color_type = ColorType::try_from(color_type)?;
    if !color_type.allows_bit_depth(bit_depth) {
      return Err(PngError::syntax(format!(
        "bit depth {bit_depth} is not allowed with color type {color_type:?}"
      )));
    }
    let header = Self {
      width,
      height,
      bit_depth,
      color_type,
      compression_method: CompressionMethod::try_from(compression_method)?,
      filter_method: FilterMethod::try_from(filter_method)?,
      interlace_method: InterlaceMethod::try_from(interlace_method)?,
    };
    debug!("{header:?}");
    Ok(header)
  }

  /// Bits used by each pixel.
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.color_type.samples_per_pixel()
  }

  /// Distance in bytes between a byte and the matching byte of the pixel to
  /// its left, for filtering. Never less than 1.
  #[inline]
  #[must_use]
  pub const fn filter_bytes_per_pixel(&self) -> usize {
    let bytes = (self.bits_per_pixel() + 7) / 8;
    if bytes == 0 {
      1
    } else {
      bytes
    }
  }

  /// Bytes in one scanline of an image `width` pixels wide, including the
  /// leading filter type byte.
  #[inline]
  #[must_use]
  pub const fn bytes_per_filterline(&self, width: u32) -> usize {
    // When pixels are less than 8 bits it's possible to end up with partial
    // bytes on the end, so we must round up.
    1 + ((self.bits_per_pixel() * (width as usize)) + 7) / 8
  }
}
