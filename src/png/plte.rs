use core::fmt::Debug;

use log::debug;

use super::*;
use crate::{PngError, PngResult};

/// Palette data, the content of the `PLTE` chunk.
///
/// Palette entries are always RGB.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Palette(Vec<[u8; 3]>);
impl Palette {
  /// Largest possible `PLTE` data size (256 entries).
  pub const MAX_DATA_SIZE: usize = 256 * 3;

  /// Parses and checks the data of a `PLTE` chunk against the image header.
  pub fn parse(data: &[u8], header: &ImageHeader) -> PngResult<Self> {
    if matches!(header.color_type, ColorType::Grayscale | ColorType::GrayscaleAlpha) {
      return Err(PngError::syntax(format!(
        "PLTE is not allowed with color type {:?}",
        header.color_type
      )));
    }
    if data.is_empty() || data.len() % 3 != 0 || data.len() > Self::MAX_DATA_SIZE {
      return Err(PngError::syntax(format!(
        "PLTE data must be a multiple of 3 from 3 to {}, found {}",
        Self::MAX_DATA_SIZE,
        data.len()
      )));
    }
    if header.color_type == ColorType::Indexed {
      let limit = 3_usize << header.bit_depth;
      if data.len() > limit {
        return Err(PngError::syntax(format!(
          "PLTE has {} entries, bit depth {} allows {}",
          data.len() / 3,
          header.bit_depth,
          limit / 3
        )));
      }
    }
    let entries: &[[u8; 3]] = bytemuck::try_cast_slice(data)
      .map_err(|_| PngError::syntax("PLTE data is not whole entries"))?;
    let palette = Self(entries.to_vec());
    debug!("{palette:?}");
    Ok(palette)
  }

  /// Gets the entries as a slice.
  #[inline]
  #[must_use]
  pub fn entries(&self) -> &[[u8; 3]] {
    &self.0
  }

  /// Looks up one entry.
  #[inline]
  #[must_use]
  pub fn get(&self, index: usize) -> Option<[u8; 3]> {
    self.0.get(index).copied()
  }

  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.0.len()
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}
impl Debug for Palette {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    // currently prints no more than 4 palette entries
    f.debug_tuple("Palette").field(&&self.0[..self.0.len().min(4)]).field(&self.0.len()).finish()
  }
}
