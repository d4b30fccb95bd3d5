use crate::{PngError, PngResult};

/// The filter applied to one scanline, given by its leading byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FilterType {
  None = 0,
  Sub = 1,
  Up = 2,
  Average = 3,
  Paeth = 4,
}
impl TryFrom<u8> for FilterType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> PngResult<Self> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Sub,
      2 => Self::Up,
      3 => Self::Average,
      4 => Self::Paeth,
      _ => return Err(PngError::syntax(format!("unknown filter type {value}"))),
    })
  }
}

#[inline]
#[must_use]
const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // Ties go to `a`, then `b`. The test order below is what decides that, so
  // it can't be rearranged.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Reverses `filter` on one scanline's bytes (without the filter type byte),
/// in place.
///
/// * `bytes_per_pixel` is the distance to the "left" byte, at least 1.
/// * `previous` is the already reconstructed scanline above, or an empty
///   slice for the first scanline of a pass (it's then treated as all 0).
pub fn reconstruct(filter: FilterType, bytes_per_pixel: usize, previous: &[u8], line: &mut [u8]) {
  debug_assert!(bytes_per_pixel > 0);
  let up = |x: usize| previous.get(x).copied().unwrap_or(0);
  match filter {
    FilterType::None => (),
    FilterType::Sub => {
      for x in bytes_per_pixel..line.len() {
        line[x] = line[x].wrapping_add(line[x - bytes_per_pixel]);
      }
    }
    FilterType::Up => {
      for (x, byte) in line.iter_mut().enumerate() {
        *byte = byte.wrapping_add(up(x));
      }
    }
    FilterType::Average => {
      for x in 0..line.len() {
        let a = if x >= bytes_per_pixel { line[x - bytes_per_pixel] } else { 0 };
        let b = up(x);
        line[x] = line[x].wrapping_add(((u16::from(a) + u16::from(b)) / 2) as u8);
      }
    }
    FilterType::Paeth => {
      for x in 0..line.len() {
        let (a, c) = if x >= bytes_per_pixel {
          (line[x - bytes_per_pixel], up(x - bytes_per_pixel))
        } else {
          (0, 0)
        };
        let b = up(x);
        line[x] = line[x].wrapping_add(paeth_predict(a, b, c));
      }
    }
  }
}

/// Reverses the filtering of a run of scanlines that all belong to one pass.
#[derive(Debug, Clone)]
pub struct ScanlineUnfilterer {
  bytes_per_pixel: usize,
  previous: Vec<u8>,
}
impl ScanlineUnfilterer {
  #[inline]
  #[must_use]
  pub fn new(bytes_per_pixel: usize) -> Self {
    Self { bytes_per_pixel: bytes_per_pixel.max(1), previous: Vec::new() }
  }

  /// Forgets the previous scanline, for when a new pass starts.
  #[inline]
  pub fn reset(&mut self) {
    self.previous.clear();
  }

  /// Unfilters one scanline, including its leading filter type byte.
  ///
  /// The reconstructed bytes are kept as the "previous" line for the next
  /// call.
  pub fn unfilter(&mut self, scanline: &[u8]) -> PngResult<&[u8]> {
    let (tag, filtered) =
      scanline.split_first().ok_or_else(|| PngError::syntax("scanline has no filter type"))?;
    let filter = FilterType::try_from(*tag)?;
    let mut line = filtered.to_vec();
    reconstruct(filter, self.bytes_per_pixel, &self.previous, &mut line);
    self.previous = line;
    Ok(&self.previous)
  }
}
