//! Pixel addressing for the two interlace methods.
//!
//! ```txt
//! 1 6 4 6 2 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! 3 6 4 6 3 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! ```

use super::*;

/// `(x_start, x_stride, y_start, y_stride)` for each Adam7 pass.
const ADAM7: [(u32, u32, u32, u32); 7] = [
  (0, 8, 0, 8),
  (4, 8, 0, 8),
  (0, 4, 4, 8),
  (2, 4, 0, 4),
  (0, 2, 2, 4),
  (1, 2, 0, 2),
  (0, 1, 1, 2),
];

/// One pass over the image: a (possibly sparse) grid of pixels that's stored
/// as its own reduced image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pass {
  /// 0 for a non-interlaced image, otherwise the Adam7 pass number 1 through
  /// 7.
  pub index: u8,
  pub x_start: u32,
  pub x_stride: u32,
  pub y_start: u32,
  pub y_stride: u32,
  /// Width of the reduced image.
  pub width: u32,
  /// Height of the reduced image.
  pub height: u32,
}
impl Pass {
  fn new(
    index: u8, (x_start, x_stride, y_start, y_stride): (u32, u32, u32, u32), full_width: u32,
    full_height: u32,
  ) -> Self {
    Self {
      index,
      x_start,
      x_stride,
      y_start,
      y_stride,
      width: reduced_dimension(full_width, x_start, x_stride),
      height: reduced_dimension(full_height, y_start, y_stride),
    }
  }

  /// If this pass holds no scanlines at all.
  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.width == 0 || self.height == 0
  }

  /// Converts a reduced image location into the full image location.
  #[inline]
  #[must_use]
  pub const fn full_position(&self, reduced_x: u32, reduced_y: u32) -> (u32, u32) {
    (self.x_start + reduced_x * self.x_stride, self.y_start + reduced_y * self.y_stride)
  }

  /// Every full image location covered by this pass, in the order the pixel
  /// data arrives: left to right along each reduced row, rows top to bottom.
  #[inline]
  pub fn coordinates(self) -> impl Iterator<Item = (u32, u32)> {
    (0..self.height)
      .flat_map(move |y| (0..self.width).map(move |x| self.full_position(x, y)))
  }
}

/// Size of a reduced image along one axis.
#[inline]
#[must_use]
const fn reduced_dimension(full: u32, start: u32, stride: u32) -> u32 {
  if full > start {
    (full - start + stride - 1) / stride
  } else {
    0
  }
}

/// The passes of an image, in the order their data is stored.
///
/// A non-interlaced image has a single pass that's the full image. An Adam7
/// image always has seven, some of which might be empty for small images.
#[must_use]
pub fn passes(header: &ImageHeader) -> Vec<Pass> {
  match header.interlace_method {
    InterlaceMethod::None => vec![Pass::new(0, (0, 1, 0, 1), header.width, header.height)],
    InterlaceMethod::Adam7 => ADAM7
      .iter()
      .zip(1..)
      .map(|(grid, index)| Pass::new(index, *grid, header.width, header.height))
      .collect(),
  }
}

/// Every pixel location of the image, in the order the pixel data arrives.
pub fn pixel_coordinates(header: &ImageHeader) -> impl Iterator<Item = (u32, u32)> {
  passes(header).into_iter().flat_map(Pass::coordinates)
}
