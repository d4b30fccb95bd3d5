#![forbid(unsafe_code)]

//! Provides a heap-allocated image type.

use pixel_formats::r8g8b8a8_Srgb;

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
///
/// You don't ever need to call this function yourself, but it's how
/// [`Bitmap`] converts 2d coordinates into index values within its pixel
/// vector.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize) * (width as usize) + (x as usize)
}

/// An owned direct-color image, stored top to bottom, left to right.
///
/// The fields are public, but if you put them together weirdly the methods of
/// this type will just return `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
#[cfg_attr(docs_rs, doc(cfg(feature = "bitmap")))]
pub struct Bitmap<P = r8g8b8a8_Srgb> {
  pub width: u32,
  pub height: u32,
  pub pixels: Vec<P>,
}
impl<P: Clone> Bitmap<P> {
  /// Makes an image with every pixel set to `fill`.
  ///
  /// Gives `None` if the allocator can't provide space for all the pixels.
  #[inline]
  #[must_use]
  pub fn try_new_filled(width: u32, height: u32, fill: P) -> Option<Self> {
    let pixel_count = (width as usize).checked_mul(height as usize)?;
    let mut pixels: Vec<P> = Vec::new();
    pixels.try_reserve_exact(pixel_count).ok()?;
    pixels.resize(pixel_count, fill);
    Some(Self { width, height, pixels })
  }
}
impl<P> Bitmap<P> {
  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<&P> {
    if x < self.width && y < self.height {
      self.pixels.get(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut P> {
    if x < self.width && y < self.height {
      let i = xy_width_to_index(x, y, self.width);
      self.pixels.get_mut(i)
    } else {
      None
    }
  }
}

#[test]
fn test_bitmap_indexing() {
  let mut b = Bitmap::try_new_filled(3, 2, 0_u8).unwrap();
  *b.get_mut(2, 1).unwrap() = 7;
  assert_eq!(b.pixels, [0, 0, 0, 0, 0, 7]);
  assert_eq!(b.get(2, 1), Some(&7));
  assert_eq!(b.get(3, 0), None);
  assert_eq!(b.get(0, 2), None);
  assert_eq!(xy_width_to_index(1, 1, 3), 4);
  assert!(Bitmap::try_new_filled(u32::MAX, u32::MAX, [0_u8; 4]).is_none());
}
