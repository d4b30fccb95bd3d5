use bitfrob::u8_replicate_bits;
use pixel_formats::r8g8b8a8_Srgb;

use super::*;
use crate::{image::Bitmap, PngError, PngResult};

/// Scales one sample to 8 bits.
#[inline]
#[must_use]
fn sample_to_u8(sample: u16, bit_depth: u8) -> u8 {
  match bit_depth {
    16 => (sample >> 8) as u8,
    8 => sample as u8,
    depth => u8_replicate_bits(u32::from(depth), sample as u8),
  }
}

impl DecodedPng {
  /// Combines all of the image's scanlines into a single RGBA raster.
  ///
  /// * Samples of less than 8 bits are scaled up by bit replication.
  /// * 16-bit samples keep only their high byte.
  /// * Indexed pixels are looked up in the palette.
  /// * Images without an alpha channel are fully opaque.
  ///
  /// No gamma or other color correction is done.
  ///
  /// ## Failure
  /// * Allocation failure.
  /// * An indexed pixel names an entry past the end of the palette.
  #[cfg_attr(docs_rs, doc(cfg(feature = "bitmap")))]
  pub fn to_bitmap(&self) -> PngResult<Bitmap<r8g8b8a8_Srgb>> {
    let header = &self.header;
    let depth = header.bit_depth;
    let spp = header.color_type.samples_per_pixel();
    let mut bitmap = Bitmap::try_new_filled(header.width, header.height, r8g8b8a8_Srgb::default())
      .ok_or(PngError::Alloc)?;
    for line in &self.image.scanlines {
      let samples = line.samples();
      for ((x, y), pixel) in line.coordinates().zip(samples.chunks_exact(spp)) {
        let color = match (header.color_type, pixel) {
          (ColorType::Grayscale, [v]) => {
            let v = sample_to_u8(*v, depth);
            r8g8b8a8_Srgb { r: v, g: v, b: v, a: 0xFF }
          }
          (ColorType::GrayscaleAlpha, [v, a]) => {
            let v = sample_to_u8(*v, depth);
            r8g8b8a8_Srgb { r: v, g: v, b: v, a: sample_to_u8(*a, depth) }
          }
          (ColorType::Rgb, [r, g, b]) => r8g8b8a8_Srgb {
            r: sample_to_u8(*r, depth),
            g: sample_to_u8(*g, depth),
            b: sample_to_u8(*b, depth),
            a: 0xFF,
          },
          (ColorType::RgbAlpha, [r, g, b, a]) => r8g8b8a8_Srgb {
            r: sample_to_u8(*r, depth),
            g: sample_to_u8(*g, depth),
            b: sample_to_u8(*b, depth),
            a: sample_to_u8(*a, depth),
          },
          (ColorType::Indexed, [i]) => {
            let [r, g, b] = self
              .palette
              .as_ref()
              .and_then(|palette| palette.get(usize::from(*i)))
              .ok_or_else(|| {
                PngError::syntax(format!("pixel ({x},{y}) uses palette index {i}, past the end"))
              })?;
            r8g8b8a8_Srgb { r, g, b, a: 0xFF }
          }
          _ => return Err(PngError::StreamState("scanline samples don't match the color type")),
        };
        if let Some(p) = bitmap.get_mut(x, y) {
          *p = color;
        }
      }
    }
    Ok(bitmap)
  }
}
