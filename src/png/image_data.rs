use log::debug;

use super::*;
use crate::{DecoderOptions, PngError, PngResult};

/// One scanline after its filter has been reversed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReconstructedScanline {
  /// The pass that this line belongs to.
  pub pass: Pass,
  /// Row within the pass's reduced image.
  pub reduced_y: u32,
  pub bit_depth: u8,
  pub color_type: ColorType,
  /// The unfiltered bytes, without the filter type byte.
  pub data: Vec<u8>,
}
impl ReconstructedScanline {
  /// Full image location of each pixel in this line, left to right.
  #[inline]
  pub fn coordinates(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
    (0..self.pass.width).map(move |x| self.pass.full_position(x, self.reduced_y))
  }

  /// Every sample value of the line in order, `samples_per_pixel` values for
  /// each pixel.
  ///
  /// Sub-byte samples are unpacked high bits first, 16-bit samples are big
  /// endian. Padding bits at the end of the line are dropped.
  #[must_use]
  pub fn samples(&self) -> Vec<u16> {
    let count = self.pass.width as usize * self.color_type.samples_per_pixel();
    match self.bit_depth {
      16 => self.data.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]])).collect(),
      8 => self.data.iter().map(|byte| u16::from(*byte)).collect(),
      depth => {
        let per_byte = 8 / depth;
        let mask = (1_u8 << depth) - 1;
        self
          .data
          .iter()
          .flat_map(|byte| {
            (0..per_byte).map(move |i| u16::from((byte >> (8 - depth * (i + 1))) & mask))
          })
          .take(count)
          .collect()
      }
    }
  }
}

/// The image data of a PNG: every reconstructed scanline, pass by pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
  pub header: ImageHeader,
  pub scanlines: Vec<ReconstructedScanline>,
}

/// Decompresses and unfilters the image data of one image.
///
/// Feed it the data of every `IDAT` chunk in order, in pieces of any size,
/// then call [`finish`](Self::finish).
#[derive(Debug)]
pub struct ImageDataStreamParser {
  header: ImageHeader,
  decompressor: Deflate32kDecompressor,
  /// Non-empty passes only.
  passes: Vec<Pass>,
  pass_index: usize,
  reduced_y: u32,
  unfilterer: ScanlineUnfilterer,
  /// Decompressed bytes that don't yet make a full scanline.
  pending: Vec<u8>,
  /// Decompressed bytes still expected.
  remaining: u64,
  scanlines: Vec<ReconstructedScanline>,
}
impl ImageDataStreamParser {
  /// Prepares to decode the image described by `header`, with the default
  /// limits.
  #[inline]
  pub fn new(header: &ImageHeader) -> PngResult<Self> {
    Self::with_options(header, DecoderOptions::default())
  }

  /// Prepares to decode the image described by `header`.
  ///
  /// ## Failure
  /// * The header's width or height is past the limit in `options`.
  pub fn with_options(header: &ImageHeader, options: DecoderOptions) -> PngResult<Self> {
    if !header.color_type.allows_bit_depth(header.bit_depth) {
      return Err(PngError::UnsupportedField(format!(
        "{}-bit {:?} image data",
        header.bit_depth, header.color_type
      )));
    }
    if header.width == 0 || header.height == 0 {
      return Err(PngError::UnsupportedField(format!(
        "{}x{} image data",
        header.width, header.height
      )));
    }
    if header.width > options.max_width() || header.height > options.max_height() {
      return Err(PngError::DimensionsTooLarge { width: header.width, height: header.height });
    }
    let passes: Vec<Pass> = passes(header).into_iter().filter(|pass| !pass.is_empty()).collect();
    let remaining = passes
      .iter()
      .map(|pass| (pass.height as u64).saturating_mul(header.bytes_per_filterline(pass.width) as u64))
      .fold(0_u64, u64::saturating_add);
    debug!("expecting {remaining} bytes of image data over {} passes", passes.len());
    Ok(Self {
      header: *header,
      decompressor: Deflate32kDecompressor::new(),
      passes,
      pass_index: 0,
      reduced_y: 0,
      unfilterer: ScanlineUnfilterer::new(header.filter_bytes_per_pixel()),
      pending: Vec::new(),
      remaining,
      scanlines: Vec::new(),
    })
  }

  /// Decompressed bytes still needed to complete the image.
  #[inline]
  #[must_use]
  pub const fn remaining(&self) -> u64 {
    self.remaining
  }

  /// Takes the scanlines completed so far.
  #[inline]
  pub fn take_scanlines(&mut self) -> Vec<ReconstructedScanline> {
    core::mem::take(&mut self.scanlines)
  }

  /// Adds more compressed image data.
  pub fn feed(&mut self, data: &[u8]) -> PngResult<()> {
    // Asking for one byte more than we need is how extra data gets noticed.
    let cap = usize::try_from(self.remaining.saturating_add(1)).unwrap_or(usize::MAX);
    let out = self.decompressor.decompress(data, Some(cap))?;
    if out.len() as u64 > self.remaining {
      return Err(PngError::syntax("too much image data"));
    }
    self.remaining -= out.len() as u64;
    self.pending.try_reserve(out.len())?;
    self.pending.extend_from_slice(&out);
    self.reconstruct_pending()
  }

  /// Checks that the image data is complete and ended properly.
  pub fn finish(mut self) -> PngResult<ImageData> {
    self.feed(&[])?;
    if self.remaining > 0 {
      return Err(if self.decompressor.is_finished() {
        PngError::syntax(format!("image data ended early, {} bytes short", self.remaining))
      } else {
        PngError::DecompressionNotFinished
      });
    }
    self.decompressor.verify_end()?;
    debug!("image data complete, {} scanlines", self.scanlines.len());
    Ok(ImageData { header: self.header, scanlines: self.scanlines })
  }

  fn reconstruct_pending(&mut self) -> PngResult<()> {
    let mut start = 0;
    while let Some(pass) = self.passes.get(self.pass_index).copied() {
      let line_len = self.header.bytes_per_filterline(pass.width);
      let Some(line) = self.pending.get(start..start + line_len) else {
        break;
      };
      start += line_len;
      let line = self.unfilterer.unfilter(line)?;
      let mut data = Vec::new();
      data.try_reserve_exact(line.len())?;
      data.extend_from_slice(line);
      self.scanlines.try_reserve(1)?;
      self.scanlines.push(ReconstructedScanline {
        pass,
        reduced_y: self.reduced_y,
        bit_depth: self.header.bit_depth,
        color_type: self.header.color_type,
        data,
      });
      self.reduced_y += 1;
      if self.reduced_y == pass.height {
        debug!("pass {} done, {}x{}", pass.index, pass.width, pass.height);
        self.pass_index += 1;
        self.reduced_y = 0;
        self.unfilterer.reset();
      }
    }
    self.pending.drain(..start);
    Ok(())
  }
}
