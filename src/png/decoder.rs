use std::io::Read;

use log::debug;

use super::*;
use crate::{DecoderOptions, PngError, PngResult};

/// Everything a successful decode produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPng {
  pub header: ImageHeader,
  /// Present if the stream had a `PLTE` chunk, which is always the case for
  /// indexed color.
  pub palette: Option<Palette>,
  pub image: ImageData,
  /// Size of the whole stream.
  pub total_bytes_read: u64,
}

/// Runs a whole decode: framing, chunk order, the critical chunk parsers, and
/// the image data.
///
/// Ancillary chunks are framed, CRC checked, and order checked, but their
/// data is otherwise skipped.
pub struct PngDecoder<R> {
  tokens: ChunkTokenStream<R>,
  options: DecoderOptions,
}
impl<R: Read> PngDecoder<R> {
  /// Makes a decoder with the default limits.
  #[inline]
  pub fn new(source: R) -> Self {
    Self::with_options(source, DecoderOptions::default())
  }

  /// Makes a decoder with the given limits.
  #[inline]
  pub fn with_options(source: R, options: DecoderOptions) -> Self {
    Self { tokens: ChunkTokenStream::with_options(source, options), options }
  }

  /// Decodes the entire stream.
  #[inline]
  pub fn decode(self) -> PngResult<DecodedPng> {
    self.decode_with_tokens(|_| ())
  }

  /// Decodes the entire stream, showing each token to `on_token` as it
  /// arrives.
  ///
  /// The callback sees a token before that token is checked any further, so
  /// the last token seen before an error is the one that caused it.
  pub fn decode_with_tokens<F: FnMut(&ChunkToken)>(mut self, mut on_token: F) -> PngResult<DecodedPng> {
    let mut order = ChunkOrderParser::new();
    let mut header: Option<ImageHeader> = None;
    let mut palette: Option<Palette> = None;
    let mut image_parser: Option<ImageDataStreamParser> = None;
    let mut image: Option<ImageData> = None;
    // the current chunk's parser and its data, collected until the CRC is checked
    let mut kind: Option<ChunkParserKind> = None;
    let mut chunk_data: Vec<u8> = Vec::new();
    //
    for token in &mut self.tokens {
      let token = token?;
      on_token(&token);
      match token {
        ChunkToken::Head(head) => {
          order.validate(head.code)?;
          if head.code != ChunkType::IDAT {
            if let Some(parser) = image_parser.take() {
              image = Some(parser.finish()?);
            }
          }
          kind = ChunkParserKind::for_code(head.code);
          match kind {
            Some(ChunkParserKind::ImageData) => {
              if image_parser.is_none() {
                let header =
                  header.as_ref().ok_or_else(|| PngError::syntax("IDAT before IHDR"))?;
                if header.color_type == ColorType::Indexed && palette.is_none() {
                  return Err(PngError::syntax("indexed color image data without a PLTE"));
                }
                image_parser = Some(ImageDataStreamParser::with_options(header, self.options)?);
              }
            }
            Some(k) => k.check_length(&head)?,
            None => debug!("skipping {} chunk at byte {}", head.code, head.position),
          }
          chunk_data.clear();
        }
        ChunkToken::DataPart(part) => {
          if kind.is_some() {
            chunk_data.try_reserve(part.data.len())?;
            chunk_data.extend_from_slice(&part.data);
          }
        }
        // The token stream only gives an End once the CRC matched, so no
        // chunk's data is used before then.
        ChunkToken::End(_) => match (kind.take(), image_parser.as_mut()) {
          (Some(ChunkParserKind::ImageData), Some(parser)) => parser.feed(&chunk_data)?,
          (Some(k), _) if !k.is_streaming() => {
            match k.parse_bounded(&chunk_data, header.as_ref())? {
              ParsedChunk::ImageHeader(h) => header = Some(h),
              ParsedChunk::Palette(p) => palette = Some(p),
              ParsedChunk::Trailer => (),
            }
          }
          _ => (),
        },
      }
    }
    order.validate_end()?;
    // IEND always comes after the IDAT run, so the image is done by now.
    match (header, image) {
      (Some(header), Some(image)) => {
        Ok(DecodedPng { header, palette, image, total_bytes_read: self.tokens.total_bytes_read() })
      }
      _ => Err(PngError::syntax("no image data")),
    }
  }
}

/// Decodes PNG data that's already entirely in memory.
#[inline]
pub fn decode_png(bytes: &[u8]) -> PngResult<DecodedPng> {
  PngDecoder::new(bytes).decode()
}
