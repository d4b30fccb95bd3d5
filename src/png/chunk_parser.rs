use super::*;
use crate::{PngError, PngResult};

/// The chunk types whose data the decoder has to understand.
///
/// Most of these are "bounded": the data is small, gets collected in full,
/// and is then handed to [`parse_bounded`](Self::parse_bounded). `IDAT` is
/// "streaming", its data goes to an [`ImageDataStreamParser`] a piece at a
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkParserKind {
  ImageHeader,
  Palette,
  Trailer,
  ImageData,
}

/// The result of a bounded chunk parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedChunk {
  ImageHeader(ImageHeader),
  Palette(Palette),
  Trailer,
}

const PARSERS: [(ChunkType, ChunkParserKind); 4] = [
  (ChunkType::IHDR, ChunkParserKind::ImageHeader),
  (ChunkType::PLTE, ChunkParserKind::Palette),
  (ChunkType::IEND, ChunkParserKind::Trailer),
  (ChunkType::IDAT, ChunkParserKind::ImageData),
];

impl ChunkParserKind {
  /// The parser for a chunk type, if it has one.
  ///
  /// Chunks without a parser are still checked for order and CRC, but their
  /// data is skipped.
  #[inline]
  #[must_use]
  pub fn for_code(code: ChunkType) -> Option<Self> {
    PARSERS.iter().find(|(ty, _)| *ty == code).map(|(_, kind)| *kind)
  }

  /// Largest data size a bounded chunk may have, `None` for streaming.
  #[inline]
  #[must_use]
  pub const fn max_data_size(self) -> Option<usize> {
    match self {
      Self::ImageHeader => Some(ImageHeader::DATA_SIZE),
      Self::Palette => Some(Palette::MAX_DATA_SIZE),
      Self::Trailer => Some(0),
      Self::ImageData => None,
    }
  }

  #[inline]
  #[must_use]
  pub const fn is_streaming(self) -> bool {
    self.max_data_size().is_none()
  }

  /// Rejects a chunk whose declared length is already too big, before any of
  /// its data is read.
  pub fn check_length(self, head: &ChunkHeadToken) -> PngResult<()> {
    match self.max_data_size() {
      Some(max) if head.length as usize > max => Err(PngError::syntax(format!(
        "{} chunk at byte {} is {} bytes, must be at most {max}",
        head.code, head.position, head.length
      ))),
      _ => Ok(()),
    }
  }

  /// Parses the complete data of a bounded chunk.
  ///
  /// `header` must be given for anything other than the header itself.
  pub fn parse_bounded(self, data: &[u8], header: Option<&ImageHeader>) -> PngResult<ParsedChunk> {
    match self {
      Self::ImageHeader => ImageHeader::parse(data).map(ParsedChunk::ImageHeader),
      Self::Palette => {
        let header = header.ok_or_else(|| PngError::syntax("PLTE before IHDR"))?;
        Palette::parse(data, header).map(ParsedChunk::Palette)
      }
      Self::Trailer => parse_iend(data).map(|()| ParsedChunk::Trailer),
      Self::ImageData => Err(PngError::StreamState("IDAT data must be streamed")),
    }
  }
}
