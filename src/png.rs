#![forbid(unsafe_code)]

//! Module for working with PNG data.
//!
//! * [PNG (Portable Network Graphics) Specification, Version 1.2][png-spec]
//!
//! [png-spec]: http://www.libpng.org/pub/png/spec/1.2/PNG-Contents.html
//!
//! ## Automatic Decoding
//!
//! Call [`decode_png`] on bytes in memory, or use a [`PngDecoder`] with any
//! [`Read`](std::io::Read) source. If the `bitmap` feature is on, the result
//! can be turned into an RGBA [`Bitmap`](crate::image::Bitmap) with
//! `DecodedPng::to_bitmap`.
//!
//! ## Manual Decoding
//!
//! Each stage of the decoder is available on its own:
//!
//! 1) A [`ChunkTokenStream`] frames the source into [`ChunkToken`]s: a head,
//!    the data in parts of no more than 4096 bytes, and an end, for each
//!    chunk. It checks the signature, chunk lengths, type codes, CRCs, and the
//!    overall size limit.
//! 2) Give each chunk's type to a [`ChunkOrderParser`] as the chunk starts,
//!    and call [`validate_end`](ChunkOrderParser::validate_end) when the
//!    tokens run out.
//! 3) [`ChunkParserKind::for_code`] says which chunks need their data parsed.
//!    The bounded ones are [`ImageHeader::parse`], [`Palette::parse`], and
//!    [`parse_iend`].
//! 4) Give the data of every `IDAT` chunk to an [`ImageDataStreamParser`],
//!    once that chunk's CRC has been checked, then
//!    [`finish`](ImageDataStreamParser::finish) it to get the reconstructed
//!    scanlines of each pass.
//!
//! ## Parsing Errors
//!
//! This decoder is strict. The first violation of the format ends the decode
//! with a [`PngError`](crate::PngError), nothing is skipped or repaired.
//! Ancillary chunks are checked for placement, repetition, and CRC, even
//! though their contents aren't otherwise used.

mod chunk_order;
mod chunk_parser;
mod chunk_type;
mod crc32;
mod decoder;
mod deflate;
mod iend;
mod ihdr;
mod image_data;
mod interlace;
mod plte;
mod token;
mod token_stream;
mod unfilter;

#[cfg(feature = "bitmap")]
mod bitmap;

pub use self::{
  chunk_order::*, chunk_parser::*, chunk_type::*, crc32::png_crc, decoder::*, deflate::*,
  iend::*, ihdr::*, image_data::*, interlace::*, plte::*, token::*, token_stream::*,
  unfilter::*,
};

pub(crate) use self::crc32::RunningCrc;

/// Checks if the PNG signature is correct.
#[inline]
#[must_use]
pub fn is_png_signature_correct(bytes: &[u8]) -> bool {
  bytes.starts_with(&PNG_SIGNATURE)
}
