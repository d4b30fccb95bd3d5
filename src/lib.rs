#![cfg_attr(docs_rs, feature(doc_cfg))]
#![forbid(unsafe_code)]
//#![warn(missing_docs)]

//! A strict decoder for PNG data.
//!
//! Unlike a "do your best" image loader, this crate treats its input as
//! untrusted and refuses anything the PNG 1.2 rules don't allow: bad
//! signatures, bad chunk checksums, chunks in the wrong order or repeated
//! when they may only appear once, invalid header fields, bad filter tags,
//! and compressed image data that doesn't end exactly where it should.
//!
//! The work is split into layers that can each be used on their own:
//!
//! * [`ChunkTokenStream`](png::ChunkTokenStream) frames a byte source into
//!   chunk tokens while checking CRCs and size limits.
//! * [`ChunkOrderParser`](png::ChunkOrderParser) checks the sequence of chunk
//!   types.
//! * [`ImageHeader`](png::ImageHeader), [`Palette`](png::Palette), and
//!   [`parse_iend`](png::parse_iend) decode the chunks that control decoding.
//! * [`ImageDataStreamParser`](png::ImageDataStreamParser) decompresses the
//!   image data and reverses the scanline filters.
//! * [`PngDecoder`](png::PngDecoder) runs all of the above in order.

pub mod error;
pub use error::*;

pub mod options;
pub use options::*;

#[cfg(feature = "bitmap")]
pub mod image;

pub mod png;
