use core::fmt::{Debug, Display, Write};

use crate::{PngError, PngResult};

/// Bit 5 of each type code byte is a property flag (lowercase means "set").
const PROPERTY_BIT: u8 = 0b0010_0000;

/// A 4-byte chunk type code.
///
/// Every byte is an ASCII letter (`A-Z` or `a-z`). The case of each letter
/// carries one property bit, see the `is_` methods.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType([u8; 4]);
#[allow(nonstandard_style)]
impl ChunkType {
  // critical
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  // before palette
  pub const cHRM: Self = Self(*b"cHRM");
  pub const gAMA: Self = Self(*b"gAMA");
  pub const iCCP: Self = Self(*b"iCCP");
  pub const sBIT: Self = Self(*b"sBIT");
  pub const sRGB: Self = Self(*b"sRGB");
  // after palette, before data
  pub const bKGD: Self = Self(*b"bKGD");
  pub const hIST: Self = Self(*b"hIST");
  pub const tRNS: Self = Self(*b"tRNS");
  // before data
  pub const pHYs: Self = Self(*b"pHYs");
  pub const sPLT: Self = Self(*b"sPLT");
  // anywhere
  pub const tIME: Self = Self(*b"tIME");
  pub const iTXt: Self = Self(*b"iTXt");
  pub const tEXt: Self = Self(*b"tEXt");
  pub const zTXt: Self = Self(*b"zTXt");
}

impl ChunkType {
  /// Makes a chunk type, or `None` if any byte isn't an ASCII letter.
  #[inline]
  #[must_use]
  pub const fn new(code: [u8; 4]) -> Option<Self> {
    if code[0].is_ascii_alphabetic()
      && code[1].is_ascii_alphabetic()
      && code[2].is_ascii_alphabetic()
      && code[3].is_ascii_alphabetic()
    {
      Some(Self(code))
    } else {
      None
    }
  }

  /// The raw code bytes.
  #[inline]
  #[must_use]
  pub const fn code(&self) -> [u8; 4] {
    self.0
  }

  /// Ancillary chunks can be skipped by a decoder; critical ones can't.
  #[inline]
  #[must_use]
  pub const fn is_ancillary(&self) -> bool {
    self.0[0] & PROPERTY_BIT != 0
  }
  /// Private chunks aren't part of the public registry.
  #[inline]
  #[must_use]
  pub const fn is_private(&self) -> bool {
    self.0[1] & PROPERTY_BIT != 0
  }
  /// Must be unset in all chunks conforming to PNG 1.2.
  #[inline]
  #[must_use]
  pub const fn is_reserved(&self) -> bool {
    self.0[2] & PROPERTY_BIT != 0
  }
  /// Whether an editor that doesn't understand the chunk may still copy it.
  #[inline]
  #[must_use]
  pub const fn is_safe_to_copy(&self) -> bool {
    self.0[3] & PROPERTY_BIT != 0
  }

  /// Where this chunk type may appear, or `None` for unknown types.
  #[inline]
  #[must_use]
  pub fn ordering_class(&self) -> Option<OrderingClass> {
    KNOWN_CHUNK_TYPES.iter().find(|(ty, _)| ty == self).map(|(_, class)| *class)
  }

  /// If this is one of the chunk types defined by PNG 1.2.
  #[inline]
  #[must_use]
  pub fn is_known(&self) -> bool {
    self.ordering_class().is_some()
  }

  /// If more than one chunk of this type may appear in a stream.
  ///
  /// Unknown types are always allowed to repeat.
  #[inline]
  #[must_use]
  pub fn allows_multiple(&self) -> bool {
    !self.is_known() || MULTIPLE_ALLOWED.contains(self)
  }
}

impl TryFrom<[u8; 4]> for ChunkType {
  type Error = PngError;
  #[inline]
  fn try_from(code: [u8; 4]) -> PngResult<Self> {
    Self::new(code)
      .ok_or_else(|| PngError::syntax(format!("invalid chunk type code {code:02X?}")))
  }
}

impl Debug for ChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char(self.0[0] as char)?;
    f.write_char(self.0[1] as char)?;
    f.write_char(self.0[2] as char)?;
    f.write_char(self.0[3] as char)?;
    Ok(())
  }
}
impl Display for ChunkType {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    Debug::fmt(self, f)
  }
}

/// The ordering groups that the known chunk types fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderingClass {
  /// `IHDR`, `PLTE`, `IDAT`, `IEND`, each with its own rule.
  Critical,
  /// `cHRM`, `gAMA`, `iCCP`, `sBIT`, `sRGB`: before `PLTE` and `IDAT`.
  BeforePalette,
  /// `bKGD`, `hIST`, `tRNS`: after `PLTE`, before `IDAT`.
  AfterPaletteBeforeData,
  /// `pHYs`, `sPLT`: before `IDAT`.
  BeforeData,
  /// `tIME`, `iTXt`, `tEXt`, `zTXt`: no constraint.
  AllowedAnywhere,
}

/// Every chunk type PNG 1.2 defines, with its ordering class.
pub const KNOWN_CHUNK_TYPES: [(ChunkType, OrderingClass); 18] = [
  (ChunkType::IHDR, OrderingClass::Critical),
  (ChunkType::PLTE, OrderingClass::Critical),
  (ChunkType::IDAT, OrderingClass::Critical),
  (ChunkType::IEND, OrderingClass::Critical),
  (ChunkType::cHRM, OrderingClass::BeforePalette),
  (ChunkType::gAMA, OrderingClass::BeforePalette),
  (ChunkType::iCCP, OrderingClass::BeforePalette),
  (ChunkType::sBIT, OrderingClass::BeforePalette),
  (ChunkType::sRGB, OrderingClass::BeforePalette),
  (ChunkType::bKGD, OrderingClass::AfterPaletteBeforeData),
  (ChunkType::hIST, OrderingClass::AfterPaletteBeforeData),
  (ChunkType::tRNS, OrderingClass::AfterPaletteBeforeData),
  (ChunkType::pHYs, OrderingClass::BeforeData),
  (ChunkType::sPLT, OrderingClass::BeforeData),
  (ChunkType::tIME, OrderingClass::AllowedAnywhere),
  (ChunkType::iTXt, OrderingClass::AllowedAnywhere),
  (ChunkType::tEXt, OrderingClass::AllowedAnywhere),
  (ChunkType::zTXt, OrderingClass::AllowedAnywhere),
];

const MULTIPLE_ALLOWED: [ChunkType; 5] =
  [ChunkType::IDAT, ChunkType::sPLT, ChunkType::iTXt, ChunkType::tEXt, ChunkType::zTXt];
