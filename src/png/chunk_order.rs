use std::collections::HashMap;

use log::trace;

use super::*;
use crate::{PngError, PngResult};

/// Where the decode currently is in the chunk sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChunkOrderState {
  /// Nothing seen yet, only `IHDR` may come next.
  #[default]
  BeforeHeader,
  /// Seen `IHDR`.
  BeforePalette,
  /// Seen `PLTE` or a chunk that must follow it.
  AfterPaletteBeforeData,
  /// Inside the run of `IDAT` chunks.
  DuringData,
  /// The `IDAT` run has ended, no more `IDAT` may follow.
  AfterData,
  /// Seen `IEND`. This is the only accepting state.
  AfterTrailer,
}

/// Counts chunk types and rejects repeats of types that may only appear once.
#[derive(Debug, Clone, Default)]
pub struct ChunkCountValidator {
  counts: HashMap<ChunkType, u32>,
}
impl ChunkCountValidator {
  /// Makes an empty counter.
  #[inline]
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Counts one more `code`, failing if that makes too many.
  pub fn validate(&mut self, code: ChunkType) -> PngResult<()> {
    let count = self.counts.entry(code).or_insert(0);
    if *count > 0 && !code.allows_multiple() {
      return Err(PngError::syntax(format!("there may only be one {code} chunk")));
    }
    *count += 1;
    Ok(())
  }

  /// How many chunks of type `code` have been counted.
  #[inline]
  #[must_use]
  pub fn count(&self, code: ChunkType) -> u32 {
    self.counts.get(&code).copied().unwrap_or(0)
  }
}

/// Checks chunk types, in arrival order, against the PNG ordering rules.
///
/// Feed it each chunk's type code with [`validate`](Self::validate) as soon
/// as the chunk's head is known, then call
/// [`validate_end`](Self::validate_end) once the stream is out of chunks.
#[derive(Debug, Clone, Default)]
pub struct ChunkOrderParser {
  state: ChunkOrderState,
  counts: ChunkCountValidator,
}
impl ChunkOrderParser {
  /// Makes a parser in the [`BeforeHeader`](ChunkOrderState::BeforeHeader)
  /// state.
  #[inline]
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// The current state.
  #[inline]
  #[must_use]
  pub const fn state(&self) -> ChunkOrderState {
    self.state
  }

  /// The multiplicity counter.
  #[inline]
  #[must_use]
  pub const fn counts(&self) -> &ChunkCountValidator {
    &self.counts
  }

  /// Accepts the next chunk's type code, or rejects it.
  ///
  /// Multiplicity is checked before ordering. After an error the parser
  /// shouldn't be used any more.
  pub fn validate(&mut self, code: ChunkType) -> PngResult<()> {
    self.counts.validate(code)?;
    let next = next_state(self.state, code).ok_or_else(|| {
      PngError::syntax(format!("{code} chunk not allowed here ({:?})", self.state))
    })?;
    if next != self.state {
      trace!("chunk order: {:?} -> {next:?} on {code}", self.state);
    }
    self.state = next;
    Ok(())
  }

  /// Checks that the stream ended in the accepting state.
  pub fn validate_end(&self) -> PngResult<()> {
    if self.state == ChunkOrderState::AfterTrailer {
      Ok(())
    } else {
      Err(PngError::syntax(format!("stream ended without IEND ({:?})", self.state)))
    }
  }
}

/// The transition table. `None` means the chunk is rejected.
fn next_state(state: ChunkOrderState, code: ChunkType) -> Option<ChunkOrderState> {
  use ChunkOrderState::*;
  use OrderingClass as C;
  match (state, code.ordering_class()) {
    (BeforeHeader, _) if code == ChunkType::IHDR => Some(BeforePalette),
    (BeforeHeader, _) => None,
    //
    (BeforePalette, Some(C::BeforePalette | C::BeforeData | C::AllowedAnywhere) | None) => {
      Some(BeforePalette)
    }
    (BeforePalette, Some(C::AfterPaletteBeforeData)) => Some(AfterPaletteBeforeData),
    (BeforePalette, _) if code == ChunkType::PLTE => Some(AfterPaletteBeforeData),
    (BeforePalette, _) if code == ChunkType::IDAT => Some(DuringData),
    (BeforePalette, _) => None,
    //
    (
      AfterPaletteBeforeData,
      Some(C::AfterPaletteBeforeData | C::BeforeData | C::AllowedAnywhere) | None,
    ) => Some(AfterPaletteBeforeData),
    (AfterPaletteBeforeData, _) if code == ChunkType::IDAT => Some(DuringData),
    (AfterPaletteBeforeData, _) => None,
    //
    (DuringData, Some(C::AllowedAnywhere) | None) => Some(AfterData),
    (DuringData, _) if code == ChunkType::IDAT => Some(DuringData),
    (DuringData, _) if code == ChunkType::IEND => Some(AfterTrailer),
    (DuringData, _) => None,
    //
    (AfterData, Some(C::AllowedAnywhere) | None) => Some(AfterData),
    (AfterData, _) if code == ChunkType::IEND => Some(AfterTrailer),
    (AfterData, _) => None,
    //
    (AfterTrailer, _) => None,
  }
}
