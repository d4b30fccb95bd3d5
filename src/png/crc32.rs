const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      if (c & 1) != 0 {
        c = 0xEDB8_8320_u32 ^ (c >> 1);
      } else {
        c >>= 1;
      }
      //
      k += 1;
    }
    out[n] = c;
    //
    n += 1;
  }
  out
}

/// A CRC-32 that can be fed in pieces.
///
/// Feeding `a` then `b` gives the same result as feeding `a ++ b` at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunningCrc(u32);
impl RunningCrc {
  #[inline]
  #[must_use]
  pub(crate) const fn new() -> Self {
    Self(u32::MAX)
  }
  #[inline]
  pub(crate) fn update(&mut self, bytes: &[u8]) {
    for byte in bytes.iter().copied() {
      let i = (self.0 ^ u32::from(byte)) as u8 as usize;
      self.0 = CRC_TABLE[i] ^ (self.0 >> 8);
    }
  }
  #[inline]
  #[must_use]
  pub(crate) const fn finish(&self) -> u32 {
    self.0 ^ u32::MAX
  }
}

/// Computes the standard CRC-32 (the one zlib uses) of `bytes`.
///
/// A chunk's CRC covers its type code followed by its data, so for a chunk
/// you'd pass the concatenation of both.
#[inline]
#[must_use]
pub fn png_crc(bytes: &[u8]) -> u32 {
  let mut crc = RunningCrc::new();
  crc.update(bytes);
  crc.finish()
}

#[test]
fn test_png_crc() {
  assert_eq!(png_crc(b"123456789"), 0xCBF4_3926);
  assert_eq!(png_crc(b""), 0);
  assert_eq!(png_crc(b"IEND"), 0xAE42_6082);

  let mut crc = RunningCrc::new();
  crc.update(b"1234");
  crc.update(b"56789");
  assert_eq!(crc.finish(), 0xCBF4_3926);
}
