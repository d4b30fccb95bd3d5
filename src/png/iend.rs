use crate::{PngError, PngResult};

/// Checks the data of an `IEND` chunk, which must be empty.
#[inline]
pub fn parse_iend(data: &[u8]) -> PngResult<()> {
  if data.is_empty() {
    Ok(())
  } else {
    Err(PngError::syntax(format!("IEND must be empty, found {} bytes", data.len())))
  }
}

#[test]
fn test_parse_iend() {
  assert!(parse_iend(&[]).is_ok());
  assert!(parse_iend(&[0]).is_err());
}
