use miniz_oxide::deflate::compress_to_vec_zlib;
use strictpng::{png::*, DecoderOptions, PngError, PngResult};

/// zlib data for the single RGB pixel `#4488CC` with a "none" filter tag.
const ONE_PIXEL_ZLIB: [u8; 12] =
  [0x08, 0xD7, 0x63, 0x70, 0xE9, 0x38, 0x03, 0x00, 0x02, 0xAC, 0x01, 0x99];

fn chunk(code: &[u8; 4], data: &[u8]) -> Vec<u8> {
  let mut v = Vec::with_capacity(12 + data.len());
  v.extend_from_slice(&(data.len() as u32).to_be_bytes());
  v.extend_from_slice(code);
  v.extend_from_slice(data);
  let crc = png_crc(&v[4..]);
  v.extend_from_slice(&crc.to_be_bytes());
  v
}

fn png_bytes(chunks: &[Vec<u8>]) -> Vec<u8> {
  let mut v = PNG_SIGNATURE.to_vec();
  for c in chunks {
    v.extend_from_slice(c);
  }
  v
}

fn ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8) -> Vec<u8> {
  let mut data = Vec::new();
  data.extend_from_slice(&width.to_be_bytes());
  data.extend_from_slice(&height.to_be_bytes());
  data.extend_from_slice(&[bit_depth, color_type, 0, 0, interlace]);
  chunk(b"IHDR", &data)
}

fn idat(raw: &[u8]) -> Vec<u8> {
  chunk(b"IDAT", &compress_to_vec_zlib(raw, 6))
}

fn iend() -> Vec<u8> {
  chunk(b"IEND", &[])
}

fn minimal() -> Vec<u8> {
  png_bytes(&[ihdr(1, 1, 8, 2, 0), chunk(b"IDAT", &ONE_PIXEL_ZLIB), iend()])
}

fn tokens(bytes: &[u8]) -> Vec<PngResult<ChunkToken>> {
  ChunkTokenStream::new(bytes).collect()
}

#[test]
fn test_minimal_stream_tokens() {
  let bytes = minimal();
  let mut stream = ChunkTokenStream::new(bytes.as_slice());
  let tokens: Vec<ChunkToken> = stream.by_ref().collect::<PngResult<_>>().unwrap();
  assert_eq!(stream.total_bytes_read(), bytes.len() as u64);

  let shape: Vec<(char, ChunkType)> = tokens
    .iter()
    .map(|t| match t {
      ChunkToken::Head(h) => ('H', h.code),
      ChunkToken::DataPart(p) => ('D', p.head.code),
      ChunkToken::End(e) => {
        assert!(e.crc_ok);
        ('E', e.head.code)
      }
    })
    .collect();
  assert_eq!(
    shape,
    [
      ('H', ChunkType::IHDR),
      ('D', ChunkType::IHDR),
      ('E', ChunkType::IHDR),
      ('H', ChunkType::IDAT),
      ('D', ChunkType::IDAT),
      ('E', ChunkType::IDAT),
      ('H', ChunkType::IEND),
      ('E', ChunkType::IEND),
    ]
  );
  // positions are where each chunk's length starts
  let positions: Vec<u64> = tokens
    .iter()
    .filter_map(|t| match t {
      ChunkToken::Head(h) => Some(h.position),
      _ => None,
    })
    .collect();
  assert_eq!(positions, [8, 8 + 25, 8 + 25 + 24]);
  match &tokens[4] {
    ChunkToken::DataPart(p) => assert_eq!(p.data, ONE_PIXEL_ZLIB),
    other => panic!("{other:?}"),
  }
}

#[test]
fn test_single_flip_is_bad_crc() {
  let good = minimal();
  // the IDAT chunk's type code and data
  for i in (33 + 4)..(33 + 8 + ONE_PIXEL_ZLIB.len()) {
    let mut bytes = good.clone();
    // a case flip keeps a type code byte a letter
    bytes[i] ^= if i < 33 + 8 { 0x20 } else { 0x01 };
    let out = tokens(&bytes);
    match out.last() {
      Some(Err(PngError::BadCrc { position, .. })) => assert_eq!(*position, 33, "byte {i}"),
      other => panic!("byte {i}: {other:?}"),
    }
    // nothing from IEND was produced
    assert_eq!(out.iter().filter(|t| t.is_ok()).count(), 5, "byte {i}");
  }
  // the CRC itself
  let mut bytes = good.clone();
  bytes[33 + 8 + ONE_PIXEL_ZLIB.len()] ^= 0x80;
  assert!(matches!(tokens(&bytes).last(), Some(Err(PngError::BadCrc { .. }))));
}

#[test]
fn test_iterator_fuses_after_error() {
  let mut bytes = minimal();
  bytes[20] ^= 1;
  let mut stream = ChunkTokenStream::new(bytes.as_slice());
  while let Some(Ok(_)) = stream.next() {}
  assert!(stream.next().is_none());
  assert!(stream.next().is_none());
}

#[test]
fn test_framing_errors() {
  assert!(matches!(tokens(&[])[0], Err(PngError::UnexpectedEof { expected: 8, actual: 0, .. })));
  assert!(matches!(tokens(b"GIF89a\0\0")[0], Err(PngError::SignatureMismatch { .. })));

  // cut off partway through the IEND chunk
  let bytes = minimal();
  let out = tokens(&bytes[..bytes.len() - 1]);
  assert!(matches!(out.last(), Some(Err(PngError::UnexpectedEof { .. }))));

  // a length past 2^31-1
  let mut bytes = PNG_SIGNATURE.to_vec();
  bytes.extend_from_slice(&[0x80, 0, 0, 0]);
  bytes.extend_from_slice(b"IHDR");
  assert!(matches!(tokens(&bytes).last(), Some(Err(PngError::Syntax(_)))));

  // a type code with a digit
  let bytes = png_bytes(&[chunk(b"IH2R", &[])]);
  assert!(matches!(tokens(&bytes).last(), Some(Err(PngError::Syntax(_)))));

  // stopping exactly between chunks is not a framing error
  let bytes = png_bytes(&[ihdr(1, 1, 8, 2, 0)]);
  assert!(tokens(&bytes).iter().all(Result::is_ok));
  assert!(matches!(decode_png(&bytes), Err(PngError::Syntax(_))));
}

#[test]
fn test_byte_budget() {
  let bytes = minimal();
  // the between-chunks probe after IEND also needs a byte of budget
  let roomy = DecoderOptions::default().set_max_total_bytes(bytes.len() as u64 + 1);
  PngDecoder::with_options(bytes.as_slice(), roomy).decode().unwrap();
  let exact = DecoderOptions::default().set_max_total_bytes(bytes.len() as u64);
  let out: Vec<_> = ChunkTokenStream::with_options(bytes.as_slice(), exact).collect();
  assert_eq!(out.len(), 9);
  assert!(matches!(out.last(), Some(Err(PngError::TooLarge { .. }))));

  let short = DecoderOptions::default().set_max_total_bytes(bytes.len() as u64 - 1);
  let out: Vec<_> = ChunkTokenStream::with_options(bytes.as_slice(), short).collect();
  assert!(matches!(out.last(), Some(Err(PngError::TooLarge { .. }))));

  let tiny = DecoderOptions::default().set_max_total_bytes(7);
  let out: Vec<_> = ChunkTokenStream::with_options(bytes.as_slice(), tiny).collect();
  assert!(matches!(out[..], [Err(PngError::TooLarge { limit: 7 })]));
}

#[test]
fn test_long_chunks_are_split() {
  let text: Vec<u8> = (0..10_000_u32).map(|i| (i % 26) as u8 + b'a').collect();
  let bytes = png_bytes(&[ihdr(1, 1, 8, 2, 0), chunk(b"tEXt", &text)]);

  let parts: Vec<Vec<u8>> = tokens(&bytes)
    .into_iter()
    .map(Result::unwrap)
    .filter_map(|t| match t {
      ChunkToken::DataPart(p) if p.head.code == ChunkType::tEXt => Some(p.data),
      _ => None,
    })
    .collect();
  assert_eq!(parts.iter().map(Vec::len).collect::<Vec<_>>(), [4096, 4096, 1808]);
  assert_eq!(parts.concat(), text);

  let small = DecoderOptions::default().set_max_data_part(1000);
  let lens: Vec<usize> = ChunkTokenStream::with_options(bytes.as_slice(), small)
    .map(Result::unwrap)
    .filter_map(|t| match t {
      ChunkToken::DataPart(p) if p.head.code == ChunkType::tEXt => Some(p.data.len()),
      _ => None,
    })
    .collect();
  assert_eq!(lens.len(), 10);
  assert!(lens.iter().all(|&len| len == 1000));
}

#[test]
fn test_manual_framing_misuse() {
  let bytes = minimal();
  let mut stream = ChunkTokenStream::new(bytes.as_slice());
  stream.read_signature().unwrap();
  assert!(matches!(stream.next_data_part(), Err(PngError::StreamState(_))));
  assert!(matches!(stream.next_end(), Err(PngError::StreamState(_))));
  let head = stream.next_head().unwrap();
  assert_eq!((head.code, head.length, head.position), (ChunkType::IHDR, 13, 8));
  assert!(matches!(stream.next_head(), Err(PngError::StreamState(_))));
  assert!(matches!(stream.probe_chunk_start(), Err(PngError::StreamState(_))));
  assert!(matches!(stream.next_end(), Err(PngError::StreamState(_))));
  assert_eq!(stream.next_data_part().unwrap().data.len(), 13);
  assert!(matches!(stream.next_data_part(), Err(PngError::StreamState(_))));
  assert!(stream.next_end().unwrap().crc_ok);
  assert!(stream.probe_chunk_start().unwrap());
  assert_eq!(stream.next_head().unwrap().code, ChunkType::IDAT);
}

/// Every ordering of `chunks`, as lists of indexes.
fn permutations(n: usize) -> Vec<Vec<usize>> {
  if n == 0 {
    return vec![vec![]];
  }
  let mut out = Vec::new();
  for p in permutations(n - 1) {
    for i in 0..=p.len() {
      let mut q = p.clone();
      q.insert(i, n - 1);
      out.push(q);
    }
  }
  out
}

#[test]
fn test_chunk_order_permutations() {
  let plte = chunk(b"PLTE", &[1, 2, 3]);
  let body = [ihdr(1, 1, 8, 2, 0), plte.clone(), chunk(b"IDAT", &ONE_PIXEL_ZLIB), iend()];
  for order in permutations(4) {
    let chunks: Vec<Vec<u8>> = order.iter().map(|&i| body[i].clone()).collect();
    let ok = decode_png(&png_bytes(&chunks)).is_ok();
    assert_eq!(ok, order == [0, 1, 2, 3], "{order:?}");
  }
  let body = [ihdr(1, 1, 8, 2, 0), chunk(b"IDAT", &ONE_PIXEL_ZLIB), iend()];
  for order in permutations(3) {
    let chunks: Vec<Vec<u8>> = order.iter().map(|&i| body[i].clone()).collect();
    let ok = decode_png(&png_bytes(&chunks)).is_ok();
    assert_eq!(ok, order == [0, 1, 2], "{order:?}");
  }
  // no image data at all
  let bytes = png_bytes(&[ihdr(1, 1, 8, 2, 0), plte, iend()]);
  assert!(matches!(decode_png(&bytes), Err(PngError::Syntax(_))));
  // anything after the trailer
  let mut bytes = minimal();
  bytes.extend(chunk(b"tEXt", b"k\0v"));
  assert!(matches!(decode_png(&bytes), Err(PngError::Syntax(_))));
}

#[test]
fn test_chunk_multiplicity() {
  let pixel = chunk(b"IDAT", &ONE_PIXEL_ZLIB);
  let text = chunk(b"tEXt", b"Title\0x");
  let private = chunk(b"prVt", &[1, 2, 3]);

  // repeatable
  let split = [chunk(b"IDAT", &ONE_PIXEL_ZLIB[..5]), chunk(b"IDAT", &ONE_PIXEL_ZLIB[5..])];
  let ok = [
    vec![ihdr(1, 1, 8, 2, 0), split[0].clone(), split[1].clone(), iend()],
    vec![ihdr(1, 1, 8, 2, 0), text.clone(), text.clone(), pixel.clone(), text.clone(), iend()],
    vec![ihdr(1, 1, 8, 2, 0), private.clone(), private.clone(), pixel.clone(), private.clone(), iend()],
  ];
  for chunks in ok {
    decode_png(&png_bytes(&chunks)).unwrap();
  }

  // not repeatable
  let bkgd = chunk(b"bKGD", &[0, 0, 0, 0, 0, 0]);
  let plte = chunk(b"PLTE", &[1, 2, 3]);
  let bad = [
    vec![ihdr(1, 1, 8, 2, 0), ihdr(1, 1, 8, 2, 0), pixel.clone(), iend()],
    vec![ihdr(1, 1, 8, 2, 0), plte.clone(), plte, pixel.clone(), iend()],
    vec![ihdr(1, 1, 8, 2, 0), bkgd.clone(), bkgd, pixel.clone(), iend()],
    vec![ihdr(1, 1, 8, 2, 0), pixel.clone(), iend(), iend()],
    vec![private, ihdr(1, 1, 8, 2, 0), pixel, iend()],
  ];
  for chunks in bad {
    assert!(matches!(decode_png(&png_bytes(&chunks)), Err(PngError::Syntax(_))));
  }
}

/// Each pixel's samples, indexed by `y * width + x`.
fn pixel_samples(png: &DecodedPng) -> Vec<Vec<u16>> {
  let width = png.header.width as usize;
  let spp = png.header.color_type.samples_per_pixel();
  let mut out = vec![Vec::new(); width * png.header.height as usize];
  for line in &png.image.scanlines {
    let samples = line.samples();
    for ((x, y), pixel) in line.coordinates().zip(samples.chunks_exact(spp)) {
      out[y as usize * width + x as usize] = pixel.to_vec();
    }
  }
  out
}

/// Packs sub-byte samples high bits first, padding the last byte with 0s.
fn pack_bits(values: &[u8], bit_depth: u8) -> Vec<u8> {
  let depth = bit_depth as usize;
  values
    .chunks(8 / depth)
    .map(|c| c.iter().enumerate().fold(0_u8, |acc, (i, v)| acc | (v << (8 - depth * (i + 1)))))
    .collect()
}

/// Raw (uncompressed, unfiltered) data for an interlaced image. `row_bytes`
/// gets the full image positions of one reduced row and packs them.
fn adam7_raw(header: &ImageHeader, mut row_bytes: impl FnMut(&[(u32, u32)]) -> Vec<u8>) -> Vec<u8> {
  let mut raw = Vec::new();
  for pass in passes(header).into_iter().filter(|p| !p.is_empty()) {
    for ry in 0..pass.height {
      let row: Vec<(u32, u32)> = (0..pass.width).map(|rx| pass.full_position(rx, ry)).collect();
      raw.push(0);
      raw.extend(row_bytes(&row));
    }
  }
  raw
}

#[test]
fn test_decode_one_rgb_pixel() {
  let bytes = minimal();
  let png = decode_png(&bytes).unwrap();
  assert_eq!(png.header.width, 1);
  assert_eq!(png.header.color_type, ColorType::Rgb);
  assert_eq!(png.total_bytes_read, bytes.len() as u64);
  assert_eq!(png.image.scanlines.len(), 1);
  assert_eq!(png.image.scanlines[0].samples(), [0x44, 0x88, 0xCC]);
  #[cfg(feature = "bitmap")]
  {
    let bitmap = png.to_bitmap().unwrap();
    let p = bitmap.pixels[0];
    assert_eq!([p.r, p.g, p.b, p.a], [0x44, 0x88, 0xCC, 0xFF]);
  }
}

#[test]
fn test_decode_up_filter() {
  let bytes = png_bytes(&[ihdr(3, 2, 8, 0, 0), idat(&[0, 10, 20, 30, 2, 5, 5, 5]), iend()]);
  let png = decode_png(&bytes).unwrap();
  assert_eq!(pixel_samples(&png), [[10], [20], [30], [15], [25], [35]]);
  #[cfg(feature = "bitmap")]
  {
    let bitmap = png.to_bitmap().unwrap();
    let grays: Vec<u8> = bitmap.pixels.iter().map(|p| p.r).collect();
    assert_eq!(grays, [10, 20, 30, 15, 25, 35]);
  }
}

#[test]
fn test_decode_adam7() {
  let (w, h) = (5_u32, 6_u32);
  let color = |x: u32, y: u32| [(x * 40) as u8, (y * 40) as u8, (x + y) as u8];
  let header = ImageHeader::parse(&ihdr(w, h, 8, 2, 1)[8..21]).unwrap();
  let raw = adam7_raw(&header, |row| row.iter().flat_map(|&(x, y)| color(x, y)).collect());
  let bytes = png_bytes(&[ihdr(w, h, 8, 2, 1), idat(&raw), iend()]);
  let png = decode_png(&bytes).unwrap();
  let samples = pixel_samples(&png);
  for y in 0..h {
    for x in 0..w {
      let expected: Vec<u16> = color(x, y).iter().map(|&c| u16::from(c)).collect();
      assert_eq!(samples[(y * w + x) as usize], expected, "({x},{y})");
    }
  }
  #[cfg(feature = "bitmap")]
  {
    let bitmap = png.to_bitmap().unwrap();
    for y in 0..h {
      for x in 0..w {
        let p = bitmap.get(x, y).unwrap();
        assert_eq!([p.r, p.g, p.b], color(x, y), "({x},{y})");
      }
    }
  }
}

#[test]
fn test_decode_adam7_sub_byte() {
  // odd sizes so most pass rows end partway through a byte
  let (w, h) = (7_u32, 5_u32);
  for bit_depth in [1_u8, 2, 4] {
    let max = (1_u32 << bit_depth) - 1;
    let gray = |x: u32, y: u32| ((x * 3 + y) % (max + 1)) as u8;
    let header = ImageHeader::parse(&ihdr(w, h, bit_depth, 0, 1)[8..21]).unwrap();
    let raw = adam7_raw(&header, |row| {
      let values: Vec<u8> = row.iter().map(|&(x, y)| gray(x, y)).collect();
      pack_bits(&values, bit_depth)
    });
    let bytes = png_bytes(&[ihdr(w, h, bit_depth, 0, 1), idat(&raw), iend()]);
    let png = decode_png(&bytes).unwrap();
    let samples = pixel_samples(&png);
    for y in 0..h {
      for x in 0..w {
        assert_eq!(samples[(y * w + x) as usize], [u16::from(gray(x, y))], "{bit_depth}: ({x},{y})");
      }
    }
    #[cfg(feature = "bitmap")]
    {
      let bitmap = png.to_bitmap().unwrap();
      let scale = (255 / max) as u8;
      for y in 0..h {
        for x in 0..w {
          let p = bitmap.get(x, y).unwrap();
          assert_eq!([p.r, p.a], [gray(x, y) * scale, 0xFF], "{bit_depth}: ({x},{y})");
        }
      }
    }
  }
}

#[test]
fn test_decode_indexed() {
  // 2-bit indexes, 3 pixels wide
  let plte = chunk(b"PLTE", &[0, 0, 0, 255, 0, 0, 0, 255, 0]);
  let raw = [0, 0b00_01_10_00];
  let bytes = png_bytes(&[ihdr(3, 1, 2, 3, 0), plte, idat(&raw), iend()]);
  let png = decode_png(&bytes).unwrap();
  assert_eq!(png.palette.as_ref().map(Palette::len), Some(3));
  assert_eq!(pixel_samples(&png), [[0], [1], [2]]);
  #[cfg(feature = "bitmap")]
  {
    let bitmap = png.to_bitmap().unwrap();
    let rgb: Vec<[u8; 3]> = bitmap.pixels.iter().map(|p| [p.r, p.g, p.b]).collect();
    assert_eq!(rgb, [[0, 0, 0], [255, 0, 0], [0, 255, 0]]);
  }

  // the PLTE has to come before the image data
  let bytes = png_bytes(&[ihdr(3, 1, 2, 3, 0), idat(&raw), iend()]);
  assert!(matches!(decode_png(&bytes), Err(PngError::Syntax(_))));
  // and can't be on a grayscale image
  let plte = chunk(b"PLTE", &[0, 0, 0]);
  let bytes = png_bytes(&[ihdr(1, 1, 8, 0, 0), plte, idat(&[0, 0]), iend()]);
  assert!(matches!(decode_png(&bytes), Err(PngError::Syntax(_))));
}

#[test]
fn test_decode_single_flip_is_bad_crc() {
  let good = minimal();
  // the IDAT chunk's type code and data
  for i in (33 + 4)..(33 + 8 + ONE_PIXEL_ZLIB.len()) {
    let mut bytes = good.clone();
    bytes[i] ^= if i < 33 + 8 { 0x20 } else { 0x01 };
    match decode_png(&bytes) {
      Err(PngError::BadCrc { position, .. }) => assert_eq!(position, 33, "byte {i}"),
      other => panic!("byte {i}: {other:?}"),
    }
  }
  // a bad CRC on a later IDAT, after the first one was fine
  let split = [chunk(b"IDAT", &ONE_PIXEL_ZLIB[..5]), chunk(b"IDAT", &ONE_PIXEL_ZLIB[5..])];
  let mut bytes = png_bytes(&[ihdr(1, 1, 8, 2, 0), split[0].clone(), split[1].clone(), iend()]);
  let second_idat = 8 + 25 + split[0].len();
  bytes[second_idat + 9] ^= 0x01;
  match decode_png(&bytes) {
    Err(PngError::BadCrc { code, position, .. }) => {
      assert_eq!((code, position), (ChunkType::IDAT, second_idat as u64))
    }
    other => panic!("{other:?}"),
  }
}

#[test]
fn test_decode_dimension_limits() {
  // a tiny file describing a huge image
  let raw = vec![0_u8; 1 + 20_000 / 8];
  let wide = png_bytes(&[ihdr(64_000_000, 1, 1, 0, 0), idat(&raw), iend()]);
  assert!(wide.len() < 200);
  assert!(matches!(
    decode_png(&wide),
    Err(PngError::DimensionsTooLarge { width: 64_000_000, height: 1 })
  ));

  let bytes = png_bytes(&[ihdr(20_000, 1, 1, 0, 0), idat(&raw), iend()]);
  assert!(matches!(decode_png(&bytes), Err(PngError::DimensionsTooLarge { .. })));
  let roomy = DecoderOptions::default().set_max_width(20_000);
  let png = PngDecoder::with_options(bytes.as_slice(), roomy).decode().unwrap();
  assert_eq!(pixel_samples(&png).len(), 20_000);

  let tight = DecoderOptions::default().set_max_height(3);
  let bytes = png_bytes(&[ihdr(1, 4, 8, 0, 0), idat(&[0, 1, 0, 2, 0, 3, 0, 4]), iend()]);
  let result = PngDecoder::with_options(bytes.as_slice(), tight).decode();
  assert!(matches!(result, Err(PngError::DimensionsTooLarge { width: 1, height: 4 })));
}

#[test]
fn test_decode_bad_fields() {
  // indexed color can't be 16-bit
  let bytes = png_bytes(&[ihdr(1, 1, 16, 3, 0), idat(&[0, 0, 0]), iend()]);
  assert!(matches!(decode_png(&bytes), Err(PngError::Syntax(_))));
  // an IHDR that's too long is rejected by its declared length
  let bytes = png_bytes(&[chunk(b"IHDR", &[0; 14]), iend()]);
  assert!(matches!(decode_png(&bytes), Err(PngError::Syntax(_))));
  // a non-empty IEND
  let bytes = png_bytes(&[ihdr(1, 1, 8, 2, 0), chunk(b"IDAT", &ONE_PIXEL_ZLIB), chunk(b"IEND", &[0])]);
  assert!(matches!(decode_png(&bytes), Err(PngError::Syntax(_))));
  // an unknown interlace method
  let bytes = png_bytes(&[ihdr(1, 1, 8, 2, 2), chunk(b"IDAT", &ONE_PIXEL_ZLIB), iend()]);
  assert!(matches!(decode_png(&bytes), Err(PngError::UnsupportedField(_))));
  // an unknown filter type on a scanline
  let bytes = png_bytes(&[ihdr(1, 1, 8, 2, 0), idat(&[5, 1, 2, 3]), iend()]);
  assert!(matches!(decode_png(&bytes), Err(PngError::Syntax(_))));
}

#[test]
fn test_decode_image_data_size() {
  // too few bytes, too many bytes
  let bytes = png_bytes(&[ihdr(2, 2, 8, 0, 0), idat(&[0, 1, 2, 0, 3]), iend()]);
  assert!(matches!(decode_png(&bytes), Err(PngError::Syntax(_))));
  let bytes = png_bytes(&[ihdr(2, 2, 8, 0, 0), idat(&[0, 1, 2, 0, 3, 4, 9]), iend()]);
  assert!(matches!(decode_png(&bytes), Err(PngError::Syntax(_))));

  // the zlib stream is cut short
  let packed = compress_to_vec_zlib(&[0, 1, 2, 0, 3, 4], 6);
  let bytes = png_bytes(&[ihdr(2, 2, 8, 0, 0), chunk(b"IDAT", &packed[..packed.len() - 1]), iend()]);
  assert!(matches!(decode_png(&bytes), Err(PngError::DecompressionNotFinished)));

  // junk after the zlib stream
  let mut packed = packed;
  packed.extend_from_slice(&[0, 0]);
  let bytes = png_bytes(&[ihdr(2, 2, 8, 0, 0), chunk(b"IDAT", &packed), iend()]);
  assert!(matches!(decode_png(&bytes), Err(PngError::DecompressionFinishedEarly { .. })));
}

#[test]
fn test_decode_with_tokens_sees_every_token() {
  let bytes = minimal();
  let mut count = 0;
  PngDecoder::new(bytes.as_slice()).decode_with_tokens(|_| count += 1).unwrap();
  assert_eq!(count, 8);
}

#[test]
fn test_random_bytes_no_panics() {
  // even totally random data should never panic the decoder!
  for _ in 0..50 {
    let v = super::rand_bytes(1024);
    for _ in ChunkTokenStream::new(v.as_slice()) {
      //
    }
    assert!(decode_png(&v).is_err());
    // get past the signature check too
    let mut v2 = PNG_SIGNATURE.to_vec();
    v2.extend_from_slice(&v);
    for _ in ChunkTokenStream::new(v2.as_slice()) {
      //
    }
    let _ = decode_png(&v2);
  }
  // random image data behind a valid header
  for _ in 0..50 {
    let v = super::rand_bytes(64);
    let bytes = png_bytes(&[ihdr(4, 4, 8, 6, 1), chunk(b"IDAT", &v), iend()]);
    assert!(decode_png(&bytes).is_err());
  }
}
