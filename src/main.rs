use std::{
  fs::File,
  io::BufReader,
  path::{Path, PathBuf},
  process::ExitCode,
};

use clap::{value_parser, Arg, Command};
use log::{error, info, Level};
use strictpng::{png::PngDecoder, PngResult};

fn main() -> ExitCode {
  let matches = Command::new("strictpng")
    .about("Checks that a file is valid PNG 1.2 data, logging each chunk token")
    .arg(
      Arg::new("FILE")
        .help("The PNG file to check")
        .value_parser(value_parser!(PathBuf))
        .required(true),
    )
    .get_matches();

  if let Err(e) = simple_logger::init_with_level(Level::Info) {
    eprintln!("couldn't start the logger: {e}");
  }

  let Some(path) = matches.get_one::<PathBuf>("FILE") else {
    return ExitCode::FAILURE;
  };
  match debug_process_a_png_file(path) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      error!("{}: {e}", path.display());
      ExitCode::FAILURE
    }
  }
}

fn debug_process_a_png_file(path: &Path) -> PngResult<()> {
  let file = File::open(path)?;
  let decoded =
    PngDecoder::new(BufReader::new(file)).decode_with_tokens(|token| info!("{token:?}"))?;
  info!("{:?}", decoded.header);
  if let Some(palette) = &decoded.palette {
    info!("{palette:?}");
  }
  info!(
    "{}: ok! {} scanlines, {} bytes",
    path.display(),
    decoded.image.scanlines.len(),
    decoded.total_bytes_read
  );
  Ok(())
}
