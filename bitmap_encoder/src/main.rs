/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use bitmap_encoder::{
    batch,
    codec::TailBits,
    config::EncoderConfig,
    error::Error,
    raster::Source,
    Variant,
};
use env_logger::Env;
use log::error;

const STDIN_NAME: &str = "stdin";

fn main() -> ExitCode {
    let args = xflags::parse_or_exit! {
        /// Turn generated code back into images instead (sprites only)
        optional -u, --undo
        /// File to write the code to, or directory to save images to when undoing
        optional -o, --output output: PathBuf
        /// Don't generate transparency masks for sprites
        optional --no-mask
        /// Pad the last word of each frame instead of dropping the leftover pixels
        optional --pad-tail
        /// Column at which array literals wrap
        optional --line-width line_width: usize
        /// One of `sprite`, `tileset`, `icon`, `splash`
        required variant: String
        /// Files to process (standard input if none)
        repeated sources: PathBuf
    };

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let variant: Variant = match args.variant.parse() {
        Ok(variant) => variant,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = EncoderConfig {
        mask: !args.no_mask,
        ..Default::default()
    };
    if args.pad_tail {
        config.tail = TailBits::Pad;
    }
    if let Some(line_width) = args.line_width {
        config.line_width = line_width;
    }

    let res = if args.undo {
        undo(variant, &config, &args.sources, args.output.as_deref())
    } else {
        convert(variant, &config, &args.sources, args.output.as_deref())
    };
    match res {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every source made it through.
fn convert(variant: Variant, config: &EncoderConfig, sources: &[PathBuf], output: Option<&Path>) -> Result<bool, Error> {
    let mut out: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path).map_err(|err| Error::io(path.display(), err))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    let report = if sources.is_empty() {
        let source = read_stdin().and_then(|bytes| Source::decode(STDIN_NAME, &bytes));
        let report = batch::convert_batch([source], variant, config)?;
        report.write_code(&mut out)?;
        report
    } else {
        batch::convert_files(sources, variant, config, &mut out)?
    };
    Ok(report.failures.is_empty())
}

fn undo(variant: Variant, config: &EncoderConfig, sources: &[PathBuf], output: Option<&Path>) -> Result<bool, Error> {
    let out_dir = output.unwrap_or(Path::new("."));

    let failures = if sources.is_empty() {
        let text = read_stdin().and_then(|bytes| {
            String::from_utf8(bytes).map_err(|err| Error::unsupported_input(STDIN_NAME, err))
        })?;
        let mut report = batch::decode_batch([(STDIN_NAME.to_owned(), text)], variant, config)?;
        batch::save_images(&mut report, out_dir)?;
        report.failures
    } else {
        let (_written, report) = batch::decode_files(sources, variant, config, out_dir)?;
        report.failures
    };
    Ok(failures.is_empty())
}

fn read_stdin() -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut bytes)
        .map_err(|err| Error::io(STDIN_NAME, err))?;
    Ok(bytes)
}
