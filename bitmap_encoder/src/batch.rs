/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Converting many sources in one go, and keeping an eye on how much flash they use.

use std::{
    collections::HashSet,
    fmt::Display,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use image::GrayImage;
use log::{info, warn};

use crate::{
    config::EncoderConfig,
    error::{Error, Result},
    geometry::{ConversionUnit, Variant},
    raster::Source,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeThreshold {
    pub bytes: usize,
    pub label: &'static str,
}

// TODO: Subtract worst-case bootloader (and display library) sizes from these.
/// Memory budgets worth warning about, largest first.
pub const SIZE_LIMITS: [SizeThreshold; 3] = [
    SizeThreshold {
        bytes: 30 * 1024,
        label: "ATMega328 available flash",
    },
    SizeThreshold {
        bytes: 14 * 1024,
        label: "ATMega168 available flash",
    },
    SizeThreshold {
        bytes: 12 * 1024,
        label: "a reasonable size",
    },
];

/// Running totals over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeAccumulator {
    pub item_count: usize,
    pub total_bytes: usize,
}

impl SizeAccumulator {
    pub fn add(&mut self, unit: &ConversionUnit) {
        self.item_count += unit.item_count();
        self.total_bytes += unit.byte_len();
    }

    /// The largest budget the totals exceed, if any.
    pub fn advisory(&self) -> Option<SizeAdvisory> {
        SIZE_LIMITS
            .iter()
            .find(|limit| self.total_bytes > limit.bytes)
            .map(|&threshold| SizeAdvisory {
                total_bytes: self.total_bytes,
                threshold,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeAdvisory {
    pub total_bytes: usize,
    pub threshold: SizeThreshold,
}

impl Display for SizeAdvisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Generated data is {} bytes; {} is {} bytes",
            self.total_bytes, self.threshold.label, self.threshold.bytes
        )
    }
}

#[derive(Debug)]
pub struct BatchReport {
    /// Every unit's declarations, separated by blank lines.
    pub code: String,
    pub totals: SizeAccumulator,
    /// Sources that were skipped, in order.
    pub failures: Vec<Error>,
}

impl BatchReport {
    pub fn advisory(&self) -> Option<SizeAdvisory> {
        self.totals.advisory()
    }

    pub fn write_code(&self, out: &mut impl Write) -> Result<()> {
        out.write_all(self.code.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|err| Error::io("output", err))
    }
}

/// Converts each source in turn.
///
/// Sources that fail to load or don't fit `variant` are logged, recorded in the report and skipped;
/// anything worse aborts the batch.
pub fn convert_batch(
    sources: impl IntoIterator<Item = Result<Source>>,
    variant: Variant,
    config: &EncoderConfig,
) -> Result<BatchReport> {
    let mut code = String::new();
    let mut totals = SizeAccumulator::default();
    let mut failures = Vec::new();

    for source in sources {
        let unit = match source.and_then(|source| variant.convert(&source, config)) {
            Ok(unit) => unit,
            Err(err) if err.is_per_item() => {
                warn!("{err}");
                failures.push(err);
                continue;
            }
            Err(err) => return Err(err),
        };
        if !code.is_empty() {
            code.push('\n');
        }
        code.push_str(&unit.to_code(config));
        totals.add(&unit);
    }

    info!(
        "Converted {} image(s), {} bytes in total",
        totals.item_count, totals.total_bytes
    );
    if let Some(advisory) = totals.advisory() {
        warn!("{advisory}");
    }
    Ok(BatchReport {
        code,
        totals,
        failures,
    })
}

/// Opens every path as an image, converts them, and writes the generated code to `out`.
pub fn convert_files(
    paths: &[PathBuf],
    variant: Variant,
    config: &EncoderConfig,
    out: &mut impl Write,
) -> Result<BatchReport> {
    let report = convert_batch(paths.iter().map(|path| Source::open(path)), variant, config)?;
    report.write_code(out)?;
    Ok(report)
}

#[derive(Debug, Default)]
pub struct DecodeReport {
    pub images: Vec<(String, GrayImage)>,
    /// Texts and declarations that could not be read back, or images that could not be saved.
    pub failures: Vec<Error>,
}

/// Recovers images from generated code, given as `(source name, text)` pairs.
pub fn decode_batch<S: AsRef<str>>(
    texts: impl IntoIterator<Item = (String, S)>,
    variant: Variant,
    config: &EncoderConfig,
) -> Result<DecodeReport> {
    let mut report = DecodeReport::default();
    for (name, text) in texts {
        let failures = match variant.decode(&name, text.as_ref(), config) {
            Ok(decoded) => {
                report.images.extend(decoded.images);
                decoded.failures
            }
            Err(err) if err.is_per_item() => vec![err],
            Err(err) => return Err(err),
        };
        for err in failures {
            warn!("{err}");
            report.failures.push(err);
        }
    }
    Ok(report)
}

/// Reads generated code from every path and saves each image found as `<identifier>.png` in `out_dir`.
///
/// Returns the paths written.
pub fn decode_files(
    paths: &[PathBuf],
    variant: Variant,
    config: &EncoderConfig,
    out_dir: &Path,
) -> Result<(Vec<PathBuf>, DecodeReport)> {
    let mut texts = Vec::with_capacity(paths.len());
    let mut read_failures = Vec::new();
    for path in paths {
        match fs::read_to_string(path) {
            Ok(text) => texts.push((path.display().to_string(), text)),
            Err(err) => {
                let err = Error::io(path.display(), err);
                warn!("{err}");
                read_failures.push(err);
            }
        }
    }

    let mut report = decode_batch(texts, variant, config)?;
    report.failures.splice(0..0, read_failures);
    let written = save_images(&mut report, out_dir)?;
    Ok((written, report))
}

/// Saves every decoded image as `<name>.png` in `out_dir`, returning the paths written.
///
/// An image named like one saved before it in the same batch is not written; the collision is
/// recorded in the report's failures instead.
pub fn save_images(report: &mut DecodeReport, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(report.images.len());
    let mut saved = HashSet::new();
    for (name, img) in &report.images {
        if !saved.insert(name.as_str()) {
            let err = Error::NameCollision { name: name.clone() };
            warn!("{err}");
            report.failures.push(err);
            continue;
        }
        let path = out_dir.join(format!("{name}.png"));
        img.save(&path).map_err(|source| Error::Save {
            name: path.display().to_string(),
            source,
        })?;
        info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
