/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use super::{first_frame, Geometry};
use crate::{
    codec::WordWidth,
    error::{Error, Result},
    raster::{Raster, Source},
    sampler::{sample, Rotation, Sampled},
};

/// Height of an icon, which is one text row of the LCD.
pub(super) const HEIGHT: u32 = 8;

/// A single 8 pixel high strip; each byte is one column.
pub(super) struct Icon;

impl Icon {
    pub(super) fn sample_strip(&self, name: &str, strip: &impl Raster) -> Result<Sampled> {
        sample(name, strip, Rotation::Clockwise, false)
    }
}

impl Geometry for Icon {
    fn word_width(&self) -> WordWidth {
        WordWidth::Byte
    }

    fn validate(&self, name: &str, width: u32, height: u32) -> Result<()> {
        if height != HEIGHT {
            return Err(Error::conversion(
                name,
                format!("expected height {HEIGHT}, got height {height} ({width}x{height} image)"),
            ));
        }
        Ok(())
    }

    fn sample_frames(&self, source: &Source, _with_alpha: bool) -> Result<Vec<Sampled>> {
        Ok(vec![self.sample_strip(source.name(), first_frame(source))?])
    }
}
