/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use image::imageops;

use super::{
    first_frame,
    icon::{Icon, HEIGHT},
    ConversionUnit, Geometry,
};
use crate::{
    codec::WordWidth,
    config::EncoderConfig,
    error::{Error, Result},
    raster::Source,
    sampler::Sampled,
};

/// A full-screen image, stored as a stack of icons from the top down.
pub(super) struct Splash;

impl Geometry for Splash {
    fn word_width(&self) -> WordWidth {
        Icon.word_width()
    }

    fn validate(&self, name: &str, width: u32, height: u32) -> Result<()> {
        if height == 0 || height % HEIGHT != 0 {
            return Err(Error::conversion(
                name,
                format!("expected a height that is a multiple of {HEIGHT}, got height {height} ({width}x{height} image)"),
            ));
        }
        Ok(())
    }

    fn sample_frames(&self, source: &Source, _with_alpha: bool) -> Result<Vec<Sampled>> {
        let frame = first_frame(source);
        (0..frame.height())
            .step_by(HEIGHT as usize)
            .map(|y| {
                let strip = imageops::crop_imm(frame, 0, y, frame.width(), HEIGHT).to_image();
                Icon.validate(source.name(), strip.width(), strip.height())?;
                Icon.sample_strip(source.name(), &strip)
            })
            .collect()
    }

    fn render(&self, unit: &ConversionUnit, config: &EncoderConfig) -> String {
        Icon.render(unit, config)
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use crate::{config::EncoderConfig, error::Error, geometry::Variant, raster::Source};

    #[test]
    fn one_frame_per_text_row() {
        let mut img = RgbaImage::from_pixel(12, 24, Rgba([255, 255, 255, 255]));
        // Black out the middle row.
        for y in 8..16 {
            for x in 0..12 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let source = Source::from_frames("title.png", vec![img]).unwrap();
        let config = EncoderConfig::default();
        let unit = Variant::Splash.convert(&source, &config).unwrap();

        let frames = unit.frames();
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|frame| frame.words().len() == 12));
        assert_eq!(frames[0].words(), [0; 12]);
        assert_eq!(frames[1].words(), [0xff; 12]);
        assert_eq!(frames[2].words(), [0; 12]);
        assert_eq!(unit.item_count(), 1);
        assert_eq!(unit.byte_len(), 36);

        let code = unit.to_code(&config);
        assert_eq!(code.matches("// Frame").count(), 3);
        assert!(!code.contains("12, 24"));
    }

    #[test]
    fn first_slice_is_the_top_row() {
        let mut img = RgbaImage::from_pixel(4, 16, Rgba([255, 255, 255, 255]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        let source = Source::from_frames("dot.png", vec![img]).unwrap();
        let unit = Variant::Splash.convert(&source, &EncoderConfig::default()).unwrap();
        // Top-left pixel: first column, top bit (least significant once rotated).
        assert_eq!(unit.frames()[0].words(), [0x01, 0, 0, 0]);
        assert_eq!(unit.frames()[1].words(), [0; 4]);
    }

    #[test]
    fn height_must_be_a_multiple_of_eight() {
        for height in [7, 12, 0] {
            let source = Source::from_frames("bad.png", vec![RgbaImage::new(8, height)]).unwrap();
            let err = Variant::Splash.convert(&source, &EncoderConfig::default()).unwrap_err();
            assert!(matches!(err, Error::Conversion { .. }));
            assert!(err.to_string().contains(&format!("got height {height}")), "{err}");
        }
    }
}
