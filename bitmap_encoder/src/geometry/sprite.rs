/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use log::debug;

use super::{primary_declaration, ConversionUnit, Geometry};
use crate::{
    codec::{pack, BitmapFrame, Suppression, TailBits, WordWidth},
    config::EncoderConfig,
    declaration::Declaration,
    error::{Error, Result},
    raster::Source,
    sampler::{sample, PixelStream, Rotation, Sampled},
};

/// Whole images of any size, one frame per animation frame, with an optional transparency mask.
pub(super) struct Sprite;

impl Geometry for Sprite {
    fn word_width(&self) -> WordWidth {
        WordWidth::Byte
    }

    fn has_size_prefix(&self) -> bool {
        true
    }

    fn supports_mask(&self) -> bool {
        true
    }

    fn validate(&self, _name: &str, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    fn sample_frames(&self, source: &Source, with_alpha: bool) -> Result<Vec<Sampled>> {
        source
            .frames()
            .iter()
            .map(|frame| sample(source.name(), frame, Rotation::Clockwise, with_alpha))
            .collect()
    }

    fn item_count(&self, unit: &ConversionUnit) -> usize {
        unit.frames.len()
    }

    fn render(&self, unit: &ConversionUnit, config: &EncoderConfig) -> String {
        let mut code = primary_declaration(self, unit, config).render(config.line_width);

        if let Some(masks) = unit.masks() {
            let name = format!("{}_mask", unit.name);
            let mut decl = Declaration::new(
                config.type_name(self.word_width()),
                &name,
                self.word_width().hex_digits(),
            );
            if let Some(first) = masks.first() {
                decl = decl.size_prefix(first.width(), first.height());
            }
            code.push('\n');
            code.push_str(&decl.frames(masks.iter().map(BitmapFrame::words)).render(config.line_width));
        }
        code
    }
}

/// Packs the alpha channel of every frame the same way as the pixels: transparent is "set".
///
/// A mask made only of uniform frames (fully opaque or fully transparent) says nothing the sprite
/// doesn't, and is left out entirely. Otherwise every frame keeps its mask so indices line up.
pub(super) fn mask_frames<'a>(
    name: &str,
    alpha: impl IntoIterator<Item = &'a PixelStream>,
    word_width: WordWidth,
    tail: TailBits,
) -> Result<Option<Vec<BitmapFrame>>> {
    let alpha: Vec<_> = alpha.into_iter().collect();

    let mut informative = false;
    for stream in &alpha {
        if pack(stream, word_width, Suppression::SkipSolid, tail)
            .map_err(|err| Error::codec(name, err))?
            .is_some()
        {
            informative = true;
            break;
        }
    }
    if !informative {
        debug!("{name}: no transparency, skipping the mask");
        return Ok(None);
    }

    let mut masks = Vec::with_capacity(alpha.len());
    for stream in alpha {
        if let Some(mask) =
            pack(stream, word_width, Suppression::Disabled, tail).map_err(|err| Error::codec(name, err))?
        {
            masks.push(mask);
        }
    }
    Ok(Some(masks))
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use crate::{config::EncoderConfig, geometry::Variant, raster::Source};

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([255, 255, 255, 0]);

    fn no_mask() -> EncoderConfig {
        EncoderConfig {
            mask: false,
            ..Default::default()
        }
    }

    #[test]
    fn black_square() {
        let source = Source::from_frames("sprites/dot.gif", vec![RgbaImage::from_pixel(8, 8, BLACK)]).unwrap();
        let unit = Variant::Sprite.convert(&source, &no_mask()).unwrap();
        assert_eq!(unit.name(), "dot");
        assert_eq!(unit.frames().len(), 1);
        assert_eq!(unit.frames()[0].words(), [0xff; 8]);
        assert!(unit.masks().is_none());
        assert_eq!(unit.item_count(), 1);
        assert_eq!(unit.byte_len(), 10);

        let code = unit.to_code(&no_mask());
        assert_eq!(
            code,
            "PROGMEM prog_uchar dot[] = {\n    8, 8,\n    // Frame 0\n    \
             0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,\n};\n"
        );
    }

    #[test]
    fn solid_sprites_are_kept() {
        let source = Source::from_frames("blank", vec![RgbaImage::from_pixel(8, 2, WHITE)]).unwrap();
        let unit = Variant::Sprite.convert(&source, &no_mask()).unwrap();
        assert_eq!(unit.frames()[0].words(), [0, 0]);
    }

    #[test]
    fn size_prefix_is_rotated() {
        let source = Source::from_frames("wide", vec![RgbaImage::from_pixel(16, 8, BLACK)]).unwrap();
        let unit = Variant::Sprite.convert(&source, &no_mask()).unwrap();
        let frame = &unit.frames()[0];
        assert_eq!((frame.width(), frame.height()), (8, 16));
        assert!(unit.to_code(&no_mask()).contains("    8, 16,\n"));
    }

    #[test]
    fn animation_frames_share_one_declaration() {
        let frames = vec![
            RgbaImage::from_pixel(8, 8, BLACK),
            RgbaImage::from_pixel(8, 8, WHITE),
            RgbaImage::from_pixel(8, 8, BLACK),
        ];
        let source = Source::from_frames("walk.gif", frames).unwrap();
        let unit = Variant::Sprite.convert(&source, &no_mask()).unwrap();
        assert_eq!(unit.frames().len(), 3);
        assert_eq!(unit.frames()[1].words(), [0; 8]);
        assert_eq!(unit.item_count(), 3);
        assert_eq!(unit.byte_len(), 2 + 3 * 8);

        let code = unit.to_code(&no_mask());
        assert_eq!(code.matches("PROGMEM").count(), 1);
        for i in 0..3 {
            assert!(code.contains(&format!("// Frame {i}\n")));
        }
    }

    #[test]
    fn transparency_becomes_a_mask() {
        let mut img = RgbaImage::from_pixel(8, 8, BLACK);
        for y in 0..8 {
            img.put_pixel(0, y, CLEAR);
        }
        let source = Source::from_frames("ghost.gif", vec![img]).unwrap();
        let config = EncoderConfig::default();
        let unit = Variant::Sprite.convert(&source, &config).unwrap();

        let masks = unit.masks().unwrap();
        assert_eq!(masks.len(), 1);
        // The left column is transparent; once rotated it is the top row.
        assert_eq!(masks[0].words(), [0xff, 0, 0, 0, 0, 0, 0, 0]);
        // The transparent pixels are white in the sprite itself.
        assert_eq!(unit.frames()[0].words(), [0, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(unit.byte_len(), 2 * (2 + 8));

        let code = unit.to_code(&config);
        assert!(code.contains("PROGMEM prog_uchar ghost[] = {"));
        assert!(code.contains("PROGMEM prog_uchar ghost_mask[] = {"));
    }

    #[test]
    fn opaque_sprites_have_no_mask() {
        let source = Source::from_frames("solid", vec![RgbaImage::from_pixel(8, 8, BLACK)]).unwrap();
        let config = EncoderConfig::default();
        let unit = Variant::Sprite.convert(&source, &config).unwrap();
        assert!(unit.masks().is_none());
        assert!(!unit.to_code(&config).contains("_mask"));
    }

    #[test]
    fn animated_masks_keep_every_frame() {
        let mut holey = RgbaImage::from_pixel(8, 8, BLACK);
        holey.put_pixel(3, 3, CLEAR);
        let frames = vec![RgbaImage::from_pixel(8, 8, BLACK), holey];
        let source = Source::from_frames("blink", frames).unwrap();
        let unit = Variant::Sprite.convert(&source, &EncoderConfig::default()).unwrap();
        let masks = unit.masks().unwrap();
        assert_eq!(masks.len(), 2);
        assert_eq!(masks[0].words(), [0; 8]);
    }

    #[test]
    fn too_small_for_a_word() {
        let source = Source::from_frames("speck", vec![RgbaImage::from_pixel(1, 1, BLACK)]).unwrap();
        let err = Variant::Sprite.convert(&source, &no_mask()).unwrap_err();
        assert!(err.to_string().contains("no data"), "{err}");
    }
}
