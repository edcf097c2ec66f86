/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use super::{first_frame, Geometry};
use crate::{
    codec::WordWidth,
    error::{Error, Result},
    raster::Source,
    sampler::{sample, Rotation, Sampled},
};

const SIZE: u32 = 16;
const TILE: u32 = 4;

/// A 16x16 image holding a 4x4 grid of 4x4 tiles; each tile is one 16-bit word.
pub(super) struct Tileset;

impl Geometry for Tileset {
    fn word_width(&self) -> WordWidth {
        WordWidth::Half
    }

    fn validate(&self, name: &str, width: u32, height: u32) -> Result<()> {
        if (width, height) != (SIZE, SIZE) {
            return Err(Error::conversion(
                name,
                format!("expected a {SIZE}x{SIZE} image, got {width}x{height}"),
            ));
        }
        Ok(())
    }

    fn sample_frames(&self, source: &Source, _with_alpha: bool) -> Result<Vec<Sampled>> {
        let whole = sample(source.name(), first_frame(source), Rotation::Clockwise, false)?.pixels;

        let mut tiles = Vec::with_capacity((SIZE / TILE * SIZE / TILE) as usize);
        for y in (0..SIZE).step_by(TILE as usize) {
            for x in (0..SIZE).step_by(TILE as usize) {
                tiles.push(Sampled {
                    pixels: whole.crop(x, y, TILE, TILE),
                    alpha: None,
                });
            }
        }
        Ok(tiles)
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use crate::{config::EncoderConfig, error::Error, geometry::Variant, raster::Source};

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn checkerboard() {
        let img = RgbaImage::from_fn(16, 16, |x, y| if (x + y) % 2 == 0 { BLACK } else { WHITE });
        let source = Source::from_frames("checker.png", vec![img]).unwrap();
        let config = EncoderConfig::default();
        let unit = Variant::Tileset.convert(&source, &config).unwrap();

        assert_eq!(unit.frames().len(), 16);
        assert!(unit.frames().iter().all(|tile| tile.words() == [0x5a5a]));
        assert_eq!(unit.byte_len(), 32);
        assert_eq!(unit.item_count(), 1);

        let code = unit.to_code(&config);
        assert!(code.starts_with("PROGMEM prog_uint16_t checker[] = {\n    // Frame 0\n"), "{code}");
        assert_eq!(code.matches("0x5a5a,").count(), 16);
        assert!(!code.contains("16, 16"));
    }

    #[test]
    fn scan_order_is_rows_then_columns() {
        // Once rotated clockwise, source column x becomes row x and source row y becomes column 15 - y.
        let img = RgbaImage::from_fn(16, 16, |x, y| {
            let tile_1 = x < 4 && (8..12).contains(&y);
            let tile_4 = (4..8).contains(&x) && y >= 12;
            if tile_1 || tile_4 {
                BLACK
            } else {
                WHITE
            }
        });
        let source = Source::from_frames("grid.png", vec![img]).unwrap();
        let unit = Variant::Tileset.convert(&source, &EncoderConfig::default()).unwrap();

        let words: Vec<u16> = unit.frames().iter().map(|tile| tile.words()[0]).collect();
        let mut expected = [0u16; 16];
        expected[1] = 0xffff;
        expected[4] = 0xffff;
        assert_eq!(words, expected);
    }

    #[test]
    fn must_be_16_by_16() {
        for (width, height) in [(15, 16), (16, 17), (32, 32), (8, 8)] {
            let source = Source::from_frames("tiles.png", vec![RgbaImage::new(width, height)]).unwrap();
            let err = Variant::Tileset.convert(&source, &EncoderConfig::default()).unwrap_err();
            assert!(matches!(err, Error::Conversion { .. }));
            assert!(err.to_string().contains(&format!("expected a 16x16 image, got {width}x{height}")));
        }
    }

    #[test]
    fn solid_tiles_are_kept() {
        let source = Source::from_frames("blank.png", vec![RgbaImage::from_pixel(16, 16, WHITE)]).unwrap();
        let unit = Variant::Tileset.convert(&source, &EncoderConfig::default()).unwrap();
        assert_eq!(unit.frames().len(), 16);
        assert!(unit.frames().iter().all(|tile| tile.words() == [0]));
    }
}
