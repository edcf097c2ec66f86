/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use image::{imageops, GrayImage, Luma};

use crate::{
    codec::THRESHOLD,
    error::{Error, Result},
    raster::Raster,
};

/// Images are stored rotated a quarter turn, so that a byte holds a vertical run of 8 pixels, which
/// is the order the LCD wants in text/block mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Encoding direction.
    Clockwise,
    /// Decoding direction; undoes [`Rotation::Clockwise`].
    CounterClockwise,
}

/// Row-major 8-bit pixel values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelStream {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PixelStream {
    /// Copies out the `width`×`height` rectangle whose top-left corner is at (`x`, `y`).
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        debug_assert!(x + width <= self.width && y + height <= self.height);
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for row in y..y + height {
            let start = row as usize * self.width as usize + x as usize;
            pixels.extend_from_slice(&self.pixels[start..start + width as usize]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    fn from_image(img: GrayImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            pixels: img.into_raw(),
        }
    }
}

/// One frame's worth of sampled data.
#[derive(Debug, Clone)]
pub struct Sampled {
    /// Thresholded to 0 (black) or 255 (white).
    pub pixels: PixelStream,
    pub alpha: Option<PixelStream>,
}

/// Reads a raster as 1-bit pixels, rotated, and optionally its alpha channel alongside.
pub fn sample(name: &str, raster: &impl Raster, rotation: Rotation, with_alpha: bool) -> Result<Sampled> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::unsupported_input(
            name,
            format!("{width}x{height} image has no pixels"),
        ));
    }

    let mono = GrayImage::from_fn(width, height, |x, y| Luma([binarize(raster.luma(x, y))]));
    let pixels = PixelStream::from_image(rotate(&mono, rotation));
    let alpha = with_alpha.then(|| {
        let alpha = GrayImage::from_fn(width, height, |x, y| Luma([raster.alpha(x, y)]));
        PixelStream::from_image(rotate(&alpha, rotation))
    });
    Ok(Sampled { pixels, alpha })
}

pub fn rotate(img: &GrayImage, rotation: Rotation) -> GrayImage {
    match rotation {
        Rotation::Clockwise => imageops::rotate90(img),
        Rotation::CounterClockwise => imageops::rotate270(img),
    }
}

fn binarize(luma: u8) -> u8 {
    if luma < THRESHOLD {
        0
    } else {
        u8::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn rotates_clockwise() {
        // 3 wide, 2 tall; only the top-left pixel is black.
        let mut img = GrayImage::from_pixel(3, 2, Luma([255]));
        img.put_pixel(0, 0, Luma([0]));
        let sampled = sample("t", &img, Rotation::Clockwise, false).unwrap();
        assert_eq!((sampled.pixels.width, sampled.pixels.height), (2, 3));
        // The top-left corner ends up top-right.
        assert_eq!(sampled.pixels.pixels, [255, 0, 255, 255, 255, 255]);
        assert!(sampled.alpha.is_none());
    }

    #[test]
    fn rotations_are_inverse() {
        let img = GrayImage::from_fn(5, 3, |x, y| Luma([if (x * 7 + y) % 3 == 0 { 0 } else { 255 }]));
        let there = rotate(&img, Rotation::Clockwise);
        assert_eq!(rotate(&there, Rotation::CounterClockwise), img);
    }

    #[test]
    fn thresholds_at_mid_gray() {
        let img = GrayImage::from_fn(4, 1, |x, _| Luma([[0, 127, 128, 255][x as usize]]));
        let sampled = sample("t", &img, Rotation::Clockwise, false).unwrap();
        assert_eq!(sampled.pixels.pixels, [0, 0, 255, 255]);
    }

    #[test]
    fn alpha_follows_the_same_rotation() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        let sampled = sample("t", &img, Rotation::Clockwise, true).unwrap();
        let alpha = sampled.alpha.unwrap();
        assert_eq!((alpha.width, alpha.height), (1, 2));
        assert_eq!(alpha.pixels, [255, 0]);
    }

    #[test]
    fn opaque_sources_have_full_alpha() {
        let img = GrayImage::from_pixel(2, 2, Luma([0]));
        let alpha = sample("t", &img, Rotation::Clockwise, true).unwrap().alpha.unwrap();
        assert!(alpha.pixels.iter().all(|&a| a == 255));
    }

    #[test]
    fn empty_images_are_rejected() {
        let img = GrayImage::new(0, 4);
        assert!(matches!(
            sample("blank.gif", &img, Rotation::Clockwise, false),
            Err(Error::UnsupportedInput { .. })
        ));
    }

    #[test]
    fn crop_copies_a_rectangle() {
        let stream = PixelStream {
            width: 4,
            height: 3,
            pixels: (0..12).collect(),
        };
        let sub = stream.crop(1, 1, 2, 2);
        assert_eq!(sub.pixels, [5, 6, 9, 10]);
        assert_eq!((sub.width, sub.height), (2, 2));
    }
}
