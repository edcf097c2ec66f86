/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use image::GrayImage;

use super::WordWidth;
use crate::{
    error::CodecError,
    sampler::{rotate, Rotation},
};

/// Rebuilds the source image from packed words, undoing the storage rotation.
///
/// `width` and `height` are the packed (rotated) frame's dimensions. Pixels that the packer dropped
/// because they didn't fill a whole word cannot be recovered and come back white.
pub fn unpack(words: &[u16], word_width: WordWidth, width: u32, height: u32) -> GrayImage {
    let len = width as usize * height as usize;
    let bits = word_width.bits();
    let mut pixels: Vec<u8> = words
        .iter()
        .flat_map(|&word| (0..bits).rev().map(move |bit| word >> bit & 1))
        .map(|bit| if bit == 1 { 0 } else { u8::MAX })
        .take(len)
        .collect();
    pixels.resize(len, u8::MAX);

    let Some(img) = GrayImage::from_raw(width, height, pixels) else {
        unreachable!("pixel buffer was resized to {width}x{height}");
    };
    rotate(&img, Rotation::CounterClockwise)
}

/// Like [`unpack`], for the layout where the width and height precede the words.
pub fn unpack_legacy(data: &[u16], word_width: WordWidth) -> Result<GrayImage, CodecError> {
    let [width, height, words @ ..] = data else {
        return Err(CodecError::MissingDimensions(data.len()));
    };
    Ok(unpack(words, word_width, u32::from(*width), u32::from(*height)))
}
