/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use super::{BitmapFrame, TailBits, WordWidth, THRESHOLD};
use crate::{error::CodecError, sampler::PixelStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// Always produce a frame.
    Disabled,
    /// Entirely black or entirely white streams produce no frame at all.
    SkipSolid,
}

/// Packs a tonal pixel stream, in stream order, into words of `word_width` bits.
///
/// Returns `Ok(None)` when `suppression` is [`Suppression::SkipSolid`] and the stream is uniform;
/// callers should skip the frame rather than treat that as an error.
pub fn pack(
    stream: &PixelStream,
    word_width: WordWidth,
    suppression: Suppression,
    tail: TailBits,
) -> Result<Option<BitmapFrame>, CodecError> {
    let expected = stream.width as usize * stream.height as usize;
    if stream.pixels.len() != expected {
        return Err(CodecError::SizeMismatch {
            width: stream.width,
            height: stream.height,
            expected,
            actual: stream.pixels.len(),
        });
    }

    if suppression == Suppression::SkipSolid && is_solid(&stream.pixels) {
        return Ok(None);
    }

    let bits = word_width.bits();
    let mut words = Vec::with_capacity(tail.word_count(expected, word_width));
    let mut word = 0u16;
    let mut filled = 0;
    for &pixel in &stream.pixels {
        word = (word << 1) | u16::from(pixel < THRESHOLD);
        filled += 1;
        if filled == bits {
            words.push(word);
            word = 0;
            filled = 0;
        }
    }
    if filled != 0 && tail == TailBits::Pad {
        words.push(word << (bits - filled));
    }

    BitmapFrame::new(stream.width, stream.height, word_width, tail, words).map(Some)
}

fn is_solid(pixels: &[u8]) -> bool {
    let Some(&first) = pixels.first() else {
        return true;
    };
    let set = first < THRESHOLD;
    pixels.iter().all(|&pixel| (pixel < THRESHOLD) == set)
}
