/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Packing of 1-bit pixel streams into words, and back.
//!
//! The target LCD treats a set bit as a lit (black) pixel, so polarity is the inverse of brightness:
//! dark pixels pack as 1, light pixels as 0. Bits are shifted in from the low end, so the first pixel
//! of a word ends up in its most significant bit.

mod pack;
mod unpack;

pub use pack::{pack, Suppression};
pub use unpack::{unpack, unpack_legacy};

use crate::error::CodecError;

/// Tonal values below this are "set" (black).
pub const THRESHOLD: u8 = 128;

/// Width of one packing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordWidth {
    Byte,
    Half,
}

impl WordWidth {
    pub const fn bits(self) -> u32 {
        match self {
            Self::Byte => 8,
            Self::Half => 16,
        }
    }

    pub const fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    /// Number of hex digits needed to print one word.
    pub const fn hex_digits(self) -> usize {
        self.bits() as usize / 4
    }
}

/// What to do with the pixels left over when a frame's pixel count isn't a multiple of the word width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TailBits {
    /// Silently discard them. This is what previously generated declarations contain.
    #[default]
    Drop,
    /// Emit one more word, MSB-aligned, with the unused low bits cleared (white).
    Pad,
}

impl TailBits {
    pub fn word_count(self, pixels: usize, width: WordWidth) -> usize {
        let bits = width.bits() as usize;
        match self {
            Self::Drop => pixels / bits,
            Self::Pad => pixels.div_ceil(bits),
        }
    }
}

/// One packed bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapFrame {
    width: u32,
    height: u32,
    word_width: WordWidth,
    words: Vec<u16>,
}

impl BitmapFrame {
    /// Wraps already-packed words, checking that their count matches the dimensions under `tail`.
    pub fn new(
        width: u32,
        height: u32,
        word_width: WordWidth,
        tail: TailBits,
        words: Vec<u16>,
    ) -> Result<Self, CodecError> {
        let expected = tail.word_count(width as usize * height as usize, word_width);
        if words.len() != expected {
            return Err(CodecError::WordCountMismatch {
                width,
                height,
                expected,
                actual: words.len(),
            });
        }
        Ok(Self {
            width,
            height,
            word_width,
            words,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn word_width(&self) -> WordWidth {
        self.word_width
    }

    pub fn words(&self) -> &[u16] {
        &self.words
    }

    /// Size of the packed data, in bytes.
    pub fn byte_len(&self) -> usize {
        self.words.len() * self.word_width.bytes()
    }
}
