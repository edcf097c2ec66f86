/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use crate::codec::{TailBits, WordWidth};

pub const DEFAULT_LINE_WIDTH: usize = 78;

/// Knobs shared by every variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Column at which array literals wrap.
    pub line_width: usize,
    /// Whether sprites get a second, transparency-derived "mask" declaration.
    pub mask: bool,
    pub tail: TailBits,
    /// Arduino type used for 8-bit words.
    pub byte_type: String,
    /// Arduino type used for 16-bit words.
    pub word_type: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            mask: true,
            tail: TailBits::Drop,
            byte_type: "prog_uchar".to_owned(),
            word_type: "prog_uint16_t".to_owned(),
        }
    }
}

impl EncoderConfig {
    pub fn type_name(&self, width: WordWidth) -> &str {
        match width {
            WordWidth::Byte => &self.byte_type,
            WordWidth::Half => &self.word_type,
        }
    }

    /// The word width a declaration's type name stands for, if it's one of ours.
    pub fn word_width_of(&self, type_name: &str) -> Option<WordWidth> {
        if type_name == self.byte_type {
            Some(WordWidth::Byte)
        } else if type_name == self.word_type {
            Some(WordWidth::Half)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_map_both_ways() {
        let config = EncoderConfig::default();
        for width in [WordWidth::Byte, WordWidth::Half] {
            assert_eq!(config.word_width_of(config.type_name(width)), Some(width));
        }
        assert_eq!(config.word_width_of("uint32_t"), None);
    }
}
