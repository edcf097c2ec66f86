/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The `PROGMEM` array literals that carry packed bitmaps in Arduino source.

mod format;
mod lexer;
mod parse;

pub use format::Declaration;
pub use parse::{decode, scan, Decoded, LegacyBitmap, RawDeclaration};

/// Storage qualifier opening every declaration.
pub const KEYWORD: &str = "PROGMEM";
/// Text of the comment preceding each frame, followed by the frame's index.
const FRAME_MARKER: &str = "Frame";
