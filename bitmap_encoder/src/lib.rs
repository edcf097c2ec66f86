/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Turns 1-bit images into `PROGMEM` arrays for a 96x64 monochrome LCD, and sprite arrays back
//! into images.
//!
//! Images are rotated a quarter turn clockwise before packing, so that each run of bits is one
//! column of the screen, with the bottom pixel in the most significant bit.
//! Four layouts are supported, see [`Variant`].

pub mod batch;
pub mod codec;
pub mod config;
pub mod declaration;
pub mod error;
pub mod geometry;
pub mod ident;
pub mod raster;
pub mod sampler;

pub use batch::{convert_batch, convert_files, decode_batch, decode_files, BatchReport, SizeAccumulator};
pub use config::EncoderConfig;
pub use error::{CodecError, Error, Result};
pub use geometry::{ConversionUnit, UnknownVariant, Variant};
pub use raster::{Raster, Source};
