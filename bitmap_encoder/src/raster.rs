/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The image capability the encoder consumes, and its adapter over the `image` crate.

use std::{io::Cursor, path::Path};

use image::{
    codecs::gif::GifDecoder, AnimationDecoder, DynamicImage, GrayAlphaImage, GrayImage, ImageFormat,
    ImageReader, Pixel, RgbaImage,
};
use log::debug;

use crate::error::{Error, Result};

/// Anything addressable by coordinate.
pub trait Raster {
    fn dimensions(&self) -> (u32, u32);
    fn luma(&self, x: u32, y: u32) -> u8;
    /// Opacity of the pixel; sources without transparency are fully opaque.
    fn alpha(&self, x: u32, y: u32) -> u8;
}

impl Raster for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn luma(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y).to_luma()[0]
    }

    fn alpha(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y)[3]
    }
}

impl Raster for GrayImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn luma(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y)[0]
    }

    fn alpha(&self, _x: u32, _y: u32) -> u8 {
        u8::MAX
    }
}

impl Raster for GrayAlphaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn luma(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y)[0]
    }

    fn alpha(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y)[1]
    }
}

/// A named image, possibly animated. Every frame has the same dimensions.
#[derive(Debug, Clone)]
pub struct Source {
    name: String,
    frames: Vec<RgbaImage>,
}

impl Source {
    pub fn from_frames(name: impl Into<String>, frames: Vec<RgbaImage>) -> Result<Self> {
        let name = name.into();
        let Some(first) = frames.first() else {
            return Err(Error::unsupported_input(&name, "no frames"));
        };
        let size = first.dimensions();
        if frames.iter().any(|frame| frame.dimensions() != size) {
            return Err(Error::unsupported_input(&name, "frames differ in size"));
        }
        Ok(Self { name, frames })
    }

    pub fn from_image(name: impl Into<String>, img: DynamicImage) -> Self {
        Self {
            name: name.into(),
            frames: vec![img.into_rgba8()],
        }
    }

    /// Decodes an in-memory image; GIFs yield one frame per animation frame.
    pub fn decode(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let name = name.into();
        let format = image::guess_format(bytes).map_err(|err| Error::unsupported_input(&name, err))?;
        if format == ImageFormat::Gif {
            let decoder = GifDecoder::new(Cursor::new(bytes))
                .map_err(|err| Error::unsupported_input(&name, err))?;
            return Self::from_animation(name, decoder);
        }
        let img = image::load_from_memory_with_format(bytes, format)
            .map_err(|err| Error::unsupported_input(&name, err))?;
        Ok(Self::from_image(name, img))
    }

    pub fn open(path: &Path) -> Result<Self> {
        let name = path.display().to_string();
        let reader = ImageReader::open(path)
            .and_then(ImageReader::with_guessed_format)
            .map_err(|source| Error::Io {
                name: name.clone(),
                source,
            })?;
        if reader.format() == Some(ImageFormat::Gif) {
            let decoder =
                GifDecoder::new(reader.into_inner()).map_err(|err| Error::unsupported_input(&name, err))?;
            return Self::from_animation(name, decoder);
        }
        let img = reader
            .decode()
            .map_err(|err| Error::unsupported_input(&name, err))?;
        Ok(Self::from_image(name, img))
    }

    fn from_animation<'a>(name: String, decoder: impl AnimationDecoder<'a>) -> Result<Self> {
        let frames = decoder
            .into_frames()
            .map(|frame| frame.map(image::Frame::into_buffer))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| Error::unsupported_input(&name, err))?;
        debug!("{name}: {} animation frame(s)", frames.len());
        Self::from_frames(name, frames)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    pub fn nb_frames(&self) -> usize {
        self.frames.len()
    }

    /// Dimensions of the (first) frame.
    pub fn dimensions(&self) -> (u32, u32) {
        self.frames[0].dimensions()
    }
}
