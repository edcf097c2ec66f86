/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The four ways an image can be cut into frames.

mod icon;
mod sprite;
mod splash;
mod tileset;

use std::{fmt::Display, str::FromStr};

use log::{debug, info, warn};
use slicedisplay::SliceDisplay;

use crate::{
    codec::{pack, BitmapFrame, Suppression, WordWidth},
    config::EncoderConfig,
    declaration::{self, Declaration, Decoded},
    error::{Error, Result},
    ident::identifier,
    raster::Source,
    sampler::Sampled,
};

/// What every variant has to decide for itself.
trait Geometry {
    fn word_width(&self) -> WordWidth;

    fn has_size_prefix(&self) -> bool {
        false
    }

    fn supports_mask(&self) -> bool {
        false
    }

    /// Rejects images the variant cannot handle, naming the constraint and the actual dimensions.
    fn validate(&self, name: &str, width: u32, height: u32) -> Result<()>;

    /// Samples every frame that will be packed, in output order.
    fn sample_frames(&self, source: &Source, with_alpha: bool) -> Result<Vec<Sampled>>;

    fn item_count(&self, _unit: &ConversionUnit) -> usize {
        1
    }

    fn render(&self, unit: &ConversionUnit, config: &EncoderConfig) -> String {
        primary_declaration(self, unit, config).render(config.line_width)
    }
}

/// The declaration holding a unit's frames, as most variants print it.
fn primary_declaration<'a, G: Geometry + ?Sized>(
    geometry: &G,
    unit: &'a ConversionUnit,
    config: &'a EncoderConfig,
) -> Declaration<'a> {
    let word_width = geometry.word_width();
    let decl = Declaration::new(config.type_name(word_width), &unit.name, word_width.hex_digits());
    let decl = match (geometry.has_size_prefix(), unit.frames.first()) {
        (true, Some(first)) => decl.size_prefix(first.width(), first.height()),
        _ => decl,
    };
    decl.frames(unit.frames.iter().map(BitmapFrame::words))
}

/// Warns about, and ignores, all but the first frame of an animation.
fn first_frame(source: &Source) -> &image::RgbaImage {
    if source.nb_frames() != 1 {
        warn!(
            "{} contains {} frames, but only the first one will be processed",
            source.name(),
            source.nb_frames()
        );
    }
    &source.frames()[0]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Sprite,
    Tileset,
    Icon,
    Splash,
}

impl Variant {
    pub const ALL: [Self; 4] = [Self::Sprite, Self::Tileset, Self::Icon, Self::Splash];
    pub const NAMES: [&'static str; 4] = ["sprite", "tileset", "icon", "splash"];

    pub fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    fn geometry(self) -> &'static dyn Geometry {
        match self {
            Self::Sprite => &sprite::Sprite,
            Self::Tileset => &tileset::Tileset,
            Self::Icon => &icon::Icon,
            Self::Splash => &splash::Splash,
        }
    }

    pub fn word_width(self) -> WordWidth {
        self.geometry().word_width()
    }

    pub fn supports_mask(self) -> bool {
        self.geometry().supports_mask()
    }

    pub fn validate(self, name: &str, width: u32, height: u32) -> Result<()> {
        self.geometry().validate(name, width, height)
    }

    /// Validates, samples and packs `source`.
    pub fn convert(self, source: &Source, config: &EncoderConfig) -> Result<ConversionUnit> {
        let geometry = self.geometry();
        let name = source.name();
        let (width, height) = source.dimensions();
        geometry.validate(name, width, height)?;

        let with_alpha = config.mask && geometry.supports_mask();
        let sampled = geometry.sample_frames(source, with_alpha)?;
        let word_width = geometry.word_width();

        // Dropping a frame would shift the indices of all those after it.
        let mut frames = Vec::with_capacity(sampled.len());
        for (i, s) in sampled.iter().enumerate() {
            if let Some(frame) = pack(&s.pixels, word_width, Suppression::Disabled, config.tail)
                .map_err(|err| Error::codec(name, err))?
            {
                debug!("{name}: frame {i} is {}x{}, {} words", frame.width(), frame.height(), frame.words().len());
                frames.push(frame);
            }
        }
        if frames.iter().all(|frame| frame.words().is_empty()) {
            return Err(Error::conversion(name, "no data"));
        }

        let masks = if with_alpha {
            let alpha = sampled.iter().filter_map(|s| s.alpha.as_ref());
            sprite::mask_frames(name, alpha, word_width, config.tail)?
        } else {
            None
        };

        Ok(ConversionUnit {
            name: identifier(name),
            variant: self,
            frames,
            masks,
        })
    }

    /// Reads back the images stored in generated code. Only sprites can be decoded.
    pub fn decode(self, source_name: &str, text: &str, config: &EncoderConfig) -> Result<Decoded> {
        match self {
            Self::Sprite => declaration::decode(source_name, text, config),
            _ => Err(Error::unsupported_operation(
                source_name,
                format!("decoding is not implemented for '{self}'"),
            )),
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant '{0}' (expected one of {names})", names = Variant::NAMES.display())]
pub struct UnknownVariant(String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "tiles" => Ok(Self::Tileset),
            _ => Self::ALL
                .into_iter()
                .find(|variant| variant.name() == lower)
                .ok_or_else(|| UnknownVariant(s.to_owned())),
        }
    }
}

/// The packed frames of one source, ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionUnit {
    name: String,
    variant: Variant,
    frames: Vec<BitmapFrame>,
    masks: Option<Vec<BitmapFrame>>,
}

impl ConversionUnit {
    /// The identifier the declarations are named after.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn frames(&self) -> &[BitmapFrame] {
        &self.frames
    }

    pub fn masks(&self) -> Option<&[BitmapFrame]> {
        self.masks.as_deref()
    }

    /// How many images this unit counts for in the batch totals.
    pub fn item_count(&self) -> usize {
        self.variant.geometry().item_count(self)
    }

    /// Bytes of program memory the generated declarations occupy.
    pub fn byte_len(&self) -> usize {
        let geometry = self.variant.geometry();
        let prefix = if geometry.has_size_prefix() {
            2 * geometry.word_width().bytes()
        } else {
            0
        };
        let data = |frames: &[BitmapFrame]| prefix + frames.iter().map(BitmapFrame::byte_len).sum::<usize>();
        data(&self.frames) + self.masks().map_or(0, data)
    }

    pub fn to_code(&self, config: &EncoderConfig) -> String {
        let code = self.variant.geometry().render(self, config);
        info!(
            "{}: {} {} frame(s), {} bytes",
            self.name,
            self.frames.len(),
            self.variant,
            self.byte_len()
        );
        code
    }
}
