/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use std::iter::Peekable;

use image::GrayImage;
use log::debug;

use super::{
    lexer::{Lexer, Token, TokenKind},
    KEYWORD,
};
use crate::{
    codec::{unpack_legacy, TailBits, WordWidth},
    config::EncoderConfig,
    error::{CodecError, Error, Result},
};

/// A declaration as found in the text, before any interpretation of its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDeclaration<'a> {
    /// Everything between the keyword and the name, e.g. `prog_uchar` or `const prog_uchar`.
    pub type_name: String,
    pub name: &'a str,
    pub line: usize,
    /// The number literals of the body, in order.
    pub values: Vec<&'a str>,
    pub nb_frame_markers: usize,
}

/// Finds every `PROGMEM <type> <name>[] = { ... }` in `text`.
///
/// Anything outside such declarations is ignored, including comments and string literals that
/// happen to contain braces, and other uses of the keyword (`#define`s, attributes after a name).
pub fn scan(text: &str) -> Result<Vec<RawDeclaration<'_>>, CodecError> {
    let mut tokens = Lexer::new(text).peekable();
    let mut found = Vec::new();
    while let Some(token) = tokens.next() {
        let token = token?;
        if token.kind != TokenKind::Ident(KEYWORD) {
            continue;
        }
        let mut attempt = tokens.clone();
        match head(&mut attempt)? {
            Some((type_words, name)) => {
                tokens = attempt;
                found.push(body(&mut tokens, token.line, type_words, name)?);
            }
            None => debug!("line {}: {KEYWORD} does not open an array declaration", token.line),
        }
    }
    Ok(found)
}

type Tokens<'a> = Peekable<Lexer<'a>>;

fn malformed(line: usize, reason: impl Into<String>) -> CodecError {
    CodecError::Malformed {
        line,
        reason: reason.into(),
    }
}

fn next_token<'a>(tokens: &mut Tokens<'a>, line: usize, expecting: &str) -> Result<Token<'a>, CodecError> {
    match tokens.next() {
        Some(token) => token,
        None => Err(malformed(line, format!("input ends where {expecting} was expected"))),
    }
}

/// Matches `<type words...> <name> [ ] = {`, or returns `None`.
fn head<'a>(tokens: &mut Tokens<'a>) -> Result<Option<(Vec<&'a str>, &'a str)>, CodecError> {
    let mut words = Vec::new();
    loop {
        match tokens.next().transpose()?.map(|token| token.kind) {
            Some(TokenKind::Ident(word)) => words.push(word),
            Some(TokenKind::Punct('[')) => break,
            _ => return Ok(None),
        }
    }
    for punct in [']', '=', '{'] {
        if tokens.next().transpose()?.map(|token| token.kind) != Some(TokenKind::Punct(punct)) {
            return Ok(None);
        }
    }
    match words.split_last() {
        Some((name, type_words)) if !type_words.is_empty() => Ok(Some((type_words.to_vec(), *name))),
        _ => Ok(None),
    }
}

fn body<'a>(
    tokens: &mut Tokens<'a>,
    line: usize,
    type_words: Vec<&'a str>,
    name: &'a str,
) -> Result<RawDeclaration<'a>, CodecError> {
    let mut values = Vec::new();
    let mut nb_frame_markers = 0;
    loop {
        let token = next_token(tokens, line, "'}'")?;
        match token.kind {
            TokenKind::Number(value) => values.push(value),
            TokenKind::Punct(',') => {}
            TokenKind::FrameMarker(_) => nb_frame_markers += 1,
            TokenKind::Punct('}') => break,
            other => {
                return Err(malformed(token.line, format!("unexpected {other:?} in the body of {name}")))
            }
        }
    }
    if let Some(Ok(Token {
        kind: TokenKind::Punct(';'),
        ..
    })) = tokens.peek()
    {
        tokens.next();
    }

    Ok(RawDeclaration {
        type_name: type_words.join(" "),
        name,
        line,
        values,
        nb_frame_markers,
    })
}

/// Width, height and words of a single-frame, size-prefixed declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyBitmap {
    pub name: String,
    pub word_width: WordWidth,
    /// Width and height, then the words.
    pub data: Vec<u16>,
}

impl RawDeclaration<'_> {
    /// Interprets the body as `width, height, words...`.
    ///
    /// Only single-frame declarations carrying their size can be read back; animations, tile sets,
    /// icons and splash screens are refused.
    pub fn to_legacy(&self, word_width: WordWidth) -> Result<LegacyBitmap> {
        if self.nb_frame_markers > 1 {
            return Err(Error::unsupported_operation(
                self.name,
                format!(
                    "it holds {} frames; only single-frame declarations can be decoded",
                    self.nb_frame_markers
                ),
            ));
        }
        let is_decimal = |value: &&str| value.bytes().all(|b| b.is_ascii_digit());
        if self.values.len() < 2 || !self.values[..2].iter().all(is_decimal) {
            return Err(Error::unsupported_operation(
                self.name,
                "it does not start with its width and height",
            ));
        }

        let mut data = Vec::with_capacity(self.values.len());
        for dimension in &self.values[..2] {
            let dimension = dimension.parse::<u16>().map_err(|_| {
                Error::codec(self.name, malformed(self.line, format!("dimension {dimension} is too large")))
            })?;
            data.push(dimension);
        }
        let max = u16::MAX >> (16 - word_width.bits());
        for value in &self.values[2..] {
            let digits = value
                .strip_prefix("0x")
                .or_else(|| value.strip_prefix("0X"))
                .unwrap_or(value);
            match u16::from_str_radix(digits, 16) {
                Ok(word) if word <= max => data.push(word),
                _ => {
                    return Err(Error::codec(
                        self.name,
                        malformed(self.line, format!("{value} is not a {}-bit hex word", word_width.bits())),
                    ))
                }
            }
        }

        let (width, height) = (usize::from(data[0]), usize::from(data[1]));
        let pixels = width * height;
        if pixels == 0 {
            return Err(Error::codec(
                self.name,
                malformed(self.line, format!("a {width}x{height} bitmap has no pixels")),
            ));
        }
        // The last word is either dropped or padded when the pixels don't fill it.
        let nb_words = data.len() - 2;
        let fewest = TailBits::Drop.word_count(pixels, word_width);
        let most = TailBits::Pad.word_count(pixels, word_width);
        if !(fewest..=most).contains(&nb_words) {
            let expected = if fewest == most {
                fewest.to_string()
            } else {
                format!("{fewest} or {most}")
            };
            return Err(Error::codec(
                self.name,
                malformed(
                    self.line,
                    format!("a {width}x{height} bitmap needs {expected} words, found {nb_words}"),
                ),
            ));
        }

        Ok(LegacyBitmap {
            name: self.name.to_owned(),
            word_width,
            data,
        })
    }
}

/// What could be read back from one text.
#[derive(Debug, Default)]
pub struct Decoded {
    pub images: Vec<(String, GrayImage)>,
    /// Declarations of ours that could not be turned into images, in order.
    pub failures: Vec<Error>,
}

/// Recovers the images stored in every declaration of ours found in `text`.
///
/// Declarations whose type isn't one of the configured ones are skipped. One that can't be decoded
/// is recorded in [`Decoded::failures`] without affecting the others.
pub fn decode(source_name: &str, text: &str, config: &EncoderConfig) -> Result<Decoded> {
    let declarations = scan(text).map_err(|err| Error::codec(source_name, err))?;

    let mut decoded = Decoded::default();
    for decl in &declarations {
        let Some(word_width) = config.word_width_of(&decl.type_name) else {
            debug!("{source_name}:{}: skipping {} {}", decl.line, decl.type_name, decl.name);
            continue;
        };
        let image = decl.to_legacy(word_width).and_then(|bitmap| {
            let img = unpack_legacy(&bitmap.data, word_width).map_err(|err| Error::codec(decl.name, err))?;
            Ok((bitmap.name, img))
        });
        match image {
            Ok((name, img)) => {
                debug!("{source_name}: decoded {name} ({}x{})", img.width(), img.height());
                decoded.images.push((name, img));
            }
            Err(err) => decoded.failures.push(err),
        }
    }
    Ok(decoded)
}
