/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use super::{FRAME_MARKER, KEYWORD};

const INDENT: &str = "    ";

/// A named array literal holding one or more frames of packed words.
#[derive(Debug, Clone)]
pub struct Declaration<'a> {
    type_name: &'a str,
    name: &'a str,
    hex_digits: usize,
    size_prefix: Option<(u32, u32)>,
    frames: Vec<&'a [u16]>,
}

impl<'a> Declaration<'a> {
    pub fn new(type_name: &'a str, name: &'a str, hex_digits: usize) -> Self {
        Self {
            type_name,
            name,
            hex_digits,
            size_prefix: None,
            frames: Vec::new(),
        }
    }

    /// Emit `width, height,` ahead of the frames.
    pub fn size_prefix(mut self, width: u32, height: u32) -> Self {
        self.size_prefix = Some((width, height));
        self
    }

    pub fn frame(mut self, words: &'a [u16]) -> Self {
        self.frames.push(words);
        self
    }

    pub fn frames(mut self, frames: impl IntoIterator<Item = &'a [u16]>) -> Self {
        self.frames.extend(frames);
        self
    }

    /// Renders the declaration, wrapping word literals so that no line exceeds `line_width` columns
    /// (unless a single literal is wider than that on its own).
    pub fn render(&self, line_width: usize) -> String {
        let mut code = format!("{KEYWORD} {} {}[] = {{\n", self.type_name, self.name);
        if let Some((width, height)) = self.size_prefix {
            code.push_str(&format!("{INDENT}{width}, {height},\n"));
        }

        for (i, words) in self.frames.iter().enumerate() {
            code.push_str(&format!("{INDENT}// {FRAME_MARKER} {i}\n"));

            let mut line = String::new();
            for word in words.iter() {
                let literal = format!("0x{word:0digits$x},", digits = self.hex_digits);
                if !line.is_empty() && INDENT.len() + line.len() + 1 + literal.len() > line_width {
                    code.push_str(INDENT);
                    code.push_str(&line);
                    code.push('\n');
                    line.clear();
                }
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&literal);
            }
            if !line.is_empty() {
                code.push_str(INDENT);
                code.push_str(&line);
                code.push('\n');
            }
        }

        code.push_str("};\n");
        code
    }
}
