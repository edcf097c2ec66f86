/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use super::FRAME_MARKER;
use crate::error::CodecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    Ident(&'a str),
    /// Any run of alphanumerics starting with a digit; interpreted by the parser.
    Number(&'a str),
    Str(&'a str),
    Punct(char),
    /// A `// Frame N` comment.
    FrameMarker(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub line: usize,
}

/// Splits C-ish source into tokens. Comments are skipped, except for frame markers.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Consumes bytes while `pred` holds, returning them.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_whitespace(&mut self) {
        let skipped = self.take_while(char::is_whitespace);
        self.line += skipped.matches('\n').count();
    }

    fn line_comment(&mut self) -> Option<TokenKind<'a>> {
        let text = self.take_while(|c| c != '\n');
        let body = text[2..].trim();
        body.strip_prefix(FRAME_MARKER)
            .and_then(|index| index.trim().parse().ok())
            .map(TokenKind::FrameMarker)
    }

    fn block_comment(&mut self) -> Result<(), CodecError> {
        let start = self.line;
        let Some(end) = self.rest()[2..].find("*/") else {
            return Err(CodecError::Malformed {
                line: start,
                reason: "unterminated block comment".to_owned(),
            });
        };
        let comment = &self.rest()[..end + 4];
        self.line += comment.matches('\n').count();
        self.pos += comment.len();
        Ok(())
    }

    /// String literals never span lines; a stray quote is just punctuation.
    fn string(&mut self) -> TokenKind<'a> {
        let rest = self.rest();
        let line_end = rest.find('\n').unwrap_or(rest.len());
        match rest[1..line_end].find('"') {
            Some(close) => {
                self.pos += close + 2;
                TokenKind::Str(&rest[1..close + 1])
            }
            None => {
                self.pos += 1;
                TokenKind::Punct('"')
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            let c = rest.chars().next()?;
            let line = self.line;

            let kind = if rest.starts_with("//") {
                match self.line_comment() {
                    Some(marker) => marker,
                    None => continue,
                }
            } else if rest.starts_with("/*") {
                if let Err(err) = self.block_comment() {
                    // Nothing sensible can follow an unterminated comment.
                    self.pos = self.src.len();
                    return Some(Err(err));
                }
                continue;
            } else if c == '"' {
                self.string()
            } else if c.is_ascii_digit() {
                TokenKind::Number(self.take_while(|c| c.is_ascii_alphanumeric() || c == '_'))
            } else if c.is_ascii_alphabetic() || c == '_' {
                TokenKind::Ident(self.take_while(|c| c.is_ascii_alphanumeric() || c == '_'))
            } else {
                self.pos += c.len_utf8();
                TokenKind::Punct(c)
            };
            return Some(Ok(Token { kind, line }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(src: &str) -> Vec<TokenKind<'_>> {
        Lexer::new(src).map(|token| token.unwrap().kind).collect()
    }

    #[test]
    fn declaration_tokens() {
        assert_eq!(
            kinds("PROGMEM prog_uchar a[] = { 8, 8, 0xff };"),
            [
                Ident("PROGMEM"),
                Ident("prog_uchar"),
                Ident("a"),
                Punct('['),
                Punct(']'),
                Punct('='),
                Punct('{'),
                Number("8"),
                Punct(','),
                Number("8"),
                Punct(','),
                Number("0xff"),
                Punct('}'),
                Punct(';'),
            ]
        );
    }

    #[test]
    fn comments_hide_braces() {
        assert_eq!(
            kinds("{ // not a } brace\n /* nor { this } */ 1 }"),
            [Punct('{'), Number("1"), Punct('}')]
        );
    }

    #[test]
    fn frame_markers_survive() {
        assert_eq!(
            kinds("// Frame 0\n1,\n  //   Frame 12  \n// Frames are fun"),
            [FrameMarker(0), Number("1"), Punct(','), FrameMarker(12)]
        );
    }

    #[test]
    fn strings_hide_braces() {
        assert_eq!(kinds(r#"x = "}{";"#), [Ident("x"), Punct('='), Str("}{"), Punct(';')]);
        assert_eq!(kinds("it\"s"), [Ident("it"), Punct('"'), Ident("s")]);
    }

    #[test]
    fn tracks_lines() {
        let lines: Vec<_> = Lexer::new("a\n/*\n\n*/ b\n\nc")
            .map(|token| token.unwrap().line)
            .collect();
        assert_eq!(lines, [1, 4, 6]);
    }

    #[test]
    fn unterminated_comment_is_malformed() {
        let mut lexer = Lexer::new("a\n/* }");
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert_eq!(
            lexer.next(),
            Some(Err(CodecError::Malformed {
                line: 2,
                reason: "unterminated block comment".to_owned()
            }))
        );
        assert_eq!(lexer.next(), None);
    }
}
