/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use std::path::Path;

const FALLBACK: &str = "no_name";

/// Creates a reasonable C identifier from a file name.
///
/// The directory and extension are stripped, anything that isn't an ASCII letter or digit becomes an
/// underscore (runs collapse into one, trailing ones are trimmed), and a leading digit gets an
/// underscore prepended.
pub fn identifier(source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();

    let mut ident = String::with_capacity(stem.len() + 1);
    for c in stem.chars() {
        let c = if c.is_ascii_alphanumeric() { c } else { '_' };
        if c == '_' && ident.ends_with('_') {
            continue;
        }
        ident.push(c);
    }
    let trimmed = ident.trim_end_matches('_').len();
    ident.truncate(trimmed);

    if ident.is_empty() {
        return FALLBACK.to_owned();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_identifier(s: &str) -> bool {
        let mut chars = s.chars();
        chars
            .next()
            .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
            && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
    }

    #[test]
    fn strips_directory_and_extension() {
        assert_eq!(identifier("art/sprites/hero.gif"), "hero");
        assert_eq!(identifier("hero"), "hero");
    }

    #[test]
    fn replaces_punctuation_and_whitespace() {
        assert_eq!(identifier("my sprite-sheet (v2).gif"), "my_sprite_sheet_v2");
        assert_eq!(identifier("a...b.png"), "a_b");
        assert_eq!(identifier("logo_.png"), "logo");
    }

    #[test]
    fn leading_digit_is_escaped() {
        assert_eq!(identifier("8ball.gif"), "_8ball");
        assert_eq!(identifier("-1.gif"), "_1");
    }

    #[test]
    fn never_empty() {
        assert_eq!(identifier(""), FALLBACK);
        assert_eq!(identifier("___.gif"), FALLBACK);
        assert_eq!(identifier("dir/"), "dir");
    }

    #[test]
    fn derived_names_are_identifiers() {
        for name in ["x.gif", "9 lives.png", "été.gif", "+++", "a b\tc", "stdin"] {
            let ident = identifier(name);
            assert!(is_identifier(&ident), "{name:?} gave {ident:?}");
        }
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }
}
