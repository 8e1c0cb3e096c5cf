//! Character reference decoding.
//!
//! Two entry points share one scanner:
//! - [`decode_entities`] is lenient and never fails. Anything it cannot decode is copied through
//!   unchanged. The tokenizer uses it for text and attribute values.
//! - [`normalize_character_references`] is strict about numeric references: a well-formed
//!   reference that names NUL, a surrogate, or a value past U+10FFFF is reported as an error
//!   instead of being copied through.
//!
//! Named references are limited to a practical subset (see `NAMED`), including the ones commonly
//! used to hide URL schemes (`&colon;`, `&Tab;`, `&NewLine;`). References must be
//! semicolon-terminated; numeric references may carry any number of leading zeros.

use std::fmt;

const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
const MAX_DEC_DIGITS: usize = 7; // 1114111
const MAX_NAME_LEN: usize = 32;

const NAMED: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{00A0}"),
    ("colon", ":"),
    ("Tab", "\t"),
    ("NewLine", "\n"),
    ("semi", ";"),
    ("comma", ","),
    ("period", "."),
    ("sol", "/"),
    ("bsol", "\\"),
    ("lpar", "("),
    ("rpar", ")"),
    ("equals", "="),
    ("excl", "!"),
    ("quest", "?"),
    ("num", "#"),
    ("percnt", "%"),
    ("copy", "\u{00A9}"),
    ("reg", "\u{00AE}"),
    ("trade", "\u{2122}"),
    ("deg", "\u{00B0}"),
    ("times", "\u{00D7}"),
    ("divide", "\u{00F7}"),
    ("euro", "\u{20AC}"),
    ("pound", "\u{00A3}"),
    ("hellip", "\u{2026}"),
    ("mdash", "\u{2014}"),
    ("ndash", "\u{2013}"),
    ("lsquo", "\u{2018}"),
    ("rsquo", "\u{2019}"),
    ("ldquo", "\u{201C}"),
    ("rdquo", "\u{201D}"),
    ("laquo", "\u{00AB}"),
    ("raquo", "\u{00BB}"),
    ("bull", "\u{2022}"),
    ("middot", "\u{00B7}"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharacterReferenceErrorKind {
    NullCharacter,
    Surrogate,
    OutOfRange,
}

/// A numeric character reference that does not name a usable Unicode scalar value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterReferenceError {
    pub kind: CharacterReferenceErrorKind,
    /// Byte offset of the `&` in the input.
    pub position: usize,
    /// The reference as written, including `&` and `;`.
    pub reference: String,
}

impl fmt::Display for CharacterReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            CharacterReferenceErrorKind::NullCharacter => "null character",
            CharacterReferenceErrorKind::Surrogate => "surrogate code point",
            CharacterReferenceErrorKind::OutOfRange => "code point out of range",
        };
        write!(
            f,
            "invalid character reference {} at byte {}: {what}",
            self.reference, self.position
        )
    }
}

impl std::error::Error for CharacterReferenceError {}

/// Decode character references, passing anything undecodable through unchanged.
pub fn decode_entities(s: &str) -> String {
    match decode(s, false) {
        Ok(out) => out,
        Err(_) => s.to_string(),
    }
}

/// Decode character references, failing on numeric references that name no valid character.
pub fn normalize_character_references(s: &str) -> Result<String, CharacterReferenceError> {
    decode(s, true)
}

enum Reference<'a> {
    Char(char),
    Str(&'a str),
    Invalid(CharacterReferenceErrorKind),
}

fn decode(s: &str, strict: bool) -> Result<String, CharacterReferenceError> {
    let bytes = s.as_bytes();
    if memchr::memchr(b'&', bytes).is_none() {
        return Ok(s.to_string());
    }

    let mut out = String::with_capacity(s.len());
    let mut copy_start = 0;
    let mut i = 0;

    while let Some(rel) = memchr::memchr(b'&', &bytes[i..]) {
        let amp = i + rel;
        // Flush bytes up to '&' unchanged (preserves UTF-8).
        out.push_str(&s[copy_start..amp]);

        match scan_reference(s, amp) {
            Some((Reference::Char(ch), end)) => {
                out.push(ch);
                copy_start = end;
            }
            Some((Reference::Str(text), end)) => {
                out.push_str(text);
                copy_start = end;
            }
            Some((Reference::Invalid(kind), end)) => {
                if strict {
                    return Err(CharacterReferenceError {
                        kind,
                        position: amp,
                        reference: s[amp..end].to_string(),
                    });
                }
                out.push_str(&s[amp..end]);
                copy_start = end;
            }
            None => {
                out.push('&');
                copy_start = amp + 1;
            }
        }
        i = copy_start;
    }

    out.push_str(&s[copy_start..]);
    Ok(out)
}

/// Recognize a semicolon-terminated reference starting at `amp`. Returns the decoded reference and
/// the byte offset just past the `;`.
fn scan_reference(s: &str, amp: usize) -> Option<(Reference<'_>, usize)> {
    let bytes = s.as_bytes();
    let mut j = amp + 1;

    if bytes.get(j) != Some(&b'#') {
        let start = j;
        while j < bytes.len() && j - start < MAX_NAME_LEN && bytes[j].is_ascii_alphanumeric() {
            j += 1;
        }
        if j == start || bytes.get(j) != Some(&b';') {
            return None;
        }
        let name = &s[start..j];
        let (_, text) = NAMED.iter().find(|(n, _)| *n == name)?;
        return Some((Reference::Str(text), j + 1));
    }

    j += 1;
    let hex = matches!(bytes.get(j), Some(b'x' | b'X'));
    if hex {
        j += 1;
    }
    let (max_digits, radix) = if hex {
        (MAX_HEX_DIGITS, 16)
    } else {
        (MAX_DEC_DIGITS, 10)
    };
    let is_digit = |b: u8| {
        if hex {
            b.is_ascii_hexdigit()
        } else {
            b.is_ascii_digit()
        }
    };

    let digits_start = j;
    while bytes.get(j) == Some(&b'0') {
        j += 1;
    }
    let significant_start = j;
    while j < bytes.len() && is_digit(bytes[j]) {
        j += 1;
    }
    if j == digits_start || bytes.get(j) != Some(&b';') {
        return None;
    }
    let end = j + 1;
    if j - significant_start > max_digits {
        return Some((Reference::Invalid(CharacterReferenceErrorKind::OutOfRange), end));
    }

    let value = if significant_start == j {
        0
    } else {
        u32::from_str_radix(&s[significant_start..j], radix).ok()?
    };
    let reference = match value {
        0 => Reference::Invalid(CharacterReferenceErrorKind::NullCharacter),
        0xD800..=0xDFFF => Reference::Invalid(CharacterReferenceErrorKind::Surrogate),
        v => match char::from_u32(v) {
            Some(ch) => Reference::Char(ch),
            None => Reference::Invalid(CharacterReferenceErrorKind::OutOfRange),
        },
    };
    Some((reference, end))
}
