//! Practical HTML tokenizer.
//!
//! Tag and attribute names are restricted to ASCII `[A-Za-z0-9:_-]` and lower-cased. Text and
//! attribute values are entity-decoded. `script` and `style` bodies are raw text: they are neither
//! decoded nor scanned for markup, and end at the first case-insensitive `</script` (or
//! `</style`) followed by ASCII whitespace, `/` or `>`. Anything up to the next `>` belongs to
//! the close tag.
//!
//! Known limitations:
//! - Not an HTML5 tokenizer state machine; there is no parse-error recovery beyond what is listed
//!   here.
//! - A `<` that does not open a tag, comment, or doctype is kept as literal text.
//! - Duplicate attributes keep the first occurrence, as browsers do.
use crate::entities::decode_entities;
use crate::types::Token;
use memchr::memchr;

const COMMENT_START: &str = "<!--";
const COMMENT_ENDS: [&str; 2] = ["-->", "--!>"];
const DOCTYPE_START: &[u8] = b"<!doctype";

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':')
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack
        .get(start..start + needle.len())
        .is_some_and(|s| s.eq_ignore_ascii_case(needle))
}

pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

pub fn is_raw_text_element(name: &str) -> bool {
    matches!(name, "script" | "style")
}

pub fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input).run()
}

// Invariant: `pos` may sit inside a multi-byte character only while skipping junk bytes. Slices
// are only cut at ASCII structural bytes, which are always UTF-8 boundaries.
struct Tokenizer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] != b'<' {
                self.text();
            } else if self.input[self.pos..].starts_with(COMMENT_START) {
                self.comment();
            } else if starts_with_ignore_ascii_case_at(self.bytes, self.pos, DOCTYPE_START) {
                self.doctype();
            } else {
                match self.bytes.get(self.pos + 1).copied() {
                    Some(b'/') if self.bytes.get(self.pos + 2).is_some_and(|b| is_name_byte(*b)) => {
                        self.end_tag()
                    }
                    Some(b) if b.is_ascii_alphabetic() => self.start_tag(),
                    Some(b'!' | b'?') => self.bogus_comment(),
                    _ => {
                        self.push_text("<".to_string());
                        self.pos += 1;
                    }
                }
            }
        }
        self.tokens
    }

    fn push_text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        if let Some(Token::Text(last)) = self.tokens.last_mut() {
            last.push_str(&text);
        } else {
            self.tokens.push(Token::Text(text));
        }
    }

    fn find_from(&self, start: usize, needle: u8) -> Option<usize> {
        memchr(needle, &self.bytes[start..]).map(|rel| start + rel)
    }

    fn text(&mut self) {
        let start = self.pos;
        let end = self.find_from(start, b'<').unwrap_or(self.bytes.len());
        self.pos = end;
        let decoded = decode_entities(&self.input[start..end]);
        self.push_text(decoded);
    }

    /// `<!-->` and `<!--->` are empty comments. Otherwise the comment ends at the first `-->` or
    /// `--!>`, or runs to the end of input.
    fn comment(&mut self) {
        let body_start = self.pos + COMMENT_START.len();
        let rest = &self.input[body_start..];
        for abrupt in [">", "->"] {
            if rest.starts_with(abrupt) {
                self.tokens.push(Token::Comment(String::new()));
                self.pos = body_start + abrupt.len();
                return;
            }
        }
        let close = COMMENT_ENDS
            .iter()
            .filter_map(|end| rest.find(end).map(|rel| (rel, end.len())))
            .min();
        match close {
            Some((rel, len)) => {
                self.tokens.push(Token::Comment(rest[..rel].to_string()));
                self.pos = body_start + rel + len;
            }
            None => {
                self.tokens.push(Token::Comment(rest.to_string()));
                self.pos = self.bytes.len();
            }
        }
    }

    /// `<!foo>` and `<?foo>` become comments holding everything between `<!`/`<` and `>`.
    fn bogus_comment(&mut self) {
        let body_start = if self.bytes[self.pos + 1] == b'!' {
            self.pos + 2
        } else {
            self.pos + 1
        };
        let end = self.find_from(body_start, b'>').unwrap_or(self.bytes.len());
        self.tokens
            .push(Token::Comment(self.input[body_start..end].to_string()));
        self.pos = (end + 1).min(self.bytes.len());
    }

    fn doctype(&mut self) {
        let body_start = self.pos + DOCTYPE_START.len();
        let end = self.find_from(body_start, b'>').unwrap_or(self.bytes.len());
        let doctype = self.input[body_start..end].trim().to_string();
        self.tokens.push(Token::Doctype(doctype));
        self.pos = (end + 1).min(self.bytes.len());
    }

    fn name(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.bytes.len() && is_name_byte(self.bytes[self.pos]) {
            self.pos += 1;
        }
        self.input[start..self.pos].to_ascii_lowercase()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn skip_past(&mut self, needle: u8) {
        self.pos = match self.find_from(self.pos, needle) {
            Some(at) => at + 1,
            None => self.bytes.len(),
        };
    }

    fn end_tag(&mut self) {
        self.pos += 2;
        let name = self.name();
        self.skip_past(b'>');
        self.tokens.push(Token::EndTag(name));
    }

    fn start_tag(&mut self) {
        self.pos += 1;
        let name = self.name();
        let (attributes, explicit_self_closing) = self.attributes();
        let self_closing = explicit_self_closing || is_void_element(&name);
        let raw_text = is_raw_text_element(&name) && !self_closing;

        self.tokens.push(Token::StartTag {
            name: name.clone(),
            attributes,
            self_closing,
        });

        if raw_text {
            self.raw_text(name);
        }
    }

    /// Returns the attributes and whether the tag ended in `/>`.
    fn attributes(&mut self) -> (Vec<(String, Option<String>)>, bool) {
        let mut attributes: Vec<(String, Option<String>)> = Vec::new();
        loop {
            self.skip_whitespace();
            let Some(&b) = self.bytes.get(self.pos) else {
                return (attributes, false);
            };
            match b {
                b'>' => {
                    self.pos += 1;
                    return (attributes, false);
                }
                b'/' if self.bytes.get(self.pos + 1) == Some(&b'>') => {
                    self.pos += 2;
                    return (attributes, true);
                }
                b if is_name_byte(b) => {
                    let key = self.name();
                    self.skip_whitespace();
                    let value = if self.bytes.get(self.pos) == Some(&b'=') {
                        self.pos += 1;
                        self.skip_whitespace();
                        Some(self.attribute_value())
                    } else {
                        None
                    };
                    if attributes.iter().all(|(existing, _)| *existing != key) {
                        attributes.push((key, value));
                    }
                }
                _ => self.pos += 1,
            }
        }
    }

    fn attribute_value(&mut self) -> String {
        match self.bytes.get(self.pos).copied() {
            Some(quote @ (b'"' | b'\'')) => {
                let start = self.pos + 1;
                let end = self.find_from(start, quote).unwrap_or(self.bytes.len());
                self.pos = (end + 1).min(self.bytes.len());
                decode_entities(&self.input[start..end])
            }
            _ => {
                let start = self.pos;
                while let Some(&b) = self.bytes.get(self.pos) {
                    let ends_tag = b == b'>'
                        || (b == b'/' && self.bytes.get(self.pos + 1) == Some(&b'>'));
                    if b.is_ascii_whitespace() || ends_tag {
                        break;
                    }
                    self.pos += 1;
                }
                decode_entities(&self.input[start..self.pos])
            }
        }
    }

    fn raw_text(&mut self, name: String) {
        let body_start = self.pos;
        let (body_end, resume) = match find_raw_text_close(&self.bytes[body_start..], &name) {
            Some((rel_start, rel_end)) => (body_start + rel_start, body_start + rel_end),
            // Missing close tag: the remainder is raw text and the element closes implicitly.
            None => (self.bytes.len(), self.bytes.len()),
        };
        let body = &self.input[body_start..body_end];
        if !body.is_empty() {
            self.tokens.push(Token::Text(body.to_string()));
        }
        self.tokens.push(Token::EndTag(name));
        self.pos = resume;
    }
}

/// Find `</name` (case-insensitive) followed by ASCII whitespace, `/` or `>`; the close tag then
/// runs to the next `>` (or the end of input). Returns the offsets of the `<` and of the byte after
/// the close tag.
pub(crate) fn find_raw_text_close(haystack: &[u8], name: &str) -> Option<(usize, usize)> {
    let name = name.as_bytes();
    let mut i = 0;
    while let Some(rel) = memchr(b'<', &haystack[i..]) {
        let lt = i + rel;
        let name_start = lt + 2;
        if haystack.get(lt + 1) == Some(&b'/')
            && starts_with_ignore_ascii_case_at(haystack, name_start, name)
        {
            let after = name_start + name.len();
            if haystack
                .get(after)
                .is_some_and(|b| b.is_ascii_whitespace() || matches!(b, b'/' | b'>'))
            {
                let end = memchr(b'>', &haystack[after..])
                    .map(|rel| after + rel + 1)
                    .unwrap_or(haystack.len());
                return Some((lt, end));
            }
        }
        i = lt + 1;
    }
    None
}
