//! Argument tokenization.
//!
//! Arguments are rewritten in place into a NUL-separated token stream ending
//! with two NULs, so handlers can address tokens without copies: `"a b c"`
//! becomes `"a\0b\0c\0\0"`. Double quotes keep spaces together (`"a b"` is
//! one token) and a backslash makes the next byte literal. Quotes do not
//! have to balance; a stray quote simply acts as a separator.

/// Rewrite `buf[..len]` into the tokenized form.
///
/// Returns the length of the tokenized content; the two terminating NULs are
/// written just past it. `buf` must be at least `len + 2` bytes long.
/// Running the transform over already-tokenized content changes nothing.
pub fn tokenize_args(buf: &mut [u8], len: usize) -> usize {
    debug_assert!(buf.len() >= len + 2);

    let mut in_quotes = false;
    let mut escape_next = false;
    let mut insert = 0;

    for i in 0..len {
        let mut byte = buf[i];

        if escape_next {
            escape_next = false;
        } else if byte == b'\\' {
            escape_next = true;
            continue;
        } else if byte == b'"' {
            in_quotes = !in_quotes;
            byte = 0;
        } else if !in_quotes && byte == b' ' {
            byte = 0;
        }

        // separators collapse and never open the stream
        if byte != 0 || (insert > 0 && buf[insert - 1] != 0) {
            buf[insert] = byte;
            insert += 1;
        }
    }

    buf[insert] = 0;
    buf[insert + 1] = 0;
    insert
}

/// Accessor over a tokenized argument string.
///
/// Tokens are counted from 1, the position users type them in. An
/// untokenized string behaves as a single token.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    raw: &'a str,
}

impl<'a> Args<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    pub const fn empty() -> Self {
        Self { raw: "" }
    }

    /// The underlying string, NUL separators included.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Iterate tokens in order.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> {
        self.raw.split('\0').filter(|token| !token.is_empty())
    }

    /// The token at 1-based `pos`.
    pub fn token(&self, pos: usize) -> Option<&'a str> {
        if pos == 0 {
            return None;
        }
        self.iter().nth(pos - 1)
    }

    /// 1-based position of `token`, or 0 when absent.
    pub fn find(&self, token: &str) -> usize {
        self.iter().position(|t| t == token).map_or(0, |i| i + 1)
    }

    /// Number of tokens.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}
