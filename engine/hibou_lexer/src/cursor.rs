//! Byte cursor over UTF-8 source text.
//!
//! The scanner dispatches on raw bytes for ASCII and decodes full chars only
//! when it meets a non-ASCII lead byte (identifiers may contain Unicode
//! letters). Out-of-bounds reads return the 0x00 sentinel, so the main
//! dispatch needs no bounds checks.

use memchr::memchr2;

/// Sentinel byte returned past the end of input.
pub const EOF_BYTE: u8 = 0;

pub struct Cursor<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Cursor {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Current byte, or the sentinel at EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(EOF_BYTE)
    }

    /// Byte at `pos + n`, or the sentinel.
    #[inline]
    pub fn peek(&self, n: usize) -> u8 {
        self.bytes.get(self.pos + n).copied().unwrap_or(EOF_BYTE)
    }

    /// Advance one byte.
    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    /// Advance `n` bytes.
    #[inline]
    pub fn advance_by(&mut self, n: usize) {
        self.pos += n;
    }

    /// Decode the char at the cursor, or `None` at EOF.
    #[inline]
    pub fn current_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// Advance past the char at the cursor.
    #[inline]
    pub fn advance_char(&mut self) {
        if let Some(c) = self.current_char() {
            self.pos += c.len_utf8();
        }
    }

    /// Consume `expected` if it is the current byte.
    #[inline]
    pub fn eat(&mut self, expected: u8) -> bool {
        if self.current() == expected {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Slice of the source between `start` and the cursor.
    #[inline]
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.pos]
    }

    /// Skip to the next `\n` or `\r` (or EOF). Used for line comments.
    pub fn eat_until_newline(&mut self) {
        match memchr2(b'\n', b'\r', &self.bytes[self.pos..]) {
            Some(offset) => self.pos += offset,
            None => self.pos = self.bytes.len(),
        }
    }

    /// Eat ASCII digits and `_` separators.
    pub fn eat_digits(&mut self, radix: u32) {
        loop {
            let b = self.current();
            let ok = match radix {
                16 => b.is_ascii_hexdigit(),
                8 => (b'0'..=b'7').contains(&b),
                2 => b == b'0' || b == b'1',
                _ => b.is_ascii_digit(),
            };
            if ok || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_at_eof() {
        let mut cursor = Cursor::new("a");
        assert_eq!(cursor.current(), b'a');
        cursor.advance();
        assert_eq!(cursor.current(), EOF_BYTE);
        assert!(cursor.is_eof());
    }

    #[test]
    fn eat_until_newline_stops_at_cr_or_lf() {
        let mut cursor = Cursor::new("abc\ndef");
        cursor.eat_until_newline();
        assert_eq!(cursor.pos(), 3);
    }

    #[test]
    fn non_ascii_chars_decode() {
        let mut cursor = Cursor::new("é");
        assert_eq!(cursor.current_char(), Some('é'));
        cursor.advance_char();
        assert!(cursor.is_eof());
    }
}
