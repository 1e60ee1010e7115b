//! Code-point cursor and the quote/comment sub-scanners.

/// Forward-only cursor over the scanned buffer.
///
/// Positions are byte offsets into the buffer and always lie on a `char`
/// boundary.
pub(super) struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    width: usize,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            width: 0,
        }
    }

    pub(super) fn input(&self) -> &'a str {
        self.input
    }

    pub(super) fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor to `pos`, which must be a `char` boundary.
    pub(super) fn set_position(&mut self, pos: usize) {
        debug_assert!(self.input.is_char_boundary(pos));
        self.pos = pos;
    }

    /// Start of the code point consumed by the last [`Cursor::bump`].
    pub(super) fn last_start(&self) -> usize {
        self.pos - self.width
    }

    /// Consume the next code point.
    pub(super) fn bump(&mut self) -> Option<char> {
        let c = self.input[self.pos..].chars().next()?;
        self.width = c.len_utf8();
        self.pos += self.width;
        Some(c)
    }

    /// Consume up to and including the next unescaped `quote`.
    ///
    /// A backslash consumes the following code point unconditionally.
    /// Returns `false` if the input ends first.
    pub(super) fn skip_quote(&mut self, quote: char) -> bool {
        while let Some(c) = self.bump() {
            if c == '\\' {
                self.bump();
            } else if c == quote {
                return true;
            }
        }
        false
    }

    /// Consume up to and including the next newline, or to the end of input.
    pub(super) fn skip_line_comment(&mut self) {
        self.pos = match self.input[self.pos..].find('\n') {
            Some(i) => self.pos + i + 1,
            None => self.input.len(),
        };
    }

    /// Consume up to and including the next `*/`.
    ///
    /// Returns `false`, leaving the cursor untouched, if there is none.
    pub(super) fn skip_block_comment(&mut self) -> bool {
        match self.input[self.pos..].find("*/") {
            Some(i) => {
                self.pos += i + 2;
                true
            }
            None => false,
        }
    }
}
