/// Returned by [`Scanner::peek`] and [`Scanner::next`] once the input is used up.
pub const NUL: char = '\0';

/// A cursor over the code points of a PGN document.
///
/// Exhaustion is a value rather than an error: once the source runs out
/// every call returns [`NUL`].
#[derive(Clone, Debug)]
pub struct Scanner<'pgn> {
    source: &'pgn str,
    index: usize,
}

impl<'pgn> Scanner<'pgn> {
    pub fn new(source: &'pgn str) -> Self {
        Self { source, index: 0 }
    }

    /// Returns the next code point without consuming it.
    pub fn peek(&self) -> char {
        self.remaining().chars().next().unwrap_or(NUL)
    }

    /// Consumes and returns the next code point.
    pub fn next(&mut self) -> char {
        match self.remaining().chars().next() {
            None => NUL,
            Some(ch) => {
                self.index += ch.len_utf8();
                ch
            }
        }
    }

    /// Byte index of the next unconsumed code point.
    pub fn offset(&self) -> usize {
        self.index
    }

    /// Tells a real end of input apart from an interior U+0000.
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.source.len()
    }

    pub fn remaining(&self) -> &'pgn str {
        &self.source[self.index..]
    }
}
