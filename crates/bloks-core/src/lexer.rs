//! Character cursor driven on demand by the parser.
//!
//! There is no separate tokenizing pass: productions peek and consume
//! characters directly.
//!
//! # Offsets
//!
//! The cursor tracks two positions: the byte index used for slicing and the
//! number of characters consumed. Errors always report the character count so
//! that offsets stay meaningful for non-ASCII input.

use crate::error::ParserError;

/// Per-call scanning state over an immutable input.
///
/// A fresh cursor is created for every `parse` call and dropped when it
/// returns, so parsers never share positional state.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    /// The complete input text.
    input: &'a str,
    /// Current byte index. Always on a char boundary.
    byte: usize,
    /// Characters consumed so far.
    chars: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `input`.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            byte: 0,
            chars: 0,
        }
    }

    /// Character under the cursor, or `None` at end of input.
    #[inline(always)]
    pub fn current_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Move forward one character. No-op at end of input.
    #[inline(always)]
    pub fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.byte += ch.len_utf8();
            self.chars += 1;
        }
    }

    /// Skip every whitespace character under the cursor.
    #[inline]
    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if !ch.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    /// Consume `expected` or fail with `ExpectedCharacter`.
    #[inline]
    pub fn expect(&mut self, expected: char) -> Result<(), ParserError> {
        match self.current_char() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            found => Err(ParserError::ExpectedCharacter {
                expected,
                found,
                offset: self.chars,
            }),
        }
    }

    /// Number of characters consumed from the start of input.
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.chars
    }

    /// Whether the remaining input starts with `literal`.
    #[inline(always)]
    pub fn has_prefix(&self, literal: &str) -> bool {
        self.remaining().starts_with(literal)
    }

    /// Whether all input has been consumed.
    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.byte >= self.input.len()
    }

    /// The unconsumed input.
    #[inline(always)]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.byte..]
    }

    /// Consume a run of `len` bytes that the caller has already inspected.
    ///
    /// `len` must land on a char boundary inside the remaining input.
    #[inline]
    pub(crate) fn bump_bytes(&mut self, len: usize) -> &'a str {
        let run = &self.input[self.byte..self.byte + len];
        self.byte += len;
        self.chars += run.chars().count();
        run
    }

    /// Consume characters while `pred` holds and return them as a slice.
    #[inline]
    pub(crate) fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let len = self
            .remaining()
            .char_indices()
            .find(|&(_, ch)| !pred(ch))
            .map_or(self.remaining().len(), |(idx, _)| idx);
        self.bump_bytes(len)
    }
}

