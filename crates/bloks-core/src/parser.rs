//! Recursive-descent parser for bloks.
//!
//! Grammar:
//!
//! ```text
//! value  := blok | string | number | "true" | "false" | "null"
//! blok   := '(' ['#'] name (',' value)* [','] ')'
//! ```
//!
//! The parser itself holds only immutable configuration. All positional state
//! lives in a [`Cursor`] created per call, so one parser can serve many
//! threads at once.

use tracing::debug;

use crate::error::ParserError;
use crate::lexer::Cursor;
use crate::literal::{lex_name, lex_number, lex_string};
use crate::processor::{basic_processors, ProcessorRegistry};
use crate::value::{Blok, Value};

/// Nesting limit applied unless overridden with [`Parser::with_max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Bloks parser with a processor registry.
#[derive(Debug, Clone)]
pub struct Parser {
    registry: ProcessorRegistry,
    max_depth: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a parser with no processors; every blok is kept as-is.
    #[inline]
    pub fn new() -> Self {
        Self::with_registry(ProcessorRegistry::new())
    }

    /// Create a parser that dispatches through `registry`.
    pub fn with_registry(registry: ProcessorRegistry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Add the reference processors from [`basic_processors`].
    ///
    /// Entries already registered under the same names are replaced.
    pub fn with_basic_processors(mut self) -> Self {
        self.registry.extend(basic_processors());
        self
    }

    /// Register a processor for bloks named exactly `name`.
    pub fn with_processor<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Blok) -> Value + Send + Sync + 'static,
    {
        self.registry.register(name, f);
        self
    }

    /// Replace the constructor-level fallback processor.
    ///
    /// A processor registered under `"@"` still takes precedence.
    pub fn with_fallback<F>(mut self, f: F) -> Self
    where
        F: Fn(Blok) -> Value + Send + Sync + 'static,
    {
        self.registry = self.registry.with_fallback(f);
        self
    }

    /// Set the maximum blok nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse exactly one top-level value, surrounded by optional whitespace.
    pub fn parse(&self, input: &str) -> Result<Value, ParserError> {
        debug!(len = input.len(), "parsing bloks input");
        let mut cursor = Cursor::new(input);
        let result = self.parse_document(&mut cursor);
        if let Err(ref err) = result {
            debug!(error = %err, "parse failed");
        }
        result
    }

    fn parse_document(&self, cursor: &mut Cursor<'_>) -> Result<Value, ParserError> {
        cursor.skip_whitespace();
        let value = self.parse_value(cursor, 0)?;
        cursor.skip_whitespace();
        match cursor.current_char() {
            None => Ok(value),
            Some(ch) => Err(ParserError::unexpected(ch, cursor.position())),
        }
    }

    /// Dispatch on the lookahead character. `depth` is the number of
    /// enclosing bloks.
    fn parse_value(&self, cursor: &mut Cursor<'_>, depth: usize) -> Result<Value, ParserError> {
        cursor.skip_whitespace();
        match cursor.current_char() {
            Some('(') => self.parse_blok(cursor, depth + 1),
            Some('"') => lex_string(cursor).map(Value::String),
            Some('t' | 'f') => parse_bool(cursor),
            Some('n') => parse_null(cursor),
            Some('-' | '+' | '0'..='9') => lex_number(cursor).map(Value::Number),
            Some(ch) => Err(ParserError::unexpected(ch, cursor.position())),
            None => Err(ParserError::unexpected_eof(cursor.position())),
        }
    }

    fn parse_blok(&self, cursor: &mut Cursor<'_>, depth: usize) -> Result<Value, ParserError> {
        let open = cursor.position();
        if depth > self.max_depth {
            return Err(ParserError::TooDeeplyNested {
                limit: self.max_depth,
                offset: open,
            });
        }
        cursor.expect('(')?;
        cursor.skip_whitespace();

        let is_local = cursor.current_char() == Some('#');
        if is_local {
            cursor.advance();
        }

        let name = lex_name(cursor, is_local);
        if name.is_empty() {
            return Err(ParserError::InvalidBlokName { offset: open });
        }

        let mut args = Vec::new();
        cursor.skip_whitespace();
        while cursor.current_char() == Some(',') {
            cursor.advance();
            cursor.skip_whitespace();
            if cursor.current_char() == Some(')') {
                break;
            }
            args.push(self.parse_value(cursor, depth)?);
            cursor.skip_whitespace();
        }
        cursor.expect(')')?;

        Ok(self.registry.apply(Blok {
            name: name.to_string(),
            args,
            is_local,
        }))
    }
}

fn parse_bool(cursor: &mut Cursor<'_>) -> Result<Value, ParserError> {
    if consume_literal(cursor, "true") {
        Ok(Value::Bool(true))
    } else if consume_literal(cursor, "false") {
        Ok(Value::Bool(false))
    } else {
        Err(unexpected_here(cursor))
    }
}

fn parse_null(cursor: &mut Cursor<'_>) -> Result<Value, ParserError> {
    if consume_literal(cursor, "null") {
        Ok(Value::Null)
    } else {
        Err(unexpected_here(cursor))
    }
}

fn consume_literal(cursor: &mut Cursor<'_>, literal: &str) -> bool {
    if !cursor.has_prefix(literal) {
        return false;
    }
    for _ in literal.chars() {
        cursor.advance();
    }
    true
}

fn unexpected_here(cursor: &Cursor<'_>) -> ParserError {
    match cursor.current_char() {
        Some(ch) => ParserError::unexpected(ch, cursor.position()),
        None => ParserError::unexpected_eof(cursor.position()),
    }
}

/// Parse `input` with a default parser (no processors).
pub fn parse(input: &str) -> Result<Value, ParserError> {
    Parser::new().parse(input)
}
