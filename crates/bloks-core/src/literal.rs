//! Lexical productions: names, strings and numbers.
//!
//! String scanning uses `memchr` to jump straight to the next quote or
//! backslash and copies plain runs in one go.

use memchr::memchr2;

use crate::error::ParserError;
use crate::lexer::Cursor;

/// Whether `ch` may appear in a `#`-prefixed local name.
#[inline(always)]
pub fn is_local_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | ':')
}

/// Whether `ch` may appear in a global dotted name.
#[inline(always)]
pub fn is_global_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '.')
}

/// Lex a blok name greedily. Returns an empty slice if nothing matched.
#[inline]
pub fn lex_name<'a>(cursor: &mut Cursor<'a>, is_local: bool) -> &'a str {
    if is_local {
        cursor.take_while(is_local_name_char)
    } else {
        cursor.take_while(is_global_name_char)
    }
}

/// Lex a quoted string. The cursor must be on the opening quote.
pub fn lex_string(cursor: &mut Cursor<'_>) -> Result<String, ParserError> {
    let start = cursor.position();
    cursor.advance();

    let mut out = String::new();
    loop {
        let idx = memchr2(b'"', b'\\', cursor.remaining().as_bytes())
            .ok_or(ParserError::UnterminatedString { offset: start })?;
        out.push_str(cursor.bump_bytes(idx));

        if cursor.current_char() == Some('"') {
            cursor.advance();
            return Ok(out);
        }
        lex_escape(cursor, &mut out, start)?;
    }
}

/// Resolve one escape. The cursor is on the backslash.
fn lex_escape(cursor: &mut Cursor<'_>, out: &mut String, start: usize) -> Result<(), ParserError> {
    let escape_offset = cursor.position();
    cursor.advance();

    let ch = cursor
        .current_char()
        .ok_or(ParserError::UnterminatedString { offset: start })?;
    cursor.advance();

    match ch {
        '"' => out.push('"'),
        '\\' => out.push('\\'),
        'b' => out.push('\u{8}'),
        'f' => out.push('\u{c}'),
        'r' => out.push('\r'),
        't' => out.push('\t'),
        'n' => out.push('\n'),
        'u' => {
            let code = lex_hex4(cursor, escape_offset)?;
            // Surrogate halves are not scalar values and each escape stands alone.
            out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
        other => out.push(other),
    }
    Ok(())
}

fn lex_hex4(cursor: &mut Cursor<'_>, escape_offset: usize) -> Result<u32, ParserError> {
    let mut code = 0u32;
    for _ in 0..4 {
        let digit = cursor
            .current_char()
            .and_then(|c| c.to_digit(16))
            .ok_or(ParserError::InvalidEscapeSequence {
                offset: escape_offset,
            })?;
        code = code * 16 + digit;
        cursor.advance();
    }
    Ok(code)
}

/// Lex a number literal and convert it to `f64`.
///
/// Only character classes are checked while lexing; shape errors such as a
/// lone sign surface when the literal fails to convert.
pub fn lex_number(cursor: &mut Cursor<'_>) -> Result<f64, ParserError> {
    let start = cursor.position();
    let rest = cursor.remaining();

    if matches!(cursor.current_char(), Some('+' | '-')) {
        cursor.advance();
    }
    cursor.take_while(|c| c.is_ascii_digit());

    if cursor.current_char() == Some('.') {
        cursor.advance();
        cursor.take_while(|c| c.is_ascii_digit());
    }

    if matches!(cursor.current_char(), Some('e' | 'E')) {
        cursor.advance();
        if matches!(cursor.current_char(), Some('+' | '-')) {
            cursor.advance();
        }
        cursor.take_while(|c| c.is_ascii_digit());
    }

    let literal = &rest[..rest.len() - cursor.remaining().len()];
    literal
        .parse::<f64>()
        .map_err(|_| ParserError::InvalidNumber {
            literal: literal.to_string(),
            offset: start,
        })
}
