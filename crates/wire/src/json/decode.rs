//! Decoding of stored text to Strata values
//!
//! The parser accepts the subset of JSON the encoder produces, plus
//! insignificant whitespace. Inside strings the only escape is `\"`;
//! any other backslash is taken literally.

use super::{BINARY_MARKER, MARKER_LEAD};
use strata_core::{Value, ValueMap};
use thiserror::Error;

/// Decode error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// Malformed literal or structure
    #[error("invalid document text: {0}")]
    InvalidJson(String),

    /// Invalid number format
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    /// Binary marker followed by a character outside U+0000..U+00FF
    #[error("binary payload contains a character above U+00FF")]
    InvalidBinary,

    /// Unexpected end of input
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// Unexpected character
    #[error("unexpected character '{0}' at offset {1}")]
    UnexpectedChar(char, usize),

    /// Input continues after a complete value
    #[error("trailing characters at offset {0}")]
    TrailingCharacters(usize),
}

/// Decode stored text to a Value
pub fn decode_value(text: &str) -> Result<Value, DecodeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::UnexpectedEnd);
    }

    let mut parser = Parser::new(trimmed);
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.pos < parser.input.len() {
        return Err(DecodeError::TrailingCharacters(parser.pos));
    }
    Ok(value)
}

/// Undo the string marking applied by the encoder
fn unmark(raw: String) -> Result<Value, DecodeError> {
    if let Some(body) = raw.strip_prefix(BINARY_MARKER) {
        let bytes = body
            .chars()
            .map(|c| u8::try_from(c).map_err(|_| DecodeError::InvalidBinary))
            .collect::<Result<Vec<u8>, _>>()?;
        return Ok(Value::Bytes(bytes));
    }
    match raw.strip_prefix(MARKER_LEAD) {
        Some(rest) => Ok(Value::String(rest.to_string())),
        None => Ok(Value::String(raw)),
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn unexpected(&self) -> DecodeError {
        match self.peek() {
            Some(c) => DecodeError::UnexpectedChar(c, self.pos),
            None => DecodeError::UnexpectedEnd,
        }
    }

    fn parse_value(&mut self) -> Result<Value, DecodeError> {
        self.skip_whitespace();

        match self.peek() {
            None => Err(DecodeError::UnexpectedEnd),
            Some('n') => self.parse_literal("null", Value::Null),
            Some('t') => self.parse_literal("true", Value::Bool(true)),
            Some('f') => self.parse_literal("false", Value::Bool(false)),
            Some('"') => self.parse_string().and_then(unmark),
            Some('[') => self.parse_array(),
            Some('{') => self.parse_object(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) => Err(DecodeError::UnexpectedChar(c, self.pos)),
        }
    }

    fn parse_literal(&mut self, word: &str, value: Value) -> Result<Value, DecodeError> {
        if self.input[self.pos..].starts_with(word) {
            self.pos += word.len();
            Ok(value)
        } else {
            Err(DecodeError::InvalidJson(format!("expected '{}'", word)))
        }
    }

    fn parse_string(&mut self) -> Result<String, DecodeError> {
        self.advance(); // consume opening quote
        let mut result = String::new();

        loop {
            match self.peek() {
                None => return Err(DecodeError::UnexpectedEnd),
                Some('"') => {
                    self.advance();
                    return Ok(result);
                }
                Some('\\') => {
                    self.advance();
                    if self.peek() == Some('"') {
                        result.push('"');
                        self.advance();
                    } else {
                        result.push('\\');
                    }
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value, DecodeError> {
        let start = self.pos;

        if self.peek() == Some('-') {
            self.advance();
        }
        self.skip_digits();

        if self.peek() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        if let Some('e' | 'E') = self.peek() {
            self.advance();
            if let Some('+' | '-') = self.peek() {
                self.advance();
            }
            self.skip_digits();
        }

        let num_str = &self.input[start..self.pos];
        num_str
            .parse::<f64>()
            .map(Value::number)
            .map_err(|_| DecodeError::InvalidNumber(num_str.to_string()))
    }

    fn skip_digits(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value, DecodeError> {
        self.advance(); // consume '['
        self.skip_whitespace();

        let mut arr = Vec::new();

        if self.peek() == Some(']') {
            self.advance();
            return Ok(Value::Array(arr));
        }

        loop {
            arr.push(self.parse_value()?);
            self.skip_whitespace();

            match self.peek() {
                Some(',') => self.advance(),
                Some(']') => {
                    self.advance();
                    return Ok(Value::Array(arr));
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn parse_object(&mut self) -> Result<Value, DecodeError> {
        self.advance(); // consume '{'
        self.skip_whitespace();

        let mut map = ValueMap::new();

        if self.peek() == Some('}') {
            self.advance();
            return Ok(Value::Object(map));
        }

        loop {
            self.skip_whitespace();

            // Keys are never marked
            if self.peek() != Some('"') {
                return Err(DecodeError::InvalidJson("expected string key".to_string()));
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            if self.peek() != Some(':') {
                return Err(DecodeError::InvalidJson("expected ':'".to_string()));
            }
            self.advance();

            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();

            match self.peek() {
                Some(',') => self.advance(),
                Some('}') => {
                    self.advance();
                    return Ok(Value::Object(map));
                }
                _ => return Err(self.unexpected()),
            }
        }
    }
}
