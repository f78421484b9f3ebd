//! Gcode factory
//!
//! The block parser never builds gcodes itself: it goes through a
//! [`GcodeFactory`], so callers can swap in their own construction rules
//! (restricted word sets, extra logging, interning...).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::address::Address;
use crate::error::{Error, Result};
use crate::gcode::Gcode;
use crate::word::{Word, validate};

/// Plain decimal literal: optional sign, digits, optional fraction.
/// Exponents, `inf` and `nan` are not part of the dialect.
static DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)$").expect("valid regex"));

/// Constructors for every gcode shape, plus classification of raw tokens.
pub trait GcodeFactory {
    fn new_unaddressed(&self, word: u8) -> Result<Gcode>;
    fn new_addressed_u32(&self, word: u8, value: u32) -> Result<Gcode>;
    fn new_addressed_i32(&self, word: u8, value: i32) -> Result<Gcode>;
    fn new_addressed_f32(&self, word: u8, value: f32) -> Result<Gcode>;
    /// `value` is the quoted source form, e.g. `"A""B"`.
    fn new_addressed_string(&self, word: u8, value: &str) -> Result<Gcode>;

    /// Turn one isolated token (`G1`, `X-2.5`, `M117"HI"`, `X`) into a gcode.
    ///
    /// Classification order: bare word, then `N`/`*` as u32, then quoted
    /// string, then float (a `.` is present), then i32.
    fn parse_one(&self, text: &str) -> Result<Gcode> {
        let Some(first) = text.bytes().next() else {
            return Err(Error::UnrecognizedToken {
                token: text.to_string(),
            });
        };

        if text.len() == 1 {
            return self.new_unaddressed(first);
        }

        // the word must be a single ASCII byte before the literal can be sliced off
        if !first.is_ascii() {
            return Err(Error::InvalidWord { byte: first });
        }
        let literal = &text[1..];

        if first == Word::LINE_NUMBER.value() || first == Word::CHECKSUM.value() {
            let value = literal
                .bytes()
                .all(|b| b.is_ascii_digit())
                .then(|| literal.parse::<u32>().ok())
                .flatten()
                .ok_or_else(|| Error::UnrecognizedToken {
                    token: text.to_string(),
                })?;
            return self.new_addressed_u32(first, value);
        }

        if literal.contains('"') {
            return self.new_addressed_string(first, literal);
        }

        if !DECIMAL.is_match(literal) {
            // still report a bad word before a bad literal
            validate(first)?;
            return Err(Error::UnrecognizedToken {
                token: text.to_string(),
            });
        }

        if literal.contains('.') {
            // Out-of-range literals parse as infinity.
            let value = literal
                .parse::<f32>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| Error::UnrecognizedToken {
                    token: text.to_string(),
                })?;
            return self.new_addressed_f32(first, value);
        }

        let value = literal
            .parse::<i32>()
            .map_err(|_| Error::UnrecognizedToken {
                token: text.to_string(),
            })?;
        self.new_addressed_i32(first, value)
    }
}

/// Stock factory: validates the word and, for strings, the quoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGcodeFactory;

impl GcodeFactory for DefaultGcodeFactory {
    fn new_unaddressed(&self, word: u8) -> Result<Gcode> {
        Ok(Gcode::unaddressed(validate(word)?))
    }

    fn new_addressed_u32(&self, word: u8, value: u32) -> Result<Gcode> {
        Ok(Gcode::addressed(validate(word)?, value))
    }

    fn new_addressed_i32(&self, word: u8, value: i32) -> Result<Gcode> {
        Ok(Gcode::addressed(validate(word)?, value))
    }

    fn new_addressed_f32(&self, word: u8, value: f32) -> Result<Gcode> {
        Ok(Gcode::addressed(validate(word)?, value))
    }

    fn new_addressed_string(&self, word: u8, value: &str) -> Result<Gcode> {
        let word = validate(word)?;
        Ok(Gcode::addressed(word, Address::string(value)?))
    }
}
