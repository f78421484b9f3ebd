//! Address model
//!
//! The typed literal attached to a word. Numbers are kept in the width the
//! dialect allows; strings are kept in their escaped, quoted source form so
//! they render back exactly as read.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result, StringAddressFault};

/// Discriminant of an [`Address`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    Int32,
    UInt32,
    Float32,
    Str,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressKind::Int32 => "int32",
            AddressKind::UInt32 => "uint32",
            AddressKind::Float32 => "float32",
            AddressKind::Str => "string",
        };
        f.write_str(name)
    }
}

/// A double-quoted string literal with `""` as the escaped quote.
///
/// Only obtainable through [`QuotedString::new`], so every instance holds a
/// well-formed literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuotedString(String);

impl QuotedString {
    /// Validate `raw` (quotes included) as a string address.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        match check_quoted(&raw) {
            Ok(()) => Ok(Self(raw)),
            Err(fault) => Err(Error::InvalidStringAddress { value: raw, fault }),
        }
    }

    /// Quote a plain value, doubling any quote it contains.
    pub fn quote(value: &str) -> Result<Self> {
        Self::new(format!("\"{}\"", value.replace('"', "\"\"")))
    }

    /// The literal as written, quotes and escapes included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The logical value: outer quotes dropped, `""` folded to `"`.
    pub fn unescaped(&self) -> String {
        self.0[1..self.0.len() - 1].replace("\"\"", "\"")
    }
}

fn check_quoted(raw: &str) -> std::result::Result<(), StringAddressFault> {
    if raw.len() <= 1 {
        return Err(StringAddressFault::TooShort);
    }
    if raw.contains(['\t', '\n', '\r']) {
        return Err(StringAddressFault::ControlCharacter);
    }
    if !(raw.starts_with('"') && raw.ends_with('"')) {
        return Err(StringAddressFault::NotQuoted);
    }
    let inner = &raw[1..raw.len() - 1];
    if inner.split("\"\"").any(|piece| piece.contains('"')) {
        return Err(StringAddressFault::UnescapedQuote);
    }
    Ok(())
}

impl fmt::Display for QuotedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for QuotedString {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Literal value of a token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Address {
    Int32(i32),
    UInt32(u32),
    Float32(f32),
    #[serde(rename = "string")]
    Str(QuotedString),
}

impl Address {
    pub fn int32(value: i32) -> Self {
        Address::Int32(value)
    }

    pub fn uint32(value: u32) -> Self {
        Address::UInt32(value)
    }

    pub fn float32(value: f32) -> Self {
        Address::Float32(value)
    }

    /// Build a string address from its quoted source form.
    pub fn string(raw: impl Into<String>) -> Result<Self> {
        QuotedString::new(raw).map(Address::Str)
    }

    pub fn kind(&self) -> AddressKind {
        match self {
            Address::Int32(_) => AddressKind::Int32,
            Address::UInt32(_) => AddressKind::UInt32,
            Address::Float32(_) => AddressKind::Float32,
            Address::Str(_) => AddressKind::Str,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Address::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Address::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Address::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_quoted(&self) -> Option<&QuotedString> {
        match self {
            Address::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Replace the value, keeping the address kind.
    pub fn set_value(&mut self, value: Address) -> Result<()> {
        if self.kind() != value.kind() {
            return Err(Error::AddressKindMismatch {
                expected: self.kind(),
                found: value.kind(),
            });
        }
        *self = value;
        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Int32(v) => write!(f, "{}", v),
            Address::UInt32(v) => write!(f, "{}", v),
            Address::Float32(v) => {
                let text = v.to_string();
                // floats always carry a decimal point: 12 -> 12.0
                if v.is_finite() && !text.contains('.') {
                    write!(f, "{}.0", text)
                } else {
                    f.write_str(&text)
                }
            }
            Address::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for Address {
    fn from(value: i32) -> Self {
        Address::Int32(value)
    }
}

impl From<u32> for Address {
    fn from(value: u32) -> Self {
        Address::UInt32(value)
    }
}

impl From<f32> for Address {
    fn from(value: f32) -> Self {
        Address::Float32(value)
    }
}

impl From<QuotedString> for Address {
    fn from(value: QuotedString) -> Self {
        Address::Str(value)
    }
}

impl TryFrom<&str> for Address {
    type Error = Error;

    fn try_from(raw: &str) -> Result<Self> {
        Address::string(raw)
    }
}

impl TryFrom<String> for Address {
    type Error = Error;

    fn try_from(raw: String) -> Result<Self> {
        Address::string(raw)
    }
}
