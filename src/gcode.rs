//! Gcode token model
//!
//! A gcode is the smallest piece of a block: a word, optionally followed by
//! an address. `G1`, `X10.5`, `M117"HELLO"` and a bare `X` are all gcodes.

use std::fmt;

use serde::Serialize;

use crate::address::Address;
use crate::word::Word;

/// A word with or without an address.
///
/// Equality follows the tagged union: two unaddressed gcodes are equal when
/// their words are, two addressed gcodes when word, address kind and value
/// all match. An unaddressed gcode never equals an addressed one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Gcode {
    Unaddressed { word: Word },
    Addressed { word: Word, address: Address },
}

impl Gcode {
    pub fn unaddressed(word: Word) -> Self {
        Gcode::Unaddressed { word }
    }

    pub fn addressed(word: Word, address: impl Into<Address>) -> Self {
        Gcode::Addressed {
            word,
            address: address.into(),
        }
    }

    /// `N<value>`
    pub fn line_number(value: u32) -> Self {
        Gcode::addressed(Word::LINE_NUMBER, value)
    }

    /// `*<value>`
    pub fn checksum(value: u32) -> Self {
        Gcode::addressed(Word::CHECKSUM, value)
    }

    pub fn word(&self) -> Word {
        match self {
            Gcode::Unaddressed { word } | Gcode::Addressed { word, .. } => *word,
        }
    }

    pub fn has_address(&self) -> bool {
        matches!(self, Gcode::Addressed { .. })
    }

    pub fn address(&self) -> Option<&Address> {
        match self {
            Gcode::Addressed { address, .. } => Some(address),
            Gcode::Unaddressed { .. } => None,
        }
    }

    /// Mutable access to the address; pair with [`Address::set_value`].
    pub fn address_mut(&mut self) -> Option<&mut Address> {
        match self {
            Gcode::Addressed { address, .. } => Some(address),
            Gcode::Unaddressed { .. } => None,
        }
    }
}

impl fmt::Display for Gcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gcode::Unaddressed { word } => write!(f, "{}", word),
            Gcode::Addressed { word, address } => write!(f, "{}{}", word, address),
        }
    }
}
