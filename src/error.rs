//! Error types for block parsing, token construction and checksum checks.
//!
//! Every failure in the library is reported through [`Error`], carrying
//! the offending byte or substring so callers can point at it.

use std::fmt;

use thiserror::Error;

use crate::address::AddressKind;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a raw value was refused as a quoted string address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringAddressFault {
    /// Fewer than two characters, so it cannot hold both quotes.
    TooShort,
    /// Contains a tab, line feed or carriage return.
    ControlCharacter,
    /// Does not start and end with `"`.
    NotQuoted,
    /// A quote inside the literal is not doubled.
    UnescapedQuote,
}

impl fmt::Display for StringAddressFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StringAddressFault::TooShort => "too short",
            StringAddressFault::ControlCharacter => "contains control characters",
            StringAddressFault::NotQuoted => "not enclosed in quotes",
            StringAddressFault::UnescapedQuote => "contains an unescaped quote",
        };
        f.write_str(text)
    }
}

fn describe_byte(byte: &u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}' (0x{:02X})", char::from(*byte), byte)
    } else {
        format!("0x{:02X}", byte)
    }
}

/// Errors produced by the block model and parser.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Byte outside the legal word alphabet
    #[error("invalid word {}", describe_byte(.byte))]
    InvalidWord { byte: u8 },

    /// Quoted string literal violating the string address format
    #[error("invalid string address {value}: {fault}")]
    InvalidStringAddress {
        value: String,
        fault: StringAddressFault,
    },

    /// Token substring that is none of the literal kinds
    #[error("unrecognized token '{token}'")]
    UnrecognizedToken { token: String },

    /// Characters left over outside every recognized token
    #[error("undefined symbols '{residue}'")]
    UndefinedSymbols { residue: String },

    /// Nothing left to tokenize after side-band extraction
    #[error("no command token found in '{line}'")]
    NoCommandFound { line: String },

    /// Checksum verification requested on a block without one
    #[error("block '{block}' has no checksum section")]
    MissingChecksum { block: String },

    /// Attempt to replace an address value with a value of another kind
    #[error("address kind mismatch: expected {expected}, found {found}")]
    AddressKindMismatch {
        expected: AddressKind,
        found: AddressKind,
    },

    /// Comment that does not start with ';' or spans several lines
    #[error("invalid comment '{comment}'")]
    InvalidComment { comment: String },

    /// Stored checksum disagrees with the computed one
    #[error("checksum mismatch: stored *{stored}, computed *{computed}")]
    ChecksumMismatch { stored: u32, computed: u32 },
}
