//! Word model
//!
//! A word is the single letter identifying a token: a command class
//! (`G`, `M`, `T`), a parameter (`X`, `F`, ...) or one of the reserved
//! letters for line numbers (`N`) and checksums (`*`).

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Every byte accepted as a word.
pub const WORDS: &[u8] = b"GMTSPXYZUVWIJDHFRQEN*";

/// A validated word letter. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Word(u8);

impl Word {
    /// Word carrying the block line number
    pub const LINE_NUMBER: Word = Word(b'N');
    /// Word carrying the block checksum
    pub const CHECKSUM: Word = Word(b'*');

    pub fn new(byte: u8) -> Result<Self> {
        validate(byte)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        char::from(self.0)
    }

    /// True for `N` and `*`, the letters only ever carrying a u32.
    pub fn is_reserved(self) -> bool {
        self == Word::LINE_NUMBER || self == Word::CHECKSUM
    }
}

/// Check a byte against the word alphabet.
pub fn validate(byte: u8) -> Result<Word> {
    if WORDS.contains(&byte) {
        Ok(Word(byte))
    } else {
        Err(Error::InvalidWord { byte })
    }
}

impl TryFrom<u8> for Word {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        validate(byte)
    }
}

impl TryFrom<char> for Word {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        let mut buf = [0u8; 4];
        let byte = c.encode_utf8(&mut buf).as_bytes()[0];
        if c.is_ascii() {
            validate(byte)
        } else {
            Err(Error::InvalidWord { byte })
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
