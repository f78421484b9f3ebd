//! Block model
//!
//! A block is one parsed line: optional line number, a command, its
//! parameters, an optional checksum and an optional trailing comment.
//! Rendering, checksum computation and verification all live here.

use std::fmt;

use serde::Serialize;

use crate::checksum::{Checksum, Digest};
use crate::error::{Error, Result};
use crate::gcode::Gcode;
use crate::word::Word;

/// Render every section: line number, command, parameters, checksum, comment.
pub const FULL_FORMAT: &str = "%l %c %p %k %m";

/// Optional sections for [`Block::new`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockConfig {
    pub line_number: Option<u32>,
    pub parameters: Vec<Gcode>,
    pub checksum: Option<u32>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    #[serde(skip_serializing_if = "Option::is_none")]
    line_number: Option<u32>,
    command: Gcode,
    parameters: Vec<Gcode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl Block {
    /// Build a block from its parts.
    ///
    /// The comment must start with `;` and fit on one line. A checksum, when
    /// given, must match the one computed over the other sections.
    pub fn new(command: Gcode, config: BlockConfig) -> Result<Self> {
        if let Some(comment) = &config.comment {
            if !comment.starts_with(';') || comment.contains(['\n', '\r']) {
                return Err(Error::InvalidComment {
                    comment: comment.clone(),
                });
            }
        }

        let block = Self::from_parts(
            config.line_number,
            command,
            config.parameters,
            config.checksum,
            config.comment,
        );

        if let Some(stored) = block.checksum {
            let computed = block.checksum_value(&mut Checksum::new());
            if stored != computed {
                return Err(Error::ChecksumMismatch { stored, computed });
            }
        }

        Ok(block)
    }

    /// Assemble without validation; the parser has already checked each part.
    pub(crate) fn from_parts(
        line_number: Option<u32>,
        command: Gcode,
        parameters: Vec<Gcode>,
        checksum: Option<u32>,
        comment: Option<String>,
    ) -> Self {
        Self {
            line_number,
            command,
            parameters,
            checksum,
            comment,
        }
    }

    pub fn line_number(&self) -> Option<u32> {
        self.line_number
    }

    /// The line number as an `N` gcode.
    pub fn line_number_gcode(&self) -> Option<Gcode> {
        self.line_number.map(Gcode::line_number)
    }

    pub fn command(&self) -> &Gcode {
        &self.command
    }

    pub fn parameters(&self) -> &[Gcode] {
        &self.parameters
    }

    /// First parameter carrying `word`.
    pub fn parameter(&self, word: Word) -> Option<&Gcode> {
        self.parameters.iter().find(|p| p.word() == word)
    }

    pub fn checksum(&self) -> Option<u32> {
        self.checksum
    }

    /// The stored checksum as a `*` gcode.
    pub fn checksum_gcode(&self) -> Option<Gcode> {
        self.checksum.map(Gcode::checksum)
    }

    /// The comment, `;` included.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn core_sections(&self) -> Vec<String> {
        let mut sections = Vec::with_capacity(self.parameters.len() + 2);
        if let Some(gcode) = self.line_number_gcode() {
            sections.push(gcode.to_string());
        }
        sections.push(self.command.to_string());
        sections.extend(self.parameters.iter().map(ToString::to_string));
        sections
    }

    /// Line number, command and parameters. This is what the checksum covers.
    pub fn to_line(&self) -> String {
        self.core_sections().join(" ")
    }

    pub fn to_line_with_checksum(&self) -> String {
        let mut sections = self.core_sections();
        if let Some(gcode) = self.checksum_gcode() {
            sections.push(gcode.to_string());
        }
        sections.join(" ")
    }

    /// Every present section, comment included.
    pub fn to_line_full(&self) -> String {
        let mut line = self.to_line_with_checksum();
        if let Some(comment) = &self.comment {
            line.push(' ');
            line.push_str(comment);
        }
        line
    }

    /// Render through a format string.
    ///
    /// Verbs: `%l` line number, `%c` command, `%p` parameters, `%k` checksum,
    /// `%m` comment, `%%` a literal percent. Absent sections render empty.
    /// Substituted text is inserted verbatim and never scanned again. Unknown
    /// verbs are kept as written. Whitespace in the format itself acts as a
    /// separator: each run becomes one space, and separators at either end
    /// or next to an empty section are dropped.
    pub fn render(&self, format: &str) -> String {
        let mut out = Rendered::with_capacity(format.len() + 32);
        let mut chars = format.chars();

        while let Some(c) = chars.next() {
            if c.is_whitespace() {
                out.separator();
                continue;
            }
            if c != '%' {
                out.push(c.encode_utf8(&mut [0; 4]));
                continue;
            }
            match chars.next() {
                Some('l') => {
                    if let Some(gcode) = self.line_number_gcode() {
                        out.push(&gcode.to_string());
                    }
                }
                Some('c') => out.push(&self.command.to_string()),
                Some('p') => {
                    let parameters: Vec<String> =
                        self.parameters.iter().map(ToString::to_string).collect();
                    out.push(&parameters.join(" "));
                }
                Some('k') => {
                    if let Some(gcode) = self.checksum_gcode() {
                        out.push(&gcode.to_string());
                    }
                }
                Some('m') => {
                    if let Some(comment) = &self.comment {
                        out.push(comment);
                    }
                }
                Some('%') => out.push("%"),
                Some(other) if other.is_whitespace() => {
                    out.push("%");
                    out.separator();
                }
                Some(other) => {
                    out.push("%");
                    out.push(other.encode_utf8(&mut [0; 4]));
                }
                None => out.push("%"),
            }
        }

        out.text
    }

    fn checksum_value<D: Digest + ?Sized>(&self, digest: &mut D) -> u32 {
        digest.reset();
        digest.write(self.to_line().as_bytes());
        digest.sum().first().copied().map(u32::from).unwrap_or(0)
    }

    /// Checksum of [`Block::to_line`] with the stock XOR digest.
    pub fn compute_checksum(&self) -> Gcode {
        self.compute_checksum_with(&mut Checksum::new())
    }

    /// Checksum of [`Block::to_line`] with a caller supplied digest.
    pub fn compute_checksum_with<D: Digest + ?Sized>(&self, digest: &mut D) -> Gcode {
        Gcode::checksum(self.checksum_value(digest))
    }

    /// Store a freshly computed checksum, replacing any previous one.
    pub fn update_checksum(&mut self) -> u32 {
        self.update_checksum_with(&mut Checksum::new())
    }

    pub fn update_checksum_with<D: Digest + ?Sized>(&mut self, digest: &mut D) -> u32 {
        let value = self.checksum_value(digest);
        log::trace!("checksum of '{}' updated to *{}", self.to_line(), value);
        self.checksum = Some(value);
        value
    }

    /// Compare the stored checksum with a computed one.
    ///
    /// A mismatch is `Ok(false)`; a block without checksum is an error.
    pub fn verify_checksum(&self) -> Result<bool> {
        self.verify_checksum_with(&mut Checksum::new())
    }

    pub fn verify_checksum_with<D: Digest + ?Sized>(&self, digest: &mut D) -> Result<bool> {
        let stored = self.checksum.ok_or_else(|| Error::MissingChecksum {
            block: self.to_line_full(),
        })?;
        Ok(stored == self.checksum_value(digest))
    }

    /// Drop the checksum section, returning the old value.
    pub fn strip_checksum(&mut self) -> Option<u32> {
        self.checksum.take()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line_full())
    }
}

/// Output buffer for [`Block::render`] that holds back format separators
/// until something non-empty follows them.
struct Rendered {
    text: String,
    pending_separator: bool,
}

impl Rendered {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            pending_separator: false,
        }
    }

    fn separator(&mut self) {
        self.pending_separator = true;
    }

    fn push(&mut self, section: &str) {
        if section.is_empty() {
            return;
        }
        if self.pending_separator && !self.text.is_empty() {
            self.text.push(' ');
        }
        self.pending_separator = false;
        self.text.push_str(section);
    }
}
