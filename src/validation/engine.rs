//! Validation Engine
//!
//! Runs the block parser and checksum verification over lines and
//! documents, collecting diagnostics instead of stopping at the first error.

use std::fmt;

use serde::Serialize;

use crate::factory::{DefaultGcodeFactory, GcodeFactory};
use crate::parser::BlockParser;

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        f.write_str(name)
    }
}

/// A diagnostic message for a validation issue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
    pub severity: Severity,
}

/// Knobs for a validation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Warn about blocks that carry no checksum
    pub require_checksum: bool,
}

/// Result of validating a document or line
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    /// Lines that parsed into a block
    pub blocks: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, line: usize, message: String) {
        self.diagnostics.push(Diagnostic {
            line,
            message,
            severity: Severity::Error,
        });
    }

    pub fn add_warning(&mut self, line: usize, message: String) {
        self.diagnostics.push(Diagnostic {
            line,
            message,
            severity: Severity::Warning,
        });
    }

    pub fn is_valid(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Fold another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.diagnostics.extend(other.diagnostics);
        self.blocks += other.blocks;
    }
}

/// Blank and comment-only lines hold no block.
pub fn is_passthrough(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.starts_with(';')
}

/// Validate a single line of G-code
pub fn validate_line(line_num: usize, text: &str, options: &ValidationOptions) -> ValidationResult {
    validate_line_with(&BlockParser::<DefaultGcodeFactory>::new(), line_num, text, options)
}

/// Validate a single line with a caller supplied parser
pub fn validate_line_with<F: GcodeFactory>(
    parser: &BlockParser<F>,
    line_num: usize,
    text: &str,
    options: &ValidationOptions,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    if is_passthrough(text) {
        return result;
    }

    let block = match parser.parse(text) {
        Ok(block) => block,
        Err(e) => {
            log::debug!("line {}: {}", line_num, e);
            result.add_error(line_num, e.to_string());
            return result;
        }
    };
    result.blocks += 1;

    match block.checksum() {
        Some(stored) => {
            if block.verify_checksum() == Ok(false) {
                let computed = block.compute_checksum();
                result.add_error(
                    line_num,
                    format!("checksum mismatch: stored *{}, computed {}", stored, computed),
                );
            }
        }
        None if options.require_checksum => {
            result.add_warning(line_num, "block has no checksum".to_string());
        }
        None => {}
    }

    result
}

/// Validate an entire document
pub fn validate_document(content: &str, options: &ValidationOptions) -> ValidationResult {
    let parser = BlockParser::new();
    let mut result = ValidationResult::new();

    for (line_num, line) in content.lines().enumerate() {
        result.merge(validate_line_with(&parser, line_num + 1, line, options));
    }

    log::debug!(
        "validated {} blocks, {} errors, {} warnings",
        result.blocks,
        result.count(Severity::Error),
        result.count(Severity::Warning)
    );
    result
}
