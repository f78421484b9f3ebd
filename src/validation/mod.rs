//! Validation Engine
//!
//! Document-level checking built on the block parser.

pub mod engine;

pub use engine::{
    Diagnostic, Severity, ValidationOptions, is_passthrough, validate_document, validate_line,
    validate_line_with,
};

// Re-export common types
pub use engine::ValidationResult;
