//! G-code Block
//!
//! Parsing, rendering and checksumming of single G-code lines ("blocks").
//!
//! This library provides:
//! - A typed token model (words, addresses, gcodes)
//! - A block parser with pluggable token construction
//! - The 8-bit XOR line checksum used by printer firmwares
//! - Document validation and configuration for the `gcode-block` tool

pub mod address;
pub mod block;
pub mod checksum;
pub mod cli;
pub mod config;
pub mod error;
pub mod factory;
pub mod gcode;
pub mod parser;
pub mod validation;
pub mod word;

// Re-exports for clean public API
pub use address::{Address, AddressKind, QuotedString};
pub use block::{Block, BlockConfig, FULL_FORMAT};
pub use checksum::{Checksum, Digest};
pub use config::Config;
pub use error::{Error, Result};
pub use factory::{DefaultGcodeFactory, GcodeFactory};
pub use gcode::Gcode;
pub use parser::{BlockParser, parse};
pub use validation::{Diagnostic, ValidationOptions, validate_document};
pub use word::Word;
