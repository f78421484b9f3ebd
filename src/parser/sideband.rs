//! Side-band sections
//!
//! Comment, line number and checksum sit at fixed places in a block and are
//! cut out of the normalized line before tokenization.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*(;.*)$").expect("valid regex"));

static LINE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^N(\d+)\b").expect("valid regex"));

static CHECKSUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\*(\d+)\s*$").expect("valid regex"));

/// A normalized line split into its side-bands and the remaining region.
#[derive(Debug, Clone, PartialEq)]
pub struct Sidebands<'a> {
    pub line_number: Option<u32>,
    pub checksum: Option<u32>,
    pub comment: Option<&'a str>,
    /// Command and parameters, still to be tokenized.
    pub region: &'a str,
}

/// Cut comment, line number and checksum, in that order.
///
/// Near misses such as `N 100` are left in the region and fail later.
pub fn extract(line: &str) -> Result<Sidebands<'_>> {
    let mut region = line;

    let mut comment = None;
    if let Some(caps) = COMMENT.captures(region) {
        // group 1 always takes part in a match
        if let (Some(whole), Some(text)) = (caps.get(0), caps.get(1)) {
            comment = Some(text.as_str());
            region = &region[..whole.start()];
        }
    }

    let mut line_number = None;
    if let Some(caps) = LINE_NUMBER.captures(region) {
        if let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) {
            line_number = Some(parse_u32(whole.as_str(), digits.as_str())?);
            region = region[whole.end()..].trim_start();
        }
    }

    let mut checksum = None;
    if let Some(caps) = CHECKSUM.captures(region) {
        if let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) {
            checksum = Some(parse_u32(whole.as_str(), digits.as_str())?);
            region = &region[..whole.start()];
        }
    }

    Ok(Sidebands {
        line_number,
        checksum,
        comment,
        region: region.trim(),
    })
}

fn parse_u32(token: &str, digits: &str) -> Result<u32> {
    digits.parse::<u32>().map_err(|_| Error::UnrecognizedToken {
        token: token.trim().to_string(),
    })
}
