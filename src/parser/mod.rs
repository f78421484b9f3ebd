//! Block Parser
//!
//! Turns one raw line into a [`Block`]: normalize, cut the side-band
//! sections, tokenize what remains and hand every token to the factory.
//! Parsing never verifies the checksum; that is an explicit call on the
//! resulting block.

pub mod lexer;
pub mod sideband;

pub use lexer::{normalize, tokenize};
pub use sideband::{Sidebands, extract};

use crate::block::Block;
use crate::error::{Error, Result};
use crate::factory::{DefaultGcodeFactory, GcodeFactory};

/// Parser bound to a gcode factory.
#[derive(Debug, Clone, Default)]
pub struct BlockParser<F = DefaultGcodeFactory> {
    factory: F,
}

impl BlockParser<DefaultGcodeFactory> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: GcodeFactory> BlockParser<F> {
    pub fn with_factory(factory: F) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Parse a single line. The first failure is returned as is.
    pub fn parse(&self, line: &str) -> Result<Block> {
        let normalized = normalize(line);
        let parts = extract(&normalized)?;
        let tokens = tokenize(parts.region)?;

        let (first, rest) = tokens.split_first().ok_or_else(|| Error::NoCommandFound {
            line: parts.region.to_string(),
        })?;

        let command = self.factory.parse_one(first)?;
        let parameters = rest
            .iter()
            .map(|token| self.factory.parse_one(token))
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "parsed block: command={} parameters={} line_number={:?} checksum={:?}",
            command,
            parameters.len(),
            parts.line_number,
            parts.checksum
        );

        Ok(Block::from_parts(
            parts.line_number,
            command,
            parameters,
            parts.checksum,
            parts.comment.map(str::to_string),
        ))
    }
}

/// Parse a line with the stock factory.
pub fn parse(line: &str) -> Result<Block> {
    BlockParser::new().parse(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::gcode::Gcode;
    use crate::word::Word;

    fn word(c: char) -> Word {
        Word::try_from(c).unwrap()
    }

    #[test]
    fn test_parse_motion_block() {
        let block = parse("N7 G1 X2.0 Y2.0 F3000.0").unwrap();

        assert_eq!(block.line_number(), Some(7));
        assert_eq!(block.command(), &Gcode::addressed(word('G'), 1));
        assert_eq!(
            block.parameters(),
            &[
                Gcode::addressed(word('X'), 2.0f32),
                Gcode::addressed(word('Y'), 2.0f32),
                Gcode::addressed(word('F'), 3000.0f32),
            ]
        );
        assert_eq!(block.checksum(), None);
        assert_eq!(block.comment(), None);
        assert_eq!(block.compute_checksum(), Gcode::checksum(85));
    }

    #[test]
    fn test_parse_tool_change_checksum() {
        let block = parse("N3 T0").unwrap();
        assert_eq!(block.compute_checksum(), Gcode::checksum(57));
    }

    #[test]
    fn test_stored_checksum_is_not_verified_on_parse() {
        let block = parse("N100 G92 X-1.0 Y-2.0 Z-3.0*10").unwrap();
        assert_eq!(block.checksum(), Some(10));
        assert_eq!(block.verify_checksum(), Ok(false));

        let block = parse("N100 G92 X-1.0 Y-2.0 Z-3.0*107").unwrap();
        assert_eq!(block.verify_checksum(), Ok(true));
    }

    #[test]
    fn test_escaped_quotes_in_command() {
        let block = parse("G\"\"\"92\"\"\" X1.0").unwrap();
        assert_eq!(block.command().word(), word('G'));
        assert_eq!(block.command().to_string(), "G\"\"\"92\"\"\"");
        assert_eq!(
            block.command().address().and_then(Address::as_quoted).map(|q| q.unescaped()),
            Some("\"92\"".to_string())
        );
        assert_eq!(block.parameters().len(), 1);
    }

    #[test]
    fn test_separated_line_number_fails() {
        assert!(matches!(
            parse("N 100 G92"),
            Err(Error::UndefinedSymbols { .. })
        ));
    }

    #[test]
    fn test_empty_line_has_no_command() {
        assert!(matches!(parse(""), Err(Error::NoCommandFound { .. })));
        assert!(matches!(parse("   "), Err(Error::NoCommandFound { .. })));
        assert!(matches!(parse("N10"), Err(Error::NoCommandFound { .. })));
        assert!(matches!(
            parse("; only a comment"),
            Err(Error::NoCommandFound { .. })
        ));
    }

    #[test]
    fn test_detached_fraction_fails() {
        assert_eq!(
            parse("G92 X1 .0"),
            Err(Error::UndefinedSymbols {
                residue: ".0".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_word_surfaces_from_factory() {
        assert_eq!(parse("G1 K92.3"), Err(Error::InvalidWord { byte: b'K' }));
    }

    #[test]
    fn test_comment_is_kept_verbatim_after_normalization() {
        let block = parse("g1 x10.5 y-2.0 ; move it").unwrap();
        assert_eq!(block.comment(), Some("; MOVE IT"));
        assert_eq!(block.to_line(), "G1 X10.5 Y-2.0");
        assert_eq!(block.compute_checksum(), Gcode::checksum(108));
    }

    #[test]
    fn test_string_with_spaces() {
        let block = parse("M117 P\" 92 \"").unwrap();
        assert_eq!(block.parameters()[0].to_string(), "P\" 92 \"");
    }

    #[test]
    fn test_canonical_lines_round_trip() {
        let lines = [
            "N7 G1 X2.0 Y2.0 F3000.0",
            "N3 T0",
            "N100 G92 X-1.0 Y-2.0 Z-3.0 *107",
            "G\"\"\"92\"\"\" X1.0",
            "X\"A\"\"B\"",
            "N10 M117 P\"HELLO\"",
            "G28 X Y Z",
            "G1 X10.5 Y-2.0 ; MOVE",
        ];
        for line in lines {
            let block = parse(line).unwrap_or_else(|e| panic!("{}: {}", line, e));
            assert_eq!(block.to_line_full(), line);
        }
    }

    #[test]
    fn test_reparse_is_stable() {
        for line in ["n7  g1 x2 y2.50 f3000", "G1 X.5 *3 ;note", "M117 P\"HI\""] {
            let first = parse(line).unwrap();
            let second = parse(&first.to_line_full()).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_parser_uses_injected_factory() {
        struct NoStrings;

        impl GcodeFactory for NoStrings {
            fn new_unaddressed(&self, word: u8) -> Result<Gcode> {
                DefaultGcodeFactory.new_unaddressed(word)
            }
            fn new_addressed_u32(&self, word: u8, value: u32) -> Result<Gcode> {
                DefaultGcodeFactory.new_addressed_u32(word, value)
            }
            fn new_addressed_i32(&self, word: u8, value: i32) -> Result<Gcode> {
                DefaultGcodeFactory.new_addressed_i32(word, value)
            }
            fn new_addressed_f32(&self, word: u8, value: f32) -> Result<Gcode> {
                DefaultGcodeFactory.new_addressed_f32(word, value)
            }
            fn new_addressed_string(&self, _word: u8, value: &str) -> Result<Gcode> {
                Err(Error::UnrecognizedToken {
                    token: value.to_string(),
                })
            }
        }

        let parser = BlockParser::with_factory(NoStrings);
        assert!(parser.parse("G1 X1.0").is_ok());
        assert_eq!(
            parser.parse("M117 P\"HI\""),
            Err(Error::UnrecognizedToken {
                token: "\"HI\"".to_string()
            })
        );
    }
}
