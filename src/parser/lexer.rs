//! Block Lexer
//!
//! Normalization of raw lines and tokenization of the command/parameter
//! region left once the side-band sections are gone.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\t\r\n]").expect("valid regex"));

/// One token: a letter, then an optional quoted span or decimal number,
/// then whitespace or end of input. Inside a quoted span `""` is an
/// escaped quote and may sit right next to the delimiters (`"""92"""`).
///
/// Any uppercase letter is accepted here; the factory decides which words
/// are legal so that `K92` reports an invalid word rather than leftovers.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Z*])(?:"(?:[^"]|"")*"|[+-]?(?:\d+(?:\.\d*)?|\.\d+))?(?:\s|$)"#)
        .expect("valid regex")
});

/// Trim, uppercase and fold whitespace so later patterns see one shape.
pub fn normalize(line: &str) -> String {
    let upper = line.trim().to_uppercase();
    let collapsed = WHITESPACE_RUN.replace_all(&upper, " ");
    LINE_BREAK.replace_all(&collapsed, " ").into_owned()
}

/// Split `region` into token substrings, in source order.
///
/// Every character must belong to a token: whatever is left over, once
/// trimmed, is reported as [`Error::UndefinedSymbols`].
pub fn tokenize(region: &str) -> Result<Vec<&str>> {
    let mut tokens = Vec::new();
    let mut residue = String::new();
    let mut cursor = 0;

    for m in TOKEN.find_iter(region) {
        residue.push_str(&region[cursor..m.start()]);
        tokens.push(m.as_str().trim_end());
        cursor = m.end();
    }
    residue.push_str(&region[cursor..]);

    if tokens.is_empty() {
        return Err(Error::NoCommandFound {
            line: region.to_string(),
        });
    }

    let residue = residue.trim();
    if !residue.is_empty() {
        return Err(Error::UndefinedSymbols {
            residue: residue.to_string(),
        });
    }

    log::trace!("tokenized '{}' into {:?}", region, tokens);
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  g1 x2.0  "), "G1 X2.0");
        assert_eq!(normalize("G1    X2.0\t\tY3"), "G1 X2.0 Y3");
        assert_eq!(normalize("G1\tX2.0"), "G1 X2.0");
        assert_eq!(normalize("m117 \"hola\""), "M117 \"HOLA\"");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_tokenize_simple() {
        assert_eq!(
            tokenize("G1 X2.0 Y-2 F3000.0").unwrap(),
            vec!["G1", "X2.0", "Y-2", "F3000.0"]
        );
    }

    #[test]
    fn test_tokenize_lone_letters() {
        assert_eq!(tokenize("G28 X Y Z").unwrap(), vec!["G28", "X", "Y", "Z"]);
        assert_eq!(tokenize("G").unwrap(), vec!["G"]);
    }

    #[test]
    fn test_tokenize_quoted_spans() {
        assert_eq!(
            tokenize("G\"\"\"92\"\"\" X1.0").unwrap(),
            vec!["G\"\"\"92\"\"\"", "X1.0"]
        );
        assert_eq!(tokenize("M117 P\" 92 \"").unwrap(), vec!["M117", "P\" 92 \""]);
        assert_eq!(tokenize("X\"A\"\"B\"").unwrap(), vec!["X\"A\"\"B\""]);
    }

    #[test]
    fn test_tokenize_keeps_unknown_letters_for_the_factory() {
        assert_eq!(tokenize("K92.3").unwrap(), vec!["K92.3"]);
    }

    #[test]
    fn test_tokenize_reports_residue() {
        assert_eq!(
            tokenize("G92 X1 .0"),
            Err(Error::UndefinedSymbols {
                residue: ".0".to_string()
            })
        );
        assert_eq!(
            tokenize("N 100 G92"),
            Err(Error::UndefinedSymbols {
                residue: "100".to_string()
            })
        );
        assert!(matches!(
            tokenize("G1 X2.0 #"),
            Err(Error::UndefinedSymbols { .. })
        ));
    }

    #[test]
    fn test_tokenize_empty_region() {
        assert_eq!(
            tokenize(""),
            Err(Error::NoCommandFound {
                line: String::new()
            })
        );
        assert!(matches!(tokenize("123"), Err(Error::NoCommandFound { .. })));
    }
}
