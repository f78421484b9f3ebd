//! Command dispatch for the `gcode-block` binary.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::{ChecksumMode, Command, Config};
use crate::parser::BlockParser;
use crate::validation::{Severity, is_passthrough, validate_document};

/// Run one subcommand, writing its output to `out`.
///
/// Returns `false` when the command completed but found errors.
pub fn run(command: &Command, config: &Config, out: &mut impl Write) -> Result<bool> {
    match command {
        Command::Parse { line, json } => parse_line(line, *json, out),
        Command::Check { files, .. } => check_files(files, config, out),
        Command::Format { file, .. } => {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            out.write_all(format_document(&content, config)?.as_bytes())?;
            Ok(true)
        }
        Command::Checksum { line } => {
            let mut block = BlockParser::new().parse(line)?;
            block.update_checksum();
            writeln!(out, "{}", block)?;
            Ok(true)
        }
    }
}

fn parse_line(line: &str, json: bool, out: &mut impl Write) -> Result<bool> {
    let block = BlockParser::new().parse(line)?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&block)?)?;
    } else {
        writeln!(out, "{}", block)?;
    }
    Ok(true)
}

fn check_files(files: &[PathBuf], config: &Config, out: &mut impl Write) -> Result<bool> {
    let options = config.validation_options();
    let mut valid = true;

    for file in files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;

        let result = validate_document(&content, &options);
        for diagnostic in &result.diagnostics {
            writeln!(
                out,
                "{}:{}: {}: {}",
                file.display(),
                diagnostic.line,
                diagnostic.severity,
                diagnostic.message
            )?;
        }

        log::info!(
            "{}: {} blocks, {} errors, {} warnings",
            file.display(),
            result.blocks,
            result.count(Severity::Error),
            result.count(Severity::Warning)
        );
        valid &= result.is_valid();
    }

    Ok(valid)
}

/// Re-render every block of `content` with the configured format.
///
/// Blank and comment-only lines are copied unchanged. The first line that
/// fails to parse aborts the run.
pub fn format_document(content: &str, config: &Config) -> Result<String> {
    let parser = BlockParser::new();
    let mut output = String::with_capacity(content.len());

    for (index, line) in content.lines().enumerate() {
        if is_passthrough(line) {
            output.push_str(line);
        } else {
            let mut block = parser
                .parse(line)
                .with_context(|| format!("line {}", index + 1))?;
            match config.checksum {
                ChecksumMode::Keep => {}
                ChecksumMode::Update => {
                    block.update_checksum();
                }
                ChecksumMode::Strip => {
                    block.strip_checksum();
                }
            }
            output.push_str(&block.render(&config.format));
        }
        output.push('\n');
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(checksum: ChecksumMode) -> Config {
        Config {
            checksum,
            ..Config::default()
        }
    }

    #[test]
    fn test_format_keeps_passthrough_lines() {
        let input = "; header\n\nn3 t0\n";
        let output = format_document(input, &config(ChecksumMode::Keep)).unwrap();
        assert_eq!(output, "; header\n\nN3 T0\n");
    }

    #[test]
    fn test_format_updates_checksums() {
        let input = "N3 T0*1\nN5 G28\n";
        let output = format_document(input, &config(ChecksumMode::Update)).unwrap();
        assert_eq!(output, "N3 T0 *57\nN5 G28 *22\n");
    }

    #[test]
    fn test_format_strips_checksums() {
        let input = "N3 T0*57 ; tool\n";
        let output = format_document(input, &config(ChecksumMode::Strip)).unwrap();
        assert_eq!(output, "N3 T0 ; TOOL\n");
    }

    #[test]
    fn test_format_uses_configured_format() {
        let config = Config {
            format: "%l %c %p%k".to_string(),
            checksum: ChecksumMode::Update,
            ..Config::default()
        };
        let output = format_document("N4 G92 E0 ; reset\n", &config).unwrap();
        assert_eq!(output, "N4 G92 E0*67\n");
    }

    #[test]
    fn test_format_aborts_on_bad_line() {
        let err = format_document("G28\nN 100 G92\n", &Config::default()).unwrap_err();
        assert_eq!(err.to_string(), "line 2");
        assert!(format!("{:#}", err).contains("undefined symbols"));
    }

    #[test]
    fn test_parse_command_outputs() {
        let mut out = Vec::new();
        let command = Command::Parse {
            line: "n6 g1 f1500.0".to_string(),
            json: false,
        };
        assert!(run(&command, &Config::default(), &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "N6 G1 F1500.0\n");

        let mut out = Vec::new();
        let command = Command::Parse {
            line: "G28".to_string(),
            json: true,
        };
        run(&command, &Config::default(), &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["command"]["address"]["value"], 28);
    }

    #[test]
    fn test_checksum_command() {
        let mut out = Vec::new();
        let command = Command::Checksum {
            line: "N8 G1 X3.0 Y3.0".to_string(),
        };
        run(&command, &Config::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "N8 G1 X3.0 Y3.0 *33\n");
    }
}
