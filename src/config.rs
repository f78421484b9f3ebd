//! Configuration management for the gcode-block tool.
//!
//! Handles:
//! - Command-line argument parsing
//! - Project configuration file discovery and loading

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use crate::block::FULL_FORMAT;
use crate::validation::ValidationOptions;

/// File name looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".gcode-block.toml";

/// Command-line arguments for gcode-block
#[derive(Debug, Parser)]
#[command(name = "gcode-block")]
#[command(about = "Parse, check and re-emit G-code blocks")]
#[command(version)]
pub struct Args {
    /// Explicit configuration file
    #[arg(long, global = true, help = "Configuration file (TOML)")]
    pub config: Option<PathBuf>,

    /// Log level for the tool
    #[arg(
        long,
        global = true,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Parse one line and print the block back
    Parse {
        line: String,
        /// Print the block structure as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate G-code files
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Warn about blocks without checksum
        #[arg(long)]
        require_checksum: bool,
    },
    /// Re-emit a G-code file through the block renderer
    Format {
        file: PathBuf,
        /// Render format (%l %c %p %k %m %%)
        #[arg(long)]
        format: Option<String>,
        #[arg(long, value_enum)]
        checksum: Option<ChecksumMode>,
    },
    /// Print a line with a freshly computed checksum
    Checksum { line: String },
}

/// What `format` does with block checksums
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumMode {
    /// Leave checksums as read
    #[default]
    Keep,
    /// Recompute every checksum
    Update,
    /// Drop every checksum
    Strip,
}

/// Settings read from a configuration file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub format: Option<String>,
    pub require_checksum: Option<bool>,
    pub checksum: Option<ChecksumMode>,
}

impl ProjectConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration TOML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the first configuration found.
    ///
    /// An explicit path must exist. Otherwise the candidates are tried in
    /// order and a missing file is not an error.
    pub fn discover(
        explicit: Option<&Path>,
        candidates: &[PathBuf],
    ) -> Result<Option<(PathBuf, Self)>> {
        if let Some(path) = explicit {
            return Ok(Some((path.to_path_buf(), Self::load(path)?)));
        }

        for path in candidates {
            if path.is_file() {
                log::debug!("Using config file {}", path.display());
                return Ok(Some((path.clone(), Self::load(path)?)));
            }
        }

        Ok(None)
    }
}

/// Project file in the working directory, then the user config directory.
pub fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(PROJECT_CONFIG_FILE)];
    if let Some(config_dir) = dirs::config_dir() {
        locations.push(config_dir.join("gcode-block").join("config.toml"));
    }
    locations
}

/// Combined configuration from all sources
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Render format for `format`
    pub format: String,
    /// Warn on blocks without checksum
    pub require_checksum: bool,
    /// Checksum handling for `format`
    pub checksum: ChecksumMode,
    /// Log level
    pub log_level: String,
    /// Configuration file the values came from, if any
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: FULL_FORMAT.to_string(),
            require_checksum: false,
            checksum: ChecksumMode::Keep,
            log_level: "warn".to_string(),
            source: None,
        }
    }
}

impl Config {
    /// Create configuration from command-line arguments and discovered files
    pub fn from_args(args: &Args) -> Result<Self> {
        let file = ProjectConfig::discover(args.config.as_deref(), &default_locations())?;
        Ok(Self::merge(args, file))
    }

    /// Command-line flags over file values over defaults.
    pub fn merge(args: &Args, file: Option<(PathBuf, ProjectConfig)>) -> Self {
        let mut config = Config {
            log_level: args.log_level.clone(),
            ..Config::default()
        };

        if let Some((path, project)) = file {
            if let Some(format) = project.format {
                config.format = format;
            }
            if let Some(require_checksum) = project.require_checksum {
                config.require_checksum = require_checksum;
            }
            if let Some(checksum) = project.checksum {
                config.checksum = checksum;
            }
            config.source = Some(path);
        }

        match &args.command {
            Command::Check {
                require_checksum: true,
                ..
            } => config.require_checksum = true,
            Command::Format {
                format, checksum, ..
            } => {
                if let Some(format) = format {
                    config.format = format.clone();
                }
                if let Some(checksum) = checksum {
                    config.checksum = *checksum;
                }
            }
            _ => {}
        }

        config
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            require_checksum: self.require_checksum,
        }
    }
}
