//! CLI module for buildsmith
//!
//! This module provides the command-line interface over the derivation engine.
//!
//! ## Commands
//!
//! - `derive <model.json>` - Derive every buildable type and print an outline of the results
//! - `check <model.json>` - Derive every buildable type and report failures only
//!
//! ## Model files
//!
//! A model file is a JSON object with two arrays of type declarations: `types` (referenced but not buildable)
//! and `buildables`. Both are optional.
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use buildsmith_core::naming;
use clap::{Args, Parser, Subcommand};

use crate::derive::{AdmitAll, DerivationConfig};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Derive fluent builders from structural type models
#[derive(Parser, Debug)]
#[command(name = "buildsmith")]
#[command(version = VERSION)]
#[command(about = "Derive fluent builders from structural type models", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive every buildable type and print an outline of the derived declarations
    Derive {
        /// JSON model file
        #[arg(value_name = "MODEL")]
        model: PathBuf,
        /// Only print the family of this type (simple or qualified name)
        #[arg(long, value_name = "TYPE")]
        only: Option<String>,
        #[command(flatten)]
        options: DeriveOptions,
    },

    /// Derive every buildable type and report failures without printing results
    Check {
        /// JSON model file
        #[arg(value_name = "MODEL")]
        model: PathBuf,
        #[command(flatten)]
        options: DeriveOptions,
    },
}

/// Derivation switches shared by every command.
#[derive(Args, Debug, Clone)]
pub struct DeriveOptions {
    /// Do not derive editable subtypes; builders build the source type
    #[arg(long)]
    pub no_editables: bool,
    /// Preferred generic parameter letter for nested builders (one of A-Z)
    #[arg(long, value_name = "LETTER", default_value = "N", value_parser = generic_letter)]
    pub nested_generic: String,
    /// Also expand polymorphic properties into generated subtypes
    #[arg(long)]
    pub admit_generated: bool,
}

/// Accept only letters the generic parameter scan knows.
fn generic_letter(value: &str) -> Result<String, String> {
    if naming::is_generic_letter(value) {
        Ok(value.to_string())
    } else {
        Err(format!("expected a single upper-case letter A-Z, found `{value}`"))
    }
}

impl DeriveOptions {
    pub fn config(&self) -> DerivationConfig {
        let config = DerivationConfig::default()
            .with_editable_enabled(!self.no_editables)
            .with_nested_generic(self.nested_generic.clone());
        if self.admit_generated {
            config.with_descendant_policy(AdmitAll)
        } else {
            config
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Derive { model, only, options } => {
            commands::derive_model(&model.to_string_lossy(), only.as_deref(), &options.config())
        }
        Command::Check { model, options } => commands::check_model(&model.to_string_lossy(), &options.config()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_derive() {
        let cli = Cli::try_parse_from(["buildsmith", "derive", "model.json"]).unwrap();
        if let Command::Derive { model, only, options } = cli.command {
            assert_eq!(model, PathBuf::from("model.json"));
            assert!(only.is_none());
            assert!(!options.no_editables);
            assert_eq!(options.nested_generic, "N");
        } else {
            panic!("Expected Derive command");
        }
    }

    #[test]
    fn test_cli_parse_derive_options() {
        let cli = Cli::try_parse_from([
            "buildsmith",
            "derive",
            "model.json",
            "--only",
            "Circle",
            "--no-editables",
            "--nested-generic",
            "Q",
            "--admit-generated",
        ])
        .unwrap();
        let Command::Derive { only, options, .. } = cli.command else {
            panic!("Expected Derive command");
        };
        assert_eq!(only.as_deref(), Some("Circle"));
        let config = options.config();
        assert!(!config.editable_enabled);
        assert_eq!(config.nested_generic, "Q");
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["buildsmith", "check", "model.json", "--no-editables"]).unwrap();
        assert!(matches!(cli.command, Command::Check { options: DeriveOptions { no_editables: true, .. }, .. }));
    }

    #[test]
    fn test_cli_rejects_unknown_nested_letters() {
        for bad in ["n", "NN", "1"] {
            let err = Cli::try_parse_from(["buildsmith", "derive", "model.json", "--nested-generic", bad]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation, "{bad}");
        }
        assert!(Cli::try_parse_from(["buildsmith", "check", "model.json", "--nested-generic", "Q"]).is_ok());
    }

    #[test]
    fn test_cli_requires_a_command() {
        assert!(Cli::try_parse_from(["buildsmith"]).is_err());
        assert!(Cli::try_parse_from(["buildsmith", "derive"]).is_err());
    }
}
