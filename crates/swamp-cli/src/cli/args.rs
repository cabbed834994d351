//! Shared argument builders for CLI commands.
//!
//! The global flags are declared once on the root command and propagated to
//! every subcommand.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

pub const DEFAULT_OUTPUT: &str = "out.swamp-pack";

/// Solution file, solution directory or package directory (positional).
pub fn path_arg() -> Arg {
    Arg::new("path")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .default_value(".")
        .help("Solution file, or a directory holding a solution or package")
}

/// Source file or directory to format (positional, required).
pub fn fmt_path_arg() -> Arg {
    Arg::new("path")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Source file or directory to format")
}

/// Output file (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_OUTPUT)
        .global(true)
        .help("Output file")
}

/// Plain output (--disable-style).
pub fn disable_style_arg() -> Arg {
    Arg::new("disable_style")
        .long("disable-style")
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Disable colors and styling in diagnostics")
}

/// Debug logging (-v/--verbose).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Log progress to stderr (RUST_LOG overrides)")
}
